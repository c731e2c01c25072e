//! Deterministic bounds and alignment policy for memory accesses.
//!
//! Every helper returns the validated start index on success so callers can
//! index the backing store without re-checking. Bounds are evaluated before
//! alignment, and span arithmetic is widened to 64 bits so addresses near
//! `u32::MAX` never wrap.

use crate::FaultCode;

/// Byte width of a word access.
pub const WORD_ACCESS_BYTES: u32 = 4;
/// Byte width of a halfword access.
pub const HALFWORD_ACCESS_BYTES: u32 = 2;

const fn validate_span(addr: u32, width: u32, len: usize) -> Result<usize, FaultCode> {
    let last = addr as u64 + (width as u64 - 1);
    if last >= len as u64 {
        return Err(FaultCode::OutOfBounds);
    }
    if addr % width != 0 {
        return Err(FaultCode::Misaligned);
    }
    Ok(addr as usize)
}

/// Validates a 4-byte access against a memory of `len` bytes.
///
/// # Errors
///
/// Returns [`FaultCode::OutOfBounds`] when `addr + 3 >= len`, otherwise
/// [`FaultCode::Misaligned`] when `addr` is not a multiple of 4.
pub const fn validate_word_access(addr: u32, len: usize) -> Result<usize, FaultCode> {
    validate_span(addr, WORD_ACCESS_BYTES, len)
}

/// Validates a 2-byte access against a memory of `len` bytes.
///
/// # Errors
///
/// Returns [`FaultCode::OutOfBounds`] when `addr + 1 >= len`, otherwise
/// [`FaultCode::Misaligned`] when `addr` is odd.
pub const fn validate_halfword_access(addr: u32, len: usize) -> Result<usize, FaultCode> {
    validate_span(addr, HALFWORD_ACCESS_BYTES, len)
}

/// Validates a single-byte access against a memory of `len` bytes.
///
/// # Errors
///
/// Returns [`FaultCode::OutOfBounds`] when `addr >= len`.
pub const fn validate_byte_access(addr: u32, len: usize) -> Result<usize, FaultCode> {
    validate_span(addr, 1, len)
}
