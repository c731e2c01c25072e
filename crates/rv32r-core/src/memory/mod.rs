//! Byte-addressable memory regions with checked little-endian accessors.

/// Deterministic bounds/alignment policy helpers.
pub mod access;

use std::collections::TryReserveError;

pub use access::{
    validate_byte_access, validate_halfword_access, validate_word_access, HALFWORD_ACCESS_BYTES,
    WORD_ACCESS_BYTES,
};

use crate::FaultCode;

/// Fixed-size, zero-initialised memory region.
///
/// The region is sized once at construction and never grows. All access goes
/// through the checked accessors below; the only raw view is read-only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    /// Allocates a zeroed region of `len` bytes without aborting on allocation failure.
    ///
    /// # Errors
    ///
    /// Returns the allocator's [`TryReserveError`] when the backing store
    /// cannot be reserved.
    pub fn try_new(len: usize) -> Result<Self, TryReserveError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len)?;
        bytes.resize(len, 0);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Size of the region in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for a zero-sized (or released) region.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read-only view of the whole region for diagnostic collaborators.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reads a little-endian word.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::OutOfBounds`] or [`FaultCode::Misaligned`] per
    /// [`validate_word_access`].
    pub fn read_word(&self, addr: u32) -> Result<u32, FaultCode> {
        let start = validate_word_access(addr, self.len())?;
        let b = &self.bytes[start..start + 4];
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Writes a little-endian word.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::OutOfBounds`] or [`FaultCode::Misaligned`] per
    /// [`validate_word_access`]; memory is untouched on error.
    pub fn write_word(&mut self, addr: u32, value: u32) -> Result<(), FaultCode> {
        let start = validate_word_access(addr, self.len())?;
        self.bytes[start..start + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Reads a little-endian halfword.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::OutOfBounds`] or [`FaultCode::Misaligned`] per
    /// [`validate_halfword_access`].
    pub fn read_halfword(&self, addr: u32) -> Result<u16, FaultCode> {
        let start = validate_halfword_access(addr, self.len())?;
        Ok(u16::from_le_bytes([self.bytes[start], self.bytes[start + 1]]))
    }

    /// Writes a little-endian halfword.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::OutOfBounds`] or [`FaultCode::Misaligned`] per
    /// [`validate_halfword_access`]; memory is untouched on error.
    pub fn write_halfword(&mut self, addr: u32, value: u16) -> Result<(), FaultCode> {
        let start = validate_halfword_access(addr, self.len())?;
        self.bytes[start..start + 2].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::OutOfBounds`] when `addr` is past the end.
    pub fn read_byte(&self, addr: u32) -> Result<u8, FaultCode> {
        let index = validate_byte_access(addr, self.len())?;
        Ok(self.bytes[index])
    }

    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::OutOfBounds`] when `addr` is past the end.
    pub fn write_byte(&mut self, addr: u32, value: u8) -> Result<(), FaultCode> {
        let index = validate_byte_access(addr, self.len())?;
        self.bytes[index] = value;
        Ok(())
    }

    /// Copies `data` to the start of the region. Caller guarantees it fits.
    pub(crate) fn copy_from_start(&mut self, data: &[u8]) {
        self.bytes[..data.len()].copy_from_slice(data);
    }

    /// Drops the backing store, leaving an empty region.
    pub(crate) fn release(&mut self) {
        self.bytes = Box::default();
    }
}
