use thiserror::Error;

/// Number of architecturally visible general-purpose registers (`x0..x31`).
pub const GENERAL_REGISTER_COUNT: usize = 32;

/// Standard calling-convention names indexed by register number.
const ABI_NAMES: [&str; GENERAL_REGISTER_COUNT] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Host-side register access failure. Never halts the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RegisterError {
    /// Index outside `0..=31`.
    #[error("invalid register index {0}")]
    InvalidRegister(usize),
}

/// Returns the ABI mnemonic for a register index, if it exists.
#[must_use]
pub fn register_abi_name(index: usize) -> Option<&'static str> {
    ABI_NAMES.get(index).copied()
}

/// General-purpose register file with `x0` hardwired to zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    gpr: [u32; GENERAL_REGISTER_COUNT],
}

impl RegisterFile {
    /// Reads a register. `x0` always reads as zero.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::InvalidRegister`] when `index > 31`.
    pub fn get(&self, index: usize) -> Result<u32, RegisterError> {
        match index {
            0 => Ok(0),
            _ => self
                .gpr
                .get(index)
                .copied()
                .ok_or(RegisterError::InvalidRegister(index)),
        }
    }

    /// Writes a register. Writes to `x0` are discarded and report success.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::InvalidRegister`] when `index > 31`; no
    /// register is modified.
    pub fn set(&mut self, index: usize, value: u32) -> Result<(), RegisterError> {
        match index {
            0 => Ok(()),
            _ => {
                let slot = self
                    .gpr
                    .get_mut(index)
                    .ok_or(RegisterError::InvalidRegister(index))?;
                *slot = value;
                Ok(())
            }
        }
    }

    /// Zeroes every register.
    pub fn reset(&mut self) {
        self.gpr = [0; GENERAL_REGISTER_COUNT];
    }

    /// Iterates `(index, value)` pairs in register order, honouring the `x0` rule.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.gpr
            .iter()
            .enumerate()
            .map(|(index, value)| (index, if index == 0 { 0 } else { *value }))
    }
}

#[cfg(test)]
mod tests {
    use super::{register_abi_name, RegisterError, RegisterFile, GENERAL_REGISTER_COUNT};

    #[test]
    fn register_file_tracks_each_register_independently() {
        let mut regs = RegisterFile::default();

        for (index, value) in (1..GENERAL_REGISTER_COUNT).zip(0x1000_u32..) {
            regs.set(index, value).expect("valid index");
        }

        for (index, value) in (1..GENERAL_REGISTER_COUNT).zip(0x1000_u32..) {
            assert_eq!(regs.get(index), Ok(value));
        }
    }

    #[test]
    fn x0_is_hardwired_to_zero() {
        let mut regs = RegisterFile::default();
        assert_eq!(regs.set(0, 0xDEAD_BEEF), Ok(()));
        assert_eq!(regs.get(0), Ok(0));
        assert_eq!(regs.iter().next(), Some((0, 0)));
    }

    #[test]
    fn out_of_range_index_is_rejected_without_side_effects() {
        let mut regs = RegisterFile::default();
        regs.set(31, 7).expect("valid index");

        assert_eq!(regs.set(32, 99), Err(RegisterError::InvalidRegister(32)));
        assert_eq!(regs.get(32), Err(RegisterError::InvalidRegister(32)));
        assert_eq!(
            regs.get(usize::MAX),
            Err(RegisterError::InvalidRegister(usize::MAX))
        );
        assert_eq!(regs.get(31), Ok(7));
        assert!(regs.iter().filter(|(index, _)| *index != 31).all(|(_, v)| v == 0));
    }

    #[test]
    fn reset_zeroes_all_registers() {
        let mut regs = RegisterFile::default();
        regs.set(5, 5).expect("valid index");
        regs.reset();
        assert_eq!(regs, RegisterFile::default());
    }

    #[test]
    fn abi_names_cover_every_register() {
        assert_eq!(register_abi_name(0), Some("zero"));
        assert_eq!(register_abi_name(2), Some("sp"));
        assert_eq!(register_abi_name(31), Some("t6"));
        assert_eq!(register_abi_name(32), None);
    }
}
