use thiserror::Error;

/// Fault classes used to tell bad addresses apart from unsupported instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Instruction fetch or data access violated a bounds/alignment policy.
    Memory,
    /// Decoded instruction has no defined execution semantics.
    Execute,
}

/// Stable fault taxonomy for conditions that halt the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// Access span extends past the end of the addressed memory.
    #[error("memory access out of bounds")]
    OutOfBounds = 0x01,
    /// Multi-byte access address is not a multiple of its width.
    #[error("misaligned memory access")]
    Misaligned = 0x02,
    /// Opcode does not select a supported instruction format.
    #[error("unknown opcode")]
    UnknownOpcode = 0x03,
    /// `funct3`/`funct7` combination is not an assigned R-type operation.
    #[error("unknown r-type function")]
    UnknownFunction = 0x04,
    /// Instruction names a register index outside `x0..=x31`.
    #[error("invalid register index")]
    InvalidRegister = 0x05,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::OutOfBounds),
            0x02 => Some(Self::Misaligned),
            0x03 => Some(Self::UnknownOpcode),
            0x04 => Some(Self::UnknownFunction),
            0x05 => Some(Self::InvalidRegister),
            _ => None,
        }
    }

    /// Returns the diagnostics class for this fault code.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::OutOfBounds | Self::Misaligned => FaultClass::Memory,
            Self::UnknownOpcode | Self::UnknownFunction | Self::InvalidRegister => {
                FaultClass::Execute
            }
        }
    }
}
