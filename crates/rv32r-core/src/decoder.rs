//! Instruction decoder for the R-type integer subset.
//!
//! Decoding is a pure transform from a raw 32-bit word to a
//! [`DecodedInstruction`]. It never fails and never touches machine state;
//! whether an opcode or function is executable is decided later by the
//! execution engine.

use crate::encoding::OPCODE_R_TYPE;

const OPCODE_MASK: u32 = 0x7F;
const REGISTER_MASK: u32 = 0x1F;
const FUNCT3_MASK: u32 = 0x7;
const FUNCT7_MASK: u32 = 0x7F;

const RD_SHIFT: u32 = 7;
const FUNCT3_SHIFT: u32 = 12;
const RS1_SHIFT: u32 = 15;
const RS2_SHIFT: u32 = 20;
const FUNCT7_SHIFT: u32 = 25;

/// Extracts `opcode` (bits `[6:0]`).
#[must_use]
pub const fn extract_opcode(raw: u32) -> u8 {
    (raw & OPCODE_MASK) as u8
}

/// Extracts `rd` (bits `[11:7]`).
#[must_use]
pub const fn extract_rd(raw: u32) -> u8 {
    ((raw >> RD_SHIFT) & REGISTER_MASK) as u8
}

/// Extracts `funct3` (bits `[14:12]`).
#[must_use]
pub const fn extract_funct3(raw: u32) -> u8 {
    ((raw >> FUNCT3_SHIFT) & FUNCT3_MASK) as u8
}

/// Extracts `rs1` (bits `[19:15]`).
#[must_use]
pub const fn extract_rs1(raw: u32) -> u8 {
    ((raw >> RS1_SHIFT) & REGISTER_MASK) as u8
}

/// Extracts `rs2` (bits `[24:20]`).
#[must_use]
pub const fn extract_rs2(raw: u32) -> u8 {
    ((raw >> RS2_SHIFT) & REGISTER_MASK) as u8
}

/// Extracts `funct7` (bits `[31:25]`).
#[must_use]
pub const fn extract_funct7(raw: u32) -> u8 {
    ((raw >> FUNCT7_SHIFT) & FUNCT7_MASK) as u8
}

/// Instruction format classes recognised by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum InstructionFormat {
    /// Register-register ALU format.
    RType,
    /// Any opcode outside the supported subset.
    Unknown,
}

/// Classifies an opcode into its instruction format.
#[must_use]
pub const fn instruction_format(opcode: u8) -> InstructionFormat {
    match opcode {
        OPCODE_R_TYPE => InstructionFormat::RType,
        _ => InstructionFormat::Unknown,
    }
}

/// Decoded instruction with all extracted fields.
///
/// For [`InstructionFormat::Unknown`] every instruction-specific field is
/// zero; only `opcode` carries information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodedInstruction {
    /// 7-bit primary opcode.
    pub opcode: u8,
    /// Format classification of `opcode`.
    pub format: InstructionFormat,
    /// Destination register index.
    pub rd: u8,
    /// First source register index.
    pub rs1: u8,
    /// Second source register index.
    pub rs2: u8,
    /// 3-bit function selector.
    pub funct3: u8,
    /// 7-bit function selector extension.
    pub funct7: u8,
    /// Immediate operand; R-type carries none, so this is always zero.
    pub immediate: i32,
}

impl DecodedInstruction {
    /// Re-encodes the fields back into a 32-bit word.
    ///
    /// For every R-type word `w`, `Decoder::decode(w).encode() == w`.
    #[must_use]
    pub const fn encode(self) -> u32 {
        ((self.funct7 as u32) << FUNCT7_SHIFT)
            | ((self.rs2 as u32) << RS2_SHIFT)
            | ((self.rs1 as u32) << RS1_SHIFT)
            | ((self.funct3 as u32) << FUNCT3_SHIFT)
            | ((self.rd as u32) << RD_SHIFT)
            | self.opcode as u32
    }
}

/// Instruction decoder for the R-type subset.
#[derive(Debug)]
pub struct Decoder;

impl Decoder {
    /// Decodes a raw 32-bit instruction word.
    #[must_use]
    pub const fn decode(raw: u32) -> DecodedInstruction {
        let opcode = extract_opcode(raw);
        match instruction_format(opcode) {
            InstructionFormat::RType => DecodedInstruction {
                opcode,
                format: InstructionFormat::RType,
                rd: extract_rd(raw),
                rs1: extract_rs1(raw),
                rs2: extract_rs2(raw),
                funct3: extract_funct3(raw),
                funct7: extract_funct7(raw),
                immediate: 0,
            },
            InstructionFormat::Unknown => DecodedInstruction {
                opcode,
                format: InstructionFormat::Unknown,
                rd: 0,
                rs1: 0,
                rs2: 0,
                funct3: 0,
                funct7: 0,
                immediate: 0,
            },
        }
    }
}
