/// Primary opcode of the register-register ALU format.
pub const OPCODE_R_TYPE: u8 = 0x33;

/// `funct7` value for the base operations (`ADD`, `SRL`).
pub const FUNCT7_BASE: u8 = 0x00;
/// `funct7` value selecting the alternate operations (`SUB`, `SRA`).
pub const FUNCT7_ALT: u8 = 0x20;

/// R-type ALU operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum AluOp {
    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,
}

impl AluOp {
    /// Lowercase assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Sll => "sll",
            Self::Slt => "slt",
            Self::Sltu => "sltu",
            Self::Xor => "xor",
            Self::Srl => "srl",
            Self::Sra => "sra",
            Self::Or => "or",
            Self::And => "and",
        }
    }
}

/// Single source-of-truth R-type function table: `(funct3, funct7, op)`.
///
/// A `None` funct7 matches any value. Any `(funct3, funct7)` pair not covered
/// here is an unknown function by definition.
pub const R_TYPE_ENCODING_TABLE: &[(u8, Option<u8>, AluOp)] = &[
    (0x0, Some(FUNCT7_BASE), AluOp::Add),
    (0x0, Some(FUNCT7_ALT), AluOp::Sub),
    (0x1, None, AluOp::Sll),
    (0x2, None, AluOp::Slt),
    (0x3, None, AluOp::Sltu),
    (0x4, None, AluOp::Xor),
    (0x5, Some(FUNCT7_BASE), AluOp::Srl),
    (0x5, Some(FUNCT7_ALT), AluOp::Sra),
    (0x6, None, AluOp::Or),
    (0x7, None, AluOp::And),
];

/// Classifies an R-type `(funct3, funct7)` pair against [`R_TYPE_ENCODING_TABLE`].
#[must_use]
pub fn classify_r_type(funct3: u8, funct7: u8) -> Option<AluOp> {
    R_TYPE_ENCODING_TABLE
        .iter()
        .find(|(f3, f7, _)| *f3 == funct3 && f7.is_none_or(|expected| expected == funct7))
        .map(|(_, _, op)| *op)
}
