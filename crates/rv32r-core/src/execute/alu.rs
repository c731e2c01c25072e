use crate::AluOp;

const SHIFT_AMOUNT_MASK: u32 = 0x1F;

/// Computes an R-type ALU result on 32-bit register values.
///
/// Arithmetic wraps; shift amounts use the low five bits of `rs2`.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn evaluate(op: AluOp, rs1: u32, rs2: u32) -> u32 {
    let shamt = rs2 & SHIFT_AMOUNT_MASK;
    match op {
        AluOp::Add => rs1.wrapping_add(rs2),
        AluOp::Sub => rs1.wrapping_sub(rs2),
        AluOp::Sll => rs1 << shamt,
        AluOp::Slt => ((rs1 as i32) < (rs2 as i32)) as u32,
        AluOp::Sltu => (rs1 < rs2) as u32,
        AluOp::Xor => rs1 ^ rs2,
        AluOp::Srl => rs1 >> shamt,
        AluOp::Sra => ((rs1 as i32) >> shamt) as u32,
        AluOp::Or => rs1 | rs2,
        AluOp::And => rs1 & rs2,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::evaluate;
    use crate::AluOp;

    #[rstest]
    #[case(AluOp::Add, 20, 15, 35)]
    #[case(AluOp::Add, u32::MAX, 1, 0)]
    #[case(AluOp::Sub, 15, 20, 0xFFFF_FFFB)]
    #[case(AluOp::Sll, 15, 15, 491_520)]
    #[case(AluOp::Sll, 1, 33, 2)]
    #[case(AluOp::Slt, (-10_i32) as u32, (-2_i32) as u32, 1)]
    #[case(AluOp::Slt, 20, 15, 0)]
    #[case(AluOp::Sltu, (-10_i32) as u32, 2, 0)]
    #[case(AluOp::Sltu, 2, (-10_i32) as u32, 1)]
    #[case(AluOp::Xor, 0xFF, (-2_i32) as u32, 0xFFFF_FF01)]
    #[case(AluOp::Srl, 0x8000_0000, 31, 1)]
    #[case(AluOp::Sra, 0x8000_0000, 31, u32::MAX)]
    #[case(AluOp::Sra, 0xFF, (-2_i32) as u32, 0)]
    #[case(AluOp::Sra, (-5_i32) as u32, (-3_i32) as u32, u32::MAX)]
    #[case(AluOp::Or, 15, 35, 47)]
    #[case(AluOp::And, 245, 15, 5)]
    fn alu_results_match_reference(
        #[case] op: AluOp,
        #[case] rs1: u32,
        #[case] rs2: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(evaluate(op, rs1, rs2), expected);
    }

    #[test]
    fn sra_sign_extends_where_srl_zero_fills() {
        let negative = 0xF000_0000;
        assert_eq!(evaluate(AluOp::Srl, negative, 4), 0x0F00_0000);
        assert_eq!(evaluate(AluOp::Sra, negative, 4), 0xFF00_0000);
    }
}
