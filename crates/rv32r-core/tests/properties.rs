//! Property checks over registers, memory, decode, and the ALU.

use proptest::prelude::*;
use rstest as _;
use rv32r_core::{
    classify_r_type, evaluate, AluOp, Controller, Decoder, FaultCode, MachineConfig, MachineState,
    Memory, NullTraceSink, RegisterError, RegisterFile, StepOutcome, GENERAL_REGISTER_COUNT,
};
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

const REGION_BYTES: usize = 64;
const REGION_END: u32 = 64;

fn machine() -> MachineState {
    let config = MachineConfig {
        instruction_memory_bytes: REGION_BYTES,
        data_memory_bytes: REGION_BYTES,
        instruction_limit: None,
    };
    MachineState::new(&config).expect("small allocation")
}

const fn r_type(funct7: u8, rs2: u8, rs1: u8, funct3: u8, rd: u8) -> u32 {
    ((funct7 as u32) << 25)
        | ((rs2 as u32) << 20)
        | ((rs1 as u32) << 15)
        | ((funct3 as u32) << 12)
        | ((rd as u32) << 7)
        | 0x33
}

proptest! {
    #[test]
    fn register_write_then_read(index in 1usize..GENERAL_REGISTER_COUNT, value in any::<u32>()) {
        let mut regs = RegisterFile::default();
        prop_assert_eq!(regs.set(index, value), Ok(()));
        prop_assert_eq!(regs.get(index), Ok(value));
    }

    #[test]
    fn x0_ignores_every_write(value in any::<u32>()) {
        let mut regs = RegisterFile::default();
        prop_assert_eq!(regs.set(0, value), Ok(()));
        prop_assert_eq!(regs.get(0), Ok(0));
    }

    #[test]
    fn out_of_range_register_is_rejected(index in GENERAL_REGISTER_COUNT..usize::MAX) {
        let mut regs = RegisterFile::default();
        prop_assert_eq!(regs.get(index), Err(RegisterError::InvalidRegister(index)));
        prop_assert_eq!(regs.set(index, 1), Err(RegisterError::InvalidRegister(index)));
    }

    #[test]
    fn aligned_in_bounds_word_round_trips(slot in 0u32..16, value in any::<u32>()) {
        let mut mem = Memory::try_new(REGION_BYTES).expect("small allocation");
        let addr = slot * 4;
        prop_assert_eq!(mem.write_word(addr, value), Ok(()));
        prop_assert_eq!(mem.read_word(addr), Ok(value));
        prop_assert_eq!(
            &mem.as_bytes()[addr as usize..addr as usize + 4],
            &value.to_le_bytes()[..]
        );
    }

    #[test]
    fn aligned_in_bounds_halfword_round_trips(slot in 0u32..32, value in any::<u16>()) {
        let mut mem = Memory::try_new(REGION_BYTES).expect("small allocation");
        let addr = slot * 2;
        prop_assert_eq!(mem.write_halfword(addr, value), Ok(()));
        prop_assert_eq!(mem.read_halfword(addr), Ok(value));
        prop_assert_eq!(
            &mem.as_bytes()[addr as usize..addr as usize + 2],
            &value.to_le_bytes()[..]
        );
    }

    #[test]
    fn byte_round_trips(addr in 0u32..REGION_END, value in any::<u8>()) {
        let mut mem = Memory::try_new(REGION_BYTES).expect("small allocation");
        prop_assert_eq!(mem.write_byte(addr, value), Ok(()));
        prop_assert_eq!(mem.read_byte(addr), Ok(value));
        prop_assert_eq!(mem.as_bytes()[addr as usize], value);
    }

    #[test]
    fn odd_halfword_address_is_misaligned(slot in 0u32..31) {
        let mem = Memory::try_new(REGION_BYTES).expect("small allocation");
        prop_assert_eq!(mem.read_halfword(slot * 2 + 1), Err(FaultCode::Misaligned));
    }

    #[test]
    fn data_accessors_round_trip_without_latching(
        slot in 0u32..16,
        word in any::<u32>(),
        half in any::<u16>(),
        byte in any::<u8>(),
    ) {
        let mut state = machine();
        let addr = slot * 4;

        state.write_data_word(addr, word);
        prop_assert_eq!(state.read_data_word(addr), word);
        state.write_data_halfword(addr + 2, half);
        prop_assert_eq!(state.read_data_halfword(addr + 2), half);
        state.write_data_byte(addr + 1, byte);
        prop_assert_eq!(state.read_data_byte(addr + 1), byte);

        let [low, _, _, _] = word.to_le_bytes();
        let [half_low, half_high] = half.to_le_bytes();
        let expected = u32::from_le_bytes([low, byte, half_low, half_high]);
        prop_assert_eq!(state.read_data_word(addr), expected);
        prop_assert_eq!(state.latched_fault(), None);
    }

    #[test]
    fn out_of_bounds_wins_over_misalignment(addr in (REGION_END - 3)..u32::MAX) {
        let mem = Memory::try_new(REGION_BYTES).expect("small allocation");
        prop_assert_eq!(mem.read_word(addr), Err(FaultCode::OutOfBounds));
    }

    #[test]
    fn misaligned_in_bounds_word_is_rejected(slot in 0u32..15, offset in 1u32..4) {
        let mem = Memory::try_new(REGION_BYTES).expect("small allocation");
        prop_assert_eq!(mem.read_word(slot * 4 + offset), Err(FaultCode::Misaligned));
    }

    #[test]
    fn data_fault_latches_and_reads_zero(addr in REGION_END..u32::MAX) {
        let mut state = machine();
        prop_assert_eq!(state.read_data_word(addr), 0);
        prop_assert_eq!(state.latched_fault(), Some(FaultCode::OutOfBounds));
        prop_assert!(state.should_halt());
    }

    #[test]
    fn executed_instruction_never_writes_x0(
        funct3 in 0u8..8,
        alt in any::<bool>(),
        rs1 in 0u8..32,
        rs2 in 0u8..32,
        a in any::<u32>(),
        b in any::<u32>(),
    ) {
        let funct7 = if alt { 0x20 } else { 0x00 };
        let mut state = machine();
        state.load_program(&[r_type(funct7, rs2, rs1, funct3, 0)]);
        if rs1 != 0 {
            state.set_register(usize::from(rs1), a).expect("valid index");
        }
        if rs2 != 0 && rs2 != rs1 {
            state.set_register(usize::from(rs2), b).expect("valid index");
        }
        let mut ctl = Controller::with_sink(state, NullTraceSink);
        let _ = ctl.step();
        prop_assert_eq!(ctl.state().get_register(0), Ok(0));
    }

    #[test]
    fn sra_matches_signed_shift(a in any::<u32>(), b in any::<u32>()) {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
        let expected = ((a as i32) >> (b & 0x1F)) as u32;
        prop_assert_eq!(evaluate(AluOp::Sra, a, b), expected);
    }

    #[test]
    fn shifts_only_use_low_five_bits(a in any::<u32>(), b in any::<u32>()) {
        prop_assert_eq!(evaluate(AluOp::Sll, a, b), evaluate(AluOp::Sll, a, b & 0x1F));
        prop_assert_eq!(evaluate(AluOp::Srl, a, b), evaluate(AluOp::Srl, a, b & 0x1F));
    }

    #[test]
    fn add_then_sub_restores_operand(a in any::<u32>(), b in any::<u32>()) {
        let sum = evaluate(AluOp::Add, a, b);
        prop_assert_eq!(evaluate(AluOp::Sub, sum, b), a);
    }

    #[test]
    fn step_outcome_matches_classification(word in any::<u32>()) {
        let raw = (word & !0x7F) | 0x33;
        let instr = Decoder::decode(raw);
        let mut state = machine();
        state.load_program(&[raw]);
        let mut ctl = Controller::with_sink(state, NullTraceSink);

        let outcome = ctl.step();

        match classify_r_type(instr.funct3, instr.funct7) {
            Some(op) => prop_assert!(matches!(outcome, StepOutcome::Retired { op: got, .. } if got == op), "expected Retired {{ op: {:?} }}, got {:?}", op, outcome),
            None => prop_assert_eq!(
                outcome,
                StepOutcome::Fault { cause: FaultCode::UnknownFunction }
            ),
        }
        prop_assert_eq!(ctl.state().instruction_count(), 1);
    }
}
