#![no_main]

use libfuzzer_sys::fuzz_target;
use rv32r_core::{
    validate_byte_access, validate_halfword_access, validate_word_access, Decoder, MachineConfig,
    MachineState, NullTraceSink,
};

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let word = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let addr = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);

    let decoded = Decoder::decode(word);
    if decoded.opcode == 0x33 {
        assert_eq!(decoded.encode(), word);
    }

    let config = MachineConfig {
        instruction_memory_bytes: 64,
        data_memory_bytes: 64,
        instruction_limit: Some(32),
    };
    let Ok(mut state) = MachineState::new(&config) else {
        return;
    };
    let _ = state.load_binary(&data[8..data.len().min(72)]);
    state.set_pc(addr & 0x7F);
    let _ = rv32r_core::run_until_halt(&mut state, &mut NullTraceSink, Some(32));
    assert!(state.instruction_count() <= 32);
    assert_eq!(state.get_register(0), Ok(0));

    let _ = state.read_data_word(addr);
    let _ = state.read_data_halfword(addr);
    let _ = state.read_data_byte(addr);

    let _ = validate_word_access(addr, 64);
    let _ = validate_halfword_access(addr, 64);
    let _ = validate_byte_access(addr, 64);
});
