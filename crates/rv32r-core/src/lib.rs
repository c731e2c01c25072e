//! Fetch-decode-execute emulator core for the RV32 R-type integer subset.

/// Fault taxonomy for conditions that halt the machine.
pub mod fault;
pub use fault::{FaultClass, FaultCode};

/// Memory regions with bounds/alignment enforcement.
pub mod memory;
pub use memory::{
    validate_byte_access, validate_halfword_access, validate_word_access, Memory,
    HALFWORD_ACCESS_BYTES, WORD_ACCESS_BYTES,
};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{
    register_abi_name, RegisterError, RegisterFile, RunState, GENERAL_REGISTER_COUNT,
};

/// Opcode and R-type function classification tables.
pub mod encoding;
pub use encoding::{
    classify_r_type, AluOp, FUNCT7_ALT, FUNCT7_BASE, OPCODE_R_TYPE, R_TYPE_ENCODING_TABLE,
};

/// Instruction decode with field extraction and format classification.
pub mod decoder;
pub use decoder::{
    extract_funct3, extract_funct7, extract_opcode, extract_rd, extract_rs1, extract_rs2,
    instruction_format, DecodedInstruction, Decoder, InstructionFormat,
};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    LoadError, MachineConfig, MachineState, MemoryRegionKind, NullTraceSink, ProvisionError,
    RunOutcome, StepOutcome, TraceEvent, TraceSink, DEFAULT_DATA_MEMORY_BYTES,
    DEFAULT_INSTRUCTION_MEMORY_BYTES, HALT_WORD, MAX_REGION_BYTES,
};

/// Instruction execution engine.
pub mod execute;
pub use execute::{evaluate, execute_instruction, resolve_operation, ExecuteOutcome};

/// Execution controller driving the fetch/decode/execute loop.
pub mod controller;
pub use controller::{run_until_halt, step_one, Controller};
