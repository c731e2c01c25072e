//! Architectural CPU state model primitives.

/// General-purpose register file.
pub mod registers;
/// Run-state machine.
pub mod run_state;

pub use registers::{register_abi_name, RegisterError, RegisterFile, GENERAL_REGISTER_COUNT};
pub use run_state::RunState;
