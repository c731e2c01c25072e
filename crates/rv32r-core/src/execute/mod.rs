//! Instruction execution engine for the R-type subset.
//!
//! Execution is precise: an instruction either commits its destination
//! register write and advances PC by 4, or latches a fault and changes
//! neither.

mod alu;

pub use alu::evaluate;

use tracing::debug;

use crate::decoder::{DecodedInstruction, InstructionFormat};
use crate::encoding::{classify_r_type, OPCODE_R_TYPE};
use crate::{AluOp, FaultCode, MachineState, RegisterError};

/// Outcome of executing a single decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecuteOutcome {
    /// Result committed and PC advanced.
    Retired {
        /// Operation performed.
        op: AluOp,
        /// Destination register index.
        rd: u8,
        /// Computed result.
        value: u32,
    },
    /// Fault latched; no register or PC change.
    Fault {
        /// Fault code.
        cause: FaultCode,
    },
}

/// Resolves the ALU operation for a decoded instruction.
///
/// Both `opcode` and `format` must name the R-type class; a hand-built
/// instruction whose fields disagree is treated as an unknown opcode.
///
/// # Errors
///
/// Returns [`FaultCode::UnknownOpcode`] for non-R-type instructions and
/// [`FaultCode::UnknownFunction`] for unassigned `funct3`/`funct7` pairs.
pub fn resolve_operation(instr: &DecodedInstruction) -> Result<AluOp, FaultCode> {
    if instr.opcode != OPCODE_R_TYPE || instr.format != InstructionFormat::RType {
        return Err(FaultCode::UnknownOpcode);
    }
    classify_r_type(instr.funct3, instr.funct7).ok_or(FaultCode::UnknownFunction)
}

fn compute(
    instr: &DecodedInstruction,
    state: &mut MachineState,
) -> Result<(AluOp, u32), FaultCode> {
    let op = resolve_operation(instr)?;
    let rs1 = state.read_source(instr.rs1).map_err(register_fault)?;
    let rs2 = state.read_source(instr.rs2).map_err(register_fault)?;
    let value = evaluate(op, rs1, rs2);
    state
        .write_destination(instr.rd, value)
        .map_err(register_fault)?;
    Ok((op, value))
}

fn register_fault(err: RegisterError) -> FaultCode {
    debug!(%err, "instruction names an invalid register");
    FaultCode::InvalidRegister
}

/// Executes one decoded instruction against machine state.
///
/// On success the result is written to `rd` (subject to the `x0` rule) and
/// PC advances by 4. On failure the fault is latched and nothing else changes;
/// register indices outside `x0..=x31` latch [`FaultCode::InvalidRegister`].
pub fn execute_instruction(
    instr: &DecodedInstruction,
    state: &mut MachineState,
) -> ExecuteOutcome {
    match compute(instr, state) {
        Ok((op, value)) => {
            state.advance_pc();
            ExecuteOutcome::Retired {
                op,
                rd: instr.rd,
                value,
            }
        }
        Err(cause) => {
            state.latch_fault(cause);
            ExecuteOutcome::Fault { cause }
        }
    }
}
