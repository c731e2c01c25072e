//! Fetch → decode → execute loop with halt detection and instruction counting.

use tracing::{debug, trace};

use crate::execute::{execute_instruction, ExecuteOutcome};
use crate::{
    Decoder, MachineConfig, MachineState, NullTraceSink, ProvisionError, RunOutcome, StepOutcome,
    TraceEvent, TraceSink, HALT_WORD,
};

/// Executes one fetch/decode/execute cycle.
///
/// A halted machine is left untouched. A faulting fetch or the halt word
/// stop the machine without counting; any word that reaches execute counts
/// exactly once, even if execution then faults.
pub fn step_one(state: &mut MachineState, sink: &mut dyn TraceSink) -> StepOutcome {
    if state.should_halt() {
        return StepOutcome::AlreadyHalted;
    }

    let pc = state.pc();
    let raw_word = state.fetch_instruction();

    if let Some(cause) = state.latched_fault() {
        sink.on_event(TraceEvent::FaultRaised { cause, pc });
        return StepOutcome::Fault { cause };
    }

    if raw_word == HALT_WORD {
        state.halt();
        sink.on_event(TraceEvent::Halted { pc });
        return StepOutcome::Halted;
    }

    sink.on_event(TraceEvent::InstructionFetched { pc, raw_word });

    let instr = Decoder::decode(raw_word);
    let outcome = execute_instruction(&instr, state);
    state.count_instruction();

    match outcome {
        ExecuteOutcome::Retired { op, rd, value } => {
            trace!(pc, op = op.mnemonic(), rd, value, "retired");
            sink.on_event(TraceEvent::InstructionRetired { pc, op, rd, value });
            StepOutcome::Retired { op, rd, value }
        }
        ExecuteOutcome::Fault { cause } => {
            sink.on_event(TraceEvent::FaultRaised { cause, pc });
            StepOutcome::Fault { cause }
        }
    }
}

/// Steps until the machine halts or `limit` instructions have executed.
///
/// After every step the PC is checked against the end of instruction memory;
/// a PC at or past the end forces a halt.
pub fn run_until_halt(
    state: &mut MachineState,
    sink: &mut dyn TraceSink,
    limit: Option<u64>,
) -> RunOutcome {
    let start_count = state.instruction_count();
    let mut final_step = state.should_halt().then_some(StepOutcome::AlreadyHalted);

    while !state.should_halt() {
        let steps = state.instruction_count() - start_count;
        if limit.is_some_and(|max| steps >= max) {
            debug!(steps, "instruction limit reached");
            return RunOutcome {
                steps,
                final_step,
                limit_reached: true,
            };
        }

        final_step = Some(step_one(state, sink));

        let pc = state.pc();
        if !state.should_halt() && u64::from(pc) >= state.instruction_memory().len() as u64 {
            debug!(pc, "program counter left instruction memory");
            state.halt();
            sink.on_event(TraceEvent::Halted { pc });
            final_step = Some(StepOutcome::Halted);
        }
    }

    RunOutcome {
        steps: state.instruction_count() - start_count,
        final_step,
        limit_reached: false,
    }
}

/// Owns a machine and its observer, driving the execution loop.
#[derive(Debug)]
pub struct Controller<S: TraceSink = NullTraceSink> {
    state: MachineState,
    sink: S,
    instruction_limit: Option<u64>,
}

impl Controller<NullTraceSink> {
    /// Provisions a new machine with a silent observer.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when memory cannot be provisioned.
    pub fn new(config: &MachineConfig) -> Result<Self, ProvisionError> {
        let state = MachineState::new(config)?;
        Ok(Self {
            state,
            sink: NullTraceSink,
            instruction_limit: config.instruction_limit,
        })
    }
}

impl<S: TraceSink> Controller<S> {
    /// Wraps an existing machine with an observer.
    pub const fn with_sink(state: MachineState, sink: S) -> Self {
        Self {
            state,
            sink,
            instruction_limit: None,
        }
    }

    /// Sets the per-`run` instruction ceiling.
    #[must_use]
    pub const fn with_instruction_limit(mut self, limit: Option<u64>) -> Self {
        self.instruction_limit = limit;
        self
    }

    /// Executes a single cycle.
    pub fn step(&mut self) -> StepOutcome {
        step_one(&mut self.state, &mut self.sink)
    }

    /// Runs until halt, honouring the configured instruction limit.
    pub fn run(&mut self) -> RunOutcome {
        run_until_halt(&mut self.state, &mut self.sink, self.instruction_limit)
    }

    /// Runs until halt or until `max_instructions` have executed.
    pub fn run_with_limit(&mut self, max_instructions: u64) -> RunOutcome {
        run_until_halt(&mut self.state, &mut self.sink, Some(max_instructions))
    }

    /// Shared access to the machine.
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Mutable access to the machine for seeding and loading.
    pub const fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    /// Shared access to the observer.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the controller, returning the machine and observer.
    pub fn into_parts(self) -> (MachineState, S) {
        (self.state, self.sink)
    }
}
