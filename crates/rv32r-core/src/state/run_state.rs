use crate::FaultCode;

/// Execution-state machine for host-observable control flow.
///
/// `Running` doubles as the ready state; there is no separate pre-execution
/// phase. Both non-running states are terminal until an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to fetch the next instruction.
    #[default]
    Running,
    /// Stopped by the halt word, the PC bounds check, or a host request.
    Halted,
    /// Stopped by a memory or execute fault.
    FaultLatched(FaultCode),
}

impl RunState {
    /// Returns the currently latched fault, if this state is fault-latched.
    #[must_use]
    pub const fn latched_fault(self) -> Option<FaultCode> {
        match self {
            Self::FaultLatched(cause) => Some(cause),
            Self::Running | Self::Halted => None,
        }
    }

    /// Returns `true` for either terminal state.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        !matches!(self, Self::Running)
    }
}
