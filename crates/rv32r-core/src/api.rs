//! Public host-facing API for embedding the emulator core.
//!
//! [`MachineState`] is the single owned aggregate a driver, loader, or dump
//! collaborator works against. Memory faults raised through its accessors
//! degrade the machine to [`RunState::FaultLatched`] instead of returning
//! errors; host-level failures (provisioning, loading, register indices) are
//! returned as error values and never halt the machine.

use std::collections::TryReserveError;
use std::fmt;
use std::io::Read;

use thiserror::Error;
use tracing::{debug, warn};

use crate::{AluOp, FaultCode, Memory, RegisterError, RegisterFile, RunState};

/// Default instruction memory size (64 KiB).
pub const DEFAULT_INSTRUCTION_MEMORY_BYTES: usize = 64 * 1024;
/// Default data memory size (64 KiB).
pub const DEFAULT_DATA_MEMORY_BYTES: usize = 64 * 1024;
/// Largest region addressable by a 32-bit address.
pub const MAX_REGION_BYTES: u64 = 1 << 32;

/// The all-zero instruction word that stops execution.
pub const HALT_WORD: u32 = 0x0000_0000;

/// Top-level immutable configuration for a machine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineConfig {
    /// Instruction memory size in bytes.
    pub instruction_memory_bytes: usize,
    /// Data memory size in bytes.
    pub data_memory_bytes: usize,
    /// Optional ceiling on instructions executed by a single `run` call.
    pub instruction_limit: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            instruction_memory_bytes: DEFAULT_INSTRUCTION_MEMORY_BYTES,
            data_memory_bytes: DEFAULT_DATA_MEMORY_BYTES,
            instruction_limit: None,
        }
    }
}

/// Identifies one of the two disjoint memory regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MemoryRegionKind {
    /// Instruction memory (fetch only from the core's point of view).
    Instruction,
    /// Data memory.
    Data,
}

impl fmt::Display for MemoryRegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instruction => f.write_str("instruction"),
            Self::Data => f.write_str("data"),
        }
    }
}

/// Resource provisioning failure at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// The allocator refused the backing store.
    #[error("failed to allocate {bytes} bytes of {region} memory")]
    Allocation {
        /// Region being allocated.
        region: MemoryRegionKind,
        /// Requested size in bytes.
        bytes: usize,
        /// Allocator failure.
        #[source]
        source: TryReserveError,
    },
    /// The requested size cannot be addressed with 32-bit addresses.
    #[error("{region} memory of {bytes} bytes exceeds the 32-bit address space")]
    RegionTooLarge {
        /// Region being allocated.
        region: MemoryRegionKind,
        /// Requested size in bytes.
        bytes: usize,
    },
}

/// Failure while loading a program image from an external byte source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Image does not fit into instruction memory.
    #[error("program image of {size} bytes exceeds {capacity} bytes of instruction memory")]
    TooLarge {
        /// Image size in bytes (a lower bound when read from a stream).
        size: usize,
        /// Instruction memory capacity in bytes.
        capacity: usize,
    },
    /// Reading the byte source failed.
    #[error("failed to read program image")]
    Io(#[from] std::io::Error),
}

fn allocate_region(region: MemoryRegionKind, bytes: usize) -> Result<Memory, ProvisionError> {
    if bytes as u64 > MAX_REGION_BYTES {
        return Err(ProvisionError::RegionTooLarge { region, bytes });
    }
    Memory::try_new(bytes).map_err(|source| ProvisionError::Allocation {
        region,
        bytes,
        source,
    })
}

/// Complete machine state: registers, PC, both memories, run state and counter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    registers: RegisterFile,
    pc: u32,
    instruction_memory: Memory,
    data_memory: Memory,
    run_state: RunState,
    instruction_count: u64,
    released: bool,
}

impl MachineState {
    /// Allocates both memory regions and returns a zeroed, running machine.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when either region cannot be provisioned.
    pub fn new(config: &MachineConfig) -> Result<Self, ProvisionError> {
        let instruction_memory =
            allocate_region(MemoryRegionKind::Instruction, config.instruction_memory_bytes)?;
        let data_memory = allocate_region(MemoryRegionKind::Data, config.data_memory_bytes)?;

        Ok(Self {
            registers: RegisterFile::default(),
            pc: 0,
            instruction_memory,
            data_memory,
            run_state: RunState::Running,
            instruction_count: 0,
            released: false,
        })
    }

    /// Clears registers, PC, run state and the instruction counter.
    ///
    /// Memory contents are preserved.
    pub fn reset(&mut self) {
        self.registers.reset();
        self.pc = 0;
        self.run_state = RunState::Running;
        self.instruction_count = 0;
    }

    /// Releases both memory regions. Calling it again is a no-op.
    ///
    /// A released machine keeps running semantics but every access faults
    /// with [`FaultCode::OutOfBounds`].
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.instruction_memory.release();
        self.data_memory.release();
        self.released = true;
        debug!("machine memory released");
    }

    /// Returns `true` once [`Self::release`] has run.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }

    /// Reads a general-purpose register.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::InvalidRegister`] for indices above 31. The
    /// machine keeps running.
    pub fn get_register(&self, index: usize) -> Result<u32, RegisterError> {
        self.registers.get(index).inspect_err(|err| {
            warn!(index, %err, "register read rejected");
        })
    }

    /// Writes a general-purpose register. Writes to `x0` are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::InvalidRegister`] for indices above 31; the
    /// write is dropped and the machine keeps running.
    pub fn set_register(&mut self, index: usize, value: u32) -> Result<(), RegisterError> {
        self.registers.set(index, value).inspect_err(|err| {
            warn!(index, %err, "register write rejected");
        })
    }

    /// Read-only view of the register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u32) {
        self.pc = value;
    }

    /// Number of instructions that reached the execute stage.
    #[must_use]
    pub const fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Returns `true` once the machine has halted or latched a fault.
    #[must_use]
    pub const fn should_halt(&self) -> bool {
        self.run_state.is_halted()
    }

    /// Fault that stopped the machine, if any.
    #[must_use]
    pub const fn latched_fault(&self) -> Option<FaultCode> {
        self.run_state.latched_fault()
    }

    /// Requests a halt. An already latched fault is kept.
    pub fn halt(&mut self) {
        if self.run_state == RunState::Running {
            debug!(pc = self.pc, "machine halted");
            self.run_state = RunState::Halted;
        }
    }

    /// Read-only view of instruction memory for diagnostic collaborators.
    #[must_use]
    pub fn instruction_memory(&self) -> &[u8] {
        self.instruction_memory.as_bytes()
    }

    /// Read-only view of data memory for diagnostic collaborators.
    #[must_use]
    pub fn data_memory(&self) -> &[u8] {
        self.data_memory.as_bytes()
    }

    /// Reads a word from instruction memory; faults halt and yield 0.
    pub fn read_instruction_word(&mut self, addr: u32) -> u32 {
        let result = self.instruction_memory.read_word(addr);
        self.absorb(MemoryRegionKind::Instruction, addr, result)
    }

    /// Fetches the word at the current PC; faults halt and yield 0.
    pub fn fetch_instruction(&mut self) -> u32 {
        self.read_instruction_word(self.pc)
    }

    /// Reads a data word; faults halt and yield 0.
    pub fn read_data_word(&mut self, addr: u32) -> u32 {
        let result = self.data_memory.read_word(addr);
        self.absorb(MemoryRegionKind::Data, addr, result)
    }

    /// Writes a data word; faults halt and drop the write.
    pub fn write_data_word(&mut self, addr: u32, value: u32) {
        let result = self.data_memory.write_word(addr, value);
        self.absorb(MemoryRegionKind::Data, addr, result);
    }

    /// Reads a data halfword; faults halt and yield 0.
    pub fn read_data_halfword(&mut self, addr: u32) -> u16 {
        let result = self.data_memory.read_halfword(addr);
        self.absorb(MemoryRegionKind::Data, addr, result)
    }

    /// Writes a data halfword; faults halt and drop the write.
    pub fn write_data_halfword(&mut self, addr: u32, value: u16) {
        let result = self.data_memory.write_halfword(addr, value);
        self.absorb(MemoryRegionKind::Data, addr, result);
    }

    /// Reads a data byte; faults halt and yield 0.
    pub fn read_data_byte(&mut self, addr: u32) -> u8 {
        let result = self.data_memory.read_byte(addr);
        self.absorb(MemoryRegionKind::Data, addr, result)
    }

    /// Writes a data byte; faults halt and drop the write.
    pub fn write_data_byte(&mut self, addr: u32, value: u8) {
        let result = self.data_memory.write_byte(addr, value);
        self.absorb(MemoryRegionKind::Data, addr, result);
    }

    /// Writes `program` little-endian from instruction address 0 and resets PC.
    ///
    /// Words whose 4-byte span does not fit are skipped silently.
    pub fn load_program(&mut self, program: &[u32]) {
        let mut loaded = 0_usize;
        for (slot, word) in program.iter().enumerate() {
            let Some(addr) = slot
                .checked_mul(4)
                .and_then(|offset| u32::try_from(offset).ok())
            else {
                break;
            };
            if self.instruction_memory.write_word(addr, *word).is_ok() {
                loaded += 1;
            }
        }
        self.pc = 0;
        debug!(words = program.len(), loaded, "program loaded");
    }

    /// Copies a raw image into instruction memory from address 0 and resets PC.
    ///
    /// Returns the number of bytes copied.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::TooLarge`] when the image exceeds instruction
    /// memory; memory is untouched in that case.
    pub fn load_binary(&mut self, image: &[u8]) -> Result<usize, LoadError> {
        let capacity = self.instruction_memory.len();
        if image.len() > capacity {
            return Err(LoadError::TooLarge {
                size: image.len(),
                capacity,
            });
        }
        self.instruction_memory.copy_from_start(image);
        self.pc = 0;
        debug!(bytes = image.len(), "binary image loaded");
        Ok(image.len())
    }

    /// Reads a raw image from an external byte source into instruction memory.
    ///
    /// At most one byte beyond capacity is read before rejecting the source.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] when reading fails and [`LoadError::TooLarge`]
    /// when the source holds more bytes than instruction memory.
    pub fn load_binary_from<R: Read>(&mut self, reader: R) -> Result<usize, LoadError> {
        let capacity = self.instruction_memory.len();
        let mut image = Vec::new();
        reader
            .take(capacity as u64 + 1)
            .read_to_end(&mut image)?;
        self.load_binary(&image)
    }

    pub(crate) fn latch_fault(&mut self, cause: FaultCode) {
        if self.run_state == RunState::Running {
            warn!(pc = self.pc, %cause, class = ?cause.class(), "fault latched");
            self.run_state = RunState::FaultLatched(cause);
        }
    }

    pub(crate) const fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(4);
    }

    pub(crate) const fn count_instruction(&mut self) {
        self.instruction_count += 1;
    }

    pub(crate) fn write_destination(&mut self, rd: u8, value: u32) -> Result<(), RegisterError> {
        self.registers.set(usize::from(rd), value)
    }

    pub(crate) fn read_source(&self, rs: u8) -> Result<u32, RegisterError> {
        self.registers.get(usize::from(rs))
    }

    fn absorb<T: Default>(
        &mut self,
        region: MemoryRegionKind,
        addr: u32,
        result: Result<T, FaultCode>,
    ) -> T {
        result.unwrap_or_else(|cause| {
            debug!(%region, addr, %cause, "memory access faulted");
            self.latch_fault(cause);
            T::default()
        })
    }
}

/// Output status from one controller step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction executed and committed.
    Retired {
        /// Operation performed.
        op: AluOp,
        /// Destination register index.
        rd: u8,
        /// Computed result (discarded when `rd == 0`).
        value: u32,
    },
    /// The halt word was fetched, or the PC bounds check stopped the machine.
    Halted,
    /// A fetch or execute fault was latched.
    Fault {
        /// Canonical fault code.
        cause: FaultCode,
    },
    /// The machine was already halted; nothing happened.
    AlreadyHalted,
}

/// Aggregated outcome from running until halt or the instruction limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Instructions that reached the execute stage during this call.
    pub steps: u64,
    /// Last step-level status observed before returning.
    ///
    /// `None` when the instruction limit stopped the call before any step ran.
    pub final_step: Option<StepOutcome>,
    /// `true` when the call stopped at the instruction limit, not at a halt.
    pub limit_reached: bool,
}

/// Trace events emitted by the controller after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// A non-halt instruction word was fetched.
    InstructionFetched {
        /// Program counter used for this fetch.
        pc: u32,
        /// Raw 32-bit instruction word.
        raw_word: u32,
    },
    /// An instruction committed its result.
    InstructionRetired {
        /// Program counter of the retired instruction.
        pc: u32,
        /// Operation performed.
        op: AluOp,
        /// Destination register index.
        rd: u8,
        /// Computed result.
        value: u32,
    },
    /// The machine halted without a fault.
    Halted {
        /// Program counter at the halt.
        pc: u32,
    },
    /// A fault was latched.
    FaultRaised {
        /// Canonical fault code.
        cause: FaultCode,
        /// Program counter active when the fault was observed.
        pc: u32,
    },
}

/// Sink trait for the controller's observer hook.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn on_event(&mut self, _event: TraceEvent) {}
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
