use crate::config::{IpWrap, MachineConfig};
use crate::errors::{Error, Result};
use crate::instructions::{Instruction, InstructionSet, Outcome};
use crate::memory::Memory;
use crate::registers::Registers;
use crate::word::Word;

const MAX_MEMORY_SIZE:usize = 1 << crate::constants::WORD_BITS;

/// Everything an instruction may touch: registers, flags and memory.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub registers: Registers,
    pub memory: Memory,
    ip_wrap: IpWrap,
}

impl Cpu {
    /// Memory must hold between one cell and the full 2^16 address space.
    pub fn new(memory_size: usize, ip_wrap: IpWrap) -> Result<Self> {
        if memory_size == 0 || memory_size > MAX_MEMORY_SIZE {
            return Err(Error::MemorySize(memory_size));
        }
        Ok(Cpu::build(memory_size, ip_wrap))
    }

    fn build(memory_size: usize, ip_wrap: IpWrap) -> Self {
        Cpu {
            registers: Registers::new(),
            memory: Memory::new(memory_size),
            ip_wrap,
        }
    }

    /// Bus read: AR takes `address`, the cell is fetched and DR takes its value.
    pub fn read_bus(&mut self, address: Word) -> Result<Word> {
        self.registers.address = address;
        let value = self.memory.get(address.to_unsigned()? as usize)?;
        self.registers.data = value;
        Ok(value)
    }

    /// Bus write: AR takes `address` and DR takes `value` before the cell is stored.
    pub fn write_bus(&mut self, address: Word, value: Word) -> Result<()> {
        self.registers.address = address;
        self.registers.data = value;
        self.memory.set(address.to_unsigned()? as usize, value)
    }

    /// The address following `pointer`, wrapped per the configured `IpWrap`.
    pub fn advance(&self, pointer: Word) -> Result<Word> {
        match self.ip_wrap {
            IpWrap::Word => pointer.increment(),
            IpWrap::Memory => {
                let next = (pointer.to_unsigned()? as usize + 1) % self.memory.size();
                Ok(Word::from_unsigned(next as u32))
            }
        }
    }
}

/// How a run ended. Errors are reported separately through `Err`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunExit {
    Halted { steps: u64 },
    StepLimit { steps: u64 },
}

/// What a trace observer sees: one decoded instruction about to execute.
pub struct TraceStep<'a, I> {
    /// Address the opcode was fetched from.
    pub address: u16,
    pub opcode: Word,
    pub instruction: &'a I,
    pub registers: &'a Registers,
}

pub struct Machine<S> {
    instructions: S,
    cpu: Cpu,
    step_limit: Option<u64>,
}

impl<S: InstructionSet> Machine<S> {
    pub fn new(instructions: S) -> Self {
        let config = MachineConfig::default();
        Machine {
            instructions,
            cpu: Cpu::build(config.memory_size, config.ip_wrap),
            step_limit: config.step_limit,
        }
    }

    pub fn with_config(instructions: S, config: MachineConfig) -> Result<Self> {
        Ok(Machine {
            instructions,
            cpu: Cpu::new(config.memory_size, config.ip_wrap)?,
            step_limit: config.step_limit,
        })
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn registers(&self) -> &Registers {
        &self.cpu.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.cpu.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.cpu.memory
    }

    pub fn peek(&self, address: usize) -> Result<u16> {
        self.cpu.memory.get(address)?.to_unsigned()
    }

    pub fn is_running(&self) -> bool {
        self.cpu.registers.running().unwrap_or(false)
    }

    /// Runs from `address` until an instruction halts.
    ///
    /// The caller checks `address` against the memory size. Without a step limit a
    /// program that never halts never returns.
    pub fn run_at(&mut self, address: u16) -> Result<RunExit> {
        self.drive(address, |_| {})
    }

    /// Same as `run_at`, calling `observer` after each decode and before each execute.
    pub fn trace<F>(&mut self, address: u16, observer: F) -> Result<RunExit>
    where
        F: FnMut(&TraceStep<'_, S::Instruction>),
    {
        self.drive(address, observer)
    }

    /// One fetch-decode-execute cycle at the current instruction pointer.
    pub fn step(&mut self) -> Result<Outcome> {
        self.step_with(&mut |_: &TraceStep<'_, S::Instruction>| {})
    }

    fn drive<F>(&mut self, address: u16, mut observer: F) -> Result<RunExit>
    where
        F: FnMut(&TraceStep<'_, S::Instruction>),
    {
        self.cpu.registers.set_running(true)?;
        self.cpu.registers.instruction_pointer = Word::from(address);
        tracing::debug!(address, "run started");

        let mut steps:u64 = 0;
        loop {
            if let Some(limit) = self.step_limit {
                if steps >= limit {
                    self.cpu.registers.set_running(false)?;
                    tracing::warn!(steps, "step limit reached, stopping run");
                    return Ok(RunExit::StepLimit { steps });
                }
            }
            let outcome = self.step_with(&mut observer)?;
            steps += 1;
            if outcome == Outcome::Halt {
                break;
            }
        }

        self.cpu.registers.set_running(false)?;
        tracing::debug!(steps, "halted");
        Ok(RunExit::Halted { steps })
    }

    fn step_with<F>(&mut self, observer: &mut F) -> Result<Outcome>
    where
        F: FnMut(&TraceStep<'_, S::Instruction>),
    {
        let ip = self.cpu.registers.instruction_pointer;
        self.cpu.registers.buffer = ip;
        let opcode = self.cpu.read_bus(ip)?;
        self.cpu.registers.command = opcode;
        self.cpu.registers.instruction_pointer = self.cpu.advance(ip)?;

        let instruction = self.instructions.parse(opcode, &mut self.cpu)?;
        let address = ip.to_unsigned()?;
        tracing::trace!(address, %opcode, %instruction, "step");

        observer(&TraceStep {
            address,
            opcode,
            instruction: &instruction,
            registers: &self.cpu.registers,
        });
        instruction.execute(&mut self.cpu)
    }
}
