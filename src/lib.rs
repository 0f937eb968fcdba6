//! Emulator core for the BEVM, a small accumulator machine with 16-bit words.
//!
//! A [`Machine`] owns the register file and memory (together the [`Cpu`]) and drives
//! any [`InstructionSet`] through its fetch-decode-execute loop until an instruction
//! returns [`Outcome::Halt`].

pub mod config;
pub mod constants;
pub mod display;
pub mod errors;
pub mod instructions;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod snapshot;
pub mod utils;
pub mod word;


pub use config::{IpWrap, MachineConfig};
pub use errors::{Error, Result};
pub use instructions::basic::{BasicInstruction, BasicInstructionSet};
pub use instructions::{Instruction, InstructionSet, Outcome};
pub use machine::{Cpu, Machine, RunExit, TraceStep};
pub use memory::Memory;
pub use registers::{Flag, Registers};
pub use word::Word;
