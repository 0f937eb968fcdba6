//! The seam between the engine and an instruction set.
//!
//! Decoding and execution are two separate calls so a tracer can look at the decoded
//! instruction before it has any effect.

use std::fmt;

use crate::errors::Result;
use crate::machine::Cpu;
use crate::word::Word;

pub mod basic;

/// What the engine should do after an instruction ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Halt,
}

pub trait Instruction: fmt::Display {
    /// Applies the instruction. Any error aborts the run with the machine left as is.
    fn execute(&self, cpu: &mut Cpu) -> Result<Outcome>;
}

pub trait InstructionSet {
    type Instruction: Instruction;

    /// Decodes `opcode`. Formats with operand words may read them through `cpu`.
    fn parse(&self, opcode: Word, cpu: &mut Cpu) -> Result<Self::Instruction>;
}
