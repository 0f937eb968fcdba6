//! A reduced BEVM instruction set, enough to run real images from the command line.
//!
//! Encodings:
//! - `0000 xxxx xxxx xxxx`: no-address commands (NOP, HLT, CLA, ...).
//! - `oooo 0aaa aaaa aaaa`: address command on the absolute address `a`.
//! - `oooo 1111 iiii iiii`: address command on the sign-extended immediate `i`.
//! - `1111 cccc dddd dddd`: branch on condition `c` by the signed displacement `d`.

use std::fmt;

use crate::errors::{Error, Result};
use crate::instructions::{Instruction, InstructionSet, Outcome};
use crate::machine::Cpu;
use crate::utils::{sign_extend_byte, truncate};
use crate::word::Word;

const NOP:u16 = 0x0000;
const HLT:u16 = 0x0100;
const CLA:u16 = 0x0200;
const NOT:u16 = 0x0280;
const CLC:u16 = 0x0300;
const CMC:u16 = 0x0380;
const ROL:u16 = 0x0400;
const ROR:u16 = 0x0480;
const INC:u16 = 0x0700;
const DEC:u16 = 0x0740;
const NEG:u16 = 0x0780;
const POP:u16 = 0x0800;
const PUSH:u16 = 0x0C00;

const AND_OP:u16 = 0x2;
const OR_OP:u16 = 0x3;
const ADD_OP:u16 = 0x4;
const ADC_OP:u16 = 0x5;
const SUB_OP:u16 = 0x6;
const CMP_OP:u16 = 0x7;
const LD_OP:u16 = 0xA;
const JUMP_OP:u16 = 0xC;
const ST_OP:u16 = 0xE;
const BRANCH_OP:u16 = 0xF;

const ADDRESS_MASK:u16 = 0x07FF;
const INDIRECT_BIT:u16 = 0x0800;
const IMMEDIATE_MODE:u16 = 0x0F00;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Absolute(u16),
    /// Already sign-extended to a full word.
    Immediate(u16),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    And,
    Or,
    Add,
    Adc,
    Sub,
    Cmp,
    Ld,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Eq,
    Ne,
    Mi,
    Pl,
    Cs,
    Cc,
    Vs,
    Vc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BasicInstruction {
    Nop,
    Hlt,
    Cla,
    Not,
    Clc,
    Cmc,
    Rol,
    Ror,
    Inc,
    Dec,
    Neg,
    Pop,
    Push,
    Alu(AluOp, Operand),
    Jump(u16),
    Store(u16),
    Branch(Condition, u16),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BasicInstructionSet;

impl BasicInstructionSet {
    pub fn decode(&self, raw: u16) -> Result<BasicInstruction> {
        use BasicInstruction::*;

        let op = raw >> 12;
        let instruction = match op {
            0x0 => match raw {
                NOP => Nop,
                HLT => Hlt,
                CLA => Cla,
                NOT => Not,
                CLC => Clc,
                CMC => Cmc,
                ROL => Rol,
                ROR => Ror,
                INC => Inc,
                DEC => Dec,
                NEG => Neg,
                POP => Pop,
                PUSH => Push,
                _ => return Err(Error::UnknownOpcode(raw)),
            },
            BRANCH_OP => {
                let condition = match (raw >> 8) & 0xF {
                    0x0 => Condition::Eq,
                    0x1 => Condition::Ne,
                    0x2 => Condition::Mi,
                    0x3 => Condition::Pl,
                    0x4 => Condition::Cs,
                    0x5 => Condition::Cc,
                    0x6 => Condition::Vs,
                    0x7 => Condition::Vc,
                    _ => return Err(Error::UnknownOpcode(raw)),
                };
                Branch(condition, sign_extend_byte(raw))
            }
            JUMP_OP | ST_OP => {
                if raw & INDIRECT_BIT != 0 {
                    return Err(Error::UnknownOpcode(raw));
                }
                let address = raw & ADDRESS_MASK;
                if op == JUMP_OP {
                    Jump(address)
                } else {
                    Store(address)
                }
            }
            _ => {
                let alu = match op {
                    AND_OP => AluOp::And,
                    OR_OP => AluOp::Or,
                    ADD_OP => AluOp::Add,
                    ADC_OP => AluOp::Adc,
                    SUB_OP => AluOp::Sub,
                    CMP_OP => AluOp::Cmp,
                    LD_OP => AluOp::Ld,
                    _ => return Err(Error::UnknownOpcode(raw)),
                };
                Alu(alu, decode_operand(raw)?)
            }
        };
        Ok(instruction)
    }
}

fn decode_operand(raw: u16) -> Result<Operand> {
    if raw & INDIRECT_BIT == 0 {
        Ok(Operand::Absolute(raw & ADDRESS_MASK))
    } else if raw & IMMEDIATE_MODE == IMMEDIATE_MODE {
        Ok(Operand::Immediate(sign_extend_byte(raw)))
    } else {
        Err(Error::UnknownOpcode(raw))
    }
}

impl InstructionSet for BasicInstructionSet {
    type Instruction = BasicInstruction;

    fn parse(&self, opcode: Word, _cpu: &mut Cpu) -> Result<BasicInstruction> {
        self.decode(opcode.to_unsigned()?)
    }
}

/// AC + `b` + `carry_in`, setting C, V, N and Z. Returns the sum without storing it.
fn add(cpu: &mut Cpu, b: u16, carry_in: bool) -> Result<u16> {
    let a = cpu.registers.accumulator.to_unsigned()?;
    let wide = a as u32 + b as u32 + carry_in as u32;
    let sum = truncate(wide);
    let overflow = (a ^ sum) & (b ^ sum) & 0x8000 != 0;
    cpu.registers.set_carry(wide > 0xFFFF)?;
    cpu.registers.set_overflow(overflow)?;
    cpu.registers.recalc_from(Word::from(sum))?;
    Ok(sum)
}

fn store_accumulator(cpu: &mut Cpu, value: u16) -> Result<()> {
    cpu.registers.accumulator = Word::from(value);
    cpu.registers.recalc_from_accumulator()
}

fn load_logical(cpu: &mut Cpu, value: u16) -> Result<()> {
    store_accumulator(cpu, value)?;
    cpu.registers.set_overflow(false)
}

fn read_operand(cpu: &mut Cpu, operand: Operand) -> Result<u16> {
    match operand {
        Operand::Absolute(address) => cpu.read_bus(Word::from(address))?.to_unsigned(),
        Operand::Immediate(value) => Ok(value),
    }
}

impl Condition {
    fn holds(self, cpu: &Cpu) -> Result<bool> {
        let r = &cpu.registers;
        Ok(match self {
            Condition::Eq => r.zero()?,
            Condition::Ne => !r.zero()?,
            Condition::Mi => r.sign()?,
            Condition::Pl => !r.sign()?,
            Condition::Cs => r.carry()?,
            Condition::Cc => !r.carry()?,
            Condition::Vs => r.overflow()?,
            Condition::Vc => !r.overflow()?,
        })
    }

    fn mnemonic(self) -> &'static str {
        match self {
            Condition::Eq => "BEQ",
            Condition::Ne => "BNE",
            Condition::Mi => "BMI",
            Condition::Pl => "BPL",
            Condition::Cs => "BCS",
            Condition::Cc => "BCC",
            Condition::Vs => "BVS",
            Condition::Vc => "BVC",
        }
    }
}

impl Instruction for BasicInstruction {
    fn execute(&self, cpu: &mut Cpu) -> Result<Outcome> {
        use BasicInstruction::*;

        match *self {
            Nop => {}
            Hlt => return Ok(Outcome::Halt),
            Cla => load_logical(cpu, 0)?,
            Not => {
                let ac = cpu.registers.accumulator.to_unsigned()?;
                load_logical(cpu, !ac)?;
            }
            Clc => cpu.registers.set_carry(false)?,
            Cmc => {
                let carry = cpu.registers.carry()?;
                cpu.registers.set_carry(!carry)?;
            }
            Rol | Ror => {
                let ac = cpu.registers.accumulator.to_unsigned()?;
                let carry_in = cpu.registers.carry()? as u16;
                let (value, carry_out) = if *self == Rol {
                    ((ac << 1) | carry_in, ac & 0x8000 != 0)
                } else {
                    ((ac >> 1) | (carry_in << 15), ac & 1 != 0)
                };
                store_accumulator(cpu, value)?;
                cpu.registers.set_carry(carry_out)?;
                let sign = cpu.registers.sign()?;
                cpu.registers.set_overflow(sign ^ carry_out)?;
            }
            Inc => {
                let sum = add(cpu, 1, false)?;
                cpu.registers.accumulator = Word::from(sum);
            }
            Dec => {
                let sum = add(cpu, 0xFFFF, false)?;
                cpu.registers.accumulator = Word::from(sum);
            }
            Neg => {
                let ac = cpu.registers.accumulator.to_unsigned()?;
                cpu.registers.accumulator = Word::from(!ac);
                let sum = add(cpu, 1, false)?;
                cpu.registers.accumulator = Word::from(sum);
            }
            Push => {
                let sp = cpu.registers.stack_pointer.decrement()?;
                cpu.registers.stack_pointer = sp;
                let ac = cpu.registers.accumulator;
                cpu.write_bus(sp, ac)?;
            }
            Pop => {
                let sp = cpu.registers.stack_pointer;
                let value = cpu.read_bus(sp)?.to_unsigned()?;
                cpu.registers.stack_pointer = sp.increment()?;
                store_accumulator(cpu, value)?;
            }
            Alu(op, operand) => {
                let m = read_operand(cpu, operand)?;
                match op {
                    AluOp::And => {
                        let ac = cpu.registers.accumulator.to_unsigned()?;
                        load_logical(cpu, ac & m)?;
                    }
                    AluOp::Or => {
                        let ac = cpu.registers.accumulator.to_unsigned()?;
                        load_logical(cpu, ac | m)?;
                    }
                    AluOp::Ld => load_logical(cpu, m)?,
                    AluOp::Add | AluOp::Adc | AluOp::Sub => {
                        let sum = match op {
                            AluOp::Add => add(cpu, m, false)?,
                            AluOp::Adc => {
                                let carry = cpu.registers.carry()?;
                                add(cpu, m, carry)?
                            }
                            _ => add(cpu, !m, true)?,
                        };
                        cpu.registers.accumulator = Word::from(sum);
                    }
                    AluOp::Cmp => {
                        add(cpu, !m, true)?;
                    }
                }
            }
            Jump(address) => cpu.registers.instruction_pointer = Word::from(address),
            Store(address) => {
                let ac = cpu.registers.accumulator;
                cpu.write_bus(Word::from(address), ac)?;
            }
            Branch(condition, displacement) => {
                if condition.holds(cpu)? {
                    let ip = cpu.registers.instruction_pointer.to_unsigned()?;
                    cpu.registers.instruction_pointer = Word::from(ip.wrapping_add(displacement));
                }
            }
        }
        Ok(Outcome::Continue)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Absolute(address) => write!(f, "0x{:03X}", address),
            Operand::Immediate(value) => write!(f, "#0x{:02X}", value & 0xFF),
        }
    }
}

impl fmt::Display for BasicInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use BasicInstruction::*;

        match self {
            Nop => write!(f, "NOP"),
            Hlt => write!(f, "HLT"),
            Cla => write!(f, "CLA"),
            Not => write!(f, "NOT"),
            Clc => write!(f, "CLC"),
            Cmc => write!(f, "CMC"),
            Rol => write!(f, "ROL"),
            Ror => write!(f, "ROR"),
            Inc => write!(f, "INC"),
            Dec => write!(f, "DEC"),
            Neg => write!(f, "NEG"),
            Pop => write!(f, "POP"),
            Push => write!(f, "PUSH"),
            Alu(op, operand) => {
                let name = match op {
                    AluOp::And => "AND",
                    AluOp::Or => "OR",
                    AluOp::Add => "ADD",
                    AluOp::Adc => "ADC",
                    AluOp::Sub => "SUB",
                    AluOp::Cmp => "CMP",
                    AluOp::Ld => "LD",
                };
                write!(f, "{} {}", name, operand)
            }
            Jump(address) => write!(f, "JUMP 0x{:03X}", address),
            Store(address) => write!(f, "ST 0x{:03X}", address),
            Branch(condition, displacement) => {
                write!(f, "{} IP{:+}", condition.mnemonic(), *displacement as i16)
            }
        }
    }
}
