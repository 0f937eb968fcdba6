use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::Result;
use crate::word::Word;

/// The BEVM register file. Every slot starts uninitialized.
///
/// `accumulator` and `stack_pointer` belong to the instruction set. The rest are
/// bookkeeping the engine keeps current on every fetch and bus access, exposed so
/// front ends can report them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Registers {
    pub accumulator: Word,
    pub data: Word,
    pub buffer: Word,
    pub command: Word,
    pub program_state: Word,
    pub instruction_pointer: Word,
    pub stack_pointer: Word,
    /// Legacy fetched-opcode staging slot; nothing writes it.
    pub input: Word,
    pub address: Word,
}

/// Named bits of the program state register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    Carry,
    Overflow,
    Zero,
    Sign,
    AllowInterruption,
    Interruption,
    Running,
    Parity,
}

impl Flag {
    pub const ALL: [Flag; 8] = [
        Flag::Carry,
        Flag::Overflow,
        Flag::Zero,
        Flag::Sign,
        Flag::AllowInterruption,
        Flag::Interruption,
        Flag::Running,
        Flag::Parity,
    ];

    pub fn bit(self) -> u32 {
        match self {
            Flag::Carry => CARRY_BIT,
            Flag::Overflow => OVERFLOW_BIT,
            Flag::Zero => ZERO_BIT,
            Flag::Sign => SIGN_FLAG_BIT,
            Flag::AllowInterruption => ALLOW_INTERRUPTION_BIT,
            Flag::Interruption => INTERRUPTION_BIT,
            Flag::Running => RUNNING_BIT,
            Flag::Parity => PARITY_BIT,
        }
    }
}

macro_rules! flag_accessors {
    ($($flag:ident => $get:ident, $set:ident;)*) => {
        $(
            pub fn $get(&self) -> Result<bool> {
                self.flag(Flag::$flag)
            }

            pub fn $set(&mut self, on: bool) -> Result<()> {
                self.set_flag(Flag::$flag, on)
            }
        )*
    };
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one bit of `program_state`.
    pub fn flag(&self, flag: Flag) -> Result<bool> {
        self.program_state.bit(flag.bit())
    }

    /// Read-modify-write of one bit of `program_state`; the other bits keep their values.
    pub fn set_flag(&mut self, flag: Flag, on: bool) -> Result<()> {
        self.program_state.set_bit(flag.bit(), on)
    }

    flag_accessors! {
        Carry => carry, set_carry;
        Overflow => overflow, set_overflow;
        Zero => zero, set_zero;
        Sign => sign, set_sign;
        AllowInterruption => allow_interruption, set_allow_interruption;
        Interruption => interruption, set_interruption;
        Running => running, set_running;
        Parity => parity, set_parity;
    }

    pub fn recalc_from(&mut self, word: Word) -> Result<()> {
        let zero = word.is_zero()?;
        let sign = word.sign_bit()?;
        self.set_zero(zero)?;
        self.set_sign(sign)
    }

    /// Recomputes Z and N from the accumulator. The engine never touches the other flags.
    pub fn recalc_from_accumulator(&mut self) -> Result<()> {
        self.recalc_from(self.accumulator)
    }
}
