use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{SIGN_BIT, WORD_BITS};
use crate::errors::{Error, Result};
use crate::utils;

/// A 16-bit machine word: the type of every register, memory cell and address.
///
/// A word starts out uninitialized. Reading it before anything was written is an
/// error; writing always makes it initialized. Bit writes on an uninitialized word
/// treat it as zero first, bit reads fail like any other read. The sign is bit 7, the
/// top bit of the data byte, even though the word itself is 16 bits wide.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Word(Option<u16>);

impl Word {
    pub const fn uninitialized() -> Self {
        Word(None)
    }

    /// Builds an initialized word, wrapping `value` modulo 2^16.
    pub const fn from_unsigned(value: u32) -> Self {
        Word(Some((value & crate::constants::WORD_MASK) as u16))
    }

    pub fn is_initialized(&self) -> bool {
        self.0.is_some()
    }

    pub fn to_unsigned(&self) -> Result<u16> {
        self.0.ok_or(Error::UninitializedRead)
    }

    pub fn is_zero(&self) -> Result<bool> {
        Ok(self.to_unsigned()? == 0)
    }

    pub fn sign_bit(&self) -> Result<bool> {
        self.bit(SIGN_BIT)
    }

    pub fn bit(&self, index: u32) -> Result<bool> {
        check_bit(index)?;
        Ok(utils::get_bit(self.to_unsigned()?, index))
    }

    pub fn set_bit(&mut self, index: u32, on: bool) -> Result<()> {
        check_bit(index)?;
        let raw = self.0.unwrap_or(0);
        self.0 = Some(utils::with_bit(raw, index, on));
        Ok(())
    }

    /// Adds one, wrapping silently. No flags are involved: this is pointer arithmetic.
    pub fn increment(&self) -> Result<Word> {
        Ok(Word::from(self.to_unsigned()?.wrapping_add(1)))
    }

    pub fn decrement(&self) -> Result<Word> {
        Ok(Word::from(self.to_unsigned()?.wrapping_sub(1)))
    }

    /// Ordering that fails instead of answering when either side has no value.
    pub fn try_cmp(&self, other: &Word) -> Result<Ordering> {
        Ok(self.to_unsigned()?.cmp(&other.to_unsigned()?))
    }
}

fn check_bit(index: u32) -> Result<()> {
    if index >= WORD_BITS {
        return Err(Error::BitOutOfRange(index));
    }
    Ok(())
}

impl From<u16> for Word {
    fn from(value: u16) -> Self {
        Word(Some(value))
    }
}

// Uninitialized words are incomparable, so `==` is false and ordering is `None`.
impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.0, other.0), (Some(a), Some(b)) if a == b)
    }
}

impl PartialEq<u16> for Word {
    fn eq(&self, other: &u16) -> bool {
        self.0 == Some(*other)
    }
}

impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{:04X}", value),
            None => write!(f, "????"),
        }
    }
}
