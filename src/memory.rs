use crate::constants::BYTES_PER_CELL;
use crate::errors::{Error, Result};
use crate::utils::{join_word, split_word};
use crate::word::Word;

/// Flat word-addressed memory.
///
/// These accessors are plain array operations. Fetches and instruction operand
/// accesses go through `Cpu::read_bus`/`Cpu::write_bus`, which also mirror the
/// address and data into AR and DR.
#[derive(Clone, Debug)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    pub fn new(size: usize) -> Self {
        Memory {
            cells: vec![Word::uninitialized(); size],
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn image_len(&self) -> usize {
        self.cells.len() * BYTES_PER_CELL
    }

    pub fn cells(&self) -> &[Word] {
        &self.cells
    }

    pub fn get(&self, address: usize) -> Result<Word> {
        self.cells
            .get(address)
            .copied()
            .ok_or(Error::AddressOutOfRange { address, size: self.cells.len() })
    }

    pub fn set(&mut self, address: usize, value: Word) -> Result<()> {
        let size = self.cells.len();
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(Error::AddressOutOfRange { address, size })?;
        *cell = value;
        Ok(())
    }

    pub fn set_unsigned(&mut self, address: usize, value: u32) -> Result<()> {
        self.set(address, Word::from_unsigned(value))
    }

    /// Fills every cell from a big-endian image of exactly `2 * size` bytes.
    pub fn load(&mut self, image: &[u8]) -> Result<()> {
        if image.len() != self.image_len() {
            return Err(Error::ImageSize { expected: self.image_len(), actual: image.len() });
        }
        for (cell, bytes) in self.cells.iter_mut().zip(image.chunks_exact(BYTES_PER_CELL)) {
            *cell = Word::from(join_word([bytes[0], bytes[1]]));
        }
        Ok(())
    }

    /// Like `load`, but zero-pads an image shorter than memory.
    pub fn load_padded(&mut self, image: &[u8]) -> Result<()> {
        let expected = self.image_len();
        if image.len() > expected {
            return Err(Error::ImageSize { expected, actual: image.len() });
        }
        let mut padded = image.to_vec();
        padded.resize(expected, 0);
        self.load(&padded)
    }

    pub fn dump(&self) -> Result<Vec<u8>> {
        let mut image = Vec::with_capacity(self.image_len());
        for cell in &self.cells {
            image.extend_from_slice(&split_word(cell.to_unsigned()?));
        }
        Ok(image)
    }
}
