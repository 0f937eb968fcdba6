use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::machine::Cpu;
use crate::registers::Registers;
use crate::word::Word;

/// Complete machine state as JSON. Uninitialized slots are stored as `null`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub registers: Registers,
    pub memory: Vec<Word>,
}

impl MachineSnapshot {
    pub fn capture(cpu: &Cpu) -> Self {
        MachineSnapshot {
            registers: cpu.registers.clone(),
            memory: cpu.memory.cells().to_vec(),
        }
    }

    /// Overwrites `cpu` with this snapshot. The memory sizes must match.
    pub fn restore(&self, cpu: &mut Cpu) -> Result<()> {
        if self.memory.len() != cpu.memory.size() {
            return Err(Error::ImageSize {
                expected: cpu.memory.image_len(),
                actual: self.memory.len() * crate::constants::BYTES_PER_CELL,
            });
        }
        for (address, cell) in self.memory.iter().enumerate() {
            cpu.memory.set(address, *cell)?;
        }
        cpu.registers = self.registers.clone();
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

pub fn save_state(cpu: &Cpu, path: &Path) -> Result<()> {
    tracing::info!(path = %path.display(), "saving state");
    let serialized = MachineSnapshot::capture(cpu).to_json()?;
    fs::write(path, serialized)?;
    Ok(())
}

pub fn load_state(cpu: &mut Cpu, path: &Path) -> Result<()> {
    tracing::info!(path = %path.display(), "loading state");
    let text = fs::read_to_string(path)?;
    MachineSnapshot::from_json(&text)?.restore(cpu)
}
