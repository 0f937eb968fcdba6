use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MEMORY_SIZE;

/// How the instruction pointer wraps after the last cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpWrap {
    /// Modulo 2^16, the full word width.
    Word,
    /// Modulo the memory size.
    Memory,
}

impl Default for IpWrap {
    fn default() -> Self {
        IpWrap::Word
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub memory_size: usize,
    pub ip_wrap: IpWrap,
    /// Stop a run after this many instructions. `None` runs until halt.
    pub step_limit: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            memory_size: DEFAULT_MEMORY_SIZE,
            ip_wrap: IpWrap::default(),
            step_limit: None,
        }
    }
}

impl MachineConfig {
    pub fn from_json(text: &str) -> crate::errors::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
