use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("read of a word that was never written")]
    UninitializedRead,

    #[error("address {address:#05X} is outside of memory (size {size:#05X})")]
    AddressOutOfRange { address: usize, size: usize },

    #[error("bit {0} is outside of the word")]
    BitOutOfRange(u32),

    #[error("image must be exactly {expected} bytes, got {actual}")]
    ImageSize { expected: usize, actual: usize },

    #[error("memory size {0} must be between 1 and 65536 cells")]
    MemorySize(usize),

    #[error("unknown opcode {0:#06X}")]
    UnknownOpcode(u16),

    #[error("instruction failed: {0}")]
    Instruction(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wraps an error raised by an instruction set implementation.
    pub fn instruction<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Instruction(err.into())
    }
}
