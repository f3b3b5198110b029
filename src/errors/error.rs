use super::ErrorCode;
use crate::options::OptionsError;
use crate::runtime::EngineOptionsError;
use crate::types::{OptionBits, RawCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PcreError {
    #[error("pattern compilation failed at offset {offset}: {message} (code {code})")]
    Compile {
        /// Character index into the pattern text.
        offset: usize,
        /// Byte offset as reported by the engine.
        byte_offset: usize,
        code: RawCode,
        message: String,
    },
    #[error("start offset {offset} is not a valid position in a subject of {length} bytes")]
    InvalidOffset { offset: usize, length: usize },
    #[error("subject of {length} bytes exceeds the engine maximum of {max} bytes")]
    SubjectTooLong { length: usize, max: usize },
    #[error("pattern has been disposed; cannot perform {operation}")]
    UseAfterFree { operation: &'static str },
    #[error("engine is not initialized; cannot perform {operation}")]
    NotInitialized { operation: &'static str },
    #[error("engine is already initialized")]
    AlreadyInitialized,
    #[error("engine resource limit hit: {code} ({})", .code.message())]
    ResourceLimit { code: ErrorCode },
    #[error("engine rejected option bits {bits:#x}")]
    BadOption { bits: OptionBits },
    #[error("engine contract violated: {detail}")]
    EngineInvariantViolation { detail: String },
    #[error("engine returned unknown result code {raw_code}")]
    UnknownEngineError { raw_code: RawCode },
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Config(#[from] EngineOptionsError),
}

impl PcreError {
    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        PcreError::EngineInvariantViolation {
            detail: detail.into(),
        }
    }
}

pub type PcreResult<T> = Result<T, PcreError>;
