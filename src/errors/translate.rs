use super::{ErrorCode, PcreError};
use crate::types::{OptionBits, RawCode};

/// Longest subject whose offsets fit the engine's `i32` vector.
pub(crate) const MAX_SUBJECT_LEN: usize = i32::MAX as usize;

/// What the binding was doing when the engine returned a code.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CallContext {
    pub operation: &'static str,
    pub start: usize,
    pub subject_len: usize,
    pub options: OptionBits,
}

impl CallContext {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: 0,
            subject_len: 0,
            options: 0,
        }
    }

    pub fn at(mut self, start: usize, subject_len: usize) -> Self {
        self.start = start;
        self.subject_len = subject_len;
        self
    }

    pub fn with_options(mut self, options: OptionBits) -> Self {
        self.options = options;
        self
    }
}

/// Maps a negative engine code to the error taxonomy.
///
/// `NOMATCH` is not an error and must be handled by the caller before
/// reaching here; seeing it is itself a contract violation.
pub(crate) fn translate(raw: RawCode, ctx: &CallContext) -> PcreError {
    let Some(code) = ErrorCode::from_raw(raw) else {
        return PcreError::UnknownEngineError { raw_code: raw };
    };

    match code {
        ErrorCode::MatchLimit | ErrorCode::RecursionLimit | ErrorCode::NoMemory => {
            PcreError::ResourceLimit { code }
        }
        ErrorCode::BadOffset | ErrorCode::BadUtf8Offset => PcreError::InvalidOffset {
            offset: ctx.start,
            length: ctx.subject_len,
        },
        ErrorCode::BadLength => PcreError::SubjectTooLong {
            length: ctx.subject_len,
            max: MAX_SUBJECT_LEN,
        },
        ErrorCode::BadOption => PcreError::BadOption { bits: ctx.options },
        ErrorCode::NoMatch => PcreError::invariant(format!(
            "{} was handed NOMATCH as a failure code",
            ctx.operation
        )),
        ErrorCode::Null
        | ErrorCode::BadMagic
        | ErrorCode::UnknownOpcode
        | ErrorCode::NoSubstring
        | ErrorCode::Callout
        | ErrorCode::BadUtf8
        | ErrorCode::ShortUtf8
        | ErrorCode::Partial
        | ErrorCode::BadPartial
        | ErrorCode::Internal
        | ErrorCode::BadCount
        | ErrorCode::BadNewline => PcreError::invariant(format!(
            "{} failed with {code}: {}",
            ctx.operation,
            code.message()
        )),
    }
}
