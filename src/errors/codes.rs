use crate::types::RawCode;

/// Negative result codes the engine may return from `execute`.
///
/// Values follow PCRE1. `ERROR_UNKNOWN_NODE` is an alias of
/// [`ErrorCode::UnknownOpcode`] and only appears in the constants table.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorCode {
    NoMatch = -1,
    Null = -2,
    BadOption = -3,
    BadMagic = -4,
    UnknownOpcode = -5,
    NoMemory = -6,
    NoSubstring = -7,
    MatchLimit = -8,
    Callout = -9,
    BadUtf8 = -10,
    BadUtf8Offset = -11,
    Partial = -12,
    BadPartial = -13,
    Internal = -14,
    BadCount = -15,
    RecursionLimit = -21,
    BadNewline = -23,
    BadOffset = -24,
    ShortUtf8 = -25,
    BadLength = -32,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 20] = [
        ErrorCode::NoMatch,
        ErrorCode::Null,
        ErrorCode::BadOption,
        ErrorCode::BadMagic,
        ErrorCode::UnknownOpcode,
        ErrorCode::NoMemory,
        ErrorCode::NoSubstring,
        ErrorCode::MatchLimit,
        ErrorCode::Callout,
        ErrorCode::BadUtf8,
        ErrorCode::BadUtf8Offset,
        ErrorCode::Partial,
        ErrorCode::BadPartial,
        ErrorCode::Internal,
        ErrorCode::BadCount,
        ErrorCode::RecursionLimit,
        ErrorCode::BadNewline,
        ErrorCode::BadOffset,
        ErrorCode::ShortUtf8,
        ErrorCode::BadLength,
    ];

    pub fn from_raw(raw: RawCode) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.raw() == raw)
    }

    #[inline]
    pub fn raw(self) -> RawCode {
        self as RawCode
    }

    /// Symbolic name as listed in the constants table.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::NoMatch => "ERROR_NOMATCH",
            ErrorCode::Null => "ERROR_NULL",
            ErrorCode::BadOption => "ERROR_BADOPTION",
            ErrorCode::BadMagic => "ERROR_BADMAGIC",
            ErrorCode::UnknownOpcode => "ERROR_UNKNOWN_OPCODE",
            ErrorCode::NoMemory => "ERROR_NOMEMORY",
            ErrorCode::NoSubstring => "ERROR_NOSUBSTRING",
            ErrorCode::MatchLimit => "ERROR_MATCHLIMIT",
            ErrorCode::Callout => "ERROR_CALLOUT",
            ErrorCode::BadUtf8 => "ERROR_BADUTF8",
            ErrorCode::BadUtf8Offset => "ERROR_BADUTF8_OFFSET",
            ErrorCode::Partial => "ERROR_PARTIAL",
            ErrorCode::BadPartial => "ERROR_BADPARTIAL",
            ErrorCode::Internal => "ERROR_INTERNAL",
            ErrorCode::BadCount => "ERROR_BADCOUNT",
            ErrorCode::RecursionLimit => "ERROR_RECURSIONLIMIT",
            ErrorCode::BadNewline => "ERROR_BADNEWLINE",
            ErrorCode::BadOffset => "ERROR_BADOFFSET",
            ErrorCode::ShortUtf8 => "ERROR_SHORTUTF8",
            ErrorCode::BadLength => "ERROR_BADLENGTH",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::NoMatch => "no match",
            ErrorCode::Null => "null argument passed to the engine",
            ErrorCode::BadOption => "unsupported option bits",
            ErrorCode::BadMagic => "handle does not refer to a live compiled pattern",
            ErrorCode::UnknownOpcode => "compiled program is corrupt",
            ErrorCode::NoMemory => "engine ran out of memory",
            ErrorCode::NoSubstring => "requested substring does not exist",
            ErrorCode::MatchLimit => "match limit exceeded",
            ErrorCode::Callout => "callout failed",
            ErrorCode::BadUtf8 => "subject is not valid UTF-8",
            ErrorCode::BadUtf8Offset => "start offset is inside a UTF-8 sequence",
            ErrorCode::Partial => "partial match",
            ErrorCode::BadPartial => "pattern cannot be used for partial matching",
            ErrorCode::Internal => "internal engine error",
            ErrorCode::BadCount => "offset vector size is negative",
            ErrorCode::RecursionLimit => "recursion limit exceeded",
            ErrorCode::BadNewline => "invalid newline convention",
            ErrorCode::BadOffset => "start offset is out of range",
            ErrorCode::ShortUtf8 => "subject ends with a truncated UTF-8 sequence",
            ErrorCode::BadLength => "subject is longer than the offset vector can address",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.raw())
    }
}
