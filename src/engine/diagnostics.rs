use fancy_regex::{CompileError, ParseError};
use regex_automata::meta::BuildError;
use regex_syntax::{ast, hir};

use super::RawCompileError;
use super::dialect::Translation;

/// Compile error numbers, following PCRE1 numbering where a counterpart exists.
pub mod codes {
    use crate::types::RawCode;

    pub const ESCAPE_AT_END: RawCode = 1;
    pub const UNRECOGNIZED_ESCAPE: RawCode = 3;
    pub const QUANTIFIER_OUT_OF_ORDER: RawCode = 4;
    pub const QUANTIFIER_NUMBER: RawCode = 5;
    pub const UNCLOSED_CLASS: RawCode = 6;
    pub const INVALID_CLASS_ESCAPE: RawCode = 7;
    pub const CLASS_RANGE: RawCode = 8;
    pub const NOTHING_TO_REPEAT: RawCode = 9;
    pub const BAD_GROUP_FLAG: RawCode = 12;
    pub const UNCLOSED_GROUP: RawCode = 14;
    pub const REFERENCE_MISSING: RawCode = 15;
    pub const UNKNOWN_OPTION: RawCode = 17;
    pub const TOO_LARGE: RawCode = 20;
    pub const NO_MEMORY: RawCode = 21;
    pub const UNMATCHED_PAREN: RawCode = 22;
    pub const LOOKBEHIND_NOT_FIXED: RawCode = 25;
    pub const GROUP_NAME: RawCode = 42;
    pub const DUPLICATE_NAME: RawCode = 43;
    pub const UNKNOWN_PROPERTY: RawCode = 47;
    pub const TOO_MANY_GROUPS: RawCode = 49;
    pub const NESTED_TOO_DEEP: RawCode = 82;
    /// Valid PCRE syntax this engine does not implement, such as recursion
    /// or backtracking verbs.
    pub const UNSUPPORTED: RawCode = 90;
}

pub(super) fn map_fancy_error(
    translation: &Translation,
    err: &fancy_regex::Error,
) -> RawCompileError {
    match err {
        fancy_regex::Error::ParseError(at, kind) => map_parse_error(translation, *at, kind),
        fancy_regex::Error::CompileError(kind) => map_compile_error(translation, kind),
        other => RawCompileError::new(codes::UNSUPPORTED, 0, other.to_string()),
    }
}

fn map_parse_error(translation: &Translation, at: usize, kind: &ParseError) -> RawCompileError {
    let text = translation.text.as_bytes();
    let code = match kind {
        ParseError::UnclosedOpenParen => {
            return RawCompileError::new(
                codes::UNCLOSED_GROUP,
                translation.source_len(),
                kind.to_string(),
            );
        }
        ParseError::InvalidClass => codes::INVALID_CLASS_ESCAPE,
        ParseError::GeneralParseError(_) => match text.get(at) {
            Some(b')') => codes::UNMATCHED_PAREN,
            Some(b'*' | b'+' | b'?' | b'{') => codes::NOTHING_TO_REPEAT,
            _ => codes::UNSUPPORTED,
        },
        ParseError::InvalidRepeat => codes::QUANTIFIER_NUMBER,
        ParseError::TargetNotRepeatable => codes::NOTHING_TO_REPEAT,
        ParseError::RecursionExceeded => codes::NESTED_TOO_DEEP,
        ParseError::TrailingBackslash => codes::ESCAPE_AT_END,
        ParseError::InvalidEscape(_)
        | ParseError::InvalidHex
        | ParseError::InvalidCodepointValue
        | ParseError::UnclosedUnicodeName => codes::UNRECOGNIZED_ESCAPE,
        ParseError::UnknownFlag(_) => codes::BAD_GROUP_FLAG,
        ParseError::InvalidBackref | ParseError::InvalidGroupNameBackref(_) => {
            codes::REFERENCE_MISSING
        }
        ParseError::InvalidGroupName => codes::GROUP_NAME,
        _ => codes::UNSUPPORTED,
    };
    RawCompileError::new(code, translation.source_offset(at), kind.to_string())
}

fn map_compile_error(translation: &Translation, kind: &CompileError) -> RawCompileError {
    match kind {
        // offsets inside a delegated fragment do not map back to the pattern
        CompileError::InnerError(inner) => {
            let mut mapped = map_build_error(&translation.text, inner);
            mapped.offset = if mapped.code == codes::TOO_LARGE {
                translation.source_len()
            } else {
                0
            };
            mapped
        }
        CompileError::LookBehindNotConst => {
            RawCompileError::new(codes::LOOKBEHIND_NOT_FIXED, 0, kind.to_string())
        }
        CompileError::InvalidBackref | CompileError::InvalidGroupNameBackref(_) => {
            RawCompileError::new(codes::REFERENCE_MISSING, 0, kind.to_string())
        }
        CompileError::InvalidGroupName => {
            RawCompileError::new(codes::GROUP_NAME, 0, kind.to_string())
        }
        _ => RawCompileError::new(codes::UNSUPPORTED, 0, kind.to_string()),
    }
}

fn map_build_error(pattern: &str, err: &BuildError) -> RawCompileError {
    if let Some(syntax) = err.syntax_error() {
        return map_syntax_error(pattern, syntax);
    }
    if let Some(limit) = err.size_limit() {
        return RawCompileError::new(
            codes::TOO_LARGE,
            pattern.len(),
            format!("regular expression is too large (limit {limit} bytes)"),
        );
    }
    RawCompileError::new(codes::UNSUPPORTED, 0, err.to_string())
}

fn map_syntax_error(pattern: &str, err: &regex_syntax::Error) -> RawCompileError {
    match err {
        regex_syntax::Error::Parse(e) => map_ast_error(pattern, e),
        regex_syntax::Error::Translate(e) => map_hir_error(e),
        other => RawCompileError::new(codes::UNSUPPORTED, 0, other.to_string()),
    }
}

fn map_ast_error(pattern: &str, err: &ast::Error) -> RawCompileError {
    let code = match err.kind() {
        ast::ErrorKind::EscapeUnexpectedEof => codes::ESCAPE_AT_END,
        ast::ErrorKind::EscapeUnrecognized
        | ast::ErrorKind::EscapeHexEmpty
        | ast::ErrorKind::EscapeHexInvalid
        | ast::ErrorKind::EscapeHexInvalidDigit => codes::UNRECOGNIZED_ESCAPE,
        ast::ErrorKind::RepetitionCountInvalid => codes::QUANTIFIER_OUT_OF_ORDER,
        ast::ErrorKind::RepetitionCountDecimalEmpty
        | ast::ErrorKind::RepetitionCountUnclosed
        | ast::ErrorKind::DecimalEmpty
        | ast::ErrorKind::DecimalInvalid => codes::QUANTIFIER_NUMBER,
        ast::ErrorKind::ClassUnclosed => codes::UNCLOSED_CLASS,
        ast::ErrorKind::ClassEscapeInvalid => codes::INVALID_CLASS_ESCAPE,
        ast::ErrorKind::ClassRangeInvalid | ast::ErrorKind::ClassRangeLiteral => {
            codes::CLASS_RANGE
        }
        ast::ErrorKind::RepetitionMissing => codes::NOTHING_TO_REPEAT,
        ast::ErrorKind::FlagDanglingNegation
        | ast::ErrorKind::FlagDuplicate { .. }
        | ast::ErrorKind::FlagRepeatedNegation { .. }
        | ast::ErrorKind::FlagUnexpectedEof
        | ast::ErrorKind::FlagUnrecognized => codes::BAD_GROUP_FLAG,
        ast::ErrorKind::GroupUnclosed => codes::UNCLOSED_GROUP,
        ast::ErrorKind::GroupUnopened => codes::UNMATCHED_PAREN,
        ast::ErrorKind::GroupNameEmpty
        | ast::ErrorKind::GroupNameInvalid
        | ast::ErrorKind::GroupNameUnexpectedEof => codes::GROUP_NAME,
        ast::ErrorKind::GroupNameDuplicate { .. } => codes::DUPLICATE_NAME,
        ast::ErrorKind::CaptureLimitExceeded => codes::TOO_MANY_GROUPS,
        ast::ErrorKind::NestLimitExceeded(_) => codes::NESTED_TOO_DEEP,
        _ => codes::UNSUPPORTED,
    };

    // Unclosed constructs are reported where the closing delimiter was expected.
    let offset = match err.kind() {
        ast::ErrorKind::GroupUnclosed | ast::ErrorKind::ClassUnclosed => pattern.len(),
        _ => err.span().start.offset,
    };

    RawCompileError::new(code, offset, err.kind().to_string())
}

fn map_hir_error(err: &hir::Error) -> RawCompileError {
    let code = match err.kind() {
        hir::ErrorKind::UnicodePropertyNotFound
        | hir::ErrorKind::UnicodePropertyValueNotFound
        | hir::ErrorKind::UnicodePerlClassNotFound => codes::UNKNOWN_PROPERTY,
        _ => codes::UNSUPPORTED,
    };
    RawCompileError::new(code, err.span().start.offset, err.kind().to_string())
}
