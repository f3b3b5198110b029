use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("unknown {kind} option name '{name}'")]
    UnknownName { kind: &'static str, name: String },
    #[error("invalid {kind} option expression '{input}': {reason}")]
    InvalidExpression {
        kind: &'static str,
        input: String,
        reason: String,
    },
}

pub type OptionsResult<T> = Result<T, OptionsError>;
