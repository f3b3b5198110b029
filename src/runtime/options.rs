use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SIZE_LIMIT: usize = 10 * (1 << 20);
const DEFAULT_DFA_SIZE_LIMIT: usize = 40 * (1 << 10);
const DEFAULT_NEST_LIMIT: u32 = 250;
const DEFAULT_MATCH_LIMIT: usize = 10_000_000;
const MAX_CAPTURES_LIMIT: usize = u16::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Upper bound, in bytes, on a compiled pattern's program.
    pub size_limit: usize,
    pub dfa_size_limit: usize,
    /// Backtracking steps a single search may take before it fails with
    /// `ERROR_MATCHLIMIT`.
    pub match_limit: usize,
    /// Maximum nesting depth of groups and repetitions.
    pub nest_limit: u32,
    /// Patterns with more capturing groups than this fail to compile.
    pub max_captures: usize,
    pub debug: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            size_limit: DEFAULT_SIZE_LIMIT,
            dfa_size_limit: DEFAULT_DFA_SIZE_LIMIT,
            match_limit: DEFAULT_MATCH_LIMIT,
            nest_limit: DEFAULT_NEST_LIMIT,
            max_captures: MAX_CAPTURES_LIMIT,
            debug: false,
        }
    }
}

impl EngineOptions {
    pub fn builder() -> EngineOptionsBuilder {
        EngineOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), EngineOptionsError> {
        if self.size_limit == 0 {
            return Err(EngineOptionsError::SizeLimitInvalid { provided: 0 });
        }
        if self.match_limit == 0 {
            return Err(EngineOptionsError::MatchLimitInvalid { provided: 0 });
        }
        if self.nest_limit == 0 {
            return Err(EngineOptionsError::NestLimitInvalid { provided: 0 });
        }
        if self.max_captures > MAX_CAPTURES_LIMIT {
            return Err(EngineOptionsError::MaxCapturesOutOfRange {
                provided: self.max_captures,
                max: MAX_CAPTURES_LIMIT,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct EngineOptionsBuilder {
    options: EngineOptions,
}

impl EngineOptionsBuilder {
    pub fn size_limit(mut self, value: usize) -> Self {
        self.options.size_limit = value;
        self
    }

    pub fn dfa_size_limit(mut self, value: usize) -> Self {
        self.options.dfa_size_limit = value;
        self
    }

    pub fn match_limit(mut self, value: usize) -> Self {
        self.options.match_limit = value;
        self
    }

    pub fn nest_limit(mut self, value: u32) -> Self {
        self.options.nest_limit = value;
        self
    }

    pub fn max_captures(mut self, value: usize) -> Self {
        self.options.max_captures = value;
        self
    }

    pub fn debug(mut self, value: bool) -> Self {
        self.options.debug = value;
        self
    }

    pub fn build(self) -> Result<EngineOptions, EngineOptionsError> {
        let options = self.options;
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineOptionsError {
    #[error("size_limit must be at least 1 byte (got {provided})")]
    SizeLimitInvalid { provided: usize },
    #[error("match_limit must be at least 1 step (got {provided})")]
    MatchLimitInvalid { provided: usize },
    #[error("nest_limit must be at least 1 (got {provided})")]
    NestLimitInvalid { provided: u32 },
    #[error("max_captures {provided} exceeds the supported maximum {max}")]
    MaxCapturesOutOfRange { provided: usize, max: usize },
}
