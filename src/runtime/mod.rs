mod options;
mod service;

pub use options::{EngineOptions, EngineOptionsBuilder, EngineOptionsError};
pub use service::Pcre;
