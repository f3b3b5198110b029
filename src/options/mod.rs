mod codec;
mod compile;
mod error;
mod exec;

pub use codec::OptionCodec;
pub use compile::CompileOptions;
pub use error::{OptionsError, OptionsResult};
pub use exec::ExecOptions;
