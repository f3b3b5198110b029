pub mod codes;
pub mod error;
pub(crate) mod translate;

pub use codes::ErrorCode;
pub use error::{PcreError, PcreResult};
