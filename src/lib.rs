//! Binding and marshaling layer over a PCRE-style regular-expression engine.
//!
//! The engine compiles and runs patterns; this crate owns the native
//! handles, encodes option sets into bitmasks, decodes raw offset vectors
//! into [`MatchRecord`]s, drives global matching and replacement, and maps
//! engine result codes onto [`PcreError`].
//!
//! ```
//! use pcre_bridge::{CompileOptions, Pcre};
//!
//! let pcre = Pcre::new();
//! pcre.init().unwrap();
//!
//! let mut date = pcre
//!     .compile(r"(\d{4})-(\d{2})-(\d{2})", CompileOptions::empty())
//!     .unwrap();
//! let found = date.exec("Date: 2023-12-25").unwrap().unwrap();
//! assert_eq!(found.whole().as_str(), "2023-12-25");
//! assert_eq!(found.get(1).unwrap().as_str(), "2023");
//! date.dispose().unwrap();
//! ```

pub mod constants;
pub mod engine;
pub mod errors;
pub mod matcher;
pub mod options;
pub mod pattern;
pub mod runtime;
pub mod types;

pub use constants::{Constant, ConstantKind, Constants};
pub use engine::{
    Engine, EngineConfig, EngineVersion, FancyEngine, NameTable, NativeHandle,
    RawCompileError,
};
pub use errors::{ErrorCode, PcreError, PcreResult};
pub use matcher::{MatchRecord, MatchSet, MatchSlot};
pub use options::{CompileOptions, ExecOptions, OptionCodec, OptionsError};
pub use pattern::{Matches, NamedGroups, Pattern};
pub use runtime::{EngineOptions, EngineOptionsBuilder, EngineOptionsError, Pcre};
