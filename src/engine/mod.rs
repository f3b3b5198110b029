//! The engine seam.
//!
//! Everything the binding needs from a regex engine goes through [`Engine`],
//! which speaks the PCRE calling convention: `u32` option bitmasks, `i32`
//! offset vectors with `-1` for unset slots, and negative result codes.
//! [`FancyEngine`] is the built-in implementation; see its docs for the
//! flags it always applies and the exec flags it rejects.

mod diagnostics;
mod dialect;
mod fancy;
mod handle;
mod shared;
mod table;

pub use diagnostics::codes as compile_codes;
pub use fancy::FancyEngine;
pub use handle::{EngineConfig, EngineVersion, NameTable, NativeHandle, RawCompileError};
pub(crate) use shared::EngineRef;

use crate::types::{OptionBits, RawCode};

/// Offset-vector sentinel for a capture slot that did not participate.
pub const UNSET_OFFSET: i32 = -1;

pub trait Engine: Send {
    fn compile(
        &mut self,
        pattern: &str,
        options: OptionBits,
    ) -> Result<NativeHandle, RawCompileError>;

    /// Searches `subject` from byte offset `start`.
    ///
    /// Returns the number of offset pairs set (highest set slot + 1), `0` when
    /// a match exists but `ovector` is too small to hold every slot, or a
    /// negative code. An empty `ovector` asks only whether a match exists.
    fn execute(
        &mut self,
        handle: NativeHandle,
        subject: &str,
        start: usize,
        options: OptionBits,
        ovector: &mut [i32],
    ) -> RawCode;

    /// Releases the pattern. Returns `0` or a negative code for a stale handle.
    fn free(&mut self, handle: NativeHandle) -> RawCode;

    fn capture_count(&self, handle: NativeHandle) -> Result<usize, RawCode>;

    fn name_table(&self, handle: NativeHandle) -> Result<NameTable, RawCode>;

    fn version(&self) -> EngineVersion;

    fn version_string(&self) -> String;

    fn config(&self) -> EngineConfig;
}
