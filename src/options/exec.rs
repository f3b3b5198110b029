use bitflags::bitflags;

use super::OptionCodec;

bitflags! {
    /// Execution-time flags, passed per call. `ANCHORED` and `NO_UTF8_CHECK`
    /// share their bit positions with [`CompileOptions`](super::CompileOptions).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExecOptions: u32 {
        /// Anchor this call at the start offset.
        const ANCHORED = 0x0000_0010;
        /// The subject start is not the beginning of a line.
        const NOTBOL = 0x0000_0080;
        /// The subject end is not the end of a line.
        const NOTEOL = 0x0000_0100;
        /// An empty string is not a valid match.
        const NOTEMPTY = 0x0000_0400;
        const NO_UTF8_CHECK = 0x0000_2000;
        const PARTIAL_SOFT = 0x0000_8000;
        const PARTIAL_HARD = 0x0800_0000;
        /// An empty string at the start offset is not a valid match.
        const NOTEMPTY_ATSTART = 0x1000_0000;
    }
}

impl OptionCodec for ExecOptions {
    const KIND: &'static str = "exec";
}
