use bitflags::bitflags;

use super::OptionCodec;

bitflags! {
    /// Compile-time flags. Bit values follow the PCRE1 encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompileOptions: u32 {
        /// Case-insensitive matching.
        const CASELESS = 0x0000_0001;
        /// `^` and `$` match at line boundaries.
        const MULTILINE = 0x0000_0002;
        /// `.` also matches newlines.
        const DOTALL = 0x0000_0004;
        /// Free-spacing syntax: unescaped whitespace and `#` comments are ignored.
        const EXTENDED = 0x0000_0008;
        /// Every match must start at the start offset.
        const ANCHORED = 0x0000_0010;
        const DOLLAR_ENDONLY = 0x0000_0020;
        const EXTRA = 0x0000_0040;
        /// Quantifiers are lazy by default and `?` makes them greedy.
        const UNGREEDY = 0x0000_0200;
        const UTF8 = 0x0000_0800;
        const NO_AUTO_CAPTURE = 0x0000_1000;
        const NO_UTF8_CHECK = 0x0000_2000;
        const AUTO_CALLOUT = 0x0000_4000;
        const FIRSTLINE = 0x0004_0000;
        const DUPNAMES = 0x0008_0000;
        const BSR_ANYCRLF = 0x0080_0000;
        const BSR_UNICODE = 0x0100_0000;
        const JAVASCRIPT_COMPAT = 0x0200_0000;
        /// Unicode properties for `\d`, `\w` and friends.
        const UCP = 0x2000_0000;
    }
}

impl OptionCodec for CompileOptions {
    const KIND: &'static str = "compile";
}
