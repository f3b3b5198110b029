/// Raw result code as returned by the engine: `>= 0` on success, negative on failure.
pub type RawCode = i32;
/// Option bitmask in the engine's encoding.
pub type OptionBits = u32;
