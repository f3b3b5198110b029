use serde::{Deserialize, Serialize};

use crate::types::RawCode;

/// Opaque reference to a compiled pattern living inside an engine.
///
/// The generation lets an engine tell a freed slot from its reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle {
    slot: u32,
    generation: u32,
}

impl NativeHandle {
    #[inline]
    pub fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    #[inline]
    pub fn slot(&self) -> u32 {
        self.slot
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Compile failure as reported by the engine, before translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompileError {
    pub code: RawCode,
    /// Byte offset into the pattern where the engine stopped.
    pub offset: usize,
    pub message: String,
}

impl RawCompileError {
    pub fn new(code: RawCode, offset: usize, message: impl Into<String>) -> Self {
        Self {
            code,
            offset,
            message: message.into(),
        }
    }
}

/// Packed group-name table.
///
/// Each entry is `entry_size` bytes: the group number as a big-endian `u16`,
/// the name, a NUL terminator, then zero padding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    count: usize,
    entry_size: usize,
    data: Vec<u8>,
}

impl NameTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Takes a table exactly as an engine laid it out; nothing is validated here.
    pub fn from_raw(count: usize, entry_size: usize, data: Vec<u8>) -> Self {
        Self {
            count,
            entry_size,
            data,
        }
    }

    /// Packs `(group, name)` pairs, sorted by name.
    pub fn pack(entries: &[(u16, &str)]) -> Self {
        if entries.is_empty() {
            return Self::empty();
        }

        let mut sorted: Vec<(u16, &str)> = entries.to_vec();
        sorted.sort_by(|a, b| a.1.cmp(b.1));

        let longest = sorted.iter().map(|(_, name)| name.len()).max().unwrap_or(0);
        let entry_size = 2 + longest + 1;
        let mut data = vec![0u8; entry_size * sorted.len()];

        for (i, (group, name)) in sorted.iter().enumerate() {
            let entry = &mut data[i * entry_size..(i + 1) * entry_size];
            entry[..2].copy_from_slice(&group.to_be_bytes());
            entry[2..2 + name.len()].copy_from_slice(name.as_bytes());
        }

        Self {
            count: sorted.len(),
            entry_size,
            data,
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn entry_size(&self) -> usize {
        self.entry_size
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
}

impl EngineVersion {
    /// `major * 100 + minor`.
    pub fn as_number(&self) -> u32 {
        self.major * 100 + self.minor
    }
}

/// Build-time capabilities and limits of an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub utf8: bool,
    pub unicode_properties: bool,
    pub jit: bool,
    /// Newline convention as a character code (10 = LF).
    pub newline: u32,
    pub link_size: u32,
    pub match_limit: u64,
    pub nest_limit: u32,
}
