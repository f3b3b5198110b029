use hashbrown::HashMap as FastHashMap;
use memchr::memchr;

use crate::engine::NameTable;
use crate::errors::{PcreError, PcreResult};

/// Name to capture-slot mapping for one compiled pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedGroups {
    map: FastHashMap<String, usize>,
}

impl NamedGroups {
    #[inline]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.map.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.map.iter().map(|(name, index)| (name.as_str(), *index))
    }

    /// Entries ordered by slot index.
    pub fn by_index(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self.iter().collect();
        entries.sort_by_key(|(_, index)| *index);
        entries
    }
}

/// Decodes the engine's packed name table.
///
/// A name listed more than once resolves to its last entry.
pub(crate) fn resolve_names(table: &NameTable, capture_count: usize) -> PcreResult<NamedGroups> {
    let count = table.count();
    if count == 0 {
        return Ok(NamedGroups::default());
    }

    let entry_size = table.entry_size();
    if entry_size < 3 {
        return Err(PcreError::invariant(format!(
            "name table entry size {entry_size} cannot hold a group number and a name"
        )));
    }
    let needed = count.checked_mul(entry_size).unwrap_or(usize::MAX);
    if table.data().len() < needed {
        return Err(PcreError::invariant(format!(
            "name table truncated: {} bytes for {count} entries of {entry_size}",
            table.data().len()
        )));
    }

    let mut map = FastHashMap::with_capacity(count);
    for entry in table.data().chunks_exact(entry_size).take(count) {
        let group = usize::from(u16::from_be_bytes([entry[0], entry[1]]));
        let raw = &entry[2..];
        let terminator = memchr(0, raw).ok_or_else(|| {
            PcreError::invariant(format!("name for group {group} is not NUL-terminated"))
        })?;
        let name = std::str::from_utf8(&raw[..terminator]).map_err(|_| {
            PcreError::invariant(format!("name for group {group} is not valid UTF-8"))
        })?;

        if name.is_empty() {
            return Err(PcreError::invariant(format!("group {group} has an empty name")));
        }
        if group == 0 || group > capture_count {
            return Err(PcreError::invariant(format!(
                "group '{name}' maps to slot {group}, outside 1..={capture_count}"
            )));
        }

        map.insert(name.to_string(), group);
    }

    Ok(NamedGroups { map })
}
