mod decode;
mod offsets;
mod record;

pub(crate) use decode::decode;
pub(crate) use offsets::char_index;
pub use record::{MatchRecord, MatchSet, MatchSlot};
