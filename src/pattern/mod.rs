mod compiled;
mod global;
mod names;
mod replace;

pub use compiled::Pattern;
pub use global::Matches;
pub use names::NamedGroups;
pub(crate) use names::resolve_names;
pub(crate) use replace::Replacement;
