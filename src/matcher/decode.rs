use std::sync::Arc;

use super::MatchRecord;
use super::record::{GroupSpans, Span};
use crate::engine::UNSET_OFFSET;
use crate::errors::{PcreError, PcreResult};
use crate::pattern::NamedGroups;
use crate::types::RawCode;

/// Builds a [`MatchRecord`] from a successful `execute` result.
///
/// `rc` is the engine's pair count; slots at or past it are unset. Any
/// shape the binding cannot represent is reported, never patched over.
pub(crate) fn decode<'s>(
    subject: &'s str,
    rc: RawCode,
    ovector: &[i32],
    capture_count: usize,
    names: &Arc<NamedGroups>,
) -> PcreResult<MatchRecord<'s>> {
    let slots = capture_count + 1;
    if rc == 0 {
        return Err(PcreError::invariant(format!(
            "offset vector too small for {slots} slots"
        )));
    }
    let set = usize::try_from(rc)
        .map_err(|_| PcreError::invariant(format!("decoder received failure code {rc}")))?;
    if set > slots {
        return Err(PcreError::invariant(format!(
            "engine reported {set} slots for a pattern with {slots}"
        )));
    }
    if ovector.len() < 2 * slots {
        return Err(PcreError::invariant(format!(
            "offset vector holds {} values, {} required",
            ovector.len(),
            2 * slots
        )));
    }

    let whole = decode_pair(subject, ovector, 0)?.ok_or_else(|| {
        PcreError::invariant("engine reported a match with slot 0 unset".to_string())
    })?;

    let mut groups = GroupSpans::with_capacity(capture_count);
    for group in 1..slots {
        let span = if group < set {
            decode_pair(subject, ovector, group)?
        } else {
            None
        };
        groups.push(span);
    }

    Ok(MatchRecord::new(subject, whole, groups, Arc::clone(names)))
}

fn decode_pair(subject: &str, ovector: &[i32], group: usize) -> PcreResult<Option<Span>> {
    let (start, end) = (ovector[2 * group], ovector[2 * group + 1]);

    if start == UNSET_OFFSET && end == UNSET_OFFSET {
        return Ok(None);
    }
    let (Ok(start), Ok(end)) = (usize::try_from(start), usize::try_from(end)) else {
        return Err(PcreError::invariant(format!(
            "slot {group} has a partial or negative offset pair ({start}, {end})"
        )));
    };
    if start > end || end > subject.len() {
        return Err(PcreError::invariant(format!(
            "slot {group} span {start}..{end} is outside a subject of {} bytes",
            subject.len()
        )));
    }
    if !subject.is_char_boundary(start) || !subject.is_char_boundary(end) {
        return Err(PcreError::invariant(format!(
            "slot {group} span {start}..{end} splits a UTF-8 sequence"
        )));
    }

    Ok(Some((start, end)))
}
