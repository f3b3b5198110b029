use smallvec::SmallVec;
use std::ops::Range;
use std::sync::Arc;

use super::char_index;
use crate::pattern::NamedGroups;

pub(crate) type Span = (usize, usize);
pub(crate) type GroupSpans = SmallVec<[Option<Span>; 4]>;

/// One participating capture slot. The text is always read from the
/// borrowed subject, never copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSlot<'s> {
    subject: &'s str,
    start: usize,
    end: usize,
}

impl<'s> MatchSlot<'s> {
    #[inline]
    pub fn as_str(&self) -> &'s str {
        &self.subject[self.start..self.end]
    }

    /// Start byte offset.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// End byte offset (exclusive).
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Start position as a character index into the subject.
    pub fn index(&self) -> usize {
        char_index(self.subject, self.start)
    }
}

/// The result of one successful match attempt: the whole match followed by
/// every capture group in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord<'s> {
    subject: &'s str,
    whole: Span,
    groups: GroupSpans,
    names: Arc<NamedGroups>,
}

pub type MatchSet<'s> = Vec<MatchRecord<'s>>;

impl<'s> MatchRecord<'s> {
    pub(crate) fn new(
        subject: &'s str,
        whole: Span,
        groups: GroupSpans,
        names: Arc<NamedGroups>,
    ) -> Self {
        Self {
            subject,
            whole,
            groups,
            names,
        }
    }

    #[inline]
    fn slot(&self, span: Span) -> MatchSlot<'s> {
        MatchSlot {
            subject: self.subject,
            start: span.0,
            end: span.1,
        }
    }

    /// Slot 0.
    #[inline]
    pub fn whole(&self) -> MatchSlot<'s> {
        self.slot(self.whole)
    }

    /// Slot `group`; `None` when the group did not participate or does not exist.
    pub fn get(&self, group: usize) -> Option<MatchSlot<'s>> {
        if group == 0 {
            return Some(self.whole());
        }
        let span = (*self.groups.get(group - 1)?)?;
        Some(self.slot(span))
    }

    pub fn name(&self, name: &str) -> Option<MatchSlot<'s>> {
        self.get(self.names.get(name)?)
    }

    #[inline]
    pub fn participated(&self, group: usize) -> bool {
        self.get(group).is_some()
    }

    /// `capture_count + 1`.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.groups.len() + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<MatchSlot<'s>>> + '_ {
        (0..self.slot_count()).map(move |group| self.get(group))
    }

    #[inline]
    pub fn subject(&self) -> &'s str {
        self.subject
    }

    pub fn named_groups(&self) -> &NamedGroups {
        &self.names
    }
}
