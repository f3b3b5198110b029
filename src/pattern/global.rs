use std::iter::FusedIterator;

use super::Pattern;
use crate::errors::{PcreError, PcreResult};
use crate::matcher::MatchRecord;

/// Iterator over successive non-overlapping matches.
///
/// After an empty match the cursor moves one character past it, so the
/// iteration always terminates; the last candidate position is the end of
/// the subject.
#[derive(Debug)]
pub struct Matches<'p, 's> {
    pattern: &'p Pattern,
    subject: &'s str,
    cursor: usize,
    done: bool,
}

impl<'p, 's> Matches<'p, 's> {
    pub(crate) fn new(pattern: &'p Pattern, subject: &'s str) -> Self {
        Self {
            pattern,
            subject,
            cursor: 0,
            done: false,
        }
    }

    fn fail(&mut self, err: PcreError) -> Option<PcreResult<MatchRecord<'s>>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<'s> Iterator for Matches<'_, 's> {
    type Item = PcreResult<MatchRecord<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor > self.subject.len() {
            return None;
        }

        let record = match self.pattern.exec_at(self.subject, self.cursor) {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(err) => return self.fail(err),
        };

        // exec_at never returns a match starting before the cursor
        let whole = record.whole();
        let (start, end) = (whole.start(), whole.end());
        if start == end {
            match self.subject[end..].chars().next() {
                Some(ch) => self.cursor = end + ch.len_utf8(),
                None => self.done = true,
            }
        } else {
            self.cursor = end;
        }

        Some(Ok(record))
    }
}

impl FusedIterator for Matches<'_, '_> {}
