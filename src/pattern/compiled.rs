use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

use super::{Matches, NamedGroups, Replacement, resolve_names};
use crate::engine::{Engine, EngineRef, NativeHandle, RawCompileError, UNSET_OFFSET};
use crate::errors::translate::{CallContext, translate};
use crate::errors::{ErrorCode, PcreError, PcreResult};
use crate::matcher::{MatchRecord, MatchSet, char_index, decode};
use crate::options::{CompileOptions, ExecOptions, OptionCodec};

type OffsetVector = SmallVec<[i32; 16]>;

/// One compiled pattern and the native handle it exclusively owns.
///
/// Every operation fails with [`PcreError::UseAfterFree`] once
/// [`dispose`](Pattern::dispose) has run. A pattern dropped without being
/// disposed releases its handle on drop.
#[derive(Debug)]
pub struct Pattern {
    source: String,
    options: CompileOptions,
    handle: Option<NativeHandle>,
    capture_count: usize,
    names: Arc<NamedGroups>,
    engine: EngineRef,
}

impl Pattern {
    #[tracing::instrument(level = "trace", skip(engine, text, options), fields(pattern = %text, options = options.bits()))]
    pub(crate) fn compile(
        engine: &EngineRef,
        text: &str,
        options: CompileOptions,
    ) -> PcreResult<Self> {
        tracing::event!(tracing::Level::TRACE, operation = "compile", pattern = %text);

        let mut guard = engine.lock();
        let handle = match guard.compile(text, options.encode()) {
            Ok(handle) => handle,
            Err(raw) => {
                if engine.debug() {
                    tracing::event!(
                        tracing::Level::DEBUG,
                        pattern = %text,
                        code = raw.code,
                        offset = raw.offset as u64,
                        "pattern rejected by engine"
                    );
                }
                return Err(compile_error(text, raw));
            }
        };

        let (capture_count, names) = match introspect(&**guard, handle) {
            Ok(found) => found,
            Err(err) => {
                guard.free(handle);
                return Err(err);
            }
        };
        drop(guard);

        Ok(Self {
            source: text.to_string(),
            options,
            handle: Some(handle),
            capture_count,
            names: Arc::new(names),
            engine: engine.clone(),
        })
    }

    #[inline]
    fn live(&self, operation: &'static str) -> PcreResult<NativeHandle> {
        self.handle.ok_or(PcreError::UseAfterFree { operation })
    }

    pub fn test(&self, subject: &str) -> PcreResult<bool> {
        self.test_at(subject, 0)
    }

    /// Reports whether a match exists at or after `start` without decoding it.
    #[tracing::instrument(level = "trace", skip(self, subject), fields(pattern = %self.source, start = start as u64))]
    pub fn test_at(&self, subject: &str, start: usize) -> PcreResult<bool> {
        let handle = self.live("test")?;
        check_offset(subject, start)?;

        let rc = self
            .engine
            .lock()
            .execute(handle, subject, start, 0, &mut []);
        match rc {
            rc if rc >= 0 => Ok(true),
            rc if rc == ErrorCode::NoMatch.raw() => Ok(false),
            rc => Err(translate(
                rc,
                &CallContext::new("test").at(start, subject.len()),
            )),
        }
    }

    pub fn exec<'s>(&self, subject: &'s str) -> PcreResult<Option<MatchRecord<'s>>> {
        self.exec_with(subject, 0, ExecOptions::empty())
    }

    pub fn exec_at<'s>(
        &self,
        subject: &'s str,
        start: usize,
    ) -> PcreResult<Option<MatchRecord<'s>>> {
        self.exec_with(subject, start, ExecOptions::empty())
    }

    /// First match at or after byte offset `start`.
    #[tracing::instrument(level = "trace", skip(self, subject, options), fields(pattern = %self.source, start = start as u64, subject_len = subject.len() as u64))]
    pub fn exec_with<'s>(
        &self,
        subject: &'s str,
        start: usize,
        options: ExecOptions,
    ) -> PcreResult<Option<MatchRecord<'s>>> {
        let handle = self.live("exec")?;
        check_offset(subject, start)?;

        let bits = options.encode();
        let mut ovector: OffsetVector = smallvec![UNSET_OFFSET; 2 * (self.capture_count + 1)];
        let rc = self
            .engine
            .lock()
            .execute(handle, subject, start, bits, &mut ovector);

        if rc == ErrorCode::NoMatch.raw() {
            return Ok(None);
        }
        if rc < 0 {
            return Err(translate(
                rc,
                &CallContext::new("exec")
                    .at(start, subject.len())
                    .with_options(bits),
            ));
        }

        let record = decode(subject, rc, &ovector, self.capture_count, &self.names)?;
        let found = record.whole().start();
        if found < start {
            return Err(PcreError::invariant(format!(
                "match at {found} starts before the search offset {start}"
            )));
        }
        Ok(Some(record))
    }

    /// Lazy form of [`global_match`](Pattern::global_match).
    pub fn matches<'p, 's>(&'p self, subject: &'s str) -> PcreResult<Matches<'p, 's>> {
        self.live("global_match")?;
        Ok(Matches::new(self, subject))
    }

    /// Every non-overlapping match, left to right. Recomputed on each call.
    #[tracing::instrument(level = "trace", skip(self, subject), fields(pattern = %self.source, subject_len = subject.len() as u64))]
    pub fn global_match<'s>(&self, subject: &'s str) -> PcreResult<MatchSet<'s>> {
        self.matches(subject)?.collect()
    }

    /// Substitutes the first match, or every match when `global` is set.
    #[tracing::instrument(level = "trace", skip(self, subject, replacement), fields(pattern = %self.source, global = global))]
    pub fn replace(&self, subject: &str, replacement: &str, global: bool) -> PcreResult<String> {
        self.live("replace")?;
        let template = Replacement::parse(replacement, &self.names);
        let mut out = String::with_capacity(subject.len());
        let mut last = 0usize;

        let mut splice = |record: &MatchRecord<'_>, out: &mut String| {
            let whole = record.whole();
            out.push_str(&subject[last..whole.start()]);
            template.expand(record, out);
            last = whole.end();
        };

        if global {
            for record in self.matches(subject)? {
                splice(&record?, &mut out);
            }
        } else if let Some(record) = self.exec(subject)? {
            splice(&record, &mut out);
        }

        out.push_str(&subject[last..]);
        Ok(out)
    }

    pub fn named_groups(&self) -> PcreResult<&NamedGroups> {
        self.live("named_groups")?;
        Ok(&self.names)
    }

    pub fn pattern(&self) -> PcreResult<&str> {
        self.live("pattern")?;
        Ok(&self.source)
    }

    pub fn options(&self) -> PcreResult<CompileOptions> {
        self.live("options")?;
        Ok(self.options)
    }

    pub fn capture_count(&self) -> PcreResult<usize> {
        self.live("capture_count")?;
        Ok(self.capture_count)
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.handle.is_none()
    }

    /// Frees the native handle. A second call fails with `UseAfterFree`.
    pub fn dispose(&mut self) -> PcreResult<()> {
        let handle = self
            .handle
            .take()
            .ok_or(PcreError::UseAfterFree { operation: "dispose" })?;
        let rc = self.engine.lock().free(handle);

        if self.engine.debug() {
            tracing::event!(
                tracing::Level::DEBUG,
                pattern = %self.source,
                rc = rc,
                "pattern disposed"
            );
        }
        if rc < 0 {
            return Err(translate(rc, &CallContext::new("dispose")));
        }
        Ok(())
    }
}

impl Drop for Pattern {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let rc = self.engine.lock().free(handle);
            if self.engine.debug() {
                tracing::event!(
                    tracing::Level::DEBUG,
                    pattern = %self.source,
                    rc = rc,
                    "undisposed pattern released on drop"
                );
            }
        }
    }
}

fn introspect(engine: &dyn Engine, handle: NativeHandle) -> PcreResult<(usize, NamedGroups)> {
    let capture_count = engine
        .capture_count(handle)
        .map_err(|rc| translate(rc, &CallContext::new("capture_count")))?;
    let table = engine
        .name_table(handle)
        .map_err(|rc| translate(rc, &CallContext::new("name_table")))?;
    let names = resolve_names(&table, capture_count)?;
    Ok((capture_count, names))
}

fn compile_error(text: &str, raw: RawCompileError) -> PcreError {
    PcreError::Compile {
        offset: char_index(text, raw.offset),
        byte_offset: raw.offset,
        code: raw.code,
        message: raw.message,
    }
}

fn check_offset(subject: &str, start: usize) -> PcreResult<()> {
    if start > subject.len() || !subject.is_char_boundary(start) {
        return Err(PcreError::InvalidOffset {
            offset: start,
            length: subject.len(),
        });
    }
    Ok(())
}
