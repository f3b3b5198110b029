use fancy_regex::{Regex, RegexBuilder, RuntimeError};
use memchr::memchr;

use super::diagnostics::{codes, map_fancy_error};
use super::dialect;
use super::table::HandleTable;
use super::{Engine, EngineConfig, EngineVersion, NameTable, NativeHandle, RawCompileError};
use crate::errors::ErrorCode;
use crate::errors::translate::MAX_SUBJECT_LEN;
use crate::options::{CompileOptions, ExecOptions, OptionCodec};
use crate::runtime::EngineOptions;
use crate::types::{OptionBits, RawCode};

/// Compile flags with no counterpart in a backtracking engine without callouts.
const UNSUPPORTED_COMPILE: CompileOptions =
    CompileOptions::AUTO_CALLOUT.union(CompileOptions::JAVASCRIPT_COMPAT);

const SUPPORTED_EXEC: ExecOptions = ExecOptions::ANCHORED.union(ExecOptions::NO_UTF8_CHECK);

const ENGINE_VERSION: EngineVersion = EngineVersion {
    major: 0,
    minor: 14,
};

#[derive(Debug)]
struct Compiled {
    regex: Regex,
    anchored: bool,
    firstline: bool,
    capture_count: usize,
    names: NameTable,
}

impl Compiled {
    /// Applies the start constraints the regex itself cannot express.
    fn accepts(&self, subject: &str, start: usize, found: usize, anchored: bool) -> bool {
        if (self.anchored || anchored) && found != start {
            return false;
        }
        if self.firstline {
            let line_end = memchr(b'\n', &subject.as_bytes()[start..])
                .map_or(subject.len(), |n| start + n);
            return found <= line_end;
        }
        true
    }
}

/// Engine backed by `fancy-regex`, a backtracking matcher that hands the
/// parts without look-around or back-references to `regex-automata`.
///
/// Patterns are rewritten from PCRE syntax first, which is where
/// `DOLLAR_ENDONLY`, `UCP`, `NO_AUTO_CAPTURE`, `DUPNAMES`, `EXTRA` and
/// `BSR_ANYCRLF` take effect. Subjects are `&str`, so the engine always runs
/// in UTF-8 mode whether or not `UTF8` is set, and never reports an offset
/// inside a code point. `NOTBOL`, `NOTEOL`, `NOTEMPTY*` and `PARTIAL_*` are
/// rejected at exec time with `BADOPTION`.
#[derive(Debug)]
pub struct FancyEngine {
    table: HandleTable<Compiled>,
    options: EngineOptions,
}

impl Default for FancyEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl FancyEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            table: HandleTable::new(),
            options,
        }
    }

    /// Number of compiled patterns not yet freed.
    pub fn live_patterns(&self) -> usize {
        self.table.len()
    }

    fn build(&self, pattern: &str, options: CompileOptions) -> Result<Regex, RawCompileError> {
        let translation = dialect::rewrite(pattern, options, self.options.nest_limit)?;
        RegexBuilder::new(&translation.text)
            .backtrack_limit(self.options.match_limit)
            .delegate_size_limit(self.options.size_limit)
            .delegate_dfa_size_limit(self.options.dfa_size_limit)
            .build()
            .map_err(|err| map_fancy_error(&translation, &err))
    }

    fn group_names(regex: &Regex) -> Result<NameTable, RawCompileError> {
        let mut entries: Vec<(u16, &str)> = Vec::new();
        for (index, name) in regex.capture_names().enumerate() {
            let Some(name) = name else { continue };
            let group = u16::try_from(index).map_err(|_| {
                RawCompileError::new(codes::TOO_MANY_GROUPS, 0, "group number exceeds u16")
            })?;
            entries.push((group, name));
        }
        Ok(NameTable::pack(&entries))
    }
}

fn runtime_code(err: &fancy_regex::Error) -> RawCode {
    match err {
        fancy_regex::Error::RuntimeError(RuntimeError::BacktrackLimitExceeded) => {
            ErrorCode::MatchLimit.raw()
        }
        fancy_regex::Error::RuntimeError(RuntimeError::StackOverflow) => {
            ErrorCode::RecursionLimit.raw()
        }
        _ => ErrorCode::Internal.raw(),
    }
}

impl Engine for FancyEngine {
    fn compile(
        &mut self,
        pattern: &str,
        options: OptionBits,
    ) -> Result<NativeHandle, RawCompileError> {
        let flags = CompileOptions::decode(options);
        let unsupported =
            (options & !CompileOptions::all().bits()) | (flags & UNSUPPORTED_COMPILE).bits();
        if unsupported != 0 {
            return Err(RawCompileError::new(
                codes::UNKNOWN_OPTION,
                0,
                format!("option bits {unsupported:#x} are not supported by this engine"),
            ));
        }

        let regex = self.build(pattern, flags)?;
        let capture_count = regex.captures_len().saturating_sub(1);
        if capture_count > self.options.max_captures {
            return Err(RawCompileError::new(
                codes::TOO_MANY_GROUPS,
                pattern.len(),
                format!(
                    "{capture_count} capturing groups exceed the limit of {}",
                    self.options.max_captures
                ),
            ));
        }
        let names = Self::group_names(&regex)?;

        let compiled = Compiled {
            regex,
            anchored: flags.contains(CompileOptions::ANCHORED),
            firstline: flags.contains(CompileOptions::FIRSTLINE),
            capture_count,
            names,
        };
        self.table
            .insert(compiled)
            .ok_or_else(|| RawCompileError::new(codes::NO_MEMORY, 0, "handle table exhausted"))
    }

    fn execute(
        &mut self,
        handle: NativeHandle,
        subject: &str,
        start: usize,
        options: OptionBits,
        ovector: &mut [i32],
    ) -> RawCode {
        let Some(compiled) = self.table.get(handle) else {
            return ErrorCode::BadMagic.raw();
        };
        if options & !SUPPORTED_EXEC.bits() != 0 {
            return ErrorCode::BadOption.raw();
        }
        if subject.len() > MAX_SUBJECT_LEN {
            return ErrorCode::BadLength.raw();
        }
        if start > subject.len() {
            return ErrorCode::BadOffset.raw();
        }
        if !subject.is_char_boundary(start) {
            return ErrorCode::BadUtf8Offset.raw();
        }

        let anchored = ExecOptions::decode(options).contains(ExecOptions::ANCHORED);
        let pairs = ovector.len() / 2;
        if pairs == 0 {
            return match compiled.regex.find_from_pos(subject, start) {
                Ok(Some(found)) if compiled.accepts(subject, start, found.start(), anchored) => 0,
                Ok(_) => ErrorCode::NoMatch.raw(),
                Err(err) => runtime_code(&err),
            };
        }

        let caps = match compiled.regex.captures_from_pos(subject, start) {
            Ok(Some(caps)) => caps,
            Ok(None) => return ErrorCode::NoMatch.raw(),
            Err(err) => return runtime_code(&err),
        };
        let Some(whole) = caps.get(0) else {
            return ErrorCode::NoMatch.raw();
        };
        if !compiled.accepts(subject, start, whole.start(), anchored) {
            return ErrorCode::NoMatch.raw();
        }

        ovector.fill(super::UNSET_OFFSET);
        let groups = compiled.capture_count + 1;
        let mut set = 0usize;
        for group in 0..groups.min(pairs) {
            if let Some(span) = caps.get(group) {
                ovector[2 * group] = span.start() as i32;
                ovector[2 * group + 1] = span.end() as i32;
                set = group + 1;
            }
        }

        if groups > pairs {
            return 0;
        }
        set as RawCode
    }

    fn free(&mut self, handle: NativeHandle) -> RawCode {
        match self.table.remove(handle) {
            Some(_) => 0,
            None => ErrorCode::BadMagic.raw(),
        }
    }

    fn capture_count(&self, handle: NativeHandle) -> Result<usize, RawCode> {
        self.table
            .get(handle)
            .map(|compiled| compiled.capture_count)
            .ok_or(ErrorCode::BadMagic.raw())
    }

    fn name_table(&self, handle: NativeHandle) -> Result<NameTable, RawCode> {
        self.table
            .get(handle)
            .map(|compiled| compiled.names.clone())
            .ok_or(ErrorCode::BadMagic.raw())
    }

    fn version(&self) -> EngineVersion {
        ENGINE_VERSION
    }

    fn version_string(&self) -> String {
        format!(
            "fancy-regex {}.{} (backtracking)",
            ENGINE_VERSION.major, ENGINE_VERSION.minor
        )
    }

    fn config(&self) -> EngineConfig {
        EngineConfig {
            utf8: true,
            unicode_properties: true,
            jit: false,
            newline: u32::from(b'\n'),
            link_size: std::mem::size_of::<usize>() as u32,
            match_limit: self.options.match_limit as u64,
            nest_limit: self.options.nest_limit,
        }
    }
}
