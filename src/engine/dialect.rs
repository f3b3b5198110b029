use hashbrown::HashSet as FastHashSet;
use memchr::memchr;
use regex_syntax::is_meta_character;

use super::RawCompileError;
use super::diagnostics::codes;
use crate::options::CompileOptions;

const ASCII_DIGIT: &str = "0-9";
const ASCII_WORD: &str = "0-9A-Za-z_";
const ASCII_SPACE: &str = r"\t\n\x0B\x0C\r\x20";
const HORIZONTAL_SPACE: &str =
    r"\t\x20\x{A0}\x{1680}\x{180E}\x{2000}-\x{200A}\x{202F}\x{205F}\x{3000}";
const VERTICAL_SPACE: &str = r"\n\x0B\x0C\r\x{85}\x{2028}\x{2029}";

/// `$` outside multiline mode: end of subject or before a final newline.
const DOLLAR_DEFAULT: &str = r"(?=\n?\z)";
const WORD_BOUNDARY_ASCII: &str =
    r"(?:(?<=[0-9A-Za-z_])(?![0-9A-Za-z_])|(?<![0-9A-Za-z_])(?=[0-9A-Za-z_]))";
const NOT_WORD_BOUNDARY_ASCII: &str =
    r"(?:(?<=[0-9A-Za-z_])(?=[0-9A-Za-z_])|(?<![0-9A-Za-z_])(?![0-9A-Za-z_]))";
const NEWLINE_ANY: &str = r"(?:\r\n|\n|\x0B|\x0C|\r|\x{85}|\x{2028}|\x{2029})";
const NEWLINE_ANYCRLF: &str = r"(?:\r\n|\n|\r)";

/// Letters PCRE gives a meaning to after a backslash. Any other letter is a
/// literal unless `EXTRA` is set.
const PCRE_ESCAPE_LETTERS: &[u8] = b"aAbBcCdDeEfgGhHkKnNpPQrRsStvVwWxXzZ";

/// Pattern text rewritten for the backtracking engine, with enough
/// bookkeeping to map engine offsets back into the caller's pattern.
#[derive(Debug, Clone)]
pub(super) struct Translation {
    pub text: String,
    /// `(rewritten offset, source offset)` at every token boundary, ascending.
    anchors: Vec<(usize, usize)>,
    source_len: usize,
}

impl Translation {
    #[inline]
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    pub fn source_offset(&self, at: usize) -> usize {
        let i = self.anchors.partition_point(|(out, _)| *out <= at);
        if i == 0 {
            return 0;
        }
        let (out, src) = self.anchors[i - 1];
        let mut offset = src + (at - out);
        if let Some((_, next_src)) = self.anchors.get(i) {
            offset = offset.min(*next_src);
        }
        offset.min(self.source_len)
    }
}

#[derive(Debug, Clone, Copy)]
struct Mode {
    multiline: bool,
    extended: bool,
    dupnames: bool,
}

/// Rewrites PCRE syntax into the dialect `fancy-regex` accepts, applying the
/// compile flags the engine cannot express as inline flags.
///
/// Group nesting deeper than `nest_limit`, unbalanced parentheses, unclosed
/// classes and duplicate group names are reported here with PCRE codes.
pub(super) fn rewrite(
    pattern: &str,
    options: CompileOptions,
    nest_limit: u32,
) -> Result<Translation, RawCompileError> {
    Rewriter::new(pattern, options, nest_limit).run()
}

struct Rewriter<'p> {
    src: &'p str,
    options: CompileOptions,
    nest_limit: usize,
    out: String,
    anchors: Vec<(usize, usize)>,
    modes: Vec<Mode>,
    names: FastHashSet<&'p str>,
}

impl<'p> Rewriter<'p> {
    fn new(src: &'p str, options: CompileOptions, nest_limit: u32) -> Self {
        Self {
            src,
            options,
            nest_limit: nest_limit as usize,
            out: String::with_capacity(src.len() + 16),
            anchors: Vec::new(),
            modes: vec![Mode {
                multiline: options.contains(CompileOptions::MULTILINE),
                extended: options.contains(CompileOptions::EXTENDED),
                dupnames: options.contains(CompileOptions::DUPNAMES),
            }],
            names: FastHashSet::new(),
        }
    }

    fn run(mut self) -> Result<Translation, RawCompileError> {
        self.prefix();

        let src = self.src;
        let bytes = src.as_bytes();
        let mut i = 0usize;
        while i < bytes.len() {
            self.mark(i);
            i = match bytes[i] {
                b'\\' => self.escape(i)?,
                b'[' => self.class(i)?,
                b'(' => self.open(i)?,
                b')' => self.close(i)?,
                b'$' => {
                    if self.mode().multiline {
                        self.out.push('$');
                    } else if self.options.contains(CompileOptions::DOLLAR_ENDONLY) {
                        self.out.push_str(r"\z");
                    } else {
                        self.out.push_str(DOLLAR_DEFAULT);
                    }
                    i + 1
                }
                b'#' if self.mode().extended => {
                    let end = memchr(b'\n', &bytes[i..]).map_or(bytes.len(), |n| i + n + 1);
                    self.out.push_str(&src[i..end]);
                    end
                }
                _ => self.copy_char(i),
            };
        }

        if self.modes.len() > 1 {
            return Err(RawCompileError::new(
                codes::UNCLOSED_GROUP,
                self.src.len(),
                "missing )",
            ));
        }

        self.mark(self.src.len());
        Ok(Translation {
            text: self.out,
            anchors: self.anchors,
            source_len: self.src.len(),
        })
    }

    fn prefix(&mut self) {
        let mut flags = String::new();
        for (flag, letter) in [
            (CompileOptions::CASELESS, 'i'),
            (CompileOptions::MULTILINE, 'm'),
            (CompileOptions::DOTALL, 's'),
            (CompileOptions::EXTENDED, 'x'),
            (CompileOptions::UNGREEDY, 'U'),
        ] {
            if self.options.contains(flag) {
                flags.push(letter);
            }
        }
        if !flags.is_empty() {
            self.out.push_str("(?");
            self.out.push_str(&flags);
            self.out.push(')');
        }
    }

    #[inline]
    fn mark(&mut self, src: usize) {
        self.anchors.push((self.out.len(), src));
    }

    #[inline]
    fn mode(&self) -> Mode {
        self.modes[self.modes.len() - 1]
    }

    #[inline]
    fn ucp(&self) -> bool {
        self.options.contains(CompileOptions::UCP)
    }

    fn copy_char(&mut self, i: usize) -> usize {
        let len = self.src[i..].chars().next().map_or(1, char::len_utf8);
        self.out.push_str(&self.src[i..i + len]);
        i + len
    }

    fn escape(&mut self, i: usize) -> Result<usize, RawCompileError> {
        let Some(c) = self.src[i + 1..].chars().next() else {
            return Err(RawCompileError::new(codes::ESCAPE_AT_END, i, "\\ at end of pattern"));
        };
        let next = i + 1 + c.len_utf8();

        match c {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' if !self.ucp() => {
                let (set, negated) = perl_class(c);
                self.push_set(set, negated, false);
            }
            'b' if !self.ucp() => self.out.push_str(WORD_BOUNDARY_ASCII),
            'B' if !self.ucp() => self.out.push_str(NOT_WORD_BOUNDARY_ASCII),
            'h' | 'H' => self.push_set(HORIZONTAL_SPACE, c == 'H', false),
            'v' | 'V' => self.push_set(VERTICAL_SPACE, c == 'V', false),
            'N' => self.out.push_str(r"[^\n]"),
            'R' => {
                if self.options.contains(CompileOptions::BSR_ANYCRLF) {
                    self.out.push_str(NEWLINE_ANYCRLF);
                } else {
                    self.out.push_str(NEWLINE_ANY);
                }
            }
            'Z' => self.out.push_str(DOLLAR_DEFAULT),
            'Q' => return Ok(self.quote(next)),
            'E' => {}
            'c' => return self.control(i, next),
            'g' => return self.group_reference(i, next),
            'k' if self.src[next..].starts_with('{') => {
                let close = self.src[next..].find('}').ok_or_else(|| {
                    RawCompileError::new(codes::GROUP_NAME, i, "\\k{ is not terminated")
                })?;
                self.out.push_str(r"\k<");
                self.out.push_str(&self.src[next + 1..next + close]);
                self.out.push('>');
                return Ok(next + close + 1);
            }
            '0' => return Ok(self.octal(next)),
            '1'..='9' => {
                let digits = self.src[i + 1..].bytes().take_while(u8::is_ascii_digit).count();
                self.out.push_str(r"\k<");
                self.out.push_str(&self.src[i + 1..i + 1 + digits]);
                self.out.push('>');
                return Ok(i + 1 + digits);
            }
            '<' | '>' => self.out.push(c),
            'C' | 'X' | 'L' | 'l' | 'U' | 'u' => {
                return Err(RawCompileError::new(
                    codes::UNSUPPORTED,
                    i,
                    format!("\\{c} is not supported by this engine"),
                ));
            }
            c if c.is_ascii_alphabetic() && !PCRE_ESCAPE_LETTERS.contains(&(c as u8)) => {
                if self.options.contains(CompileOptions::EXTRA) {
                    return Err(RawCompileError::new(
                        codes::UNRECOGNIZED_ESCAPE,
                        i,
                        format!("unrecognized character follows \\: {c}"),
                    ));
                }
                self.out.push(c);
            }
            _ => self.out.push_str(&self.src[i..next]),
        }
        Ok(next)
    }

    /// Consumes a whole character class starting at `[`.
    fn class(&mut self, start: usize) -> Result<usize, RawCompileError> {
        let src = self.src;
        let bytes = src.as_bytes();
        let unclosed = || {
            RawCompileError::new(codes::UNCLOSED_CLASS, bytes.len(), "missing terminating ]")
        };

        let mut i = start + 1;
        self.out.push('[');
        if bytes.get(i) == Some(&b'^') {
            self.out.push('^');
            i += 1;
        }
        if bytes.get(i) == Some(&b']') {
            self.out.push_str(r"\]");
            i += 1;
        }

        loop {
            let Some(&b) = bytes.get(i) else {
                return Err(unclosed());
            };
            self.mark(i);
            i = match b {
                b']' => {
                    self.out.push(']');
                    return Ok(i + 1);
                }
                b'\\' => self.class_escape(i)?,
                b'[' => match self.posix_class(i) {
                    Some(end) => {
                        self.out.push_str(&src[i..end]);
                        end
                    }
                    None => {
                        self.out.push_str(r"\[");
                        i + 1
                    }
                },
                b'&' | b'~' => {
                    self.out.push('\\');
                    self.out.push(b as char);
                    i + 1
                }
                b'-' if bytes.get(i + 1) == Some(&b'-') => {
                    self.out.push_str(r"\-");
                    i + 1
                }
                _ => self.copy_char(i),
            };
        }
    }

    fn class_escape(&mut self, i: usize) -> Result<usize, RawCompileError> {
        let Some(c) = self.src[i + 1..].chars().next() else {
            return Err(RawCompileError::new(codes::ESCAPE_AT_END, i, "\\ at end of pattern"));
        };
        let next = i + 1 + c.len_utf8();

        match c {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' if !self.ucp() => {
                let (set, negated) = perl_class(c);
                self.push_set(set, negated, true);
            }
            'h' | 'H' => self.push_set(HORIZONTAL_SPACE, c == 'H', true),
            'v' | 'V' => self.push_set(VERTICAL_SPACE, c == 'V', true),
            'Q' => return Ok(self.quote(next)),
            'E' => {}
            'c' => return self.control(i, next),
            '0' => return Ok(self.octal(next)),
            c if c.is_ascii_alphabetic() && !PCRE_ESCAPE_LETTERS.contains(&(c as u8)) => {
                if self.options.contains(CompileOptions::EXTRA) {
                    return Err(RawCompileError::new(
                        codes::UNRECOGNIZED_ESCAPE,
                        i,
                        format!("unrecognized character follows \\: {c}"),
                    ));
                }
                self.out.push(c);
            }
            _ => self.out.push_str(&self.src[i..next]),
        }
        Ok(next)
    }

    /// End of a `[:name:]` item at `i`, if there is one.
    fn posix_class(&self, i: usize) -> Option<usize> {
        let rest = &self.src[i..];
        if !rest.starts_with("[:") {
            return None;
        }
        let close = rest.find(":]")?;
        let name = rest[2..close].trim_start_matches('^');
        (!name.is_empty() && name.bytes().all(|b| b.is_ascii_alphabetic()))
            .then_some(i + close + 2)
    }

    fn push_set(&mut self, set: &str, negated: bool, in_class: bool) {
        if in_class && !negated {
            self.out.push_str(set);
            return;
        }
        self.out.push_str(if negated { "[^" } else { "[" });
        self.out.push_str(set);
        self.out.push(']');
    }

    /// `\Q...\E`: everything up to `\E` is literal.
    fn quote(&mut self, from: usize) -> usize {
        let end = self.src[from..].find(r"\E").map_or(self.src.len(), |n| from + n);
        for ch in self.src[from..end].chars() {
            push_literal(&mut self.out, ch);
        }
        if end == self.src.len() { end } else { end + 2 }
    }

    fn control(&mut self, i: usize, next: usize) -> Result<usize, RawCompileError> {
        let Some(&b) = self.src.as_bytes().get(next).filter(|b| b.is_ascii()) else {
            return Err(RawCompileError::new(codes::ESCAPE_AT_END, i, "\\c at end of pattern"));
        };
        let value = (b.to_ascii_uppercase()) ^ 0x40;
        push_literal(&mut self.out, char::from(value));
        Ok(next + 1)
    }

    fn octal(&mut self, from: usize) -> usize {
        let digits = self.src[from..]
            .bytes()
            .take(2)
            .take_while(|b| (b'0'..=b'7').contains(b))
            .count();
        let value = u32::from_str_radix(&self.src[from..from + digits], 8).unwrap_or(0);
        push_literal(&mut self.out, char::from_u32(value).unwrap_or('\0'));
        from + digits
    }

    /// `\gN`, `\g-N`, `\g{N}`, `\g{-N}`, `\g{name}`.
    fn group_reference(&mut self, i: usize, next: usize) -> Result<usize, RawCompileError> {
        let src = self.src;
        let rest = &src[next..];
        let (reference, end) = if let Some(body) = rest.strip_prefix('{') {
            let close = body.find('}').ok_or_else(|| {
                RawCompileError::new(codes::GROUP_NAME, i, "\\g{ is not terminated")
            })?;
            (&body[..close], next + close + 2)
        } else {
            let sign = usize::from(rest.starts_with('-') || rest.starts_with('+'));
            let digits = rest[sign..].bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return Err(RawCompileError::new(
                    codes::GROUP_NAME,
                    i,
                    "\\g is not followed by a group reference",
                ));
            }
            (&rest[..sign + digits], next + sign + digits)
        };

        self.out.push_str(r"\k<");
        self.out.push_str(reference.trim_start_matches('+'));
        self.out.push('>');
        Ok(end)
    }

    fn open(&mut self, i: usize) -> Result<usize, RawCompileError> {
        let src = self.src;
        let rest = &src[i..];

        if rest.starts_with("(?#") {
            let close = rest.find(')').ok_or_else(|| {
                RawCompileError::new(codes::UNCLOSED_GROUP, src.len(), "missing ) after comment")
            })?;
            self.out.push_str(&rest[..=close]);
            return Ok(i + close + 1);
        }
        if let Some(callout) = rest.strip_prefix("(?C") {
            let digits = callout.bytes().take_while(u8::is_ascii_digit).count();
            if callout[digits..].starts_with(')') {
                // callouts have no handler here; they always continue
                return Ok(i + 3 + digits + 1);
            }
        }
        if rest.starts_with("(?R)") || rest.starts_with("(?&") || rest.starts_with("(?P>") {
            return Err(RawCompileError::new(
                codes::UNSUPPORTED,
                i,
                "recursion and subroutine calls are not supported by this engine",
            ));
        }
        if rest.starts_with("(*") {
            return Err(RawCompileError::new(
                codes::UNSUPPORTED,
                i,
                "backtracking control verbs are not supported by this engine",
            ));
        }

        if let Some(flags) = inline_flags(rest) {
            let mut mode = self.mode();
            apply_flags(&mut mode, flags.letters);
            // J and X have no engine counterpart
            let kept: String = flags
                .letters
                .chars()
                .filter(|c| !matches!(c, 'J' | 'X'))
                .collect();
            let kept = kept.trim_end_matches('-');
            if !kept.is_empty() {
                self.out.push_str("(?");
                self.out.push_str(kept);
                self.out.push(if flags.scoped { ':' } else { ')' });
            } else if flags.scoped {
                self.out.push_str("(?:");
            }
            if flags.scoped {
                self.push_level(i, mode)?;
            } else {
                let top = self.modes.len() - 1;
                self.modes[top] = mode;
            }
            return Ok(i + flags.len);
        }

        if rest.starts_with("(?(") {
            return self.conditional(i);
        }

        for (prefix, close) in [("(?P<", '>'), ("(?<", '>'), ("(?'", '\'')] {
            let Some(body) = rest.strip_prefix(prefix) else {
                continue;
            };
            if prefix == "(?<" && (body.starts_with('=') || body.starts_with('!')) {
                break;
            }
            let end = body.find(close).ok_or_else(|| {
                RawCompileError::new(codes::GROUP_NAME, i, "group name is not terminated")
            })?;
            let name = &body[..end];
            self.register_name(i, name)?;
            self.push_level(i, self.mode())?;
            self.out.push_str("(?<");
            self.out.push_str(name);
            self.out.push('>');
            return Ok(i + prefix.len() + end + 1);
        }

        self.push_level(i, self.mode())?;
        if !rest.starts_with("(?") && self.options.contains(CompileOptions::NO_AUTO_CAPTURE) {
            self.out.push_str("(?:");
        } else {
            self.out.push('(');
        }
        Ok(i + 1)
    }

    fn conditional(&mut self, i: usize) -> Result<usize, RawCompileError> {
        let src = self.src;
        let body = &src[i + 3..];
        self.push_level(i, self.mode())?;

        // assertion condition: its own `(` opens the next group
        if body.starts_with('?') || body.starts_with('*') {
            self.out.push_str("(?");
            return Ok(i + 2);
        }

        let close = body.find(')').ok_or_else(|| {
            RawCompileError::new(codes::UNCLOSED_GROUP, src.len(), "missing ) in condition")
        })?;
        let condition = &body[..close];
        let numeric = condition
            .trim_start_matches(['+', '-'])
            .bytes()
            .all(|b| b.is_ascii_digit());

        self.out.push_str("(?(");
        if condition.starts_with('<') || condition.starts_with('\'') {
            self.out.push_str(condition);
        } else if numeric {
            // numbered conditions go through the name syntax so they can mix
            // with named groups
            self.out.push('<');
            self.out.push_str(condition.trim_start_matches('+'));
            self.out.push('>');
        } else if condition.starts_with('R') || condition == "DEFINE" {
            return Err(RawCompileError::new(
                codes::UNSUPPORTED,
                i,
                format!("condition ({condition}) is not supported by this engine"),
            ));
        } else {
            self.out.push('<');
            self.out.push_str(condition);
            self.out.push('>');
        }
        self.out.push(')');
        Ok(i + 3 + close + 1)
    }

    fn close(&mut self, i: usize) -> Result<usize, RawCompileError> {
        if self.modes.len() == 1 {
            return Err(RawCompileError::new(codes::UNMATCHED_PAREN, i, "unmatched )"));
        }
        self.modes.pop();
        self.out.push(')');
        Ok(i + 1)
    }

    fn push_level(&mut self, i: usize, mode: Mode) -> Result<(), RawCompileError> {
        if self.modes.len() > self.nest_limit {
            return Err(RawCompileError::new(
                codes::NESTED_TOO_DEEP,
                i,
                format!("parentheses nested deeper than {}", self.nest_limit),
            ));
        }
        self.modes.push(mode);
        Ok(())
    }

    fn register_name(&mut self, i: usize, name: &'p str) -> Result<(), RawCompileError> {
        if name.is_empty()
            || name.as_bytes()[0].is_ascii_digit()
            || !name.bytes().all(|b| b == b'_' || b.is_ascii_alphanumeric())
        {
            return Err(RawCompileError::new(
                codes::GROUP_NAME,
                i,
                format!("invalid group name '{name}'"),
            ));
        }
        if !self.names.insert(name) && !self.mode().dupnames {
            return Err(RawCompileError::new(
                codes::DUPLICATE_NAME,
                i,
                format!("two named subpatterns have the same name '{name}'"),
            ));
        }
        Ok(())
    }
}

struct InlineFlags<'a> {
    letters: &'a str,
    len: usize,
    scoped: bool,
}

/// `(?imsx-imsx)` or `(?imsx-imsx:` at the start of `rest`.
fn inline_flags(rest: &str) -> Option<InlineFlags<'_>> {
    let body = rest.strip_prefix("(?")?;
    let end = body.find([')', ':'])?;
    let letters = &body[..end];
    if letters.is_empty()
        || !letters
            .bytes()
            .all(|b| matches!(b, b'i' | b'm' | b's' | b'x' | b'U' | b'J' | b'X' | b'-'))
    {
        return None;
    }
    Some(InlineFlags {
        letters,
        len: 2 + end + 1,
        scoped: body.as_bytes()[end] == b':',
    })
}

fn apply_flags(mode: &mut Mode, letters: &str) {
    let mut on = true;
    for b in letters.bytes() {
        match b {
            b'-' => on = false,
            b'm' => mode.multiline = on,
            b'x' => mode.extended = on,
            b'J' => mode.dupnames = on,
            _ => {}
        }
    }
}

fn perl_class(c: char) -> (&'static str, bool) {
    let set = match c.to_ascii_lowercase() {
        'd' => ASCII_DIGIT,
        'w' => ASCII_WORD,
        _ => ASCII_SPACE,
    };
    (set, c.is_ascii_uppercase())
}

fn push_literal(out: &mut String, ch: char) {
    match ch {
        c if is_meta_character(c) => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_ascii() && !c.is_ascii_graphic() => {
            out.push_str(&format!(r"\x{{{:X}}}", c as u32));
        }
        c => out.push(c),
    }
}
