use memchr::memchr;

use super::NamedGroups;
use crate::matcher::MatchRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'r> {
    Literal(&'r str),
    Group(usize),
    /// Reference to a group name the pattern does not define.
    Missing,
}

/// Parsed replacement template.
///
/// `$0`/`$&` whole match, `$n` and `${n}` by number, `$name` and `${name}`
/// by name, `$$` a literal dollar. Any other `$` is kept as written.
/// Groups that did not participate, or do not exist, expand to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Replacement<'r> {
    pieces: Vec<Piece<'r>>,
}

impl<'r> Replacement<'r> {
    pub fn parse(template: &'r str, names: &NamedGroups) -> Self {
        let bytes = template.as_bytes();
        let mut pieces = Vec::new();
        let mut literal_start = 0usize;
        let mut pos = 0usize;

        while let Some(rel) = memchr(b'$', &bytes[pos..]) {
            let at = pos + rel;
            let rest = &template[at + 1..];

            let parsed = match rest.as_bytes().first() {
                Some(b'$') => Some((Piece::Literal("$"), 1)),
                Some(b'&') => Some((Piece::Group(0), 1)),
                Some(b'{') => rest[1..]
                    .find('}')
                    .map(|close| (reference(&rest[1..1 + close], names), close + 2)),
                Some(b) if b.is_ascii_digit() => {
                    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
                    Some((reference(&rest[..len], names), len))
                }
                Some(b) if *b == b'_' || b.is_ascii_alphabetic() => {
                    let len = rest
                        .bytes()
                        .take_while(|b| *b == b'_' || b.is_ascii_alphanumeric())
                        .count();
                    Some((reference(&rest[..len], names), len))
                }
                _ => None,
            };

            let Some((piece, consumed)) = parsed else {
                // lone `$` stays in the current literal run
                pos = at + 1;
                continue;
            };

            if literal_start < at {
                pieces.push(Piece::Literal(&template[literal_start..at]));
            }
            pieces.push(piece);
            pos = at + 1 + consumed;
            literal_start = pos;
        }

        if literal_start < template.len() {
            pieces.push(Piece::Literal(&template[literal_start..]));
        }

        Self { pieces }
    }

    pub fn expand(&self, record: &MatchRecord<'_>, out: &mut String) {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Group(group) => {
                    if let Some(slot) = record.get(*group) {
                        out.push_str(slot.as_str());
                    }
                }
                Piece::Missing => {}
            }
        }
    }
}

fn reference<'r>(token: &str, names: &NamedGroups) -> Piece<'r> {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse().map(Piece::Group).unwrap_or(Piece::Missing);
    }
    names.get(token).map(Piece::Group).unwrap_or(Piece::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_when_template_plain_then_single_literal() {
        let parsed = Replacement::parse("X", &NamedGroups::default());
        assert_eq!(parsed.pieces, vec![Piece::Literal("X")]);
    }

    #[test]
    fn parse_when_numbered_and_escaped_then_pieces_split() {
        let parsed = Replacement::parse("$2-$$-${1}$&", &NamedGroups::default());
        assert_eq!(
            parsed.pieces,
            vec![
                Piece::Group(2),
                Piece::Literal("-"),
                Piece::Literal("$"),
                Piece::Literal("-"),
                Piece::Group(1),
                Piece::Group(0),
            ]
        );
    }

    #[test]
    fn parse_when_dollar_not_a_reference_then_kept_literally() {
        let parsed = Replacement::parse("cost: $ 5 and $", &NamedGroups::default());
        assert_eq!(parsed.pieces, vec![Piece::Literal("cost: $ 5 and $")]);
    }

    #[test]
    fn parse_when_unknown_name_then_missing() {
        let parsed = Replacement::parse("${nope}!", &NamedGroups::default());
        assert_eq!(parsed.pieces, vec![Piece::Missing, Piece::Literal("!")]);
    }
}
