use bitflags::Flags;

use super::{OptionsError, OptionsResult};
use crate::types::OptionBits;

/// Lossless translation between a symbolic flag set and the engine bitmask.
///
/// `decode` never drops bits: anything outside the recognized vocabulary is
/// retained and reported by [`unrecognized`](OptionCodec::unrecognized), so
/// `encode(decode(bits)) == bits` for every mask.
pub trait OptionCodec: Flags<Bits = OptionBits> + Copy {
    /// Label used in error messages.
    const KIND: &'static str;

    fn encode(self) -> OptionBits {
        self.bits()
    }

    fn decode(bits: OptionBits) -> Self {
        Self::from_bits_retain(bits)
    }

    /// Bits the vocabulary does not name.
    fn unrecognized(self) -> OptionBits {
        self.bits() & !Self::all().bits()
    }

    /// The same set with the unrecognized residual cleared.
    fn recognized(self) -> Self {
        Self::from_bits_truncate(self.bits())
    }

    fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }

    fn from_names<'a, I>(names: I) -> OptionsResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut bits: OptionBits = 0;
        for name in names {
            let flag = Self::from_name(name.trim()).ok_or_else(|| OptionsError::UnknownName {
                kind: Self::KIND,
                name: name.to_string(),
            })?;
            bits |= flag.bits();
        }
        Ok(Self::from_bits_retain(bits))
    }

    /// Renders `CASELESS | MULTILINE`, with any residual as a trailing hex term.
    fn to_symbolic(self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = bitflags::parser::to_writer(&self, &mut out);
        out
    }

    fn parse_symbolic(input: &str) -> OptionsResult<Self> {
        bitflags::parser::from_str::<Self>(input).map_err(|err| OptionsError::InvalidExpression {
            kind: Self::KIND,
            input: input.to_string(),
            reason: err.to_string(),
        })
    }
}
