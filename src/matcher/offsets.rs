/// Translates a byte offset into a character (Unicode scalar) index.
///
/// Offsets past the end count every character; an offset inside a code
/// point counts only the characters that start before it.
pub(crate) fn char_index(text: &str, byte_offset: usize) -> usize {
    if byte_offset >= text.len() {
        return text.chars().count();
    }
    text.char_indices()
        .take_while(|(i, _)| *i < byte_offset)
        .count()
}

#[cfg(test)]
mod tests {
    use super::char_index;

    #[test]
    fn char_index_when_ascii_then_identity() {
        assert_eq!(char_index("abc", 0), 0);
        assert_eq!(char_index("abc", 2), 2);
        assert_eq!(char_index("abc", 3), 3);
    }

    #[test]
    fn char_index_when_multibyte_then_counts_scalars() {
        let text = "héllo";
        assert_eq!(char_index(text, 3), 2);
        assert_eq!(char_index(text, text.len()), 5);
        assert_eq!(char_index(text, 100), 5);
    }
}
