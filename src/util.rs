//! Character classification shared by word motion and the default tokenizer.

/// Word characters for motion and identifiers: alphanumeric or underscore.
/// Everything else that is not a newline counts as one "other" class for
/// word-wise movement.
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_chars() {
        assert!(is_word_char('a'));
        assert!(is_word_char('Z'));
        assert!(is_word_char('9'));
        assert!(is_word_char('_'));
        assert!(is_word_char('é'));
        assert!(!is_word_char(' '));
        assert!(!is_word_char('-'));
        assert!(!is_word_char('\n'));
    }
}
