//! Small text helpers shared by the extractors.
//!
//! Offsets are byte offsets into UTF-8 text; radii are counted in characters
//! so windows never split a multi-byte character.

/// Byte offset `n` characters before `from` (clamped to 0).
pub fn chars_before(text: &str, from: usize, n: usize) -> usize {
    text[..from]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(from)
}

/// Byte offset `n` characters after `from` (clamped to the text length).
pub fn chars_after(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}

/// Text around `start..end` extended by `radius` characters on both sides, trimmed.
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> String {
    let from = chars_before(text, start, radius);
    let to = chars_after(text, end, radius);
    text[from..to].trim().to_string()
}

/// Last `n` words of `text`, keeping only words that contain a letter.
pub fn last_words(text: &str, n: usize) -> Vec<&str> {
    let words: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ':' || c == '|' || c == ';')
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    let tail: Vec<&str> = words
        .iter()
        .rev()
        .take_while(|w| w.chars().any(char::is_alphabetic))
        .take(n)
        .copied()
        .collect();
    tail.into_iter().rev().collect()
}

/// Collapse runs of whitespace into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_window_ascii() {
        let text = "0123456789ABCDEFGHIJ";
        assert_eq!(context_window(text, 10, 12, 3), "789ABCDE");
        assert_eq!(context_window(text, 1, 2, 5), "0123456");
        assert_eq!(context_window(text, 18, 20, 5), "DEFGHIJ");
    }

    #[test]
    fn test_context_window_multibyte() {
        let text = "Größe: 12,5 % Anteil";
        let start = text.find("12,5").unwrap();
        let end = start + "12,5".len();
        assert_eq!(context_window(text, start, end, 3), "e: 12,5 %");
    }

    #[test]
    fn test_last_words() {
        assert_eq!(last_words("Asset allocation\nEquities ", 2), vec!["allocation", "Equities"]);
        assert_eq!(last_words("Real Estate:", 3), vec!["Real", "Estate"]);
        assert_eq!(last_words("Bonds 12.5", 3), Vec::<&str>::new());
        assert!(last_words("", 3).is_empty());
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n b\t c "), "a b c");
    }
}
