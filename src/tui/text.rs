//! Text helpers for the TUI.
//!
//! Word boundaries for readline-style deletion in text fields, and a word
//! wrapper used to measure and lay out chat messages.

/// Find the start position (in chars) of the word before the cursor.
///
/// Words are delimited by whitespace; punctuation is part of the word.
/// Returns 0 if cursor is at start or only whitespace precedes it.
pub fn find_word_start_backward(text: &str, cursor: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut pos = cursor.min(chars.len());

    while pos > 0 && chars[pos - 1].is_whitespace() {
        pos -= 1;
    }
    while pos > 0 && !chars[pos - 1].is_whitespace() {
        pos -= 1;
    }

    pos
}

/// Wraps text to `width` columns, breaking at spaces where possible.
///
/// Explicit newlines are kept; words longer than the width are split.
/// Always returns at least one line.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split(' ') {
            let mut word: Vec<char> = word.chars().collect();

            // Split overlong words across lines.
            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                lines.push(word.drain(..width).collect());
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };

            if needed > width && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_word_start_at_end_of_word() {
        assert_eq!(find_word_start_backward("hello world", 11), 6);
    }

    #[test]
    fn find_word_start_with_trailing_spaces() {
        assert_eq!(find_word_start_backward("hello   ", 8), 0);
    }

    #[test]
    fn find_word_start_at_beginning() {
        assert_eq!(find_word_start_backward("hello", 0), 0);
    }

    #[test]
    fn find_word_start_with_punctuation() {
        assert_eq!(find_word_start_backward("hello, world!", 13), 7);
    }

    #[test]
    fn find_word_start_cursor_past_end() {
        assert_eq!(find_word_start_backward("one two", 99), 4);
    }

    #[test]
    fn wrap_short_text_is_one_line() {
        assert_eq!(wrap_lines("Name 3 artists", 40), vec!["Name 3 artists"]);
    }

    #[test]
    fn wrap_breaks_at_spaces() {
        assert_eq!(
            wrap_lines("The top 3 artists are A, B, and C.", 12),
            vec!["The top 3", "artists are", "A, B, and C."]
        );
    }

    #[test]
    fn wrap_keeps_newlines() {
        assert_eq!(wrap_lines("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_lines("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn wrap_empty_text() {
        assert_eq!(wrap_lines("", 10), vec![""]);
    }
}
