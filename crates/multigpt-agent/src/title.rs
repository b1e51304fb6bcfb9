// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation titles derived from the first message.

/// Longest title kept before truncation, in characters.
pub const MAX_TITLE_CHARS: usize = 40;

/// Builds a title from a message: trimmed, line breaks flattened, and cut to
/// [`MAX_TITLE_CHARS`] characters with a trailing `...` when longer.
pub fn chat_title(message: &str) -> String {
    let cleaned: String = message
        .trim()
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if cleaned.chars().count() > MAX_TITLE_CHARS {
        let mut title: String = cleaned.chars().take(MAX_TITLE_CHARS).collect();
        title.push_str("...");
        title
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_is_kept() {
        assert_eq!(chat_title("  What is Rust?  "), "What is Rust?");
    }

    #[test]
    fn line_breaks_become_spaces() {
        assert_eq!(chat_title("line one\nline two\r\n"), "line one line two");
    }

    #[test]
    fn long_message_is_truncated() {
        let message = "a".repeat(41);
        let title = chat_title(&message);
        assert_eq!(title, format!("{}...", "a".repeat(40)));

        assert_eq!(chat_title(&"b".repeat(40)), "b".repeat(40));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let message = "中".repeat(45);
        assert_eq!(chat_title(&message), format!("{}...", "中".repeat(40)));
    }
}
