//! Line layout of the message feed
//!
//! The feed is laid out once into plain lines so that the scroll height used
//! for offset bookkeeping is exactly what the renderer draws.

use crate::api::types::Message;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// One rendered line of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLine {
    /// Author and timestamp line that opens a message
    Header {
        /// Author display name
        author: String,
        /// Formatted timestamp
        timestamp: String,
    },
    /// A (wrapped) line of the message body
    Body(String),
    /// Blank line between messages
    Separator,
}

/// Lay out messages into lines, wrapping bodies at `width` terminal columns
///
/// A `width` of zero disables wrapping.
pub fn layout_messages(messages: &[&Message], width: usize) -> Vec<FeedLine> {
    let mut lines = Vec::new();

    for message in messages {
        lines.push(FeedLine::Header {
            author: message.user_name.clone(),
            timestamp: message.display_timestamp(),
        });

        if message.content.is_empty() {
            lines.push(FeedLine::Body(String::new()));
        } else {
            for raw in message.content.lines() {
                lines.extend(wrap(raw, width).into_iter().map(FeedLine::Body));
            }
        }

        lines.push(FeedLine::Separator);
    }

    lines
}

/// Split one body line into pieces at most `width` terminal columns wide
///
/// Breaks at spaces; a word wider than the pane is split between glyphs.
fn wrap(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.width() <= width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split(' ') {
        let word_width = word.width();
        let gap = usize::from(!current.is_empty());

        if current_width + gap + word_width <= width {
            if gap == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += gap + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for c in word.chars() {
            let char_width = c.width().unwrap_or(0);
            if current_width + char_width > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += char_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(lines: &[FeedLine]) -> Vec<&str> {
        lines
            .iter()
            .filter_map(|line| match line {
                FeedLine::Body(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_layout_shape() {
        let short = Message::new("1", "alice", "hi", "");
        let multi = Message::new("2", "bob", "first\nsecond", "");
        let empty = Message::new("3", "dave", "", "");

        let lines = layout_messages(&[&short, &multi, &empty], 20);

        assert_eq!(bodies(&lines), vec!["hi", "first", "second", ""]);
        assert_eq!(lines.len(), 10);
        assert!(matches!(lines[0], FeedLine::Header { .. }));
        assert_eq!(lines[2], FeedLine::Separator);
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let message = Message::new("1", "alice", "the quick brown fox jumps", "");
        let lines = layout_messages(&[&message], 10);

        assert_eq!(bodies(&lines), vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_long_word_is_split_between_glyphs() {
        let message = Message::new("1", "alice", "see abcdefghijklmnop", "");
        let lines = layout_messages(&[&message], 6);

        assert_eq!(bodies(&lines), vec!["see", "abcdef", "ghijkl", "mnop"]);
    }

    #[test]
    fn test_body_lines_fit_pane_columns() {
        let messages = [
            Message::new("1", "a", "你好世界你好世界你好", ""),
            Message::new("2", "b", "猫 は かわいい 😺😺😺😺😺😺 meow", ""),
            Message::new("3", "c", "mixed 漢字and ascii そして more text here", ""),
        ];
        let refs: Vec<&Message> = messages.iter().collect();

        for width in [2, 5, 10, 17] {
            let lines = layout_messages(&refs, width);
            for body in bodies(&lines) {
                assert!(
                    body.width() <= width,
                    "{:?} is {} columns wide in a {}-column pane",
                    body,
                    body.width(),
                    width
                );
            }
        }

        let wide = layout_messages(&refs[..1], 10);
        assert_eq!(bodies(&wide), vec!["你好世界你", "好世界你好"]);
    }

    #[test]
    fn test_zero_width_disables_wrapping() {
        let message = Message::new("1", "alice", "abcdefghij klmnop", "");
        let lines = layout_messages(&[&message], 0);

        assert_eq!(bodies(&lines), vec!["abcdefghij klmnop"]);
    }
}
