//! Text buffer abstraction for formula storage.
//!
//! The `TextBuffer` trait provides a common interface for the raw buffer
//! behind each formula node, so the lifecycle code never cares whether the
//! characters live in a rope or somewhere else.

use std::ops::Range;

/// A text buffer that supports char-offset editing.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait TextBuffer {
    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Check if the buffer holds nothing but whitespace.
    fn is_blank(&self) -> bool;

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace the whole content.
    fn set(&mut self, text: &str) {
        self.delete(0..self.len_chars());
        self.insert(0, text);
    }

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;
}

/// Ropey-backed text buffer.
#[derive(Clone, Debug, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn is_blank(&self) -> bool {
        self.rope.chars().all(char::is_whitespace)
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        let len = self.rope.len_chars();
        let end = char_range.end.min(len);
        let start = char_range.start.min(end);
        self.rope.remove(start..end);
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut rope = EditorRope::from_str("x^2");
        assert_eq!(rope.len_chars(), 3);

        rope.insert(3, "+1");
        assert_eq!(rope.to_string(), "x^2+1");

        rope.delete(1..3);
        assert_eq!(rope.to_string(), "x+1");
    }

    #[test]
    fn test_out_of_range_edits_clamp() {
        let mut rope = EditorRope::from_str("ab");
        rope.insert(10, "c");
        assert_eq!(rope.to_string(), "abc");

        rope.delete(1..10);
        assert_eq!(rope.to_string(), "a");
    }

    #[test]
    fn test_blank() {
        assert!(EditorRope::default().is_blank());
        assert!(EditorRope::from_str("  \t").is_blank());
        assert!(!EditorRope::from_str(" x ").is_blank());
    }

    #[test]
    fn test_set_replaces_everything() {
        let mut rope = EditorRope::from_str("old");
        rope.set("new content");
        assert_eq!(rope.to_string(), "new content");
    }
}
