//! Canonical string form of a document.
//!
//! Text runs are written verbatim and every formula as `$raw$`, using the raw
//! buffer rather than the normalized preview. [`parse_content`] goes the
//! other way for loading stored content and for paste.

use crate::document::Segment;
use crate::store::FormulaStore;

/// Walk the segments in order and produce the canonical string.
///
/// Read-only; nodes still being edited are written with their current buffer.
pub fn serialize_segments(segments: &[Segment], store: &FormulaStore) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Formula(id) => match store.get(id) {
                Some(node) => {
                    out.push('$');
                    out.push_str(&node.raw_content());
                    out.push('$');
                }
                None => tracing::debug!(%id, "segment references missing node, skipped"),
            },
        }
    }
    out
}

/// A piece of canonical content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentPiece<'a> {
    Text(&'a str),
    Formula(&'a str),
}

/// Split a canonical string into text and formula pieces.
///
/// `$x$` and `$$x$$` become formulas. A `$` without a partner, or a pair
/// around blank content, stays literal text.
pub fn parse_content(input: &str) -> Vec<ContentPiece<'_>> {
    let mut pieces = Vec::new();
    let mut text_from = 0;
    let mut cursor = 0;

    while let Some(found) = input[cursor..].find('$') {
        let open = cursor + found;
        let (delim, body_start) = if input[open..].starts_with("$$") {
            ("$$", open + 2)
        } else {
            ("$", open + 1)
        };

        let Some(close) = input[body_start..].find(delim).map(|p| body_start + p) else {
            cursor = body_start;
            continue;
        };
        let body = &input[body_start..close];
        if body.trim().is_empty() {
            cursor = body_start;
            continue;
        }

        if open > text_from {
            pieces.push(ContentPiece::Text(&input[text_from..open]));
        }
        pieces.push(ContentPiece::Formula(body));
        cursor = close + delim.len();
        text_from = cursor;
    }

    if text_from < input.len() {
        pieces.push(ContentPiece::Text(&input[text_from..]));
    }
    pieces
}
