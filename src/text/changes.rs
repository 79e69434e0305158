//! Text changes between two versions of a document
//!
//! Cleanup stages rewrite trees, not text, so the edit list a caller wants to apply to a
//! buffer has to be recovered afterwards. We diff the two texts at character granularity
//! and coalesce runs of deletes and inserts into single replacements expressed as byte
//! offsets over the old text.

use crate::text::span::TextSpan;
use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};
use std::fmt;

/// Replace the text covered by `span` (in the old text) with `new_text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChange {
    pub span: TextSpan,
    pub new_text: String,
}

impl TextChange {
    pub fn new(span: TextSpan, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    /// A pure insertion at `offset`
    pub fn insert(offset: usize, new_text: impl Into<String>) -> Self {
        Self::new(TextSpan::new(offset, 0), new_text)
    }
}

impl fmt::Display for TextChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {:?}", self.span, self.new_text)
    }
}

/// Compute the coalesced changes turning `old` into `new`
pub fn text_changes(old: &str, new: &str) -> Vec<TextChange> {
    if old == new {
        return Vec::new();
    }

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(old, new);

    let mut changes = Vec::new();
    let mut pending: Option<PendingChange> = None;
    let mut cursor = 0usize;

    for change in diff.iter_all_changes() {
        let value = change.value();
        match change.tag() {
            ChangeTag::Equal => {
                flush(&mut pending, &mut changes);
                cursor += value.len();
            }
            ChangeTag::Delete => {
                pending_at(&mut pending, &mut changes, cursor).end += value.len();
                cursor += value.len();
            }
            ChangeTag::Insert => {
                pending_at(&mut pending, &mut changes, cursor)
                    .new_text
                    .push_str(value);
            }
        }
    }

    flush(&mut pending, &mut changes);
    changes
}

struct PendingChange {
    start: usize,
    end: usize,
    new_text: String,
}

/// Return the pending change that ends at `offset`, starting a new one if needed
fn pending_at<'a>(
    pending: &'a mut Option<PendingChange>,
    changes: &mut Vec<TextChange>,
    offset: usize,
) -> &'a mut PendingChange {
    if pending.as_ref().is_some_and(|current| current.end != offset) {
        flush(pending, changes);
    }
    pending.get_or_insert_with(|| PendingChange {
        start: offset,
        end: offset,
        new_text: String::new(),
    })
}

fn flush(pending: &mut Option<PendingChange>, changes: &mut Vec<TextChange>) {
    if let Some(change) = pending.take() {
        changes.push(TextChange::new(
            TextSpan::from_bounds(change.start, change.end),
            change.new_text,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_have_no_changes() {
        assert!(text_changes("same", "same").is_empty());
    }

    #[test]
    fn test_single_insertion() {
        let changes = text_changes("a{b", "a {b");
        assert_eq!(changes, vec![TextChange::insert(1, " ")]);
    }

    #[test]
    fn test_single_deletion() {
        let changes = text_changes("a   b", "a b");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].span.len(), 2);
        assert_eq!(changes[0].new_text, "");
    }

    #[test]
    fn test_replacement_is_coalesced() {
        let changes = text_changes("let x = 1;", "let y = 1;");
        assert_eq!(
            changes,
            vec![TextChange::new(TextSpan::from_bounds(4, 5), "y")]
        );
    }

    #[test]
    fn test_separate_edits_stay_separate() {
        let changes = text_changes("a b c", "A b C");
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].span, TextSpan::from_bounds(0, 1));
        assert_eq!(changes[1].span, TextSpan::from_bounds(4, 5));
    }

    #[test]
    fn test_multibyte_offsets_are_bytes() {
        let changes = text_changes("é x", "é  x");
        assert_eq!(changes.len(), 1);
        // "é" is two bytes
        assert!(changes[0].span.start() >= 2);
        assert_eq!(changes[0].new_text, " ");
    }

    #[test]
    fn test_applying_changes_reproduces_new_text() {
        let old = "fn main() {  let a=1 ;}";
        let new = "fn main() { let a = 1; }";
        let mut rebuilt = old.to_string();
        for change in text_changes(old, new).iter().rev() {
            rebuilt.replace_range(change.span.as_range(), &change.new_text);
        }
        assert_eq!(rebuilt, new);
    }
}
