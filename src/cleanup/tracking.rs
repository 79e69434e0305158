//! Locating and classifying the tokens around a tracked span

use super::error::{check_cancelled, CleanupError};
use super::marker::{SpanMarker, SpanMarkerType};
use crate::syntax::{SyntaxToken, SyntaxTree, TokenFilter};
use crate::text::{NormalizedSpans, TextSpan};
use tokio_util::sync::CancellationToken;

/// The four tokens around a span: its first and last token and their outer neighbours
#[derive(Debug, Clone)]
pub struct BracketTokens {
    pub previous: Option<SyntaxToken>,
    pub start: SyntaxToken,
    pub end: SyntaxToken,
    pub next: Option<SyntaxToken>,
}

/// Find the tokens bracketing `span`, or `None` for a tree without tokens
///
/// When the span sits entirely inside trivia the end token would come before the start
/// token; both then collapse to the start token.
pub fn bracket_tokens(
    tree: &SyntaxTree,
    span: TextSpan,
    find_inside_trivia: bool,
) -> Option<BracketTokens> {
    let start = tree.find_token(span.start(), find_inside_trivia)?;
    let end = tree.find_token_from_end(span.end(), find_inside_trivia)?;
    let end = if start.span().end() <= end.span().start() {
        end
    } else {
        start.clone()
    };

    Some(BracketTokens {
        previous: start.previous_token(TokenFilter::all()),
        next: end.next_token(TokenFilter::all()),
        start,
        end,
    })
}

/// Widen every normalized span to token boundaries and renormalize
///
/// A span grows over its outer neighbour token when that token overlaps another
/// normalized span, so spans separated by a single token end up as one region.
pub fn non_overlapping_spans(
    tree: &SyntaxTree,
    spans: &NormalizedSpans,
    find_inside_trivia: bool,
    cancellation: &CancellationToken,
) -> Result<NormalizedSpans, CleanupError> {
    let index = spans.index();
    let mut boundaries = Vec::with_capacity(spans.len());

    for span in spans {
        check_cancelled(cancellation)?;
        let Some(tokens) = bracket_tokens(tree, *span, find_inside_trivia) else {
            continue;
        };

        let start = match &tokens.previous {
            Some(previous) if index.has_overlap(&previous.span()) => previous.span().start(),
            _ => tokens.start.span().start(),
        };
        let end = match &tokens.next {
            Some(next) if index.has_overlap(&next.span()) => next.span().end(),
            _ => tokens.end.span().end(),
        };
        boundaries.push(TextSpan::from_bounds(start, end.max(start)));
    }

    Ok(NormalizedSpans::new(boundaries))
}

/// A region ready for annotation: both markers and the tokens that will carry them
#[derive(Debug, Clone)]
pub struct MarkedSpan {
    pub start_marker: SpanMarker,
    pub start_token: SyntaxToken,
    pub end_marker: SpanMarker,
    pub end_token: SyntaxToken,
}

impl MarkedSpan {
    /// Whether the region runs from the first to the last token of the tree
    pub fn spans_whole_tree(&self) -> bool {
        self.start_marker.marker_type() == SpanMarkerType::BeginningOfFile
            && self.end_marker.marker_type() == SpanMarkerType::EndOfFile
    }
}

/// Create the marker pair for `span` and pick the tokens that carry it
///
/// Markers go on the tokens just outside the region. At the edges of the file there is no
/// such token and the marker goes on the region's own first or last token instead.
pub fn mark_span(tree: &SyntaxTree, span: TextSpan, find_inside_trivia: bool) -> Option<MarkedSpan> {
    let tokens = bracket_tokens(tree, span, find_inside_trivia)?;

    let start_type = match tokens.previous {
        Some(_) => SpanMarkerType::Normal,
        None => SpanMarkerType::BeginningOfFile,
    };
    let end_type = match tokens.next {
        Some(_) => SpanMarkerType::Normal,
        None => SpanMarkerType::EndOfFile,
    };

    Some(MarkedSpan {
        start_marker: SpanMarker::new(start_type, end_type),
        start_token: tokens.previous.unwrap_or(tokens.start),
        end_marker: SpanMarker::new(end_type, start_type),
        end_token: tokens.next.unwrap_or(tokens.end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &BracketTokens) -> (Option<&str>, &str, &str, Option<&str>) {
        (
            tokens.previous.as_ref().map(|t| t.text()),
            tokens.start.text(),
            tokens.end.text(),
            tokens.next.as_ref().map(|t| t.text()),
        )
    }

    #[test]
    fn test_bracket_tokens_in_the_middle() {
        let tree = SyntaxTree::parse("a b c d e");
        let tokens = bracket_tokens(&tree, TextSpan::from_bounds(2, 5), true).unwrap();
        assert_eq!(texts(&tokens), (Some("a"), "b", "c", Some("d")));
    }

    #[test]
    fn test_bracket_tokens_at_the_edges() {
        let tree = SyntaxTree::parse("a b c");
        let tokens = bracket_tokens(&tree, TextSpan::from_bounds(0, 5), true).unwrap();
        assert_eq!(texts(&tokens), (None, "a", "c", None));
    }

    #[test]
    fn test_span_inside_trivia_collapses_to_start_token() {
        let tree = SyntaxTree::parse("a    b");
        // [2, 3) lies in the trailing trivia of "a"
        let tokens = bracket_tokens(&tree, TextSpan::from_bounds(2, 3), true).unwrap();
        assert_eq!(texts(&tokens), (None, "a", "a", Some("b")));
    }

    #[test]
    fn test_empty_tree_has_nothing_to_bracket() {
        let tree = SyntaxTree::parse("");
        assert!(bracket_tokens(&tree, TextSpan::from_bounds(0, 0), true).is_none());
    }

    #[test]
    fn test_spans_one_token_apart_merge() {
        let tree = SyntaxTree::parse("ab cd ef gh");
        let spans = NormalizedSpans::new([TextSpan::from_bounds(0, 2), TextSpan::from_bounds(4, 8)]);
        assert_eq!(spans.len(), 2);

        let merged =
            non_overlapping_spans(&tree, &spans, true, &CancellationToken::new()).unwrap();
        assert_eq!(merged.as_slice(), &[TextSpan::from_bounds(0, 8)]);
    }

    #[test]
    fn test_distant_spans_stay_apart() {
        let tree = SyntaxTree::parse("a b c d e f");
        let spans = NormalizedSpans::new([TextSpan::from_bounds(0, 1), TextSpan::from_bounds(10, 11)]);
        let boundaries =
            non_overlapping_spans(&tree, &spans, true, &CancellationToken::new()).unwrap();
        assert_eq!(boundaries.len(), 2);
    }

    #[test]
    fn test_non_overlapping_spans_honours_cancellation() {
        let tree = SyntaxTree::parse("a b");
        let spans = NormalizedSpans::new([TextSpan::from_bounds(0, 1)]);
        let cancellation = CancellationToken::new();
        cancellation.cancel();
        assert_eq!(
            non_overlapping_spans(&tree, &spans, true, &cancellation).unwrap_err(),
            CleanupError::Cancelled
        );
    }

    #[test]
    fn test_mark_span_uses_outer_neighbours() {
        let tree = SyntaxTree::parse("a b c d e");
        let marked = mark_span(&tree, TextSpan::from_bounds(2, 5), true).unwrap();
        assert_eq!(marked.start_token.text(), "a");
        assert_eq!(marked.end_token.text(), "d");
        assert_eq!(marked.start_marker.marker_type(), SpanMarkerType::Normal);
        assert_eq!(marked.end_marker.opposite_type(), SpanMarkerType::Normal);
        assert!(!marked.spans_whole_tree());
    }

    #[test]
    fn test_mark_span_at_file_edges() {
        let tree = SyntaxTree::parse("a b c");
        let marked = mark_span(&tree, TextSpan::from_bounds(0, 3), true).unwrap();
        assert_eq!(marked.start_token.text(), "a");
        assert_eq!(marked.start_marker.marker_type(), SpanMarkerType::BeginningOfFile);
        assert_eq!(marked.start_marker.opposite_type(), SpanMarkerType::Normal);
        assert_eq!(marked.end_token.text(), "c");
        assert_eq!(marked.end_marker.marker_type(), SpanMarkerType::Normal);
        assert_eq!(marked.end_marker.opposite_type(), SpanMarkerType::BeginningOfFile);

        let padded = SyntaxTree::parse(" a b ");
        let whole = mark_span(&padded, TextSpan::from_bounds(1, 4), true).unwrap();
        assert!(whole.spans_whole_tree());
        assert_eq!(whole.start_token.text(), "a");
        assert_eq!(whole.end_token.text(), "b");
    }
}
