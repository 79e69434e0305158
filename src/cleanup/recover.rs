//! Reading tracked regions back out of a rewritten tree

use super::error::{check_cancelled, CleanupError};
use super::marker::{MarkerPair, SpanMarker, SpanMarkerType};
use crate::syntax::{Annotation, SyntaxToken, SyntaxTree, TokenFilter};
use crate::text::TextSpan;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Resolve every marker pair against `tree`
///
/// Pairs that no longer resolve to exactly one span are dropped. The result keeps the order
/// of `pairs`.
pub fn recover_spans(
    tree: &SyntaxTree,
    pairs: &[MarkerPair],
    cancellation: &CancellationToken,
) -> Result<Vec<TextSpan>, CleanupError> {
    let mut spans = Vec::with_capacity(pairs.len());
    for pair in pairs {
        check_cancelled(cancellation)?;
        let start = decode(pair.start())?;
        let end = decode(pair.end())?;

        let start_tokens = tree.annotated_tokens(start.annotation());
        let end_tokens = tree.annotated_tokens(end.annotation());

        match resolve(tree, &start, &start_tokens, &end, &end_tokens) {
            Some(span) => spans.push(span),
            None => debug!(
                start_matches = start_tokens.len(),
                end_matches = end_tokens.len(),
                "dropping span whose markers no longer resolve"
            ),
        }
    }
    Ok(spans)
}

fn decode(annotation: &Annotation) -> Result<SpanMarker, CleanupError> {
    let marker = SpanMarker::from_annotation(annotation);
    debug_assert!(marker.is_ok(), "span marker {annotation:?} does not decode");
    marker
}

/// One side of a pair: where it resolved to, if anywhere
enum Side {
    Missing,
    At(usize),
}

fn resolve(
    tree: &SyntaxTree,
    start: &SpanMarker,
    start_tokens: &[SyntaxToken],
    end: &SpanMarker,
    end_tokens: &[SyntaxToken],
) -> Option<TextSpan> {
    let start_side = match start_tokens {
        [] => Side::Missing,
        [token] => Side::At(start_position(token, start.marker_type())),
        _ if start.marker_type() == SpanMarkerType::BeginningOfFile => Side::At(0),
        _ => return None,
    };
    let end_side = match end_tokens {
        [] => Side::Missing,
        [token] => Side::At(end_position(token, end.marker_type())),
        _ if end.marker_type() == SpanMarkerType::EndOfFile => Side::At(tree.len()),
        _ => return None,
    };

    let (start_offset, end_offset) = match (start_side, end_side) {
        (Side::At(s), Side::At(e)) => (s, e),
        (Side::Missing, Side::At(e)) if end.opposite_type() == SpanMarkerType::BeginningOfFile => {
            (0, e)
        }
        (Side::At(s), Side::Missing) if start.opposite_type() == SpanMarkerType::EndOfFile => {
            (s, tree.len())
        }
        _ => return None,
    };
    TextSpan::try_from_bounds(start_offset, end_offset)
}

/// Start of the region whose start marker sits on `token`
fn start_position(token: &SyntaxToken, marker_type: SpanMarkerType) -> usize {
    match marker_type {
        SpanMarkerType::Normal => token
            .next_token(TokenFilter::all())
            .map(|next| next.span().start())
            .unwrap_or_else(|| token.full_span().end()),
        SpanMarkerType::BeginningOfFile | SpanMarkerType::EndOfFile => token.span().start(),
    }
}

/// End of the region whose end marker sits on `token`
fn end_position(token: &SyntaxToken, marker_type: SpanMarkerType) -> usize {
    match marker_type {
        SpanMarkerType::Normal => token
            .previous_token(TokenFilter::all())
            .map(|previous| previous.span().end())
            .unwrap_or_else(|| token.full_span().start()),
        SpanMarkerType::BeginningOfFile | SpanMarkerType::EndOfFile => token.span().end(),
    }
}
