//! Attaching span markers to a tree, and taking them off again

use super::error::{check_cancelled, CleanupError};
use super::marker::MarkerPair;
use super::tracking::{mark_span, non_overlapping_spans};
use crate::syntax::{Annotation, SyntaxToken, SyntaxTree};
use crate::text::NormalizedSpans;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of annotating a tree
#[derive(Debug, Clone)]
pub enum Annotated {
    /// The regions cover every token, so the whole tree is the span and nothing was attached
    WholeTree,
    /// `tree` carries one marker pair per tracked region
    Tracked {
        tree: SyntaxTree,
        pairs: Vec<MarkerPair>,
    },
}

/// Pin each normalized span to `tree` with a pair of marker annotations
pub fn annotate(
    tree: &SyntaxTree,
    spans: &NormalizedSpans,
    find_inside_trivia: bool,
    cancellation: &CancellationToken,
) -> Result<Annotated, CleanupError> {
    let regions = non_overlapping_spans(tree, spans, find_inside_trivia, cancellation)?;

    let mut pending: HashMap<SyntaxToken, Vec<Annotation>> = HashMap::new();
    let mut pairs = Vec::with_capacity(regions.len());
    let mut whole_tree = false;

    for region in &regions {
        check_cancelled(cancellation)?;
        let Some(marked) = mark_span(tree, *region, find_inside_trivia) else {
            continue;
        };
        whole_tree = marked.spans_whole_tree();

        pending
            .entry(marked.start_token)
            .or_default()
            .push(marked.start_marker.annotation().clone());
        pending
            .entry(marked.end_token)
            .or_default()
            .push(marked.end_marker.annotation().clone());
        pairs.push(MarkerPair::new(
            marked.start_marker.annotation().clone(),
            marked.end_marker.annotation().clone(),
        ));
    }

    if pairs.is_empty() || (pairs.len() == 1 && whole_tree) {
        debug!(regions = regions.len(), "regions cover the whole tree");
        return Ok(Annotated::WholeTree);
    }

    let tokens: Vec<SyntaxToken> = pending.keys().cloned().collect();
    let annotated = tree.replace_tokens(tokens, |token| {
        let annotations = pending.remove(token).unwrap_or_default();
        token.token().clone().with_additional_annotations(annotations)
    });
    debug!(pairs = pairs.len(), "attached span markers");

    Ok(Annotated::Tracked {
        tree: annotated,
        pairs,
    })
}

/// Remove every marker of `pairs` from `tree`
///
/// Only tokens that still carry a marker are rewritten; a tree without any is returned as is.
pub fn remove_markers(tree: &SyntaxTree, pairs: &[MarkerPair]) -> SyntaxTree {
    let markers: Vec<Annotation> = pairs
        .iter()
        .flat_map(|pair| [pair.start().clone(), pair.end().clone()])
        .collect();
    let carriers: Vec<SyntaxToken> = markers
        .iter()
        .flat_map(|marker| tree.annotated_tokens(marker))
        .collect();
    tree.replace_tokens(carriers, |token| {
        token.token().clone().without_annotations(&markers)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::marker::SpanMarker;
    use crate::text::TextSpan;

    fn annotate_spans(tree: &SyntaxTree, spans: &[TextSpan]) -> Annotated {
        let spans = NormalizedSpans::new(spans.iter().copied());
        annotate(tree, &spans, true, &CancellationToken::new()).unwrap()
    }

    #[test]
    fn test_markers_land_on_sentinel_tokens() {
        let tree = SyntaxTree::parse("a b c d e");
        let Annotated::Tracked { tree: annotated, pairs } =
            annotate_spans(&tree, &[TextSpan::from_bounds(2, 5)])
        else {
            panic!("expected tracked regions");
        };
        assert_eq!(pairs.len(), 1);
        assert_eq!(annotated.text(), tree.text());

        let start = annotated.annotated_tokens(pairs[0].start());
        let end = annotated.annotated_tokens(pairs[0].end());
        assert_eq!(start.len(), 1);
        assert_eq!(start[0].text(), "a");
        assert_eq!(end.len(), 1);
        assert_eq!(end[0].text(), "d");
        assert!(SpanMarker::from_annotation(pairs[0].start()).is_ok());
    }

    #[test]
    fn test_shared_sentinel_carries_both_markers() {
        // "c" closes the first region and opens the second one
        let tree = SyntaxTree::parse("a b c d e");
        let Annotated::Tracked { tree: annotated, pairs } = annotate_spans(
            &tree,
            &[TextSpan::from_bounds(2, 3), TextSpan::from_bounds(6, 7)],
        ) else {
            panic!("expected tracked regions");
        };
        assert_eq!(pairs.len(), 2);
        let c = annotated.annotated_tokens(pairs[0].end());
        assert_eq!(c[0].text(), "c");
        assert!(c[0].has_annotation(pairs[1].start()));
        assert_eq!(c[0].annotations().len(), 2);
    }

    #[test]
    fn test_whole_tree_region_is_not_annotated() {
        let tree = SyntaxTree::parse(" a b ");
        assert!(matches!(
            annotate_spans(&tree, &[TextSpan::from_bounds(1, 4)]),
            Annotated::WholeTree
        ));
    }

    #[test]
    fn test_tokenless_tree_is_whole_tree() {
        let tree = SyntaxTree::parse("");
        assert!(matches!(
            annotate_spans(&tree, &[TextSpan::from_bounds(0, 0)]),
            Annotated::WholeTree
        ));
    }

    #[test]
    fn test_remove_markers() {
        let tree = SyntaxTree::parse("a b c d e");
        let Annotated::Tracked { tree: annotated, pairs } =
            annotate_spans(&tree, &[TextSpan::from_bounds(2, 5)])
        else {
            panic!("expected tracked regions");
        };
        let stripped = remove_markers(&annotated, &pairs);
        assert!(stripped.annotated_tokens(pairs[0].start()).is_empty());
        assert!(stripped.annotated_tokens(pairs[0].end()).is_empty());
        assert!(!stripped.root().contains_annotations());

        let untouched = remove_markers(&tree, &pairs);
        assert!(untouched.is_same(&tree));
    }
}
