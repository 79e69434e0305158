//! Span normalization
//!
//! Callers may hand the cleaner any pile of spans: unsorted, overlapping, duplicated.
//! [`NormalizedSpans`] turns that into the canonical form every later phase relies on:
//! sorted by start, with overlapping or touching spans merged into one.
//!
//! [`SpanIndex`] is the membership test the token marker runs against the normalized set
//! ("does the token just outside this region overlap some other region?").

use crate::text::span::TextSpan;

/// A sorted set of disjoint, non-adjacent spans
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedSpans {
    spans: Vec<TextSpan>,
}

impl NormalizedSpans {
    /// Normalize an arbitrary collection of spans
    pub fn new<I>(spans: I) -> Self
    where
        I: IntoIterator<Item = TextSpan>,
    {
        let mut sorted: Vec<TextSpan> = spans.into_iter().collect();
        sorted.sort();

        let mut merged: Vec<TextSpan> = Vec::with_capacity(sorted.len());
        for span in sorted {
            match merged.last_mut() {
                Some(last) if span.start() <= last.end() => *last = last.union(&span),
                _ => merged.push(span),
            }
        }

        Self { spans: merged }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn as_slice(&self) -> &[TextSpan] {
        &self.spans
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextSpan> {
        self.spans.iter()
    }

    /// True when the set collapses to a single span containing `full_span`
    pub fn covers(&self, full_span: TextSpan) -> bool {
        matches!(self.spans.as_slice(), [only] if only.contains(&full_span))
    }

    /// Build an overlap index over this set
    pub fn index(&self) -> SpanIndex<'_> {
        SpanIndex { spans: &self.spans }
    }
}

impl<'a> IntoIterator for &'a NormalizedSpans {
    type Item = &'a TextSpan;
    type IntoIter = std::slice::Iter<'a, TextSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

/// Overlap queries over a normalized span set
///
/// Because the underlying spans are sorted and disjoint, both their starts and their ends
/// are monotonic, so a binary search finds the only candidate in O(log n).
#[derive(Debug, Clone, Copy)]
pub struct SpanIndex<'a> {
    spans: &'a [TextSpan],
}

impl SpanIndex<'_> {
    /// Check whether any indexed span strictly overlaps `span`
    pub fn has_overlap(&self, span: &TextSpan) -> bool {
        let first_candidate = self.spans.partition_point(|s| s.end() <= span.start());
        self.spans[first_candidate..]
            .iter()
            .take_while(|s| s.start() < span.end())
            .any(|s| s.overlaps_with(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn spans(bounds: &[(usize, usize)]) -> Vec<TextSpan> {
        bounds
            .iter()
            .map(|&(start, end)| TextSpan::from_bounds(start, end))
            .collect()
    }

    #[rstest]
    #[case::empty(&[], &[])]
    #[case::single(&[(2, 4)], &[(2, 4)])]
    #[case::unsorted(&[(6, 8), (0, 2)], &[(0, 2), (6, 8)])]
    #[case::overlapping(&[(0, 5), (3, 9)], &[(0, 9)])]
    #[case::adjacent(&[(0, 5), (5, 10)], &[(0, 10)])]
    #[case::nested(&[(0, 10), (2, 3)], &[(0, 10)])]
    #[case::duplicates(&[(1, 3), (1, 3)], &[(1, 3)])]
    #[case::empty_span_touching(&[(0, 5), (5, 5)], &[(0, 5)])]
    #[case::empty_span_alone(&[(7, 7)], &[(7, 7)])]
    fn test_normalize(#[case] input: &[(usize, usize)], #[case] expected: &[(usize, usize)]) {
        let normalized = NormalizedSpans::new(spans(input));
        assert_eq!(normalized.as_slice(), spans(expected).as_slice());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = NormalizedSpans::new(spans(&[(9, 12), (0, 3), (2, 5), (12, 13)]));
        let twice = NormalizedSpans::new(once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_covers_whole_document() {
        let full = TextSpan::from_bounds(0, 20);
        assert!(NormalizedSpans::new(spans(&[(0, 20)])).covers(full));
        assert!(NormalizedSpans::new(spans(&[(0, 25)])).covers(full));
        assert!(!NormalizedSpans::new(spans(&[(0, 19)])).covers(full));
        assert!(!NormalizedSpans::new(spans(&[(0, 5), (6, 20)])).covers(full));
        assert!(!NormalizedSpans::default().covers(full));
    }

    #[rstest]
    #[case::inside((3, 4), true)]
    #[case::straddles_start((0, 3), true)]
    #[case::touches_end((5, 7), false)]
    #[case::between((6, 9), false)]
    #[case::second_span((9, 11), true)]
    #[case::past_everything((20, 30), false)]
    #[case::empty_query((3, 3), false)]
    fn test_span_index(#[case] query: (usize, usize), #[case] expected: bool) {
        let normalized = NormalizedSpans::new(spans(&[(2, 5), (10, 12)]));
        let query = TextSpan::from_bounds(query.0, query.1);
        assert_eq!(normalized.index().has_overlap(&query), expected);
    }
}
