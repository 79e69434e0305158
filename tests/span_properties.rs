//! Property-based tests for span normalization, parsing and span tracking

use proptest::prelude::*;
use spanclean::cleanup::{CancellationToken, CleanupStage, CodeCleaner, Document, FnStage};
use spanclean::syntax::SyntaxTree;
use spanclean::text::{NormalizedSpans, TextSpan};
use std::sync::{Arc, Mutex};

fn spans() -> impl Strategy<Value = Vec<TextSpan>> {
    prop::collection::vec((0usize..200, 0usize..40), 0..12).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(start, len)| TextSpan::new(start, len))
            .collect()
    })
}

/// Space separated words plus a span running from the start of one word to the end of another
fn words_and_span() -> impl Strategy<Value = (String, TextSpan)> {
    prop::collection::vec("[a-z]{1,4}", 1..8)
        .prop_flat_map(|words| {
            let count = words.len();
            (Just(words), 0..count, 0..count)
        })
        .prop_map(|(words, a, b)| {
            let (first, last) = (a.min(b), a.max(b));
            let mut starts = Vec::with_capacity(words.len());
            let mut offset = 0;
            for word in &words {
                starts.push(offset);
                offset += word.len() + 1;
            }
            let span = TextSpan::from_bounds(starts[first], starts[last] + words[last].len());
            (words.join(" "), span)
        })
}

proptest! {
    #[test]
    fn normalization_is_idempotent(input in spans()) {
        let once = NormalizedSpans::new(input);
        let twice = NormalizedSpans::new(once.iter().copied());
        prop_assert_eq!(once.as_slice(), twice.as_slice());
    }

    #[test]
    fn normalized_spans_are_sorted_and_apart(input in spans()) {
        let normalized = NormalizedSpans::new(input.clone());
        for pair in normalized.as_slice().windows(2) {
            prop_assert!(pair[0].end() < pair[1].start());
        }
        for span in &input {
            prop_assert!(normalized.iter().any(|n| n.contains(span)));
        }
    }

    #[test]
    fn parsing_is_lossless(text in "[ -~\t\n]{0,60}") {
        prop_assert_eq!(SyntaxTree::parse(&text).text(), text);
    }

    #[test]
    fn token_aligned_spans_round_trip((text, span) in words_and_span()) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record: Arc<dyn CleanupStage> = {
            let seen = seen.clone();
            Arc::new(FnStage::new("record", move |document, spans, _| {
                seen.lock().unwrap().push(spans.to_vec());
                Ok(document.clone())
            }))
        };
        let cleaner = CodeCleaner::new(vec![record]);
        let document = Document::parse("words", &text);

        let result = cleaner.cleanup(&document, &[span], &CancellationToken::new()).unwrap();
        prop_assert!(result.is_same(&document));
        prop_assert_eq!(seen.lock().unwrap().clone(), vec![vec![span]]);
    }
}
