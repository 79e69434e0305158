//! Text-level primitives: spans, span normalization and text changes.

pub mod changes;
pub mod normalize;
pub mod span;

pub use changes::{text_changes, TextChange};
pub use normalize::{NormalizedSpans, SpanIndex};
pub use span::TextSpan;
