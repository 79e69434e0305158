//! Byte-offset spans over document text
//!
//! [`TextSpan`] is the unit the whole pipeline speaks: callers hand spans in, stages receive
//! spans, and the recoverer hands spans back after each rewrite.
//!
//! ## Key Design
//!
//! - **Half-open**: `[start, end)`, so adjacent spans share a boundary without overlapping
//! - **Validated construction**: `end >= start` always holds; [`TextSpan::try_from_bounds`] is
//!   the fallible constructor used when bounds are computed from rewritten trees, and
//!   deserialization goes through the same check
//! - **Interop**: converts to and from `std::ops::Range<usize>`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range as ByteRange;

/// A half-open range `[start, end)` of byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct TextSpan {
    start: usize,
    end: usize,
}

/// Wire form of a span, checked before it becomes a [`TextSpan`]
#[derive(Deserialize)]
struct RawSpan {
    start: usize,
    end: usize,
}

impl TryFrom<RawSpan> for TextSpan {
    type Error = String;

    fn try_from(raw: RawSpan) -> Result<Self, Self::Error> {
        TextSpan::try_from_bounds(raw.start, raw.end)
            .ok_or_else(|| format!("inverted span bounds {}..{}", raw.start, raw.end))
    }
}

impl TextSpan {
    /// Create a span from a start offset and a length
    ///
    /// The end saturates at `usize::MAX`.
    pub fn new(start: usize, length: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(length),
        }
    }

    /// Create a span from its bounds
    ///
    /// Inverted bounds are clamped to an empty span at `start`; use
    /// [`TextSpan::try_from_bounds`] when the bounds are not known to be ordered.
    pub fn from_bounds(start: usize, end: usize) -> Self {
        debug_assert!(end >= start, "inverted span bounds {start}..{end}");
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Create a span from bounds that may be inverted
    pub fn try_from_bounds(start: usize, end: usize) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check whether `other` lies entirely inside this span
    pub fn contains(&self, other: &TextSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check whether the two spans share at least one offset
    ///
    /// Empty spans never overlap anything.
    pub fn overlaps_with(&self, other: &TextSpan) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    /// Smallest span covering both spans
    pub fn union(&self, other: &TextSpan) -> TextSpan {
        TextSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn as_range(&self) -> ByteRange<usize> {
        self.start..self.end
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

impl From<ByteRange<usize>> for TextSpan {
    fn from(range: ByteRange<usize>) -> Self {
        TextSpan::from_bounds(range.start, range.end)
    }
}

impl From<TextSpan> for ByteRange<usize> {
    fn from(span: TextSpan) -> Self {
        span.as_range()
    }
}
