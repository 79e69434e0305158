//! Span markers: the annotations that pin a tracked region to the tree

use super::error::CleanupError;
use crate::syntax::Annotation;
use std::fmt;
use std::str::FromStr;

/// Annotation kind shared by every span marker
pub const SPAN_MARKER_KIND: &str = "SpanMarker";

/// Where a region boundary sits relative to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanMarkerType {
    /// The marker sits on the token just outside the region
    Normal,
    /// Nothing precedes the region; the marker sits on its first token
    BeginningOfFile,
    /// Nothing follows the region; the marker sits on its last token
    EndOfFile,
}

impl fmt::Display for SpanMarkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpanMarkerType::Normal => "Normal",
            SpanMarkerType::BeginningOfFile => "BeginningOfFile",
            SpanMarkerType::EndOfFile => "EndOfFile",
        };
        f.write_str(name)
    }
}

impl FromStr for SpanMarkerType {
    type Err = CleanupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Normal" => Ok(SpanMarkerType::Normal),
            "BeginningOfFile" => Ok(SpanMarkerType::BeginningOfFile),
            "EndOfFile" => Ok(SpanMarkerType::EndOfFile),
            other => Err(CleanupError::MalformedMarker(other.to_string())),
        }
    }
}

/// One boundary of a tracked region
///
/// The annotation payload is `"{marker_type} {opposite_type}"`, so the marker can be
/// decoded from any token that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMarker {
    marker_type: SpanMarkerType,
    opposite_type: SpanMarkerType,
    annotation: Annotation,
}

impl SpanMarker {
    pub fn new(marker_type: SpanMarkerType, opposite_type: SpanMarkerType) -> Self {
        let annotation =
            Annotation::with_data(SPAN_MARKER_KIND, format!("{marker_type} {opposite_type}"));
        Self {
            marker_type,
            opposite_type,
            annotation,
        }
    }

    pub fn from_annotation(annotation: &Annotation) -> Result<Self, CleanupError> {
        let malformed = || CleanupError::MalformedMarker(format!("{annotation:?}"));
        if annotation.kind() != SPAN_MARKER_KIND {
            return Err(malformed());
        }
        let data = annotation.data().ok_or_else(malformed)?;
        let (marker_type, opposite_type) = data.split_once(' ').ok_or_else(malformed)?;
        Ok(Self {
            marker_type: marker_type.parse()?,
            opposite_type: opposite_type.parse()?,
            annotation: annotation.clone(),
        })
    }

    pub fn marker_type(&self) -> SpanMarkerType {
        self.marker_type
    }

    /// Type of the other boundary of the same region
    pub fn opposite_type(&self) -> SpanMarkerType {
        self.opposite_type
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// Start and end annotation of one tracked region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPair {
    start: Annotation,
    end: Annotation,
}

impl MarkerPair {
    pub fn new(start: Annotation, end: Annotation) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> &Annotation {
        &self.start
    }

    pub fn end(&self) -> &Annotation {
        &self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SpanMarkerType::Normal, SpanMarkerType::EndOfFile, "Normal EndOfFile")]
    #[case(SpanMarkerType::BeginningOfFile, SpanMarkerType::Normal, "BeginningOfFile Normal")]
    #[case(SpanMarkerType::EndOfFile, SpanMarkerType::BeginningOfFile, "EndOfFile BeginningOfFile")]
    fn test_marker_payload(
        #[case] marker_type: SpanMarkerType,
        #[case] opposite_type: SpanMarkerType,
        #[case] payload: &str,
    ) {
        let marker = SpanMarker::new(marker_type, opposite_type);
        assert_eq!(marker.annotation().kind(), SPAN_MARKER_KIND);
        assert_eq!(marker.annotation().data(), Some(payload));

        let decoded = SpanMarker::from_annotation(marker.annotation()).unwrap();
        assert_eq!(decoded, marker);
    }

    #[rstest]
    #[case(Annotation::new(SPAN_MARKER_KIND))]
    #[case(Annotation::with_data(SPAN_MARKER_KIND, "Normal"))]
    #[case(Annotation::with_data(SPAN_MARKER_KIND, "Normal Sideways"))]
    #[case(Annotation::with_data("Other", "Normal Normal"))]
    fn test_malformed_markers(#[case] annotation: Annotation) {
        assert!(matches!(
            SpanMarker::from_annotation(&annotation),
            Err(CleanupError::MalformedMarker(_))
        ));
    }
}
