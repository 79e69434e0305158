//! Span-tracking cleanup pipeline
//!
//! The caller hands [`CodeCleaner`] a document and the spans it cares about. The spans are
//! normalized, each resulting region is pinned to the tree by a pair of marker annotations on
//! the tokens just outside it, and the stages run one after another. Whenever a stage
//! rewrites the tree, the regions are read back from wherever the markers ended up, so the
//! next stage sees spans over the new text without any text diffing.
//!
//! Components, leaves first:
//!
//! - [`tracking`]: find the tokens bracketing a span and classify its boundaries
//! - [`annotate`]: attach the marker annotations to the tree
//! - [`recover`]: turn marker pairs back into spans after a rewrite
//! - [`cleaner`]: the driver iterating the stages

pub mod annotate;
pub mod cleaner;
pub mod document;
pub mod error;
pub mod marker;
pub mod recover;
pub mod registry;
pub mod stage;
pub mod stages;
pub mod tracking;

pub use cleaner::{CleanupOptions, CodeCleaner};
pub use document::Document;
pub use error::{check_cancelled, CleanupError};
pub use marker::{MarkerPair, SpanMarker, SpanMarkerType, SPAN_MARKER_KIND};
pub use registry::StageRegistry;
pub use stage::{CleanupStage, FnStage, StageKind};
pub use stages::{CollapseSpaces, TrimTrailingWhitespace};
pub use tokio_util::sync::CancellationToken;
