//! The cleanup stage contract

use super::document::Document;
use super::error::CleanupError;
use crate::text::TextSpan;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// What a stage needs to look at; informational only, the driver treats both alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StageKind {
    #[default]
    Syntactic,
    Semantic,
}

/// One rewriting pass of the pipeline
///
/// A stage receives the current document and the spans it may touch and returns the
/// rewritten document. Returning the input document (same tree) tells the driver nothing
/// changed, which spares a round of span recovery.
///
/// Stages that derive new tokens from old ones should go through the `Token::with_*`
/// builders, which carry annotations over. Annotations on tokens a stage drops are lost,
/// and the spans bracketed by them with it.
pub trait CleanupStage: Send + Sync {
    /// Name used for registry lookup and logging
    fn name(&self) -> &str;

    fn kind(&self) -> StageKind {
        StageKind::Syntactic
    }

    fn apply(
        &self,
        document: &Document,
        spans: &[TextSpan],
        cancellation: &CancellationToken,
    ) -> Result<Document, CleanupError>;
}

type ApplyFn =
    dyn Fn(&Document, &[TextSpan], &CancellationToken) -> Result<Document, CleanupError> + Send + Sync;

/// A stage built from a closure
pub struct FnStage {
    name: String,
    kind: StageKind,
    apply_fn: Box<ApplyFn>,
}

impl FnStage {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Document, &[TextSpan], &CancellationToken) -> Result<Document, CleanupError>
            + Send
            + Sync
            + 'static,
    {
        FnStage {
            name: name.into(),
            kind: StageKind::Syntactic,
            apply_fn: Box::new(f),
        }
    }

    pub fn with_kind(mut self, kind: StageKind) -> Self {
        self.kind = kind;
        self
    }
}

impl CleanupStage for FnStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        self.kind
    }

    fn apply(
        &self,
        document: &Document,
        spans: &[TextSpan],
        cancellation: &CancellationToken,
    ) -> Result<Document, CleanupError> {
        (self.apply_fn)(document, spans, cancellation)
    }
}

impl fmt::Debug for FnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStage")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
