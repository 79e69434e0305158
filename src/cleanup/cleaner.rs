//! The pipeline driver

use super::annotate::{annotate, remove_markers, Annotated};
use super::document::Document;
use super::error::{check_cancelled, CleanupError};
use super::recover::recover_spans;
use super::registry::StageRegistry;
use super::stage::CleanupStage;
use crate::syntax::SyntaxTree;
use crate::text::{NormalizedSpans, TextSpan};
use spanclean_config::SpancleanConfig;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, instrument, trace};

/// Driver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Let span boundaries resolve to directives, doc comments and skipped text
    pub find_inside_trivia: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            find_inside_trivia: true,
        }
    }
}

/// Runs an ordered list of stages over a document, keeping the caller's spans in sync
///
/// The cleaner holds no per-call state, so one instance can serve concurrent calls on
/// independent documents.
#[derive(Clone, Default)]
pub struct CodeCleaner {
    stages: Vec<Arc<dyn CleanupStage>>,
    options: CleanupOptions,
}

impl CodeCleaner {
    pub fn new(stages: Vec<Arc<dyn CleanupStage>>) -> Self {
        Self {
            stages,
            options: CleanupOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CleanupOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the configured pipeline out of the built-in stages
    pub fn from_config(config: &SpancleanConfig) -> Result<Self, CleanupError> {
        let registry = StageRegistry::with_builtin(&config.stages);
        let stages = registry.resolve(config.cleanup.pipeline.as_slice())?;
        Ok(Self::new(stages).with_options(CleanupOptions {
            find_inside_trivia: config.cleanup.find_inside_trivia,
        }))
    }

    pub fn stages(&self) -> &[Arc<dyn CleanupStage>] {
        &self.stages
    }

    pub fn options(&self) -> CleanupOptions {
        self.options
    }

    /// Run every stage over `document`, restricted to `spans`
    ///
    /// Returns `document` itself (same tree) when there are no spans or no stage changed
    /// anything. Span markers never appear in the returned tree.
    #[instrument(level = "debug", skip_all, fields(document = document.name(), spans = spans.len()))]
    pub fn cleanup(
        &self,
        document: &Document,
        spans: &[TextSpan],
        cancellation: &CancellationToken,
    ) -> Result<Document, CleanupError> {
        if spans.is_empty() {
            debug!("no spans to clean");
            return Ok(document.clone());
        }
        check_cancelled(cancellation)?;

        let normalized = NormalizedSpans::new(spans.iter().copied());
        let full_span = document.tree().full_span();
        if normalized.covers(full_span) {
            debug!("spans cover the whole document");
            return self.run_whole_tree(document, cancellation);
        }

        match annotate(
            document.tree(),
            &normalized,
            self.options.find_inside_trivia,
            cancellation,
        )? {
            Annotated::WholeTree => self.run_whole_tree(document, cancellation),
            Annotated::Tracked { tree, pairs } => {
                let annotated = document.with_tree(tree);
                let result = self.run_stages(
                    document,
                    &annotated,
                    |current| recover_spans(current.tree(), &pairs, cancellation),
                    cancellation,
                )?;
                if result.is_same(document) {
                    return Ok(result);
                }
                Ok(result.with_tree(remove_markers(result.tree(), &pairs)))
            }
        }
    }

    /// [`CodeCleaner::cleanup`] for callers that work with bare trees
    pub fn cleanup_tree(
        &self,
        tree: &SyntaxTree,
        spans: &[TextSpan],
        cancellation: &CancellationToken,
    ) -> Result<SyntaxTree, CleanupError> {
        let document = Document::from_tree(tree.clone());
        self.cleanup(&document, spans, cancellation)
            .map(|cleaned| cleaned.tree().clone())
    }

    fn run_whole_tree(
        &self,
        document: &Document,
        cancellation: &CancellationToken,
    ) -> Result<Document, CleanupError> {
        self.run_stages(
            document,
            document,
            |current| Ok(vec![current.tree().full_span()]),
            cancellation,
        )
    }

    /// Apply the stages in order, recomputing spans only after a stage changed the tree
    ///
    /// `annotated` is what the first stage sees. The last stage gets `original` instead when
    /// no earlier stage changed anything, since both have the same text.
    fn run_stages<F>(
        &self,
        original: &Document,
        annotated: &Document,
        span_getter: F,
        cancellation: &CancellationToken,
    ) -> Result<Document, CleanupError>
    where
        F: Fn(&Document) -> Result<Vec<TextSpan>, CleanupError>,
    {
        let mut current = annotated.clone();
        let mut spans: Option<Vec<TextSpan>> = None;
        let last = self.stages.len().saturating_sub(1);

        for (index, stage) in self.stages.iter().enumerate() {
            check_cancelled(cancellation)?;
            let _stage = debug_span!("stage", name = stage.name(), index).entered();

            let input = if index == last && current.is_same(annotated) {
                original
            } else {
                &current
            };
            // Markers live in `current`; `original` has the same text but no markers
            let stage_spans = match spans.take() {
                Some(spans) => spans,
                None => span_getter(&current)?,
            };

            let output = stage.apply(input, &stage_spans, cancellation)?;
            if output.is_same(input) {
                trace!("stage left the tree unchanged");
                spans = Some(stage_spans);
            } else {
                trace!("stage rewrote the tree");
                current = output;
            }
        }

        if current.is_same(annotated) {
            return Ok(original.clone());
        }
        Ok(current)
    }
}

impl fmt::Debug for CodeCleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.stages.iter().map(|stage| stage.name()).collect();
        f.debug_struct("CodeCleaner")
            .field("stages", &names)
            .field("options", &self.options)
            .finish()
    }
}
