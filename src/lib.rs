//! # spanclean
//!
//! Span-tracking code cleanup: runs an ordered list of tree-rewriting stages over one
//! immutable syntax tree while keeping the caller's spans of interest pointed at the same
//! code after every rewrite.
//!
//! The crate is split in three layers:
//!
//! - [`text`]: spans, span normalization and text changes
//! - [`syntax`]: the lossless, structurally shared syntax tree the stages rewrite
//! - [`cleanup`]: span markers, the stage trait, the registry and the [`cleanup::CodeCleaner`] driver
//!
//! ```ignore
//! use spanclean::cleanup::{CancellationToken, CodeCleaner, Document};
//! use spanclean::text::TextSpan;
//!
//! let cleaner = CodeCleaner::from_config(&spanclean_config::load_defaults()?)?;
//! let document = Document::parse("file.cs", "class C {   void M() { }  \n}");
//! let cleaned = cleaner.cleanup(&document, &[TextSpan::from_bounds(0, 12)], &CancellationToken::new())?;
//! ```

pub mod cleanup;
pub mod syntax;
pub mod text;
