//! Syntax tree substrate
//!
//! A small lossless tree over brace-delimited source text: enough structure for the cleanup
//! engine to look tokens up by offset, walk between neighbours, attach annotations and
//! rewrite tokens without copying the untouched parts of the tree.

pub mod annotation;
pub mod green;
pub mod kind;
mod parser;
pub mod token;
pub mod tree;

pub use annotation::Annotation;
pub use green::{Element, Node, Token};
pub use kind::{NodeKind, TokenFilter, TokenFlags, TokenKind};
pub use token::SyntaxToken;
pub use tree::SyntaxTree;
