//! Green tree: the immutable, position-independent storage of a syntax tree
//!
//! Green nodes know their kind, their children and their full width, but not their offset
//! in the document; offsets are computed by the cursors in [`super::token`] while walking
//! down from the root. Everything sits behind `Arc` so a rewrite can rebuild the spine
//! above a replaced token and share every other subtree with the previous tree.

use super::annotation::Annotation;
use super::kind::{NodeKind, TokenFlags, TokenKind};
use std::sync::Arc;

/// A leaf of the tree: token text plus the trivia around it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    leading_trivia: String,
    trailing_trivia: String,
    flags: TokenFlags,
    annotations: Vec<Annotation>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            leading_trivia: String::new(),
            trailing_trivia: String::new(),
            flags: TokenFlags::empty(),
            annotations: Vec::new(),
        }
    }

    /// A zero-width placeholder for a token the source should have had
    pub fn missing(kind: TokenKind) -> Self {
        Self::new(kind, "").with_flags(TokenFlags::MISSING)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn leading_trivia(&self) -> &str {
        &self.leading_trivia
    }

    pub fn trailing_trivia(&self) -> &str {
        &self.trailing_trivia
    }

    pub fn flags(&self) -> TokenFlags {
        self.flags
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn has_annotation(&self, annotation: &Annotation) -> bool {
        self.annotations.contains(annotation)
    }

    pub fn has_annotations(&self) -> bool {
        !self.annotations.is_empty()
    }

    /// Width of the token text alone
    pub fn width(&self) -> usize {
        self.text.len()
    }

    /// Width including leading and trailing trivia
    pub fn full_width(&self) -> usize {
        self.leading_trivia.len() + self.text.len() + self.trailing_trivia.len()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_leading_trivia(mut self, trivia: impl Into<String>) -> Self {
        self.leading_trivia = trivia.into();
        self
    }

    pub fn with_trailing_trivia(mut self, trivia: impl Into<String>) -> Self {
        self.trailing_trivia = trivia.into();
        self
    }

    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }

    pub(crate) fn push_trailing_trivia(&mut self, trivia: &str) {
        self.trailing_trivia.push_str(trivia);
    }

    /// Append annotations, skipping ones already present
    pub fn with_additional_annotations<I>(mut self, annotations: I) -> Self
    where
        I: IntoIterator<Item = Annotation>,
    {
        for annotation in annotations {
            if !self.annotations.contains(&annotation) {
                self.annotations.push(annotation);
            }
        }
        self
    }

    pub fn without_annotations(mut self, annotations: &[Annotation]) -> Self {
        self.annotations.retain(|a| !annotations.contains(a));
        self
    }

    /// Source text of the token including its trivia
    pub fn write_to(&self, out: &mut String) {
        out.push_str(&self.leading_trivia);
        out.push_str(&self.text);
        out.push_str(&self.trailing_trivia);
    }
}

/// A child slot of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Node(Arc<Node>),
    Token(Arc<Token>),
}

impl Element {
    pub fn full_width(&self) -> usize {
        match self {
            Element::Node(node) => node.full_width(),
            Element::Token(token) => token.full_width(),
        }
    }

    pub fn contains_annotations(&self) -> bool {
        match self {
            Element::Node(node) => node.contains_annotations(),
            Element::Token(token) => token.has_annotations(),
        }
    }
}

impl From<Node> for Element {
    fn from(node: Node) -> Self {
        Element::Node(Arc::new(node))
    }
}

impl From<Token> for Element {
    fn from(token: Token) -> Self {
        Element::Token(Arc::new(token))
    }
}

/// An interior node
///
/// Width and the annotation flag are computed once at construction, which is what keeps
/// annotation lookups proportional to the number of annotated tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    children: Vec<Element>,
    full_width: usize,
    contains_annotations: bool,
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Element>) -> Self {
        let full_width = children.iter().map(Element::full_width).sum();
        let contains_annotations = children.iter().any(Element::contains_annotations);
        Self {
            kind,
            children,
            full_width,
            contains_annotations,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn full_width(&self) -> usize {
        self.full_width
    }

    pub fn contains_annotations(&self) -> bool {
        self.contains_annotations
    }

    pub fn write_to(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Element::Node(node) => node.write_to(out),
                Element::Token(token) => token.write_to(out),
            }
        }
    }
}
