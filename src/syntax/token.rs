//! Token cursors
//!
//! A [`SyntaxToken`] pins a green token to one specific tree: it remembers the root it was
//! found in, the child-index path leading to it and its absolute offset. That is enough to
//! walk to neighbouring tokens in document order without any per-tree index.

use super::annotation::Annotation;
use super::green::{Element, Node, Token};
use super::kind::{TokenFilter, TokenFlags, TokenKind};
use crate::text::TextSpan;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A token positioned inside a particular tree
#[derive(Clone)]
pub struct SyntaxToken {
    root: Arc<Node>,
    path: Vec<usize>,
    full_start: usize,
    green: Arc<Token>,
}

impl SyntaxToken {
    pub(crate) fn new(root: Arc<Node>, path: Vec<usize>, full_start: usize, green: Arc<Token>) -> Self {
        Self {
            root,
            path,
            full_start,
            green,
        }
    }

    pub fn token(&self) -> &Token {
        &self.green
    }

    pub fn kind(&self) -> TokenKind {
        self.green.kind()
    }

    pub fn text(&self) -> &str {
        self.green.text()
    }

    pub fn flags(&self) -> TokenFlags {
        self.green.flags()
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.green.annotations()
    }

    pub fn has_annotation(&self, annotation: &Annotation) -> bool {
        self.green.has_annotation(annotation)
    }

    /// Span of the token text, excluding trivia
    pub fn span(&self) -> TextSpan {
        let start = self.full_start + self.green.leading_trivia().len();
        TextSpan::new(start, self.green.width())
    }

    /// Span of the token text plus its leading and trailing trivia
    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(self.full_start, self.green.full_width())
    }

    /// True for skipped text, directives and doc comments
    pub fn is_structured_trivia(&self) -> bool {
        self.flags().intersects(TokenFlags::STRUCTURED_TRIVIA)
    }

    pub fn next_token(&self, filter: TokenFilter) -> Option<SyntaxToken> {
        let mut candidate = self.next_leaf();
        while let Some(token) = candidate {
            if filter.accepts(token.flags(), token.green.width()) {
                return Some(token);
            }
            candidate = token.next_leaf();
        }
        None
    }

    pub fn previous_token(&self, filter: TokenFilter) -> Option<SyntaxToken> {
        let mut candidate = self.previous_leaf();
        while let Some(token) = candidate {
            if filter.accepts(token.flags(), token.green.width()) {
                return Some(token);
            }
            candidate = token.previous_leaf();
        }
        None
    }

    pub(crate) fn path(&self) -> &[usize] {
        &self.path
    }

    pub(crate) fn belongs_to(&self, root: &Arc<Node>) -> bool {
        Arc::ptr_eq(&self.root, root)
    }

    fn next_leaf(&self) -> Option<SyntaxToken> {
        let ancestors = ancestors(&self.root, &self.path);
        for depth in (0..ancestors.len()).rev() {
            let parent = ancestors[depth];
            for index in self.path[depth] + 1..parent.children().len() {
                let mut path = self.path[..depth].to_vec();
                path.push(index);
                if let Some((path, green)) = first_leaf(&parent.children()[index], path) {
                    let full_start = self.full_start + self.green.full_width();
                    return Some(SyntaxToken::new(self.root.clone(), path, full_start, green));
                }
            }
        }
        None
    }

    fn previous_leaf(&self) -> Option<SyntaxToken> {
        let ancestors = ancestors(&self.root, &self.path);
        for depth in (0..ancestors.len()).rev() {
            let parent = ancestors[depth];
            for index in (0..self.path[depth]).rev() {
                let mut path = self.path[..depth].to_vec();
                path.push(index);
                if let Some((path, green)) = last_leaf(&parent.children()[index], path) {
                    let full_start = self.full_start - green.full_width();
                    return Some(SyntaxToken::new(self.root.clone(), path, full_start, green));
                }
            }
        }
        None
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root) && self.path == other.path
    }
}

impl Eq for SyntaxToken {}

impl Hash for SyntaxToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}@{}", self.kind(), self.text(), self.span())
    }
}

/// Nodes along `path`, root first; `result[d]` holds the child at `path[d]`
fn ancestors<'a>(root: &'a Arc<Node>, path: &[usize]) -> Vec<&'a Arc<Node>> {
    let mut nodes = Vec::with_capacity(path.len());
    let mut current = root;
    for &index in path {
        nodes.push(current);
        match current.children().get(index) {
            Some(Element::Node(child)) => current = child,
            _ => break,
        }
    }
    nodes
}

/// First token under `element` in document order, with its path
pub(crate) fn first_leaf(element: &Element, path: Vec<usize>) -> Option<(Vec<usize>, Arc<Token>)> {
    match element {
        Element::Token(token) => Some((path, token.clone())),
        Element::Node(node) => node.children().iter().enumerate().find_map(|(index, child)| {
            let mut child_path = path.clone();
            child_path.push(index);
            first_leaf(child, child_path)
        }),
    }
}

/// Last token under `element` in document order, with its path
pub(crate) fn last_leaf(element: &Element, path: Vec<usize>) -> Option<(Vec<usize>, Arc<Token>)> {
    match element {
        Element::Token(token) => Some((path, token.clone())),
        Element::Node(node) => node
            .children()
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, child)| {
                let mut child_path = path.clone();
                child_path.push(index);
                last_leaf(child, child_path)
            }),
    }
}
