//! Immutable syntax trees
//!
//! [`SyntaxTree`] is a cheap handle (one `Arc`) to a green root. Lookups produce
//! [`SyntaxToken`] cursors; rewrites produce new trees that share every untouched subtree
//! with the old one. Two handles are "the same tree" only if they point at the same root,
//! which is how the cleanup driver detects that a stage changed something.

use super::annotation::Annotation;
use super::green::{Element, Node, Token};
use super::kind::{NodeKind, TokenFilter};
use super::parser;
use super::token::{first_leaf, last_leaf, SyntaxToken};
use crate::text::{text_changes, TextChange, TextSpan};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    root: Arc<Node>,
}

impl SyntaxTree {
    pub fn new(root: Node) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// Parse source text into a lossless tree
    pub fn parse(text: &str) -> Self {
        Self::new(parser::parse(text))
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.root.full_width()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `[0, len)`
    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(0, self.len())
    }

    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.len());
        self.root.write_to(&mut out);
        out
    }

    /// Pointer identity of the roots
    pub fn is_same(&self, other: &SyntaxTree) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Edits turning `old` into this tree, as offsets over `old`'s text
    pub fn changes_from(&self, old: &SyntaxTree) -> Vec<TextChange> {
        if self.is_same(old) {
            return Vec::new();
        }
        text_changes(&old.text(), &self.text())
    }

    pub fn first_token(&self, filter: TokenFilter) -> Option<SyntaxToken> {
        let (path, green) = first_leaf(&Element::Node(self.root.clone()), Vec::new())?;
        let token = SyntaxToken::new(self.root.clone(), path, 0, green);
        if filter.accepts(token.flags(), token.token().width()) {
            Some(token)
        } else {
            token.next_token(filter)
        }
    }

    pub fn last_token(&self, filter: TokenFilter) -> Option<SyntaxToken> {
        let (path, green) = last_leaf(&Element::Node(self.root.clone()), Vec::new())?;
        let full_start = self.len() - green.full_width();
        let token = SyntaxToken::new(self.root.clone(), path, full_start, green);
        if filter.accepts(token.flags(), token.token().width()) {
            Some(token)
        } else {
            token.previous_token(filter)
        }
    }

    /// All tokens passing `filter`, in document order
    pub fn tokens(&self, filter: TokenFilter) -> impl Iterator<Item = SyntaxToken> {
        std::iter::successors(self.first_token(filter), move |token| {
            token.next_token(filter)
        })
    }

    /// The token whose full span contains `offset`
    ///
    /// Offsets at or past the end resolve to the last token. Unless `find_inside_trivia` is
    /// set, a hit on structured trivia moves to the next ordinary token (or the previous one
    /// when nothing follows).
    pub fn find_token(&self, offset: usize, find_inside_trivia: bool) -> Option<SyntaxToken> {
        let token = if offset >= self.len() {
            self.last_token(TokenFilter::all())?
        } else {
            self.descend_to(offset)?
        };

        if find_inside_trivia || !token.is_structured_trivia() {
            return Some(token);
        }
        token
            .next_token(TokenFilter::ZERO_WIDTH)
            .or_else(|| token.previous_token(TokenFilter::ZERO_WIDTH))
            .or(Some(token))
    }

    /// Like [`SyntaxTree::find_token`], but an offset sitting exactly at the start of a
    /// token's text resolves to the token before it
    pub fn find_token_from_end(&self, offset: usize, find_inside_trivia: bool) -> Option<SyntaxToken> {
        let token = self.find_token(offset, find_inside_trivia)?;
        let filter = if find_inside_trivia {
            TokenFilter::all()
        } else {
            TokenFilter::ZERO_WIDTH
        };
        match token.previous_token(filter) {
            Some(previous) if token.span().start() == offset => Some(previous),
            _ => Some(token),
        }
    }

    /// Every token carrying `annotation`, in document order
    ///
    /// Only subtrees flagged as containing annotations are visited.
    pub fn annotated_tokens(&self, annotation: &Annotation) -> Vec<SyntaxToken> {
        let mut found = Vec::new();
        let mut path = Vec::new();
        self.collect_annotated(&self.root, 0, &mut path, annotation, &mut found);
        found
    }

    /// Replace each of `tokens` with the token `rewrite` derives from it
    ///
    /// Every token is rewritten at most once, however often it appears in `tokens`; tokens
    /// that belong to a different tree are ignored.
    pub fn replace_tokens<I, F>(&self, tokens: I, mut rewrite: F) -> SyntaxTree
    where
        I: IntoIterator<Item = SyntaxToken>,
        F: FnMut(&SyntaxToken) -> Token,
    {
        let mut edits = BTreeMap::new();
        for token in tokens {
            if !self.owns(&token) || edits.contains_key(token.path()) {
                continue;
            }
            let replacement = rewrite(&token);
            edits.insert(token.path().to_vec(), vec![Arc::new(replacement)]);
        }
        self.apply_edits(edits)
    }

    /// Splice `replacement` (zero or more tokens) in place of `token`
    pub fn replace_token_with(&self, token: &SyntaxToken, replacement: Vec<Token>) -> SyntaxTree {
        if !self.owns(token) {
            return self.clone();
        }
        let mut edits = BTreeMap::new();
        edits.insert(
            token.path().to_vec(),
            replacement.into_iter().map(Arc::new).collect(),
        );
        self.apply_edits(edits)
    }

    pub fn remove_token(&self, token: &SyntaxToken) -> SyntaxTree {
        self.replace_token_with(token, Vec::new())
    }

    fn owns(&self, token: &SyntaxToken) -> bool {
        token.belongs_to(&self.root)
    }

    fn descend_to(&self, offset: usize) -> Option<SyntaxToken> {
        let mut node = &self.root;
        let mut path = Vec::new();
        let mut node_start = 0;

        loop {
            let mut child_start = node_start;
            let mut next = None;
            for (index, child) in node.children().iter().enumerate() {
                let width = child.full_width();
                if offset < child_start + width {
                    next = Some((index, child));
                    break;
                }
                child_start += width;
            }

            let (index, child) = next?;
            path.push(index);
            match child {
                Element::Token(green) => {
                    return Some(SyntaxToken::new(
                        self.root.clone(),
                        path,
                        child_start,
                        green.clone(),
                    ));
                }
                Element::Node(inner) => {
                    node = inner;
                    node_start = child_start;
                }
            }
        }
    }

    fn collect_annotated(
        &self,
        node: &Arc<Node>,
        node_start: usize,
        path: &mut Vec<usize>,
        annotation: &Annotation,
        found: &mut Vec<SyntaxToken>,
    ) {
        let mut child_start = node_start;
        for (index, child) in node.children().iter().enumerate() {
            if child.contains_annotations() {
                path.push(index);
                match child {
                    Element::Token(green) if green.has_annotation(annotation) => {
                        found.push(SyntaxToken::new(
                            self.root.clone(),
                            path.clone(),
                            child_start,
                            green.clone(),
                        ));
                    }
                    Element::Token(_) => {}
                    Element::Node(inner) => {
                        self.collect_annotated(inner, child_start, path, annotation, found)
                    }
                }
                path.pop();
            }
            child_start += child.full_width();
        }
    }

    fn apply_edits(&self, edits: BTreeMap<Vec<usize>, Vec<Arc<Token>>>) -> SyntaxTree {
        if edits.is_empty() {
            return self.clone();
        }
        let edits: Vec<(Vec<usize>, Vec<Arc<Token>>)> = edits.into_iter().collect();
        SyntaxTree {
            root: rebuild(&self.root, 0, &edits),
        }
    }
}

/// Rebuild `node` with the edits whose paths pass through it
///
/// `edits` is sorted by path and every path shares the prefix leading to `node`, so the
/// edits for each child form one contiguous run. Children without edits are shared.
fn rebuild(node: &Arc<Node>, depth: usize, edits: &[(Vec<usize>, Vec<Arc<Token>>)]) -> Arc<Node> {
    let mut children = Vec::with_capacity(node.children().len());
    let mut cursor = 0;

    for (index, child) in node.children().iter().enumerate() {
        let run = edits[cursor..]
            .iter()
            .take_while(|(path, _)| path.get(depth) == Some(&index))
            .count();
        let group = &edits[cursor..cursor + run];
        cursor += run;

        match (child, group) {
            (_, []) => children.push(child.clone()),
            (Element::Token(_), [(path, replacement)]) if path.len() == depth + 1 => {
                children.extend(replacement.iter().cloned().map(Element::Token));
            }
            (Element::Node(inner), group) => {
                children.push(Element::Node(rebuild(inner, depth + 1, group)));
            }
            // A path that runs through a token cannot address anything
            (Element::Token(_), _) => children.push(child.clone()),
        }
    }

    Arc::new(Node::new(node.kind(), children))
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new(Node::new(NodeKind::Root, Vec::new()))
    }
}
