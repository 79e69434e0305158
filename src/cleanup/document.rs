//! Named documents passed between stages

use crate::syntax::SyntaxTree;
use std::sync::Arc;

/// A syntax tree plus the name it is known by
///
/// Cloning is cheap: both the name and the tree are reference counted.
#[derive(Debug, Clone)]
pub struct Document {
    name: Arc<str>,
    tree: SyntaxTree,
}

impl Document {
    pub fn new(name: &str, tree: SyntaxTree) -> Self {
        Self {
            name: Arc::from(name),
            tree,
        }
    }

    /// Wrap a bare tree for callers that have no document name
    pub fn from_tree(tree: SyntaxTree) -> Self {
        Self::new("untitled", tree)
    }

    pub fn parse(name: &str, text: &str) -> Self {
        Self::new(name, SyntaxTree::parse(text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn text(&self) -> String {
        self.tree.text()
    }

    /// The same document holding a different tree
    pub fn with_tree(&self, tree: SyntaxTree) -> Self {
        Self {
            name: self.name.clone(),
            tree,
        }
    }

    /// Whether both documents hold the very same tree
    pub fn is_same(&self, other: &Document) -> bool {
        self.tree.is_same(&other.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_follows_the_tree() {
        let document = Document::parse("a.cs", "class C { }");
        assert!(document.is_same(&document.clone()));
        assert!(document.is_same(&document.with_tree(document.tree().clone())));

        let reparsed = document.with_tree(SyntaxTree::parse("class C { }"));
        assert!(!document.is_same(&reparsed));
        assert_eq!(reparsed.name(), "a.cs");
        assert_eq!(reparsed.text(), document.text());
    }
}
