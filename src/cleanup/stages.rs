//! Built-in cleanup stages

mod collapse_spaces;
mod trim_trailing_whitespace;

pub use collapse_spaces::CollapseSpaces;
pub use trim_trailing_whitespace::TrimTrailingWhitespace;

use super::document::Document;
use super::error::{check_cancelled, CleanupError};
use crate::syntax::{SyntaxToken, Token, TokenFilter};
use crate::text::TextSpan;
use std::collections::{HashMap, HashSet};
use tokio_util::sync::CancellationToken;

/// Tokens whose full span reaches into one of `spans`, in span order, each once
pub(crate) fn tokens_in_spans(document: &Document, spans: &[TextSpan]) -> Vec<SyntaxToken> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for span in spans {
        let mut current = document.tree().find_token(span.start(), true);
        while let Some(token) = current {
            current = token
                .next_token(TokenFilter::all())
                .filter(|next| next.full_span().start() < span.end());
            if seen.insert(token.clone()) {
                tokens.push(token);
            }
        }
    }
    tokens
}

/// Rewrite the tokens in `spans` for which `rewrite` returns a replacement
///
/// Returns `document` itself when nothing needs rewriting.
pub(crate) fn rewrite_tokens_in_spans<F>(
    document: &Document,
    spans: &[TextSpan],
    cancellation: &CancellationToken,
    rewrite: F,
) -> Result<Document, CleanupError>
where
    F: Fn(&SyntaxToken) -> Option<Token>,
{
    let mut replacements: HashMap<SyntaxToken, Token> = HashMap::new();
    let mut order = Vec::new();
    for token in tokens_in_spans(document, spans) {
        check_cancelled(cancellation)?;
        if let Some(replacement) = rewrite(&token) {
            replacements.insert(token.clone(), replacement);
            order.push(token);
        }
    }
    if order.is_empty() {
        return Ok(document.clone());
    }

    let tree = document.tree().replace_tokens(order, |token| {
        replacements
            .remove(token)
            .unwrap_or_else(|| token.token().clone())
    });
    Ok(document.with_tree(tree))
}
