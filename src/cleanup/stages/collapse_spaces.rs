use crate::cleanup::document::Document;
use crate::cleanup::error::CleanupError;
use crate::cleanup::stage::CleanupStage;
use crate::syntax::{SyntaxToken, Token, TokenFilter};
use crate::text::TextSpan;
use once_cell::sync::Lazy;
use regex::Regex;
use spanclean_config::CollapseSpacesConfig;
use tokio_util::sync::CancellationToken;

static HORIZONTAL_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]+$").unwrap());

/// Shrinks runs of spaces and tabs between tokens on the same line
///
/// Only trailing trivia made of horizontal whitespace alone is touched, so indentation,
/// comments and whitespace at the end of the file stay as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseSpaces {
    max_spaces: usize,
}

impl CollapseSpaces {
    pub const NAME: &'static str = "collapse-spaces";

    pub fn new(max_spaces: usize) -> Self {
        Self { max_spaces }
    }

    pub fn from_config(config: &CollapseSpacesConfig) -> Self {
        Self::new(config.max_spaces)
    }

    fn collapsed(&self, token: &SyntaxToken) -> Option<Token> {
        let trivia = token.token().trailing_trivia();
        if !HORIZONTAL_WHITESPACE.is_match(trivia) || token.next_token(TokenFilter::all()).is_none() {
            return None;
        }
        let spaces = " ".repeat(trivia.len().min(self.max_spaces));
        (spaces != trivia).then(|| token.token().clone().with_trailing_trivia(spaces))
    }
}

impl CleanupStage for CollapseSpaces {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(
        &self,
        document: &Document,
        spans: &[TextSpan],
        cancellation: &CancellationToken,
    ) -> Result<Document, CleanupError> {
        super::rewrite_tokens_in_spans(document, spans, cancellation, |token| self.collapsed(token))
    }
}
