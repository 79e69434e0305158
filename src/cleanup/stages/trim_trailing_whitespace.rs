use crate::cleanup::document::Document;
use crate::cleanup::error::CleanupError;
use crate::cleanup::stage::CleanupStage;
use crate::syntax::{SyntaxToken, Token, TokenFilter};
use crate::text::TextSpan;
use once_cell::sync::Lazy;
use regex::Regex;
use spanclean_config::TrimTrailingWhitespaceConfig;
use tokio_util::sync::CancellationToken;

static WHITESPACE_BEFORE_NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+(\r?\n)").unwrap());

/// Removes spaces and tabs at the end of lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimTrailingWhitespace {
    include_end_of_file: bool,
}

impl TrimTrailingWhitespace {
    pub const NAME: &'static str = "trim-trailing-whitespace";

    pub fn new(include_end_of_file: bool) -> Self {
        Self {
            include_end_of_file,
        }
    }

    pub fn from_config(config: &TrimTrailingWhitespaceConfig) -> Self {
        Self::new(config.include_end_of_file)
    }

    fn trimmed(&self, token: &SyntaxToken) -> Option<Token> {
        let green = token.token();
        let mut leading = WHITESPACE_BEFORE_NEWLINE
            .replace_all(green.leading_trivia(), "$1")
            .into_owned();
        let mut trailing = WHITESPACE_BEFORE_NEWLINE
            .replace_all(green.trailing_trivia(), "$1")
            .into_owned();

        if self.include_end_of_file && token.next_token(TokenFilter::all()).is_none() {
            // A trivia-only file keeps everything in the leading trivia of its empty token
            if trailing.is_empty() && green.width() == 0 {
                leading.truncate(leading.trim_end_matches([' ', '\t']).len());
            } else {
                trailing.truncate(trailing.trim_end_matches([' ', '\t']).len());
            }
        }

        if leading == green.leading_trivia() && trailing == green.trailing_trivia() {
            return None;
        }
        Some(
            green
                .clone()
                .with_leading_trivia(leading)
                .with_trailing_trivia(trailing),
        )
    }
}

impl CleanupStage for TrimTrailingWhitespace {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(
        &self,
        document: &Document,
        spans: &[TextSpan],
        cancellation: &CancellationToken,
    ) -> Result<Document, CleanupError> {
        super::rewrite_tokens_in_spans(document, spans, cancellation, |token| self.trimmed(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(stage: TrimTrailingWhitespace, text: &str, spans: &[TextSpan]) -> Document {
        let document = Document::parse("a.cs", text);
        stage
            .apply(&document, spans, &CancellationToken::new())
            .unwrap()
    }

    #[test]
    fn test_trims_lines_inside_spans() {
        let text = "a  \nb \t\nc  ";
        let whole = [TextSpan::from_bounds(0, text.len())];
        assert_eq!(run(TrimTrailingWhitespace::new(true), text, &whole).text(), "a\nb\nc");
        assert_eq!(run(TrimTrailingWhitespace::new(false), text, &whole).text(), "a\nb\nc  ");
    }

    #[test]
    fn test_leaves_lines_outside_spans() {
        let text = "a  \nb \t\nc  ";
        let first = [TextSpan::from_bounds(0, 1)];
        assert_eq!(
            run(TrimTrailingWhitespace::new(true), text, &first).text(),
            "a\nb \t\nc  "
        );
    }

    #[test]
    fn test_blank_lines_and_trivia_only_files() {
        let text = "a\n  \n\tb";
        let whole = [TextSpan::from_bounds(0, text.len())];
        assert_eq!(run(TrimTrailingWhitespace::new(true), text, &whole).text(), "a\n\n\tb");

        let blank = " \n ";
        let whole = [TextSpan::from_bounds(0, blank.len())];
        assert_eq!(run(TrimTrailingWhitespace::new(true), blank, &whole).text(), "\n");
    }

    #[test]
    fn test_clean_text_is_left_alone() {
        let document = Document::parse("a.cs", "a\nb");
        let result = TrimTrailingWhitespace::new(true)
            .apply(&document, &[document.tree().full_span()], &CancellationToken::new())
            .unwrap();
        assert!(result.is_same(&document));
    }
}
