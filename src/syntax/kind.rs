//! Token and node kinds
//!
//! Token kinds are defined using the logos derive macro. Trivia kinds (whitespace, newlines,
//! line comments) never become tokens in the tree; the parser folds them into the leading or
//! trailing trivia of the neighbouring token.

use bitflags::bitflags;
use logos::Logos;

/// All token kinds the lexer can produce, plus the synthetic ones the parser inserts
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Trivia
    #[regex(r"[ \t]+")]
    Whitespace,
    #[regex(r"\r?\n")]
    Newline,
    #[regex(r"//([^/\n][^\n]*)?")]
    LineComment,

    // Structured trivia: tokens that live in trivia position but carry structure
    #[regex(r"///[^\n]*")]
    DocComment,
    #[regex(r"#[A-Za-z]+[^\n]*")]
    Directive,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"[0-9][0-9_]*(\.[0-9]+)?")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,

    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[regex(r"[+\-*/=<>!&|%^~?:@$]")]
    Punctuation,

    // Produced by the parser, never by the lexer
    Skipped,
    EndOfFile,
}

impl TokenKind {
    /// Kinds that are folded into trivia rather than becoming tokens
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::LineComment
        )
    }

    pub fn is_close_delimiter(&self) -> bool {
        matches!(
            self,
            TokenKind::CloseBrace | TokenKind::CloseParen | TokenKind::CloseBracket
        )
    }

    /// The closer matching an opening delimiter
    pub fn closer(&self) -> Option<TokenKind> {
        match self {
            TokenKind::OpenBrace => Some(TokenKind::CloseBrace),
            TokenKind::OpenParen => Some(TokenKind::CloseParen),
            TokenKind::OpenBracket => Some(TokenKind::CloseBracket),
            _ => None,
        }
    }
}

/// Interior node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    /// `{ ... }`
    Block,
    /// `( ... )` or `[ ... ]`
    Group,
}

bitflags! {
    /// Per-token properties that navigation can filter on
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u8 {
        /// Text the parser could not place; kept so the tree stays lossless
        const SKIPPED = 1;
        const DIRECTIVE = 1 << 1;
        const DOC_COMMENT = 1 << 2;
        /// Zero-width token inserted to close an unbalanced delimiter
        const MISSING = 1 << 3;

        const STRUCTURED_TRIVIA = Self::SKIPPED.bits() | Self::DIRECTIVE.bits() | Self::DOC_COMMENT.bits();
    }
}

bitflags! {
    /// Which tokens `previous_token` / `next_token` may stop at
    ///
    /// Ordinary tokens with a non-zero width are always visited.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFilter: u8 {
        const ZERO_WIDTH = 1;
        const SKIPPED = 1 << 1;
        const DIRECTIVES = 1 << 2;
        const DOC_COMMENTS = 1 << 3;
    }
}

impl TokenFilter {
    /// Visit only ordinary, non-empty tokens
    pub const DEFAULT: TokenFilter = TokenFilter::empty();

    /// Whether a token with these properties passes the filter
    pub fn accepts(&self, flags: TokenFlags, width: usize) -> bool {
        if width == 0 && !self.contains(TokenFilter::ZERO_WIDTH) {
            return false;
        }
        if flags.contains(TokenFlags::SKIPPED) && !self.contains(TokenFilter::SKIPPED) {
            return false;
        }
        if flags.contains(TokenFlags::DIRECTIVE) && !self.contains(TokenFilter::DIRECTIVES) {
            return false;
        }
        if flags.contains(TokenFlags::DOC_COMMENT) && !self.contains(TokenFilter::DOC_COMMENTS) {
            return false;
        }
        true
    }
}
