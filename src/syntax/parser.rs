//! Lossless parser producing the green tree
//!
//! Parsing happens in two passes:
//!
//! 1. Lexing with trivia attachment: the logos lexer produces raw kinds; whitespace,
//!    newlines and line comments are folded into trivia. A token's trailing trivia runs up
//!    to and including the first newline after it, everything else leads the next token.
//! 2. Nesting: `{ }` become `Block` nodes, `( )` and `[ ]` become `Group` nodes. Unclosed
//!    delimiters get a zero-width `MISSING` closer; closers with no opener are kept as
//!    `SKIPPED` tokens.
//!
//! Nothing is ever dropped, so `parse(text)` always writes back to `text`.

use super::green::{Element, Node, Token};
use super::kind::{NodeKind, TokenFlags, TokenKind};
use logos::Logos;

pub(crate) fn parse(text: &str) -> Node {
    build_tree(lex_with_trivia(text))
}

fn lex_with_trivia(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut leading = String::new();
    let mut trailing_open = false;

    let mut lexer = TokenKind::lexer(text);
    while let Some(result) = lexer.next() {
        let slice = lexer.slice();
        let kind = result.unwrap_or(TokenKind::Skipped);

        if kind.is_trivia() {
            match tokens.last_mut() {
                Some(last) if trailing_open => {
                    last.push_trailing_trivia(slice);
                    if kind == TokenKind::Newline {
                        trailing_open = false;
                    }
                }
                _ => leading.push_str(slice),
            }
            continue;
        }

        let flags = match kind {
            TokenKind::Skipped => TokenFlags::SKIPPED,
            TokenKind::Directive => TokenFlags::DIRECTIVE,
            TokenKind::DocComment => TokenFlags::DOC_COMMENT,
            _ => TokenFlags::empty(),
        };
        tokens.push(
            Token::new(kind, slice)
                .with_leading_trivia(std::mem::take(&mut leading))
                .with_flags(flags),
        );
        trailing_open = true;
    }

    if !leading.is_empty() {
        match tokens.last_mut() {
            Some(last) => last.push_trailing_trivia(&leading),
            None => tokens.push(Token::new(TokenKind::EndOfFile, "").with_leading_trivia(leading)),
        }
    }

    tokens
}

struct Frame {
    kind: NodeKind,
    closer: Option<TokenKind>,
    children: Vec<Element>,
}

fn build_tree(tokens: Vec<Token>) -> Node {
    let mut stack = vec![Frame {
        kind: NodeKind::Root,
        closer: None,
        children: Vec::new(),
    }];

    for token in tokens {
        let kind = token.kind();
        if let Some(closer) = kind.closer() {
            let node_kind = if kind == TokenKind::OpenBrace {
                NodeKind::Block
            } else {
                NodeKind::Group
            };
            stack.push(Frame {
                kind: node_kind,
                closer: Some(closer),
                children: vec![token.into()],
            });
        } else if kind.is_close_delimiter() {
            match stack.iter().rposition(|frame| frame.closer == Some(kind)) {
                Some(depth) => {
                    while stack.len() > depth + 1 {
                        close_frame(&mut stack, None);
                    }
                    close_frame(&mut stack, Some(token));
                }
                None => push_child(&mut stack, token.with_flags(TokenFlags::SKIPPED).into()),
            }
        } else {
            push_child(&mut stack, token.into());
        }
    }

    while stack.len() > 1 {
        close_frame(&mut stack, None);
    }

    let children = stack.pop().map(|root| root.children).unwrap_or_default();
    Node::new(NodeKind::Root, children)
}

fn push_child(stack: &mut [Frame], element: Element) {
    if let Some(frame) = stack.last_mut() {
        frame.children.push(element);
    }
}

/// Pop the innermost frame, closing it with `closer` or a missing token
fn close_frame(stack: &mut Vec<Frame>, closer: Option<Token>) {
    let Some(mut frame) = stack.pop() else {
        return;
    };
    let closer = closer.or_else(|| frame.closer.map(Token::missing));
    if let Some(closer) = closer {
        frame.children.push(closer.into());
    }
    push_child(stack, Node::new(frame.kind, frame.children).into());
}
