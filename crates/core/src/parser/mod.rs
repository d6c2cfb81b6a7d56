/// Recursive-descent grammar engine for GXL.
/// Pulls tokens from the lexer on demand, keeps a small lookahead buffer,
/// and stops at the first structurally invalid token. No recovery.
use std::collections::VecDeque;

use crate::ast::{
    ExternModule, GitSource, Ident, ModuleSource, PathSource, RefList, SourceFile, StrLit,
    TopLevelItem,
};
use crate::error::{describe_alternatives, Expected, GxlError, LexError, ParseError};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::span::Span;

mod command;
mod flow;
mod module;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

pub struct Parser<'src> {
    src: &'src str,
    lexer: Lexer<'src>,
    /// Significant tokens only; comments are dropped on the way in.
    lookahead: VecDeque<Token>,
    /// End offset of the last consumed token.
    last_end: usize,
}

impl<'src> Parser<'src> {
    pub fn new(src: &'src str) -> Self {
        Parser {
            src,
            lexer: Lexer::new(src),
            lookahead: VecDeque::with_capacity(4),
            last_end: 0,
        }
    }

    fn fill(&mut self, n: usize) -> Result<(), LexError> {
        while self.lookahead.len() <= n {
            let tok = self.lexer.next_token()?;
            if tok.kind != TokenKind::Comment {
                self.lookahead.push_back(tok);
            }
        }
        Ok(())
    }

    fn peek_nth(&mut self, n: usize) -> Result<Token, GxlError> {
        self.fill(n)?;
        Ok(self.lookahead[n])
    }

    fn peek(&mut self) -> Result<Token, GxlError> {
        self.peek_nth(0)
    }

    fn peek_kind(&mut self) -> Result<TokenKind, GxlError> {
        Ok(self.peek()?.kind)
    }

    fn advance(&mut self) -> Result<Token, GxlError> {
        self.fill(0)?;
        let tok = self.lookahead[0];
        // Eof is sticky: leave it in place.
        if tok.kind != TokenKind::Eof {
            self.lookahead.pop_front();
        }
        self.last_end = tok.span.end;
        Ok(tok)
    }

    fn text(&self, tok: &Token) -> &'src str {
        tok.text(self.src)
    }

    fn at(&mut self, kind: TokenKind) -> Result<bool, GxlError> {
        Ok(self.peek_kind()? == kind)
    }

    fn at_keyword(&mut self, kw: &str) -> Result<bool, GxlError> {
        let tok = self.peek()?;
        Ok(tok.kind == TokenKind::Ident && self.text(&tok) == kw)
    }

    fn eat(&mut self, kind: TokenKind) -> Result<Option<Token>, GxlError> {
        if self.at(kind)? {
            self.advance().map(Some)
        } else {
            Ok(None)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, GxlError> {
        match self.eat(kind)? {
            Some(tok) => Ok(tok),
            None => self.unexpected(vec![Expected::Token(kind)]),
        }
    }

    fn expect_keyword(&mut self, kw: &'static str) -> Result<Token, GxlError> {
        if self.at_keyword(kw)? {
            self.advance()
        } else {
            self.unexpected(vec![Expected::Keyword(kw)])
        }
    }

    /// Consume a trailing `;` after a `}`-closed construct if there is one.
    fn eat_optional_semi(&mut self) -> Result<(), GxlError> {
        self.eat(TokenKind::Semi)?;
        Ok(())
    }

    /// Build the error for the current token given what would have worked.
    fn unexpected<T>(&mut self, expected: Vec<Expected>) -> Result<T, GxlError> {
        let tok = self.peek()?;
        let found_text = self.text(&tok).to_owned();
        let found = match tok.kind {
            TokenKind::Eof => "end of input".to_owned(),
            TokenKind::Ident | TokenKind::Number | TokenKind::Builtin => {
                format!("{} '{}'", tok.kind, found_text)
            }
            TokenKind::Str => "string literal".to_owned(),
            other => other.to_string(),
        };
        Err(ParseError {
            message: format!("expected {}, found {}", describe_alternatives(&expected), found),
            position: tok.span.start_position(),
            found: tok.kind,
            found_text,
            expected,
        }
        .into())
    }

    /// Span from `start` through the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        Span {
            start: start.start,
            end: self.last_end,
            line: start.line,
            column: start.column,
        }
    }

    fn ident(&mut self) -> Result<Ident, GxlError> {
        let tok = self.expect(TokenKind::Ident)?;
        Ok(Ident {
            name: self.text(&tok).to_owned(),
            span: tok.span,
        })
    }

    fn string(&mut self) -> Result<StrLit, GxlError> {
        let tok = self.expect(TokenKind::Str)?;
        let text = self.text(&tok);
        Ok(StrLit {
            raw: text[1..text.len() - 1].to_owned(),
            span: tok.span,
        })
    }

    /// `ident ("," ident)*`
    fn ref_list(&mut self) -> Result<RefList, GxlError> {
        let first = self.ident()?;
        let start = first.span;
        let mut names = vec![first];
        while self.eat(TokenKind::Comma)?.is_some() {
            names.push(self.ident()?);
        }
        Ok(RefList {
            names,
            span: self.span_from(start),
        })
    }

    // -- Top level ----------------------------------------------

    pub fn parse_source_file(&mut self) -> Result<SourceFile, GxlError> {
        let mut items = Vec::new();
        while !self.at(TokenKind::Eof)? {
            items.push(self.parse_top_level_item()?);
        }
        Ok(SourceFile {
            items,
            span: Span {
                start: 0,
                end: self.src.len(),
                line: 1,
                column: 1,
            },
        })
    }

    fn parse_top_level_item(&mut self) -> Result<TopLevelItem, GxlError> {
        let tok = self.peek()?;
        log::trace!(
            "top-level item at {}:{} starting with {}",
            tok.span.line,
            tok.span.column,
            tok.kind
        );
        if tok.kind == TokenKind::AnnotationOpen {
            let annotations = self.parse_annotations()?;
            if !self.at_keyword("mod")? {
                return self.unexpected(vec![
                    Expected::Keyword("mod"),
                    Expected::Token(TokenKind::AnnotationOpen),
                ]);
            }
            return self
                .parse_module(annotations, tok.span)
                .map(TopLevelItem::Module);
        }
        if self.at_keyword("mod")? {
            return self
                .parse_module(Vec::new(), tok.span)
                .map(TopLevelItem::Module);
        }
        if self.at_keyword("extern")? {
            return self.parse_extern_module().map(TopLevelItem::Extern);
        }
        self.unexpected(vec![Expected::Keyword("mod"), Expected::Keyword("extern")])
    }

    fn parse_extern_module(&mut self) -> Result<ExternModule, GxlError> {
        let start = self.expect_keyword("extern")?.span;
        self.expect_keyword("mod")?;
        let names = self.ref_list()?.names;
        self.expect(TokenKind::LBrace)?;
        let source = self.parse_module_source()?;
        self.expect(TokenKind::RBrace)?;
        let span = self.span_from(start);
        self.eat_optional_semi()?;
        Ok(ExternModule {
            names,
            source,
            span,
        })
    }

    fn parse_module_source(&mut self) -> Result<ModuleSource, GxlError> {
        let start = self.peek()?.span;
        if self.at_keyword("path")? {
            self.advance()?;
            self.expect(TokenKind::Eq)?;
            let path = self.string()?;
            self.expect(TokenKind::Semi)?;
            return Ok(ModuleSource::Path(PathSource {
                path,
                span: self.span_from(start),
            }));
        }
        if self.at_keyword("git")? {
            self.advance()?;
            self.expect(TokenKind::Eq)?;
            let url = self.string()?;
            self.expect(TokenKind::Comma)?;
            self.expect_keyword("channel")?;
            self.expect(TokenKind::Eq)?;
            let channel = self.string()?;
            self.expect(TokenKind::Semi)?;
            return Ok(ModuleSource::Git(GitSource {
                url,
                channel,
                span: self.span_from(start),
            }));
        }
        self.unexpected(vec![Expected::Keyword("path"), Expected::Keyword("git")])
    }
}

/// Parse one complete GXL document.
pub fn parse(src: &str) -> Result<SourceFile, GxlError> {
    log::debug!("parsing {} bytes", src.len());
    let file = Parser::new(src).parse_source_file()?;
    log::debug!("parsed {} top-level items", file.items.len());
    Ok(file)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
