use serde::Serialize;

use crate::ast::Builtin;
use crate::error::{LexError, LexErrorKind};
use crate::span::{Position, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Identifiers and keywords; the parser tells them apart
    Ident,
    /// Double-quoted string literal, quotes and escapes kept verbatim
    Str,
    /// `\d+(\.\d+)?`
    Number,
    /// `#` to end of line, except `#[`
    Comment,
    /// `#[`
    AnnotationOpen,
    /// One of the ten `gx.*` names, only when a `(` follows
    Builtin,
    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    RBracket,
    Colon,
    Semi,
    Comma,
    Eq,
    Pipe,
    At,
    Dot,
    Star,
    // End of input
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenKind::Ident => "identifier",
            TokenKind::Str => "string",
            TokenKind::Number => "number",
            TokenKind::Comment => "comment",
            TokenKind::AnnotationOpen => "'#['",
            TokenKind::Builtin => "builtin command",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::RBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",
            TokenKind::Comma => "','",
            TokenKind::Eq => "'='",
            TokenKind::Pipe => "'|'",
            TokenKind::At => "'@'",
            TokenKind::Dot => "'.'",
            TokenKind::Star => "'*'",
            TokenKind::Eof => "end of input",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'s>(&self, src: &'s str) -> &'s str {
        self.span.text(src)
    }
}

/// On-demand tokenizer over a single source buffer.
///
/// Whitespace is skipped and never emitted. Comments are emitted as
/// [`TokenKind::Comment`] tokens; the parser treats them as extras.
pub struct Lexer<'src> {
    src: &'src str,
    pos: usize,
    line: u32,
    column: u32,
    /// The last non-comment token was `.`, so `gx` here is a path segment.
    after_dot: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Lexer {
            src,
            pos: 0,
            line: 1,
            column: 1,
            after_dot: false,
        }
    }

    fn position(&self) -> Position {
        Position {
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    fn token(&self, kind: TokenKind, start: Position) -> Token {
        Token {
            kind,
            span: Span::new(start, self.pos),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let tok = self.scan_token()?;
        if tok.kind != TokenKind::Comment {
            self.after_dot = tok.kind == TokenKind::Dot;
        }
        Ok(tok)
    }

    fn scan_token(&mut self) -> Result<Token, LexError> {
        self.bump_while(char::is_whitespace);

        let start = self.position();
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(self.token(TokenKind::Eof, start)),
        };

        // `#[` opens an annotation; any other `#` is a line comment.
        if c == '#' {
            self.bump();
            if self.peek_char() == Some('[') {
                self.bump();
                return Ok(self.token(TokenKind::AnnotationOpen, start));
            }
            self.bump_while(|c| c != '\n');
            return Ok(self.token(TokenKind::Comment, start));
        }

        if c == '"' {
            return self.lex_string(start);
        }

        if c.is_ascii_digit() {
            self.bump_while(|c| c.is_ascii_digit());
            if self.peek_char() == Some('.')
                && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit())
            {
                self.bump();
                self.bump_while(|c| c.is_ascii_digit());
            }
            return Ok(self.token(TokenKind::Number, start));
        }

        if is_ident_start(c) {
            self.bump_while(is_ident_continue);
            if !self.after_dot
                && &self.src[start.offset..self.pos] == "gx"
                && self.lex_builtin_tail()
            {
                log::trace!(
                    "builtin '{}' at {}:{}",
                    &self.src[start.offset..self.pos],
                    start.line,
                    start.column
                );
                return Ok(self.token(TokenKind::Builtin, start));
            }
            return Ok(self.token(TokenKind::Ident, start));
        }

        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ']' => TokenKind::RBracket,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semi,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Eq,
            '|' => TokenKind::Pipe,
            '@' => TokenKind::At,
            '.' => TokenKind::Dot,
            '*' => TokenKind::Star,
            other => {
                return Err(LexError::new(LexErrorKind::UnexpectedChar(other), start));
            }
        };
        self.bump();
        Ok(self.token(kind, start))
    }

    fn lex_string(&mut self, start: Position) -> Result<Token, LexError> {
        self.bump(); // opening quote
        loop {
            match self.bump() {
                None => return Err(LexError::new(LexErrorKind::UnterminatedString, start)),
                Some('"') => break,
                // Escape pair: whatever follows the backslash is taken as is.
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(LexError::new(LexErrorKind::UnterminatedString, start));
                    }
                }
                Some(_) => {}
            }
        }
        Ok(self.token(TokenKind::Str, start))
    }

    /// Having just read `gx`, consume `.name` if `gx.name` is a builtin and
    /// the next non-extra character is `(`. Leaves the lexer untouched
    /// otherwise.
    fn lex_builtin_tail(&mut self) -> bool {
        let rest = &self.src[self.pos..];
        let Some(tail) = rest.strip_prefix('.') else {
            return false;
        };
        let word_len = tail
            .find(|c: char| !is_ident_continue(c))
            .unwrap_or(tail.len());
        if word_len == 0 || !tail.starts_with(is_ident_start) {
            return false;
        }
        let name_end = self.pos + 1 + word_len;
        let full = &self.src[self.pos - 2..name_end];
        if Builtin::from_name(full).is_none() || !next_significant_is_paren(&self.src[name_end..]) {
            return false;
        }
        while self.pos < name_end {
            self.bump();
        }
        true
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Skip whitespace and line comments; report whether `(` comes next.
fn next_significant_is_paren(mut rest: &str) -> bool {
    loop {
        rest = rest.trim_start();
        if rest.starts_with('#') && !rest.starts_with("#[") {
            rest = match rest.find('\n') {
                Some(nl) => &rest[nl..],
                None => "",
            };
            continue;
        }
        return rest.starts_with('(');
    }
}

/// Lex the whole source, comments included, ending with an `Eof` token.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        tokens.push(tok);
        if tok.kind == TokenKind::Eof {
            return Ok(tokens);
        }
    }
}
