use serde::Serialize;

use crate::lexer::TokenKind;
use crate::span::Position;

/// What went wrong while turning characters into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "type", content = "char", rename_all = "snake_case")]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unexpected character '{}'", .0.escape_debug())]
    UnexpectedChar(char),
}

/// A lexing failure. Always fatal for the current parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind} at {}:{}", .position.line, .position.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

impl LexError {
    pub fn new(kind: LexErrorKind, position: Position) -> Self {
        LexError { kind, position }
    }
}

/// One grammar alternative that would have been accepted at an error point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Expected {
    /// A specific token kind, e.g. `'{'` or identifier.
    Token(TokenKind),
    /// A context-sensitive keyword such as `mod` or `path`.
    Keyword(&'static str),
    /// A named grammar item such as "property" or "flow definition".
    Item(&'static str),
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::Keyword(kw) => write!(f, "'{}'", kw),
            Expected::Item(item) => f.write_str(item),
        }
    }
}

/// Render a set of alternatives the way messages read:
/// `a`, `a or b`, `one of a, b, c`.
pub fn describe_alternatives(expected: &[Expected]) -> String {
    match expected {
        [] => "nothing".to_owned(),
        [one] => one.to_string(),
        [a, b] => format!("{} or {}", a, b),
        many => {
            let parts: Vec<String> = many.iter().map(|e| e.to_string()).collect();
            format!("one of {}", parts.join(", "))
        }
    }
}

/// An unexpected token at a structural decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message} at {}:{}", .position.line, .position.column)]
pub struct ParseError {
    pub message: String,
    pub position: Position,
    pub found: TokenKind,
    /// Source text of the offending token (empty at end of input).
    pub found_text: String,
    pub expected: Vec<Expected>,
}

/// Either failure a parse can end with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GxlError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl GxlError {
    pub fn position(&self) -> Position {
        match self {
            GxlError::Lex(e) => e.position,
            GxlError::Parse(e) => e.position,
        }
    }

    /// The message without the trailing location.
    pub fn message(&self) -> String {
        match self {
            GxlError::Lex(e) => e.kind.to_string(),
            GxlError::Parse(e) => e.message.clone(),
        }
    }

    pub fn is_lex(&self) -> bool {
        matches!(self, GxlError::Lex(_))
    }

    /// Serialize to the JSON shape the CLI prints. All fields are always
    /// present (null/empty where not applicable).
    pub fn to_json_value(&self) -> serde_json::Value {
        let pos = self.position();
        let (kind, found, expected) = match self {
            GxlError::Lex(_) => ("lex", serde_json::Value::Null, Vec::new()),
            GxlError::Parse(e) => (
                "parse",
                serde_json::json!(e.found),
                e.expected.iter().map(|x| x.to_string()).collect(),
            ),
        };
        serde_json::json!({
            "kind":     kind,
            "message":  self.message(),
            "line":     pos.line,
            "column":   pos.column,
            "offset":   pos.offset,
            "found":    found,
            "expected": expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternatives_read_naturally() {
        let two = [Expected::Keyword("mod"), Expected::Keyword("extern")];
        assert_eq!(describe_alternatives(&two), "'mod' or 'extern'");

        let three = [
            Expected::Item("property"),
            Expected::Token(TokenKind::Builtin),
            Expected::Token(TokenKind::RBrace),
        ];
        assert_eq!(
            describe_alternatives(&three),
            "one of property, builtin command, '}'"
        );
    }

    #[test]
    fn lex_error_json_has_null_found() {
        let err = GxlError::from(LexError::new(
            LexErrorKind::UnterminatedString,
            Position {
                offset: 4,
                line: 1,
                column: 5,
            },
        ));
        let json = err.to_json_value();
        assert_eq!(json["kind"], "lex");
        assert_eq!(json["message"], "unterminated string literal");
        assert_eq!(json["offset"], 4);
        assert!(json["found"].is_null());
        assert_eq!(json["expected"].as_array().map(|a| a.len()), Some(0));
    }
}
