use super::Parser;
use crate::ast::{
    Activity, Annotation, CallTarget, EnvItem, Environment, Module, ModuleItem, NumLit, Property,
    Value,
};
use crate::error::{Expected, GxlError};
use crate::lexer::TokenKind;
use crate::span::Span;

/// Keywords that may open a module item, after any annotations.
const MODULE_ITEM_KEYWORDS: [&str; 4] = ["env", "flow", "fn", "activity"];

impl<'src> Parser<'src> {
    pub(super) fn parse_module(
        &mut self,
        annotations: Vec<Annotation>,
        start: Span,
    ) -> Result<Module, GxlError> {
        self.expect_keyword("mod")?;
        let name = self.ident()?;
        let refs = if self.eat(TokenKind::Colon)?.is_some() {
            Some(self.ref_list()?)
        } else {
            None
        };
        self.expect(TokenKind::LBrace)?;
        let mut items = Vec::new();
        while !self.at(TokenKind::RBrace)? {
            items.push(self.parse_module_item()?);
        }
        self.advance()?;
        let span = self.span_from(start);
        self.eat_optional_semi()?;
        Ok(Module {
            annotations,
            name,
            refs,
            items,
            span,
        })
    }

    fn parse_module_item(&mut self) -> Result<ModuleItem, GxlError> {
        let tok = self.peek()?;
        match tok.kind {
            // `ident =` is a property even if the ident spells a keyword.
            TokenKind::Ident if self.peek_nth(1)?.kind == TokenKind::Eq => {
                self.parse_property().map(ModuleItem::Property)
            }
            TokenKind::Ident if MODULE_ITEM_KEYWORDS.contains(&self.text(&tok)) => {
                self.parse_annotated_item(Vec::new(), tok.span)
            }
            TokenKind::AnnotationOpen => {
                let annotations = self.parse_annotations()?;
                let next = self.peek()?;
                if next.kind == TokenKind::Ident
                    && MODULE_ITEM_KEYWORDS.contains(&self.text(&next))
                {
                    self.parse_annotated_item(annotations, tok.span)
                } else {
                    let mut expected: Vec<Expected> = MODULE_ITEM_KEYWORDS
                        .iter()
                        .map(|kw| Expected::Keyword(*kw))
                        .collect();
                    expected.push(Expected::Token(TokenKind::AnnotationOpen));
                    self.unexpected(expected)
                }
            }
            _ => {
                let mut expected = vec![Expected::Item("property")];
                expected.extend(MODULE_ITEM_KEYWORDS.iter().map(|kw| Expected::Keyword(*kw)));
                expected.push(Expected::Token(TokenKind::AnnotationOpen));
                expected.push(Expected::Token(TokenKind::RBrace));
                self.unexpected(expected)
            }
        }
    }

    /// Dispatch on the construct keyword; the current token is known to be
    /// one of [`MODULE_ITEM_KEYWORDS`].
    fn parse_annotated_item(
        &mut self,
        annotations: Vec<Annotation>,
        start: Span,
    ) -> Result<ModuleItem, GxlError> {
        if self.at_keyword("env")? {
            self.parse_environment(annotations, start)
                .map(ModuleItem::Environment)
        } else if self.at_keyword("flow")? {
            self.parse_flow(annotations, start)
        } else if self.at_keyword("fn")? {
            self.parse_function(annotations, start)
                .map(ModuleItem::Function)
        } else {
            self.parse_activity(annotations, start)
                .map(ModuleItem::Activity)
        }
    }

    /// `key = "string" ;` or `key = 1.5 ;`
    pub(super) fn parse_property(&mut self) -> Result<Property, GxlError> {
        let key = self.ident()?;
        self.expect(TokenKind::Eq)?;
        let value = match self.peek_kind()? {
            TokenKind::Str => Value::String(self.string()?),
            TokenKind::Number => {
                let tok = self.advance()?;
                Value::Number(NumLit {
                    text: self.text(&tok).to_owned(),
                    span: tok.span,
                })
            }
            _ => {
                return self.unexpected(vec![
                    Expected::Token(TokenKind::Str),
                    Expected::Token(TokenKind::Number),
                ])
            }
        };
        self.expect(TokenKind::Semi)?;
        let span = self.span_from(key.span);
        Ok(Property { key, value, span })
    }

    fn parse_environment(
        &mut self,
        annotations: Vec<Annotation>,
        start: Span,
    ) -> Result<Environment, GxlError> {
        self.expect_keyword("env")?;
        let name = self.ident()?;
        let refs = if self.eat(TokenKind::Colon)?.is_some() {
            Some(self.ref_list()?)
        } else {
            None
        };
        self.expect(TokenKind::LBrace)?;
        let mut items = Vec::new();
        while !self.at(TokenKind::RBrace)? {
            items.push(self.parse_env_item()?);
        }
        self.advance()?;
        let span = self.span_from(start);
        self.eat_optional_semi()?;
        Ok(Environment {
            annotations,
            name,
            refs,
            items,
            span,
        })
    }

    fn parse_env_item(&mut self) -> Result<EnvItem, GxlError> {
        let tok = self.peek()?;
        match tok.kind {
            TokenKind::Builtin => self.parse_command_stmt().map(EnvItem::Command),
            TokenKind::Ident => match self.peek_nth(1)?.kind {
                TokenKind::Eq => self.parse_property().map(EnvItem::Property),
                TokenKind::LParen | TokenKind::Dot => {
                    let target = self.parse_call_target()?;
                    if is_gx_vars(&target) && self.at(TokenKind::LBrace)? {
                        self.parse_gx_vars_block(tok.span).map(EnvItem::Vars)
                    } else {
                        self.finish_call(target, tok.span).map(EnvItem::Command)
                    }
                }
                _ => {
                    // Report at the token after the identifier.
                    self.advance()?;
                    self.unexpected(vec![
                        Expected::Token(TokenKind::Eq),
                        Expected::Token(TokenKind::LParen),
                        Expected::Token(TokenKind::Dot),
                    ])
                }
            },
            _ => self.unexpected(vec![
                Expected::Item("property"),
                Expected::Item("command"),
                Expected::Item("gx.vars block"),
                Expected::Token(TokenKind::RBrace),
            ]),
        }
    }

    fn parse_activity(
        &mut self,
        annotations: Vec<Annotation>,
        start: Span,
    ) -> Result<Activity, GxlError> {
        self.expect_keyword("activity")?;
        let name = self.ident()?;
        self.expect(TokenKind::LBrace)?;
        let mut props = Vec::new();
        while !self.at(TokenKind::RBrace)? {
            if !self.at(TokenKind::Ident)? {
                return self.unexpected(vec![
                    Expected::Item("property"),
                    Expected::Token(TokenKind::RBrace),
                ]);
            }
            props.push(self.parse_property()?);
        }
        self.advance()?;
        let span = self.span_from(start);
        self.eat_optional_semi()?;
        Ok(Activity {
            annotations,
            name,
            props,
            span,
        })
    }
}

fn is_gx_vars(target: &CallTarget) -> bool {
    target.segments() == ["gx", "vars"]
}
