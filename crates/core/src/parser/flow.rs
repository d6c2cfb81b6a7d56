use super::Parser;
use crate::ast::{
    Annotation, FlowDefinition, FlowItem, FlowReference, FunctionDef, FunctionParam, ModuleItem,
    RefList,
};
use crate::error::{Expected, GxlError};
use crate::lexer::TokenKind;
use crate::span::Span;

impl<'src> Parser<'src> {
    /// `flow` introduces either a definition (`@name`, optionally preceded by
    /// `refs |`) or a reference (`name : refs ;`). Decided by at most two
    /// tokens of lookahead after the keyword.
    pub(super) fn parse_flow(
        &mut self,
        annotations: Vec<Annotation>,
        start: Span,
    ) -> Result<ModuleItem, GxlError> {
        self.expect_keyword("flow")?;
        match self.peek_kind()? {
            TokenKind::At => self
                .parse_flow_definition(annotations, None, start)
                .map(ModuleItem::Flow),
            TokenKind::Ident => match self.peek_nth(1)?.kind {
                TokenKind::Colon => self
                    .parse_flow_reference(annotations, start)
                    .map(ModuleItem::FlowRef),
                TokenKind::Comma | TokenKind::Pipe => {
                    let before = self.ref_list()?;
                    self.expect(TokenKind::Pipe)?;
                    self.parse_flow_definition(annotations, Some(before), start)
                        .map(ModuleItem::Flow)
                }
                _ => {
                    self.advance()?;
                    self.unexpected(vec![
                        Expected::Token(TokenKind::Colon),
                        Expected::Token(TokenKind::Comma),
                        Expected::Token(TokenKind::Pipe),
                    ])
                }
            },
            _ => self.unexpected(vec![
                Expected::Token(TokenKind::At),
                Expected::Token(TokenKind::Ident),
            ]),
        }
    }

    fn parse_flow_definition(
        &mut self,
        annotations: Vec<Annotation>,
        before: Option<RefList>,
        start: Span,
    ) -> Result<FlowDefinition, GxlError> {
        self.expect(TokenKind::At)?;
        let name = self.ident()?;
        let after = if self.eat(TokenKind::Pipe)?.is_some() {
            Some(self.ref_list()?)
        } else {
            None
        };
        self.expect(TokenKind::LBrace)?;
        let mut items = Vec::new();
        while !self.at(TokenKind::RBrace)? {
            items.push(self.parse_flow_item()?);
        }
        self.advance()?;
        let span = self.span_from(start);
        self.eat_optional_semi()?;
        Ok(FlowDefinition {
            annotations,
            before,
            name,
            after,
            items,
            span,
        })
    }

    fn parse_flow_item(&mut self) -> Result<FlowItem, GxlError> {
        match self.peek_kind()? {
            TokenKind::Builtin => self.parse_command_stmt().map(FlowItem::Command),
            TokenKind::Ident if self.peek_nth(1)?.kind == TokenKind::Eq => {
                self.parse_property().map(FlowItem::Property)
            }
            TokenKind::Ident => self.parse_command_stmt().map(FlowItem::Command),
            _ => self.unexpected(vec![
                Expected::Item("property"),
                Expected::Item("command"),
                Expected::Token(TokenKind::RBrace),
            ]),
        }
    }

    fn parse_flow_reference(
        &mut self,
        annotations: Vec<Annotation>,
        start: Span,
    ) -> Result<FlowReference, GxlError> {
        let name = self.ident()?;
        self.expect(TokenKind::Colon)?;
        let targets = self.ref_list()?;
        self.expect(TokenKind::Semi)?;
        Ok(FlowReference {
            annotations,
            name,
            targets,
            span: self.span_from(start),
        })
    }

    pub(super) fn parse_function(
        &mut self,
        annotations: Vec<Annotation>,
        start: Span,
    ) -> Result<FunctionDef, GxlError> {
        self.expect_keyword("fn")?;
        let name = self.ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.at(TokenKind::RParen)? {
            params.push(self.parse_function_param()?);
            while self.eat(TokenKind::Comma)?.is_some() {
                params.push(self.parse_function_param()?);
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.at(TokenKind::RBrace)? {
            if !matches!(self.peek_kind()?, TokenKind::Builtin | TokenKind::Ident) {
                return self.unexpected(vec![
                    Expected::Item("command"),
                    Expected::Token(TokenKind::RBrace),
                ]);
            }
            body.push(self.parse_command_stmt()?);
        }
        self.advance()?;
        let span = self.span_from(start);
        self.eat_optional_semi()?;
        Ok(FunctionDef {
            annotations,
            name,
            params,
            body,
            span,
        })
    }

    /// `[*] name [= "default"]`
    fn parse_function_param(&mut self) -> Result<FunctionParam, GxlError> {
        let start = self.peek()?.span;
        let variadic = self.eat(TokenKind::Star)?.is_some();
        let name = self.ident()?;
        let default = if self.eat(TokenKind::Eq)?.is_some() {
            Some(self.string()?)
        } else {
            None
        };
        Ok(FunctionParam {
            variadic,
            name,
            default,
            span: self.span_from(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{CommandStmt, FlowItem, ModuleItem};
    use crate::error::Expected;
    use crate::lexer::TokenKind;
    use crate::parser::tests::{only_module, parse_err, parse_ok};

    #[test]
    fn flow_definition_with_both_ref_lists() {
        let src = r#"
mod m {
    #[usage(desc = "build it")]
    flow prepare, fetch | @build | test, pack {
        step = "1";
        gx.cmd(cmd: "make");
    };
}
"#;
        let file = parse_ok(src);
        match &only_module(&file).items[0] {
            ModuleItem::Flow(f) => {
                assert_eq!(f.name.name, "build");
                assert_eq!(f.annotations.len(), 1);
                let before: Vec<_> = f.before.as_ref().expect("before").names().collect();
                let after: Vec<_> = f.after.as_ref().expect("after").names().collect();
                assert_eq!(before, ["prepare", "fetch"]);
                assert_eq!(after, ["test", "pack"]);
                assert!(matches!(f.items[0], FlowItem::Property(_)));
                assert!(matches!(f.items[1], FlowItem::Command(_)));
                assert!(f.span.text(src).starts_with("#[usage"));
                assert!(f.span.text(src).ends_with('}'));
            }
            other => panic!("expected flow definition, got {:?}", other),
        }
    }

    #[test]
    fn flow_definition_single_leading_ref() {
        let file = parse_ok("mod m { flow prep | @run { } }");
        match &only_module(&file).items[0] {
            ModuleItem::Flow(f) => {
                assert_eq!(f.before.as_ref().map(|r| r.names.len()), Some(1));
                assert!(f.after.is_none());
            }
            other => panic!("expected flow definition, got {:?}", other),
        }
    }

    #[test]
    fn flow_reference() {
        let file = parse_ok("mod m { #[alias] flow deploy : prod, build; }");
        match &only_module(&file).items[0] {
            ModuleItem::FlowRef(r) => {
                assert_eq!(r.name.name, "deploy");
                assert_eq!(r.annotations.len(), 1);
                assert_eq!(r.targets.names().collect::<Vec<_>>(), ["prod", "build"]);
            }
            other => panic!("expected flow reference, got {:?}", other),
        }
    }

    #[test]
    fn flow_reference_targets_are_plain_identifiers() {
        let err = parse_err("mod m { flow deploy : envs.prod; }");
        assert_eq!(err.found, TokenKind::Dot);
        assert_eq!(err.expected, vec![Expected::Token(TokenKind::Semi)]);
    }

    #[test]
    fn flow_reference_requires_semicolon() {
        let err = parse_err("mod m { flow deploy : prod }");
        assert_eq!(err.expected, vec![Expected::Token(TokenKind::Semi)]);
    }

    #[test]
    fn flow_needs_at_or_ref_list() {
        let err = parse_err("mod m { flow { } }");
        assert_eq!(
            err.expected,
            vec![Expected::Token(TokenKind::At), Expected::Token(TokenKind::Ident)]
        );
        let err = parse_err("mod m { flow name { } }");
        assert_eq!(err.found, TokenKind::LBrace);
        assert_eq!(
            err.expected,
            vec![
                Expected::Token(TokenKind::Colon),
                Expected::Token(TokenKind::Comma),
                Expected::Token(TokenKind::Pipe)
            ]
        );
    }

    #[test]
    fn flow_body_rejects_nested_constructs() {
        let err = parse_err("mod m { flow @f { 7 } }");
        assert_eq!(
            err.expected,
            vec![
                Expected::Item("property"),
                Expected::Item("command"),
                Expected::Token(TokenKind::RBrace)
            ]
        );
    }

    #[test]
    fn function_params_and_body() {
        let src = r#"mod m { fn greet(who, *rest, greeting = "hello") { gx.echo(msg: who); log(); } }"#;
        let file = parse_ok(src);
        match &only_module(&file).items[0] {
            ModuleItem::Function(f) => {
                assert_eq!(f.name.name, "greet");
                assert_eq!(f.params.len(), 3);
                assert!(!f.params[0].variadic);
                assert!(f.params[1].variadic);
                assert_eq!(f.params[1].name.name, "rest");
                assert_eq!(f.params[1].span.text(src), "*rest");
                assert_eq!(
                    f.params[2].default.as_ref().map(|d| d.raw.as_str()),
                    Some("hello")
                );
                assert_eq!(f.body.len(), 2);
                assert!(matches!(f.body[1], CommandStmt::Call(_)));
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn function_without_params() {
        let file = parse_ok("mod m { fn noop() { } ; }");
        match &only_module(&file).items[0] {
            ModuleItem::Function(f) => {
                assert!(f.params.is_empty());
                assert!(f.body.is_empty());
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn function_body_rejects_properties() {
        let err = parse_err(r#"mod m { fn f() { x = "1"; } }"#);
        assert_eq!(err.found, TokenKind::Eq);
        assert_eq!(err.expected, vec![Expected::Token(TokenKind::LParen)]);
    }

    #[test]
    fn function_default_must_be_string() {
        let err = parse_err("mod m { fn f(a = 1) { } }");
        assert_eq!(err.expected, vec![Expected::Token(TokenKind::Str)]);
    }
}
