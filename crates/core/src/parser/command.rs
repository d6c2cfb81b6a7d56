use super::Parser;
use crate::ast::{
    Annotation, AnnotationArg, Builtin, BuiltinCommand, CallExpression, CallTarget, CommandProp,
    CommandStmt, DottedName, GxVarsBlock, PropValue,
};
use crate::error::{Expected, GxlError};
use crate::lexer::TokenKind;
use crate::span::Span;

impl<'src> Parser<'src> {
    /// Zero or more `#[name]` / `#[name(args)]`, in source order.
    pub(super) fn parse_annotations(&mut self) -> Result<Vec<Annotation>, GxlError> {
        let mut annotations = Vec::new();
        while let Some(open) = self.eat(TokenKind::AnnotationOpen)? {
            let name = self.ident()?;
            let mut args = Vec::new();
            if self.eat(TokenKind::LParen)?.is_some() {
                args.push(self.parse_annotation_arg()?);
                while self.eat(TokenKind::Comma)?.is_some() {
                    args.push(self.parse_annotation_arg()?);
                }
                self.expect(TokenKind::RParen)?;
            }
            self.expect(TokenKind::RBracket)?;
            annotations.push(Annotation {
                name,
                args,
                span: self.span_from(open.span),
            });
        }
        Ok(annotations)
    }

    fn parse_annotation_arg(&mut self) -> Result<AnnotationArg, GxlError> {
        match self.peek_kind()? {
            TokenKind::Str => Ok(AnnotationArg::Bare(self.string()?)),
            TokenKind::Ident => {
                let key = self.ident()?;
                self.expect(TokenKind::Eq)?;
                let value = self.string()?;
                Ok(AnnotationArg::KeyValue { key, value })
            }
            _ => self.unexpected(vec![
                Expected::Token(TokenKind::Str),
                Expected::Token(TokenKind::Ident),
            ]),
        }
    }

    /// `builtin(props?) ;` or `target(props?) ;`
    pub(super) fn parse_command_stmt(&mut self) -> Result<CommandStmt, GxlError> {
        let tok = self.peek()?;
        match tok.kind {
            TokenKind::Builtin => {
                let Some(name) = Builtin::from_name(self.text(&tok)) else {
                    return self.unexpected(vec![Expected::Item("command")]);
                };
                self.advance()?;
                let props = self.parse_paren_props()?;
                let span = self.span_from(tok.span);
                self.expect(TokenKind::Semi)?;
                Ok(CommandStmt::Builtin(BuiltinCommand { name, props, span }))
            }
            TokenKind::Ident => {
                let target = self.parse_call_target()?;
                self.finish_call(target, tok.span)
            }
            _ => self.unexpected(vec![Expected::Item("command")]),
        }
    }

    /// A bare identifier or `a.b(.c)*`.
    pub(super) fn parse_call_target(&mut self) -> Result<CallTarget, GxlError> {
        let first = self.ident()?;
        if !self.at(TokenKind::Dot)? {
            return Ok(CallTarget::Name(first));
        }
        let start = first.span;
        let mut segments = vec![first];
        while self.eat(TokenKind::Dot)?.is_some() {
            segments.push(self.ident()?);
        }
        Ok(CallTarget::Dotted(DottedName {
            segments,
            span: self.span_from(start),
        }))
    }

    /// The `(props?) ;` tail of a call whose target is already parsed.
    pub(super) fn finish_call(
        &mut self,
        target: CallTarget,
        start: Span,
    ) -> Result<CommandStmt, GxlError> {
        let props = self.parse_paren_props()?;
        let span = self.span_from(start);
        self.expect(TokenKind::Semi)?;
        Ok(CommandStmt::Call(CallExpression {
            target,
            props,
            span,
        }))
    }

    fn parse_paren_props(&mut self) -> Result<Vec<CommandProp>, GxlError> {
        self.expect(TokenKind::LParen)?;
        if self.eat(TokenKind::RParen)?.is_some() {
            return Ok(Vec::new());
        }
        let props = self.parse_command_props()?;
        self.expect(TokenKind::RParen)?;
        Ok(props)
    }

    /// `prop ("," prop)*`
    fn parse_command_props(&mut self) -> Result<Vec<CommandProp>, GxlError> {
        let mut props = vec![self.parse_command_prop()?];
        while self.eat(TokenKind::Comma)?.is_some() {
            props.push(self.parse_command_prop()?);
        }
        Ok(props)
    }

    fn parse_command_prop(&mut self) -> Result<CommandProp, GxlError> {
        let key = self.ident()?;
        self.expect(TokenKind::Colon)?;
        let value = match self.peek_kind()? {
            TokenKind::Str => PropValue::String(self.string()?),
            TokenKind::Ident => PropValue::Var(self.ident()?),
            _ => {
                return self.unexpected(vec![
                    Expected::Token(TokenKind::Str),
                    Expected::Token(TokenKind::Ident),
                ])
            }
        };
        let span = self.span_from(key.span);
        Ok(CommandProp { key, value, span })
    }

    /// `{ props? }` after `gx.vars` has been consumed.
    pub(super) fn parse_gx_vars_block(&mut self, start: Span) -> Result<GxVarsBlock, GxlError> {
        self.expect(TokenKind::LBrace)?;
        let props = if self.at(TokenKind::RBrace)? {
            Vec::new()
        } else {
            self.parse_command_props()?
        };
        self.expect(TokenKind::RBrace)?;
        let span = self.span_from(start);
        self.eat_optional_semi()?;
        Ok(GxVarsBlock { props, span })
    }
}
