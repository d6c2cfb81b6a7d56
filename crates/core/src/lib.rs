#![allow(clippy::result_large_err)]
//! gxl-core: lexer, grammar engine, and syntax tree for the GXL
//! workflow/build-configuration language.
//!
//! Turns one UTF-8 document into a [`SourceFile`] or the first fatal
//! [`GxlError`]. Parsing is a pure function of the input text: no I/O, no
//! shared state, safe to run on many threads at once.
//!
//! # Public API
//!
//! - [`parse()`] -- whole-document parse
//! - [`tokenize()`] -- the raw token stream, comments included
//! - [`print()`] -- canonical re-serialization of a tree
//! - [`GxlError`] -- lex or parse failure, with [`GxlError::render`] for
//!   source-pointer diagnostics
//! - AST types: [`SourceFile`], [`Module`], [`ExternModule`], and friends

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod span;
pub mod testing;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{
    Activity, Annotation, AnnotationArg, Builtin, BuiltinCommand, CallExpression, CallTarget,
    CommandProp, CommandStmt, DottedName, EnvItem, Environment, ExternModule, FlowDefinition,
    FlowItem, FlowReference, FunctionDef, FunctionParam, GitSource, GxVarsBlock, Ident, Module,
    ModuleItem, ModuleSource, NumLit, PathSource, PropValue, Property, RefList, SourceFile,
    StrLit, TopLevelItem, Value,
};
pub use error::{Expected, GxlError, LexError, LexErrorKind, ParseError};
pub use lexer::{Token, TokenKind};
pub use span::{Position, Span};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use lexer::tokenize;
pub use parser::parse;
pub use printer::{print, PrintOptions};
