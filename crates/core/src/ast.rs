//! AST types for GXL documents.
//!
//! Produced bottom-up by the parser and immutable afterwards. Every node
//! carries the [`Span`] of the source it was built from so later phases can
//! point diagnostics at it. Literal nodes keep raw source text: unescaping
//! is a downstream concern.

use serde::Serialize;

use crate::span::Span;

// ──────────────────────────────────────────────
// Leaves
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

/// A string literal. `raw` is the text between the quotes, escapes intact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrLit {
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumLit {
    pub text: String,
    pub span: Span,
}

/// Ordered, non-empty, comma-separated identifiers. Order is significant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefList {
    pub names: Vec<Ident>,
    pub span: Span,
}

impl RefList {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(Ident::as_str)
    }
}

// ──────────────────────────────────────────────
// Top level
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFile {
    pub items: Vec<TopLevelItem>,
    pub span: Span,
}

impl SourceFile {
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.items.iter().filter_map(|item| match item {
            TopLevelItem::Module(m) => Some(m),
            TopLevelItem::Extern(_) => None,
        })
    }

    pub fn extern_modules(&self) -> impl Iterator<Item = &ExternModule> {
        self.items.iter().filter_map(|item| match item {
            TopLevelItem::Extern(e) => Some(e),
            TopLevelItem::Module(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TopLevelItem {
    Module(Module),
    Extern(ExternModule),
}

/// `extern mod a, b { path = "..."; }` or `{ git = "...", channel = "..."; }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternModule {
    pub names: Vec<Ident>,
    pub source: ModuleSource,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleSource {
    Path(PathSource),
    Git(GitSource),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSource {
    pub path: StrLit,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GitSource {
    pub url: StrLit,
    pub channel: StrLit,
    pub span: Span,
}

// ──────────────────────────────────────────────
// Module and its items
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub annotations: Vec<Annotation>,
    pub name: Ident,
    pub refs: Option<RefList>,
    pub items: Vec<ModuleItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleItem {
    Property(Property),
    Environment(Environment),
    Flow(FlowDefinition),
    FlowRef(FlowReference),
    Function(FunctionDef),
    Activity(Activity),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub key: Ident,
    pub value: Value,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    String(StrLit),
    Number(NumLit),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environment {
    pub annotations: Vec<Annotation>,
    pub name: Ident,
    pub refs: Option<RefList>,
    pub items: Vec<EnvItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvItem {
    Property(Property),
    Command(CommandStmt),
    Vars(GxVarsBlock),
}

/// `gx.vars { key: value, ... }` inside an environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GxVarsBlock {
    pub props: Vec<CommandProp>,
    pub span: Span,
}

/// `flow [pre, ... |] @name [| post, ...] { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowDefinition {
    pub annotations: Vec<Annotation>,
    pub before: Option<RefList>,
    pub name: Ident,
    pub after: Option<RefList>,
    pub items: Vec<FlowItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowItem {
    Command(CommandStmt),
    Property(Property),
}

/// `flow name : a, b;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowReference {
    pub annotations: Vec<Annotation>,
    pub name: Ident,
    pub targets: RefList,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    pub annotations: Vec<Annotation>,
    pub name: Ident,
    pub params: Vec<FunctionParam>,
    pub body: Vec<CommandStmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionParam {
    /// Declared with a leading `*`.
    pub variadic: bool,
    pub name: Ident,
    pub default: Option<StrLit>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub annotations: Vec<Annotation>,
    pub name: Ident,
    pub props: Vec<Property>,
    pub span: Span,
}

// ──────────────────────────────────────────────
// Annotations
// ──────────────────────────────────────────────

/// `#[name]` or `#[name(arg, ...)]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub name: Ident,
    pub args: Vec<AnnotationArg>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnnotationArg {
    KeyValue { key: Ident, value: StrLit },
    Bare(StrLit),
}

// ──────────────────────────────────────────────
// Commands
// ──────────────────────────────────────────────

/// The closed set of builtin command names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Builtin {
    #[serde(rename = "gx.echo")]
    Echo,
    #[serde(rename = "gx.vars")]
    Vars,
    #[serde(rename = "gx.cmd")]
    Cmd,
    #[serde(rename = "gx.read")]
    Read,
    #[serde(rename = "gx.tpl")]
    Tpl,
    #[serde(rename = "gx.assert")]
    Assert,
    #[serde(rename = "gx.ver")]
    Ver,
    #[serde(rename = "gx.read_cmd")]
    ReadCmd,
    #[serde(rename = "gx.read_stdin")]
    ReadStdin,
    #[serde(rename = "gx.read_file")]
    ReadFile,
}

impl Builtin {
    pub const ALL: [Builtin; 10] = [
        Builtin::Echo,
        Builtin::Vars,
        Builtin::Cmd,
        Builtin::Read,
        Builtin::Tpl,
        Builtin::Assert,
        Builtin::Ver,
        Builtin::ReadCmd,
        Builtin::ReadStdin,
        Builtin::ReadFile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Builtin::Echo => "gx.echo",
            Builtin::Vars => "gx.vars",
            Builtin::Cmd => "gx.cmd",
            Builtin::Read => "gx.read",
            Builtin::Tpl => "gx.tpl",
            Builtin::Assert => "gx.assert",
            Builtin::Ver => "gx.ver",
            Builtin::ReadCmd => "gx.read_cmd",
            Builtin::ReadStdin => "gx.read_stdin",
            Builtin::ReadFile => "gx.read_file",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| b.as_str() == name)
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command statement; the trailing `;` is not part of the node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandStmt {
    Builtin(BuiltinCommand),
    Call(CallExpression),
}

impl CommandStmt {
    pub fn props(&self) -> &[CommandProp] {
        match self {
            CommandStmt::Builtin(b) => &b.props,
            CommandStmt::Call(c) => &c.props,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            CommandStmt::Builtin(b) => b.span,
            CommandStmt::Call(c) => c.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltinCommand {
    pub name: Builtin,
    pub props: Vec<CommandProp>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpression {
    pub target: CallTarget,
    pub props: Vec<CommandProp>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallTarget {
    Name(Ident),
    Dotted(DottedName),
}

impl CallTarget {
    /// Segment names in order; a bare name yields one segment.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            CallTarget::Name(id) => vec![id.as_str()],
            CallTarget::Dotted(d) => d.segments.iter().map(Ident::as_str).collect(),
        }
    }
}

impl std::fmt::Display for CallTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments().join("."))
    }
}

/// Two or more identifiers joined by `.`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DottedName {
    pub segments: Vec<Ident>,
    pub span: Span,
}

/// `key: value` inside a command's parentheses or a `gx.vars` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandProp {
    pub key: Ident,
    pub value: PropValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropValue {
    String(StrLit),
    /// A variable reference, not a literal.
    Var(Ident),
}
