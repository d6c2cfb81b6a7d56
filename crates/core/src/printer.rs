//! Canonical GXL serializer.
//!
//! Re-parsing the output yields a tree equal to the input modulo spans, and
//! printing is idempotent. Comments are not part of the AST and so are not
//! reproduced.

use crate::ast::{
    Activity, Annotation, AnnotationArg, Builtin, CallTarget, CommandProp, CommandStmt, EnvItem,
    Environment, ExternModule, FlowDefinition, FlowItem, FlowReference, FunctionDef, Ident, Module,
    ModuleItem, ModuleSource, PropValue, Property, RefList, SourceFile, StrLit, TopLevelItem,
    Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions { indent: 4 }
    }
}

pub fn print(file: &SourceFile, options: &PrintOptions) -> String {
    let mut p = Printer {
        out: String::new(),
        depth: 0,
        indent: options.indent,
    };
    for (i, item) in file.items.iter().enumerate() {
        if i > 0 {
            p.out.push('\n');
        }
        match item {
            TopLevelItem::Module(m) => p.module(m),
            TopLevelItem::Extern(e) => p.extern_module(e),
        }
    }
    p.out
}

struct Printer {
    out: String,
    depth: usize,
    indent: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        self.out.push_str(&" ".repeat(self.depth * self.indent));
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{} {{", header));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.line("};");
    }

    fn annotations(&mut self, annotations: &[Annotation]) {
        for a in annotations {
            let text = if a.args.is_empty() {
                format!("#[{}]", a.name.name)
            } else {
                let args: Vec<String> = a
                    .args
                    .iter()
                    .map(|arg| match arg {
                        AnnotationArg::KeyValue { key, value } => {
                            format!("{} = {}", key.name, string(value))
                        }
                        AnnotationArg::Bare(s) => string(s),
                    })
                    .collect();
                format!("#[{}({})]", a.name.name, args.join(", "))
            };
            self.line(&text);
        }
    }

    fn extern_module(&mut self, e: &ExternModule) {
        self.open(&format!("extern mod {}", idents(&e.names)));
        match &e.source {
            ModuleSource::Path(p) => self.line(&format!("path = {};", string(&p.path))),
            ModuleSource::Git(g) => self.line(&format!(
                "git = {}, channel = {};",
                string(&g.url),
                string(&g.channel)
            )),
        }
        self.close();
    }

    fn module(&mut self, m: &Module) {
        self.annotations(&m.annotations);
        self.open(&format!("mod {}{}", m.name.name, inherits(m.refs.as_ref())));
        for item in &m.items {
            match item {
                ModuleItem::Property(p) => self.property(p),
                ModuleItem::Environment(e) => self.environment(e),
                ModuleItem::Flow(f) => self.flow_definition(f),
                ModuleItem::FlowRef(r) => self.flow_reference(r),
                ModuleItem::Function(f) => self.function(f),
                ModuleItem::Activity(a) => self.activity(a),
            }
        }
        self.close();
    }

    fn property(&mut self, p: &Property) {
        let value = match &p.value {
            Value::String(s) => string(s),
            Value::Number(n) => n.text.clone(),
        };
        self.line(&format!("{} = {};", p.key.name, value));
    }

    fn environment(&mut self, e: &Environment) {
        self.annotations(&e.annotations);
        self.open(&format!("env {}{}", e.name.name, inherits(e.refs.as_ref())));
        for item in &e.items {
            match item {
                EnvItem::Property(p) => self.property(p),
                EnvItem::Command(c) => self.command(c),
                EnvItem::Vars(v) => {
                    if v.props.is_empty() {
                        self.line("gx.vars { };");
                    } else {
                        self.line(&format!("gx.vars {{ {} }};", props(&v.props)));
                    }
                }
            }
        }
        self.close();
    }

    fn flow_definition(&mut self, f: &FlowDefinition) {
        self.annotations(&f.annotations);
        let mut header = String::from("flow ");
        if let Some(before) = &f.before {
            header.push_str(&format!("{} | ", idents(&before.names)));
        }
        header.push('@');
        header.push_str(&f.name.name);
        if let Some(after) = &f.after {
            header.push_str(&format!(" | {}", idents(&after.names)));
        }
        self.open(&header);
        for item in &f.items {
            match item {
                FlowItem::Command(c) => self.command(c),
                FlowItem::Property(p) => self.property(p),
            }
        }
        self.close();
    }

    fn flow_reference(&mut self, r: &FlowReference) {
        self.annotations(&r.annotations);
        self.line(&format!(
            "flow {} : {};",
            r.name.name,
            idents(&r.targets.names)
        ));
    }

    fn function(&mut self, f: &FunctionDef) {
        self.annotations(&f.annotations);
        let params: Vec<String> = f
            .params
            .iter()
            .map(|p| {
                let mut s = String::new();
                if p.variadic {
                    s.push('*');
                }
                s.push_str(&p.name.name);
                if let Some(default) = &p.default {
                    s.push_str(&format!(" = {}", string(default)));
                }
                s
            })
            .collect();
        self.open(&format!("fn {}({})", f.name.name, params.join(", ")));
        for c in &f.body {
            self.command(c);
        }
        self.close();
    }

    fn activity(&mut self, a: &Activity) {
        self.annotations(&a.annotations);
        self.open(&format!("activity {}", a.name.name));
        for p in &a.props {
            self.property(p);
        }
        self.close();
    }

    fn command(&mut self, c: &CommandStmt) {
        let callee = match c {
            CommandStmt::Builtin(b) => b.name.as_str().to_owned(),
            CommandStmt::Call(call) => call_target(&call.target),
        };
        self.line(&format!("{}({});", callee, props(c.props())));
    }
}

/// A call spelled like a builtin gets a space before its dot so it does
/// not re-lex as one.
fn call_target(target: &CallTarget) -> String {
    let joined = target.to_string();
    if Builtin::from_name(&joined).is_some() {
        target.segments().join(" .")
    } else {
        joined
    }
}

fn string(s: &StrLit) -> String {
    format!("\"{}\"", s.raw)
}

fn idents(names: &[Ident]) -> String {
    names
        .iter()
        .map(Ident::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn inherits(refs: Option<&RefList>) -> String {
    match refs {
        Some(r) => format!(" : {}", idents(&r.names)),
        None => String::new(),
    }
}

fn props(props: &[CommandProp]) -> String {
    props
        .iter()
        .map(|p| {
            let value = match &p.value {
                PropValue::String(s) => string(s),
                PropValue::Var(v) => v.name.clone(),
            };
            format!("{}: {}", p.key.name, value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}
