//! TypeScript intermediate representation and its printer.
//!
//! Synthesizers build [`Expr`] / [`Stmt`] trees instead of formatting strings,
//! and [`Printer`] is the single place where those trees become source text.
//! String literals are always produced through [`quote`], template literal
//! text through [`escape_template_text`].

use crate::generation::sanitizers::{escape_template_text, is_identifier, quote};

const INDENT: &str = "  ";

/// Binary operators the synthesizers need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    StrictNe,
}

impl BinOp {
    fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::StrictNe => "!==",
        }
    }
}

/// One piece of a template literal
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Interp(Expr),
}

/// Object literal key
#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    /// Written bare when it is a valid identifier, quoted otherwise
    Auto(String),
    /// Always quoted
    Quoted(String),
}

/// Object literal property
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    Shorthand(String),
    Pair(PropKey, Expr),
}

/// Object literal with an explicit layout
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLit {
    pub props: Vec<Prop>,
    pub multiline: bool,
}

/// Arrow function
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub is_async: bool,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Number(i64),
    Null,
    Template(Vec<TemplatePart>),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
    New(Box<Expr>, Vec<Expr>),
    Await(Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
    Object(ObjectLit),
    Array(Vec<Expr>),
    Arrow(Arrow),
    AsConst(Box<Expr>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn str(text: impl Into<String>) -> Self {
        Expr::Str(text.into())
    }

    /// `self.name`
    pub fn member(self, name: impl Into<String>) -> Self {
        Expr::Member(Box::new(self), name.into())
    }

    /// `self[index]`
    pub fn index(self, index: Expr) -> Self {
        Expr::Index(Box::new(self), Box::new(index))
    }

    /// `self(args...)`
    pub fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call(Box::new(self), args)
    }

    /// `self.name(args...)`
    pub fn method(self, name: impl Into<String>, args: Vec<Expr>) -> Self {
        self.member(name).call(args)
    }

    pub fn await_(self) -> Self {
        Expr::Await(Box::new(self))
    }

    pub fn binary(self, op: BinOp, rhs: Expr) -> Self {
        Expr::Binary(Box::new(self), op, Box::new(rhs))
    }

    pub fn new_(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::New(Box::new(callee), args)
    }

    pub fn object(props: Vec<Prop>) -> Self {
        Expr::Object(ObjectLit {
            props,
            multiline: false,
        })
    }

    pub fn object_multiline(props: Vec<Prop>) -> Self {
        Expr::Object(ObjectLit {
            props,
            multiline: true,
        })
    }

    pub fn as_const(self) -> Self {
        Expr::AsConst(Box::new(self))
    }

    /// Spans several lines when printed
    fn is_block(&self) -> bool {
        match self {
            Expr::Object(obj) => obj.multiline && !obj.props.is_empty(),
            Expr::Arrow(_) => true,
            _ => false,
        }
    }
}

/// Binding pattern on the left of a `const`
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Ident(String),
    Object(Vec<String>),
}

/// Function parameter with an optional type annotation
#[derive(Debug, Clone, PartialEq)]
pub struct FnParam {
    pub name: String,
    pub ty: Option<String>,
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Const {
        pattern: Pattern,
        ty: Option<String>,
        init: Expr,
    },
    /// Single-statement `if` printed on one line
    If { cond: Expr, then: Box<Stmt> },
    Assign { target: Expr, value: Expr },
    Throw(Expr),
    Return(Expr),
    Expr(Expr),
    Function {
        name: String,
        params: Vec<FnParam>,
        body: Vec<Stmt>,
    },
}

impl Stmt {
    pub fn const_(name: impl Into<String>, init: Expr) -> Self {
        Stmt::Const {
            pattern: Pattern::Ident(name.into()),
            ty: None,
            init,
        }
    }
}

/// Renders IR to TypeScript source text
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start printing at the given indentation depth
    pub fn with_indent(indent: usize) -> Self {
        Self {
            out: String::new(),
            indent,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    /// Print statements, one per line, each ending in a newline
    pub fn print_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.pad();
            self.stmt(stmt);
            self.out.push('\n');
        }
    }

    pub fn print_expr(&mut self, expr: &Expr) {
        self.expr(expr);
    }

    fn pad(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Const { pattern, ty, init } => {
                self.out.push_str("const ");
                match pattern {
                    Pattern::Ident(name) => self.out.push_str(name),
                    Pattern::Object(names) if names.is_empty() => self.out.push_str("{}"),
                    Pattern::Object(names) => {
                        self.out.push_str("{ ");
                        self.out.push_str(&names.join(", "));
                        self.out.push_str(" }");
                    }
                }
                if let Some(ty) = ty {
                    self.out.push_str(": ");
                    self.out.push_str(ty);
                }
                self.out.push_str(" = ");
                self.expr(init);
                self.out.push(';');
            }
            Stmt::If { cond, then } => {
                self.out.push_str("if (");
                self.expr(cond);
                self.out.push_str(") ");
                self.stmt(then);
            }
            Stmt::Assign { target, value } => {
                self.expr(target);
                self.out.push_str(" = ");
                self.expr(value);
                self.out.push(';');
            }
            Stmt::Throw(expr) => {
                self.out.push_str("throw ");
                self.expr(expr);
                self.out.push(';');
            }
            Stmt::Return(expr) => {
                self.out.push_str("return ");
                self.expr(expr);
                self.out.push(';');
            }
            Stmt::Expr(expr) => {
                self.expr(expr);
                self.out.push(';');
            }
            Stmt::Function { name, params, body } => {
                self.out.push_str("function ");
                self.out.push_str(name);
                self.out.push('(');
                let params = params
                    .iter()
                    .map(|p| match &p.ty {
                        Some(ty) => format!("{}: {}", p.name, ty),
                        None => p.name.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                self.out.push_str(&params);
                self.out.push_str(") ");
                self.block(body);
            }
        }
    }

    /// `{`, indented statements, `}` at the current depth
    fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        self.indent += 1;
        self.print_stmts(body);
        self.indent -= 1;
        self.pad();
        self.out.push('}');
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.out.push_str(name),
            Expr::Str(text) => self.out.push_str(&quote(text)),
            Expr::Number(n) => self.out.push_str(&n.to_string()),
            Expr::Null => self.out.push_str("null"),
            Expr::Template(parts) => {
                self.out.push('`');
                for part in parts {
                    match part {
                        TemplatePart::Text(text) => {
                            self.out.push_str(&escape_template_text(text));
                        }
                        TemplatePart::Interp(inner) => {
                            self.out.push_str("${");
                            self.expr(inner);
                            self.out.push('}');
                        }
                    }
                }
                self.out.push('`');
            }
            Expr::Member(object, name) => {
                self.expr(object);
                self.out.push('.');
                self.out.push_str(name);
            }
            Expr::Index(object, index) => {
                self.expr(object);
                self.out.push('[');
                self.expr(index);
                self.out.push(']');
            }
            Expr::Call(callee, args) => {
                self.expr(callee);
                self.args(args);
            }
            Expr::New(callee, args) => {
                self.out.push_str("new ");
                self.expr(callee);
                self.args(args);
            }
            Expr::Await(inner) => {
                self.out.push_str("await ");
                self.expr(inner);
            }
            Expr::Binary(lhs, op, rhs) => {
                self.expr(lhs);
                self.out.push(' ');
                self.out.push_str(op.as_str());
                self.out.push(' ');
                self.expr(rhs);
            }
            Expr::Object(obj) => self.object(obj),
            Expr::Array(items) => {
                if items.iter().any(Expr::is_block) {
                    self.out.push_str("[\n");
                    self.indent += 1;
                    for item in items {
                        self.pad();
                        self.expr(item);
                        self.out.push_str(",\n");
                    }
                    self.indent -= 1;
                    self.pad();
                    self.out.push(']');
                } else {
                    self.out.push('[');
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            self.out.push_str(", ");
                        }
                        self.expr(item);
                    }
                    self.out.push(']');
                }
            }
            Expr::Arrow(arrow) => {
                if arrow.is_async {
                    self.out.push_str("async ");
                }
                self.out.push('(');
                self.out.push_str(&arrow.params.join(", "));
                self.out.push_str(") => ");
                self.block(&arrow.body);
            }
            Expr::AsConst(inner) => {
                self.expr(inner);
                self.out.push_str(" as const");
            }
        }
    }

    /// Arguments stay on one line unless a multi-line argument is followed by another one
    fn args(&mut self, args: &[Expr]) {
        let break_all = args
            .iter()
            .take(args.len().saturating_sub(1))
            .any(Expr::is_block);

        if break_all {
            self.out.push_str("(\n");
            self.indent += 1;
            for (i, arg) in args.iter().enumerate() {
                self.pad();
                self.expr(arg);
                if i + 1 < args.len() {
                    self.out.push(',');
                }
                self.out.push('\n');
            }
            self.indent -= 1;
            self.pad();
            self.out.push(')');
        } else {
            self.out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.expr(arg);
            }
            self.out.push(')');
        }
    }

    fn object(&mut self, obj: &ObjectLit) {
        if obj.props.is_empty() {
            self.out.push_str("{}");
            return;
        }
        if obj.multiline {
            self.out.push_str("{\n");
            self.indent += 1;
            for prop in &obj.props {
                self.pad();
                self.prop(prop);
                self.out.push_str(",\n");
            }
            self.indent -= 1;
            self.pad();
            self.out.push('}');
        } else {
            self.out.push_str("{ ");
            for (i, prop) in obj.props.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.prop(prop);
            }
            self.out.push_str(" }");
        }
    }

    fn prop(&mut self, prop: &Prop) {
        match prop {
            Prop::Shorthand(name) => self.out.push_str(name),
            Prop::Pair(key, value) => {
                match key {
                    PropKey::Auto(name) if is_identifier(name) => self.out.push_str(name),
                    PropKey::Auto(name) | PropKey::Quoted(name) => {
                        self.out.push_str(&quote(name))
                    }
                }
                self.out.push_str(": ");
                self.expr(value);
            }
        }
    }
}

/// Print a single expression at depth zero
pub fn render_expr(expr: &Expr) -> String {
    let mut printer = Printer::new();
    printer.print_expr(expr);
    printer.finish()
}
