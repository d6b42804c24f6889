//! Canonical pretty printer for SkLang programs.
//!
//! Output uses 4-space indentation, wraps every nested compound expression in
//! parentheses and always prints floats with a decimal point, so parsing the
//! printed text yields a program structurally equal to the input.

use sklang_syntax::ast::*;

const INDENT: &str = "    ";

/// Formats a whole program.
pub fn format_program(program: &Program) -> String {
    let mut p = Printer::default();
    for (i, item) in program.items.iter().enumerate() {
        let is_decl = !matches!(item, Item::Stmt(_));
        let prev_decl = i > 0 && !matches!(program.items[i - 1], Item::Stmt(_));
        if i > 0 && (is_decl || prev_decl) {
            p.out.push('\n');
        }
        p.item(item);
    }
    p.out
}

/// Formats a single expression.
pub fn format_expr(expr: &Expr) -> String {
    Printer::default().expr(expr)
}

pub fn format_type(ty: &TypeExpr) -> String {
    match &ty.kind {
        TypeExprKind::Named(name) => name.clone(),
        TypeExprKind::Array(elem) => format!("[{}]", format_type(elem)),
        TypeExprKind::Function { params, ret } => {
            let params: Vec<String> = params.iter().map(format_type).collect();
            match ret {
                Some(r) => format!("fn({}) -> {}", params.join(", "), format_type(r)),
                None => format!("fn({})", params.join(", ")),
            }
        }
    }
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn pad(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn item(&mut self, item: &Item) {
        match item {
            Item::Function(f) => {
                self.function(f, None);
                self.out.push('\n');
            }
            Item::Struct(s) => self.struct_decl(s),
            Item::Enum(e) => {
                self.out.push_str(&format!("enum {} {{ {} }}\n", e.name, e.variants.join(", ")));
            }
            Item::Stmt(s) => self.stmt(s),
        }
    }

    /// Writes `fn name(params) -> ret { body }` without a trailing newline.
    fn function(&mut self, f: &Function, receiver: Option<Receiver>) {
        self.out.push_str("fn ");
        if f.name != "<closure>" {
            self.out.push_str(&f.name);
        }
        self.out.push('(');
        let mut params: Vec<String> = Vec::new();
        if receiver == Some(Receiver::Instance) {
            params.push("self".into());
        }
        params.extend(f.params.iter().map(|p| format!("{}: {}", p.name, format_type(&p.ty))));
        self.out.push_str(&params.join(", "));
        self.out.push(')');
        if let Some(ret) = &f.ret {
            self.out.push_str(" -> ");
            self.out.push_str(&format_type(ret));
        }
        self.out.push(' ');
        self.block(&f.body);
    }

    fn struct_decl(&mut self, s: &StructDecl) {
        self.out.push_str(&format!("struct {} {{\n", s.name));
        self.indent += 1;
        for field in &s.fields {
            self.pad();
            self.out.push_str(&format!("{}: {},\n", field.name, format_type(&field.ty)));
        }
        for method in &s.methods {
            self.pad();
            self.function(&method.function, Some(method.receiver));
            self.out.push('\n');
        }
        self.indent -= 1;
        self.out.push_str("}\n");
    }

    /// Writes `{`, the indented statements and the closing `}`.
    fn block(&mut self, body: &[Stmt]) {
        self.out.push_str("{\n");
        self.indent += 1;
        for s in body {
            self.stmt(s);
        }
        self.indent -= 1;
        self.pad();
        self.out.push('}');
    }

    fn stmt(&mut self, s: &Stmt) {
        self.pad();
        self.stmt_inline(s);
        self.out.push('\n');
    }

    /// A statement without leading indentation or trailing newline.
    fn stmt_inline(&mut self, s: &Stmt) {
        match &s.kind {
            StmtKind::Var { name, ty, init } => {
                let init = self.expr(init);
                match ty {
                    Some(t) => self.out.push_str(&format!("var {}: {} = {};", name, format_type(t), init)),
                    None => self.out.push_str(&format!("var {} = {};", name, init)),
                }
            }
            StmtKind::Expr(e) => {
                let e = self.expr(e);
                self.out.push_str(&e);
                self.out.push(';');
            }
            StmtKind::If { branches, else_body } => {
                for (i, (cond, body)) in branches.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(" else ");
                    }
                    let cond = self.expr(cond);
                    self.out.push_str(&format!("if ({}) ", cond));
                    self.block(body);
                }
                if let Some(body) = else_body {
                    self.out.push_str(" else ");
                    self.block(body);
                }
            }
            StmtKind::Switch { subject, arms } => {
                let subject = self.expr(subject);
                self.out.push_str(&format!("switch ({}) {{\n", subject));
                self.indent += 1;
                for arm in arms {
                    self.pad();
                    self.out.push_str(&format_pattern(&arm.pattern));
                    self.out.push_str(" -> ");
                    self.block(&arm.body);
                    self.out.push('\n');
                }
                self.indent -= 1;
                self.pad();
                self.out.push('}');
            }
            StmtKind::For { init, cond, step, body } => {
                self.out.push_str("for (");
                self.stmt_inline(init);
                let cond = self.expr(cond);
                let step = self.expr(step);
                self.out.push_str(&format!(" {}; {}) ", cond, step));
                self.block(body);
            }
            StmtKind::While { cond, body } => {
                let cond = self.expr(cond);
                self.out.push_str(&format!("while ({}) ", cond));
                self.block(body);
            }
            StmtKind::Return(value) => match value {
                Some(v) => {
                    let v = self.expr(v);
                    self.out.push_str(&format!("return {};", v));
                }
                None => self.out.push_str("return;"),
            },
            StmtKind::Break => self.out.push_str("break;"),
            StmtKind::Continue => self.out.push_str("continue;"),
        }
    }

    fn expr(&self, e: &Expr) -> String {
        match &e.kind {
            ExprKind::Literal(lit) => format_literal(lit),
            ExprKind::Ident(name) => name.clone(),
            ExprKind::Binary { op, lhs, rhs } => {
                format!("{} {} {}", self.operand(lhs), op.symbol(), self.operand(rhs))
            }
            ExprKind::Unary { op, operand } => format!("{}{}", op.symbol(), self.operand(operand)),
            ExprKind::Assign { op, target, value } => {
                format!("{} {} {}", self.expr(target), op.symbol(), self.expr(value))
            }
            ExprKind::Call { callee, args } => {
                let args: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
                format!("{}({})", self.operand(callee), args.join(", "))
            }
            ExprKind::Field { object, name } => format!("{}.{}", self.operand(object), name),
            ExprKind::Index { object, index } => format!("{}[{}]", self.operand(object), self.expr(index)),
            ExprKind::Array(elems) => {
                let elems: Vec<String> = elems.iter().map(|a| self.expr(a)).collect();
                format!("[{}]", elems.join(", "))
            }
            ExprKind::StructLit { name, fields } => {
                if fields.is_empty() {
                    return format!("{} {{ }}", name);
                }
                let fields: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{}: {}", f.name, self.expr(&f.value)))
                    .collect();
                format!("{} {{ {} }}", name, fields.join(", "))
            }
            ExprKind::Closure(f) => {
                let mut inner = Printer {
                    out: String::new(),
                    indent: self.indent,
                };
                inner.function(f, None);
                inner.out
            }
        }
    }

    /// An operand of an operator or postfix form; compound expressions are
    /// parenthesized.
    fn operand(&self, e: &Expr) -> String {
        let compound = matches!(
            e.kind,
            ExprKind::Binary { .. } | ExprKind::Unary { .. } | ExprKind::Assign { .. } | ExprKind::Closure(_)
        );
        if compound {
            format!("({})", self.expr(e))
        } else {
            self.expr(e)
        }
    }
}

fn format_literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(n) => n.to_string(),
        Literal::UInt(n) => format!("{}u", n),
        Literal::Float(x) => {
            let s = x.to_string();
            if s.contains('.') {
                s
            } else {
                format!("{}.0", s)
            }
        }
        Literal::Char(c) => format!("'{}'", escape(*c, '\'')),
        Literal::Str(s) => format!("\"{}\"", s.chars().map(|c| escape(c, '"')).collect::<String>()),
        Literal::Bool(b) => b.to_string(),
    }
}

fn escape(c: char, quote: char) -> String {
    match c {
        '\n' => "\\n".into(),
        '\t' => "\\t".into(),
        '\r' => "\\r".into(),
        '\0' => "\\0".into(),
        '\\' => "\\\\".into(),
        c if c == quote => format!("\\{}", c),
        c => c.to_string(),
    }
}

fn format_pattern(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Literal(lit) => format_literal(lit),
        Pattern::Binding(name) => name.clone(),
        Pattern::Variant { enum_name, variant } => format!("{}.{}", enum_name, variant),
        Pattern::Default => "default".into(),
    }
}
