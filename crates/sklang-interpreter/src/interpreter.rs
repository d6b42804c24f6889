//! Main interpreter engine and builtins.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, trace};
use sklang_syntax::ast::*;
use sklang_syntax::error::{Error, Result};
use sklang_syntax::stack;
use sklang_syntax::token::Span;
use sklang_typeck::{Builtin, Resolution, TypedProgram};

use crate::env::Env;
use crate::flow::Flow;
use crate::ops;
use crate::value::{Closure, Value};

/// Default limit on nested function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Calls nested deeper than this raise a runtime error.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// One step from a variable to the part of its value being written.
enum Step {
    Field(String),
    Index(usize),
}

/// An assignable location: a variable and a path into its value.
struct Place {
    root: String,
    steps: Vec<Step>,
}

pub struct Interpreter<'p> {
    typed: &'p TypedProgram,
    config: Config,
    globals: Env,
    structs: HashMap<String, Rc<StructDecl>>,
    enums: HashMap<String, Rc<EnumDecl>>,
    /// Rendered `print` arguments, in order
    output: Vec<String>,
    depth: usize,
}

impl<'p> Interpreter<'p> {
    pub fn new(typed: &'p TypedProgram, config: Config) -> Self {
        let mut structs = HashMap::new();
        let mut enums = HashMap::new();
        for item in &typed.program.items {
            match item {
                Item::Struct(s) => {
                    structs.insert(s.name.clone(), Rc::clone(s));
                }
                Item::Enum(e) => {
                    enums.insert(e.name.clone(), Rc::clone(e));
                }
                _ => {}
            }
        }
        Self {
            typed,
            config,
            globals: Env::new_root(),
            structs,
            enums,
            output: Vec::new(),
            depth: 0,
        }
    }

    /// Everything printed so far, including output produced before a runtime error.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn into_output(self) -> Vec<String> {
        self.output
    }

    pub fn globals(&self) -> &Env {
        &self.globals
    }

    /// Runs the program's top-level statements and returns the value of the
    /// last top-level expression statement.
    pub fn run(&mut self) -> Result<Option<Value>> {
        let typed = self.typed;
        for item in &typed.program.items {
            if let Item::Function(f) = item {
                let closure = Closure {
                    function: Rc::clone(f),
                    env: self.globals.clone(),
                };
                self.globals.define(f.name.clone(), Value::Function(Rc::new(closure)));
            }
        }
        debug!(
            "running program: {} structs, {} enums, {} items",
            self.structs.len(),
            self.enums.len(),
            typed.program.items.len()
        );
        let globals = self.globals.clone();
        let mut last = None;
        for item in &typed.program.items {
            let Item::Stmt(stmt) = item else { continue };
            if let StmtKind::Expr(expr) = &stmt.kind {
                last = Some(self.eval_expr(&globals, expr)?);
                continue;
            }
            match self.exec_stmt(&globals, stmt)? {
                Flow::Normal => {}
                Flow::Return(_) => return Err(Error::runtime("'return' outside of function", stmt.span)),
                Flow::Break => return Err(Error::runtime("'break' outside of loop", stmt.span)),
                Flow::Continue => return Err(Error::runtime("'continue' outside of loop", stmt.span)),
            }
        }
        debug!("program finished with {} lines of output", self.output.len());
        Ok(last)
    }

    // === statements ===

    fn exec_block(&mut self, env: &Env, body: &[Stmt]) -> Result<Flow> {
        for s in body {
            match self.exec_stmt(env, s)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, env: &Env, stmt: &Stmt) -> Result<Flow> {
        stack::grow(|| self.exec_stmt_kind(env, stmt))
    }

    fn exec_stmt_kind(&mut self, env: &Env, stmt: &Stmt) -> Result<Flow> {
        match &stmt.kind {
            StmtKind::Var { name, init, .. } => {
                let v = self.eval_expr(env, init)?;
                env.define(name.clone(), v);
                Ok(Flow::Normal)
            }
            StmtKind::Expr(expr) => {
                self.eval_expr(env, expr)?;
                Ok(Flow::Normal)
            }
            StmtKind::If { branches, else_body } => {
                for (cond, body) in branches {
                    if self.eval_bool(env, cond)? {
                        return self.exec_block(&env.child(), body);
                    }
                }
                match else_body {
                    Some(body) => self.exec_block(&env.child(), body),
                    None => Ok(Flow::Normal),
                }
            }
            StmtKind::Switch { subject, arms } => {
                let value = self.eval_expr(env, subject)?;
                for arm in arms {
                    let scope = env.child();
                    let matched = match &arm.pattern {
                        Pattern::Default => true,
                        Pattern::Binding(name) => {
                            scope.define(name.clone(), value.clone());
                            true
                        }
                        Pattern::Literal(lit) => literal_value(lit) == value,
                        Pattern::Variant { enum_name, variant } => {
                            matches!(&value, Value::Enum { enum_name: e, variant: v } if e == enum_name && v == variant)
                        }
                    };
                    if matched {
                        return self.exec_block(&scope, &arm.body);
                    }
                }
                Err(Error::runtime(format!("No switch arm matches the value {}", value), stmt.span))
            }
            StmtKind::For { init, cond, step, body } => {
                let header = env.child();
                self.exec_stmt(&header, init)?;
                while self.eval_bool(&header, cond)? {
                    match self.exec_block(&header.child(), body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                    self.eval_expr(&header, step)?;
                }
                Ok(Flow::Normal)
            }
            StmtKind::While { cond, body } => {
                while self.eval_bool(env, cond)? {
                    match self.exec_block(&env.child(), body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::Return(value) => {
                let v = match value {
                    Some(e) => self.eval_expr(env, e)?,
                    None => Value::Unit,
                };
                Ok(Flow::Return(v))
            }
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
        }
    }

    fn eval_bool(&mut self, env: &Env, expr: &Expr) -> Result<bool> {
        match self.eval_expr(env, expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(Error::runtime(
                format!("Condition must be bool, got {}", other.type_name()),
                expr.span,
            )),
        }
    }

    // === expressions ===

    pub(crate) fn eval_expr(&mut self, env: &Env, expr: &Expr) -> Result<Value> {
        stack::grow(|| self.eval_expr_kind(env, expr))
    }

    fn eval_expr_kind(&mut self, env: &Env, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal_value(lit)),
            ExprKind::Ident(name) => self.lookup(env, name, expr.span),
            ExprKind::Binary { op, lhs, rhs } => match op {
                BinaryOp::And => Ok(Value::Bool(self.eval_bool(env, lhs)? && self.eval_bool(env, rhs)?)),
                BinaryOp::Or => Ok(Value::Bool(self.eval_bool(env, lhs)? || self.eval_bool(env, rhs)?)),
                _ => {
                    let l = self.eval_expr(env, lhs)?;
                    let r = self.eval_expr(env, rhs)?;
                    if op.is_arithmetic() {
                        ops::arithmetic(*op, l, r, expr.span)
                    } else {
                        ops::compare(*op, &l, &r, expr.span)
                    }
                }
            },
            ExprKind::Unary { op, operand } => {
                let v = self.eval_expr(env, operand)?;
                ops::unary(*op, v, expr.span)
            }
            ExprKind::Assign { op, target, value } => {
                let place = self.resolve_place(env, target)?;
                let rhs = self.eval_expr(env, value)?;
                let new_value = match op.binary_op() {
                    Some(bin) => {
                        let current = self.read_place(env, &place, target.span)?;
                        ops::arithmetic(bin, current, rhs, expr.span)?
                    }
                    None => rhs,
                };
                self.write_place(env, &place, new_value.clone(), target.span)?;
                Ok(new_value)
            }
            ExprKind::Call { callee, args } => self.eval_call(env, expr, callee, args),
            ExprKind::Field { object, name } => {
                if let Some(Resolution::EnumVariant { enum_name, index }) = self.typed.resolution(expr.id) {
                    let variant = self
                        .enums
                        .get(enum_name)
                        .and_then(|e| e.variants.get(*index))
                        .cloned()
                        .ok_or_else(|| Error::runtime(format!("Unknown enum '{}'", enum_name), expr.span))?;
                    return Ok(Value::Enum {
                        enum_name: enum_name.clone(),
                        variant,
                    });
                }
                let v = self.eval_expr(env, object)?;
                get_field(&v, name, expr.span)
            }
            ExprKind::Index { object, index } => {
                let v = self.eval_expr(env, object)?;
                let i = self.eval_expr(env, index)?;
                index_value(&v, &i, expr.span)
            }
            ExprKind::Array(elems) => {
                let mut items = Vec::with_capacity(elems.len());
                for e in elems {
                    items.push(self.eval_expr(env, e)?);
                }
                Ok(Value::array(items))
            }
            ExprKind::StructLit { name, fields } => {
                let decl = self
                    .structs
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::runtime(format!("Unknown struct '{}'", name), expr.span))?;
                let mut values = Vec::with_capacity(decl.fields.len());
                for field in &decl.fields {
                    let init = fields.iter().find(|f| f.name == field.name).ok_or_else(|| {
                        Error::runtime(format!("Missing field '{}' in '{}' literal", field.name, name), expr.span)
                    })?;
                    values.push(self.eval_expr(env, &init.value)?);
                }
                Ok(Value::Struct { decl, fields: values })
            }
            ExprKind::Closure(f) => Ok(Value::Function(Rc::new(Closure {
                function: Rc::clone(f),
                env: env.clone(),
            }))),
        }
    }

    fn lookup(&self, env: &Env, name: &str, span: Span) -> Result<Value> {
        env.get(name).ok_or_else(|| {
            Error::runtime(
                format!("Variable '{}' is read before its declaration has run", name),
                span,
            )
        })
    }

    // === places ===

    fn resolve_place(&mut self, env: &Env, expr: &Expr) -> Result<Place> {
        match &expr.kind {
            ExprKind::Ident(name) => Ok(Place {
                root: name.clone(),
                steps: Vec::new(),
            }),
            ExprKind::Field { object, name } => {
                let mut place = self.resolve_place(env, object)?;
                place.steps.push(Step::Field(name.clone()));
                Ok(place)
            }
            ExprKind::Index { object, index } => {
                let mut place = self.resolve_place(env, object)?;
                let i = match self.eval_expr(env, index)? {
                    Value::Int(i) if i >= 0 => i as usize,
                    Value::Int(i) => {
                        return Err(Error::runtime(format!("Index {} out of bounds", i), index.span));
                    }
                    other => {
                        return Err(Error::runtime(
                            format!("Index must be int, got {}", other.type_name()),
                            index.span,
                        ))
                    }
                };
                place.steps.push(Step::Index(i));
                Ok(place)
            }
            _ => Err(Error::runtime("Invalid assignment target", expr.span)),
        }
    }

    fn read_place(&self, env: &Env, place: &Place, span: Span) -> Result<Value> {
        let mut value = self.lookup(env, &place.root, span)?;
        for step in &place.steps {
            value = match step {
                Step::Field(name) => get_field(&value, name, span)?,
                Step::Index(i) => index_value(&value, &Value::Int(*i as i64), span)?,
            };
        }
        Ok(value)
    }

    fn write_place(&self, env: &Env, place: &Place, value: Value, span: Span) -> Result<()> {
        let updated = if place.steps.is_empty() {
            value
        } else {
            let current = self.lookup(env, &place.root, span)?;
            update(current, &place.steps, value, span)?
        };
        if env.assign(&place.root, updated) {
            Ok(())
        } else {
            Err(Error::runtime(format!("Assignment to undefined variable '{}'", place.root), span))
        }
    }

    // === calls ===

    fn eval_args(&mut self, env: &Env, args: &[Expr]) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for a in args {
            values.push(self.eval_expr(env, a)?);
        }
        Ok(values)
    }

    fn eval_call(&mut self, env: &Env, call: &Expr, callee: &Expr, args: &[Expr]) -> Result<Value> {
        let typed = self.typed;
        match typed.resolution(call.id) {
            Some(Resolution::Builtin(builtin)) => {
                let values = self.eval_args(env, args)?;
                self.call_builtin(*builtin, values, call.span)
            }
            Some(Resolution::StaticMethod { strukt }) => {
                let ExprKind::Field { name, .. } = &callee.kind else {
                    return Err(Error::runtime("Malformed static method call", call.span));
                };
                let function = self.method(strukt, name, call.span)?;
                let values = self.eval_args(env, args)?;
                let globals = self.globals.clone();
                let (ret, _) = self.call_function(&function, &globals, None, values, call.span)?;
                Ok(ret)
            }
            Some(Resolution::InstanceMethod { strukt }) => {
                let ExprKind::Field { object, name } = &callee.kind else {
                    return Err(Error::runtime("Malformed method call", call.span));
                };
                let function = self.method(strukt, name, call.span)?;
                let place = if is_place(object) {
                    Some(self.resolve_place(env, object)?)
                } else {
                    None
                };
                let receiver = match &place {
                    Some(p) => self.read_place(env, p, object.span)?,
                    None => self.eval_expr(env, object)?,
                };
                let values = self.eval_args(env, args)?;
                let globals = self.globals.clone();
                let (ret, this) = self.call_function(&function, &globals, Some(receiver), values, call.span)?;
                if let (Some(place), Some(this)) = (place, this) {
                    self.write_place(env, &place, this, object.span)?;
                }
                Ok(ret)
            }
            Some(Resolution::EnumVariant { .. }) | None => {
                let closure = match self.eval_expr(env, callee)? {
                    Value::Function(closure) => closure,
                    other => {
                        return Err(Error::runtime(
                            format!("Cannot call a value of type {}", other.type_name()),
                            callee.span,
                        ))
                    }
                };
                let values = self.eval_args(env, args)?;
                let (ret, _) = self.call_function(&closure.function, &closure.env, None, values, call.span)?;
                Ok(ret)
            }
        }
    }

    fn method(&self, strukt: &str, name: &str, span: Span) -> Result<Rc<Function>> {
        self.structs
            .get(strukt)
            .and_then(|decl| decl.method(name))
            .map(|m| Rc::clone(&m.function))
            .ok_or_else(|| Error::runtime(format!("Struct '{}' has no method '{}'", strukt, name), span))
    }

    /// Calls `function` in a fresh scope under `captured`. Returns the result
    /// and, for instance methods, the final value of `self`.
    fn call_function(
        &mut self,
        function: &Function,
        captured: &Env,
        this: Option<Value>,
        args: Vec<Value>,
        span: Span,
    ) -> Result<(Value, Option<Value>)> {
        if self.depth >= self.config.max_call_depth {
            return Err(Error::runtime(
                format!("Maximum call depth of {} exceeded", self.config.max_call_depth),
                span,
            ));
        }
        if function.params.len() != args.len() {
            return Err(Error::runtime(
                format!(
                    "Function '{}' expects {} arguments, found {}",
                    function.name,
                    function.params.len(),
                    args.len()
                ),
                span,
            ));
        }
        trace!("call {} (depth {})", function.name, self.depth + 1);
        let scope = captured.child();
        let has_self = this.is_some();
        if let Some(this) = this {
            scope.define("self", this);
        }
        for (param, arg) in function.params.iter().zip(args) {
            scope.define(param.name.clone(), arg);
        }
        self.depth += 1;
        let flow = self.exec_block(&scope, &function.body);
        self.depth -= 1;
        let ret = match flow? {
            Flow::Return(v) => v,
            _ => Value::Unit,
        };
        let this = if has_self { scope.get("self") } else { None };
        Ok((ret, this))
    }

    fn call_builtin(&mut self, builtin: Builtin, args: Vec<Value>, span: Span) -> Result<Value> {
        let mut args = args.into_iter();
        let mut next = || {
            args.next()
                .ok_or_else(|| Error::runtime(format!("Missing argument to '{}'", builtin.name()), span))
        };
        match builtin {
            Builtin::Print => {
                let v = next()?;
                self.output.push(v.to_string());
                Ok(Value::Unit)
            }
            Builtin::Len => match next()? {
                Value::Array(items) => Ok(Value::Int(items.borrow().len() as i64)),
                Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                other => Err(Error::runtime(
                    format!("len() expects an array or a string, got {}", other.type_name()),
                    span,
                )),
            },
            Builtin::Push => {
                let target = next()?;
                let value = next()?;
                match target {
                    Value::Array(items) => {
                        items.borrow_mut().push(value);
                        Ok(Value::Unit)
                    }
                    other => Err(Error::runtime(
                        format!("push() expects an array, got {}", other.type_name()),
                        span,
                    )),
                }
            }
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Int(n) => Value::Int(*n),
        Literal::UInt(n) => Value::UInt(*n),
        Literal::Float(x) => Value::Float(*x),
        Literal::Char(c) => Value::Char(*c),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
    }
}

/// Whether `expr` names a location rooted at a variable.
fn is_place(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Ident(_) => true,
        ExprKind::Field { object, .. } | ExprKind::Index { object, .. } => is_place(object),
        _ => false,
    }
}

fn get_field(value: &Value, name: &str, span: Span) -> Result<Value> {
    value.field(name).cloned().ok_or_else(|| {
        Error::runtime(
            format!("Value of type {} has no field '{}'", value.type_name(), name),
            span,
        )
    })
}

fn out_of_bounds(index: i64, len: usize, span: Span) -> Error {
    Error::runtime(
        format!("Index {} out of bounds for length {}", index, len),
        span,
    )
}

fn index_value(value: &Value, index: &Value, span: Span) -> Result<Value> {
    let Value::Int(i) = *index else {
        return Err(Error::runtime(
            format!("Index must be int, got {}", index.type_name()),
            span,
        ));
    };
    match value {
        Value::Array(items) => {
            let items = items.borrow();
            usize::try_from(i)
                .ok()
                .and_then(|u| items.get(u).cloned())
                .ok_or_else(|| out_of_bounds(i, items.len(), span))
        }
        Value::Str(s) => usize::try_from(i)
            .ok()
            .and_then(|u| s.chars().nth(u))
            .map(Value::Char)
            .ok_or_else(|| out_of_bounds(i, s.chars().count(), span)),
        other => Err(Error::runtime(
            format!("Cannot index into a value of type {}", other.type_name()),
            span,
        )),
    }
}

/// Returns `container` with the part at `steps` replaced by `value`.
/// Arrays are updated in place; structs are rebuilt.
fn update(container: Value, steps: &[Step], value: Value, span: Span) -> Result<Value> {
    let Some((step, rest)) = steps.split_first() else {
        return Ok(value);
    };
    match (step, container) {
        (Step::Field(name), Value::Struct { decl, mut fields }) => {
            let i = decl.field_index(name).ok_or_else(|| {
                Error::runtime(format!("Struct '{}' has no field '{}'", decl.name, name), span)
            })?;
            let old = std::mem::replace(&mut fields[i], Value::Unit);
            fields[i] = update(old, rest, value, span)?;
            Ok(Value::Struct { decl, fields })
        }
        (Step::Index(i), Value::Array(items)) => {
            let len = items.borrow().len();
            if *i >= len {
                return Err(out_of_bounds(*i as i64, len, span));
            }
            let old = items.borrow()[*i].clone();
            let new = update(old, rest, value, span)?;
            items.borrow_mut()[*i] = new;
            Ok(Value::Array(items))
        }
        (Step::Field(name), other) => Err(Error::runtime(
            format!("Value of type {} has no field '{}'", other.type_name(), name),
            span,
        )),
        (Step::Index(_), other) => Err(Error::runtime(
            format!("Cannot assign into a value of type {}", other.type_name()),
            span,
        )),
    }
}
