//! Two-pass static checker.
//!
//! Pass one collects struct, enum and function signatures so declarations may
//! refer to each other regardless of order. Pass two walks the items in
//! source order, resolves the type of every expression and validates every
//! statement. Errors are collected rather than returned at the first one; an
//! expression whose error was already reported gets [`Type::Error`], which is
//! accepted everywhere so one mistake produces one diagnostic.

use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use sklang_syntax::ast::*;
use sklang_syntax::error::Error;
use sklang_syntax::stack;
use sklang_syntax::token::Span;
use sklang_syntax::types::Type;

use crate::results::{Builtin, Resolution, TypedProgram};
use crate::scope::{BindingKind, Scopes};

struct MethodSig {
    receiver: Receiver,
    params: Vec<Type>,
    ret: Type,
}

impl MethodSig {
    fn fn_type(&self) -> Type {
        Type::Function(self.params.clone(), Box::new(self.ret.clone()))
    }
}

struct StructInfo {
    fields: Vec<(String, Type)>,
    methods: HashMap<String, MethodSig>,
}

impl StructInfo {
    fn field(&self, name: &str) -> Option<&Type> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

/// Per-function checking context.
struct FnCtx {
    /// `None` at the top level, where `return` is not allowed.
    ret: Option<Type>,
    loops: usize,
}

pub struct TypeChecker {
    structs: HashMap<String, StructInfo>,
    enums: HashMap<String, Rc<EnumDecl>>,
    functions: HashMap<String, (Vec<Type>, Type)>,
    scopes: Scopes,
    ctx: FnCtx,
    types: HashMap<ExprId, Type>,
    resolutions: HashMap<ExprId, Resolution>,
    errors: Vec<Error>,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        Self {
            structs: HashMap::new(),
            enums: HashMap::new(),
            functions: HashMap::new(),
            scopes: Scopes::new(),
            ctx: FnCtx { ret: None, loops: 0 },
            types: HashMap::new(),
            resolutions: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Checks a whole program, returning it with its annotations or every
    /// error found.
    pub fn check_program(mut self, program: Program) -> Result<TypedProgram, Vec<Error>> {
        self.collect_signatures(&program);
        for item in &program.items {
            match item {
                Item::Function(f) => self.check_top_level_fn(f),
                Item::Struct(s) => self.check_methods(s),
                Item::Enum(_) => {}
                Item::Stmt(stmt) => self.check_stmt(stmt),
            }
        }
        debug!(
            "type checked {} items: {} expressions annotated, {} errors",
            program.items.len(),
            self.types.len(),
            self.errors.len()
        );
        if self.errors.is_empty() {
            Ok(TypedProgram {
                program,
                types: self.types,
                resolutions: self.resolutions,
            })
        } else {
            Err(self.errors)
        }
    }

    fn error(&mut self, span: Span, msg: impl Into<String>) {
        self.errors.push(Error::type_error(msg, span));
    }

    fn mismatch(&mut self, span: Span, context: &str, expected: &Type, found: &Type) {
        self.error(
            span,
            format!("Type mismatch in {}: expected {}, found {}", context, expected, found),
        );
    }

    // === pass one ===

    fn collect_signatures(&mut self, program: &Program) {
        // Names first, so field and parameter types can mention any declared type.
        let mut struct_decls = Vec::new();
        for item in &program.items {
            match item {
                Item::Struct(s) => {
                    if self.is_type_name(&s.name) || Type::primitive(&s.name).is_some() {
                        self.error(s.span, format!("Type '{}' is already declared", s.name));
                        continue;
                    }
                    self.structs.insert(
                        s.name.clone(),
                        StructInfo {
                            fields: Vec::new(),
                            methods: HashMap::new(),
                        },
                    );
                    struct_decls.push(Rc::clone(s));
                }
                Item::Enum(e) => {
                    if self.is_type_name(&e.name) || Type::primitive(&e.name).is_some() {
                        self.error(e.span, format!("Type '{}' is already declared", e.name));
                        continue;
                    }
                    let mut seen = Vec::new();
                    for v in &e.variants {
                        if seen.contains(&v) {
                            self.error(e.span, format!("Variant '{}' is declared twice in enum '{}'", v, e.name));
                        }
                        seen.push(v);
                    }
                    self.enums.insert(e.name.clone(), Rc::clone(e));
                }
                _ => {}
            }
        }

        for s in struct_decls {
            let mut fields: Vec<(String, Type)> = Vec::new();
            for field in &s.fields {
                let ty = self.resolve_type(&field.ty);
                if fields.iter().any(|(n, _)| n == &field.name) {
                    self.error(field.span, format!("Field '{}' is declared twice in struct '{}'", field.name, s.name));
                    continue;
                }
                fields.push((field.name.clone(), ty));
            }
            let mut methods = HashMap::new();
            for method in &s.methods {
                let (params, ret) = self.resolve_signature(&method.function);
                if methods.contains_key(&method.function.name) {
                    self.error(
                        method.function.span,
                        format!("Method '{}' is declared twice in struct '{}'", method.function.name, s.name),
                    );
                    continue;
                }
                methods.insert(
                    method.function.name.clone(),
                    MethodSig {
                        receiver: method.receiver,
                        params,
                        ret,
                    },
                );
            }
            if let Some(info) = self.structs.get_mut(&s.name) {
                info.fields = fields;
                info.methods = methods;
            }
        }

        for item in &program.items {
            if let Item::Function(f) = item {
                let (params, ret) = self.resolve_signature(f);
                if Builtin::from_name(&f.name).is_some() {
                    self.error(f.span, format!("'{}' is a builtin function and cannot be redefined", f.name));
                    continue;
                }
                let ty = Type::Function(params.clone(), Box::new(ret.clone()));
                if !self.scopes.define(&f.name, ty, BindingKind::Function) {
                    self.error(f.span, format!("Function '{}' is already declared", f.name));
                    continue;
                }
                self.functions.insert(f.name.clone(), (params, ret));
            }
        }
        debug!(
            "collected signatures: {} structs, {} enums, {} functions",
            self.structs.len(),
            self.enums.len(),
            self.functions.len()
        );
    }

    fn is_type_name(&self, name: &str) -> bool {
        self.structs.contains_key(name) || self.enums.contains_key(name)
    }

    fn resolve_signature(&mut self, f: &Function) -> (Vec<Type>, Type) {
        let params = f.params.iter().map(|p| self.resolve_type(&p.ty)).collect();
        let ret = match &f.ret {
            Some(t) => self.resolve_type(t),
            None => Type::Unit,
        };
        (params, ret)
    }

    fn resolve_type(&mut self, ty: &TypeExpr) -> Type {
        match &ty.kind {
            TypeExprKind::Named(name) => {
                if let Some(prim) = Type::primitive(name) {
                    prim
                } else if self.structs.contains_key(name) {
                    Type::Struct(name.clone())
                } else if self.enums.contains_key(name) {
                    Type::Enum(name.clone())
                } else {
                    self.error(ty.span, format!("Unknown type '{}'", name));
                    Type::Error
                }
            }
            TypeExprKind::Array(elem) => Type::Array(Box::new(self.resolve_type(elem))),
            TypeExprKind::Function { params, ret } => {
                let params = params.iter().map(|p| self.resolve_type(p)).collect();
                let ret = match ret {
                    Some(r) => self.resolve_type(r),
                    None => Type::Unit,
                };
                Type::Function(params, Box::new(ret))
            }
        }
    }

    // === functions ===

    fn check_top_level_fn(&mut self, f: &Function) {
        let Some((params, ret)) = self.functions.get(&f.name).cloned() else {
            // Signature was rejected in pass one.
            return;
        };
        self.check_function_body(f, None, &params, &ret);
    }

    fn check_methods(&mut self, s: &StructDecl) {
        for method in &s.methods {
            let sig = self
                .structs
                .get(&s.name)
                .and_then(|info| info.methods.get(&method.function.name))
                .map(|m| (m.params.clone(), m.ret.clone()));
            let Some((params, ret)) = sig else { continue };
            let self_ty = match method.receiver {
                Receiver::Instance => Some(Type::Struct(s.name.clone())),
                Receiver::Static => None,
            };
            self.check_function_body(&method.function, self_ty, &params, &ret);
        }
    }

    fn check_function_body(&mut self, f: &Function, self_ty: Option<Type>, params: &[Type], ret: &Type) {
        self.scopes.push();
        if let Some(ty) = self_ty {
            self.scopes.define("self", ty, BindingKind::Variable);
        }
        for (param, ty) in f.params.iter().zip(params) {
            if !self.scopes.define(&param.name, ty.clone(), BindingKind::Variable) {
                self.error(param.span, format!("Parameter '{}' is declared twice", param.name));
            }
        }
        let outer = std::mem::replace(
            &mut self.ctx,
            FnCtx {
                ret: Some(ret.clone()),
                loops: 0,
            },
        );
        for stmt in &f.body {
            self.check_stmt(stmt);
        }
        self.ctx = outer;
        self.scopes.pop();
        if *ret != Type::Unit && !ret.is_error() && !block_returns(&f.body) {
            self.error(
                f.span,
                format!("Function '{}' must return a value of type {} on every path", f.name, ret),
            );
        }
    }

    // === statements ===

    fn check_block(&mut self, stmts: &[Stmt]) {
        self.scopes.push();
        for stmt in stmts {
            stack::grow(|| self.check_stmt(stmt));
        }
        self.scopes.pop();
    }

    fn check_loop_body(&mut self, stmts: &[Stmt]) {
        self.ctx.loops += 1;
        self.check_block(stmts);
        self.ctx.loops -= 1;
    }

    fn declare_var(&mut self, name: &str, ty: Type, span: Span) {
        if !self.scopes.define(name, ty, BindingKind::Variable) {
            self.error(span, format!("'{}' is already declared in this scope", name));
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Var { name, ty, init } => {
                let ty = match ty {
                    Some(annotation) => {
                        let declared = self.resolve_type(annotation);
                        self.expect_type(init, &declared, &format!("declaration of '{}'", name));
                        declared
                    }
                    None => self.check_expr(init, None),
                };
                if ty == Type::Unit {
                    self.error(init.span, format!("Variable '{}' cannot hold a value of type unit", name));
                }
                self.declare_var(name, ty, stmt.span);
            }
            StmtKind::Expr(expr) => {
                self.check_expr(expr, None);
            }
            StmtKind::If { branches, else_body } => {
                for (cond, body) in branches {
                    self.expect_type(cond, &Type::Bool, "if condition");
                    self.check_block(body);
                }
                if let Some(body) = else_body {
                    self.check_block(body);
                }
            }
            StmtKind::Switch { subject, arms } => {
                let subject_ty = self.check_expr(subject, None);
                for arm in arms {
                    self.scopes.push();
                    self.check_pattern(&arm.pattern, &subject_ty, arm.span);
                    for stmt in &arm.body {
                        self.check_stmt(stmt);
                    }
                    self.scopes.pop();
                }
            }
            StmtKind::For { init, cond, step, body } => {
                self.scopes.push();
                self.check_stmt(init);
                self.expect_type(cond, &Type::Bool, "for condition");
                self.check_expr(step, None);
                self.check_loop_body(body);
                self.scopes.pop();
            }
            StmtKind::While { cond, body } => {
                self.expect_type(cond, &Type::Bool, "while condition");
                self.check_loop_body(body);
            }
            StmtKind::Return(value) => {
                let Some(ret) = self.ctx.ret.clone() else {
                    self.error(stmt.span, "'return' outside of function");
                    if let Some(v) = value {
                        self.check_expr(v, None);
                    }
                    return;
                };
                match value {
                    Some(v) => self.expect_type(v, &ret, "return value"),
                    None if ret != Type::Unit && !ret.is_error() => {
                        self.error(stmt.span, format!("Missing return value: expected {}", ret))
                    }
                    None => {}
                }
            }
            StmtKind::Break | StmtKind::Continue => {
                if self.ctx.loops == 0 {
                    let word = if matches!(stmt.kind, StmtKind::Break) { "break" } else { "continue" };
                    self.error(stmt.span, format!("'{}' outside of loop", word));
                }
            }
        }
    }

    fn check_pattern(&mut self, pattern: &Pattern, subject: &Type, span: Span) {
        match pattern {
            Pattern::Default => {}
            Pattern::Binding(name) => self.declare_var(name, subject.clone(), span),
            Pattern::Literal(lit) => {
                let ty = literal_type(lit);
                if !subject.is_error() && (!subject.is_equatable() || ty != *subject) {
                    self.error(
                        span,
                        format!("Switch pattern of type {} cannot match a subject of type {}", ty, subject),
                    );
                }
            }
            Pattern::Variant { enum_name, variant } => {
                let Some(decl) = self.enums.get(enum_name).cloned() else {
                    self.error(span, format!("Unknown enum '{}'", enum_name));
                    return;
                };
                if !decl.variants.contains(variant) {
                    self.error(span, format!("Enum '{}' has no variant '{}'", enum_name, variant));
                }
                let ty = Type::Enum(enum_name.clone());
                if !subject.accepts(&ty) {
                    self.error(
                        span,
                        format!("Switch pattern of type {} cannot match a subject of type {}", ty, subject),
                    );
                }
            }
        }
    }

    // === expressions ===

    fn expect_type(&mut self, expr: &Expr, expected: &Type, context: &str) {
        let found = self.check_expr(expr, Some(expected));
        if !expected.accepts(&found) {
            self.mismatch(expr.span, context, expected, &found);
        }
    }

    /// Resolves and records the type of `expr`. `expected` is only a hint
    /// (used for empty array literals); callers compare the result.
    fn check_expr(&mut self, expr: &Expr, expected: Option<&Type>) -> Type {
        let ty = stack::grow(|| self.infer_expr(expr, expected));
        self.types.insert(expr.id, ty.clone());
        ty
    }

    fn infer_expr(&mut self, expr: &Expr, expected: Option<&Type>) -> Type {
        match &expr.kind {
            ExprKind::Literal(lit) => literal_type(lit),
            ExprKind::Ident(name) => self.check_ident(name, expr.span),
            ExprKind::Binary { op, lhs, rhs } => self.check_binary(*op, lhs, rhs, expr.span),
            ExprKind::Unary { op, operand } => {
                let ty = self.check_expr(operand, None);
                match (op, &ty) {
                    (_, Type::Error) => Type::Error,
                    (UnaryOp::Neg, Type::Int | Type::Float) | (UnaryOp::Not, Type::Bool) => ty.clone(),
                    _ => {
                        self.error(
                            expr.span,
                            format!("Operator '{}' cannot be applied to a value of type {}", op.symbol(), ty),
                        );
                        Type::Error
                    }
                }
            }
            ExprKind::Assign { op, target, value } => self.check_assign(*op, target, value),
            ExprKind::Call { callee, args } => self.check_call(expr, callee, args),
            ExprKind::Field { object, name } => self.check_field(expr, object, name),
            ExprKind::Index { object, index } => {
                let object_ty = self.check_expr(object, None);
                self.expect_type(index, &Type::Int, "index");
                match object_ty {
                    Type::Array(elem) => *elem,
                    Type::String => Type::Char,
                    Type::Error => Type::Error,
                    other => {
                        self.error(object.span, format!("Cannot index into a value of type {}", other));
                        Type::Error
                    }
                }
            }
            ExprKind::Array(elems) => self.check_array(elems, expected, expr.span),
            ExprKind::StructLit { name, fields } => self.check_struct_literal(name, fields, expr.span),
            ExprKind::Closure(f) => {
                let (params, ret) = self.resolve_signature(f);
                self.check_function_body(f, None, &params, &ret);
                Type::Function(params, Box::new(ret))
            }
        }
    }

    fn check_ident(&mut self, name: &str, span: Span) -> Type {
        if let Some(binding) = self.scopes.lookup(name) {
            return binding.ty.clone();
        }
        if Builtin::from_name(name).is_some() {
            self.error(span, format!("Builtin '{}' can only be called directly", name));
        } else if self.is_type_name(name) {
            self.error(span, format!("'{}' is a type, not a value", name));
        } else {
            self.error(span, format!("Undefined variable '{}'", name));
        }
        Type::Error
    }

    /// Identifier naming a type and not shadowed by a variable.
    fn as_type_name<'e>(&self, expr: &'e Expr) -> Option<&'e str> {
        match &expr.kind {
            ExprKind::Ident(name) if self.scopes.lookup(name).is_none() && self.is_type_name(name) => {
                Some(name.as_str())
            }
            _ => None,
        }
    }

    fn check_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr, span: Span) -> Type {
        if op.is_logical() {
            self.expect_type(lhs, &Type::Bool, &format!("left operand of '{}'", op));
            self.expect_type(rhs, &Type::Bool, &format!("right operand of '{}'", op));
            return Type::Bool;
        }
        let l = self.check_expr(lhs, None);
        let r = self.check_expr(rhs, None);
        if l.is_error() || r.is_error() {
            return if op.is_arithmetic() { Type::Error } else { Type::Bool };
        }
        let same = l == r;
        if op.is_arithmetic() {
            if same && (l.is_numeric() || (op == BinaryOp::Add && l == Type::String)) {
                return l;
            }
            self.error(
                span,
                format!(
                    "Operator '{}' expects two operands of the same numeric type, found {} and {}",
                    op, l, r
                ),
            );
            return Type::Error;
        }
        let ok = if op.is_relational() { l.is_ordered() } else { l.is_equatable() };
        if !(same && ok) {
            self.error(span, format!("Cannot compare {} and {} with '{}'", l, r, op));
        }
        Type::Bool
    }

    /// Type of an assignable expression; reports non-places.
    fn check_place(&mut self, target: &Expr) -> Type {
        let ty = match &target.kind {
            ExprKind::Ident(name) => match self.scopes.lookup(name) {
                Some(b) if b.kind == BindingKind::Function => {
                    self.error(target.span, format!("Cannot assign to function '{}'", name));
                    Type::Error
                }
                _ => self.check_ident(name, target.span),
            },
            ExprKind::Field { object, name } => {
                if self.as_type_name(object).is_some() {
                    self.error(target.span, "Cannot assign to a type member");
                    Type::Error
                } else {
                    let object_ty = self.check_place(object);
                    self.field_of(&object_ty, name, target.span)
                }
            }
            ExprKind::Index { object, index } => {
                let object_ty = self.check_place(object);
                self.expect_type(index, &Type::Int, "index");
                match object_ty {
                    Type::Array(elem) => *elem,
                    Type::Error => Type::Error,
                    Type::String => {
                        self.error(target.span, "Strings cannot be modified by index");
                        Type::Error
                    }
                    other => {
                        self.error(object.span, format!("Cannot index into a value of type {}", other));
                        Type::Error
                    }
                }
            }
            _ => {
                self.error(target.span, "Invalid assignment target");
                Type::Error
            }
        };
        self.types.insert(target.id, ty.clone());
        ty
    }

    fn check_assign(&mut self, op: AssignOp, target: &Expr, value: &Expr) -> Type {
        let target_ty = self.check_place(target);
        self.expect_type(value, &target_ty, "assignment");
        if let Some(bin) = op.binary_op() {
            let ok = target_ty.is_error()
                || target_ty.is_numeric()
                || (bin == BinaryOp::Add && target_ty == Type::String);
            if !ok {
                self.error(
                    target.span,
                    format!("Operator '{}' cannot be applied to a value of type {}", op.symbol(), target_ty),
                );
            }
        }
        target_ty
    }

    fn check_args(&mut self, args: &[Expr], params: &[Type], what: &str, span: Span) {
        if args.len() != params.len() {
            self.error(
                span,
                format!("{} expects {} arguments, found {}", what, params.len(), args.len()),
            );
            for arg in args {
                self.check_expr(arg, None);
            }
            return;
        }
        for (i, (arg, param)) in args.iter().zip(params).enumerate() {
            self.expect_type(arg, param, &format!("argument {} of {}", i + 1, what));
        }
    }

    fn check_call(&mut self, call: &Expr, callee: &Expr, args: &[Expr]) -> Type {
        if let ExprKind::Ident(name) = &callee.kind {
            if self.scopes.lookup(name).is_none() {
                if let Some(builtin) = Builtin::from_name(name) {
                    self.resolutions.insert(call.id, Resolution::Builtin(builtin));
                    return self.check_builtin(builtin, args, call.span);
                }
            }
        }

        if let ExprKind::Field { object, name } = &callee.kind {
            if let Some(type_name) = self.as_type_name(object) {
                return self.check_static_call(call, callee, type_name, name, args);
            }
            let object_ty = self.check_expr(object, None);
            if let Type::Struct(strukt) = &object_ty {
                let method = self
                    .structs
                    .get(strukt)
                    .and_then(|info| info.methods.get(name))
                    .map(|m| (m.receiver, m.fn_type(), m.params.clone(), m.ret.clone()));
                if let Some((receiver, fn_ty, params, ret)) = method {
                    self.types.insert(callee.id, fn_ty);
                    let what = format!("method '{}.{}'", strukt, name);
                    if receiver == Receiver::Static {
                        self.error(
                            callee.span,
                            format!("Static method '{}' must be called as {}.{}(...)", name, strukt, name),
                        );
                    } else {
                        self.resolutions.insert(
                            call.id,
                            Resolution::InstanceMethod {
                                strukt: strukt.clone(),
                            },
                        );
                    }
                    self.check_args(args, &params, &what, call.span);
                    return ret;
                }
            }
            // Not a method: a field holding a function value.
            let field_ty = self.field_of(&object_ty, name, callee.span);
            self.types.insert(callee.id, field_ty.clone());
            return self.check_fn_value_call(field_ty, args, call.span);
        }

        let callee_ty = self.check_expr(callee, None);
        self.check_fn_value_call(callee_ty, args, call.span)
    }

    fn check_fn_value_call(&mut self, callee_ty: Type, args: &[Expr], span: Span) -> Type {
        match callee_ty {
            Type::Function(params, ret) => {
                self.check_args(args, &params, "function", span);
                *ret
            }
            Type::Error => {
                for arg in args {
                    self.check_expr(arg, None);
                }
                Type::Error
            }
            other => {
                self.error(span, format!("Cannot call a value of type {}", other));
                Type::Error
            }
        }
    }

    fn check_static_call(&mut self, call: &Expr, callee: &Expr, type_name: &str, name: &str, args: &[Expr]) -> Type {
        let method = self
            .structs
            .get(type_name)
            .and_then(|info| info.methods.get(name))
            .map(|m| (m.receiver, m.fn_type(), m.params.clone(), m.ret.clone()));
        let Some((receiver, fn_ty, params, ret)) = method else {
            let msg = if self.enums.contains_key(type_name) {
                format!("Enum variant '{}.{}' cannot be called", type_name, name)
            } else {
                format!("Struct '{}' has no method '{}'", type_name, name)
            };
            self.error(callee.span, msg);
            for arg in args {
                self.check_expr(arg, None);
            }
            return Type::Error;
        };
        self.types.insert(callee.id, fn_ty);
        if receiver == Receiver::Instance {
            self.error(
                callee.span,
                format!("Instance method '{}' must be called on a value of type {}", name, type_name),
            );
        } else {
            self.resolutions.insert(
                call.id,
                Resolution::StaticMethod {
                    strukt: type_name.to_string(),
                },
            );
        }
        self.check_args(args, &params, &format!("method '{}.{}'", type_name, name), call.span);
        ret
    }

    fn check_builtin(&mut self, builtin: Builtin, args: &[Expr], span: Span) -> Type {
        let what = format!("builtin '{}'", builtin.name());
        let arity = match builtin {
            Builtin::Print | Builtin::Len => 1,
            Builtin::Push => 2,
        };
        if args.len() != arity {
            self.error(span, format!("{} expects {} arguments, found {}", what, arity, args.len()));
            for arg in args {
                self.check_expr(arg, None);
            }
            return Type::Error;
        }
        match builtin {
            Builtin::Print => {
                self.check_expr(&args[0], None);
                Type::Unit
            }
            Builtin::Len => {
                let ty = self.check_expr(&args[0], None);
                if !matches!(ty, Type::Array(_) | Type::String | Type::Error) {
                    self.error(args[0].span, format!("{} expects an array or a string, found {}", what, ty));
                }
                Type::Int
            }
            Builtin::Push => {
                match self.check_expr(&args[0], None) {
                    Type::Array(elem) => self.expect_type(&args[1], &elem, &format!("argument 2 of {}", what)),
                    Type::Error => {
                        self.check_expr(&args[1], None);
                    }
                    other => {
                        self.error(args[0].span, format!("{} expects an array, found {}", what, other));
                        self.check_expr(&args[1], None);
                    }
                }
                Type::Unit
            }
        }
    }

    fn check_field(&mut self, expr: &Expr, object: &Expr, name: &str) -> Type {
        if let Some(type_name) = self.as_type_name(object) {
            if let Some(decl) = self.enums.get(type_name).cloned() {
                return match decl.variants.iter().position(|v| v == name) {
                    Some(index) => {
                        self.resolutions.insert(
                            expr.id,
                            Resolution::EnumVariant {
                                enum_name: decl.name.clone(),
                                index,
                            },
                        );
                        Type::Enum(decl.name.clone())
                    }
                    None => {
                        self.error(expr.span, format!("Enum '{}' has no variant '{}'", type_name, name));
                        Type::Error
                    }
                };
            }
            self.error(expr.span, format!("Static method '{}.{}' must be called", type_name, name));
            return Type::Error;
        }
        let object_ty = self.check_expr(object, None);
        self.field_of(&object_ty, name, expr.span)
    }

    fn field_of(&mut self, object_ty: &Type, name: &str, span: Span) -> Type {
        match object_ty {
            Type::Error => Type::Error,
            Type::Struct(strukt) => {
                let Some(info) = self.structs.get(strukt) else {
                    return Type::Error;
                };
                if let Some(ty) = info.field(name) {
                    return ty.clone();
                }
                let msg = if info.methods.contains_key(name) {
                    format!("Method '{}.{}' must be called", strukt, name)
                } else {
                    format!("Struct '{}' has no field '{}'", strukt, name)
                };
                self.error(span, msg);
                Type::Error
            }
            other => {
                self.error(span, format!("Value of type {} has no field '{}'", other, name));
                Type::Error
            }
        }
    }

    fn check_array(&mut self, elems: &[Expr], expected: Option<&Type>, span: Span) -> Type {
        let hint = match expected {
            Some(Type::Array(elem)) => Some((**elem).clone()),
            _ => None,
        };
        let Some((first, rest)) = elems.split_first() else {
            return match hint {
                Some(elem) => Type::Array(Box::new(elem)),
                None => {
                    self.error(span, "Cannot infer the element type of an empty array; add a type annotation");
                    Type::Error
                }
            };
        };
        let elem_ty = match &hint {
            Some(h) => {
                self.expect_type(first, h, "array element");
                h.clone()
            }
            None => self.check_expr(first, None),
        };
        for elem in rest {
            self.expect_type(elem, &elem_ty, "array element");
        }
        Type::Array(Box::new(elem_ty))
    }

    fn check_struct_literal(&mut self, name: &str, fields: &[FieldInit], span: Span) -> Type {
        let Some(declared) = self.structs.get(name).map(|info| info.fields.clone()) else {
            self.error(span, format!("Unknown struct '{}'", name));
            for f in fields {
                self.check_expr(&f.value, None);
            }
            return Type::Error;
        };
        let mut seen: Vec<&str> = Vec::new();
        for init in fields {
            match declared.iter().find(|(n, _)| n == &init.name) {
                Some((_, ty)) => {
                    if seen.contains(&init.name.as_str()) {
                        self.error(init.span, format!("Field '{}' is initialized twice", init.name));
                    }
                    seen.push(&init.name);
                    self.expect_type(&init.value, ty, &format!("field '{}.{}'", name, init.name));
                }
                None => {
                    self.error(init.span, format!("Struct '{}' has no field '{}'", name, init.name));
                    self.check_expr(&init.value, None);
                }
            }
        }
        for (field, _) in &declared {
            if !seen.contains(&field.as_str()) {
                self.error(span, format!("Missing field '{}' in '{}' literal", field, name));
            }
        }
        Type::Struct(name.to_string())
    }
}

fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::Int,
        Literal::UInt(_) => Type::UInt,
        Literal::Float(_) => Type::Float,
        Literal::Char(_) => Type::Char,
        Literal::Str(_) => Type::String,
        Literal::Bool(_) => Type::Bool,
    }
}

/// Whether executing `stmts` always ends in a `return`.
pub(crate) fn block_returns(stmts: &[Stmt]) -> bool {
    stmts.iter().any(always_returns)
}

fn always_returns(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::If {
            branches,
            else_body: Some(else_body),
        } => branches.iter().all(|(_, body)| block_returns(body)) && block_returns(else_body),
        StmtKind::Switch { arms, .. } => {
            arms.iter().any(|arm| arm.pattern.is_catch_all()) && arms.iter().all(|arm| block_returns(&arm.body))
        }
        _ => false,
    }
}
