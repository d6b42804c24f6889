//! Static type checking for SkLang programs.

mod checker;
mod results;
mod scope;

pub use checker::TypeChecker;
pub use results::{Builtin, Resolution, TypedProgram};

use sklang_syntax::ast::Program;
use sklang_syntax::error::Error;

/// Checks `program`, returning it annotated or every type error found.
pub fn check(program: Program) -> Result<TypedProgram, Vec<Error>> {
    TypeChecker::new().check_program(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sklang_lexer::Lexer;
    use sklang_parser::Parser;
    use sklang_syntax::ast::{ExprKind, Item, StmtKind};
    use sklang_syntax::error::ErrorKind;
    use sklang_syntax::types::Type;

    fn check_str(input: &str) -> Result<TypedProgram, Vec<Error>> {
        let tokens = Lexer::new(input).tokenize().expect("Lexing should succeed");
        let program = Parser::new(tokens).parse_program().expect("Parsing should succeed");
        check(program)
    }

    fn ok(input: &str) -> TypedProgram {
        match check_str(input) {
            Ok(typed) => typed,
            Err(errors) => panic!("Expected program to type check, got {:?}", errors),
        }
    }

    fn errors(input: &str) -> Vec<Error> {
        match check_str(input) {
            Ok(_) => panic!("Expected type errors for {:?}", input),
            Err(errors) => errors,
        }
    }

    fn first_error(input: &str) -> String {
        let errs = errors(input);
        assert!(errs.iter().all(|e| e.kind == ErrorKind::Type));
        errs[0].msg.clone()
    }

    fn var_type(typed: &TypedProgram, index: usize) -> Type {
        match &typed.program.items[index] {
            Item::Stmt(stmt) => match &stmt.kind {
                StmtKind::Var { init, .. } | StmtKind::Expr(init) => {
                    typed.type_of(init.id).cloned().expect("expression should be annotated")
                }
                other => panic!("Expected var or expression, got {:?}", other),
            },
            other => panic!("Expected statement, got {:?}", other),
        }
    }

    #[test]
    fn test_infers_expression_types() {
        let typed = ok(r#"
            var a = 1 + 2 * 3;
            var b = 2.5 / 0.5;
            var c = "a" + "b";
            var d = a < 3 && !false;
            var e = [1u, 2u];
            var f = fn(x: int) -> bool { return x > 0; };
            var g = "abc"[0];
        "#);
        assert_eq!(var_type(&typed, 0), Type::Int);
        assert_eq!(var_type(&typed, 1), Type::Float);
        assert_eq!(var_type(&typed, 2), Type::String);
        assert_eq!(var_type(&typed, 3), Type::Bool);
        assert_eq!(var_type(&typed, 4), Type::Array(Box::new(Type::UInt)));
        assert_eq!(
            var_type(&typed, 5),
            Type::Function(vec![Type::Int], Box::new(Type::Bool))
        );
        assert_eq!(var_type(&typed, 6), Type::Char);
    }

    #[test]
    fn test_assignment_type_mismatch() {
        let msg = first_error(r#"var x: int = 1; x = "a";"#);
        assert_eq!(msg, "Type mismatch in assignment: expected int, found string");
        let msg = first_error("var y: float = 1;");
        assert!(msg.contains("expected float, found int"), "{}", msg);
    }

    #[test]
    fn test_no_implicit_numeric_conversion() {
        let msg = first_error("var x = 1 + 2.0;");
        assert!(msg.contains("found int and float"), "{}", msg);
        assert!(first_error("var x = 1u - 1;").contains("found uint and int"));
    }

    #[test]
    fn test_undefined_names() {
        assert_eq!(first_error("x = 1;"), "Undefined variable 'x'");
        assert!(first_error("var p = Point { x: 1 };").contains("Unknown struct 'Point'"));
        assert!(first_error("var n: number = 1;").contains("Unknown type 'number'"));
    }

    #[test]
    fn test_errors_do_not_cascade() {
        let errs = errors("var a = missing; var b = a + 1; var c: string = a;");
        assert_eq!(errs.len(), 1, "{:?}", errs);
    }

    #[test]
    fn test_all_errors_are_reported() {
        let errs = errors(r#"var a: int = "x"; var b: bool = 1; undefined();"#);
        assert_eq!(errs.len(), 3, "{:?}", errs);
    }

    #[test]
    fn test_calls_check_arity_and_arguments() {
        let src = "fn add(a: int, b: int) -> int { return a + b; }";
        ok(&format!("{} var r = add(1, 2);", src));
        assert!(first_error(&format!("{} add(1);", src)).contains("expects 2 arguments, found 1"));
        assert!(first_error(&format!("{} add(1, true);", src)).contains("argument 2"));
        assert!(first_error("var x = 1; x(2);").contains("Cannot call a value of type int"));
    }

    #[test]
    fn test_builtins() {
        let typed = ok(r#"
            var xs: [int] = [];
            push(xs, 1);
            var n = len(xs) + len("abc");
            print(n);
        "#);
        assert_eq!(var_type(&typed, 2), Type::Int);
        assert!(first_error("push([1], \"a\");").contains("expected int, found string"));
        assert!(first_error("len(3);").contains("expects an array or a string"));
        assert!(first_error("fn print(x: int) { }").contains("builtin"));
    }

    #[test]
    fn test_struct_fields_and_methods() {
        let src = r#"
            struct Point {
                x: int,
                y: int,
                fn sum(self) -> int { return self.x + self.y; }
                fn origin() -> Point { return Point { x: 0, y: 0 }; }
            }
        "#;
        let typed = ok(&format!("{} var p = Point.origin(); var s = p.sum(); p.x = 3;", src));
        assert_eq!(var_type(&typed, 1), Type::Struct("Point".into()));
        assert_eq!(var_type(&typed, 2), Type::Int);

        assert!(first_error(&format!("{} var p = Point {{ x: 1 }};", src)).contains("Missing field 'y'"));
        assert!(first_error(&format!("{} var p = Point {{ x: 1, y: 2, z: 3 }};", src)).contains("no field 'z'"));
        assert!(first_error(&format!("{} var p = Point.origin(); p.z;", src)).contains("no field 'z'"));
        assert!(first_error(&format!("{} var p = Point.origin(); p.scale(2);", src)).contains("no field 'scale'"));
    }

    #[test]
    fn test_static_and_instance_methods_are_not_interchangeable() {
        let src = r#"
            struct Counter {
                n: int,
                fn get(self) -> int { return self.n; }
                fn zero() -> Counter { return Counter { n: 0 }; }
            }
        "#;
        let msg = first_error(&format!("{} Counter.get();", src));
        assert!(msg.contains("must be called on a value"), "{}", msg);
        let msg = first_error(&format!("{} var c = Counter.zero(); c.zero();", src));
        assert!(msg.contains("must be called as Counter.zero"), "{}", msg);
    }

    #[test]
    fn test_call_resolutions_are_recorded() {
        let typed = ok(r#"
            struct S { fn make() -> S { return S { }; } fn id(self) -> S { return self; } }
            enum E { A, B }
            var s = S.make().id();
            var e = E.B;
            print(1);
        "#);
        let mut found = Vec::new();
        for item in &typed.program.items {
            if let Item::Stmt(stmt) = item {
                let expr = match &stmt.kind {
                    StmtKind::Var { init, .. } => init,
                    StmtKind::Expr(e) => e,
                    _ => continue,
                };
                found.push(typed.resolution(expr.id).cloned());
                if let ExprKind::Call { callee, .. } = &expr.kind {
                    if let ExprKind::Field { object, .. } = &callee.kind {
                        found.push(typed.resolution(object.id).cloned());
                    }
                }
            }
        }
        assert_eq!(
            found,
            vec![
                Some(Resolution::InstanceMethod { strukt: "S".into() }),
                Some(Resolution::StaticMethod { strukt: "S".into() }),
                Some(Resolution::EnumVariant { enum_name: "E".into(), index: 1 }),
                Some(Resolution::Builtin(Builtin::Print)),
            ]
        );
    }

    #[test]
    fn test_enums_and_switch_patterns() {
        ok(r#"
            enum Color { Red, Green }
            var c = Color.Green;
            switch (c) { Color.Red -> { print(1); } other -> { print(2); } }
            switch (3) { 1 -> { } default -> { } }
        "#);
        assert!(first_error("enum Color { Red } var c = Color.Blue;").contains("no variant 'Blue'"));
        assert!(first_error("switch (1) { \"a\" -> { } }").contains("cannot match a subject of type int"));
        assert!(first_error("enum A { X } enum B { Y } switch (A.X) { B.Y -> { } }").contains("cannot match"));
    }

    #[test]
    fn test_missing_return() {
        let msg = first_error("fn f(x: int) -> int { if (x > 0) { return 1; } }");
        assert!(msg.contains("must return a value of type int"), "{}", msg);
        ok("fn f(x: int) -> int { if (x > 0) { return 1; } else { return 2; } }");
        ok("fn f(x: int) -> int { switch (x) { 1 -> { return 1; } default -> { return 0; } } }");
        assert!(first_error("fn f() -> int { while (true) { return 1; } }").contains("must return"));
        assert!(first_error("fn f() -> int { return; }").contains("Missing return value"));
    }

    #[test]
    fn test_control_flow_context() {
        assert!(first_error("break;").contains("'break' outside of loop"));
        assert!(first_error("fn f() { continue; }").contains("'continue' outside of loop"));
        assert!(first_error("return 1;").contains("'return' outside of function"));
        assert!(first_error("while (true) { var f = fn() { break; }; }").contains("outside of loop"));
        ok("for (var i = 0; i < 3; i += 1) { if (i == 1) { continue; } break; }");
    }

    #[test]
    fn test_scoping_rules() {
        assert!(first_error("var x = 1; var x = 2;").contains("already declared in this scope"));
        ok("var x = 1; if (true) { var x = \"shadow\"; print(x); } x = 2;");
        assert!(first_error("if (true) { var y = 1; } y = 2;").contains("Undefined variable 'y'"));
        // functions may be called before their declaration
        ok("fn a() -> int { return b(); } fn b() -> int { return 1; }");
        assert!(first_error("fn f() { } f = fn() { };").contains("Cannot assign to function"));
    }

    #[test]
    fn test_empty_array_needs_context() {
        assert!(first_error("var xs = [];").contains("Cannot infer the element type"));
        ok("var xs: [[int]] = [[], [1]];");
        ok("fn f(xs: [string]) { } f([]);");
    }

    #[test]
    fn test_invalid_assignments() {
        assert!(first_error("var s = \"abc\"; s[0] = 'x';").contains("Strings cannot be modified"));
        assert!(first_error("var b = true; b += true;").contains("cannot be applied"));
        assert!(first_error("var u = print(1);").contains("unit"));
    }
}
