pub mod parser;

pub use parser::{Parser, MAX_NESTING};

use sklang_syntax::ast::Program;
use sklang_syntax::error::Result;
use sklang_syntax::token::Token;

/// Convenience wrapper around [`Parser::parse_program`].
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sklang_lexer::Lexer;
    use sklang_syntax::ast::*;
    use sklang_syntax::error::{Error, ErrorKind};

    fn parse_expr_str(input: &str) -> Expr {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_expr().expect("Parsing should succeed")
    }

    fn parse_program_str(input: &str) -> Program {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_program().expect("Parsing should succeed")
    }

    fn parse_error(input: &str) -> Error {
        let tokens = Lexer::new(input).tokenize().expect("Lexing should succeed");
        Parser::new(tokens).parse_program().expect_err("Parsing should fail")
    }

    fn binary(expr: &Expr) -> (BinaryOp, &Expr, &Expr) {
        match &expr.kind {
            ExprKind::Binary { op, lhs, rhs } => (*op, &**lhs, &**rhs),
            other => panic!("Expected binary expression, got {:?}", other),
        }
    }

    fn stmt(program: &Program, i: usize) -> &StmtKind {
        match &program.items[i] {
            Item::Stmt(s) => &s.kind,
            other => panic!("Expected statement, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_expressions() {
        assert!(matches!(parse_expr_str("42").kind, ExprKind::Literal(Literal::Int(42))));
        assert!(matches!(parse_expr_str("7u").kind, ExprKind::Literal(Literal::UInt(7))));
        assert!(matches!(parse_expr_str("'x'").kind, ExprKind::Literal(Literal::Char('x'))));
        assert!(matches!(parse_expr_str("\"hi\"").kind, ExprKind::Literal(Literal::Str(ref s)) if s == "hi"));
        assert!(matches!(parse_expr_str("false").kind, ExprKind::Literal(Literal::Bool(false))));
    }

    #[test]
    fn test_operator_precedence() {
        // 1 + ((2 * 3) / 4) % 5
        let e = parse_expr_str("1 + 2 * 3 / 4 % 5");
        let (op, lhs, rhs) = binary(&e);
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(lhs.kind, ExprKind::Literal(Literal::Int(1))));
        let (op, div, five) = binary(rhs);
        assert_eq!(op, BinaryOp::Rem);
        assert!(matches!(five.kind, ExprKind::Literal(Literal::Int(5))));
        let (op, mul, _) = binary(div);
        assert_eq!(op, BinaryOp::Div);
        assert_eq!(binary(mul).0, BinaryOp::Mul);

        let e = parse_expr_str("a || b && c == d < e");
        let (op, _, rhs) = binary(&e);
        assert_eq!(op, BinaryOp::Or);
        let (op, _, rhs) = binary(rhs);
        assert_eq!(op, BinaryOp::And);
        let (op, _, rhs) = binary(rhs);
        assert_eq!(op, BinaryOp::Eq);
        assert_eq!(binary(rhs).0, BinaryOp::Lt);
    }

    #[test]
    fn test_left_associativity() {
        let e = parse_expr_str("10 - 3 - 2");
        let (_, lhs, rhs) = binary(&e);
        assert_eq!(binary(lhs).0, BinaryOp::Sub);
        assert!(matches!(rhs.kind, ExprKind::Literal(Literal::Int(2))));
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let e = parse_expr_str("a = b += 1");
        match e.kind {
            ExprKind::Assign { op: AssignOp::Assign, value, .. } => {
                assert!(matches!(value.kind, ExprKind::Assign { op: AssignOp::Add, .. }));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }

        let e = parse_expr_str("xs[i] %= 3");
        match e.kind {
            ExprKind::Assign { op, target, .. } => {
                assert_eq!(op, AssignOp::Rem);
                assert!(matches!(target.kind, ExprKind::Index { .. }));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_and_postfix() {
        let e = parse_expr_str("-a.b[0](1, 2)");
        let ExprKind::Unary { op: UnaryOp::Neg, operand } = e.kind else {
            panic!("Expected negation");
        };
        let ExprKind::Call { callee, args } = operand.kind else {
            panic!("Expected call");
        };
        assert_eq!(args.len(), 2);
        assert!(matches!(callee.kind, ExprKind::Index { .. }));
        assert!(matches!(parse_expr_str("!!done").kind, ExprKind::Unary { op: UnaryOp::Not, .. }));
    }

    #[test]
    fn test_struct_and_closure_literals() {
        let e = parse_expr_str("Point { x: 1, y: 2 }");
        let ExprKind::StructLit { name, fields } = e.kind else {
            panic!("Expected struct literal");
        };
        assert_eq!(name, "Point");
        assert_eq!(fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), ["x", "y"]);

        let e = parse_expr_str("fn(x: int) -> int { return x + 1; }");
        let ExprKind::Closure(f) = e.kind else {
            panic!("Expected closure");
        };
        assert_eq!(f.params.len(), 1);
        assert_eq!(f.body.len(), 1);
    }

    #[test]
    fn test_expression_ids_are_unique() {
        let program = parse_program_str("var a = 1 + 2; var b = a * 3;");
        let mut ids = Vec::new();
        for i in 0..2 {
            if let StmtKind::Var { init, .. } = stmt(&program, i) {
                ids.push(init.id);
                let (_, l, r) = binary(init);
                ids.push(l.id);
                ids.push(r.id);
            }
        }
        let mut dedup = ids.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(ids.len(), 6);
        assert_eq!(dedup.len(), 6);
    }

    #[test]
    fn test_statements() {
        let p = parse_program_str(
            r#"
            var x: int = 1;
            if (x > 0) { x = 2; } else if (x < 0) { x = 3; } else { x = 4; }
            while (x < 10) { x += 1; continue; }
            for (var i = 0; i < 3; i += 1) { break; }
            switch (x) { 1 -> { x = 0; }, -2 -> { }, other -> { x = other; }, default -> { } }
            "#,
        );
        assert_eq!(p.items.len(), 5);
        assert!(matches!(stmt(&p, 0), StmtKind::Var { ty: Some(_), .. }));
        match stmt(&p, 1) {
            StmtKind::If { branches, else_body } => {
                assert_eq!(branches.len(), 2);
                assert!(else_body.is_some());
            }
            other => panic!("Expected if, got {:?}", other),
        }
        assert!(matches!(stmt(&p, 2), StmtKind::While { .. }));
        assert!(matches!(stmt(&p, 3), StmtKind::For { .. }));
        match stmt(&p, 4) {
            StmtKind::Switch { arms, .. } => {
                let patterns: Vec<_> = arms.iter().map(|a| a.pattern.clone()).collect();
                assert_eq!(
                    patterns,
                    vec![
                        Pattern::Literal(Literal::Int(1)),
                        Pattern::Literal(Literal::Int(-2)),
                        Pattern::Binding("other".into()),
                        Pattern::Default,
                    ]
                );
            }
            other => panic!("Expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_declarations() {
        let p = parse_program_str(
            r#"
            fn add(a: int, b: int) -> int { return a + b; }
            struct Point {
                x: int,
                y: int,
                fn sum(self) -> int { return self.x + self.y; }
                fn origin() -> Point { return Point { x: 0, y: 0 }; }
            }
            enum Color { Red, Green, Blue, }
            fn apply(f: fn(int) -> int, xs: [int]) { }
            "#,
        );
        let Item::Function(add) = &p.items[0] else { panic!("Expected function") };
        assert_eq!(add.params.len(), 2);
        assert!(add.ret.is_some());

        let Item::Struct(point) = &p.items[1] else { panic!("Expected struct") };
        assert_eq!(point.fields.len(), 2);
        assert_eq!(point.method("sum").map(|m| m.receiver), Some(Receiver::Instance));
        assert_eq!(point.method("origin").map(|m| m.receiver), Some(Receiver::Static));

        let Item::Enum(color) = &p.items[2] else { panic!("Expected enum") };
        assert_eq!(color.variants, ["Red", "Green", "Blue"]);

        let Item::Function(apply) = &p.items[3] else { panic!("Expected function") };
        assert!(apply.ret.is_none());
        assert!(matches!(apply.params[0].ty.kind, TypeExprKind::Function { .. }));
        assert!(matches!(apply.params[1].ty.kind, TypeExprKind::Array(_)));
    }

    #[test]
    fn test_field_after_method_is_rejected() {
        let err = parse_error("struct S { fn f() { } x: int }");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.msg.contains("before its methods"), "{}", err.msg);
    }

    #[test]
    fn test_default_must_be_last() {
        let err = parse_error("switch (1) { default -> { }, 1 -> { } }");
        assert!(err.msg.contains("last arm"), "{}", err.msg);
    }

    #[test]
    fn test_syntax_errors_name_expected_and_found() {
        let err = parse_error("var x = 1");
        assert_eq!(err.msg, "Expected ';' after variable declaration, found end of input");

        let err = parse_error("if x > 1 { }");
        assert!(err.msg.starts_with("Expected '(' after 'if', found identifier 'x'"), "{}", err.msg);
        assert_eq!((err.line(), err.col()), (Some(1), Some(4)));

        let err = parse_error("1 + 2 = 3;");
        assert!(err.msg.contains("Invalid assignment target"));

        let err = parse_error("while (true) { fn inner() { } }");
        assert!(err.msg.contains("top level"));

        let err = parse_error("match (x) { 1 -> { } }");
        assert!(err.msg.contains("'match' is a reserved word"), "{}", err.msg);
        let err = parse_error("var match = 1;");
        assert_eq!(err.msg, "Expected variable name after 'var', found 'match'");
    }

    #[test]
    fn test_structural_equality_ignores_positions() {
        let a = parse_program_str("var x = 1 + 2;");
        let b = parse_program_str("\n\n   var   x=1+\n2 ;");
        assert_eq!(a, b);
        assert_ne!(a, parse_program_str("var x = 2 + 1;"));
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!("var x = {}1{};", "(".repeat(MAX_NESTING - 2), ")".repeat(MAX_NESTING - 2));
        parse_program_str(&ok);

        let deep = 100_000;
        let err = parse_error(&format!("var x = {}1{};", "(".repeat(deep), ")".repeat(deep)));
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.msg.starts_with("Expression nesting too deep"), "{}", err.msg);
        assert_eq!(err.line(), Some(1));

        let err = parse_error(&format!("var x = {}1;", "-".repeat(deep)));
        assert!(err.msg.starts_with("Expression nesting too deep"), "{}", err.msg);

        let blocks = format!("{}{}", "if (true) { ".repeat(deep), "}".repeat(deep));
        let err = parse_error(&blocks);
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.msg.contains("nesting too deep"), "{}", err.msg);

        let err = parse_error(&format!("var x: {}int{} = [];", "[".repeat(deep), "]".repeat(deep)));
        assert!(err.msg.starts_with("Type nesting too deep"), "{}", err.msg);
    }
}
