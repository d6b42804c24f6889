//! SkLang interpreter: evaluates a type-checked program by walking its AST.
//!
//! The interpreter trusts the checker's verdict and its call resolutions, but
//! still reports every runtime fault (division by zero, out-of-bounds index,
//! integer overflow, call depth, unmatched switch) as a positioned
//! [`sklang_syntax::Error`] of kind `Runtime`. The first fault halts the
//! program; output printed before it is kept.

pub mod env;
pub mod flow;
pub mod interpreter;
mod ops;
pub mod value;

pub use env::Env;
pub use interpreter::{Config, Interpreter, DEFAULT_MAX_CALL_DEPTH};
pub use value::{Closure, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use sklang_lexer::Lexer;
    use sklang_parser::Parser;
    use sklang_syntax::error::ErrorKind;

    fn run_program(input: &str) -> (Result<Option<Value>, String>, Vec<String>) {
        let tokens = Lexer::new(input).tokenize().expect("Lexing should succeed");
        let program = Parser::new(tokens).parse_program().expect("Parsing should succeed");
        let typed = match sklang_typeck::check(program) {
            Ok(typed) => typed,
            Err(errors) => panic!("Type errors in {:?}: {:?}", input, errors),
        };
        let mut interpreter = Interpreter::new(&typed, Config::default());
        let result = interpreter.run().map_err(|e| {
            assert_eq!(e.kind, ErrorKind::Runtime);
            e.msg
        });
        (result, interpreter.into_output())
    }

    fn expect_value(input: &str, expected: Value) {
        match run_program(input).0 {
            Ok(Some(actual)) => assert_eq!(actual, expected, "Program: {}", input),
            Ok(None) => panic!("Expected value but got None for: {}", input),
            Err(e) => panic!("Program failed: {}\nInput: {}", e, input),
        }
    }

    fn expect_output(input: &str, expected: &[&str]) {
        let (result, output) = run_program(input);
        if let Err(e) = result {
            panic!("Program failed: {}\nInput: {}", e, input);
        }
        assert_eq!(output, expected, "Program: {}", input);
    }

    fn expect_error(input: &str, fragment: &str) {
        match run_program(input).0 {
            Ok(_) => panic!("Expected error but program succeeded: {}", input),
            Err(msg) => assert!(msg.contains(fragment), "{:?} does not mention {:?}", msg, fragment),
        }
    }

    #[test]
    fn test_literal_values() {
        expect_value("42;", Value::Int(42));
        expect_value("7u;", Value::UInt(7));
        expect_value("1.5;", Value::Float(1.5));
        expect_value("'c';", Value::Char('c'));
        expect_value("\"hello\";", Value::Str("hello".to_string()));
        expect_value("true;", Value::Bool(true));
    }

    #[test]
    fn test_arithmetic() {
        expect_value("1 + ((2 * 3) / 4) % 5;", Value::Int(2));
        expect_value("1 + 2 * 3 / 4 % 5;", Value::Int(2));
        expect_value("10 - 3 - 2;", Value::Int(5));
        expect_value("-7 % 3;", Value::Int(-1));
        expect_value("7u / 2u;", Value::UInt(3));
        expect_value("1.5 * 2.0;", Value::Float(3.0));
        expect_value("\"ab\" + \"cd\";", Value::Str("abcd".into()));
    }

    #[test]
    fn test_comparison_and_logic() {
        expect_value("3 < 4 && 4 <= 4 && !(5 > 6);", Value::Bool(true));
        expect_value("'a' < 'b' == true;", Value::Bool(true));
        expect_value("\"x\" != \"y\";", Value::Bool(true));
    }

    #[test]
    fn test_short_circuit() {
        expect_output(
            r#"
            fn loud(b: bool) -> bool { print("called"); return b; }
            var a = false && loud(true);
            var b = true || loud(true);
            var c = true && loud(false);
            "#,
            &["called"],
        );
    }

    #[test]
    fn test_variables_and_assignment() {
        expect_value("var x = 1; x = x + 1; x += 10; x -= 2; x *= 3; x /= 2; x;", Value::Int(15));
        expect_value("var a = 1; var b = 2; a = b = 5; a + b;", Value::Int(10));
        expect_value("var s = \"a\"; s += \"b\"; s;", Value::Str("ab".into()));
        expect_value("var x = 17; x %= 5; x;", Value::Int(2));
        expect_value("var xs = [10u, 11u]; xs[1] %= 4u; xs[1];", Value::UInt(3));
    }

    #[test]
    fn test_block_scoping() {
        expect_output(
            r#"
            var x = 1;
            if (true) { var x = 2; print(x); }
            print(x);
            if (true) { var y = 3; }
            var y = 4;
            print(y);
            "#,
            &["2", "1", "4"],
        );
    }

    #[test]
    fn test_control_flow() {
        expect_output(
            r#"
            var n = 0;
            if (n > 0) { print("pos"); } else if (n < 0) { print("neg"); } else { print("zero"); }
            for (var i = 0; i < 5; i += 1) {
                if (i == 1) { continue; }
                if (i == 4) { break; }
                print(i);
            }
            var j = 3;
            while (j > 0) { j -= 1; if (j == 1) { continue; } print(j); }
            "#,
            &["zero", "0", "2", "3", "2", "0"],
        );
    }

    #[test]
    fn test_continue_runs_for_step() {
        expect_value(
            "var count = 0; for (var i = 0; i < 10; i += 1) { continue; } for (var k = 0; k < 3; k += 1) { count += 1; } count;",
            Value::Int(3),
        );
    }

    #[test]
    fn test_functions_and_recursion() {
        expect_value(
            "fn fib(n: int) -> int { if (n < 2) { return n; } return fib(n - 1) + fib(n - 2); } fib(15);",
            Value::Int(610),
        );
        expect_value(
            "fn find(xs: [int], t: int) -> int { for (var i = 0; i < len(xs); i += 1) { while (true) { if (xs[i] == t) { return i; } break; } } return -1; } find([4, 5, 6], 6);",
            Value::Int(2),
        );
    }

    #[test]
    fn test_closures_capture_by_reference() {
        expect_output(
            r#"
            var n = 1;
            var get = fn() -> int { return n; };
            n = 2;
            print(get());
            fn counter() -> fn() -> int {
                var c = 0;
                return fn() -> int { c += 1; return c; };
            }
            var next = counter();
            next();
            next();
            print(next());
            "#,
            &["2", "3"],
        );
    }

    #[test]
    fn test_switch_runs_exactly_one_arm() {
        expect_output(
            r#"
            var x = 2;
            switch (x) { 1 -> { print("one"); } 2 -> { print("two"); } other -> { print("other"); } default -> { print("default"); } }
            switch (x) { n -> { print(n * 10); } 2 -> { print("never"); } }
            switch ("b") { "a" -> { print("a"); } default -> { print("fallback"); } }
            "#,
            &["two", "20", "fallback"],
        );
    }

    #[test]
    fn test_unmatched_switch_is_runtime_error() {
        expect_error("switch (3) { 1 -> { } 2 -> { } }", "No switch arm matches the value 3");
    }

    #[test]
    fn test_enums() {
        expect_output(
            r#"
            enum Color { Red, Green, Blue }
            var c = Color.Blue;
            print(c);
            switch (c) { Color.Red -> { print("red"); } Color.Blue -> { print("blue"); } default -> { } }
            print(c == Color.Blue);
            "#,
            &["Color.Blue", "blue", "true"],
        );
    }

    #[test]
    fn test_structs_have_value_semantics() {
        expect_output(
            r#"
            struct Point { x: int, y: int }
            var a = Point { y: 2, x: 1 };
            var b = a;
            b.x = 10;
            print(a.x);
            print(b);
            print(Point { x: 7, y: 8 }.x);
            "#,
            &["1", "Point { x: 10, y: 2 }", "7"],
        );
    }

    #[test]
    fn test_arrays_have_reference_semantics() {
        expect_output(
            r#"
            var xs = [1, 2];
            var ys = xs;
            push(ys, 3);
            ys[0] = 9;
            print(xs);
            print(len(xs));
            var grid: [[int]] = [[0, 0], [0, 0]];
            grid[1][0] = 5;
            print(grid);
            print(["a", "b"]);
            "#,
            &["[9, 2, 3]", "3", "[[0, 0], [5, 0]]", "[\"a\", \"b\"]"],
        );
    }

    #[test]
    fn test_methods() {
        expect_output(
            r#"
            struct Counter {
                n: int,
                fn bump(self, by: int) { self.n += by; }
                fn get(self) -> int { return self.n; }
                fn new(start: int) -> Counter { return Counter { n: start }; }
            }
            struct Holder { c: Counter }
            var c = Counter.new(5);
            c.bump(2);
            print(c.get());
            var h = Holder { c: c };
            h.c.bump(10);
            print(h.c.get());
            print(c.get());
            var cs = [Counter.new(0)];
            cs[0].bump(3);
            print(cs[0].n);
            print(Counter.new(1).get());
            "#,
            &["7", "17", "7", "3", "1"],
        );
    }

    #[test]
    fn test_struct_field_holding_function() {
        expect_value(
            "struct Op { apply: fn(int) -> int } var double = Op { apply: fn(x: int) -> int { return x * 2; } }; double.apply(21);",
            Value::Int(42),
        );
    }

    #[test]
    fn test_string_indexing_and_len() {
        expect_value("\"héllo\"[1];", Value::Char('é'));
        expect_value("len(\"héllo\");", Value::Int(5));
    }

    #[test]
    fn test_runtime_errors() {
        expect_error("1 / 0;", "Division by zero");
        expect_error("5 % 0;", "Modulo by zero");
        expect_error("var m = 5; m %= 0;", "Modulo by zero");
        expect_error("1.0 / 0.0;", "Division by zero");
        expect_error("var xs = [1, 2]; xs[2];", "Index 2 out of bounds for length 2");
        expect_error("var xs = [1, 2]; xs[-1] = 0;", "out of bounds");
        expect_error("\"ab\"[5];", "out of bounds");
        expect_error("9223372036854775807 + 1;", "Integer overflow");
        expect_error("0u - 1u;", "Integer overflow");
    }

    #[test]
    fn test_runtime_error_keeps_earlier_output() {
        let (result, output) = run_program("print(1); print(1 / 0); print(2);");
        assert!(result.is_err());
        assert_eq!(output, ["1"]);
    }

    #[test]
    fn test_global_read_before_declaration() {
        expect_error(
            "fn early() -> int { return late(); } var x = early(); var g = 1; fn late() -> int { return g; }",
            "'g' is read before its declaration",
        );
    }

    #[test]
    fn test_call_depth_limit() {
        let src = "fn down(n: int) -> int { if (n == 0) { return 0; } return down(n - 1); } down(30);";
        let tokens = Lexer::new(src).tokenize().expect("Lexing should succeed");
        let program = Parser::new(tokens).parse_program().expect("Parsing should succeed");
        let typed = sklang_typeck::check(program).expect("Type check should succeed");

        let mut limited = Interpreter::new(&typed, Config { max_call_depth: 20 });
        let err = limited.run().expect_err("Depth limit should trip");
        assert!(err.msg.contains("Maximum call depth of 20 exceeded"), "{}", err.msg);

        let mut roomy = Interpreter::new(&typed, Config { max_call_depth: 31 });
        assert_eq!(roomy.run().expect("Should fit in the limit"), Some(Value::Int(0)));
    }

    #[test]
    fn test_call_depth_beyond_thread_stack() {
        let src = "fn down(n: int) -> int { if (n == 0) { return 0; } return 1 + down(n - 1); } down(1000);";
        let tokens = Lexer::new(src).tokenize().expect("Lexing should succeed");
        let program = Parser::new(tokens).parse_program().expect("Parsing should succeed");
        let typed = sklang_typeck::check(program).expect("Type check should succeed");

        let mut interp = Interpreter::new(&typed, Config { max_call_depth: 2000 });
        assert_eq!(interp.run().expect("Should fit in the limit"), Some(Value::Int(1000)));
    }

    #[test]
    fn test_result_is_last_expression_statement() {
        expect_value("1; var x = 5; x + 1; var y = 2;", Value::Int(6));
        assert_eq!(run_program("var x = 1;").0, Ok(None));
        expect_value("print(\"hi\");", Value::Unit);
    }
}
