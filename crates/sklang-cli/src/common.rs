use owo_colors::OwoColorize;
use sklang_syntax::error::Error;

/// Prints a diagnostic with the offending source line and a caret.
pub fn render_error(source: &str, err: &Error) {
    eprintln!("{}: {}", err.kind.label().red().bold(), err.msg.red());
    if let Some(span) = err.span {
        eprintln!("  --> line {}, column {}", span.line, span.col);
        if let Some(src_line) = source.lines().nth(span.line.saturating_sub(1)) {
            let line_num_str = format!("{:3} | ", span.line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = " ".repeat(line_num_str.len() + span.col.saturating_sub(1));
            marker.push_str(&"^".repeat(span.len.max(1)));
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
    provide_error_suggestions(&err.msg);
}

pub fn render_errors(source: &str, errors: &[Error]) {
    for err in errors {
        render_error(source, err);
    }
    if errors.len() > 1 {
        eprintln!("{}", format!("{} errors found", errors.len()).red().bold());
    }
}

pub fn provide_error_suggestions(err_msg: &str) {
    if err_msg.contains("Undefined variable") {
        eprintln!("{}", "Help: Did you forget to declare this variable with 'var'?".yellow());
        eprintln!("    {}", "Example: var count = 0;".bright_black());
    } else if err_msg.contains("Type mismatch") {
        eprintln!("{}", "Help: SkLang never converts between types implicitly.".yellow());
        eprintln!("    {}", "Types: int, uint, float, char, bool, string, [T], fn(T) -> R".bright_black());
    } else if err_msg.contains("same numeric type") {
        eprintln!("{}", "Help: Both operands must have the same type, e.g. 1 + 2 or 1.0 + 2.0.".yellow());
    } else if err_msg.contains("Cannot infer the element type") {
        eprintln!("{}", "Help: Annotate the variable, e.g. var xs: [int] = [];".yellow());
    } else if err_msg.contains("must return a value") {
        eprintln!("{}", "Help: Add a 'return' on every path, or an 'else' branch that returns.".yellow());
    } else if err_msg.contains("outside of loop") {
        eprintln!("{}", "Help: 'break' and 'continue' can only be used inside 'for' or 'while' loops.".yellow());
    } else if err_msg.contains("must be called as") || err_msg.contains("must be called on a value") {
        eprintln!("{}", "Help: Call static methods as Type.method(...) and instance methods as value.method(...).".yellow());
    } else if err_msg.contains("by zero") {
        eprintln!("{}", "Help: Check the divisor before dividing.".yellow());
    } else if err_msg.contains("out of bounds") {
        eprintln!("{}", "Help: Indices start at 0; use len() to check the size first.".yellow());
    } else if err_msg.contains("Maximum call depth") {
        eprintln!("{}", "Help: Check the recursion's base case, or raise the limit with --max-depth.".yellow());
    } else if err_msg.contains("nesting too deep") {
        eprintln!("{}", "Help: Split the expression into smaller parts stored in variables.".yellow());
    } else if err_msg.contains("Malformed number literal") {
        eprintln!("{}", "Help: Separate the number from the following name with an operator or space.".yellow());
    } else if err_msg.contains("Expected ';'") {
        eprintln!("{}", "Help: Statements end with ';'.".yellow());
    }
}
