//! Interactive session.
//!
//! SkLang checks whole programs, so the REPL keeps the accepted submissions
//! as one growing program. Each new submission is appended, the session is
//! re-checked and re-run from the start, and only output that was not shown
//! before is printed. A submission that fails is dropped from the session.

use std::io::{self, BufRead, Write};

use log::debug;
use owo_colors::OwoColorize;
use sklang::{Config, Value};
use sklang_lexer::Lexer;
use sklang_parser::Parser;
use sklang_syntax::ast::{Item, StmtKind};
use sklang_syntax::token::TokenKind;

use crate::common::render_errors;

#[derive(Default)]
struct Session {
    /// Source of every accepted submission
    source: String,
    /// Number of output lines already shown
    shown: usize,
}

impl Session {
    fn submit(&mut self, input: &str, config: &Config) {
        let mut candidate = self.source.clone();
        candidate.push_str(input);
        if !candidate.ends_with('\n') {
            candidate.push('\n');
        }
        match sklang::run_with(&candidate, config) {
            Ok(outcome) => {
                for line in outcome.output.iter().skip(self.shown) {
                    println!("{}", line);
                }
                self.shown = outcome.output.len();
                self.source = candidate;
                if let Some(value) = outcome.value {
                    if value != Value::Unit && ends_with_expression(input) {
                        println!("{}", value.to_string().bright_blue());
                    }
                }
            }
            Err(failure) => {
                for line in failure.output.iter().skip(self.shown) {
                    println!("{}", line);
                }
                render_errors(&candidate, &failure.diagnostics);
            }
        }
        debug!("session is {} bytes, {} lines shown", self.source.len(), self.shown);
    }
}

pub fn start_repl(config: &Config) {
    println!("{}", "SkLang REPL. Type :help for help, :quit to exit.".bold().green());

    let mut session = Session::default();
    let mut buffer = String::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock();
    loop {
        let prompt = if buffer.is_empty() { "sk> " } else { "... " };
        print!("{}", prompt.cyan());
        let _ = io::stdout().flush();

        let mut line = String::new();
        match lines.read_line(&mut line) {
            Ok(0) => {
                println!("\nGoodbye.");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "input error".red(), e);
                break;
            }
        }
        let trimmed = line.trim();

        if buffer.is_empty() && trimmed.starts_with(':') {
            match trimmed {
                ":quit" | ":q" | ":exit" => {
                    println!("Goodbye.");
                    break;
                }
                ":help" | ":h" => print_help(),
                ":reset" => {
                    session = Session::default();
                    println!("{}", "Session reset.".yellow());
                }
                ":source" => {
                    if session.source.is_empty() {
                        println!("{}", "<empty session>".dimmed());
                    } else {
                        print!("{}", session.source);
                    }
                }
                _ => println!("{}", "Unknown command. Type :help.".red()),
            }
            continue;
        }
        if buffer.is_empty() && trimmed.is_empty() {
            continue;
        }

        buffer.push_str(&line);
        if !is_complete(&buffer) {
            continue;
        }
        session.submit(&buffer, config);
        buffer.clear();
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}    {}", ":help".yellow(), "Show this help");
    println!("  {}    {}", ":quit".yellow(), "Exit the REPL");
    println!("  {}   {}", ":reset".yellow(), "Forget every declaration and variable");
    println!("  {}  {}", ":source".yellow(), "Print the session so far");
    println!("Enter declarations and statements ending in ';'. Unclosed braces continue on the next line.");
}

/// Whether every bracket in `input` is closed. Input that does not lex is
/// complete so the error gets reported.
fn is_complete(input: &str) -> bool {
    let Ok(tokens) = Lexer::new(input).tokenize() else {
        return true;
    };
    let mut depth = 0i32;
    for tk in &tokens {
        match tk.kind {
            TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => depth += 1,
            TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}

/// Whether the submission's last item is an expression statement, whose
/// value is worth echoing.
fn ends_with_expression(input: &str) -> bool {
    let program = Lexer::new(input)
        .tokenize()
        .and_then(|tokens| Parser::new(tokens).parse_program());
    match program {
        Ok(p) => matches!(p.items.last(), Some(Item::Stmt(s)) if matches!(s.kind, StmtKind::Expr(_))),
        Err(_) => false,
    }
}
