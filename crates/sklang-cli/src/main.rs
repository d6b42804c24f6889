mod common;
mod repl;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as ClapParser;
use log::debug;
use owo_colors::OwoColorize;
use sklang::{Config, DEFAULT_MAX_CALL_DEPTH};
use sklang_lexer::Lexer;
use sklang_parser::Parser;

use crate::common::{render_error, render_errors};

/// Run, check or inspect SkLang programs. Starts a REPL when no file is given.
#[derive(ClapParser, Debug)]
#[command(name = "sklang", version, about)]
struct Cli {
    /// Source file to run
    file: Option<PathBuf>,

    /// Type-check the program without running it
    #[arg(long, requires = "file")]
    check: bool,

    /// Print the token stream and exit
    #[arg(long, requires = "file", conflicts_with_all = ["check", "ast"])]
    tokens: bool,

    /// Print the parsed program in canonical form and exit
    #[arg(long, requires = "file", conflicts_with = "check")]
    ast: bool,

    /// Maximum nesting of function calls
    #[arg(long, env = "SKLANG_MAX_DEPTH", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config {
        max_call_depth: cli.max_depth,
    };
    debug!("call depth limit is {}", config.max_call_depth);

    match &cli.file {
        Some(path) => run_file(&cli, path, &config),
        None => {
            repl::start_repl(&config);
            ExitCode::SUCCESS
        }
    }
}

fn run_file(cli: &Cli, path: &Path, config: &Config) -> ExitCode {
    let src = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("Failed to read file {}: {}", path.display(), e).red()
            );
            return ExitCode::FAILURE;
        }
    };

    if cli.tokens {
        return match Lexer::new(&src).tokenize() {
            Ok(tokens) => {
                for t in tokens {
                    println!("{:>4}:{:<4} {}", t.span.line, t.span.col, t.kind.describe());
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                render_error(&src, &e);
                ExitCode::FAILURE
            }
        };
    }

    if cli.ast {
        let program = Lexer::new(&src)
            .tokenize()
            .and_then(|tokens| Parser::new(tokens).parse_program());
        return match program {
            Ok(program) => {
                print!("{}", sklang_fmt::format_program(&program));
                ExitCode::SUCCESS
            }
            Err(e) => {
                render_error(&src, &e);
                ExitCode::FAILURE
            }
        };
    }

    if cli.check {
        return match sklang::check(&src) {
            Ok(_) => {
                println!("{}: ok", path.display());
                ExitCode::SUCCESS
            }
            Err(errors) => {
                render_errors(&src, &errors);
                ExitCode::FAILURE
            }
        };
    }

    match sklang::run_with(&src, config) {
        Ok(outcome) => {
            for line in &outcome.output {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            for line in &failure.output {
                println!("{}", line);
            }
            render_errors(&src, &failure.diagnostics);
            ExitCode::FAILURE
        }
    }
}
