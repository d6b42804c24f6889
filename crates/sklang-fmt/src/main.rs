use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use sklang_fmt::format_program;
use sklang_lexer::Lexer;
use sklang_parser::Parser;

/// Prints SkLang source in canonical form.
#[derive(ClapParser, Debug)]
#[command(name = "sklang-fmt", version, about)]
struct Args {
    /// Exit with status 1 if the file is not already formatted
    #[arg(long, conflicts_with = "write")]
    check: bool,

    /// Rewrite the file in place
    #[arg(long)]
    write: bool,

    /// Source file to format
    file: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let src = match fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read file {}: {}", args.file.display(), e);
            return ExitCode::from(2);
        }
    };
    let tokens = match Lexer::new(&src).tokenize() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Lex error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let program = match Parser::new(tokens).parse_program() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let formatted = format_program(&program);

    if args.check {
        if normalize_newlines(&formatted) != normalize_newlines(&src) {
            eprintln!("{}: not formatted", args.file.display());
            return ExitCode::FAILURE;
        }
        println!("{}: ok", args.file.display());
    } else if args.write {
        if let Err(e) = fs::write(&args.file, formatted) {
            eprintln!("Failed to write {}: {}", args.file.display(), e);
            return ExitCode::from(2);
        }
    } else {
        print!("{}", formatted);
    }
    ExitCode::SUCCESS
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n")
}
