//! The `rill` command-line driver.

pub mod cli;
pub mod pipeline;
pub mod repl;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use rill_eval::{Evaluator, StdoutPrinter};
use rill_ir::{SharedInterner, StringInterner};
use rill_types::Analyzer;

use cli::{Command, Options, USAGE};
use pipeline::PipelineError;

pub fn run() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match Options::parse(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if options.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }
    init_tracing(options.verbose);

    match (&options.command, &options.file) {
        (Command::Repl, _) => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            match repl::run(stdin.lock(), stdout.lock()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
        (command, Some(path)) => run_file(*command, path),
        // Options::parse guarantees a file for every non-REPL command.
        (_, None) => ExitCode::FAILURE,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("RILL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_file(command: Command, path: &Path) -> ExitCode {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot read {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };
    let name = path.display().to_string();
    match execute(command, &text) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprint!("{}", rill_diagnostic::render(&name, &text, &error.into_diagnostic()));
            ExitCode::FAILURE
        }
    }
}

/// Run one command over source text, yielding what should go to stdout.
/// `run` writes program output directly as it executes.
fn execute(command: Command, text: &str) -> Result<String, PipelineError> {
    let interner: SharedInterner = Arc::new(StringInterner::new());
    match command {
        Command::Lex => {
            let tokens = rill_lexer::lex(text, &interner)?;
            let mut out = String::new();
            for token in &tokens {
                out.push_str(&format!("{} @ {}\n", token.kind, token.span));
            }
            Ok(out)
        }
        Command::Parse => {
            let source = pipeline::parse(text, &interner)?;
            Ok(format!("{source:#?}\n"))
        }
        Command::Check => {
            let source = pipeline::parse(text, &interner)?;
            Analyzer::new(interner.clone()).analyze(&source)?;
            Ok("ok\n".to_string())
        }
        Command::Emit => {
            let source = pipeline::parse(text, &interner)?;
            let typed = Analyzer::new(interner.clone()).analyze(&source)?;
            Ok(rill_codegen::generate(&typed, &interner))
        }
        Command::Run => {
            let source = pipeline::parse(text, &interner)?;
            Analyzer::new(interner.clone()).analyze(&source)?;
            let mut evaluator = Evaluator::new(interner, Arc::new(StdoutPrinter));
            evaluator.evaluate(&source)?;
            Ok(String::new())
        }
        Command::Repl => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn check_reports_ok_for_valid_source() {
        assert_eq!(execute(Command::Check, "LET x = 1;").unwrap(), "ok\n");
    }

    #[test]
    fn check_surfaces_analysis_errors() {
        let err = execute(Command::Check, "LET x: Integer = \"s\";").unwrap_err();
        assert!(matches!(err, PipelineError::Analysis(_)));
    }

    #[test]
    fn lex_lists_tokens_with_spans() {
        let out = execute(Command::Lex, "LET x;").unwrap();
        assert!(out.contains("`LET` @ 0..3"), "{out}");
        assert!(out.contains("end of input"), "{out}");
    }

    #[test]
    fn emit_round_trips_source() {
        let out = execute(Command::Emit, "LET x = 1;").unwrap();
        assert_eq!(out, "LET x: Integer = 1;\n");
    }

    #[test]
    fn run_checks_before_evaluating() {
        let err = execute(Command::Run, "log(1 + TRUE);").unwrap_err();
        assert!(matches!(err, PipelineError::Analysis(_)));
    }
}
