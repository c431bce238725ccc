//! Argument parsing for the `rill` binary.

use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: rill [OPTIONS] [COMMAND] [FILE]

Commands:
    lex <FILE>      Print the token stream
    parse <FILE>    Print the syntax tree
    check <FILE>    Type-check without running
    run <FILE>      Type-check and evaluate
    emit <FILE>     Print canonical annotated source

With a FILE and no command, the file is run. With no arguments, an
interactive session starts.

Options:
    -v, --verbose   Enable debug logging (see also RILL_LOG)
    -h, --help      Show this help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Lex,
    Parse,
    Check,
    Run,
    Emit,
    Repl,
}

impl Command {
    fn from_word(word: &str) -> Option<Command> {
        match word {
            "lex" => Some(Command::Lex),
            "parse" => Some(Command::Parse),
            "check" => Some(Command::Check),
            "run" => Some(Command::Run),
            "emit" => Some(Command::Emit),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Options {
    pub command: Command,
    pub file: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
}

impl Options {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Options, String> {
        let mut command = None;
        let mut file = None;
        let mut verbose = false;
        let mut help = false;

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "-v" | "--verbose" => verbose = true,
                "-h" | "--help" => help = true,
                _ if arg.starts_with('-') => {
                    return Err(format!("unknown option `{arg}`"));
                }
                word => {
                    if command.is_none() && file.is_none() {
                        if let Some(parsed) = Command::from_word(word) {
                            command = Some(parsed);
                            continue;
                        }
                    }
                    if file.is_some() {
                        return Err(format!("unexpected argument `{word}`"));
                    }
                    file = Some(PathBuf::from(word));
                }
            }
        }

        let command = match (command, &file) {
            (Some(command), Some(_)) => command,
            (Some(command), None) => {
                if !help {
                    return Err(format!("`{}` needs a file", command_word(command)));
                }
                command
            }
            (None, Some(_)) => Command::Run,
            (None, None) => Command::Repl,
        };

        Ok(Options {
            command,
            file,
            verbose,
            help,
        })
    }
}

fn command_word(command: Command) -> &'static str {
    match command {
        Command::Lex => "lex",
        Command::Parse => "parse",
        Command::Check => "check",
        Command::Run => "run",
        Command::Emit => "emit",
        Command::Repl => "repl",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_arguments_starts_the_repl() {
        let options = Options::parse::<&str>(&[]).unwrap();
        assert_eq!(options.command, Command::Repl);
        assert_eq!(options.file, None);
    }

    #[test]
    fn bare_file_runs_it() {
        let options = Options::parse(&["main.rill"]).unwrap();
        assert_eq!(options.command, Command::Run);
        assert_eq!(options.file, Some(PathBuf::from("main.rill")));
    }

    #[test]
    fn command_and_file() {
        let options = Options::parse(&["check", "main.rill"]).unwrap();
        assert_eq!(options.command, Command::Check);
        assert_eq!(options.file, Some(PathBuf::from("main.rill")));
    }

    #[test]
    fn command_without_file_is_an_error() {
        assert!(Options::parse(&["emit"]).is_err());
    }

    #[test]
    fn flags_can_appear_anywhere() {
        let options = Options::parse(&["--verbose", "run", "main.rill"]).unwrap();
        assert!(options.verbose);
        assert_eq!(options.command, Command::Run);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Options::parse(&["--frobnicate"]).is_err());
    }

    #[test]
    fn file_named_like_a_command_still_works_as_second_positional() {
        let options = Options::parse(&["run", "check"]).unwrap();
        assert_eq!(options.command, Command::Run);
        assert_eq!(options.file, Some(PathBuf::from("check")));
    }
}
