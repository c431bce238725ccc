//! Interactive session.
//!
//! Single lines that parse cleanly are evaluated immediately. A line that
//! leaves the parser unsatisfied (an open `DO`, say) starts a multi-line
//! buffer, submitted by entering an empty line.

use std::io::{BufRead, Write};
use std::sync::Arc;

use rill_eval::{StdoutPrinter, Value};

use crate::pipeline::Session;

pub fn run<R: BufRead, W: Write>(input: R, mut output: W) -> std::io::Result<()> {
    let mut session = Session::new(Arc::new(StdoutPrinter));
    let mut buffer = String::new();

    write!(output, "> ")?;
    output.flush()?;
    for line in input.lines() {
        let line = line?;
        let submitted = if line.trim().is_empty() {
            !buffer.is_empty()
        } else {
            buffer.push_str(&line);
            buffer.push('\n');
            !session.looks_incomplete(&buffer)
        };

        if submitted {
            let text = std::mem::take(&mut buffer);
            evaluate(&mut session, &text, &mut output)?;
        }

        write!(output, "{}", if buffer.is_empty() { "> " } else { "| " })?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}

fn evaluate<W: Write>(session: &mut Session, text: &str, output: &mut W) -> std::io::Result<()> {
    match session.eval(text) {
        Ok(Value::Nil) => Ok(()),
        Ok(value) => writeln!(output, "{}", value.print(session.interner())),
        Err(error) => {
            let rendered = rill_diagnostic::render("repl", text, &error.into_diagnostic());
            write!(output, "{rendered}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(input: &str) -> String {
        let mut output = Vec::new();
        run(input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn single_lines_evaluate_immediately() {
        let output = transcript("1 + 2;\n");
        assert!(output.contains('3'), "{output}");
    }

    #[test]
    fn bindings_persist_across_lines() {
        let output = transcript("LET x = 2;\nx * x;\n");
        assert!(output.contains('4'), "{output}");
    }

    #[test]
    fn multi_line_input_is_submitted_by_an_empty_line() {
        let output = transcript("DEF f() DO\nRETURN 7;\nEND\n\nf();\n");
        assert!(output.contains('7'), "{output}");
    }

    #[test]
    fn errors_are_reported_and_the_session_continues() {
        let output = transcript("missing;\n1 + 1;\n");
        assert!(output.contains("unbound name"), "{output}");
        assert!(output.contains('2'), "{output}");
    }

    #[test]
    fn continuation_prompt_marks_open_blocks() {
        let output = transcript("IF TRUE DO\nEND\n\n");
        assert!(output.contains("| "), "{output}");
    }
}
