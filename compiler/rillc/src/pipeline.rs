//! Shared plumbing: one error type across all pipeline stages and a
//! persistent session for incremental evaluation.

use std::sync::Arc;

use rill_diagnostic::Diagnostic;
use rill_eval::{EvalError, Evaluator, SharedPrintHandler, Value};
use rill_ir::{SharedInterner, Source, Span, StringInterner};
use rill_lexer::LexError;
use rill_parse::{ParseError, Parser};
use rill_types::{AnalysisError, Analyzer};

#[derive(Debug)]
pub enum PipelineError {
    Lex(LexError),
    Parse(ParseError),
    Analysis(AnalysisError),
    Eval(EvalError),
}

impl From<LexError> for PipelineError {
    fn from(err: LexError) -> Self {
        PipelineError::Lex(err)
    }
}

impl From<ParseError> for PipelineError {
    fn from(err: ParseError) -> Self {
        PipelineError::Parse(err)
    }
}

impl From<AnalysisError> for PipelineError {
    fn from(err: AnalysisError) -> Self {
        PipelineError::Analysis(err)
    }
}

impl From<EvalError> for PipelineError {
    fn from(err: EvalError) -> Self {
        PipelineError::Eval(err)
    }
}

impl PipelineError {
    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            PipelineError::Lex(err) => Diagnostic::error(err.to_string(), err.span),
            PipelineError::Parse(err) => {
                let span = err.span;
                Diagnostic::error(err.message, span)
            }
            PipelineError::Analysis(err) => {
                Diagnostic::error(err.kind.to_string(), err.span())
                    .with_note(format!("in this {}", err.node.kind))
            }
            PipelineError::Eval(err) => {
                let diagnostic = Diagnostic::error(
                    err.kind.to_string(),
                    err.node.map_or(Span::DUMMY, |node| node.span),
                );
                match err.node {
                    Some(node) => diagnostic.with_note(format!("in this {}", node.kind)),
                    None => diagnostic,
                }
            }
        }
    }
}

pub fn parse(text: &str, interner: &StringInterner) -> Result<Source, PipelineError> {
    let tokens = rill_lexer::lex(text, interner)?;
    Ok(Parser::new(&tokens, interner).parse_source()?)
}

/// Persistent interner plus analyzer and evaluator scopes, so consecutive
/// inputs see each other's bindings.
pub struct Session {
    interner: SharedInterner,
    analyzer: Analyzer,
    evaluator: Evaluator,
}

impl Session {
    pub fn new(handler: SharedPrintHandler) -> Self {
        let interner: SharedInterner = Arc::new(StringInterner::new());
        let analyzer = Analyzer::new(interner.clone());
        let evaluator = Evaluator::new(interner.clone(), handler);
        Session {
            interner,
            analyzer,
            evaluator,
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Lex, parse, type-check, and evaluate one input.
    pub fn eval(&mut self, text: &str) -> Result<Value, PipelineError> {
        let source = parse(text, &self.interner)?;
        self.analyzer.analyze(&source)?;
        Ok(self.evaluator.evaluate(&source)?)
    }

    /// True when the input only fails because more lines are expected.
    pub fn looks_incomplete(&self, text: &str) -> bool {
        let Ok(tokens) = rill_lexer::lex(text, &self.interner) else {
            return false;
        };
        Parser::new(&tokens, &self.interner).parse_source().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rill_eval::BufferPrinter;

    #[test]
    fn session_keeps_bindings_between_inputs() {
        let printer = BufferPrinter::new();
        let mut session = Session::new(printer.clone());
        session.eval("LET x = 1;").unwrap();
        session.eval("log(x + 1);").unwrap();
        assert_eq!(printer.lines(), vec!["2"]);
    }

    #[test]
    fn session_reports_static_errors_before_running() {
        let printer = BufferPrinter::new();
        let mut session = Session::new(printer.clone());
        let err = session.eval("log(missing);").unwrap_err();
        assert!(matches!(err, PipelineError::Analysis(_)));
        assert_eq!(printer.lines(), Vec::<String>::new());
    }

    #[test]
    fn incomplete_input_is_detected() {
        let printer = BufferPrinter::new();
        let session = Session::new(printer);
        assert!(session.looks_incomplete("DEF f() DO"));
        assert!(!session.looks_incomplete("LET x = 1;"));
    }

    #[test]
    fn errors_become_diagnostics_with_spans() {
        let printer = BufferPrinter::new();
        let mut session = Session::new(printer);
        let err = session.eval("LET x = @;").unwrap_err();
        let diagnostic = err.into_diagnostic();
        assert_eq!(diagnostic.span, Span::new(8, 9));
    }
}
