//! A small diagnostic model plus terminal rendering via `ariadne`.
//!
//! The pipeline crates report plain error types; the driver converts them
//! into [`Diagnostic`]s and renders them against the source text.

use ariadne::{Config, Label, Report, ReportKind, Source};
use rill_ir::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            span,
            notes: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            span,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Render a diagnostic against `text` (identified as `name`) into a string
/// suitable for a terminal.
pub fn render(name: &str, text: &str, diagnostic: &Diagnostic) -> String {
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };
    // Clamp in case the span points at EOF.
    let end = diagnostic.span.end.min(u32::try_from(text.len()).unwrap_or(u32::MAX)) as usize;
    let start = (diagnostic.span.start as usize).min(end);

    let mut builder = Report::build(kind, name, start)
        .with_config(Config::default().with_color(false))
        .with_message(&diagnostic.message)
        .with_label(Label::new((name, start..end)).with_message(&diagnostic.message));
    for note in &diagnostic.notes {
        builder = builder.with_note(note);
    }

    let mut out = Vec::new();
    match builder.finish().write((name, Source::from(text)), &mut out) {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => format!("error: {}", diagnostic.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn with_note_accumulates() {
        let diagnostic = Diagnostic::error("boom", Span::new(0, 1))
            .with_note("first")
            .with_note("second");
        assert_eq!(diagnostic.notes, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn render_includes_message_and_source_line() {
        let text = "LET x = ;\n";
        let diagnostic = Diagnostic::error("expected an expression", Span::new(8, 9));
        let rendered = render("demo.rill", text, &diagnostic);
        assert!(rendered.contains("expected an expression"), "{rendered}");
        assert!(rendered.contains("LET x = ;"), "{rendered}");
    }

    #[test]
    fn render_survives_eof_spans() {
        let text = "LET";
        let diagnostic = Diagnostic::error("unexpected end of input", Span::new(3, 4));
        let rendered = render("demo.rill", text, &diagnostic);
        assert!(rendered.contains("unexpected end of input"), "{rendered}");
    }
}
