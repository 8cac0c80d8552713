//! Diagnostic collection and rendering.
//!
//! Mirrors the original `Logger`'s `Log`/`Error`/`Report` trio, but
//! accumulates instead of writing straight to stderr so callers (tests,
//! the LSP-shaped future, the CLI) can inspect what went wrong before
//! deciding whether to print it.

use crate::token::Token;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Log,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Log => write!(f, "Log"),
            Severity::Error => write!(f, "Error"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Rendered `file@line:col` + source-line/caret block, when a token
    /// position was available at the report site.
    pub rendered_position: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pos) = &self.rendered_position {
            writeln!(f, "{pos}")?;
        }
        write!(f, "{} : {}", self.severity, self.message)
    }
}

/// Accumulates diagnostics for one compilation. Analysis and parsing keep
/// going after a non-fatal error is recorded here; only the driver decides
/// whether accumulated errors should fail the build.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    filename: String,
    source_lines: Vec<String>,
}

impl Diagnostics {
    pub fn new(filename: impl Into<String>, source: &str) -> Self {
        Diagnostics {
            entries: Vec::new(),
            filename: filename.into(),
            source_lines: source.lines().map(str::to_string).collect(),
        }
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Log,
            message: message.into(),
            rendered_position: None,
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            rendered_position: None,
        });
    }

    /// Equivalent of `Logger::Report`: a position-anchored error with a
    /// caret/tilde underline sized to the offending token's lexeme.
    pub fn report(&mut self, token: &Token, message: impl Into<String>) {
        let gutter_width = token.line.to_string().len();
        let source_line = self
            .source_lines
            .get(token.line.saturating_sub(1))
            .cloned()
            .unwrap_or_default();

        let mut rendered = String::new();
        rendered.push_str(&format!("{}@{}:{}\n", self.filename, token.line, token.col));
        rendered.push_str(&" ".repeat(gutter_width));
        rendered.push_str(" |\n");
        rendered.push_str(&format!("{} | {}\n", token.line, source_line));
        rendered.push_str(&" ".repeat(gutter_width));
        rendered.push_str(" | ");
        rendered.push_str(&" ".repeat(token.col.saturating_sub(1)));
        rendered.push('^');
        if token.lexeme.len() > 1 {
            rendered.push_str(&"~".repeat(token.lexeme.len() - 1));
        }

        self.entries.push(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            rendered_position: Some(rendered),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Print every accumulated diagnostic to the matching stream, the way
    /// the original `Logger` wrote straight through (`Log` to stdout,
    /// `Error` to stderr).
    pub fn emit(&self) {
        for d in &self.entries {
            match d.severity {
                Severity::Log => println!("{d}"),
                Severity::Error => eprintln!("{d}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn report_renders_position_and_caret() {
        let src = "int main() {\n  int x = 1;\n}\n";
        let mut diags = Diagnostics::new("test.rill", src);
        let tok = Token::new(TokenKind::Id, "x", 2, 7);
        diags.report(&tok, "redeclaration of 'x'");
        let rendered = diags.entries()[0].rendered_position.clone().unwrap();
        assert!(rendered.contains("test.rill@2:7"));
        assert!(rendered.contains("int x = 1;"));
        assert!(rendered.contains('^'));
    }

    #[test]
    fn has_errors_ignores_log_entries() {
        let mut diags = Diagnostics::new("t.rill", "");
        diags.log("informational");
        assert!(!diags.has_errors());
        diags.error("boom");
        assert!(diags.has_errors());
    }
}
