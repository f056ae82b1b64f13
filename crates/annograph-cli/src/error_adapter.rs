//! Error adapter for converting AnnographError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's report formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use annograph::AnnographError;

/// Adapter giving an [`AnnographError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a AnnographError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            AnnographError::Io(_) => "annograph::io",
            AnnographError::MissingInput(_) => "annograph::input",
            AnnographError::CreateOutput { .. } => "annograph::output",
            AnnographError::Pattern { .. } => "annograph::pattern",
            AnnographError::Config(_) => "annograph::config",
            AnnographError::Lemmatizer(_) => "annograph::lemmatizer",
            AnnographError::Document { .. } => "annograph::document",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            AnnographError::MissingInput(_) => "pass an existing directory with --input",
            AnnographError::Lemmatizer(_) => {
                "install mystem or run with --lemmatizer plain"
            }
            AnnographError::Document { .. } => {
                "run without --fail-fast to skip failing documents"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_missing_input_code_and_help() {
        let err = AnnographError::MissingInput(PathBuf::from("data"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.to_string(), "input directory `data` does not exist");
        assert_eq!(adapter.code().unwrap().to_string(), "annograph::input");
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_config_error_has_no_help() {
        let err = AnnographError::Config("bad color".to_string());
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "annograph::config");
        assert!(adapter.help().is_none());
    }

    #[test]
    fn test_report_renders() {
        let err = AnnographError::MissingInput(PathBuf::from("data"));
        let mut out = String::new();
        miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor())
            .render_report(&mut out, &ErrorAdapter(&err))
            .unwrap();

        assert!(out.contains("annograph::input"));
        assert!(out.contains("does not exist"));
    }
}
