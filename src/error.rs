//! Error types for template compilation and extraction

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::template::FieldKind;

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum TemplateError {
    /// A mandatory placeholder captured nothing
    #[error("mandatory value for '{field}' is missing in record {record}")]
    MissingMandatoryField {
        field: String,
        record: usize,
        span: Span,
    },

    /// A placeholder declares a type outside the supported set
    #[error("unsupported type '{type_name}' for field '{field}'")]
    UnsupportedType {
        field: String,
        type_name: String,
        span: Span,
    },

    /// Captured text could not be converted to the declared type
    #[error("cannot convert '{value}' to {kind} for field '{field}' in record {record}: {reason}")]
    CoercionFailure {
        field: String,
        kind: FieldKind,
        value: String,
        reason: String,
        record: usize,
        span: Span,
    },

    /// The same placeholder name appears twice in one template
    #[error("duplicate field '{field}' in template")]
    DuplicateField {
        field: String,
        span: Span,
        first: Span,
    },

    /// The generated pattern was rejected by the regex engine
    #[error("invalid template pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl TemplateError {
    /// Name of the offending field, if the error concerns one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingMandatoryField { field, .. }
            | Self::UnsupportedType { field, .. }
            | Self::CoercionFailure { field, .. }
            | Self::DuplicateField { field, .. } => Some(field),
            Self::Pattern(_) => None,
        }
    }

    /// Span of the offending placeholder in the template text
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::MissingMandatoryField { span, .. }
            | Self::UnsupportedType { span, .. }
            | Self::CoercionFailure { span, .. }
            | Self::DuplicateField { span, .. } => Some(span),
            Self::Pattern(_) => None,
        }
    }

    /// Whether the error is confined to a single record
    pub fn is_record_local(&self) -> bool {
        matches!(
            self,
            Self::MissingMandatoryField { .. } | Self::CoercionFailure { .. }
        )
    }

    /// Format the error against the template text using ariadne
    ///
    /// Uses the template text as the report source, so the placeholder that
    /// caused the failure is underlined.
    pub fn format(&self, template: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let offset = self.span().map(|s| s.start).unwrap_or(0);
        let message = self.to_string();

        let mut report = Report::build(ReportKind::Error, filename, offset)
            .with_config(Config::default().with_color(false))
            .with_message(&message);
        match self {
            Self::DuplicateField { span, first, .. } => {
                report = report
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message("declared again here")
                            .with_color(Color::Red),
                    )
                    .with_label(
                        Label::new((filename, first.clone()))
                            .with_message("first declared here")
                            .with_color(Color::Blue),
                    );
            }
            Self::UnsupportedType { span, .. } => {
                report = report
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(&message)
                            .with_color(Color::Red),
                    )
                    .with_note("supported types: int, long, double, string");
            }
            Self::MissingMandatoryField { span, .. } | Self::CoercionFailure { span, .. } => {
                report = report.with_label(
                    Label::new((filename, span.clone()))
                        .with_message(&message)
                        .with_color(Color::Red),
                );
            }
            Self::Pattern(_) => {}
        }

        if report
            .finish()
            .write((filename, Source::from(template)), &mut buf)
            .is_err()
        {
            return message;
        }
        String::from_utf8(buf).unwrap_or(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = TemplateError::MissingMandatoryField {
            field: "ax".to_string(),
            record: 1,
            span: 0..9,
        };
        assert!(err.to_string().contains("'ax'"));
        assert_eq!(err.field(), Some("ax"));
        assert!(err.is_record_local());
    }

    #[test]
    fn test_unsupported_type_is_not_record_local() {
        let err = TemplateError::UnsupportedType {
            field: "ax".to_string(),
            type_name: "decimal".to_string(),
            span: 0..14,
        };
        assert!(err.to_string().contains("decimal"));
        assert!(!err.is_record_local());
    }

    #[test]
    fn test_format_includes_template_line() {
        let template = "Total: {sum|decimal}";
        let err = TemplateError::UnsupportedType {
            field: "sum".to_string(),
            type_name: "decimal".to_string(),
            span: 7..20,
        };
        let report = err.format(template, "day01.tpl");
        assert!(report.contains("day01.tpl"));
        assert!(report.contains("Total: {sum|decimal}"));
    }
}
