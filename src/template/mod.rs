//! Line templates for extracting typed records from text
//!
//! A template is literal text with typed placeholders:
//!
//! ```text
//! Button A: X+{ax|double}, Y+{ay|long}
//! Prize: X={rx|string}, Y={ry|string?}
//! ```
//!
//! Each placeholder captures a run of characters other than commas and
//! whitespace. A trailing `?` on the type makes the field optional: a missing
//! or unconvertible value becomes [`Value::Null`] instead of an error.
//! Templates spanning several lines match the same number of input lines,
//! and an input may contain many such blocks.
//!
//! # Example
//!
//! ```rust
//! use puzzle_kit::template::{Template, Value};
//!
//! let template = Template::compile("Prize: X={rx|int}, Y={ry|int}").unwrap();
//! let records = template.parse("Prize: X=8400, Y=5400\nPrize: X=12748, Y=12176").unwrap();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].get("ry"), Some(&Value::Int(12176)));
//! ```

mod coercion;
mod config;
pub mod lexer;
mod record;
mod set;

use std::collections::HashMap;
use std::str::FromStr;

use regex::{Captures, Regex};
use tracing::{debug, trace, warn};

pub use coercion::{coerce, CoerceError, FieldKind, Value};
pub use config::{ErrorPolicy, ParseConfig};
pub use record::Record;
pub use set::{TemplateSet, TemplateSetError};

use crate::error::{Span, TemplateError};
use lexer::{lex, Token};

/// Capture class for a mandatory placeholder
const MANDATORY_CAPTURE: &str = r"([^,\s]+)";

/// Capture class for a mandatory placeholder enclosed by literal text
///
/// Both neighbors are visible characters (`tag={tag|string};`), so the slot
/// can be located even when empty and reported by name.
const ENCLOSED_CAPTURE: &str = r"([^,\s]*)";

/// Capture class for an optional placeholder
const OPTIONAL_CAPTURE: &str = r"([^,\s]+)?";

/// Line break in the compiled pattern
const LINE_BREAK: &str = r"\r?\n";

/// Metadata for one placeholder, resolved at compile time
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub optional: bool,
    /// Span of the whole placeholder in the template text
    pub span: Span,
}

impl FieldSpec {
    /// The type token as written, including the `?` marker
    pub fn type_token(&self) -> String {
        if self.optional {
            format!("{}?", self.kind)
        } else {
            self.kind.to_string()
        }
    }
}

/// A compiled line template
///
/// Immutable once built; one template can parse any number of inputs.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    regex: Regex,
    fields: Vec<FieldSpec>,
}

/// Compile template text into a reusable [`Template`]
pub fn compile(text: &str) -> Result<Template, TemplateError> {
    Template::compile(text)
}

impl Template {
    /// Compile template text
    ///
    /// Trailing line breaks are ignored so a template written as a block
    /// still matches the last block of an input without a final newline.
    /// Malformed placeholders are treated as literal text.
    pub fn compile(text: &str) -> Result<Self, TemplateError> {
        let source = text.trim_end_matches(['\r', '\n']);

        let mut pattern = String::with_capacity(source.len() * 2);
        let mut fields: Vec<FieldSpec> = Vec::new();
        let mut seen: HashMap<&str, Span> = HashMap::new();

        let tokens: Vec<_> = lex(source).collect();
        for (position, (token, span)) in tokens.iter().cloned().enumerate() {
            match token {
                Token::Placeholder(placeholder) => {
                    if let Some(first) = seen.get(placeholder.name) {
                        return Err(TemplateError::DuplicateField {
                            field: placeholder.name.to_string(),
                            span,
                            first: first.clone(),
                        });
                    }
                    seen.insert(placeholder.name, span.clone());

                    let capture = if placeholder.optional {
                        OPTIONAL_CAPTURE
                    } else if is_enclosed(&tokens, position) {
                        ENCLOSED_CAPTURE
                    } else {
                        MANDATORY_CAPTURE
                    };
                    pattern.push_str(capture);
                    fields.push(FieldSpec {
                        name: placeholder.name.to_string(),
                        kind: FieldKind::from_token(placeholder.type_name),
                        optional: placeholder.optional,
                        span,
                    });
                }
                Token::Newline => pattern.push_str(LINE_BREAK),
                Token::Text(text) => pattern.push_str(&regex::escape(text)),
                Token::Brace => pattern.push_str(&regex::escape("{")),
            }
        }

        let regex = Regex::new(&pattern)?;
        debug!(fields = fields.len(), pattern = %regex, "compiled template");

        Ok(Self {
            source: source.to_string(),
            regex,
            fields,
        })
    }

    /// The template text this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The generated regular expression
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Placeholders in template order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a placeholder by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Extract one record per match of the template in `input`
    ///
    /// Any failing field aborts the whole call.
    pub fn parse(&self, input: &str) -> Result<Vec<Record>, TemplateError> {
        self.parse_with(input, &ParseConfig::default())
    }

    /// Extract the first record, if any block matches
    pub fn parse_first(&self, input: &str) -> Result<Option<Record>, TemplateError> {
        let config = ParseConfig::new().with_limit(1);
        Ok(self.parse_with(input, &config)?.into_iter().next())
    }

    /// Extract records with an explicit configuration
    pub fn parse_with(
        &self,
        input: &str,
        config: &ParseConfig,
    ) -> Result<Vec<Record>, TemplateError> {
        let mut records = Vec::new();
        let mut matched = 0;

        for captures in self.regex.captures_iter(input) {
            if config.limit.is_some_and(|limit| records.len() >= limit) {
                break;
            }
            // A template made only of optional placeholders can match nothing
            if captures.get(0).is_some_and(|m| m.as_str().is_empty()) {
                continue;
            }
            let index = matched;
            matched += 1;

            match self.extract(index, &captures) {
                Ok(record) => records.push(record),
                Err(err)
                    if config.error_policy == ErrorPolicy::SkipRecord
                        && err.is_record_local() =>
                {
                    warn!(record = index, error = %err, "skipping record");
                }
                Err(err) => return Err(err),
            }
        }

        debug!(records = records.len(), "parsed input");
        Ok(records)
    }

    fn extract(&self, index: usize, captures: &Captures<'_>) -> Result<Record, TemplateError> {
        let mut record = Record::with_capacity(self.fields.len());

        // Placeholders are the only capture groups, numbered from 1
        for (group, field) in (1..).zip(&self.fields) {
            if let FieldKind::Unsupported(type_name) = &field.kind {
                return Err(TemplateError::UnsupportedType {
                    field: field.name.clone(),
                    type_name: type_name.clone(),
                    span: field.span.clone(),
                });
            }

            let raw = captures
                .get(group)
                .map(|m| m.as_str())
                .filter(|s| !s.trim().is_empty());
            trace!(record = index, field = %field.name, ?raw, "captured");

            let value = match raw {
                Some(raw) => coercion::coerce_kind(raw, &field.kind, field.optional)
                    .map_err(|err| self.coercion_error(index, field, err))?,
                None if field.optional => Value::Null,
                None => {
                    return Err(TemplateError::MissingMandatoryField {
                        field: field.name.clone(),
                        record: index,
                        span: field.span.clone(),
                    })
                }
            };
            record.push(field.name.clone(), value);
        }

        Ok(record)
    }

    fn coercion_error(&self, index: usize, field: &FieldSpec, err: CoerceError) -> TemplateError {
        match err {
            CoerceError::Unsupported(type_name) => TemplateError::UnsupportedType {
                field: field.name.clone(),
                type_name,
                span: field.span.clone(),
            },
            CoerceError::Invalid {
                kind,
                value,
                reason,
            } => TemplateError::CoercionFailure {
                field: field.name.clone(),
                kind,
                value,
                reason,
                record: index,
                span: field.span.clone(),
            },
        }
    }
}

/// Whether the placeholder at `position` sits between two visible literal characters
fn is_enclosed(tokens: &[(Token<'_>, Span)], position: usize) -> bool {
    let visible_before = position
        .checked_sub(1)
        .and_then(|i| tokens.get(i))
        .is_some_and(|(token, _)| match token {
            Token::Text(text) => text.chars().last().is_some_and(|c| !c.is_whitespace()),
            Token::Brace => true,
            Token::Placeholder(_) | Token::Newline => false,
        });
    let visible_after = tokens
        .get(position + 1)
        .is_some_and(|(token, _)| match token {
            Token::Text(text) => text.chars().next().is_some_and(|c| !c.is_whitespace()),
            Token::Brace => true,
            Token::Placeholder(_) | Token::Newline => false,
        });
    visible_before && visible_after
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLAW_TEMPLATE: &str = "Button A: X+{ax|double}, Y+{ay|long}\n\
                                 Button B: X+{bx|double}, Y+{by|long}\n\
                                 Prize: X={rx|string}, Y={ry|string}";

    #[test]
    fn test_compile_collects_fields_in_order() {
        let template = Template::compile(CLAW_TEMPLATE).unwrap();
        let names: Vec<_> = template.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["ax", "ay", "bx", "by", "rx", "ry"]);
        assert_eq!(template.field("ay").unwrap().kind, FieldKind::Long);
        assert_eq!(template.field("rx").unwrap().kind, FieldKind::Text);
    }

    #[test]
    fn test_literal_metacharacters_are_escaped() {
        let template = Template::compile("X+{a|int} (total*{b|int}?)").unwrap();
        let records = template.parse("X+3 (total*4?)").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("a"), Some(&Value::Int(3)));
        assert_eq!(records[0].get("b"), Some(&Value::Int(4)));

        // '+' must not act as a quantifier on 'X'
        assert!(template.parse("XX3 (total*4?)").unwrap().is_empty());
    }

    #[test]
    fn test_single_line_record() {
        let template = Template::compile("Prize: X={rx|string}, Y={ry|string}").unwrap();
        let records = template
            .parse("Prize: X=12345.67, Y=SomePrizeHere")
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("rx"), Some(&Value::Text("12345.67".into())));
        assert_eq!(records[0].get("ry"), Some(&Value::Text("SomePrizeHere".into())));
    }

    #[test]
    fn test_placeholder_stops_at_comma_and_whitespace() {
        let template = Template::compile("{a|string} {b|string}").unwrap();
        let records = template.parse("left,over right").unwrap();
        assert_eq!(records[0].get("a"), Some(&Value::Text("over".into())));
        assert_eq!(records[0].get("b"), Some(&Value::Text("right".into())));
    }

    #[test]
    fn test_bare_placeholder_splits_on_separators() {
        let template = Template::compile("{n|int}").unwrap();
        let records = template.parse("1, 2,3").unwrap();
        let values: Vec<_> = records.iter().filter_map(|r| r.get("n")?.as_i32()).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_enclosed_mandatory_slot_allows_empty_capture() {
        let template = Template::compile("id={id|int} tag={tag|string};").unwrap();
        assert_eq!(template.pattern(), r"id=([^,\s]+) tag=([^,\s]*);");
    }

    #[test]
    fn test_trailing_whitespace_between_records() {
        let template = Template::compile("{x|int} {y|int}").unwrap();
        assert_eq!(template.parse("1 2 \n3 4").unwrap().len(), 2);

        let records = template.parse("1 2 3").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_extra_tokens_after_placeholder() {
        let template = Template::compile("Button A: X+{ax|int}, Y+{ay|int}").unwrap();
        let records = template
            .parse("Button A: X+1, Y+2 pressed twice\nButton A: X+3, Y+4")
            .unwrap();
        let ys: Vec<_> = records.iter().filter_map(|r| r.get("ay")?.as_i32()).collect();
        assert_eq!(ys, vec![2, 4]);
    }

    #[test]
    fn test_record_numbers_ignore_empty_matches() {
        let template = Template::compile("{n|int}").unwrap();
        let err = template.parse(", x").unwrap_err();
        assert!(matches!(err, TemplateError::CoercionFailure { record: 0, .. }));

        let optional = Template::compile("{n|int?}").unwrap();
        let records = optional.parse(",5,,7").unwrap();
        let values: Vec<_> = records.iter().filter_map(|r| r.get("n")?.as_i32()).collect();
        assert_eq!(values, vec![5, 7]);
    }

    #[test]
    fn test_malformed_placeholder_matches_literally() {
        let template = Template::compile("a{b c|int}={v|int}").unwrap();
        assert_eq!(template.fields().len(), 1);
        let records = template.parse("a{b c|int}=5").unwrap();
        assert_eq!(records[0].get("v"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_optional_field_absent_is_null() {
        let template = Template::compile("id={id|int} tag={tag|string?};").unwrap();
        let records = template.parse("id=5 tag=;").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("tag"), Some(&Value::Null));
    }

    #[test]
    fn test_mandatory_field_absent_is_error() {
        let template = Template::compile("id={id|int} tag={tag|string};").unwrap();
        let err = template.parse("id=5 tag=;").unwrap_err();
        match err {
            TemplateError::MissingMandatoryField { field, record, .. } => {
                assert_eq!(field, "tag");
                assert_eq!(record, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_type_is_fatal_even_when_optional() {
        let template = Template::compile("n={n|decimal?}").unwrap();
        let err = template.parse("n=1").unwrap_err();
        assert!(matches!(err, TemplateError::UnsupportedType { ref field, .. } if field == "n"));
    }

    #[test]
    fn test_nullable_coercion_failure_is_null() {
        let template = Template::compile("Y={ry|long?}").unwrap();
        let records = template.parse("Y=ContactUs").unwrap();
        assert_eq!(records[0].get("ry"), Some(&Value::Null));
    }

    #[test]
    fn test_coercion_failure_is_fatal() {
        let template = Template::compile("Y={ry|long}").unwrap();
        let err = template.parse("Y=ContactUs").unwrap_err();
        match err {
            TemplateError::CoercionFailure { field, value, .. } => {
                assert_eq!(field, "ry");
                assert_eq!(value, "ContactUs");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = Template::compile("{a|int},{a|int}").unwrap_err();
        match err {
            TemplateError::DuplicateField { field, span, first } => {
                assert_eq!(field, "a");
                assert_eq!(first, 0..7);
                assert_eq!(span, 8..15);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_field_names_may_start_with_digit() {
        let template = Template::compile("{1st|int}/{2nd|int}").unwrap();
        let records = template.parse("10/20").unwrap();
        assert_eq!(records[0].get("1st"), Some(&Value::Int(10)));
        assert_eq!(records[0].get("2nd"), Some(&Value::Int(20)));
    }

    #[test]
    fn test_trailing_newline_ignored() {
        let template = Template::compile("a={a|int}\n").unwrap();
        assert_eq!(template.source(), "a={a|int}");
        assert_eq!(template.parse("a=1").unwrap().len(), 1);
    }

    #[test]
    fn test_crlf_input_matches() {
        let template = Template::compile("a={a|int}\nb={b|int}").unwrap();
        let records = template.parse("a=1\r\nb=2\r\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_skip_record_policy() {
        let template = Template::compile("v={v|int};").unwrap();
        let config = ParseConfig::new().skip_invalid();
        let records = template.parse_with("v=1; v=x; v=3;", &config).unwrap();
        let values: Vec<_> = records.iter().map(|r| r.get("v").cloned()).collect();
        assert_eq!(values, vec![Some(Value::Int(1)), Some(Value::Int(3))]);
    }

    #[test]
    fn test_skip_record_policy_keeps_unsupported_fatal() {
        let template = Template::compile("v={v|bigint};").unwrap();
        let config = ParseConfig::new().skip_invalid();
        assert!(template.parse_with("v=1;", &config).is_err());
    }

    #[test]
    fn test_parse_first() {
        let template = Template::compile("v={v|int};").unwrap();
        let first = template.parse_first("v=1; v=x;").unwrap();
        assert_eq!(first.unwrap().get("v"), Some(&Value::Int(1)));
        assert!(template.parse_first("nothing here").unwrap().is_none());
    }

    #[test]
    fn test_type_token_round_trip() {
        let template = Template::compile("{a|Int?}").unwrap();
        assert_eq!(template.fields()[0].type_token(), "int?");
    }

    #[test]
    fn test_from_str() {
        let template: Template = "n={n|int}".parse().unwrap();
        assert_eq!(template.fields().len(), 1);
    }
}
