//! Named templates loaded from TOML
//!
//! ```toml
//! [metadata]
//! name = "claw machines"
//!
//! [templates]
//! machine = """
//! Button A: X+{ax|long}, Y+{ay|long}
//! Button B: X+{bx|long}, Y+{by|long}
//! Prize: X={px|long}, Y={py|long}
//! """
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use super::Template;
use crate::error::TemplateError;

/// Errors that can occur when loading or using a template set
#[derive(Error, Debug)]
pub enum TemplateSetError {
    #[error("Failed to read template set file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse template set TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unknown template '{name}' (available: {available})")]
    UnknownTemplate { name: String, available: String },
    #[error("template '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },
}

/// A collection of template texts keyed by name
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    /// Optional name for the set
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Template name -> template text
    pub templates: BTreeMap<String, String>,
}

/// TOML structure for deserializing template sets
#[derive(Deserialize)]
struct TomlTemplateSet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    templates: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl TemplateSet {
    /// Load a template set from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, TemplateSetError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Raw text of a template
    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(|s| s.as_str())
    }

    /// Template names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|k| k.as_str())
    }

    /// Raw text of a template, failing with the list of known names
    pub fn text(&self, name: &str) -> Result<&str, TemplateSetError> {
        self.get(name).ok_or_else(|| TemplateSetError::UnknownTemplate {
            name: name.to_string(),
            available: self.names().collect::<Vec<_>>().join(", "),
        })
    }

    /// Compile the named template
    pub fn compile(&self, name: &str) -> Result<Template, TemplateSetError> {
        let text = self.text(name)?;
        Template::compile(text).map_err(|source| TemplateSetError::Template {
            name: name.to_string(),
            source,
        })
    }
}

impl FromStr for TemplateSet {
    type Err = TemplateSetError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let parsed: TomlTemplateSet = toml::from_str(content)?;

        Ok(TemplateSet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            templates: parsed.templates,
        })
    }
}
