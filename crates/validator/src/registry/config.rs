//! Serializable registry configuration
//!
//! A [`RegistryConfig`] describes error entries as plain data, so message
//! catalogs can live in JSON next to the application config:
//!
//! ```json
//! {
//!   "formatter": "upper",
//!   "entries": {
//!     "min_length": { "message": "{} is too short" },
//!     "required":   { "message": "{} must be set", "label": "field" }
//!   }
//! }
//! ```
//!
//! Formatters are referenced by name and resolved against the formatters
//! registered in code on the [`ErrorRegistry`](super::ErrorRegistry).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One error entry as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Message template with a single `{}` slot.
    pub message: String,

    /// Label shown when the failure carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Name of the formatter for this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
}

impl EntryConfig {
    /// Creates an entry with only a template.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            label: None,
            formatter: None,
        }
    }
}

/// Registry configuration merged over the built-in baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry-level formatter name, used by entries without their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,

    /// Entries keyed by error key.
    pub entries: BTreeMap<String, EntryConfig>,
}

impl RegistryConfig {
    /// Parses a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_full_document() {
        let config = RegistryConfig::from_json(
            r#"{
                "formatter": "upper",
                "entries": {
                    "min_length": { "message": "{} is too short" },
                    "required": { "message": "{} must be set", "label": "field", "formatter": "plain" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.formatter.as_deref(), Some("upper"));
        assert_eq!(config.entries.len(), 2);
        assert_eq!(
            config.entries["required"],
            EntryConfig {
                message: "{} must be set".into(),
                label: Some("field".into()),
                formatter: Some("plain".into()),
            }
        );
        assert_eq!(config.entries["min_length"], EntryConfig::new("{} is too short"));
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(RegistryConfig::from_json("{}").unwrap(), RegistryConfig::default());
    }

    #[test]
    fn entry_without_message_is_rejected() {
        assert!(RegistryConfig::from_json(r#"{"entries": {"x": {}}}"#).is_err());
    }
}
