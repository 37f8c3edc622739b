use pagedoc_core::page_document::{DocumentVersion, MAX_DOCUMENT_JSON_SIZE};

use crate::error::CliError;

/// Default output generation.
pub const DEFAULT_TARGET: DocumentVersion = DocumentVersion::V3;

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Generation every input is normalized to.
    pub target: DocumentVersion,
    /// Pretty-print the output JSON.
    pub pretty: bool,
    /// Largest accepted input, in bytes.
    pub max_input_bytes: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            pretty: true,
            max_input_bytes: MAX_DOCUMENT_JSON_SIZE,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default   |
    /// |---------------------------|-----------|
    /// | `PAGEDOC_TARGET`          | `v3`      |
    /// | `PAGEDOC_PRETTY`          | `true`    |
    /// | `PAGEDOC_MAX_INPUT_BYTES` | `5000000` |
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let target = match value("PAGEDOC_TARGET") {
            Some(raw) => DocumentVersion::from_str(&raw).ok_or_else(|| {
                CliError::Config(format!(
                    "PAGEDOC_TARGET must be one of legacy, v2, v3 (got {raw:?})"
                ))
            })?,
            None => defaults.target,
        };

        let pretty = match value("PAGEDOC_PRETTY") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                CliError::Config(format!("PAGEDOC_PRETTY must be true or false (got {raw:?})"))
            })?,
            None => defaults.pretty,
        };

        let max_input_bytes = match value("PAGEDOC_MAX_INPUT_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    CliError::Config(format!(
                        "PAGEDOC_MAX_INPUT_BYTES must be a positive integer (got {raw:?})"
                    ))
                })?,
            None => defaults.max_input_bytes,
        };

        Ok(Self {
            target,
            pretty,
            max_input_bytes,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
