//! Text-in, text-out document normalization used by the binary.

use pagedoc_core::error::CoreError;
use pagedoc_core::page_document::{detect, normalize, parse_document_json_with_limit};

use crate::config::CliConfig;
use crate::error::CliError;

/// Parse raw document JSON, normalize it to the configured generation and
/// serialize the result.
pub fn convert_document(input: &str, config: &CliConfig) -> Result<String, CliError> {
    let value = parse_document_json_with_limit(input, config.max_input_bytes)?;
    let detection = detect(&value);

    let document = normalize(&value, config.target);
    let output = document.to_value()?;

    tracing::info!(
        source = %detection.version,
        signal = ?detection.signal,
        target = %document.version(),
        "Normalized page document",
    );

    let text = if config.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    };
    text.map_err(|e| CoreError::Internal(format!("Failed to serialize output: {e}")).into())
}
