//! `pagedoc` -- normalize persisted page documents.
//!
//! Reads a page document from PATH (or stdin when no path is given),
//! classifies it, converts it to the configured generation and prints the
//! resulting JSON to stdout. Logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default   | Description                          |
//! |---------------------------|----------|-----------|--------------------------------------|
//! | `PAGEDOC_TARGET`          | no       | `v3`      | Output generation: `legacy`, `v2`, `v3` |
//! | `PAGEDOC_PRETTY`          | no       | `true`    | Pretty-print the output              |
//! | `PAGEDOC_MAX_INPUT_BYTES` | no       | `5000000` | Reject larger inputs                 |
//! | `RUST_LOG`                | no       | `pagedoc_cli=info,pagedoc_core=warn` | Log filter |

use std::io::Read;

use pagedoc_cli::config::CliConfig;
use pagedoc_cli::convert::convert_document;
use pagedoc_cli::error::CliError;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagedoc_cli=info,pagedoc_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let path = std::env::args().nth(1);
    let input = read_input(path.as_deref()).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?path, "Could not read page document");
        std::process::exit(1);
    });

    match convert_document(&input, &config) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!(error = %e, "Conversion failed");
            std::process::exit(1);
        }
    }
}

fn read_input(path: Option<&str>) -> Result<String, CliError> {
    match path {
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}
