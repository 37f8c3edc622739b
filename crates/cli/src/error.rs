use pagedoc_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}
