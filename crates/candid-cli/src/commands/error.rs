/// Errors reported by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("message is required: use a positional HEX argument or --file")]
    MissingInput,
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error(transparent)]
    Codec(#[from] candid::Error),
    #[error(transparent)]
    Principal(#[from] candid::PrincipalError),
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}
