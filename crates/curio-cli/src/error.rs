use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] curio_core::ApiError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Quote text cannot be empty")]
    EmptyText,
    #[error("Author cannot be empty")]
    EmptyAuthor,
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Quote ID cannot be empty")]
    EmptyQuoteId,
    #[error("Quote not found for id/prefix: {0}")]
    QuoteNotFound(String),
    #[error("{0}")]
    AmbiguousQuoteId(String),
    #[error("Import file {0} contains no quotes")]
    EmptyImportFile(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Remote error: {0}")]
    Remote(String),
    #[error("Session rejected by the backend. Run `curio auth login` with a fresh token.")]
    SessionExpired,
    #[error(
        "No API base URL configured. Run `curio config init --api-base-url <URL>` or set CURIO_API_BASE_URL."
    )]
    ApiNotConfigured,
}
