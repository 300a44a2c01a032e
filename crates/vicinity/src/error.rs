use thiserror::Error;

#[derive(Error, Debug)]
pub enum VicinityError {
    #[error("Location error: {0}")]
    Resolve(#[from] crate::resolve::ResolveError),
    #[error("Provider error: {0}")]
    Provider(#[from] crate::provider::ProviderError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VicinityError>;
