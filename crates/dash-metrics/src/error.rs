use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid locale: {0}")]
    InvalidLocale(String),
    #[error("invalid format options: {0}")]
    InvalidFormatOptions(String),
    #[error("data source unavailable: {0}")]
    SourceUnavailable(String),
}

pub type MetricsResult<T> = Result<T, MetricsError>;
