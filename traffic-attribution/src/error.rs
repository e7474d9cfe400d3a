use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttributionError {
    #[error("Config error: {0}")]
    ConfigError(#[from] envconfig::Error),
    #[error("Invalid category rule config: {0}")]
    InvalidCategoryRules(#[source] serde_json::Error),
    #[error("Invalid channel rule config: {0}")]
    InvalidChannelRules(#[source] serde_json::Error),
}
