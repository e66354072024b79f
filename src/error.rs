use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Feed fetch error: {0}")]
    #[diagnostic(code(townkrier::fetch))]
    Fetch(String),

    #[error("Feed parse error: {0}")]
    #[diagnostic(code(townkrier::feed_parse))]
    FeedParse(String),

    #[error("Unparseable pubDate on item {guid}: {message}")]
    #[diagnostic(code(townkrier::date_parse))]
    DateParse { guid: String, message: String },

    #[error("Storage error: {0}")]
    #[diagnostic(code(townkrier::storage))]
    Storage(String),

    #[error("Tool {0} not found")]
    #[diagnostic(code(townkrier::tool_not_found))]
    ToolNotFound(String),

    #[error("Tool {0} is already registered")]
    #[diagnostic(code(townkrier::duplicate_tool))]
    DuplicateTool(String),

    #[error("Tool execution error: {0}")]
    #[diagnostic(code(townkrier::tool_execution))]
    ToolExecution(String),

    #[error("Completion endpoint error: {0}")]
    #[diagnostic(code(townkrier::completion))]
    Completion(String),

    #[error("Structured output did not match the requested schema: {0}")]
    #[diagnostic(code(townkrier::schema_validation))]
    SchemaValidation(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(townkrier::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(townkrier::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(townkrier::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(townkrier::serialization))]
    Serialization(String),
}

// Implement From for JSON serialization errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
#[allow(dead_code)]
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create feed fetch errors
pub fn fetch_error(message: &str) -> Error {
    Error::Fetch(message.to_string())
}

/// Helper to create storage errors
pub fn storage_error(message: &str) -> Error {
    Error::Storage(message.to_string())
}

/// Helper to create completion endpoint errors
pub fn completion_error(message: &str) -> Error {
    Error::Completion(message.to_string())
}
