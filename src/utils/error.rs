use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("No compatible build fits a budget of {budget}: {reason}")]
    BuildNotPossible { budget: Decimal, reason: String },

    #[error("Build request was cancelled")]
    Cancelled,

    #[error("Invalid request field '{field}': {reason}")]
    InvalidRequest { field: String, reason: String },

    #[error("Catalog unavailable: {message}")]
    Catalog { message: String },

    #[error("Price history unavailable for product {product_id}: {message}")]
    PriceHistory { product_id: i64, message: String },

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Request,
    Search,
    Collaborator,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BuildError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BuildError::InvalidRequest { .. } => ErrorCategory::Request,
            BuildError::BuildNotPossible { .. } | BuildError::Cancelled => ErrorCategory::Search,
            BuildError::Catalog { .. }
            | BuildError::PriceHistory { .. }
            | BuildError::Api(_) => ErrorCategory::Collaborator,
            BuildError::ConfigError { .. }
            | BuildError::ConfigValidationError { .. }
            | BuildError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BuildError::Io(_) | BuildError::Serialization(_) | BuildError::Internal { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BuildError::PriceHistory { .. } => ErrorSeverity::Low,
            BuildError::BuildNotPossible { .. }
            | BuildError::Cancelled
            | BuildError::InvalidRequest { .. }
            | BuildError::Api(_) => ErrorSeverity::Medium,
            BuildError::Catalog { .. }
            | BuildError::Serialization(_)
            | BuildError::ConfigError { .. }
            | BuildError::ConfigValidationError { .. }
            | BuildError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            BuildError::Io(_) | BuildError::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    /// Errors caused by the request itself rather than by the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BuildError::BuildNotPossible { .. } | BuildError::InvalidRequest { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Request => "Check the request parameters and try again",
            ErrorCategory::Search => match self {
                BuildError::Cancelled => "Retry with a longer timeout",
                _ => "Raise the budget or relax the priority and platform filters",
            },
            ErrorCategory::Collaborator => "Check the catalog and price history sources",
            ErrorCategory::Configuration => "Fix the configuration file and run again",
            ErrorCategory::System => "Check file permissions and available resources",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BuildError::BuildNotPossible { budget, .. } => {
                format!("No compatible build could be assembled within {}", budget)
            }
            BuildError::Cancelled => "The build request was cancelled or timed out".to_string(),
            BuildError::InvalidRequest { field, reason } => {
                format!("Invalid {}: {}", field, reason)
            }
            BuildError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value {} is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
