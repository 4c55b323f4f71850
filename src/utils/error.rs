use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Computation failed in {calculator}: {message}")]
    ComputationError { calculator: String, message: String },

    #[error("Invalid date '{value}': {source}")]
    DateParseError {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Computation,
    Configuration,
    Io,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StatsError {
    pub fn computation(calculator: &str, message: impl Into<String>) -> Self {
        StatsError::ComputationError {
            calculator: calculator.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StatsError::ComputationError { .. } | StatsError::DateParseError { .. } => {
                ErrorCategory::Computation
            }
            StatsError::SerializationError(_) => ErrorCategory::Serialization,
            StatsError::IoError(_) => ErrorCategory::Io,
            StatsError::ConfigError { .. }
            | StatsError::ConfigValidationError { .. }
            | StatsError::InvalidConfigValueError { .. }
            | StatsError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 計算錯誤會被 fallback 吸收
            ErrorCategory::Computation => ErrorSeverity::Low,
            ErrorCategory::Serialization => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            StatsError::ComputationError { calculator, .. } => format!(
                "Check the input collections passed to {}; fallback data was used",
                calculator
            ),
            StatsError::DateParseError { .. } => {
                "Use ISO dates such as 2024-03-15 or 2024-03-15T19:30:00Z".to_string()
            }
            StatsError::SerializationError(_) => {
                "Make sure the content file is valid JSON matching the content schema".to_string()
            }
            StatsError::IoError(_) => "Check that the file exists and is readable".to_string(),
            StatsError::ConfigError { .. } | StatsError::ConfigValidationError { .. } => {
                "Fix the TOML configuration file and try again".to_string()
            }
            StatsError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            StatsError::MissingConfigError { field } => {
                format!("Add the '{}' setting", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Computation => format!("Statistics could not be computed: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("Could not read input: {}", self),
            ErrorCategory::Serialization => format!("Malformed data: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computation_errors_are_low_severity() {
        let err = StatsError::computation("TestimonialCalculator", "rating 7 out of range");
        assert_eq!(err.category(), ErrorCategory::Computation);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.to_string().contains("TestimonialCalculator"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = StatsError::MissingConfigError {
            field: "cache.default_ttl_seconds".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("cache.default_ttl_seconds"));
    }
}
