use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Runtime environment '{env_name}' unavailable: {message}")]
    EnvironmentError { env_name: String, message: String },

    #[error("Shell '{shell}' could not be started: {source}")]
    ShellUnavailable {
        shell: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid matrix literal at position {position}: {message}")]
    InputParseError { position: usize, message: String },

    #[error("Shape error: {message}")]
    ShapeError { message: String },

    #[error("Type error: {message}")]
    TypeError { message: String },

    #[error("Arithmetic overflow: {message}")]
    OverflowError { message: String },

    #[error("Input has {elements} elements, limit is {limit}")]
    InputTooLarge { elements: usize, limit: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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
}

pub type Result<T> = std::result::Result<T, PredictError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Environment,
    Input,
    Computation,
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

impl PredictError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PredictError::EnvironmentError { .. } | PredictError::ShellUnavailable { .. } => {
                ErrorCategory::Environment
            }
            PredictError::InputParseError { .. }
            | PredictError::TypeError { .. }
            | PredictError::InputTooLarge { .. } => ErrorCategory::Input,
            PredictError::ShapeError { .. } | PredictError::OverflowError { .. } => {
                ErrorCategory::Computation
            }
            PredictError::ConfigError { .. }
            | PredictError::ConfigValidationError { .. }
            | PredictError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PredictError::IoError(_) | PredictError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Computation => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Environment | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PredictError::EnvironmentError { env_name, .. } => format!(
                "Check that the conda environment '{}' exists, or pass --continue-on-setup-failure",
                env_name
            ),
            PredictError::ShellUnavailable { shell, .. } => {
                format!("Install '{}' or point --shell at an existing shell", shell)
            }
            PredictError::InputParseError { .. } => {
                "Pass a nested list of numbers, e.g. \"[[1, 2], [3, 4]]\"".to_string()
            }
            PredictError::ShapeError { .. } => {
                "Use a square matrix so that it can be multiplied by itself".to_string()
            }
            PredictError::TypeError { .. } => "Only numeric values are allowed".to_string(),
            PredictError::OverflowError { .. } => {
                "Use smaller values or write them as floats (e.g. 1e20)".to_string()
            }
            PredictError::InputTooLarge { .. } => {
                "Reduce the matrix size or raise predict.max_elements".to_string()
            }
            PredictError::ConfigError { .. }
            | PredictError::ConfigValidationError { .. }
            | PredictError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
            PredictError::IoError(_) => "Check file permissions and paths".to_string(),
            PredictError::SerializationError(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Environment => format!("Startup failed: {}", self),
            ErrorCategory::Input => format!("The input matrix was rejected: {}", self),
            ErrorCategory::Computation => format!("The dot product could not be computed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("Unexpected system error: {}", self),
        }
    }

    /// 供 CLI 使用的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_medium_severity() {
        let err = PredictError::InputParseError {
            position: 0,
            message: "unexpected character 'n'".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_environment_error_is_critical() {
        let err = PredictError::EnvironmentError {
            env_name: "myenv".to_string(),
            message: "EnvironmentNameNotFound".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.recovery_suggestion().contains("myenv"));
        assert!(err.user_friendly_message().starts_with("Startup failed"));
    }
}
