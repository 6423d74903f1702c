use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeesError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Date '{value}' does not match format '{expected}'{}", line_suffix(.line))]
    DateFormatError {
        value: String,
        expected: &'static str,
        line: Option<u64>,
    },

    #[error("Missing required field '{field}'{}", line_suffix(.line))]
    MissingFieldError { field: String, line: Option<u64> },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" (line {})", line),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Contract,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl FeesError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FeesError::CsvError(_)
            | FeesError::DateFormatError { .. }
            | FeesError::MissingFieldError { .. } => ErrorCategory::Input,
            FeesError::InvalidArgument { .. } => ErrorCategory::Contract,
            FeesError::ConfigValidationError { .. } | FeesError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            FeesError::IoError(_) | FeesError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// Every variant aborts the run; severity only picks the exit code.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Contract => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FeesError::DateFormatError { expected, .. } => {
                format!("Fix the date so it matches '{}' and re-run", expected)
            }
            FeesError::MissingFieldError { field, .. } => format!(
                "Make sure every row has a '{}' value and the header names the column",
                field
            ),
            FeesError::CsvError(_) => {
                "Check that every row has the same number of columns as the header".to_string()
            }
            FeesError::InvalidArgument { .. } => "Use a smaller range or an earlier start date".to_string(),
            FeesError::IoError(_) => "Check that the paths exist and are writable".to_string(),
            FeesError::SerializationError(_) => "Try the csv output format".to_string(),
            FeesError::ConfigValidationError { .. } | FeesError::InvalidConfigValueError { .. } => {
                "Review the configuration file or command line flags".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The checkout file could not be processed: {}", self),
            ErrorCategory::Contract => format!("Invalid request: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, FeesError>;
