use std::fmt;
use thiserror::Error;

/// A single field of a rates payload that failed the shape check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    Empty,
    NotAnObject,
    NotANumber,
    NegativeRate,
    InvalidCountryCode,
    DuplicateCountryCode,
    SourceError(String),
}

impl Violation {
    pub fn new(field: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "{}: missing", self.field),
            ViolationKind::Empty => write!(f, "{}: empty", self.field),
            ViolationKind::NotAnObject => write!(f, "{}: expected an object", self.field),
            ViolationKind::NotANumber => write!(f, "{}: expected a decimal number", self.field),
            ViolationKind::NegativeRate => write!(f, "{}: rate cannot be negative", self.field),
            ViolationKind::InvalidCountryCode => {
                write!(f, "{}: not a two-letter country code", self.field)
            }
            ViolationKind::DuplicateCountryCode => {
                write!(f, "{}: duplicate country code", self.field)
            }
            ViolationKind::SourceError(info) => write!(f, "{}: {}", self.field, info),
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum VatError {
    #[error("Rates payload rejected: {}", join_violations(.violations))]
    Configuration { violations: Vec<Violation> },

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Rate source returned HTTP {status}")]
    Http { status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Rate store error: {message}")]
    Store { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Tax calculation failed: {message}")]
    Arithmetic { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Network,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VatError {
    pub fn configuration(violations: Vec<Violation>) -> Self {
        VatError::Configuration { violations }
    }

    pub fn arithmetic(message: impl Into<String>) -> Self {
        VatError::Arithmetic {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        VatError::Store {
            message: message.into(),
        }
    }

    /// Violated fields, empty for every kind other than `Configuration`.
    pub fn violations(&self) -> &[Violation] {
        match self {
            VatError::Configuration { violations } => violations,
            _ => &[],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            VatError::Configuration { .. }
            | VatError::Serialization(_)
            | VatError::Arithmetic { .. } => ErrorCategory::Data,
            VatError::Api(_) | VatError::Http { .. } => ErrorCategory::Network,
            VatError::Io(_) | VatError::Store { .. } => ErrorCategory::Storage,
            VatError::InvalidConfigValue { .. } | VatError::ConfigParse { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VatError::Api(_) | VatError::Http { .. } => ErrorSeverity::Medium,
            VatError::Configuration { .. }
            | VatError::Serialization(_)
            | VatError::InvalidConfigValue { .. }
            | VatError::ConfigParse { .. }
            | VatError::Arithmetic { .. } => ErrorSeverity::High,
            VatError::Io(_) | VatError::Store { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            VatError::Configuration { .. } => {
                "Check the rate source endpoint and its parameters; the response did not contain usable VAT rates"
            }
            VatError::Api(_) => "Check network connectivity and the rate source endpoint",
            VatError::Http { .. } => "Verify the endpoint URL and that the rate source is available",
            VatError::Io(_) => "Check that the store path exists and is writable",
            VatError::Serialization(_) => "The data could not be (de)serialized as JSON",
            VatError::Store { .. } => "Inspect the rate store file; it may be corrupt",
            VatError::InvalidConfigValue { .. } | VatError::ConfigParse { .. } => {
                "Fix the configuration value and run again"
            }
            VatError::Arithmetic { .. } => {
                "Check the amount and the stored rate; the result is out of range"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            VatError::Configuration { violations } => format!(
                "The rate source returned data that cannot be trusted ({} problem{}): {}",
                violations.len(),
                if violations.len() == 1 { "" } else { "s" },
                join_violations(violations)
            ),
            VatError::Http { status } => {
                format!("The rate source answered with HTTP status {}", status)
            }
            other => other.to_string(),
        }
    }

    /// Process exit code for the CLI binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, VatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_lists_fields() {
        let err = VatError::configuration(vec![
            Violation::new("rates.AT.standard_rate", ViolationKind::Missing),
            Violation::new("rates.DE.standard_rate", ViolationKind::NotANumber),
        ]);

        let msg = err.to_string();
        assert!(msg.contains("rates.AT.standard_rate: missing"));
        assert!(msg.contains("rates.DE.standard_rate: expected a decimal number"));
        assert_eq!(err.violations().len(), 2);
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_severity_drives_exit_code() {
        assert_eq!(VatError::Http { status: 503 }.exit_code(), 2);
        assert_eq!(VatError::store("locked").exit_code(), 3);
        assert!(VatError::store("locked").violations().is_empty());
    }

    #[test]
    fn test_user_friendly_message_pluralises() {
        let err = VatError::configuration(vec![Violation::new("rates", ViolationKind::Empty)]);
        assert!(err.user_friendly_message().contains("(1 problem)"));
    }
}
