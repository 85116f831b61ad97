//! Result and error types for the login suite.

use thiserror::Error;

/// Result type for suite operations
pub type LoginE2eResult<T> = Result<T, LoginE2eError>;

/// Errors that can occur while driving the login suite
#[derive(Debug, Error)]
pub enum LoginE2eError {
    /// Required configuration missing or invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// What was being waited for
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// No element matched the selector
    #[error("No element matches {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// Element exists but is hidden or covered by another element
    #[error("Element {selector} is not actionable: {reason}")]
    NotActionable {
        /// Selector of the target element
        selector: String,
        /// Why the element cannot receive input
        reason: String,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    InputError {
        /// Error message
        message: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML config error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoginE2eError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Whether an interaction may succeed if retried: the target is missing,
    /// hidden or covered, as happens while the page is still rendering
    #[must_use]
    pub const fn is_retryable_interaction(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::NotActionable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = LoginE2eError::config("Missing password value");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("Missing password value"));
    }

    #[test]
    fn test_not_actionable_message() {
        let err = LoginE2eError::NotActionable {
            selector: "[data-testid=\"login__cta\"]".to_string(),
            reason: "covered by another element".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("login__cta"));
        assert!(text.contains("covered"));
    }

    #[test]
    fn test_retryable_interaction_classification() {
        assert!(LoginE2eError::ElementNotFound {
            selector: "x".into()
        }
        .is_retryable_interaction());
        assert!(LoginE2eError::NotActionable {
            selector: "x".into(),
            reason: "covered".into()
        }
        .is_retryable_interaction());
        assert!(!LoginE2eError::Timeout {
            what: "x".into(),
            ms: 10
        }
        .is_retryable_interaction());
        assert!(!LoginE2eError::assertion("nope").is_retryable_interaction());
        assert!(!LoginE2eError::config("nope").is_retryable_interaction());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LoginE2eError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
