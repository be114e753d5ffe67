//! Error types for the TrialScope pipeline.
//!
//! Uses `thiserror` for public API error types. The taxonomy follows the
//! pipeline stages: input validation, upstream evidence sources,
//! configuration, and report synthesis.

/// Message shown when the query is rejected before any work starts.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a clinical trial query";

/// Message shown for every failure that is not an input error.
pub const GENERIC_FAILURE_MESSAGE: &str = "Unable to analyze query. Please try again.";

/// Top-level error type for the TrialScope core library.
#[derive(Debug, thiserror::Error)]
pub enum TrialScopeError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),
}

impl TrialScopeError {
    /// The single user-facing message for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            TrialScopeError::Input(_) => EMPTY_QUERY_MESSAGE,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}

/// Errors raised while validating the raw query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("query is empty or whitespace-only")]
    EmptyQuery,
}

/// Errors from an upstream evidence or enrichment source.
///
/// These are recovered inside the gateway and the enricher; only
/// `ClientBuild` can escape, at engine construction time.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to create HTTP client: {message}")]
    ClientBuild { message: String },

    #[error("{source_name} request failed: {message}")]
    Request {
        source_name: String,
        message: String,
    },

    #[error("{source_name} returned status {status}")]
    Status { source_name: String, status: u16 },

    #[error("Failed to parse {source_name} response: {message}")]
    Parse {
        source_name: String,
        message: String,
    },
}

impl SourceError {
    /// Name of the source that produced the error, if any.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            SourceError::ClientBuild { .. } => None,
            SourceError::Request { source_name, .. }
            | SourceError::Status { source_name, .. }
            | SourceError::Parse { source_name, .. } => Some(source_name),
        }
    }
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },

    #[error("Failed to write configuration: {message}")]
    WriteFailed { message: String },
}

/// Errors from report synthesis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("Report invariant violated: {message}")]
    InvariantViolated { message: String },
}

/// A type alias for results using the top-level `TrialScopeError`.
pub type Result<T> = std::result::Result<T, TrialScopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_input() {
        let err = TrialScopeError::Input(InputError::EmptyQuery);
        assert_eq!(
            err.to_string(),
            "Input error: query is empty or whitespace-only"
        );
    }

    #[test]
    fn test_error_display_source() {
        let err = TrialScopeError::Source(SourceError::Status {
            source_name: "PubMed".into(),
            status: 503,
        });
        assert_eq!(err.to_string(), "Source error: PubMed returned status 503");
    }

    #[test]
    fn test_user_message_for_input_error() {
        let err: TrialScopeError = InputError::EmptyQuery.into();
        assert_eq!(err.user_message(), "Please enter a clinical trial query");
    }

    #[test]
    fn test_user_message_is_generic_otherwise() {
        let err: TrialScopeError = SynthesisError::InvariantViolated {
            message: "no comparison rows".into(),
        }
        .into();
        assert_eq!(
            err.user_message(),
            "Unable to analyze query. Please try again."
        );

        let err: TrialScopeError = ConfigError::Invalid {
            message: "sources.trial_page_size must be at least 1".into(),
        }
        .into();
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_source_error_name() {
        let err = SourceError::Parse {
            source_name: "openFDA".into(),
            message: "expected object".into(),
        };
        assert_eq!(err.source_name(), Some("openFDA"));
        assert_eq!(
            err.to_string(),
            "Failed to parse openFDA response: expected object"
        );

        let err = SourceError::ClientBuild {
            message: "tls".into(),
        };
        assert_eq!(err.source_name(), None);
    }
}
