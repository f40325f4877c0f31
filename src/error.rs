use std::time::Duration;

/// Rejected inbound request. The pipeline never runs when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Component type and brand are required")]
    MissingRequiredFields,
}

/// Failure talking to an upstream content source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network failure, non-2xx status or undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The HTTP client could not be constructed.
    #[error("client error: {0}")]
    Client(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_client_facing() {
        assert_eq!(
            ValidationError::MissingRequiredFields.to_string(),
            "Component type and brand are required"
        );
    }

    #[test]
    fn display_timeout() {
        let err = SourceError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "request timed out after 5s");
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SourceError>();
        assert_send_sync::<ValidationError>();
    }
}
