//! Error types shared across the crate.

use std::time::Duration;

/// Error type for all Proxmox VE API operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ticket endpoint rejected the credentials or returned a payload
    /// missing the expected fields.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The transport exceeded the configured timeout. Carries the timeout
    /// that was in effect.
    #[error("API request timed out after {0:?}")]
    Timeout(Duration),

    /// Any other non-2xx or transport-level failure. `status` holds the
    /// remote HTTP status when the server answered at all.
    #[error("API request failed{}: {message}", status_label(.status))]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// The response body was not valid JSON or lacked the `data` envelope.
    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    /// Invalid client configuration detected while building the transport.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {code}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_when_known() {
        let err = Error::Api {
            status: Some(500),
            message: "internal server error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 500: internal server error"
        );

        let err = Error::Api {
            status: None,
            message: "connection reset".to_string(),
        };
        assert_eq!(err.to_string(), "API request failed: connection reset");
    }
}
