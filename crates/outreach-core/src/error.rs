// ── Core error types ──
//
// User-facing errors from outreach-core. Views never see reqwest errors or
// JSON parse failures directly; the `From<outreach_api::Error>` impl
// translates them. `Clone` because one failed fetch is reported to every
// caller awaiting it.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to backend timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {entity_type} {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Failed before any request was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<outreach_api::Error> for CoreError {
    fn from(err: outreach_api::Error) -> Self {
        match err {
            outreach_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        entity_type: "resource".into(),
                        identifier: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            outreach_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid backend URL: {e}"),
            },
            outreach_api::Error::MissingBaseUrl => CoreError::Config {
                message: "Backend URL is not configured".into(),
            },
            outreach_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            outreach_api::Error::Backend {
                status: 404,
                message,
            } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            outreach_api::Error::Backend { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            outreach_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_keep_status() {
        let err: CoreError = outreach_api::Error::Backend {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(
            err,
            CoreError::Api {
                message: "boom".into(),
                status: Some(500)
            }
        );
    }

    #[test]
    fn missing_url_is_a_config_error() {
        let err: CoreError = outreach_api::Error::MissingBaseUrl.into();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = CoreError::validation("Search URL required");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Search URL required");
    }
}
