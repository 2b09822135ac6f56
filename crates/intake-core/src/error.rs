//! Error types for tracker calls and document rendering.

use std::error::Error;

use thiserror::Error;

/// Failures reported by a [`crate::TaskTracker`] implementation.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The request never produced an HTTP response.
    #[error("tracker request failed")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying client error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The tracker answered with a non-success status.
    #[error("tracker rejected request")]
    Status {
        /// Operation identifier.
        operation: &'static str,
        /// HTTP status code returned upstream.
        status: u16,
        /// Response body returned upstream.
        body: String,
    },
    /// The tracker answered successfully but the body was not understood.
    #[error("tracker response could not be decoded")]
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying decode error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl TrackerError {
    /// Operation that failed.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. } => *operation,
        }
    }

    /// Caller-facing description embedding the upstream status and body.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Transport { operation, source } => format!("{operation}: {source}"),
            Self::Status {
                operation,
                status,
                body,
            } => format!("{operation}: upstream status {status}: {}", body.trim()),
            Self::Decode { operation, source } => {
                format!("{operation}: unreadable response: {source}")
            }
        }
    }
}

/// Convenience alias for tracker results.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Failures raised while producing the guarantee PDF.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The PDF writer rejected the document.
    #[error("pdf rendering failed")]
    Pdf {
        /// Rendering step that failed.
        step: &'static str,
        /// Writer error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn tracker_error_detail_embeds_upstream_status() {
        let err = TrackerError::Status {
            operation: "create_task",
            status: 500,
            body: " boom \n".to_string(),
        };
        assert_eq!(err.to_string(), "tracker rejected request");
        assert_eq!(err.operation(), "create_task");
        assert_eq!(err.detail(), "create_task: upstream status 500: boom");
    }

    #[test]
    fn transport_error_keeps_source() {
        let err = TrackerError::Transport {
            operation: "list_fields",
            source: Box::new(io::Error::new(io::ErrorKind::ConnectionRefused, "refused")),
        };
        assert!(err.source().is_some());
        assert_eq!(err.detail(), "list_fields: refused");
    }
}
