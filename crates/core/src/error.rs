use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of an analysis failure, used to pick the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    MalformedResponse,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Request to analysis service failed: {reason}")]
    Transport { reason: String },

    #[error("Analysis service answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Analysis service returned an unusable payload: {reason}")]
    MalformedResponse { reason: String },
}

impl AnalysisError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AnalysisError::Transport { .. } | AnalysisError::Status { .. } => FailureKind::Transport,
            AnalysisError::MalformedResponse { .. } => FailureKind::MalformedResponse,
        }
    }

    /// Single human-readable line for the error region of a front end.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Transport { reason } => format!(
                "Could not reach the analysis service. Check your connection and try again. ({reason})"
            ),
            AnalysisError::Status { status, body } => format!(
                "The analysis service rejected the request with status {status}. Check the link and try again. ({})",
                excerpt(body, BODY_EXCERPT_CHARS)
            ),
            AnalysisError::MalformedResponse { reason } => format!(
                "The analysis service answered, but no flashcards could be read from it. ({reason})"
            ),
        }
    }
}

const BODY_EXCERPT_CHARS: usize = 200;

/// First `max_chars` characters of `body` on a single line.
fn excerpt(body: &str, max_chars: usize) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("timed out: {err}")
        } else {
            err.to_string()
        };
        AnalysisError::Transport { reason }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet encoding failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF encoding failed: {reason}")]
    Pdf { reason: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Analysis endpoint must not be empty")]
    EmptyEndpoint,

    #[error("Invalid timeout {value:?}: expected a whole number of seconds")]
    InvalidTimeout { value: String },
}

#[derive(Error, Debug)]
pub enum DynamocardsError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, DynamocardsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_count_as_transport() {
        let err = AnalysisError::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.kind(), FailureKind::Transport);
    }

    #[test]
    fn user_messages_differ_by_kind() {
        let transport = AnalysisError::Transport {
            reason: "connection refused".into(),
        };
        let malformed = AnalysisError::MalformedResponse {
            reason: "missing field `key_concepts`".into(),
        };
        assert!(transport.user_message().starts_with("Could not reach"));
        assert!(malformed.user_message().contains("no flashcards could be read"));
        assert_ne!(transport.user_message(), malformed.user_message());
    }

    #[test]
    fn status_message_names_the_status_not_reachability() {
        let err = AnalysisError::Status {
            status: 422,
            body: "{\"detail\": \"invalid youtube_link\"}".into(),
        };
        let message = err.user_message();
        assert!(!message.contains("Could not reach"));
        assert!(message.contains("status 422"));
        assert!(message.contains("invalid youtube_link"));
    }

    #[test]
    fn status_message_truncates_long_bodies_to_one_line() {
        let body = format!("<html>\n<body>\n{}</body></html>", "x".repeat(5_000));
        let message = AnalysisError::Status { status: 500, body }.user_message();
        assert!(!message.contains('\n'));
        assert!(message.contains("<html> <body>"));
        assert!(message.ends_with("...)"));
        assert!(message.len() < 400);
    }
}
