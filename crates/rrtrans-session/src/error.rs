use rrtrans_format::FormatError;
use rrtrans_transport::{Operation, TransportError};

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The transport failed during `op`.
    #[error("{source}")]
    Transport {
        op: Operation,
        source: TransportError,
    },

    /// Format negotiation produced no canonical format.
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl SessionError {
    pub(crate) fn transport(op: Operation) -> impl FnOnce(TransportError) -> Self {
        move |source| SessionError::Transport { op, source }
    }

    /// Label naming where the failure happened.
    pub fn origin(&self) -> &'static str {
        match self {
            SessionError::Transport { op, .. } => op.as_str(),
            SessionError::Format(_) => "format::negotiate",
        }
    }

    /// Snapshot of this error as an origin/message pair.
    pub fn record(&self) -> ErrorRecord {
        ErrorRecord::new(self.origin(), self.to_string())
    }
}

/// A reported failure: where it happened and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub origin: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {} -- {}", self.origin, self.message)
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
