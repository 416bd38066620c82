//! Feed session errors.

/// Errors that can occur during feed operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Failed to establish the WebSocket connection.
    Connect(String),
    /// Read or write failure, or the server closed the connection.
    Transport(String),
    /// Undecodable or unexpected message.
    Protocol(String),
    /// The server answered with an `error` response.
    Remote(String),
    /// The session was torn down.
    Closed,
    /// The caller's own cancellation fired.
    Cancelled,
}

impl FeedError {
    /// Returns `true` for errors that end the whole session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Transport(_) | Self::Protocol(_))
    }
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect(msg) => write!(f, "Connection failed: {msg}"),
            Self::Transport(msg) => write!(f, "Transport error: {msg}"),
            Self::Protocol(msg) => write!(f, "Protocol error: {msg}"),
            Self::Remote(msg) => write!(f, "Remote error: {msg}"),
            Self::Closed => write!(f, "Feed closed"),
            Self::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for FeedError {}
