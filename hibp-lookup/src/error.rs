/// Everything that can go wrong while building or running a lookup.
///
/// Messages never carry the plaintext password. Where a hash is involved only
/// its 5-character prefix is included.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid hash: {reason}")]
    InvalidHash { reason: String },

    #[error("invalid request header '{name}'")]
    InvalidHeader { name: String },

    #[error("environment variable {var} has invalid value '{value}'")]
    Config { var: &'static str, value: String },

    #[error("failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("request for hash prefix {prefix} failed: {source}")]
    Transport {
        prefix: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for hash prefix {prefix}: {message}")]
    Api { prefix: String, status: u16, message: String },

    #[error("malformed response entry '{entry}': {reason}")]
    Parse { entry: String, reason: &'static str },

    #[cfg(feature = "tokio")]
    #[error("lookup task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    /// HTTP status attached to an [`Error::Api`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the transport gave up because a timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport { source, .. } if source.is_timeout())
    }

    /// True when no connection could be established.
    pub fn is_connect(&self) -> bool {
        matches!(self, Error::Transport { source, .. } if source.is_connect())
    }

    /// True for errors raised from caller input before any network activity.
    pub fn is_input(&self) -> bool {
        matches!(self, Error::InvalidHash { .. } | Error::InvalidHeader { .. })
    }
}
