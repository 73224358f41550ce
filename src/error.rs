// Error types shared by the transport, the normalizer and every resource
// operation. The two failure kinds the service can produce are kept apart:
// a `TransportError` means the call never produced a usable reply, a
// `RemoteOperationError` means Apollo ran the call and reported a failure.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Remote(#[from] RemoteOperationError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote(_))
    }
}

/// Network or HTTP level failure. The request either did not reach the
/// service or its reply could not be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from apollo {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

/// Apollo executed the call but answered with an `error` field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{endpoint}: {message}")]
pub struct RemoteOperationError {
    pub endpoint: String,
    pub message: String,
}

impl RemoteOperationError {
    pub fn new(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        RemoteOperationError {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}
