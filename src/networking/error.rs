use thiserror::Error;

/// Errors returned by the node client and the wire framing.
///
/// `CannotConnect`, `CannotSend`, `NoResponse` and `ResponseTimeout` are
/// transport failures a caller may retry or use to drop a peer. Everything
/// else is deterministic and retrying will not help.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("node address is invalid: {0}")]
    AddressInvalid(String),

    #[error("{0} is not available")]
    CannotConnect(String),

    #[error("cannot send data: {0}")]
    CannotSend(String),

    #[error("received 0 bytes as a response, expected at least 1 byte")]
    NoResponse,

    #[error("no response from {0} before the read deadline")]
    ResponseTimeout(String),

    #[error("cannot parse response: {0}")]
    CannotParseResponse(String),

    /// The peer answered with a failure status. This is the normal way for a
    /// node to reject a request.
    #[error("{0}")]
    RemoteError(String),

    #[error("cannot encode payload: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

impl NetworkError {
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            NetworkError::CannotConnect(_)
                | NetworkError::CannotSend(_)
                | NetworkError::NoResponse
                | NetworkError::ResponseTimeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
