use thiserror::Error;

use crate::Response;

/// The error types that can occur when manipulating this crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// The TCP connection to the server could not be established.
    #[error("Unable to connect to the server at `{addr}`: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The socket failed after the connection was established.
    #[error(transparent)]
    Transport(#[from] std::io::Error),

    /// The server sent something that is not a valid AMCP reply.
    #[error("{kind}: `{line}`")]
    Protocol {
        kind: ProtocolErrorKind,
        line: String,
    },

    #[error("Timed out while waiting for a reply")]
    Timeout,

    #[error("Connection closed by peer")]
    Eof,

    /// The command would break the line framing of the protocol.
    #[error("Invalid command, it must fit on a single line: {0:?}")]
    InvalidCommand(String),

    /// The server replied with an error code, see [`Response::error_for_status`].
    #[error("Server replied with {0}")]
    Reply(Response),

    #[error(transparent)]
    Xml(#[from] quick_xml::DeError),
}

impl Error {
    /// Whether the connection has been torn down because of this error,
    /// in which case the next query reconnects.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Eof | Self::Timeout)
    }

    pub(crate) fn protocol(kind: ProtocolErrorKind, line: impl Into<String>) -> Self {
        Self::Protocol {
            kind,
            line: line.into(),
        }
    }
}

/// The ways a reply can violate the AMCP framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ProtocolErrorKind {
    #[strum(serialize = "No data")]
    NoData,

    #[strum(serialize = "Malformed result")]
    Malformed,

    #[strum(serialize = "Unexpected result")]
    Unexpected,

    #[strum(serialize = "Invalid UTF-8 in result")]
    Encoding,
}

/// A handy [`std::result::Result`] type alias bounding the [`enum@Error`] struct as `E`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
