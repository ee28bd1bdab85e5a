use derive_more::{Display, From, Into};
use serde::de::DeserializeOwned;

use crate::{Error, ProtocolErrorKind, Result};

/// A three-digit AMCP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
pub struct Code(u16);

impl Code {
    /// Success, followed by a data line.
    pub const OK_DATA: Self = Self(200);

    /// Success, followed by a single data line.
    pub const OK_LINE: Self = Self(201);

    /// Success, without any data.
    pub const OK: Self = Self(202);

    /// Codes below this threshold are successes, `3xx` included.
    const ERROR_THRESHOLD: u16 = 400;

    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub const fn as_u16(self) -> u16 {
        self.0
    }

    pub const fn is_success(self) -> bool {
        self.0 < Self::ERROR_THRESHOLD
    }

    fn parse(line: &str) -> Result<Self> {
        line.get(..3)
            .filter(|digits| digits.bytes().all(|byte| byte.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(Self)
            .ok_or_else(|| Error::protocol(ProtocolErrorKind::Malformed, line))
    }
}

/// The result of a single AMCP query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    code: Code,
    payload: Option<String>,
}

impl Response {
    pub fn new(code: impl Into<Code>, payload: Option<String>) -> Self {
        Self {
            code: code.into(),
            payload,
        }
    }

    /// The status code of the reply.
    pub fn code(&self) -> Code {
        self.code
    }

    /// The data line of a `200`/`201` reply, or the whole status line of an error reply.
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn into_payload(self) -> Option<String> {
        self.payload
    }

    /// Whether the query succeeded, that is the code is below `400`.
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Turn an error reply into an [`Error::Reply`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_error() {
            return Err(Error::Reply(self));
        }

        Ok(self)
    }

    /// Deserialize the XML document carried in the payload,
    /// as returned by `INFO CONFIG` or `INFO PATHS` for instance.
    pub fn xml<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(quick_xml::de::from_str(self.payload().unwrap_or_default())?)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_success() {
            write!(f, "{} OK", self.code)
        } else {
            write!(f, "Error {}", self.code)
        }
    }
}

/// The outcome of reading the status line of a reply.
#[derive(Debug, PartialEq)]
pub(crate) enum Status {
    /// The reply is complete, nothing else is to be read.
    Complete(Response),

    /// Exactly one more line is to be read as the payload.
    Payload(Code),
}

impl Status {
    pub(crate) fn parse(line: &str) -> Result<Self> {
        let line = line.trim();

        if line.is_empty() {
            return Err(Error::protocol(ProtocolErrorKind::NoData, line));
        }

        if line.starts_with("202") {
            Ok(Self::Complete(Response::new(Code::OK, None)))
        } else if line.starts_with("200") || line.starts_with("201") {
            Ok(Self::Payload(Code::parse(line)?))
        } else if line.starts_with(['3', '4', '5']) {
            Ok(Self::Complete(Response::new(
                Code::parse(line)?,
                Some(line.to_owned()),
            )))
        } else {
            Err(Error::protocol(ProtocolErrorKind::Unexpected, line))
        }
    }
}
