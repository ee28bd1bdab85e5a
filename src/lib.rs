#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    clippy::unwrap_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,
    clippy::undocumented_unsafe_blocks
)]

/// The default TCP port of the AMCP listener of a CasparCG server.
pub const DEFAULT_PORT: u16 = 5250;

/// The line terminator of both commands and replies.
pub const DELIMITER: &[u8] = b"\r\n";

mod error;
pub use error::{Error, ProtocolErrorKind, Result};

pub mod io;

mod response;
pub use response::{Code, Response};

pub mod client;
pub use client::{Client, Config, Shutdown};
