use std::{
    io::{ErrorKind, Read, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::{Duration, Instant},
};

use super::LineBuffer;
use crate::{Error, Result, DELIMITER};

/// Size of a single `recv` from the socket.
const CHUNK_SIZE: usize = 512;

/// A connected, blocking AMCP stream, with its own inbound [`LineBuffer`].
#[derive(Debug)]
pub struct Stream {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: LineBuffer,
}

impl Stream {
    /// Connect to the first reachable address `host:port` resolves to,
    /// bounding each attempt by `timeout`.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let connection = |source| Error::Connection {
            addr: format!("{host}:{port}"),
            source,
        };

        let mut last = None;
        for addr in (host, port).to_socket_addrs().map_err(connection)? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    stream.set_nodelay(true).map_err(connection)?;

                    return Ok(Self {
                        stream,
                        peer: addr,
                        buffer: LineBuffer::new(),
                    });
                }
                Err(err) => {
                    tracing::trace!("Unable to connect to `{addr}`: {err}");

                    last = Some(err);
                }
            }
        }

        Err(connection(last.unwrap_or_else(|| {
            std::io::Error::new(ErrorKind::NotFound, "no address resolved")
        })))
    }

    /// The address of the server at the other end of the stream.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Send `line`, followed by the delimiter, waiting at most until `deadline`.
    pub fn send(&mut self, line: &str, deadline: Option<Instant>) -> Result<()> {
        tracing::trace!("Sending line to `{}`: {line:?}", self.peer);

        let mut bytes = Vec::with_capacity(line.len() + DELIMITER.len());
        bytes.extend_from_slice(line.as_bytes());
        bytes.extend_from_slice(DELIMITER);

        self.stream.set_write_timeout(remaining(deadline)?)?;

        self.stream
            .write_all(&bytes)
            .and_then(|()| self.stream.flush())
            .map_err(failure)
    }

    /// Receive the next line, delimiter included, waiting at most until `deadline`.
    pub fn recv(&mut self, deadline: Option<Instant>) -> Result<Vec<u8>> {
        let mut chunk = [0u8; CHUNK_SIZE];

        loop {
            if let Some(line) = self.buffer.next_line() {
                tracing::trace!(
                    "Received line from `{}`: {:?}",
                    self.peer,
                    String::from_utf8_lossy(&line)
                );

                return Ok(line);
            }

            self.stream.set_read_timeout(remaining(deadline)?)?;

            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(Error::Eof),
                Ok(len) => self.buffer.feed(&chunk[..len]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(failure(err)),
            }
        }
    }
}

/// Time left until `deadline`, for the socket timeouts, `None` being unbounded.
fn remaining(deadline: Option<Instant>) -> Result<Option<Duration>> {
    match deadline {
        None => Ok(None),
        Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
            Some(remaining) if !remaining.is_zero() => Ok(Some(remaining)),
            _ => Err(Error::Timeout),
        },
    }
}

/// Socket timeouts surface as `WouldBlock` on unix and `TimedOut` on windows.
fn failure(err: std::io::Error) -> Error {
    match err.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => Error::Timeout,
        _ => err.into(),
    }
}

impl std::ops::Deref for Stream {
    type Target = TcpStream;

    fn deref(&self) -> &Self::Target {
        &self.stream
    }
}
