use std::{
    io::ErrorKind,
    net::{self, TcpStream},
    time::{Duration, Instant},
};

use crate::{io::Stream, response::Status, Error, ProtocolErrorKind, Response, Result};

mod config;
pub use config::Config;

/// A session with a CasparCG server, executing AMCP commands one at a time.
///
/// The connection is established lazily by the first [`Client::query`], and after it
/// was lost to a fault, transparently re-established by the next one. Failed queries
/// are never retried.
///
/// A [`Client`] is not meant to be shared, create one per concurrent session.
#[derive(Debug)]
pub struct Client {
    config: Config,
    stream: Option<Stream>,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    /// Create a client and [`open`](Self::open) its connection right away.
    pub fn connect(config: Config) -> Result<Self> {
        let mut client = Self::new(config);
        client.open()?;

        Ok(client)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Establish a new connection to the server, closing the current one if any.
    pub fn open(&mut self) -> Result<()> {
        self.connection().map(|_| ())
    }

    fn connection(&mut self) -> Result<&mut Stream> {
        self.close();

        let stream = Stream::connect(
            &self.config.host,
            self.config.port,
            self.config.connect_timeout,
        )?;

        tracing::debug!(
            "Connected to CasparCG server `{}:{}` at `{}`",
            self.config.host,
            self.config.port,
            stream.peer()
        );

        Ok(self.stream.insert(stream))
    }

    /// Release the connection, if any, this is a no-op on a closed client.
    pub fn close(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };

        if let Err(err) = stream.shutdown(net::Shutdown::Both) {
            tracing::trace!("Error while shutting down the connection: {err}");
        }

        tracing::debug!("Disconnected from CasparCG server `{}`", stream.peer());
    }

    /// Get a [`Shutdown`] handle on the current connection, if open.
    pub fn shutdown_handle(&self) -> Result<Option<Shutdown>> {
        Ok(self
            .stream
            .as_ref()
            .map(|stream| stream.try_clone().map(Shutdown))
            .transpose()?)
    }

    /// Execute an AMCP `command` and wait for its reply,
    /// for at most `timeout` or the configured [`Config::read_timeout`].
    ///
    /// Error replies (`4xx`, `5xx`) are returned as an [`Ok`] [`Response`],
    /// see [`Response::error_for_status`] to handle them as errors.
    pub fn query(&mut self, command: &str, timeout: Option<Duration>) -> Result<Response> {
        let command = command.trim();

        if command.contains(['\r', '\n']) {
            return Err(Error::InvalidCommand(command.into()));
        }

        if self.config.verbose && !command.starts_with("INFO") {
            tracing::debug!("Executing AMCP: {command}");
        } else {
            tracing::trace!("Executing AMCP: {command}");
        }

        let timeout = timeout.or(self.config.read_timeout);
        let stream = match self.stream {
            Some(ref mut stream) => stream,
            None => self.connection()?,
        };

        // The connection attempt is bounded on its own, by `Config::connect_timeout`.
        let deadline = timeout.and_then(|timeout| Instant::now().checked_add(timeout));
        let result = Self::exchange(stream, command, deadline);

        if let Err(err) = &result {
            if err.is_fatal() {
                tracing::warn!("Query `{command}` failed, dropping the connection: {err}");

                self.close();
            }
        }

        result
    }

    fn exchange(stream: &mut Stream, command: &str, deadline: Option<Instant>) -> Result<Response> {
        stream.send(command, deadline)?;

        // The payload line of a `200`/`201` is consumed even with a garbled header.
        let status = stream.recv(deadline)?;

        match Status::parse(&String::from_utf8_lossy(&status))? {
            Status::Complete(response) => Ok(response),
            Status::Payload(code) => {
                let payload = String::from_utf8(stream.recv(deadline)?).map_err(|err| {
                    Error::protocol(
                        ProtocolErrorKind::Encoding,
                        String::from_utf8_lossy(err.as_bytes()).trim(),
                    )
                })?;

                Ok(Response::new(code, Some(payload.trim().to_owned())))
            }
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}

/// A handle on the connection of a [`Client`], to abort it from another thread.
///
/// Shutting the connection down makes a query blocked on it fail promptly,
/// the client then reconnects on its next query.
#[derive(Debug)]
pub struct Shutdown(TcpStream);

impl Shutdown {
    pub fn shutdown(&self) -> Result<()> {
        match self.0.shutdown(net::Shutdown::Both) {
            Err(err) if err.kind() != ErrorKind::NotConnected => Err(err.into()),
            _ => Ok(()),
        }
    }
}
