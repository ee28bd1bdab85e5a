use std::{
    io::{BufRead, BufReader, Write},
    net::{TcpListener, TcpStream},
    thread::{self, JoinHandle},
    time::Duration,
};

use amcp::Config;
use tracing_subscriber::EnvFilter;

/// Route the client logs to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run a scripted AMCP server on a loopback port, returning a matching client [`Config`].
pub fn serve<F>(script: F) -> (Config, JoinHandle<()>)
where
    F: FnOnce(TcpListener) + Send + 'static,
{
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Unable to bind the test server");
    let port = listener
        .local_addr()
        .expect("Test server has no local address")
        .port();

    let config = Config {
        read_timeout: Some(Duration::from_secs(5)),
        ..Config::new("127.0.0.1", port)
    };

    (config, thread::spawn(move || script(listener)))
}

/// The server side of a client connection.
pub struct Peer {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Peer {
    pub fn accept(listener: &TcpListener) -> Self {
        let (stream, _) = listener.accept().expect("Unable to accept the client");
        let writer = stream.try_clone().expect("Unable to clone the client stream");

        Self {
            reader: BufReader::new(stream),
            writer,
        }
    }

    /// Read the next command, terminator included.
    pub fn command(&mut self) -> String {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .expect("Unable to read a command");

        line
    }

    pub fn reply(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).expect("Unable to reply");
        self.writer.flush().expect("Unable to flush the reply");
    }

    /// Wait for the client to send something, then close without reading it,
    /// which makes the kernel reset the connection.
    pub fn reset(self) {
        let mut byte = [0u8; 1];
        self.writer
            .peek(&mut byte)
            .expect("Unable to wait for the client");
    }

    /// Reply in separate writes, pausing between them so each lands in its own `recv`.
    pub fn reply_in_chunks(&mut self, chunks: &[&[u8]]) {
        for chunk in chunks {
            self.reply(chunk);
            thread::sleep(Duration::from_millis(30));
        }
    }
}
