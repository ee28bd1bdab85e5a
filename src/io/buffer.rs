use crate::DELIMITER;

/// Bytes the server interleaves in the stream that never carry any payload.
const NOISE: [u8; 2] = [0x00, 0x11];

/// An accumulating buffer splitting the inbound byte stream into `\r\n`-terminated lines.
///
/// Bytes are [fed](Self::feed) to a _raw_ queue as they arrive from the socket,
/// then moved to a _cooked_ queue with the protocol no-op bytes stripped,
/// from where complete lines are extracted.
#[derive(Debug, Default)]
pub struct LineBuffer {
    raw: Vec<u8>,
    cooked: Vec<u8>,

    /// Length of the prefix of `cooked` known not to contain a delimiter.
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly received bytes to the raw queue.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.raw.extend_from_slice(bytes);
    }

    fn cook(&mut self) {
        self.cooked
            .extend(self.raw.drain(..).filter(|byte| !NOISE.contains(byte)));
    }

    /// Extract the next complete line, delimiter included, if one is buffered.
    ///
    /// The returned bytes are consumed, the remainder is retained for the next call.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        self.cook();

        // A delimiter may straddle the boundary of the previous scan.
        let from = self.scanned.saturating_sub(DELIMITER.len() - 1);

        match self.cooked[from..]
            .windows(DELIMITER.len())
            .position(|window| window == DELIMITER)
        {
            Some(position) => {
                let end = from + position + DELIMITER.len();

                self.scanned = 0;
                Some(self.cooked.drain(..end).collect())
            }
            None => {
                self.scanned = self.cooked.len();
                None
            }
        }
    }

    /// Count of bytes buffered but not yet extracted as a line.
    pub fn pending(&self) -> usize {
        self.raw.len() + self.cooked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    pub fn clear(&mut self) {
        self.raw.clear();
        self.cooked.clear();
        self.scanned = 0;
    }
}
