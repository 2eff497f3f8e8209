//! Incremental decoder for the device's comma/whitespace separated pixel stream.
//!
//! The stream is tokenized byte by byte, so chunks may split a token anywhere
//! and the result never depends on where they do. Delimiters are `,` and ASCII
//! whitespace. Tokens that are not plain decimal numbers in `0..=255`, or that
//! run past `MAX_TOKEN_BYTES`, are dropped.

use tracing::{debug, warn};

/// A token longer than this cannot be a pixel value.
const MAX_TOKEN_BYTES: usize = 32;

fn is_delimiter(b: u8) -> bool {
    b == b',' || b.is_ascii_whitespace()
}

#[derive(Debug)]
pub struct TokenStreamDecoder {
    target: usize,
    samples: Vec<u8>,
    /// Bytes of the token in progress, never more than `MAX_TOKEN_BYTES`
    token: Vec<u8>,
    /// The token in progress already exceeded `MAX_TOKEN_BYTES`
    overlong: bool,
    rejected: usize,
}

impl TokenStreamDecoder {
    /// Decoder that stops after `target` samples.
    pub fn new(target: usize) -> Self {
        Self {
            target,
            samples: Vec::with_capacity(target),
            token: Vec::with_capacity(MAX_TOKEN_BYTES),
            overlong: false,
            rejected: 0,
        }
    }

    /// Feeds one chunk and returns how many samples it completed.
    pub fn push(&mut self, chunk: &[u8]) -> usize {
        let before = self.samples.len();

        for &b in chunk {
            if self.is_complete() {
                break;
            }
            if is_delimiter(b) {
                self.end_token();
            } else if self.overlong {
                continue;
            } else if self.token.len() == MAX_TOKEN_BYTES {
                debug!("Discarding token longer than {} bytes", MAX_TOKEN_BYTES);
                self.overlong = true;
                self.token.clear();
            } else {
                self.token.push(b);
            }
        }

        if self.is_complete() {
            self.token.clear();
            self.overlong = false;
        }

        let added = self.samples.len() - before;
        debug!(
            chunk_len = chunk.len(),
            added,
            total = self.samples.len(),
            pending = self.token.len(),
            "Decoded chunk"
        );
        added
    }

    /// Treats the token in progress as complete. Call once the source reports
    /// end of stream.
    pub fn finish(&mut self) -> usize {
        if self.is_complete() {
            return 0;
        }
        let before = self.samples.len();
        self.end_token();
        self.samples.len() - before
    }

    fn end_token(&mut self) {
        if std::mem::take(&mut self.overlong) {
            self.rejected += 1;
            return;
        }
        if self.token.is_empty() {
            return;
        }
        let token = std::mem::take(&mut self.token);
        self.accept(&token);
        self.token = token;
        self.token.clear();
    }

    fn accept(&mut self, token: &[u8]) {
        if !token.iter().all(u8::is_ascii_digit) {
            self.rejected += 1;
            return;
        }
        let value = token
            .iter()
            .try_fold(0u8, |acc, d| acc.checked_mul(10)?.checked_add(d - b'0'));
        match value {
            Some(value) => self.samples.push(value),
            None => {
                warn!("Dropping out-of-range pixel token {:?}", String::from_utf8_lossy(token));
                self.rejected += 1;
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.samples.len() >= self.target
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Tokens dropped as noise so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }
}
