use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use tracing::trace;

use crate::assay_pipeline::acquisition::source::{ByteSource, ReadOutcome};

#[derive(Debug)]
enum Step {
    Chunk(Vec<u8>),
    Silence,
    Fail(io::ErrorKind),
}

/// In-memory byte source that plays back a fixed script of chunks.
///
/// Useful for replaying a recorded device session and for deterministic tests.
/// Once the script is drained the source either reports [`ReadOutcome::Closed`]
/// or stays silent, depending on [`ScriptedSource::close_when_drained`].
#[derive(Debug, Default)]
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    written: Vec<u8>,
    close_when_drained: bool,
    reads: usize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script made of the given chunks, in order.
    pub fn from_chunks<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        let mut source = Self::new();
        for chunk in chunks {
            source = source.chunk(chunk);
        }
        source
    }

    /// Splits `data` into chunks of `chunk_size` bytes.
    pub fn from_bytes(data: &[u8], chunk_size: usize) -> Self {
        Self::from_chunks(data.chunks(chunk_size.max(1)).map(|c| c.to_vec()))
    }

    pub fn chunk(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.steps.push_back(Step::Chunk(bytes.into()));
        self
    }

    /// One read that times out without data.
    pub fn silence(mut self) -> Self {
        self.steps.push_back(Step::Silence);
        self
    }

    pub fn fail(mut self, kind: io::ErrorKind) -> Self {
        self.steps.push_back(Step::Fail(kind));
        self
    }

    pub fn close_when_drained(mut self, close: bool) -> Self {
        self.close_when_drained = close;
        self
    }

    /// Everything written to the source so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Number of read calls served.
    pub fn reads(&self) -> usize {
        self.reads
    }

    fn idle(&self, timeout: Duration) -> ReadOutcome {
        if self.close_when_drained {
            return ReadOutcome::Closed;
        }
        std::thread::sleep(timeout);
        ReadOutcome::TimedOut
    }
}

impl ByteSource for ScriptedSource {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<ReadOutcome> {
        self.reads += 1;
        let Some(step) = self.steps.pop_front() else {
            return Ok(self.idle(timeout));
        };

        match step {
            Step::Chunk(mut bytes) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    // Serve the rest on the next read.
                    self.steps.push_front(Step::Chunk(bytes.split_off(n)));
                }
                trace!("Scripted read served {} bytes", n);
                Ok(ReadOutcome::Data(n))
            }
            Step::Silence => {
                std::thread::sleep(timeout);
                Ok(ReadOutcome::TimedOut)
            }
            Step::Fail(kind) => Err(io::Error::new(kind, "scripted failure")),
        }
    }
}
