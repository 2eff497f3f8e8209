use std::io;
use std::time::Duration;

/// Result of a single bounded read from a [`ByteSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `n` bytes were written to the front of the buffer
    Data(usize),
    /// Nothing arrived within the timeout
    TimedOut,
    /// The peer closed the stream; no further bytes will arrive
    Closed,
}

/// Bidirectional byte channel to the reader's microcontroller.
///
/// Implementations must never block in `read` for longer than `timeout`.
pub trait ByteSource {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<ReadOutcome>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<ReadOutcome> {
        (**self).read(buf, timeout)
    }
}
