use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::assay_pipeline::acquisition::source::{ByteSource, ReadOutcome};

/// Byte source over a TCP connection, e.g. a serial-to-network bridge in front
/// of the reader's microcontroller.
///
/// The connection is closed when the source is dropped.
pub struct TcpSource {
    stream: TcpStream,
}

impl TcpSource {
    pub fn connect<A: ToSocketAddrs>(addr: A, connect_timeout: Duration) -> io::Result<Self> {
        let mut last_err = None;
        for addr in addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, connect_timeout) {
                Ok(stream) => {
                    debug!("Connected to device bridge at {}", addr);
                    stream.set_nodelay(true)?;
                    return Ok(Self { stream });
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
        }))
    }
}

impl ByteSource for TcpSource {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<ReadOutcome> {
        // A zero duration means "block forever" to the socket API.
        if timeout.is_zero() {
            return Ok(ReadOutcome::TimedOut);
        }
        self.stream.set_read_timeout(Some(timeout))?;
        match self.stream.read(buf) {
            Ok(0) => Ok(ReadOutcome::Closed),
            Ok(n) => Ok(ReadOutcome::Data(n)),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(ReadOutcome::TimedOut)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(ReadOutcome::TimedOut),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_reads_until_peer_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let device = std::thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut trigger = [0u8; 3];
            conn.read_exact(&mut trigger).unwrap();
            assert_eq!(&trigger, b"99\n");
            conn.write_all(b"1,2,3\n").unwrap();
        });

        let mut source = TcpSource::connect(addr, Duration::from_secs(1)).unwrap();
        source.write(b"99\n").unwrap();

        let mut received = Vec::new();
        let mut buf = [0u8; 64];
        loop {
            match source.read(&mut buf, Duration::from_millis(500)).unwrap() {
                ReadOutcome::Data(n) => received.extend_from_slice(&buf[..n]),
                ReadOutcome::TimedOut => continue,
                ReadOutcome::Closed => break,
            }
        }
        device.join().unwrap();
        assert_eq!(received, b"1,2,3\n");
    }
}
