//! Deadline-aware input stream.
//!
//! The engine's token stream has no framing, so the only way to bound a read
//! against an unresponsive peer is to pump the underlying stream from a
//! background thread and wait on a channel with a timeout. The pump thread is
//! invisible to callers; [`DeadlineReader`] presents an ordinary [`BufRead`].

use std::io::{self, BufRead, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

const CHUNK_SIZE: usize = 4096;

/// Wraps a blocking reader, enforcing an optional per-read deadline.
///
/// With `deadline: None` reads block indefinitely, matching a plain buffered
/// reader. With a deadline set, a read that produces no bytes in time fails
/// with [`io::ErrorKind::TimedOut`], which the protocol layer reports as a
/// fatal deadline error.
#[derive(Debug)]
pub struct DeadlineReader {
    rx: Receiver<io::Result<Vec<u8>>>,
    buf: Vec<u8>,
    pos: usize,
    deadline: Option<Duration>,
}

impl DeadlineReader {
    /// Spawn the pump thread over `source` and return the wrapped reader.
    ///
    /// The thread exits when the source reaches end-of-stream, errors, or the
    /// reader is dropped.
    pub fn new<R>(source: R, deadline: Option<Duration>) -> Self
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        thread::spawn(move || {
            let mut source = source;
            let mut chunk = [0u8; CHUNK_SIZE];
            loop {
                match source.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(Ok(chunk[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        break;
                    }
                }
            }
        });
        Self {
            rx,
            buf: Vec::new(),
            pos: 0,
            deadline,
        }
    }

    fn recv(&mut self) -> io::Result<Option<Vec<u8>>> {
        let received = match self.deadline {
            Some(deadline) => match self.rx.recv_timeout(deadline) {
                Ok(chunk) => chunk,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "read deadline elapsed",
                    ));
                }
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
            },
            None => match self.rx.recv() {
                Ok(chunk) => chunk,
                Err(_) => return Ok(None),
            },
        };
        received.map(Some)
    }
}

impl Read for DeadlineReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let chunk = self.fill_buf()?;
        let n = chunk.len().min(out.len());
        out[..n].copy_from_slice(&chunk[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for DeadlineReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.buf.len() {
            match self.recv()? {
                Some(chunk) => {
                    self.buf = chunk;
                    self.pos = 0;
                }
                // pump thread gone: end of stream
                None => return Ok(&[]),
            }
        }
        Ok(&self.buf[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.buf.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that stalls for `delay`, then reports end-of-stream.
    struct StalledReader {
        delay: Duration,
    }

    impl Read for StalledReader {
        fn read(&mut self, _out: &mut [u8]) -> io::Result<usize> {
            thread::sleep(self.delay);
            Ok(0)
        }
    }

    #[test]
    fn test_passes_data_through() {
        let reader = DeadlineReader::new(Cursor::new(b"7 3\n".to_vec()), None);
        let mut lines = reader.lines();
        assert_eq!(lines.next().unwrap().unwrap(), "7 3");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_deadline_applies_per_read() {
        let reader = DeadlineReader::new(
            Cursor::new(b"7 3\n".to_vec()),
            Some(Duration::from_secs(5)),
        );
        let mut lines = reader.lines();
        assert_eq!(lines.next().unwrap().unwrap(), "7 3");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_stalled_source_times_out() {
        let mut reader = DeadlineReader::new(
            StalledReader {
                delay: Duration::from_millis(500),
            },
            Some(Duration::from_millis(20)),
        );
        let mut out = [0u8; 16];
        let err = reader.read(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_source_error_is_surfaced() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _out: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
            }
        }

        let mut reader = DeadlineReader::new(FailingReader, None);
        let mut out = [0u8; 16];
        let err = reader.read(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
