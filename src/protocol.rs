//! Wire protocol for talking to the match engine.
//!
//! The engine speaks a plain whitespace-delimited token stream over the
//! process's standard streams: no framing, no envelopes. Each read scans past
//! whitespace and newlines to the next token; each command is written as its
//! own line. A turn ends with the literal line `D_FINISH`.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};

/// Command that marks the end of an agent's turn.
pub const FINISH: &str = "D_FINISH";

/// Reads whitespace-delimited tokens from the engine stream.
///
/// Tokens are pulled line by line from the underlying reader and handed out
/// one at a time, so separators may be spaces, tabs, or newlines in any mix.
/// Reads are typed: a token that does not parse as the requested type is a
/// [`Error::Format`], and a stream that ends early is an [`Error::Eof`].
#[derive(Debug)]
pub struct TokenReader<R> {
    inner: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    /// Create a reader over an engine input stream.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
        }
    }

    /// Next raw token, scanning past blank lines and leading whitespace.
    fn next(&mut self, expected: &'static str) -> Result<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            let read = match self.inner.read_line(&mut line) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => return Err(Error::Deadline),
                Err(e) => return Err(Error::Io(e)),
            };
            if read == 0 {
                return Err(Error::Eof { expected });
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }

    /// Read the next token as a signed integer.
    pub fn next_int(&mut self) -> Result<i64> {
        let token = self.next("integer")?;
        token.parse().map_err(|_| Error::Format {
            expected: "integer",
            token,
        })
    }

    /// Read the next token as a string.
    pub fn next_str(&mut self) -> Result<String> {
        self.next("string")
    }

    /// Give back the underlying reader, dropping any buffered tokens.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Writes command tokens to the engine stream.
#[derive(Debug)]
pub struct TokenWriter<W> {
    inner: W,
}

impl<W: Write> TokenWriter<W> {
    /// Create a writer over an engine output stream.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Send one command token on its own line.
    pub fn command(&mut self, token: &str) -> Result<()> {
        writeln!(self.inner, "{}", token)?;
        Ok(())
    }

    /// Signal the engine that this turn is over.
    ///
    /// Writes the `D_FINISH` line and flushes, so the engine never waits on a
    /// finish command stuck in a buffer.
    pub fn finish(&mut self) -> Result<()> {
        writeln!(self.inner, "{}", FINISH)?;
        self.inner.flush()?;
        Ok(())
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_tokens_split_on_any_whitespace() {
        let mut reader = TokenReader::new(Cursor::new("7\n3\n"));
        assert_eq!(reader.next_int().unwrap(), 7);
        assert_eq!(reader.next_int().unwrap(), 3);

        let mut reader = TokenReader::new(Cursor::new("  7 \t 3 "));
        assert_eq!(reader.next_int().unwrap(), 7);
        assert_eq!(reader.next_int().unwrap(), 3);

        let mut reader = TokenReader::new(Cursor::new("\n\n1 rock\n"));
        assert_eq!(reader.next_int().unwrap(), 1);
        assert_eq!(reader.next_str().unwrap(), "rock");
    }

    #[test]
    fn test_non_integer_token_is_format_error() {
        let mut reader = TokenReader::new(Cursor::new("rock\n"));
        let err = reader.next_int().unwrap_err();
        assert!(matches!(
            err,
            Error::Format {
                expected: "integer",
                ..
            }
        ));
    }

    #[test]
    fn test_format_error_does_not_consume_following_tokens() {
        let mut reader = TokenReader::new(Cursor::new("rock 4\n"));
        assert!(reader.next_int().is_err());
        assert_eq!(reader.next_int().unwrap(), 4);
    }

    #[test]
    fn test_closed_stream_is_eof_error() {
        let mut reader = TokenReader::new(Cursor::new(""));
        assert!(matches!(
            reader.next_int().unwrap_err(),
            Error::Eof { expected: "integer" }
        ));

        let mut reader = TokenReader::new(Cursor::new("7\n"));
        assert_eq!(reader.next_int().unwrap(), 7);
        assert!(matches!(reader.next_str().unwrap_err(), Error::Eof { .. }));
    }

    #[test]
    fn test_negative_integers_parse() {
        let mut reader = TokenReader::new(Cursor::new("-1\n"));
        assert_eq!(reader.next_int().unwrap(), -1);
    }

    #[test]
    fn test_finish_writes_single_line() {
        let mut out = Vec::new();
        let mut writer = TokenWriter::new(&mut out);
        writer.finish().unwrap();
        assert_eq!(out, b"D_FINISH\n");
    }

    #[test]
    fn test_command_then_finish() {
        let mut out = Vec::new();
        let mut writer = TokenWriter::new(&mut out);
        writer.command("R").unwrap();
        writer.finish().unwrap();
        assert_eq!(out, b"R\nD_FINISH\n");
    }
}
