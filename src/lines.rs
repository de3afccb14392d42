use crate::error::{Error, ErrorKind, Result};
use crate::prepend::prepend;
use crate::reader::RevReader;
use std::io::{Read, Seek};

const DEFAULT_BUF_SIZE: usize = 4096;

/// Reader that yields the lines of a seekable byte stream in reverse order,
/// last line first.
///
/// Lines are reconstructed in their natural forward order with any trailing
/// `\n` or `\r\n` stripped. The reader never holds more than two buffers of
/// the configured size, so memory use is bounded by the buffer size rather
/// than the stream length.
///
/// # Examples
///
/// ```
/// use revlines::LineReader;
/// use std::io::Cursor;
///
/// let mut cursor = Cursor::new(b"Hello\nworld!".to_vec());
/// let mut reader = LineReader::new(&mut cursor);
///
/// assert_eq!(reader.read_string().unwrap(), "world!");
/// assert_eq!(reader.read_string().unwrap(), "Hello");
/// assert!(reader.read_string().unwrap_err().is_end_of_stream());
/// ```
///
/// Lines longer than the buffer size are returned by [`read_line`] as
/// multiple fragments, tail of the line first; [`read_string`] reassembles
/// them transparently. The default buffer size is 4096 bytes, configurable
/// via [`with_capacity`](LineReader::with_capacity).
///
/// [`read_line`]: LineReader::read_line
/// [`read_string`]: LineReader::read_string
#[derive(Debug)]
pub struct LineReader<'a, RS: 'a + Read + Seek> {
    src: RevReader<'a, RS>,
    block: Vec<u8>,     // the most recent block, bytes in forward order
    bpos: usize,        // read cursor into `block`, counting down to 0
    line: Vec<u8>,      // line buffer, filled from the tail end backward
    llen: usize,        // length of the live content at the buffer's tail
    term: usize,        // trailing terminator bytes recognized so far (0..=2)
    lookahead: Option<u8>, // one pushed-back byte, consumed before `block`
    state: State,
}

#[derive(Debug, Clone)]
enum State {
    Reading,
    Ended,
    Failed(Error),
}

/// A line, or a fragment of an over-length line, yielded by
/// [`LineReader::read_line`].
///
/// The borrowed bytes are valid until the next call on the reader. A
/// complete line never contains the terminator that ended it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    bytes: &'a [u8],
    fragment: bool,
}

impl<'a> Line<'a> {
    /// The bytes of this line or fragment, in forward order.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns `true` if this is a fragment of a line that exceeds the
    /// reader's buffer size. The remainder of the line, moving toward its
    /// start, is returned by subsequent [`read_line`] calls.
    ///
    /// [`read_line`]: LineReader::read_line
    pub fn is_fragment(&self) -> bool {
        self.fragment
    }
}

impl<'a, RS: 'a + Read + Seek> LineReader<'a, RS> {
    /// Creates a new `LineReader` that reads lines beginning at the end of
    /// the stream, with the default buffer size of 4096 bytes.
    ///
    /// Lines exceeding 4096 bytes will be returned as multiple fragments.
    pub fn new(stream: &'a mut RS) -> Self {
        LineReader::with_capacity(stream, DEFAULT_BUF_SIZE)
    }

    /// Creates a new `LineReader` that reads lines beginning at the end of
    /// the stream, with the given buffer size.
    ///
    /// The size bounds both the I/O block granularity and the longest line
    /// returned without fragmentation; lines exceeding `size` bytes will be
    /// returned as multiple fragments.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn with_capacity(stream: &'a mut RS, size: usize) -> Self {
        assert!(size > 0, "buffer size must be nonzero");
        LineReader {
            src: RevReader::new(stream),
            block: vec![0; size],
            bpos: 0,
            line: vec![0; size],
            llen: 0,
            term: 0,
            lookahead: None,
            state: State::Reading,
        }
    }

    /// Reads the next line moving toward the start of the stream.
    ///
    /// Returns a complete line with its trailing `\n` or `\r\n` stripped,
    /// or a fragment if the line exceeds the buffer size (see
    /// [`Line::is_fragment`]). When the whole stream has been consumed, the
    /// content accumulated since the last terminator is returned as a final
    /// complete line (the empty line, for an empty stream), and every call
    /// after that fails with `ErrorKind::EndOfStream`.
    ///
    /// # Errors
    ///
    /// Fails with `ErrorKind::EndOfStream` after the final line, or with
    /// `ErrorKind::Io` if the underlying stream fails. Either condition is
    /// sticky: subsequent calls return the same error without touching the
    /// stream again.
    ///
    /// # Examples
    ///
    /// ```
    /// use revlines::LineReader;
    /// use std::io::Cursor;
    ///
    /// let mut cursor = Cursor::new(b"ABCDE".to_vec());
    /// let mut reader = LineReader::with_capacity(&mut cursor, 4);
    ///
    /// let line = reader.read_line().unwrap();
    /// assert_eq!(line.bytes(), b"BCDE");
    /// assert!(line.is_fragment());
    ///
    /// let line = reader.read_line().unwrap();
    /// assert_eq!(line.bytes(), b"A");
    /// assert!(!line.is_fragment());
    /// ```
    pub fn read_line(&mut self) -> Result<Line<'_>> {
        match &self.state {
            State::Reading => {}
            State::Ended => return Err(Error::new(ErrorKind::EndOfStream)),
            State::Failed(err) => return Err(err.clone()),
        }
        loop {
            let b = match self.next_byte() {
                Ok(Some(b)) => b,
                Ok(None) => {
                    self.state = State::Ended;
                    return Ok(self.emit(false));
                }
                Err(err) => {
                    self.state = State::Failed(err.clone());
                    return Err(err);
                }
            };
            if b == b'\n' && self.line_len() > 0 {
                // Boundary with the line assembled so far; the byte belongs
                // to the next (earlier) line's terminator.
                self.lookahead = Some(b);
                return Ok(self.emit(false));
            }
            if !self.push(b) {
                self.lookahead = Some(b);
                return Ok(self.emit(true));
            }
        }
    }

    /// Reads the next line as a `String`, reassembling fragments.
    ///
    /// This method buffers as many bytes as the longest line in the stream.
    /// If you need more control over memory consumption, use
    /// [`read_line`](LineReader::read_line) and deal with fragments
    /// yourself. Bytes that are not valid UTF-8 are replaced with
    /// `U+FFFD`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`read_line`](LineReader::read_line); a stream
    /// failure mid-line discards the partially assembled content.
    pub fn read_string(&mut self) -> Result<String> {
        let mut buf: Vec<u8>;
        {
            let line = self.read_line()?;
            if !line.is_fragment() {
                return Ok(String::from_utf8_lossy(line.bytes()).into_owned());
            }
            buf = Vec::with_capacity(line.bytes().len() * 2);
            buf.extend_from_slice(line.bytes());
        }
        loop {
            let line = self.read_line()?;
            let fragment = line.is_fragment();
            buf = prepend(buf, line.bytes());
            if !fragment {
                return Ok(String::from_utf8_lossy(&buf).into_owned());
            }
        }
    }
}

impl<'a, RS: 'a + Read + Seek> LineReader<'a, RS> {
    /// Returns the next byte moving backward through the stream, or `None`
    /// once the start of the stream is reached.
    fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.lookahead.take() {
            return Ok(Some(b));
        }
        if self.bpos == 0 {
            let n = self.src.read_block(&mut self.block)?;
            if n == 0 {
                return Ok(None);
            }
            self.bpos = n;
        }
        self.bpos -= 1;
        Ok(Some(self.block[self.bpos]))
    }

    /// Classifies a byte against the current line and stores it if it is
    /// content. Returns `false` if the line buffer is full, leaving the
    /// byte unconsumed.
    fn push(&mut self, b: u8) -> bool {
        if self.llen >= self.line.len() {
            return false; // line too long
        }
        if self.term == 0 && b == b'\n' {
            self.term = 1; // do not store the trailing LF
        } else if self.term == 1 && b == b'\r' {
            self.term = 2; // do not store the CR of a trailing CRLF
        } else {
            self.llen += 1;
            let at = self.line.len() - self.llen;
            self.line[at] = b;
        }
        true
    }

    /// Flushes the accumulated content as a line record and resets the line
    /// state for the next one. The returned slice stays valid until the
    /// next `read_line` call overwrites the buffer.
    fn emit(&mut self, fragment: bool) -> Line<'_> {
        let start = self.line.len() - self.llen;
        self.llen = 0;
        self.term = 0;
        Line {
            bytes: &self.line[start..],
            fragment,
        }
    }

    /// Bytes of the current line seen so far, terminator included.
    fn line_len(&self) -> usize {
        self.llen + self.term
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn strings(input: &[u8], size: usize) -> Vec<String> {
        let mut cursor = Cursor::new(input.to_vec());
        let mut reader = LineReader::with_capacity(&mut cursor, size);
        let mut out = Vec::new();
        loop {
            match reader.read_string() {
                Ok(line) => out.push(line),
                Err(err) => {
                    assert!(err.is_end_of_stream());
                    return out;
                }
            }
        }
    }

    #[test]
    fn reads_lines_last_to_first() {
        assert_eq!(strings(b"Hello\nworld!", 4096), ["world!", "Hello"]);
        assert_eq!(strings(b"Hello world!", 4096), ["Hello world!"]);
        assert_eq!(strings(b"Hello\nworld!\n", 4096), ["world!", "Hello"]);
    }

    #[test]
    fn empty_stream_yields_one_empty_line() {
        assert_eq!(strings(b"", 4096), [""]);
    }

    #[test]
    fn blank_lines_are_preserved() {
        assert_eq!(strings(b"\n", 4096), [""]);
        assert_eq!(strings(b"\n\n", 4096), ["", ""]);
        assert_eq!(strings(b"Hello\n\nworld!\n", 4096), ["world!", "", "Hello"]);
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        assert_eq!(strings(b"Hello\r\nworld!", 4096), ["world!", "Hello"]);
        assert_eq!(strings(b"Hello\r\nworld!\r\n", 4096), ["world!", "Hello"]);
        assert_eq!(
            strings(b"Hello\r\n\r\nworld!\r\n", 4096),
            ["world!", "", "Hello"]
        );
        assert_eq!(strings(b"\r\n\r\n", 4096), ["", ""]);
    }

    #[test]
    fn terminator_at_true_end_is_equivalent_to_none() {
        assert_eq!(strings(b"A", 4096), ["A"]);
        assert_eq!(strings(b"A\n", 4096), ["A"]);
        assert_eq!(strings(b"A\r\n", 4096), ["A"]);
    }

    #[test]
    fn only_one_trailing_cr_is_stripped() {
        assert_eq!(strings(b"a\r\r\n", 4096), ["a\r"]);
        assert_eq!(strings(b"\rA", 4096), ["\rA"]);
    }

    #[test]
    fn over_length_line_is_fragmented() {
        let mut cursor = Cursor::new(b"ABCDE\n".to_vec());
        let mut reader = LineReader::with_capacity(&mut cursor, 4);

        let line = reader.read_line().unwrap();
        assert_eq!(line.bytes(), b"BCDE");
        assert!(line.is_fragment());

        let line = reader.read_line().unwrap();
        assert_eq!(line.bytes(), b"A");
        assert!(!line.is_fragment());

        assert!(reader.read_line().unwrap_err().is_end_of_stream());
    }

    #[test]
    fn read_string_reassembles_fragments() {
        for size in 1..=8 {
            assert_eq!(strings(b"ABCDE\nVWXYZ", size), ["VWXYZ", "ABCDE"]);
        }
    }

    #[test]
    fn end_of_stream_is_sticky() {
        let mut cursor = Cursor::new(b"A\n".to_vec());
        let mut reader = LineReader::new(&mut cursor);

        assert_eq!(reader.read_line().unwrap().bytes(), b"A");
        assert!(reader.read_line().unwrap_err().is_end_of_stream());
        assert!(reader.read_line().unwrap_err().is_end_of_stream());
        assert!(reader.read_string().unwrap_err().is_end_of_stream());
    }

    #[test]
    #[should_panic(expected = "buffer size must be nonzero")]
    fn zero_buffer_size_panics() {
        let mut cursor = Cursor::new(Vec::new());
        let _ = LineReader::with_capacity(&mut cursor, 0);
    }
}
