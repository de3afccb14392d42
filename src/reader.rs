use crate::error::Result;
use std::io::{Read, Seek, SeekFrom};

/// Reader that walks a seekable byte stream backward in fixed-size blocks.
///
/// Each call to [`read_block`] fills the given buffer with the bytes
/// immediately preceding the previously returned block, in their natural
/// forward order, so successive blocks move from the end of the stream
/// toward its start.
///
/// # Examples
///
/// ```
/// use revlines::RevReader;
/// use std::io::Cursor;
///
/// let mut cursor = Cursor::new(b"ABCD".to_vec());
/// let mut reader = RevReader::new(&mut cursor);
///
/// let mut buf = [0u8; 2];
/// assert_eq!(reader.read_block(&mut buf).unwrap(), 2);
/// assert_eq!(&buf, b"CD");
/// assert_eq!(reader.read_block(&mut buf).unwrap(), 2);
/// assert_eq!(&buf, b"AB");
/// assert_eq!(reader.read_block(&mut buf).unwrap(), 0);
/// ```
///
/// The `RevReader` mutates the read position of the stream it wraps, which
/// is why it holds the stream exclusively; it must not be shared with other
/// consumers.
///
/// [`read_block`]: RevReader::read_block
#[derive(Debug)]
pub struct RevReader<'a, RS: 'a + Read + Seek> {
    inner: &'a mut RS,
    // Offset of the first byte of the last returned block; None until the
    // first call discovers the stream length.
    pos: Option<u64>,
}

impl<'a, RS: 'a + Read + Seek> RevReader<'a, RS> {
    /// Creates a new `RevReader` that wraps a byte stream implementing
    /// `Read` and `Seek`.
    ///
    /// The stream length is not queried until the first call to
    /// [`read_block`](RevReader::read_block).
    pub fn new(stream: &'a mut RS) -> Self {
        RevReader { inner: stream, pos: None }
    }

    /// Reads the block of bytes immediately preceding the previous one.
    ///
    /// Fills `buf` from its front and returns the number of bytes read,
    /// which equals `buf.len()` except for the final block at the start of
    /// the stream, which may be shorter. Returns `Ok(0)` once the start of
    /// the stream has been reached.
    ///
    /// # Errors
    ///
    /// Any seek or read failure of the underlying stream is returned as an
    /// error variant of `ErrorKind::Io`, without retrying.
    pub fn read_block(&mut self, buf: &mut [u8]) -> Result<usize> {
        let pos = match self.pos {
            Some(pos) => pos,
            None => {
                let end = self.inner.seek(SeekFrom::End(0))?;
                self.pos = Some(end);
                end
            }
        };
        if pos == 0 {
            return Ok(0);
        }

        let len = (buf.len() as u64).min(pos);
        let start = pos - len;
        self.inner.seek(SeekFrom::Start(start))?;
        self.inner.read_exact(&mut buf[..len as usize])?;
        self.pos = Some(start);
        Ok(len as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_blocks_back_to_front() {
        let mut cursor = Cursor::new(b"ABCDE".to_vec());
        let mut reader = RevReader::new(&mut cursor);

        let mut buf = [0u8; 2];
        assert_eq!(reader.read_block(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"DE");
        assert_eq!(reader.read_block(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"BC");
        assert_eq!(reader.read_block(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'A');
        assert_eq!(reader.read_block(&mut buf).unwrap(), 0);
        assert_eq!(reader.read_block(&mut buf).unwrap(), 0);
    }

    #[test]
    fn single_block_covers_short_stream() {
        let mut cursor = Cursor::new(b"AB".to_vec());
        let mut reader = RevReader::new(&mut cursor);

        let mut buf = [0u8; 8];
        assert_eq!(reader.read_block(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"AB");
        assert_eq!(reader.read_block(&mut buf).unwrap(), 0);
    }

    #[test]
    fn empty_stream_is_exhausted_immediately() {
        let mut cursor = Cursor::new(Vec::new());
        let mut reader = RevReader::new(&mut cursor);

        let mut buf = [0u8; 4];
        assert_eq!(reader.read_block(&mut buf).unwrap(), 0);
    }
}
