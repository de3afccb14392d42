//! This library provides the [`LineReader`] type to read the lines of a
//! seekable byte stream in reverse order, last line first.
//!
//! The [`LineReader`] is helpful if you want to tail a log file or scan a
//! large file backward: memory use is bounded by the configured buffer size
//! (and, for [`read_string`], by the longest line), never by the length of
//! the stream.
//!
//! # Examples
//!
//! - Print the last two lines of a file, without loading the entire file
//!   into memory.
//!
//! ```no_run
//! use revlines::{LineReader, Result};
//! use std::fs::File;
//!
//! fn main() -> Result<()> {
//!     let mut f = File::open("./app.log")?;
//!     let mut reader = LineReader::new(&mut f);
//!
//!     println!("{}", reader.read_string()?);
//!     println!("{}", reader.read_string()?);
//!
//!     Ok(())
//! }
//! ```
//!
//! Lines are returned with their trailing `\n` or `\r\n` stripped, in
//! correct forward order. A line longer than the buffer size is yielded by
//! [`read_line`] as several fragments, tail of the line first; use
//! [`read_string`] to get whole lines regardless of length.
//!
//! Reading continues until the start of the stream is reached, after which
//! every call fails with [`ErrorKind::EndOfStream`]. Any failure of the
//! underlying stream is terminal as well: the reader re-surfaces the
//! recorded error on every later call without touching the stream again.
//!
//! [`read_line`]: LineReader::read_line
//! [`read_string`]: LineReader::read_string
#![deny(missing_docs)]

mod error;
pub use error::{Error, ErrorKind, Result};

mod reader;
pub use reader::RevReader;

mod lines;
pub use lines::{Line, LineReader};

mod prepend;
