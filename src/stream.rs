//! Byte-level input streams.
//!
//! The validator consumes every file one byte at a time so that it can track
//! exact byte offsets for the per-line length checks. Both the raw and the
//! gzip-compressed form of a file present the same cursor surface, so all
//! parsing code is written once against [`ByteSource`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Result;

const BUFFER_SIZE: usize = 65536;

/// A cursor over a stream of bytes.
pub trait ByteSource {
    /// The byte under the cursor. Only meaningful while `valid()` is true.
    fn get(&self) -> u8;

    /// Move the cursor to the next byte, returning whether one is available.
    fn advance(&mut self) -> Result<bool>;

    /// Whether a byte is available under the cursor.
    fn valid(&self) -> bool;

    /// Absolute offset of the byte under the cursor.
    fn position(&self) -> u64;
}

/// Buffered [`ByteSource`] over any reader.
pub struct ByteCursor<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    filled: usize,
    pos: usize,
    /// Absolute offset of `buffer[0]`.
    base: u64,
}

/// Cursor over an uncompressed file.
pub type RawFileSource = ByteCursor<File>;

/// Cursor over the decompressed contents of a gzip file.
pub type GzipFileSource = ByteCursor<GzDecoder<File>>;

impl<R: Read> ByteCursor<R> {
    /// Create a cursor and fill the first buffer.
    pub fn new(reader: R) -> Result<Self> {
        let mut cursor = Self {
            reader,
            buffer: vec![0; BUFFER_SIZE],
            filled: 0,
            pos: 0,
            base: 0,
        };
        cursor.fill()?;
        Ok(cursor)
    }

    fn fill(&mut self) -> Result<()> {
        self.base += self.filled as u64;
        self.filled = 0;
        self.pos = 0;
        while self.filled < self.buffer.len() {
            let n = self.reader.read(&mut self.buffer[self.filled..])?;
            if n == 0 {
                break;
            }
            self.filled += n;
        }
        Ok(())
    }
}

impl ByteCursor<File> {
    /// Open an uncompressed file.
    pub fn open_raw<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::open(path)?)
    }
}

impl ByteCursor<GzDecoder<File>> {
    /// Open a gzip-compressed file; bytes are served decompressed.
    pub fn open_gzip<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(GzDecoder::new(File::open(path)?))
    }
}

impl<R: Read> ByteSource for ByteCursor<R> {
    #[inline]
    fn get(&self) -> u8 {
        self.buffer[self.pos]
    }

    #[inline]
    fn advance(&mut self) -> Result<bool> {
        self.pos += 1;
        if self.pos == self.filled {
            self.fill()?;
        }
        Ok(self.valid())
    }

    #[inline]
    fn valid(&self) -> bool {
        self.pos < self.filled
    }

    #[inline]
    fn position(&self) -> u64 {
        self.base + self.pos as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn drain<S: ByteSource>(src: &mut S) -> Vec<u8> {
        let mut out = Vec::new();
        while src.valid() {
            out.push(src.get());
            src.advance().unwrap();
        }
        out
    }

    #[test]
    fn test_cursor_over_slice() {
        let mut cursor = ByteCursor::new(&b"abc"[..]).unwrap();
        assert!(cursor.valid());
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.get(), b'a');
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.get(), b'b');
        assert!(cursor.advance().unwrap());
        assert!(!cursor.advance().unwrap());
        assert!(!cursor.valid());
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_empty_stream_is_invalid() {
        let cursor = ByteCursor::new(&b""[..]).unwrap();
        assert!(!cursor.valid());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_position_across_buffer_refills() {
        // Longer than one internal buffer so at least one refill happens.
        let payload: Vec<u8> = (0..(BUFFER_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();
        let mut cursor = ByteCursor::new(&payload[..]).unwrap();
        assert_eq!(drain(&mut cursor), payload);
        assert_eq!(cursor.position(), payload.len() as u64);
    }

    #[test]
    fn test_gzip_source_matches_raw() {
        let payload = b"alpha\tbeta\ngamma\n";

        let mut raw_file = NamedTempFile::new().unwrap();
        raw_file.write_all(payload).unwrap();
        raw_file.flush().unwrap();

        let gz_file = NamedTempFile::new().unwrap();
        let mut encoder = GzEncoder::new(gz_file.reopen().unwrap(), Compression::default());
        encoder.write_all(payload).unwrap();
        encoder.finish().unwrap();

        let mut raw = ByteCursor::open_raw(raw_file.path()).unwrap();
        let mut gz = ByteCursor::open_gzip(gz_file.path()).unwrap();
        assert_eq!(drain(&mut raw), payload);
        assert_eq!(drain(&mut gz), payload);
    }
}
