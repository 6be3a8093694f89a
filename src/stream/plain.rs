use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::RecordStream;

/// Uncompressed record stream whose positions are byte offsets.
pub struct PlainReader<R: Read + Seek> {
    inner: BufReader<R>,
    /// Byte offset of the next unread byte
    pos: u64,
}
impl PlainReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        File::open(path).map(Self::new)
    }
}
impl<R: Read + Seek> PlainReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            pos: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R: Read + Seek> Read for PlainReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<R: Read + Seek> BufRead for PlainReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt);
        self.pos += amt as u64;
    }
}

impl<R: Read + Seek> RecordStream for PlainReader<R> {
    fn tell(&self) -> u64 {
        self.pos
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.pos = self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }
}
