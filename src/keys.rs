//! Accession keys of a FASTQ stream.
//!
//! Both build passes walk the stream with the same [`HeaderScanner`], so the
//! key handed to the hash construction and the key whose position is stored in
//! the offset table are always extracted identically.

use std::io;

use auto_impl::auto_impl;
use tracing::debug;

use crate::error::{Result, StreamError};
use crate::stream::{read_line, RecordStream};

/// First byte of every FASTQ header line
pub const RECORD_MARKER: u8 = b'@';

/// Number of physical lines per FASTQ record
pub const LINES_PER_RECORD: usize = 4;

/// A rewindable, ordered source of keys for perfect hash construction.
///
/// Constructions may need several passes over the keys (for example when a
/// seed fails and a new one is drawn), so sources must support [`rewind`].
///
/// [`rewind`]: KeySource::rewind
#[auto_impl(&mut, Box)]
pub trait KeySource {
    /// Expected number of keys, used as a capacity hint only
    fn estimated_len(&self) -> usize;

    /// Writes the next key into `key`, replacing its contents.
    ///
    /// Returns `false` once the source is exhausted.
    fn next_key(&mut self, key: &mut Vec<u8>) -> Result<bool>;

    /// Restarts the source from its first key
    fn rewind(&mut self) -> Result<()>;
}

/// Walks a FASTQ stream one record at a time.
///
/// At each record boundary a line starting with [`RECORD_MARKER`] is a header;
/// its remaining text is the key and the sequence, separator and quality lines
/// that follow are skipped. Any other line at a record boundary (such as a
/// blank line) is skipped on its own. Quality lines are never inspected, so a
/// quality string starting with `@` cannot be mistaken for a header.
#[derive(Debug, Default)]
pub struct HeaderScanner {
    /// Reusable buffer for skipped lines
    scratch: Vec<u8>,
}
impl HeaderScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the next header into `key`.
    ///
    /// Returns the stream position immediately after the marker byte (the
    /// start of the key text), or `None` at end of stream.
    pub fn next_header<S: RecordStream + ?Sized>(
        &mut self,
        stream: &mut S,
        key: &mut Vec<u8>,
    ) -> io::Result<Option<u64>> {
        loop {
            let first = match stream.fill_buf()?.first() {
                Some(&byte) => byte,
                None => return Ok(None),
            };
            if first != RECORD_MARKER {
                read_line(stream, &mut self.scratch)?;
                continue;
            }

            stream.consume(1);
            let pos = stream.tell();
            if read_line(stream, key)?.is_none() {
                // a bare marker as the final byte of the stream
                key.clear();
                return Ok(None);
            }
            for _ in 1..LINES_PER_RECORD {
                if read_line(stream, &mut self.scratch)?.is_none() {
                    break;
                }
            }
            return Ok(Some(pos));
        }
    }
}

/// Counts the records of a stream by a single byte-level pass and rewinds it.
///
/// Only markers at the start of header lines (every fourth line) are counted,
/// so `@` characters in quality strings do not inflate the estimate. The result
/// is still only an estimate: blank or malformed lines shift the line phase.
pub fn estimate_records<S: RecordStream + ?Sized>(stream: &mut S) -> io::Result<usize> {
    stream.rewind()?;

    let mut count = 0;
    let mut line = 0usize;
    let mut at_line_start = true;
    loop {
        let used = {
            let chunk = stream.fill_buf()?;
            if chunk.is_empty() {
                break;
            }
            let mut idx = 0;
            while idx < chunk.len() {
                if at_line_start {
                    if line % LINES_PER_RECORD == 0 && chunk[idx] == RECORD_MARKER {
                        count += 1;
                    }
                    at_line_start = false;
                }
                match memchr::memchr(b'\n', &chunk[idx..]) {
                    Some(offset) => {
                        idx += offset + 1;
                        line += 1;
                        at_line_start = true;
                    }
                    None => idx = chunk.len(),
                }
            }
            chunk.len()
        };
        stream.consume(used);
    }

    stream.rewind()?;
    Ok(count)
}

/// [`KeySource`] over the accessions of a FASTQ record stream
pub struct FastqKeys<S: RecordStream> {
    stream: S,

    /// Record count from the pre-scan
    estimate: usize,

    scanner: HeaderScanner,
}
impl<S: RecordStream> FastqKeys<S> {
    /// Wraps the stream, pre-scanning it once for a record count estimate
    pub fn new(mut stream: S) -> Result<Self> {
        let estimate = estimate_records(&mut stream).map_err(StreamError::Read)?;
        debug!(estimate, "pre-scanned record stream");
        Ok(Self {
            stream,
            estimate,
            scanner: HeaderScanner::new(),
        })
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: RecordStream> KeySource for FastqKeys<S> {
    fn estimated_len(&self) -> usize {
        self.estimate
    }

    fn next_key(&mut self, key: &mut Vec<u8>) -> Result<bool> {
        let pos = self
            .scanner
            .next_header(&mut self.stream, key)
            .map_err(StreamError::Read)?;
        Ok(pos.is_some())
    }

    fn rewind(&mut self) -> Result<()> {
        self.stream.rewind().map_err(StreamError::Read)?;
        Ok(())
    }
}
