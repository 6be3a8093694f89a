use std::fmt;
use std::io::Write;

use crate::error::Result;

/// A FASTQ record retrieved from an index.
///
/// Holds the header text without its leading `@`, the sequence and the quality
/// string. The separator line is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    pub(crate) name: Vec<u8>,
    pub(crate) sequence: Vec<u8>,
    pub(crate) quality: Vec<u8>,
}
impl Record {
    pub fn new(name: Vec<u8>, sequence: Vec<u8>, quality: Vec<u8>) -> Self {
        Self {
            name,
            sequence,
            quality,
        }
    }

    /// Header text, which is also the record's key
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn quality(&self) -> &[u8] {
        &self.quality
    }

    /// Returns the header as a string slice
    pub fn name_str(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.name)?)
    }

    /// Empties every field while keeping allocations
    pub fn clear(&mut self) {
        self.name.clear();
        self.sequence.clear();
        self.quality.clear();
    }

    /// Writes the record as four FASTQ lines with a bare `+` separator
    pub fn write_fastq<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(b"@")?;
        writer.write_all(&self.name)?;
        writer.write_all(b"\n")?;
        writer.write_all(&self.sequence)?;
        writer.write_all(b"\n+\n")?;
        writer.write_all(&self.quality)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{}\n{}\n+\n{}",
            String::from_utf8_lossy(&self.name),
            String::from_utf8_lossy(&self.sequence),
            String::from_utf8_lossy(&self.quality)
        )
    }
}
