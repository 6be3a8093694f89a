use std::fs::File;
use std::io::{self, BufRead, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use super::RecordStream;

/// Maximum uncompressed payload written into a single block
///
/// Matches the payload size used by `bgzip` so that even incompressible data
/// fits the 64 KiB block limit once deflated and framed.
pub const BGZF_BLOCK_SIZE: usize = 0xff00;

/// Upper bound of a block (compressed or uncompressed) imposed by the 16-bit BSIZE field
const BGZF_MAX_BLOCK: usize = 1 << 16;

/// Fixed gzip member header preceding the extra field
const SIZE_FIXED_HEADER: usize = 12;

/// Size of the BGZF header written by [`BgzfWriter`] (fixed header + `BC` subfield)
const SIZE_BLOCK_HEADER: usize = 18;

/// CRC32 + ISIZE trailer of every block
const SIZE_BLOCK_FOOTER: usize = 8;

/// The empty block terminating every well-formed BGZF file
const EOF_BLOCK: [u8; 28] = [
    0x1f, 0x8b, 0x08, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x06, 0x00, 0x42, 0x43, 0x02, 0x00,
    0x1b, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Sentinel block offset while no valid block is loaded
const NO_BLOCK: u64 = u64::MAX;

fn invalid_block(offset: u64, reason: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("invalid BGZF block at compressed offset {offset}: {reason}"),
    )
}

/// Fills `buf` completely, or returns `false` if the reader is exhausted before the first byte
fn read_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// Checks the gzip magic bytes and the deflate / FEXTRA flags of a block header
fn valid_fixed_header(header: &[u8]) -> bool {
    header.len() >= SIZE_FIXED_HEADER
        && header[0] == 31
        && header[1] == 139
        && header[2] == 8
        && header[3] & 0x04 != 0
}

/// Finds the `BC` subfield within the gzip extra field and returns BSIZE (block size - 1)
fn find_bsize(extra: &[u8]) -> Option<u16> {
    let mut pos = 0;
    while pos + 4 <= extra.len() {
        let slen = LittleEndian::read_u16(&extra[pos + 2..pos + 4]) as usize;
        if extra[pos] == b'B' && extra[pos + 1] == b'C' && slen == 2 {
            return extra
                .get(pos + 4..pos + 6)
                .map(LittleEndian::read_u16);
        }
        pos += 4 + slen;
    }
    None
}

/// Returns true if the file at `path` starts with a BGZF block header
pub fn is_bgzf<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    let mut file = File::open(path)?;
    let mut header = [0u8; SIZE_BLOCK_HEADER];
    if !matches!(read_or_eof(&mut file, &mut header), Ok(true)) {
        return Ok(false);
    }
    if !valid_fixed_header(&header) {
        return Ok(false);
    }
    let xlen = LittleEndian::read_u16(&header[10..12]) as usize;
    let mut extra = vec![0u8; xlen];
    file.seek(SeekFrom::Start(SIZE_FIXED_HEADER as u64))?;
    if !matches!(read_or_eof(&mut file, &mut extra), Ok(true)) {
        return Ok(false);
    }
    Ok(find_bsize(&extra).is_some())
}

/// Random-access reader over a BGZF stream.
///
/// Positions reported by [`RecordStream::tell`] are BGZF virtual offsets
/// (`compressed_block_offset << 16 | offset_within_block`), compatible with the
/// offsets used by htslib.
pub struct BgzfReader<R: Read + Seek> {
    inner: R,

    /// Compressed bytes of the current block (extra field, then deflate payload and trailer)
    cbuf: Vec<u8>,

    /// Decompressed payload of the current block
    ubuf: Vec<u8>,

    /// Compressed offset of the current block
    block_offset: u64,

    /// Compressed offset of the block following the current one
    next_offset: u64,

    /// Read cursor within `ubuf`
    cursor: usize,
}
impl BgzfReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::new(file)
    }
}
impl<R: Read + Seek> BgzfReader<R> {
    /// Creates a reader positioned at the start of the stream.
    ///
    /// The first block is decoded immediately so that non-BGZF input is
    /// rejected here rather than on the first read.
    pub fn new(mut inner: R) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(0))?;
        let mut reader = Self {
            inner,
            cbuf: Vec::new(),
            ubuf: Vec::with_capacity(BGZF_MAX_BLOCK),
            block_offset: 0,
            next_offset: 0,
            cursor: 0,
        };
        reader.load_block()?;
        Ok(reader)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Decodes the block starting at `next_offset`.
    ///
    /// The inner reader must be positioned at `next_offset`. Returns `false` at
    /// the end of the stream, leaving an empty payload. On error no block is
    /// loaded, so the next seek always reloads from the inner reader.
    fn load_block(&mut self) -> io::Result<bool> {
        let loaded = self.decode_block();
        if loaded.is_err() {
            self.ubuf.clear();
            self.cursor = 0;
            self.block_offset = NO_BLOCK;
        }
        loaded
    }

    fn decode_block(&mut self) -> io::Result<bool> {
        self.block_offset = self.next_offset;
        self.ubuf.clear();
        self.cursor = 0;

        let mut fixed = [0u8; SIZE_FIXED_HEADER];
        if !read_or_eof(&mut self.inner, &mut fixed)? {
            return Ok(false);
        }
        if !valid_fixed_header(&fixed) {
            return Err(invalid_block(self.block_offset, "bad gzip header"));
        }

        let xlen = LittleEndian::read_u16(&fixed[10..12]) as usize;
        self.cbuf.resize(xlen, 0);
        self.inner.read_exact(&mut self.cbuf)?;
        let Some(bsize) = find_bsize(&self.cbuf) else {
            return Err(invalid_block(self.block_offset, "missing BC subfield"));
        };
        let block_size = usize::from(bsize) + 1;
        let Some(payload_size) =
            block_size.checked_sub(SIZE_FIXED_HEADER + xlen + SIZE_BLOCK_FOOTER)
        else {
            return Err(invalid_block(self.block_offset, "block size too small"));
        };

        self.cbuf.resize(payload_size + SIZE_BLOCK_FOOTER, 0);
        self.inner.read_exact(&mut self.cbuf)?;
        let (payload, footer) = self.cbuf.split_at(payload_size);
        let crc = LittleEndian::read_u32(&footer[0..4]);
        let isize = LittleEndian::read_u32(&footer[4..8]) as usize;
        if isize > BGZF_MAX_BLOCK {
            return Err(invalid_block(self.block_offset, "payload exceeds 64 KiB"));
        }

        DeflateDecoder::new(payload).read_to_end(&mut self.ubuf)?;
        if self.ubuf.len() != isize {
            return Err(invalid_block(self.block_offset, "payload size mismatch"));
        }
        if crc32fast::hash(&self.ubuf) != crc {
            return Err(invalid_block(self.block_offset, "checksum mismatch"));
        }

        self.next_offset = self.block_offset + block_size as u64;
        Ok(true)
    }
}

impl<R: Read + Seek> Read for BgzfReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read + Seek> BufRead for BgzfReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        // empty blocks (e.g. the EOF marker) are skipped transparently
        while self.cursor >= self.ubuf.len() {
            if !self.load_block()? {
                break;
            }
        }
        Ok(&self.ubuf[self.cursor..])
    }

    fn consume(&mut self, amt: usize) {
        self.cursor = (self.cursor + amt).min(self.ubuf.len());
    }
}

impl<R: Read + Seek> RecordStream for BgzfReader<R> {
    fn tell(&self) -> u64 {
        // an exhausted block is reported as the start of the next one, which keeps
        // the within-block offset below 2^16 even for full 64 KiB payloads
        if self.cursor >= self.ubuf.len() {
            self.next_offset << 16
        } else {
            (self.block_offset << 16) | self.cursor as u64
        }
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        let coffset = pos >> 16;
        let uoffset = (pos & 0xffff) as usize;
        if coffset != self.block_offset || self.ubuf.is_empty() {
            self.inner.seek(SeekFrom::Start(coffset))?;
            self.next_offset = coffset;
            self.load_block()?;
        }
        if uoffset > self.ubuf.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("virtual offset {pos:#x} lies beyond its block"),
            ));
        }
        self.cursor = uoffset;
        Ok(())
    }
}

/// Writer producing BGZF output.
///
/// Input is cut into blocks of at most [`BGZF_BLOCK_SIZE`] bytes, each
/// deflated into its own gzip member carrying the `BC` extra subfield. The
/// stream must be terminated with [`BgzfWriter::finish`], which appends the
/// standard empty EOF block; dropping an unfinished writer finishes it on a
/// best-effort basis.
pub struct BgzfWriter<W: Write> {
    inner: Option<W>,

    /// Pending uncompressed bytes of the current block
    ubuf: Vec<u8>,

    /// Reusable buffer for the deflated payload
    cbuf: Vec<u8>,

    /// Uncompressed bytes per block
    block_size: usize,

    /// Deflate compression level
    level: Compression,
}
impl BgzfWriter<BufWriter<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        File::create(path).map(BufWriter::new).map(Self::new)
    }
}
impl<W: Write> BgzfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_block_size(inner, BGZF_BLOCK_SIZE)
    }

    /// Creates a writer emitting blocks of at most `block_size` uncompressed bytes
    ///
    /// The size is clamped to `1..=BGZF_BLOCK_SIZE`.
    pub fn with_block_size(inner: W, block_size: usize) -> Self {
        let block_size = block_size.clamp(1, BGZF_BLOCK_SIZE);
        Self {
            inner: Some(inner),
            ubuf: Vec::with_capacity(block_size),
            cbuf: Vec::new(),
            block_size,
            level: Compression::default(),
        }
    }

    /// Sets the deflate compression level (0-9)
    #[must_use]
    pub fn level(mut self, level: u32) -> Self {
        self.level = Compression::new(level.min(9));
        self
    }

    /// Compresses and writes the pending block, if any
    fn write_block(&mut self) -> io::Result<()> {
        if self.ubuf.is_empty() {
            return Ok(());
        }

        self.cbuf.clear();
        let mut encoder = DeflateEncoder::new(&mut self.cbuf, self.level);
        encoder.write_all(&self.ubuf)?;
        encoder.finish()?;

        let block_size = SIZE_BLOCK_HEADER + self.cbuf.len() + SIZE_BLOCK_FOOTER;
        if block_size > BGZF_MAX_BLOCK {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "deflated block exceeds the BGZF block limit",
            ));
        }

        let mut header = [
            31, 139, 8, 4, // magic, deflate, FEXTRA
            0, 0, 0, 0, // MTIME
            0, 255, // XFL, OS
            6, 0, // XLEN
            b'B', b'C', 2, 0, // BC subfield, SLEN
            0, 0, // BSIZE
        ];
        LittleEndian::write_u16(&mut header[16..18], (block_size - 1) as u16);

        let mut footer = [0u8; SIZE_BLOCK_FOOTER];
        LittleEndian::write_u32(&mut footer[0..4], crc32fast::hash(&self.ubuf));
        LittleEndian::write_u32(&mut footer[4..8], self.ubuf.len() as u32);

        if let Some(inner) = self.inner.as_mut() {
            inner.write_all(&header)?;
            inner.write_all(&self.cbuf)?;
            inner.write_all(&footer)?;
        }
        self.ubuf.clear();
        Ok(())
    }

    /// Writes any pending block plus the EOF marker and returns the inner writer
    pub fn finish(mut self) -> io::Result<W> {
        self.write_block()?;
        let mut inner = self
            .inner
            .take()
            .ok_or_else(|| io::Error::other("writer already finished"))?;
        inner.write_all(&EOF_BLOCK)?;
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for BgzfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let space = self.block_size - self.ubuf.len();
        let n = buf.len().min(space);
        self.ubuf.extend_from_slice(&buf[..n]);
        if self.ubuf.len() >= self.block_size {
            self.write_block()?;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.write_block()?;
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for BgzfWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() && self.write_block().is_ok() {
            if let Some(inner) = self.inner.as_mut() {
                let _ = inner.write_all(&EOF_BLOCK);
                let _ = inner.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::read_line;
    use std::io::Cursor;

    fn compress(data: &[u8], block_size: usize) -> io::Result<Vec<u8>> {
        let mut writer = BgzfWriter::with_block_size(Vec::new(), block_size);
        writer.write_all(data)?;
        writer.finish()
    }

    #[test]
    fn test_roundtrip_single_block() -> io::Result<()> {
        let data = b"@r1\nACGT\n+\n!!!!\n";
        let compressed = compress(data, BGZF_BLOCK_SIZE)?;
        assert!(compressed.ends_with(&EOF_BLOCK));

        let mut reader = BgzfReader::new(Cursor::new(compressed))?;
        let mut out = Vec::new();
        reader.read_to_end(&mut out)?;
        assert_eq!(out, data);
        Ok(())
    }

    #[test]
    fn test_roundtrip_many_blocks() -> io::Result<()> {
        let data: Vec<u8> = (0..10_000u32).flat_map(|i| i.to_le_bytes()).collect();
        let compressed = compress(&data, 333)?;

        let mut reader = BgzfReader::new(Cursor::new(compressed))?;
        let mut out = Vec::new();
        reader.read_to_end(&mut out)?;
        assert_eq!(out, data);
        Ok(())
    }

    #[test]
    fn test_tell_seek_across_blocks() -> io::Result<()> {
        // 5-byte blocks split every line across block boundaries
        let data = b"@r1\nACGTACGT\n+\n!!!!!!!!\n@r2\nTTTT\n+\n####\n";
        let compressed = compress(data, 5)?;
        let mut reader = BgzfReader::new(Cursor::new(compressed))?;

        let mut positions = Vec::new();
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        loop {
            let pos = reader.tell();
            if read_line(&mut reader, &mut buf)?.is_none() {
                break;
            }
            positions.push(pos);
            lines.push(buf.clone());
        }
        assert_eq!(lines.len(), 8);

        // revisit lines in reverse order
        for (pos, line) in positions.iter().zip(lines.iter()).rev() {
            reader.seek_to(*pos)?;
            read_line(&mut reader, &mut buf)?;
            assert_eq!(&buf, line);
        }

        reader.rewind()?;
        read_line(&mut reader, &mut buf)?;
        assert_eq!(buf, b"@r1");
        Ok(())
    }

    #[test]
    fn test_tell_at_block_end_points_to_next_block() -> io::Result<()> {
        let compressed = compress(b"abcdefgh", 4)?;
        let mut reader = BgzfReader::new(Cursor::new(compressed))?;

        let mut head = [0u8; 4];
        reader.read_exact(&mut head)?;
        let pos = reader.tell();
        assert_eq!(pos & 0xffff, 0);
        assert!(pos >> 16 > 0);

        reader.rewind()?;
        reader.seek_to(pos)?;
        let mut tail = Vec::new();
        reader.read_to_end(&mut tail)?;
        assert_eq!(tail, b"efgh");
        Ok(())
    }

    #[test]
    fn test_seek_to_garbage_offset_fails() -> io::Result<()> {
        let compressed = compress(b"@r1\nACGT\n+\n!!!!\n", BGZF_BLOCK_SIZE)?;
        let mut reader = BgzfReader::new(Cursor::new(compressed))?;

        // compressed offset 3 is inside the first block header
        assert!(reader.seek_to(3 << 16).is_err());
        // offset within the first block beyond its payload
        assert!(reader.seek_to(0xfff0).is_err());

        // the reader recovers after a failed seek
        reader.rewind()?;
        let mut buf = Vec::new();
        read_line(&mut reader, &mut buf)?;
        assert_eq!(buf, b"@r1");
        Ok(())
    }

    /// Compressed size of the block starting at `offset`
    fn block_len(data: &[u8], offset: usize) -> usize {
        LittleEndian::read_u16(&data[offset + 16..offset + 18]) as usize + 1
    }

    #[test]
    fn test_corrupt_block_fails_every_seek() -> io::Result<()> {
        let mut compressed = compress(b"abcdefgh", 4)?;
        let second = block_len(&compressed, 0);
        let crc_at = second + block_len(&compressed, second) - SIZE_BLOCK_FOOTER;
        compressed[crc_at] ^= 0xff;

        let mut reader = BgzfReader::new(Cursor::new(compressed))?;
        let pos = (second as u64) << 16;
        for _ in 0..3 {
            assert!(reader.seek_to(pos).is_err());
        }

        // intact blocks are still served
        reader.seek_to(0)?;
        let mut head = [0u8; 4];
        reader.read_exact(&mut head)?;
        assert_eq!(&head, b"abcd");
        Ok(())
    }

    #[test]
    fn test_compression_levels_roundtrip() -> io::Result<()> {
        let data = b"@r1\nACGTACGTACGTACGT\n+\nIIIIIIIIIIIIIIII\n".repeat(50);
        let mut sizes = Vec::new();
        for level in [0, 9] {
            let mut writer = BgzfWriter::new(Vec::new()).level(level);
            writer.write_all(&data)?;
            let compressed = writer.finish()?;
            sizes.push(compressed.len());

            let mut reader = BgzfReader::new(Cursor::new(compressed))?;
            let mut out = Vec::new();
            reader.read_to_end(&mut out)?;
            assert_eq!(out, data);
            assert!(!reader.into_inner().into_inner().is_empty());
        }
        // stored blocks are larger than deflated ones
        assert!(sizes[0] > sizes[1]);
        Ok(())
    }

    #[test]
    fn test_rejects_plain_input() {
        let result = BgzfReader::new(Cursor::new(b"@r1\nACGT\n+\n!!!!\n".to_vec()));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_stream() -> io::Result<()> {
        let compressed = compress(b"", BGZF_BLOCK_SIZE)?;
        assert_eq!(compressed, EOF_BLOCK);
        let mut reader = BgzfReader::new(Cursor::new(compressed))?;
        let mut buf = Vec::new();
        assert_eq!(read_line(&mut reader, &mut buf)?, None);
        Ok(())
    }

    #[test]
    fn test_is_bgzf() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let bgzf_path = dir.path().join("reads.fq.gz");
        let plain_path = dir.path().join("reads.fq");
        std::fs::write(&bgzf_path, compress(b"@r1\nA\n+\n!\n", BGZF_BLOCK_SIZE)?)?;
        std::fs::write(&plain_path, b"@r1\nA\n+\n!\n")?;

        assert!(is_bgzf(&bgzf_path)?);
        assert!(!is_bgzf(&plain_path)?);
        Ok(())
    }
}
