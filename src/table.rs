//! # Offset table
//!
//! The offset table is the `.lup` half of an index: a flat array of `u64`
//! stream positions, one per perfect-hash id, stored in native byte order.
//! Entry `i` is the position of the key text of the record whose key hashes
//! to `i`, i.e. the position immediately after that record's `@` marker.
//!
//! The table is written through a read/write memory map during a build and
//! read through a read-only memory map afterwards.

use std::fs::{File, OpenOptions};
use std::path::Path;

use memmap2::{Mmap, MmapMut};
use tracing::debug;

use crate::error::{IndexError, PrefixError, Result, StreamError};
use crate::keys::HeaderScanner;
use crate::mphf::PerfectHash;
use crate::stream::RecordStream;

/// Size of one table entry in bytes
pub const SIZE_ENTRY: usize = std::mem::size_of::<u64>();

/// Read-only view of a built offset table
pub struct OffsetTable {
    /// Memory-mapped table file
    mmap: Mmap,
}
impl OffsetTable {
    /// Builds the table at `path` by scanning every record of `stream`.
    ///
    /// The file is created (or truncated), sized to one entry per hash id and
    /// filled through a writable mapping. Returns the number of records
    /// scanned. Ids that no record reaches keep the value zero.
    pub fn build<H, S>(path: &Path, hash: &H, stream: &mut S) -> Result<usize>
    where
        H: PerfectHash,
        S: RecordStream + ?Sized,
    {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| PrefixError::Create(path.to_path_buf(), e))?;
        file.set_len((hash.len() * SIZE_ENTRY) as u64)
            .map_err(|e| PrefixError::Write(path.to_path_buf(), e))?;

        // Safety: the file was just created by us and is not shared
        let mut mmap = unsafe { MmapMut::map_mut(&file) }
            .map_err(|e| PrefixError::Map(path.to_path_buf(), e))?;
        let entries: &mut [u64] = bytemuck::try_cast_slice_mut(&mut mmap[..]).map_err(|e| {
            PrefixError::Map(
                path.to_path_buf(),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
            )
        })?;

        stream.rewind().map_err(StreamError::Read)?;
        let mut scanner = HeaderScanner::new();
        let mut key = Vec::new();
        let mut records = 0;
        while let Some(pos) = scanner
            .next_header(stream, &mut key)
            .map_err(StreamError::Read)?
        {
            entries[hash.hash(&key)] = pos;
            records += 1;
        }

        mmap.flush()
            .map_err(|e| PrefixError::Write(path.to_path_buf(), e))?;
        debug!(path = %path.display(), records, "wrote offset table");
        Ok(records)
    }

    /// Maps an existing table read-only
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| IndexError::Open(path.to_path_buf(), e))?;
        let size = file
            .metadata()
            .map_err(|e| IndexError::Open(path.to_path_buf(), e))?
            .len();
        if size == 0 || size % SIZE_ENTRY as u64 != 0 {
            return Err(IndexError::TableSize(size).into());
        }

        // Safety: the file is opened read-only and is not modified while mapped
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| IndexError::Map(path.to_path_buf(), e))?;
        Ok(Self { mmap })
    }

    /// Returns the entries as a slice of positions
    pub fn entries(&self) -> &[u64] {
        // page-aligned mappings of a multiple of 8 bytes always cast
        bytemuck::try_cast_slice(&self.mmap[..]).unwrap_or_default()
    }

    /// Returns the position stored for `id`
    pub fn get(&self, id: usize) -> Option<u64> {
        self.entries().get(id).copied()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.mmap.len() / SIZE_ENTRY
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
