//! # Record streams
//!
//! The index stores positions into a record stream and later seeks back to them.
//! Any buffered reader that can report and restore its position can act as the
//! backing stream, so the capability is expressed as the [`RecordStream`] trait.
//!
//! Two backends are provided:
//!
//! * [`BgzfReader`] reads BGZF (blocked gzip) files. Positions are BGZF virtual
//!   offsets: the compressed offset of a block shifted left by 16 bits, combined
//!   with the offset inside its decompressed payload.
//! * [`PlainReader`] reads uncompressed files. Positions are plain byte offsets.
//!
//! [`BgzfWriter`] produces BGZF output that [`BgzfReader`] (and any other
//! BGZF-aware tool) can seek through.

mod bgzf;
mod line;
mod plain;

use std::io::{self, BufRead};

use auto_impl::auto_impl;

pub use bgzf::{is_bgzf, BgzfReader, BgzfWriter, BGZF_BLOCK_SIZE};
pub use line::read_line;
pub use plain::PlainReader;

/// A buffered stream that can report and restore its read position.
///
/// Positions returned by [`tell`](RecordStream::tell) are opaque to callers;
/// the only guarantee is that passing one back to
/// [`seek_to`](RecordStream::seek_to) resumes reading at the same byte.
#[auto_impl(&mut, Box)]
pub trait RecordStream: BufRead {
    /// Returns the position of the next byte to be read
    fn tell(&self) -> u64;

    /// Moves the read cursor to a position previously returned by `tell`
    fn seek_to(&mut self, pos: u64) -> io::Result<()>;

    /// Moves the read cursor back to the start of the stream
    fn rewind(&mut self) -> io::Result<()> {
        self.seek_to(0)
    }
}
