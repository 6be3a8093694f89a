//! # fqidx
//!
//! Random-access retrieval of FASTQ records by accession from a BGZF
//! compressed stream.
//!
//! Building an index makes two passes over the stream. The first derives a
//! minimal perfect hash over every record key; the second records, for each
//! hash id, the position of the matching record. Lookups then cost one hash
//! evaluation, one table read, one seek and the decompression of at most a
//! couple of blocks, independent of the size of the stream.
//!
//! ## Modules
//!
//! - [`stream`]: seekable record streams (BGZF and plain) and line reading
//! - [`keys`]: extraction of record keys from a stream
//! - [`mphf`]: minimal perfect hash construction and serialization
//! - [`table`]: the memory-mapped offset table
//! - [`index`]: building, opening and querying an index
//!
//! ## Example
//!
//! ```rust,no_run
//! use fqidx::{FastqIndex, Result};
//!
//! fn main() -> Result<()> {
//!     // builds reads.fq.gz.hsh and reads.fq.gz.lup
//!     FastqIndex::create("reads.fq.gz", "reads.fq.gz")?.close();
//!
//!     let mut index = FastqIndex::open("reads.fq.gz", "reads.fq.gz")?;
//!     match index.query(b"SRR000001.1")? {
//!         Some(record) => println!("{record}"),
//!         None => eprintln!("record not found"),
//!     }
//!     Ok(())
//! }
//! ```

/// Error definitions
pub mod error;

/// Index construction and queries
pub mod index;

/// Record keys of a FASTQ stream
pub mod keys;

pub mod mphf;

/// FASTQ record type
pub mod record;

pub mod stream;

pub mod table;

pub use error::{Error, HashError, IndexError, PrefixError, Result, StreamError};
pub use index::{FastqIndex, IndexBuilder, IndexPaths};
pub use keys::{FastqKeys, KeySource};
pub use mphf::{ChdHash, HashConfig, PerfectHash};
pub use record::Record;
pub use stream::{BgzfReader, BgzfWriter, PlainReader, RecordStream};
