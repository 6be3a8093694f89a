use std::path::PathBuf;

/// Custom Result type for fqidx operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the fqidx library, encompassing all possible error cases
/// that can occur while building or querying an index.
///
/// Each family is caller-distinguishable: a broken record stream, an unwritable
/// index prefix, a failed hash construction and a broken existing index are all
/// separate variants. A key that is simply absent from an index is reported as
/// `Ok(None)` by [`crate::FastqIndex::query`] and only becomes
/// [`Error::NotFound`] through [`crate::FastqIndex::fetch`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Errors related to opening or reading the record stream
    #[error(transparent)]
    StreamError(#[from] StreamError),
    /// Errors creating or writing the index files during a build
    #[error(transparent)]
    PrefixError(#[from] PrefixError),
    /// Errors constructing the perfect hash function
    #[error(transparent)]
    HashError(#[from] HashError),
    /// Errors loading an existing index
    #[error(transparent)]
    IndexError(#[from] IndexError),
    /// Standard I/O errors from the Rust standard library
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// UTF-8 encoding/decoding errors
    #[error(transparent)]
    Utf8Error(#[from] std::str::Utf8Error),
    /// The requested key is not present in the index
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Errors related to the compressed record stream
#[derive(thiserror::Error, Debug)]
pub enum StreamError {
    /// The stream could not be opened (missing file, bad permissions, not BGZF)
    ///
    /// # Arguments
    /// * `PathBuf` - The path of the stream
    /// * `std::io::Error` - The underlying failure
    #[error("Unable to open record stream {0}: {1}")]
    Open(PathBuf, #[source] std::io::Error),

    /// The stream failed while being scanned or read
    #[error("Unable to read record stream: {0}")]
    Read(#[source] std::io::Error),
}

/// Errors creating the index files at the requested prefix
#[derive(thiserror::Error, Debug)]
pub enum PrefixError {
    /// An index file could not be created
    #[error("Unable to create index file {0}: {1}")]
    Create(PathBuf, #[source] std::io::Error),

    /// An index file could not be written or sized
    #[error("Unable to write index file {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),

    /// The offset table could not be mapped for writing
    #[error("Unable to map index file {0} for writing: {1}")]
    Map(PathBuf, #[source] std::io::Error),
}

/// Errors that occur while constructing a perfect hash function
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The key source produced no keys at all
    #[error("No keys found in record stream")]
    NoKeys,

    /// Every construction attempt failed to place all keys
    ///
    /// # Fields
    /// * `keys` - The number of distinct keys seen
    /// * `attempts` - The number of seeds tried
    #[error("Unable to construct a perfect hash over {keys} keys after {attempts} attempts")]
    ConstructionFailed { keys: usize, attempts: usize },
}

/// Errors that occur while loading an existing index
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// An index file is missing or unreadable
    #[error("Unable to open index file {0}: {1}")]
    Open(PathBuf, #[source] std::io::Error),

    /// The magic number in the hash file does not match the expected value
    ///
    /// # Arguments
    /// * `u64` - The invalid magic number that was found
    #[error("Invalid hash file magic number: {0:#x}")]
    InvalidMagicNumber(u64),

    /// The hash file could not be deserialized
    #[error("Corrupt hash file: {0}")]
    CorruptHash(String),

    /// The offset table could not be mapped
    #[error("Unable to map index file {0}: {1}")]
    Map(PathBuf, #[source] std::io::Error),

    /// The offset table byte size is not a positive multiple of 8
    #[error("Invalid offset table size: {0} bytes")]
    TableSize(u64),

    /// The offset table does not hold one entry per hash id
    #[error("Offset table holds {found} entries but the hash expects {expected}")]
    TableLengthMismatch { expected: usize, found: usize },
}
