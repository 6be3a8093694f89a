//! # FASTQ record index
//!
//! An index over a FASTQ record stream is a pair of files sharing a prefix:
//!
//! - `<prefix>.hsh`: a serialized minimal perfect hash over every record key
//! - `<prefix>.lup`: an offset table holding, per hash id, the stream position
//!   of the matching record (see [`crate::table`])
//!
//! A lookup hashes the key, seeks the stream to the stored position and checks
//! the header found there against the key. The hash alone cannot tell members
//! from non-members, so this check is what turns a miss into `None` rather
//! than the wrong record.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fqidx::FastqIndex;
//!
//! let mut index = FastqIndex::create("reads.fq.gz", "reads.fq.gz").unwrap();
//! if let Some(record) = index.query(b"SRR000001.1").unwrap() {
//!     println!("{record}");
//! }
//! ```

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, IndexError, PrefixError, Result, StreamError};
use crate::keys::{FastqKeys, KeySource};
use crate::mphf::{ChdHash, HashConfig, PerfectHash};
use crate::record::Record;
use crate::stream::{read_line, BgzfReader, RecordStream};
use crate::table::OffsetTable;

/// Suffix of the serialized hash file
pub const HASH_SUFFIX: &str = ".hsh";

/// Suffix of the offset table file
pub const TABLE_SUFFIX: &str = ".lup";

/// Locations of the two files of an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPaths {
    pub hash: PathBuf,
    pub table: PathBuf,
}
impl IndexPaths {
    /// Appends the index suffixes to the full prefix.
    ///
    /// Any extension already present is kept: `reads.fq.gz` becomes
    /// `reads.fq.gz.hsh` and `reads.fq.gz.lup`.
    pub fn from_prefix<P: AsRef<Path>>(prefix: P) -> Self {
        let with_suffix = |suffix: &str| {
            let mut path = OsString::from(prefix.as_ref().as_os_str());
            path.push(suffix);
            PathBuf::from(path)
        };
        Self {
            hash: with_suffix(HASH_SUFFIX),
            table: with_suffix(TABLE_SUFFIX),
        }
    }
}

/// Builder for creating an index with custom hash parameters
///
/// Unset parameters fall back to the [`HashConfig`] defaults, and out of range
/// values are clamped.
///
/// # Examples
///
/// ```rust,no_run
/// use fqidx::IndexBuilder;
///
/// let index = IndexBuilder::default()
///     .seed(42)
///     .load_factor(0.9)
///     .build("reads.fq.gz", "reads")
///     .unwrap();
/// println!("indexed {} records", index.len());
/// ```
#[derive(Debug, Default, Clone)]
pub struct IndexBuilder {
    /// Seed for the hash construction
    seed: Option<u64>,
    /// Ratio of keys to slots during placement
    load_factor: Option<f64>,
    /// Average number of keys per bucket
    bucket_size: Option<f64>,
    /// Number of seeds tried before giving up
    max_attempts: Option<usize>,
    /// Number of pilots tried per bucket
    max_pilot: Option<u32>,
}
impl IndexBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the load factor (0.5 to 1.0, values outside are clamped)
    ///
    /// Lower values speed up construction but enlarge the hash file.
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = Some(load_factor);
        self
    }

    /// Sets the average number of keys per bucket (1.0 to 16.0)
    pub fn bucket_size(mut self, bucket_size: f64) -> Self {
        self.bucket_size = Some(bucket_size);
        self
    }

    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn max_pilot(mut self, max_pilot: u32) -> Self {
        self.max_pilot = Some(max_pilot);
        self
    }

    /// Resolves the hash construction parameters
    #[must_use]
    pub fn hash_config(&self) -> HashConfig {
        let default = HashConfig::default();
        HashConfig {
            seed: self.seed.unwrap_or(default.seed),
            load_factor: self.load_factor.unwrap_or(default.load_factor),
            bucket_size: self.bucket_size.unwrap_or(default.bucket_size),
            max_attempts: self.max_attempts.unwrap_or(default.max_attempts),
            max_pilot: self.max_pilot.unwrap_or(default.max_pilot),
        }
        .validated()
    }

    /// Indexes the BGZF stream at `stream_path`, writing the index files at `prefix`
    pub fn build<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        stream_path: P,
        prefix: Q,
    ) -> Result<FastqIndex> {
        let stream = open_stream(stream_path.as_ref())?;
        self.build_from_stream(stream, prefix)
    }

    /// Indexes an already opened stream, writing the index files at `prefix`
    ///
    /// The returned handle takes ownership of the stream.
    pub fn build_from_stream<S, H, P>(&self, stream: S, prefix: P) -> Result<FastqIndex<S, H>>
    where
        S: RecordStream,
        H: PerfectHash,
        P: AsRef<Path>,
    {
        let paths = IndexPaths::from_prefix(prefix);
        let config = self.hash_config();
        info!(
            hash = %paths.hash.display(),
            table = %paths.table.display(),
            "building index"
        );

        // the prefix must be writable before any expensive work
        let hash_file = File::create(&paths.hash)
            .map(BufWriter::new)
            .map_err(|e| PrefixError::Create(paths.hash.clone(), e))?;

        let mut keys = FastqKeys::new(stream)?;
        let hash = H::build(&mut keys, &config)?;
        if keys.estimated_len() != hash.len() {
            warn!(
                estimate = keys.estimated_len(),
                keys = hash.len(),
                "record pre-scan disagrees with the number of distinct keys"
            );
        }
        write_hash(&hash, hash_file, &paths.hash)?;

        let mut stream = keys.into_inner();
        let records = OffsetTable::build(&paths.table, &hash, &mut stream)?;
        if records != hash.len() {
            warn!(
                records,
                keys = hash.len(),
                "stream holds duplicate keys, the last occurrence of each is indexed"
            );
        }

        let table = OffsetTable::open(&paths.table)?;
        stream.rewind().map_err(StreamError::Read)?;
        info!(records, keys = hash.len(), "finished building index");

        Ok(FastqIndex {
            hash,
            table,
            stream,
            paths,
        })
    }
}

fn open_stream(path: &Path) -> Result<BgzfReader<File>> {
    BgzfReader::from_path(path)
        .map_err(|e| StreamError::Open(path.to_path_buf(), e).into())
}

fn write_hash<H: PerfectHash>(hash: &H, mut writer: BufWriter<File>, path: &Path) -> Result<()> {
    let as_prefix_error = |e: Error| match e {
        Error::IoError(e) => PrefixError::Write(path.to_path_buf(), e).into(),
        other => other,
    };
    hash.write_bytes(&mut writer).map_err(as_prefix_error)?;
    writer
        .flush()
        .map_err(|e| PrefixError::Write(path.to_path_buf(), e))?;
    Ok(())
}

/// An open index over a FASTQ record stream.
///
/// The handle owns the hash function, the mapped offset table and the stream.
/// Dropping it (or calling [`close`](FastqIndex::close)) releases them in that
/// order. Queries need `&mut self` since they move the stream cursor; open
/// several handles for independent cursors over the same index.
pub struct FastqIndex<S: RecordStream = BgzfReader<File>, H: PerfectHash = ChdHash> {
    hash: H,
    table: OffsetTable,
    stream: S,
    paths: IndexPaths,
}

impl FastqIndex {
    /// Builds an index over the BGZF stream at `stream_path` with default parameters
    pub fn create<P: AsRef<Path>, Q: AsRef<Path>>(stream_path: P, prefix: Q) -> Result<Self> {
        IndexBuilder::default().build(stream_path, prefix)
    }

    /// Opens a previously built index over the BGZF stream at `stream_path`
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(stream_path: P, prefix: Q) -> Result<Self> {
        let stream = open_stream(stream_path.as_ref())?;
        Self::open_from_stream(stream, prefix)
    }
}

impl<S: RecordStream, H: PerfectHash> FastqIndex<S, H> {
    /// Opens a previously built index over an already opened stream
    pub fn open_from_stream<P: AsRef<Path>>(mut stream: S, prefix: P) -> Result<Self> {
        let paths = IndexPaths::from_prefix(prefix);

        let mut reader = File::open(&paths.hash)
            .map(BufReader::new)
            .map_err(|e| IndexError::Open(paths.hash.clone(), e))?;
        let hash = H::from_reader(&mut reader).map_err(|e| match e {
            Error::IoError(e) => IndexError::CorruptHash(e.to_string()).into(),
            other => other,
        })?;

        let table = OffsetTable::open(&paths.table)?;
        if table.len() != hash.len() {
            return Err(IndexError::TableLengthMismatch {
                expected: hash.len(),
                found: table.len(),
            }
            .into());
        }

        stream.rewind().map_err(StreamError::Read)?;
        debug!(hash = %paths.hash.display(), keys = hash.len(), "opened index");
        Ok(Self {
            hash,
            table,
            stream,
            paths,
        })
    }

    /// Looks up `key`, returning its record or `None` if the key is not indexed
    pub fn query(&mut self, key: &[u8]) -> Result<Option<Record>> {
        let mut record = Record::default();
        Ok(self.query_into(key, &mut record)?.then_some(record))
    }

    /// Looks up `key`, filling `record` in place.
    ///
    /// Returns `false` and leaves `record` empty if the key is not indexed.
    /// The record's allocations are reused across calls.
    pub fn query_into(&mut self, key: &[u8], record: &mut Record) -> Result<bool> {
        let found = self.read_record(key, record)?;
        if !found {
            record.clear();
        }
        Ok(found)
    }

    fn read_record(&mut self, key: &[u8], record: &mut Record) -> Result<bool> {
        let id = self.hash.hash(key);
        let Some(pos) = self.table.get(id) else {
            return Ok(false);
        };
        if let Err(e) = self.stream.seek_to(pos) {
            debug!(pos, error = %e, "unable to seek to stored position");
            return Ok(false);
        }

        let stream = &mut self.stream;
        if read_line(stream, &mut record.name)
            .map_err(StreamError::Read)?
            .is_none()
            || record.name != key
        {
            return Ok(false);
        }
        if read_line(stream, &mut record.sequence)
            .map_err(StreamError::Read)?
            .is_none()
        {
            return Ok(false);
        }
        // the separator lands in the quality slot and is overwritten by the quality
        for _ in 0..2 {
            if read_line(stream, &mut record.quality)
                .map_err(StreamError::Read)?
                .is_none()
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Looks up `key`, treating an absent key as an error
    pub fn fetch(&mut self, key: &[u8]) -> Result<Record> {
        self.query(key)?
            .ok_or_else(|| Error::NotFound(String::from_utf8_lossy(key).into_owned()))
    }

    /// Looks up every key in order, returning the records found and skipping misses
    pub fn fetch_many<I, K>(&mut self, keys: I) -> Result<Vec<Record>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        keys.into_iter()
            .filter_map(|key| self.query(key.as_ref()).transpose())
            .collect()
    }

    /// Releases the hash, the table mapping and the stream
    pub fn close(self) {}

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hash.is_empty()
    }

    pub fn paths(&self) -> &IndexPaths {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{BgzfWriter, PlainReader};
    use rand::rngs::SmallRng;
    use rand::{RngCore, SeedableRng};
    use std::io::Cursor;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        fastq: PathBuf,
        prefix: PathBuf,
        records: Vec<Record>,
    }

    fn random_bases(rng: &mut SmallRng, alphabet: &[u8], len: usize) -> Vec<u8> {
        (0..len)
            .map(|_| alphabet[rng.next_u32() as usize % alphabet.len()])
            .collect()
    }

    fn random_records(n: usize) -> Vec<Record> {
        let mut rng = SmallRng::seed_from_u64(7);
        (0..n)
            .map(|i| {
                let len = 20 + rng.next_u32() as usize % 80;
                Record::new(
                    format!("SRR000001.{i} length={len}").into_bytes(),
                    random_bases(&mut rng, b"ACGTN", len),
                    random_bases(&mut rng, b"!#@ABCDEFGHI", len),
                )
            })
            .collect()
    }

    /// Writes the records as BGZF with small blocks so records straddle blocks
    fn fixture(records: Vec<Record>) -> Result<Fixture> {
        let dir = tempfile::tempdir()?;
        let fastq = dir.path().join("reads.fq.gz");
        let prefix = dir.path().join("reads");

        let file = BufWriter::new(File::create(&fastq)?);
        let mut writer = BgzfWriter::with_block_size(file, 1024);
        for record in &records {
            record.write_fastq(&mut writer)?;
        }
        writer.finish()?.flush()?;

        Ok(Fixture {
            _dir: dir,
            fastq,
            prefix,
            records,
        })
    }

    #[test]
    fn test_every_key_round_trips() -> Result<()> {
        let fx = fixture(random_records(2_000))?;
        let mut index = FastqIndex::create(&fx.fastq, &fx.prefix)?;
        assert_eq!(index.len(), 2_000);

        for expected in &fx.records {
            let found = index.query(expected.name())?;
            assert_eq!(found.as_ref(), Some(expected));
        }
        Ok(())
    }

    #[test]
    fn test_non_members_are_not_found() -> Result<()> {
        let fx = fixture(random_records(500))?;
        let mut index = FastqIndex::create(&fx.fastq, &fx.prefix)?;

        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..1_000 {
            let probe = random_bases(&mut rng, b"ACGTXYZ.0123456789", 12);
            assert_eq!(index.query(&probe)?, None);
        }
        // prefixes and extensions of real keys
        assert_eq!(index.query(b"SRR000001.1")?, None);
        assert_eq!(index.query(b"")?, None);
        let mut extended = fx.records[0].name().to_vec();
        extended.push(b'x');
        assert_eq!(index.query(&extended)?, None);
        Ok(())
    }

    #[test]
    fn test_reopen_is_idempotent() -> Result<()> {
        let fx = fixture(random_records(300))?;
        FastqIndex::create(&fx.fastq, &fx.prefix)?.close();

        let mut first = FastqIndex::open(&fx.fastq, &fx.prefix)?;
        let mut second = FastqIndex::open(&fx.fastq, &fx.prefix)?;
        for record in fx.records.iter().step_by(7) {
            assert_eq!(first.query(record.name())?, second.query(record.name())?);
        }

        // handles are independent
        first.close();
        for record in &fx.records {
            assert_eq!(second.query(record.name())?.as_ref(), Some(record));
        }
        Ok(())
    }

    #[test]
    fn test_builder_parameters() -> Result<()> {
        let fx = fixture(random_records(1_000))?;
        let mut index = IndexBuilder::default()
            .seed(1234)
            .load_factor(0.8)
            .bucket_size(2.0)
            .build(&fx.fastq, &fx.prefix)?;
        for record in &fx.records {
            assert!(index.query(record.name())?.is_some());
        }
        Ok(())
    }

    #[test]
    fn test_truncated_table() -> Result<()> {
        let fx = fixture(random_records(100))?;
        let paths = FastqIndex::create(&fx.fastq, &fx.prefix)?.paths().clone();

        let table = std::fs::OpenOptions::new().write(true).open(&paths.table)?;
        table.set_len(99 * 8)?;
        assert!(matches!(
            FastqIndex::open(&fx.fastq, &fx.prefix),
            Err(Error::IndexError(IndexError::TableLengthMismatch {
                expected: 100,
                found: 99
            }))
        ));

        table.set_len(99 * 8 - 3)?;
        assert!(matches!(
            FastqIndex::open(&fx.fastq, &fx.prefix),
            Err(Error::IndexError(IndexError::TableSize(_)))
        ));
        Ok(())
    }

    #[test]
    fn test_missing_hash() -> Result<()> {
        let fx = fixture(random_records(10))?;
        let paths = FastqIndex::create(&fx.fastq, &fx.prefix)?.paths().clone();
        std::fs::remove_file(&paths.hash)?;

        assert!(matches!(
            FastqIndex::open(&fx.fastq, &fx.prefix),
            Err(Error::IndexError(IndexError::Open(..)))
        ));
        Ok(())
    }

    #[test]
    fn test_corrupt_hash() -> Result<()> {
        let fx = fixture(random_records(10))?;
        let paths = FastqIndex::create(&fx.fastq, &fx.prefix)?.paths().clone();
        let intact = std::fs::read(&paths.hash)?;

        std::fs::write(&paths.hash, b"not a hash file at all, just some text")?;
        assert!(matches!(
            FastqIndex::open(&fx.fastq, &fx.prefix),
            Err(Error::IndexError(IndexError::InvalidMagicNumber(_)))
        ));

        std::fs::write(&paths.hash, &intact[..40])?;
        assert!(matches!(
            FastqIndex::open(&fx.fastq, &fx.prefix),
            Err(Error::IndexError(IndexError::CorruptHash(_)))
        ));

        std::fs::write(&paths.hash, &intact)?;
        assert!(FastqIndex::open(&fx.fastq, &fx.prefix).is_ok());
        Ok(())
    }

    #[test]
    fn test_missing_or_invalid_stream() -> Result<()> {
        let fx = fixture(random_records(10))?;
        FastqIndex::create(&fx.fastq, &fx.prefix)?;

        let absent = fx.prefix.with_extension("missing.fq.gz");
        assert!(matches!(
            FastqIndex::open(&absent, &fx.prefix),
            Err(Error::StreamError(StreamError::Open(..)))
        ));

        // uncompressed input is not a BGZF stream
        let plain = fx.prefix.with_extension("fq");
        std::fs::write(&plain, b"@r1\nACGT\n+\n!!!!\n")?;
        assert!(matches!(
            FastqIndex::create(&plain, &fx.prefix),
            Err(Error::StreamError(StreamError::Open(..)))
        ));
        Ok(())
    }

    #[test]
    fn test_unwritable_prefix() -> Result<()> {
        let fx = fixture(random_records(10))?;
        let prefix = fx.prefix.join("no_such_dir").join("reads");
        assert!(matches!(
            FastqIndex::create(&fx.fastq, &prefix),
            Err(Error::PrefixError(PrefixError::Create(..)))
        ));
        Ok(())
    }

    #[test]
    fn test_separator_is_discarded() -> Result<()> {
        let data = b"@r1\nACGT\n+r1 with a comment\n!!!!\n@r2\nTTTT\n+\n####\n";
        let dir = tempfile::tempdir()?;
        let prefix = dir.path().join("plain");

        let stream = PlainReader::new(Cursor::new(data.to_vec()));
        let mut index: FastqIndex<_, ChdHash> =
            IndexBuilder::default().build_from_stream(stream, &prefix)?;

        let record = index.fetch(b"r1")?;
        assert_eq!(record.sequence(), b"ACGT");
        assert_eq!(record.quality(), b"!!!!");
        assert_eq!(record.to_string(), "@r1\nACGT\n+\n!!!!");
        Ok(())
    }

    #[test]
    fn test_two_record_stream() -> Result<()> {
        let fx = fixture(vec![
            Record::new(b"r1".to_vec(), b"ACGT".to_vec(), b"!!!!".to_vec()),
            Record::new(b"r2".to_vec(), b"TTTT".to_vec(), b"####".to_vec()),
        ])?;
        let mut index = FastqIndex::create(&fx.fastq, &fx.prefix)?;
        assert_eq!(index.len(), 2);

        let r2 = index.fetch(b"r2")?;
        assert_eq!(
            (r2.name(), r2.sequence(), r2.quality()),
            (&b"r2"[..], &b"TTTT"[..], &b"####"[..])
        );
        assert!(matches!(index.fetch(b"r3"), Err(Error::NotFound(key)) if key == "r3"));

        let found = index.fetch_many(["r2", "r3", "r1"])?;
        let names: Vec<_> = found.iter().map(Record::name).collect();
        assert_eq!(names, vec![&b"r2"[..], &b"r1"[..]]);
        Ok(())
    }

    #[test]
    fn test_query_into_reuses_buffer() -> Result<()> {
        let fx = fixture(random_records(50))?;
        let mut index = FastqIndex::create(&fx.fastq, &fx.prefix)?;

        let mut record = Record::default();
        for expected in &fx.records {
            assert!(index.query_into(expected.name(), &mut record)?);
            assert_eq!(&record, expected);
        }
        assert!(!index.query_into(b"absent", &mut record)?);
        assert_eq!(record, Record::default());
        Ok(())
    }

    #[test]
    fn test_duplicate_keys_resolve_to_last() -> Result<()> {
        let data = b"@dup\nAAAA\n+\n!!!!\n@uniq\nCCCC\n+\n####\n@dup\nGGGG\n+\nIIII\n";
        let dir = tempfile::tempdir()?;
        let stream = PlainReader::new(Cursor::new(data.to_vec()));
        let mut index: FastqIndex<_, ChdHash> =
            IndexBuilder::default().build_from_stream(stream, dir.path().join("dup"))?;

        assert_eq!(index.len(), 2);
        assert_eq!(index.fetch(b"dup")?.sequence(), b"GGGG");
        assert_eq!(index.fetch(b"uniq")?.sequence(), b"CCCC");
        Ok(())
    }

    #[test]
    fn test_construction_limits() -> Result<()> {
        let fx = fixture(random_records(1_000))?;
        let result = IndexBuilder::default()
            .load_factor(1.0)
            .max_attempts(2)
            .max_pilot(1)
            .build(&fx.fastq, &fx.prefix);
        assert!(matches!(
            result,
            Err(Error::HashError(crate::HashError::ConstructionFailed {
                keys: 1_000,
                attempts: 2
            }))
        ));

        let config = IndexBuilder::default().max_attempts(0).max_pilot(8).hash_config();
        assert_eq!((config.max_attempts, config.max_pilot), (1, 8));
        Ok(())
    }

    #[test]
    fn test_truncated_final_record() -> Result<()> {
        // the last record ends after its separator line
        let data = b"@r1\nACGT\n+\n!!!!\n@r2\nTTTT\n+\n";
        let dir = tempfile::tempdir()?;
        let stream = PlainReader::new(Cursor::new(data.to_vec()));
        let mut index: FastqIndex<_, ChdHash> =
            IndexBuilder::default().build_from_stream(stream, dir.path().join("cut"))?;
        assert_eq!(index.len(), 2);

        assert_eq!(index.query(b"r2")?, None);
        let mut record = Record::default();
        assert!(index.query_into(b"r1", &mut record)?);
        assert!(!index.query_into(b"r2", &mut record)?);
        assert_eq!(record, Record::default());
        Ok(())
    }

    #[test]
    fn test_corrupt_block_is_never_served() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let fastq = dir.path().join("reads.fq.gz");
        let prefix = dir.path().join("reads");

        // 16-byte blocks hold exactly one record each
        let mut writer = BgzfWriter::with_block_size(BufWriter::new(File::create(&fastq)?), 16);
        writer.write_all(b"@r1\nACGT\n+\n!!!!\n@r2\nTTTT\n+\n####\n")?;
        writer.finish()?.flush()?;
        FastqIndex::create(&fastq, &prefix)?.close();

        let mut bytes = std::fs::read(&fastq)?;
        let block_len = |at: usize| usize::from(u16::from_le_bytes([bytes[at + 16], bytes[at + 17]])) + 1;
        let second = block_len(0);
        let crc_at = second + block_len(second) - 8;
        bytes[crc_at] ^= 0xff;
        std::fs::write(&fastq, &bytes)?;

        let mut index = FastqIndex::open(&fastq, &prefix)?;
        assert_eq!(index.query(b"r2")?, None);
        assert_eq!(index.query(b"r2")?, None);
        assert_eq!(index.fetch(b"r1")?.sequence(), b"ACGT");
        assert_eq!(index.query(b"r2")?, None);
        Ok(())
    }

    #[test]
    fn test_paths_append_suffix() {
        let paths = IndexPaths::from_prefix("data/reads.fq.gz");
        assert_eq!(paths.hash, PathBuf::from("data/reads.fq.gz.hsh"));
        assert_eq!(paths.table, PathBuf::from("data/reads.fq.gz.lup"));
    }
}
