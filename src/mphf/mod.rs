//! # Minimal perfect hashing
//!
//! A minimal perfect hash function maps a fixed set of `n` keys bijectively onto
//! `[0, n)`. It has no membership test: any other input still hashes to some id
//! in range, so callers must verify whatever they find at that id.
//!
//! The capability is expressed by the [`PerfectHash`] trait so that alternative
//! constructions can back an index. [`ChdHash`] is the provided implementation.

mod chd;

use std::io::{Read, Write};

use crate::error::Result;
use crate::keys::KeySource;

pub use chd::{ChdHash, HASH_MAGIC, SIZE_HASH_HEADER};

/// Default average number of keys per bucket
pub const DEFAULT_BUCKET_SIZE: f64 = 4.0;

/// Default ratio of keys to slots during placement
pub const DEFAULT_LOAD_FACTOR: f64 = 0.99;

/// Default number of seeds tried before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 16;

/// Default number of pilots tried per bucket before a seed is abandoned
pub const DEFAULT_MAX_PILOT: u32 = 1 << 20;

/// A minimal perfect hash function over byte-string keys
pub trait PerfectHash: Sized {
    /// Constructs a function over every distinct key produced by `keys`.
    ///
    /// The source may be rewound and traversed several times.
    fn build<K: KeySource + ?Sized>(keys: &mut K, config: &HashConfig) -> Result<Self>;

    /// Returns the id of `key`, always in `[0, len)`
    fn hash(&self, key: &[u8]) -> usize;

    /// Number of keys the function was built over
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes the function
    fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()>;

    /// Deserializes a function previously written by `write_bytes`
    fn from_reader<R: Read>(reader: &mut R) -> Result<Self>;
}

/// Parameters of the perfect hash construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashConfig {
    /// Seed of the generator drawing per-attempt hash seeds
    pub seed: u64,

    /// Ratio of keys to slots while placing buckets (0.5..=1.0)
    ///
    /// Lower values make placement faster at the cost of a larger remap table.
    pub load_factor: f64,

    /// Average number of keys per bucket (1.0..=16.0)
    ///
    /// Larger buckets mean fewer stored pilots but longer pilot searches.
    pub bucket_size: f64,

    /// Number of seeds tried before construction fails
    pub max_attempts: usize,

    /// Number of pilot values tried per bucket before a seed is abandoned
    pub max_pilot: u32,
}
impl Default for HashConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
            bucket_size: DEFAULT_BUCKET_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_pilot: DEFAULT_MAX_PILOT,
        }
    }
}
impl HashConfig {
    /// Returns a copy with every parameter clamped to its valid range
    #[must_use]
    pub fn validated(&self) -> Self {
        let clamp = |value: f64, lo: f64, hi: f64, default: f64| {
            if value.is_finite() {
                value.clamp(lo, hi)
            } else {
                default
            }
        };
        Self {
            seed: self.seed,
            load_factor: clamp(self.load_factor, 0.5, 1.0, DEFAULT_LOAD_FACTOR),
            bucket_size: clamp(self.bucket_size, 1.0, 16.0, DEFAULT_BUCKET_SIZE),
            max_attempts: self.max_attempts.max(1),
            max_pilot: self.max_pilot.max(1),
        }
    }
}
