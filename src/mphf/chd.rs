use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_128_with_seed;
use zstd::{Decoder, Encoder};

use super::{HashConfig, PerfectHash};
use crate::error::{HashError, IndexError, Result};
use crate::keys::KeySource;

/// Magic number to designate a serialized hash ("FQIDXCHD")
pub const HASH_MAGIC: u64 = u64::from_le_bytes(*b"FQIDXCHD");

/// Size of the uncompressed hash file header in bytes
pub const SIZE_HASH_HEADER: usize = 32;

/// Compression level of the serialized pilots and remap table
const ZSTD_LEVEL: i32 = 3;

/// 128-bit key fingerprint: the high half selects a bucket, the low half a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Fingerprint {
    hi: u64,
    lo: u64,
}
impl Fingerprint {
    fn new(key: &[u8], seed: u64) -> Self {
        let hash = xxh3_128_with_seed(key, seed);
        Self {
            hi: (hash >> 64) as u64,
            lo: hash as u64,
        }
    }
}

/// Maps a uniform hash onto `[0, n)` without a division
#[inline]
fn fastrange(hash: u64, n: u64) -> u64 {
    ((u128::from(hash) * u128::from(n)) >> 64) as u64
}

/// splitmix64 finalizer applied to a pilot value
#[inline]
fn pilot_hash(pilot: u32) -> u64 {
    let mut z = u64::from(pilot).wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[inline]
fn slot_of(lo: u64, pilot_hash: u64, slots: u64) -> u64 {
    (lo ^ pilot_hash) % slots
}

#[inline]
fn is_taken(taken: &[u64], slot: u64) -> bool {
    taken[(slot / 64) as usize] & (1 << (slot % 64)) != 0
}

#[inline]
fn set_taken(taken: &mut [u64], slot: u64) {
    taken[(slot / 64) as usize] |= 1 << (slot % 64);
}

fn corrupt<E: std::fmt::Display>(err: E) -> IndexError {
    IndexError::CorruptHash(err.to_string())
}

/// Hash-and-displace minimal perfect hash function.
///
/// Keys are fingerprinted and split into buckets. Buckets are placed largest
/// first: for each one the construction searches for the smallest *pilot*
/// whose displacement sends all of the bucket's keys to free, distinct slots.
/// Slots are over-provisioned by the load factor; occupied slots beyond `n`
/// are finally remapped onto the free slots below `n`, which makes the
/// function minimal.
///
/// Lookups cost one fingerprint, one pilot read and at most one remap read.
/// Only fingerprints are held during construction, never the key text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChdHash {
    /// Seed of the fingerprint function
    seed: u64,

    /// Number of keys
    n: u64,

    /// Number of slots used during placement (`>= n`)
    slots: u64,

    /// Displacement value per bucket
    pilots: Vec<u32>,

    /// Target id of every slot in `n..slots` (zero for unoccupied slots)
    remap: Vec<u64>,
}
impl ChdHash {
    /// Reads every key once and returns its sorted, deduplicated fingerprints
    fn collect_fingerprints<K: KeySource + ?Sized>(
        keys: &mut K,
        seed: u64,
        key: &mut Vec<u8>,
    ) -> Result<Vec<Fingerprint>> {
        keys.rewind()?;
        let mut fingerprints = Vec::with_capacity(keys.estimated_len());
        while keys.next_key(key)? {
            fingerprints.push(Fingerprint::new(key, seed));
        }
        fingerprints.sort_unstable();
        fingerprints.dedup();
        Ok(fingerprints)
    }

    /// Places every bucket for one seed, or returns `None` if a bucket exhausts its pilots
    fn try_build(fingerprints: &[Fingerprint], seed: u64, config: &HashConfig) -> Option<Self> {
        let n = fingerprints.len();
        let n_buckets = ((n as f64 / config.bucket_size).ceil() as usize).max(1);
        let mut slots = ((n as f64 / config.load_factor).ceil() as usize).max(n);
        // modulo a power of two ignores every high bit of the displaced fingerprint
        if slots.is_power_of_two() {
            slots += 1;
        }

        // fingerprints are sorted by `hi`, so every bucket is a contiguous range
        let mut starts = vec![0usize; n_buckets + 1];
        for fp in fingerprints {
            starts[fastrange(fp.hi, n_buckets as u64) as usize + 1] += 1;
        }
        for idx in 1..starts.len() {
            starts[idx] += starts[idx - 1];
        }

        let mut order: Vec<usize> = (0..n_buckets).collect();
        order.sort_by_key(|&b| std::cmp::Reverse(starts[b + 1] - starts[b]));

        let mut taken = vec![0u64; slots.div_ceil(64)];
        let mut pilots = vec![0u32; n_buckets];
        let mut positions = Vec::new();
        for &bucket in &order {
            let members = &fingerprints[starts[bucket]..starts[bucket + 1]];
            if members.is_empty() {
                break;
            }

            let mut placed = false;
            for pilot in 0..config.max_pilot {
                let displacement = pilot_hash(pilot);
                positions.clear();
                let fits = members.iter().all(|fp| {
                    let slot = slot_of(fp.lo, displacement, slots as u64);
                    if is_taken(&taken, slot) || positions.contains(&slot) {
                        false
                    } else {
                        positions.push(slot);
                        true
                    }
                });
                if fits {
                    for &slot in &positions {
                        set_taken(&mut taken, slot);
                    }
                    pilots[bucket] = pilot;
                    placed = true;
                    break;
                }
            }
            if !placed {
                return None;
            }
        }

        let mut remap = vec![0u64; slots - n];
        let mut free = (0..n as u64).filter(|&slot| !is_taken(&taken, slot));
        for slot in n as u64..slots as u64 {
            if is_taken(&taken, slot) {
                remap[(slot - n as u64) as usize] = free.next()?;
            }
        }

        Some(Self {
            seed,
            n: n as u64,
            slots: slots as u64,
            pilots,
            remap,
        })
    }

    /// Number of buckets (and stored pilots)
    #[must_use]
    pub fn n_buckets(&self) -> usize {
        self.pilots.len()
    }
}

impl PerfectHash for ChdHash {
    fn build<K: KeySource + ?Sized>(keys: &mut K, config: &HashConfig) -> Result<Self> {
        let config = config.validated();
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut key = Vec::new();
        let mut n_keys = 0;

        for attempt in 0..config.max_attempts {
            let seed = rng.next_u64();
            let fingerprints = Self::collect_fingerprints(keys, seed, &mut key)?;
            if fingerprints.is_empty() {
                return Err(HashError::NoKeys.into());
            }
            n_keys = fingerprints.len();
            debug!(attempt, seed, keys = n_keys, "placing buckets");

            if let Some(hash) = Self::try_build(&fingerprints, seed, &config) {
                info!(
                    keys = n_keys,
                    buckets = hash.n_buckets(),
                    attempts = attempt + 1,
                    "constructed perfect hash"
                );
                return Ok(hash);
            }
            debug!(attempt, "pilot search exhausted, drawing a new seed");
        }

        Err(HashError::ConstructionFailed {
            keys: n_keys,
            attempts: config.max_attempts,
        }
        .into())
    }

    fn hash(&self, key: &[u8]) -> usize {
        let fp = Fingerprint::new(key, self.seed);
        let bucket = fastrange(fp.hi, self.pilots.len() as u64) as usize;
        let slot = slot_of(fp.lo, pilot_hash(self.pilots[bucket]), self.slots);
        if slot < self.n {
            slot as usize
        } else {
            self.remap[(slot - self.n) as usize] as usize
        }
    }

    fn len(&self) -> usize {
        self.n as usize
    }

    /// Serializes the function
    ///
    /// The layout is a 32-byte header followed by a zstd-compressed body:
    /// - Bytes 0-7: magic number (u64, little endian)
    /// - Bytes 8-15: fingerprint seed (u64, little endian)
    /// - Bytes 16-23: number of keys (u64, little endian)
    /// - Bytes 24-31: number of slots (u64, little endian)
    /// - Body: number of buckets (u64), pilots (u32 each), remap table (u64 each)
    fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut header = [0u8; SIZE_HASH_HEADER];
        LittleEndian::write_u64(&mut header[0..8], HASH_MAGIC);
        LittleEndian::write_u64(&mut header[8..16], self.seed);
        LittleEndian::write_u64(&mut header[16..24], self.n);
        LittleEndian::write_u64(&mut header[24..32], self.slots);
        writer.write_all(&header)?;

        let mut body = Vec::with_capacity(8 + 4 * self.pilots.len() + 8 * self.remap.len());
        body.write_u64::<LittleEndian>(self.pilots.len() as u64)?;
        for &pilot in &self.pilots {
            body.write_u32::<LittleEndian>(pilot)?;
        }
        for &target in &self.remap {
            body.write_u64::<LittleEndian>(target)?;
        }

        let mut encoder = Encoder::new(writer, ZSTD_LEVEL)?;
        encoder.write_all(&body)?;
        encoder.finish()?;
        Ok(())
    }

    fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut header = [0u8; SIZE_HASH_HEADER];
        reader.read_exact(&mut header).map_err(corrupt)?;
        let magic = LittleEndian::read_u64(&header[0..8]);
        if magic != HASH_MAGIC {
            return Err(IndexError::InvalidMagicNumber(magic).into());
        }
        let seed = LittleEndian::read_u64(&header[8..16]);
        let n = LittleEndian::read_u64(&header[16..24]);
        let slots = LittleEndian::read_u64(&header[24..32]);
        if n == 0 || slots < n {
            return Err(corrupt(format!("invalid dimensions: {n} keys over {slots} slots")).into());
        }

        let body = {
            let mut body = Vec::new();
            let mut decoder = Decoder::new(reader).map_err(corrupt)?;
            decoder.read_to_end(&mut body).map_err(corrupt)?;
            body
        };
        if body.len() < 8 {
            return Err(corrupt("missing bucket count").into());
        }
        let n_buckets = LittleEndian::read_u64(&body[0..8]);
        let n_remap = slots - n;
        let expected = n_buckets
            .checked_mul(4)
            .and_then(|pilots| n_remap.checked_mul(8).map(|remap| (pilots, remap)))
            .and_then(|(pilots, remap)| pilots.checked_add(remap))
            .and_then(|len| len.checked_add(8));
        if n_buckets == 0 || expected != Some(body.len() as u64) {
            return Err(corrupt(format!(
                "body holds {} bytes, inconsistent with {n_buckets} buckets and {n_remap} remapped slots",
                body.len()
            ))
            .into());
        }

        let pilot_end = 8 + 4 * n_buckets as usize;
        let pilots = body[8..pilot_end]
            .chunks_exact(4)
            .map(LittleEndian::read_u32)
            .collect();
        let remap: Vec<u64> = body[pilot_end..]
            .chunks_exact(8)
            .map(LittleEndian::read_u64)
            .collect();
        if remap.iter().any(|&target| target >= n) {
            return Err(corrupt("remap target out of range").into());
        }

        Ok(Self {
            seed,
            n,
            slots,
            pilots,
            remap,
        })
    }
}
