use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fqidx::stream::is_bgzf;
use fqidx::{BgzfWriter, FastqIndex, IndexBuilder};

/// Random-access retrieval of FASTQ records from BGZF streams
#[derive(Parser)]
#[clap(name = "fqidx", version)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v for info, -vv for debug)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Build an index over a FASTQ file
    ///
    /// Input that is not BGZF compressed is first re-encoded as BGZF next to
    /// the input file, and the re-encoded copy is indexed.
    Index {
        /// FASTQ file (BGZF, gzip or uncompressed)
        #[clap(required = true)]
        fastq: PathBuf,
        /// Prefix of the index files [default: the indexed BGZF path]
        prefix: Option<PathBuf>,
        /// Seed for the hash construction
        #[clap(long, default_value_t = 0)]
        seed: u64,
        /// Ratio of keys to slots during hash construction
        #[clap(long, default_value_t = 0.99)]
        load_factor: f64,
        /// Average number of keys per hash bucket
        #[clap(long, default_value_t = 4.0)]
        bucket_size: f64,
    },
    /// Print the records of the given keys as FASTQ
    Find {
        /// Indexed BGZF FASTQ file
        #[clap(required = true)]
        fastq: PathBuf,
        /// Prefix of the index files
        #[clap(required = true)]
        prefix: PathBuf,
        /// Record keys (header text without the leading '@')
        #[clap(required = true)]
        keys: Vec<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Path of the BGZF copy written for a non-BGZF input
fn bgzf_path(fastq: &Path) -> PathBuf {
    let mut path = fastq.as_os_str().to_owned();
    if fastq.extension().is_some_and(|ext| ext == "gz") {
        path.push(".bgz");
    } else {
        path.push(".gz");
    }
    PathBuf::from(path)
}

/// Re-encodes any (optionally compressed) FASTQ file as BGZF
fn reencode(fastq: &Path) -> Result<PathBuf> {
    let output = bgzf_path(fastq);
    let (mut reader, format) = niffler::from_path(fastq)
        .with_context(|| format!("unable to open {}", fastq.display()))?;
    info!(input = %fastq.display(), ?format, output = %output.display(), "re-encoding as BGZF");

    let mut writer = BgzfWriter::from_path(&output)
        .with_context(|| format!("unable to create {}", output.display()))?;
    io::copy(&mut reader, &mut writer)?;
    writer.finish()?.flush()?;
    Ok(output)
}

fn run_index(
    fastq: &Path,
    prefix: Option<PathBuf>,
    seed: u64,
    load_factor: f64,
    bucket_size: f64,
) -> Result<()> {
    let stream_path = if is_bgzf(fastq)? {
        fastq.to_path_buf()
    } else {
        reencode(fastq)?
    };
    let prefix = prefix.unwrap_or_else(|| stream_path.clone());

    let index = IndexBuilder::default()
        .seed(seed)
        .load_factor(load_factor)
        .bucket_size(bucket_size)
        .build(&stream_path, &prefix)?;
    let paths = index.paths();
    eprintln!(
        "Indexed {} records of {} into {} and {}",
        index.len(),
        stream_path.display(),
        paths.hash.display(),
        paths.table.display()
    );
    Ok(())
}

/// Returns the number of keys that were not found
fn run_find(fastq: &Path, prefix: &Path, keys: &[String]) -> Result<usize> {
    let mut index = FastqIndex::open(fastq, prefix)?;
    let mut stdout = BufWriter::new(io::stdout().lock());
    let mut missing = 0;
    for key in keys {
        match index.query(key.as_bytes())? {
            Some(record) => record.write_fastq(&mut stdout)?,
            None => {
                eprintln!("record not found: {key}");
                missing += 1;
            }
        }
    }
    stdout.flush()?;
    Ok(missing)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Index {
            fastq,
            prefix,
            seed,
            load_factor,
            bucket_size,
        } => {
            run_index(&fastq, prefix, seed, load_factor, bucket_size)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Find {
            fastq,
            prefix,
            keys,
        } => {
            if run_find(&fastq, &prefix, &keys)? > 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
