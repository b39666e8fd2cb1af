//! CLI entry point for interlap.
//!
//! Indexes the regions of one BED file per chromosome and answers queries
//! from a second BED file, or computes merged/subtracted coverage.

use ahash::AHashSet;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use interlap::config::Config;
use interlap::output::{format_range_line, write_header};
use interlap::parser::{parse_bed, BedData, BedReader};
use interlap::query::{build_indexes, merge_by_chrom, query_chunk, subtract_by_chrom, ChromIndex};
use interlap::types::QueryMode;

/// Interval overlap queries over BED files.
///
/// Indexes the regions of file A and reports, for each region of file B,
/// what it overlaps in A.
#[derive(Parser, Debug)]
#[command(name = "interlap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// BED file with the regions to index (required)
    #[arg(short = 'a', long = "regions")]
    regions: PathBuf,

    /// BED file with query regions (required by every mode except merge)
    #[arg(short = 'b', long = "queries")]
    queries: Option<PathBuf>,

    /// Output file (required)
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Mode: overlap, count, contains, closest, merge, or subtract
    #[arg(short = 'm', long = "mode", default_value = "overlap")]
    mode: String,

    /// Number of worker threads (0 = auto-detect)
    #[arg(long = "threads", short = 'j', default_value = "8")]
    threads: usize,

    /// Batch size for streaming query regions
    #[arg(long = "batch-size", default_value = "5000")]
    batch_size: usize,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    if !args.regions.exists() {
        bail!("Region file not found: {}", args.regions.display());
    }

    let mode = QueryMode::from_str(&args.mode).context(
        "Mode can only be one of the following: overlap, count, contains, closest, merge or subtract",
    )?;

    let config = Config {
        mode,
        threads: args.threads,
        batch_size: args.batch_size,
    };
    config.validate()?;

    let queries = if mode.needs_queries() {
        let path = args
            .queries
            .as_deref()
            .with_context(|| format!("Mode {} needs a query file (-b)", mode))?;
        if !path.exists() {
            bail!("Query file not found: {}", path.display());
        }
        Some(path)
    } else {
        None
    };

    let num_threads = config.worker_threads();
    debug!("Using {} worker threads", num_threads);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to create thread pool")?;

    pool.install(|| run(&args, queries, &config))?;

    info!("Done!");
    Ok(())
}

fn run(args: &Args, queries: Option<&Path>, config: &Config) -> Result<()> {
    let started = Instant::now();

    info!("Parsing region file: {}", args.regions.display());
    let regions = parse_bed(&args.regions)?;

    info!("Writing output to: {}", args.output.display());
    let file = File::create(&args.output).context("Failed to create output file")?;
    let mut writer = BufWriter::new(file);

    let lines_written = match (config.mode, queries) {
        (QueryMode::Merge, _) => run_merge(&regions, &mut writer)?,
        (QueryMode::Subtract, Some(path)) => run_subtract(&regions, path, &mut writer)?,
        (_, Some(path)) => run_queries(&regions, path, config, &mut writer)?,
        (mode, None) => bail!("Mode {} needs a query file (-b)", mode),
    };

    writer.flush()?;
    info!(
        "Wrote {} lines in {:.2} s",
        lines_written,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Merge the indexed regions of each chromosome.
fn run_merge<W: Write>(regions: &BedData, writer: &mut W) -> Result<usize> {
    let merged = merge_by_chrom(regions)?;

    write_header(writer, QueryMode::Merge, 0)?;
    let mut lines = 0;
    for (chrom, set) in &merged {
        for &range in set.ranges() {
            writeln!(writer, "{}", format_range_line(chrom, range))?;
            lines += 1;
        }
    }
    Ok(lines)
}

/// Remove the query coverage from the indexed coverage of each chromosome.
fn run_subtract<W: Write>(regions: &BedData, queries: &Path, writer: &mut W) -> Result<usize> {
    info!("Parsing query file: {}", queries.display());
    let cuts = parse_bed(queries)?;
    let pieces = subtract_by_chrom(regions, &cuts)?;

    write_header(writer, QueryMode::Subtract, 0)?;
    let mut lines = 0;
    for (chrom, ranges) in &pieces {
        for &range in ranges {
            writeln!(writer, "{}", format_range_line(chrom, range))?;
            lines += 1;
        }
    }
    Ok(lines)
}

/// Stream query regions in chunks and answer each chunk in parallel.
fn run_queries<W: Write>(
    regions: &BedData,
    queries: &Path,
    config: &Config,
    writer: &mut W,
) -> Result<usize> {
    let indexes: ChromIndex<'_> = build_indexes(regions)?;
    info!(
        "Indexed {} regions on {} chromosomes",
        regions.num_regions(),
        indexes.len()
    );

    write_header(writer, config.mode, regions.num_meta_columns)?;

    info!("Processing query file: {}", queries.display());
    let mut reader = BedReader::new(queries)?;
    let mut missing: AHashSet<String> = AHashSet::new();
    let mut num_queries = 0;
    let mut lines_written = 0;

    while let Some(chunk) = reader.read_chunk(config.batch_size)? {
        for region in &chunk {
            if !indexes.contains_key(region.chrom.as_str())
                && missing.insert(region.chrom.clone())
            {
                warn!("{} not found in the indexed regions", region.chrom);
            }
        }

        for line in query_chunk(&chunk, &indexes, config.mode)? {
            writeln!(writer, "{}", line)?;
            lines_written += 1;
        }
        num_queries += chunk.len();
    }

    info!("Answered {} query regions", num_queries);
    Ok(lines_written)
}
