//! BED file parser with gzip support.
//!
//! Parses BED (Browser Extensible Data) files containing genomic regions.
//! Lines whose start or end is not an integer (headers, `track` lines) are
//! skipped. Coordinates are not checked here; inverted records are rejected
//! when they reach an index.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::debug;
use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use crate::parser::util::create_buffered_reader;
use crate::types::Region;

/// At most this many columns after `end` are kept as metadata.
const MAX_META_COLUMNS: usize = 9;

/// Streaming BED file reader for chunked processing.
///
/// This struct provides an iterator-like interface for reading BED files
/// in chunks, enabling memory-efficient processing of large query files.
pub struct BedReader {
    reader: Box<dyn BufRead + Send>,
    num_meta_columns: usize,
}

impl BedReader {
    /// Create a new BedReader from a file path (supports .gz).
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open BED file: {}", path.display()))?;
        let reader = create_buffered_reader(file, path);

        Ok(BedReader {
            reader,
            num_meta_columns: 0,
        })
    }

    /// Get the number of metadata columns found so far.
    pub fn num_meta_columns(&self) -> usize {
        self.num_meta_columns
    }

    /// Read the next chunk of regions from the BED file.
    ///
    /// Returns `None` when EOF is reached. The regions are returned in file order.
    pub fn read_chunk(&mut self, size: usize) -> Result<Option<Vec<Region>>> {
        let mut regions = Vec::with_capacity(size);
        let mut line = String::new();

        while regions.len() < size {
            line.clear();
            let bytes_read = self
                .reader
                .read_line(&mut line)
                .context("Failed to read BED line")?;

            if bytes_read == 0 {
                break;
            }

            if let Some(region) = parse_bed_line(&line) {
                self.num_meta_columns = self.num_meta_columns.max(region.metadata.len());
                regions.push(region);
            }
        }

        if regions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(regions))
        }
    }
}

/// Parse a single BED line into a Region.
///
/// Returns `None` for blank lines, lines with fewer than 3 columns, and lines
/// whose coordinates are not integers.
fn parse_bed_line(line: &str) -> Option<Region> {
    let trimmed = line.trim_end();
    if trimmed.is_empty() {
        return None;
    }

    let fields: Vec<&str> = trimmed.split('\t').collect();
    if fields.len() < 3 {
        return None;
    }

    let start: i64 = fields[1].parse().ok()?;
    let end: i64 = fields[2].parse().ok()?;

    let metadata: Vec<String> = fields
        .iter()
        .skip(3)
        .take(MAX_META_COLUMNS)
        .map(|s| s.to_string())
        .collect();

    Some(Region::new(fields[0].to_string(), start, end, metadata))
}

/// Result of parsing a BED file.
pub struct BedData {
    /// Regions organized by chromosome, in first-seen chromosome order.
    pub regions_by_chrom: IndexMap<String, Vec<Region>>,
    /// Number of metadata columns found.
    pub num_meta_columns: usize,
}

impl BedData {
    /// Total number of regions across chromosomes.
    pub fn num_regions(&self) -> usize {
        self.regions_by_chrom.values().map(Vec::len).sum()
    }
}

/// Parse a BED file and return organized region data.
///
/// Supports both plain text and gzip-compressed BED files.
pub fn parse_bed(path: &Path) -> Result<BedData> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open BED file: {}", path.display()))?;
    let reader = create_buffered_reader(file, path);

    let data = parse_bed_reader(reader)?;
    debug!(
        "Parsed {} regions on {} chromosomes from {}",
        data.num_regions(),
        data.regions_by_chrom.len(),
        path.display()
    );
    Ok(data)
}

/// Parse BED data from a reader.
fn parse_bed_reader<R: BufRead>(reader: R) -> Result<BedData> {
    let mut regions_by_chrom: IndexMap<String, Vec<Region>> = IndexMap::new();
    let mut num_meta_columns = 0;

    for line_result in reader.lines() {
        let line = line_result.context("Failed to read BED line")?;

        if let Some(region) = parse_bed_line(&line) {
            num_meta_columns = num_meta_columns.max(region.metadata.len());
            regions_by_chrom
                .entry(region.chrom.clone())
                .or_default()
                .push(region);
        }
    }

    Ok(BedData {
        regions_by_chrom,
        num_meta_columns,
    })
}

/// Get standard BED column headers for metadata columns.
pub fn get_bed_headers(num_columns: usize) -> Vec<&'static str> {
    let all_headers = [
        "name",
        "score",
        "strand",
        "thickStart",
        "thickEnd",
        "itemRgb",
        "blockCount",
        "blockSizes",
        "blockStarts",
    ];

    all_headers.iter().take(num_columns).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn test_parse_bed_basic() {
        let bed_content = "chr1\t100\t200\nchrom2\t300\t400\n";

        let reader = BufReader::new(bed_content.as_bytes());
        let result = parse_bed_reader(reader).unwrap();

        assert!(result.regions_by_chrom.contains_key("chr1"));
        assert!(result.regions_by_chrom.contains_key("chrom2"));

        let chr1_regions = &result.regions_by_chrom["chr1"];
        assert_eq!(chr1_regions.len(), 1);
        assert_eq!(chr1_regions[0].start, 100);
        assert_eq!(chr1_regions[0].end, 200);
        assert!(chr1_regions[0].metadata.is_empty());
        assert_eq!(result.num_regions(), 2);
    }

    #[test]
    fn test_parse_bed_keeps_chrom_order() {
        let bed_content = "chr2\t1\t2\nchr10\t1\t2\nchr1\t1\t2\nchr2\t5\t6\n";

        let reader = BufReader::new(bed_content.as_bytes());
        let result = parse_bed_reader(reader).unwrap();

        let chroms: Vec<&str> = result.regions_by_chrom.keys().map(String::as_str).collect();
        assert_eq!(chroms, vec!["chr2", "chr10", "chr1"]);
        assert_eq!(result.regions_by_chrom["chr2"].len(), 2);
    }

    #[test]
    fn test_parse_bed_with_metadata() {
        let bed_content = "chr1\t100\t200\tregion1\t500\t+\n";

        let reader = BufReader::new(bed_content.as_bytes());
        let result = parse_bed_reader(reader).unwrap();

        let regions = &result.regions_by_chrom["chr1"];
        assert_eq!(regions[0].metadata, vec!["region1", "500", "+"]);
        assert_eq!(result.num_meta_columns, 3);
    }

    #[test]
    fn test_parse_bed_skip_header() {
        let bed_content = "chrom\tstart\tend\tname\nchr1\t100\t200\tregion1\n";

        let reader = BufReader::new(bed_content.as_bytes());
        let result = parse_bed_reader(reader).unwrap();

        // Should skip header line (can't parse 'start' as int)
        assert!(result.regions_by_chrom.contains_key("chr1"));
        assert!(!result.regions_by_chrom.contains_key("chrom"));
    }

    #[test]
    fn test_parse_bed_keeps_inverted_records() {
        let bed_content = "chr1\t200\t100\n";

        let reader = BufReader::new(bed_content.as_bytes());
        let result = parse_bed_reader(reader).unwrap();

        let region = &result.regions_by_chrom["chr1"][0];
        assert_eq!((region.start, region.end), (200, 100));
    }

    #[test]
    fn test_parse_bed_empty_lines() {
        let bed_content = "\nchr1\t100\t200\n\nchr1\t300\t400\n\n";

        let reader = BufReader::new(bed_content.as_bytes());
        let result = parse_bed_reader(reader).unwrap();

        let regions = &result.regions_by_chrom["chr1"];
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_parse_bed_line_trims_newline() {
        let region = parse_bed_line("chr1\t5\t9\tname\r\n").unwrap();
        assert_eq!(region.metadata, vec!["name"]);
        assert!(parse_bed_line("chr1\t5\n").is_none());
    }

    #[test]
    fn test_get_bed_headers() {
        assert_eq!(get_bed_headers(0), Vec::<&str>::new());
        assert_eq!(get_bed_headers(3), vec!["name", "score", "strand"]);
        assert_eq!(get_bed_headers(20).len(), 9);
    }

    #[test]
    fn test_bed_reader_read_chunk() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "chr1\t100\t200\tregion1").unwrap();
        writeln!(temp_file, "chr1\t300\t400\tregion2").unwrap();
        writeln!(temp_file, "chr2\t500\t600\tregion3").unwrap();
        writeln!(temp_file, "chr2\t700\t800\tregion4").unwrap();
        writeln!(temp_file, "chr3\t900\t1000\tregion5").unwrap();
        temp_file.flush().unwrap();

        let mut reader = BedReader::new(temp_file.path()).unwrap();

        let chunk1 = reader.read_chunk(2).unwrap().unwrap();
        assert_eq!(chunk1.len(), 2);
        assert_eq!(chunk1[0].chrom, "chr1");
        assert_eq!(chunk1[1].start, 300);

        let chunk2 = reader.read_chunk(2).unwrap().unwrap();
        assert_eq!(chunk2.len(), 2);
        assert_eq!(chunk2[0].chrom, "chr2");

        // Only 1 region left
        let chunk3 = reader.read_chunk(2).unwrap().unwrap();
        assert_eq!(chunk3.len(), 1);
        assert_eq!(chunk3[0].chrom, "chr3");

        assert!(reader.read_chunk(2).unwrap().is_none());
        assert_eq!(reader.num_meta_columns(), 1);
    }

    #[test]
    fn test_bed_reader_gzip() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.bed.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        writeln!(encoder, "chr1\t10\t20").unwrap();
        writeln!(encoder, "chr1\t30\t40").unwrap();
        encoder.finish().unwrap();

        let data = parse_bed(&path).unwrap();
        assert_eq!(data.regions_by_chrom["chr1"].len(), 2);
    }

    #[test]
    fn test_bed_reader_missing_file() {
        let err = BedReader::new(Path::new("/nonexistent/regions.bed")).err().unwrap();
        assert!(err.to_string().contains("Failed to open BED file"));
    }
}
