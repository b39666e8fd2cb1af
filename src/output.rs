//! Output formatting for interlap results.
//!
//! Every mode writes a tab-separated header line followed by one line per
//! result. Metadata columns of indexed regions always come last.

use anyhow::Result;

use std::io::Write;

use crate::parser::bed::get_bed_headers;
use crate::types::{QueryMode, Region};

const QUERY_COLUMNS: &str = "Chrom\tQueryStart\tQueryEnd";

/// Write the output header for a mode.
///
/// `num_meta_columns` is the metadata width of the indexed file; it only
/// matters for modes that report indexed regions.
pub fn write_header<W: Write>(
    writer: &mut W,
    mode: QueryMode,
    num_meta_columns: usize,
) -> Result<()> {
    let base_header = match mode {
        QueryMode::Overlap => format!("{}\tHitStart\tHitEnd", QUERY_COLUMNS),
        QueryMode::Closest => format!("{}\tHitStart\tHitEnd\tDistance", QUERY_COLUMNS),
        QueryMode::Count => format!("{}\tOverlaps", QUERY_COLUMNS),
        QueryMode::Contains => format!("{}\tOverlapping", QUERY_COLUMNS),
        QueryMode::Merge | QueryMode::Subtract => "Chrom\tStart\tEnd".to_string(),
    };

    let reports_hits = matches!(mode, QueryMode::Overlap | QueryMode::Closest);
    if reports_hits && num_meta_columns > 0 {
        let meta_str = get_bed_headers(num_meta_columns).join("\t");
        writeln!(writer, "{}\t{}", base_header, meta_str)?;
    } else {
        writeln!(writer, "{}", base_header)?;
    }

    Ok(())
}

fn query_prefix(query: &Region) -> String {
    format!("{}\t{}\t{}", query.chrom, query.start, query.end)
}

/// Format one query-hit pair, with the gap when reporting closest hits.
pub fn format_hit_line(query: &Region, hit: &Region, distance: Option<u64>) -> String {
    let mut line = format!("{}\t{}\t{}", query_prefix(query), hit.start, hit.end);

    if let Some(distance) = distance {
        line.push('\t');
        line.push_str(&distance.to_string());
    }

    if !hit.metadata.is_empty() {
        line.push('\t');
        line.push_str(hit.metadata.join("\t").trim_end());
    }

    line
}

/// Format the overlap count for a query.
pub fn format_count_line(query: &Region, count: usize) -> String {
    format!("{}\t{}", query_prefix(query), count)
}

/// Format whether a query overlaps anything.
pub fn format_contains_line(query: &Region, found: bool) -> String {
    format!("{}\t{}", query_prefix(query), found)
}

/// Format a merged or subtracted range.
pub fn format_range_line(chrom: &str, range: (i64, i64)) -> String {
    format!("{}\t{}\t{}", chrom, range.0, range.1)
}
