//! Core data structures for the interlap command line tool.
//!
//! These types describe BED records and the query modes the tool supports.
//! The index itself lives in [`crate::index`].

use std::fmt;
use std::str::FromStr;

use crate::error::IntervalError;
use crate::index::Interval;

/// A genomic region from a BED file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub metadata: Vec<String>,
}

impl Region {
    /// Create a new region.
    pub fn new(chrom: String, start: i64, end: i64, metadata: Vec<String>) -> Self {
        Region {
            chrom,
            start,
            end,
            metadata,
        }
    }

    /// Get the region ID (chrom_start_end).
    pub fn id(&self) -> String {
        format!("{}_{}_{}", self.chrom, self.start, self.end)
    }

    /// Borrow this region as an interval whose payload is the region itself.
    pub fn as_interval(&self) -> Result<Interval<&Region>, IntervalError> {
        Interval::new(self.start, self.end, self)
    }
}

/// What the tool computes for each query region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Every indexed region overlapping the query.
    Overlap,
    /// Number of indexed regions overlapping the query.
    Count,
    /// Whether anything overlaps the query.
    Contains,
    /// Overlapping regions, or the nearest ones when nothing overlaps.
    Closest,
    /// Merged coverage of the indexed regions.
    Merge,
    /// Indexed coverage minus the query coverage.
    Subtract,
}

impl QueryMode {
    /// Convert the mode to its command line name.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Overlap => "overlap",
            QueryMode::Count => "count",
            QueryMode::Contains => "contains",
            QueryMode::Closest => "closest",
            QueryMode::Merge => "merge",
            QueryMode::Subtract => "subtract",
        }
    }

    /// Whether the mode reads a query file.
    pub fn needs_queries(&self) -> bool {
        !matches!(self, QueryMode::Merge)
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for parsing a query mode from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQueryModeError;

impl fmt::Display for ParseQueryModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid mode: expected 'overlap', 'count', 'contains', 'closest', 'merge', or 'subtract'"
        )
    }
}

impl std::error::Error for ParseQueryModeError {}

impl FromStr for QueryMode {
    type Err = ParseQueryModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overlap" => Ok(QueryMode::Overlap),
            "count" => Ok(QueryMode::Count),
            "contains" => Ok(QueryMode::Contains),
            "closest" => Ok(QueryMode::Closest),
            "merge" => Ok(QueryMode::Merge),
            "subtract" => Ok(QueryMode::Subtract),
            _ => Err(ParseQueryModeError),
        }
    }
}
