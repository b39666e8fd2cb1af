//! interlap - Fast interval overlap queries and coverage algebra.
//!
//! This library indexes intervals carrying arbitrary payloads and answers
//! overlap queries against them, without building a balanced tree. It also
//! provides normalized coverage sets supporting union and subtraction.
//!
//! # Features
//!
//! - [`OverlapIndex`]: sorted intervals plus a widest-interval bound that
//!   prunes the binary search; lazy `find`, allocation-free `contains`,
//!   nearest-interval `closest`
//! - [`IntervalSet`]: sorted, non-touching coverage with `add` (union) and
//!   `split` (subtract another set's coverage)
//! - BED parsing (with gzip support) and per-chromosome querying for the
//!   `interlap` command line tool
//!
//! Intervals are closed: `[a, b]` and `[b, c]` overlap.
//!
//! # Example
//!
//! ```
//! use interlap::{IntervalSet, OverlapIndex};
//!
//! let mut index = OverlapIndex::new();
//! index.insert(20, 22, "hi")?;
//! index.insert(2, 3, "hello")?;
//!
//! assert!(index.contains(21, 21));
//! let hits: Vec<_> = index.find(3, 3).map(|iv| *iv.data()).collect();
//! assert_eq!(hits, vec!["hello"]);
//!
//! let coverage = IntervalSet::from_ranges(vec![(1, 50), (60, 80)])?;
//! let pieces = coverage.split_ranges(vec![(45, 65), (70, 74), (76, 78)])?;
//! assert_eq!(pieces, vec![(1, 45), (65, 70), (74, 76), (78, 80)]);
//! # Ok::<(), interlap::IntervalError>(())
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod output;
pub mod parser;
pub mod query;
pub mod types;

pub use config::Config;
pub use error::IntervalError;
pub use index::{overlaps, Interval, IntervalSet, OverlapIndex};
pub use parser::{BedData, BedReader};
pub use types::{QueryMode, Region};
