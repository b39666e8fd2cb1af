//! Interval indexing and coverage algebra.

pub mod interval;
pub mod interval_set;
pub mod overlap;

pub use interval::{overlaps, Interval};
pub use interval_set::IntervalSet;
pub use overlap::{Find, OverlapIndex};
