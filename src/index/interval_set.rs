//! Normalized coverage sets.
//!
//! An [`IntervalSet`] holds sorted `(start, end)` ranges where neighbours
//! never touch: `r1.end < r2.start`. Overlapping or touching input ranges
//! are coalesced on every insertion.

use std::fmt;

use log::debug;

use crate::error::IntervalError;
use crate::index::interval::Interval;

/// A union of closed ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    ranges: Vec<(i64, i64)>,
}

/// Reject any range with `start > end`.
fn validate<I>(ranges: I) -> Result<Vec<(i64, i64)>, IntervalError>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    ranges
        .into_iter()
        .map(|(start, end)| {
            if start > end {
                Err(IntervalError::Inverted { start, end })
            } else {
                Ok((start, end))
            }
        })
        .collect()
}

/// Sort and coalesce overlapping or touching ranges.
fn normalize(mut ranges: Vec<(i64, i64)>) -> Vec<(i64, i64)> {
    if ranges.len() < 2 {
        return ranges;
    }
    ranges.sort_unstable();

    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

impl IntervalSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw `(start, end)` ranges.
    pub fn from_ranges<I>(ranges: I) -> Result<Self, IntervalError>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        Ok(IntervalSet {
            ranges: normalize(validate(ranges)?),
        })
    }

    /// Build a set covering the given intervals. Payloads are ignored.
    pub fn from_intervals<'a, T: 'a, I>(intervals: I) -> Self
    where
        I: IntoIterator<Item = &'a Interval<T>>,
    {
        IntervalSet {
            ranges: normalize(intervals.into_iter().map(Interval::key).collect()),
        }
    }

    /// The normalized ranges.
    pub fn ranges(&self) -> &[(i64, i64)] {
        &self.ranges
    }

    /// Number of disjoint ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total covered length, summing `end - start` over the ranges.
    ///
    /// Saturates at `u64::MAX`.
    pub fn covered(&self) -> u64 {
        self.ranges
            .iter()
            .fold(0u64, |total, &(s, e)| total.saturating_add(e.abs_diff(s)))
    }

    /// Check whether `[start, end]` overlaps the coverage.
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        if start > end {
            return false;
        }
        // Ends are sorted too, since ranges are disjoint
        let idx = self.ranges.partition_point(|&(_, e)| e < start);
        self.ranges.get(idx).is_some_and(|&(s, _)| s <= end)
    }

    /// Return the union of `self` and `other`.
    pub fn add(&self, other: &IntervalSet) -> IntervalSet {
        let mut ranges = Vec::with_capacity(self.ranges.len() + other.ranges.len());
        ranges.extend_from_slice(&self.ranges);
        ranges.extend_from_slice(&other.ranges);
        IntervalSet {
            ranges: normalize(ranges),
        }
    }

    /// Return the union of `self` and raw ranges.
    pub fn add_ranges<I>(&self, ranges: I) -> Result<IntervalSet, IntervalError>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        Ok(self.add(&IntervalSet::from_ranges(ranges)?))
    }

    /// Return the parts of `self` not covered by `other`, as maximal pieces
    /// in ascending order.
    ///
    /// Pieces keep the coordinates of the ranges that cut them, so removing
    /// `(45, 65)` from `(1, 50)` leaves `(1, 45)`. A cut that only touches a
    /// range endpoint leaves the range whole.
    pub fn split(&self, other: &IntervalSet) -> Vec<(i64, i64)> {
        let cuts = &other.ranges;
        let mut pieces = Vec::new();
        // First cut that could still reach the current range
        let mut first = 0;

        for &(start, end) in &self.ranges {
            while first < cuts.len() && cuts[first].1 < start {
                first += 1;
            }

            let mut cursor = start;
            let mut covered_to_end = false;
            for &(cut_start, cut_end) in cuts[first..].iter().take_while(|c| c.0 <= end) {
                if cut_start > cursor {
                    pieces.push((cursor, cut_start));
                }
                cursor = cursor.max(cut_end);
                if cursor >= end {
                    covered_to_end = true;
                    break;
                }
            }

            if !covered_to_end {
                pieces.push((cursor, end));
            }
        }

        debug!(
            "Split {} ranges by {} ranges into {} pieces",
            self.ranges.len(),
            cuts.len(),
            pieces.len()
        );
        pieces
    }

    /// Same as [`IntervalSet::split`], taking raw ranges.
    pub fn split_ranges<I>(&self, ranges: I) -> Result<Vec<(i64, i64)>, IntervalError>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        Ok(self.split(&IntervalSet::from_ranges(ranges)?))
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntervalSet([")?;
        for (i, (start, end)) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", start, end)?;
        }
        write!(f, "])")
    }
}
