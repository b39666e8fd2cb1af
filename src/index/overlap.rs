//! Overlap index over intervals sorted by start.
//!
//! The index keeps its intervals sorted by `(start, end)` and remembers the
//! widest interval ever inserted (`max_len`). A query binary-searches for the
//! first interval that could still reach the query start, then scans forward
//! until intervals start past the query end. Every mutating call returns with
//! the intervals already sorted, so queries only need `&self`.

use std::iter::FusedIterator;
use std::slice;

use log::debug;

use crate::error::IntervalError;
use crate::index::interval::Interval;

/// Batches up to this size go in one by one at their sorted position.
/// Larger batches are appended and sorted once.
const SORTED_INSERT_LIMIT: usize = 30;

/// Sorted collection of intervals answering overlap queries.
#[derive(Debug, Clone)]
pub struct OverlapIndex<T> {
    items: Vec<Interval<T>>,
    /// Widest `end - start` ever inserted. Never shrinks.
    max_len: u64,
}

impl<T> Default for OverlapIndex<T> {
    fn default() -> Self {
        OverlapIndex {
            items: Vec::new(),
            max_len: 0,
        }
    }
}

impl<T> OverlapIndex<T> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from raw `(start, end, payload)` records.
    ///
    /// Fails on the first record with `start > end`.
    pub fn from_records<I>(records: I) -> Result<Self, IntervalError>
    where
        I: IntoIterator<Item = (i64, i64, T)>,
    {
        let mut index = Self::new();
        index.try_update(records)?;
        Ok(index)
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current pruning bound.
    pub fn max_len(&self) -> u64 {
        self.max_len
    }

    /// Add a single interval at its sorted position.
    ///
    /// Equal keys keep insertion order.
    pub fn add(&mut self, interval: Interval<T>) {
        self.max_len = self.max_len.max(interval.width());
        let key = interval.key();
        let pos = self.items.partition_point(|iv| iv.key() <= key);
        self.items.insert(pos, interval);
    }

    /// Validate and add a single `(start, end, payload)` record.
    pub fn insert(&mut self, start: i64, end: i64, data: T) -> Result<(), IntervalError> {
        self.add(Interval::new(start, end, data)?);
        Ok(())
    }

    /// Add many intervals.
    ///
    /// Small batches are inserted in place; anything larger is appended and
    /// the whole index sorted once.
    pub fn update<I>(&mut self, intervals: I)
    where
        I: IntoIterator<Item = Interval<T>>,
    {
        let batch: Vec<Interval<T>> = intervals.into_iter().collect();

        if batch.len() > SORTED_INSERT_LIMIT || self.items.len() < batch.len() {
            for interval in &batch {
                self.max_len = self.max_len.max(interval.width());
            }
            debug!(
                "Sorting {} intervals after bulk insert of {}",
                self.items.len() + batch.len(),
                batch.len()
            );
            self.items.extend(batch);
            // Stable, so duplicates stay in insertion order
            self.items.sort_by_key(|iv| iv.key());
        } else {
            for interval in batch {
                self.add(interval);
            }
        }
    }

    /// Validate and add many raw `(start, end, payload)` records.
    ///
    /// Nothing is inserted if any record is malformed.
    pub fn try_update<I>(&mut self, records: I) -> Result<(), IntervalError>
    where
        I: IntoIterator<Item = (i64, i64, T)>,
    {
        let batch = records
            .into_iter()
            .map(Interval::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.update(batch);
        Ok(())
    }

    /// Index of the first interval whose start is at least `start - max_len`.
    ///
    /// Nothing before this index can reach `start`.
    fn search_start(&self, start: i64) -> usize {
        let bound = start.saturating_sub_unsigned(self.max_len);
        self.items.partition_point(|iv| iv.start() < bound)
    }

    /// Lazily enumerate every stored interval overlapping `[start, end]`,
    /// in ascending start order.
    ///
    /// An inverted query (`start > end`) matches nothing.
    pub fn find(&self, start: i64, end: i64) -> Find<'_, T> {
        let candidates = if start > end {
            &self.items[..0]
        } else {
            &self.items[self.search_start(start)..]
        };

        Find {
            candidates: candidates.iter(),
            start,
            end,
            scanned: 0,
        }
    }

    /// Check whether anything overlaps `[start, end]`.
    ///
    /// Stops at the first hit and allocates nothing.
    pub fn contains(&self, start: i64, end: i64) -> bool {
        self.find(start, end).next().is_some()
    }

    /// Find the intervals closest to `[start, end]`.
    ///
    /// If anything overlaps the query this is exactly [`OverlapIndex::find`].
    /// Otherwise it returns every interval at the smallest gap, from either
    /// side, in ascending start order.
    pub fn closest(&self, start: i64, end: i64) -> Vec<&Interval<T>> {
        if start > end || self.items.is_empty() {
            return Vec::new();
        }

        let hits: Vec<&Interval<T>> = self.find(start, end).collect();
        if !hits.is_empty() {
            return hits;
        }

        // With no overlaps, everything before `right` ends before `start`
        let right = self.items.partition_point(|iv| iv.start() <= end);

        let mut nearest_right: Vec<&Interval<T>> = Vec::new();
        let mut right_gap = None;
        if let Some(first) = self.items.get(right) {
            right_gap = Some(first.start().abs_diff(end));
            nearest_right.extend(
                self.items[right..]
                    .iter()
                    .take_while(|iv| iv.start() == first.start()),
            );
        }

        let mut nearest_left: Vec<&Interval<T>> = Vec::new();
        let mut best_end: Option<i64> = None;
        for interval in self.items[..right].iter().rev() {
            if let Some(best) = best_end {
                // Nothing further left can end at or after `best`
                if interval.start().saturating_add_unsigned(self.max_len) < best {
                    break;
                }
            }
            match best_end {
                Some(best) if interval.end() < best => {}
                Some(best) if interval.end() == best => nearest_left.push(interval),
                _ => {
                    best_end = Some(interval.end());
                    nearest_left.clear();
                    nearest_left.push(interval);
                }
            }
        }
        nearest_left.reverse();
        let left_gap = best_end.map(|e| start.abs_diff(e));

        match (left_gap, right_gap) {
            (Some(l), Some(r)) if l < r => nearest_left,
            (Some(l), Some(r)) if r < l => nearest_right,
            (Some(_), Some(_)) => {
                nearest_left.extend(nearest_right);
                nearest_left
            }
            (Some(_), None) => nearest_left,
            (None, _) => nearest_right,
        }
    }

    /// Iterate over all intervals in sorted order.
    pub fn iter(&self) -> slice::Iter<'_, Interval<T>> {
        self.items.iter()
    }

    /// All intervals as a sorted slice.
    pub fn as_slice(&self) -> &[Interval<T>] {
        &self.items
    }
}

/// Iterator returned by [`OverlapIndex::find`].
#[derive(Debug, Clone)]
pub struct Find<'a, T> {
    candidates: slice::Iter<'a, Interval<T>>,
    start: i64,
    end: i64,
    scanned: usize,
}

impl<T> Find<'_, T> {
    /// Number of stored intervals examined so far, including the one that
    /// ended the scan.
    pub fn scanned(&self) -> usize {
        self.scanned
    }
}

impl<'a, T> Iterator for Find<'a, T> {
    type Item = &'a Interval<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(interval) = self.candidates.next() {
            self.scanned += 1;
            if interval.start() > self.end {
                // Sorted by start: nothing after this can overlap
                self.candidates = self.candidates.as_slice()[..0].iter();
                return None;
            }
            if interval.end() >= self.start {
                return Some(interval);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.candidates.len()))
    }
}

impl<T> FusedIterator for Find<'_, T> {}

impl<T> FromIterator<Interval<T>> for OverlapIndex<T> {
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        let mut index = OverlapIndex::new();
        index.update(iter);
        index
    }
}

impl<T> Extend<Interval<T>> for OverlapIndex<T> {
    fn extend<I: IntoIterator<Item = Interval<T>>>(&mut self, iter: I) {
        self.update(iter);
    }
}

impl<T> IntoIterator for OverlapIndex<T> {
    type Item = Interval<T>;
    type IntoIter = std::vec::IntoIter<Interval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a OverlapIndex<T> {
    type Item = &'a Interval<T>;
    type IntoIter = slice::Iter<'a, Interval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
