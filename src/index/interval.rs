//! Interval records and the closed-closed overlap rule.

use std::fmt;

use crate::error::IntervalError;

/// Check whether `[s1, e1]` and `[s2, e2]` overlap.
///
/// Both ranges are closed, so ranges that share only an endpoint overlap.
#[inline]
pub fn overlaps(s1: i64, e1: i64, s2: i64, e2: i64) -> bool {
    s1 <= e2 && s2 <= e1
}

/// A `[start, end]` range carrying a caller payload.
///
/// Records are ordered by `(start, end)` only; the payload never takes part
/// in ordering.
#[derive(Debug, Clone)]
pub struct Interval<T> {
    start: i64,
    end: i64,
    data: T,
}

impl<T> Interval<T> {
    /// Create a new interval, rejecting `start > end`.
    pub fn new(start: i64, end: i64, data: T) -> Result<Self, IntervalError> {
        if start > end {
            return Err(IntervalError::Inverted { start, end });
        }
        Ok(Interval { start, end, data })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consume the interval and return its payload.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Get `end - start`. Zero-width intervals have width 0.
    ///
    /// Unsigned so the full `i64` range fits.
    pub fn width(&self) -> u64 {
        self.end.abs_diff(self.start)
    }

    /// Sort key.
    pub fn key(&self) -> (i64, i64) {
        (self.start, self.end)
    }

    /// Check whether this interval overlaps `[start, end]`.
    #[inline]
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        overlaps(self.start, self.end, start, end)
    }

    /// Gap between this interval and `[start, end]`; 0 when they overlap.
    pub fn distance(&self, start: i64, end: i64) -> u64 {
        if self.overlaps(start, end) {
            0
        } else if self.end < start {
            start.abs_diff(self.end)
        } else {
            self.start.abs_diff(end)
        }
    }
}

impl<T> TryFrom<(i64, i64, T)> for Interval<T> {
    type Error = IntervalError;

    fn try_from((start, end, data): (i64, i64, T)) -> Result<Self, Self::Error> {
        Interval::new(start, end, data)
    }
}

impl<T: fmt::Debug> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {:?})", self.start, self.end, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps_closed_endpoints() {
        assert!(overlaps(2, 4, 3, 5));
        assert!(overlaps(2, 4, 4, 5));
        assert!(overlaps(5, 6, 3, 5));
        assert!(overlaps(2, 200, 3, 5));
        assert!(overlaps(3, 5, 2, 200));
        assert!(!overlaps(2, 4, 5, 6));
        assert!(!overlaps(5, 6, 2, 4));
    }

    #[test]
    fn test_zero_width_query_touching() {
        let iv = Interval::new(2, 3, "hello").unwrap();
        assert!(iv.overlaps(2, 2));
        assert!(iv.overlaps(3, 3));
        assert!(!iv.overlaps(4, 4));
        assert!(!iv.overlaps(1, 1));
    }

    #[test]
    fn test_new_rejects_inverted() {
        let err = Interval::new(10, 5, ()).unwrap_err();
        assert_eq!(err, IntervalError::Inverted { start: 10, end: 5 });

        // Zero-width is fine
        assert!(Interval::new(5, 5, ()).is_ok());
    }

    #[test]
    fn test_try_from_tuple() {
        let iv: Interval<&str> = (20i64, 22i64, "hi").try_into().unwrap();
        assert_eq!(iv.key(), (20, 22));
        assert_eq!(*iv.data(), "hi");
        assert_eq!(iv.width(), 2);

        let bad: Result<Interval<()>, _> = (3i64, 1i64, ()).try_into();
        assert!(bad.is_err());
    }

    #[test]
    fn test_distance() {
        let iv = Interval::new(10, 20, ()).unwrap();
        assert_eq!(iv.distance(15, 30), 0);
        assert_eq!(iv.distance(20, 20), 0);
        assert_eq!(iv.distance(25, 30), 5);
        assert_eq!(iv.distance(1, 7), 3);

        let far = Interval::new(i64::MIN, i64::MIN, ()).unwrap();
        assert_eq!(far.distance(i64::MAX, i64::MAX), u64::MAX);
    }
}
