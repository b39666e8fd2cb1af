//! Error types for interval construction.

use thiserror::Error;

/// Raised when a record cannot be turned into a valid interval.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("invalid interval: start {start} is greater than end {end}")]
    Inverted { start: i64, end: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_message() {
        let err = IntervalError::Inverted { start: 10, end: 5 };
        assert_eq!(
            err.to_string(),
            "invalid interval: start 10 is greater than end 5"
        );
    }
}
