//! Block references and time primitives.

use std::cmp::Ordering;
use std::fmt;

/// Seconds since the Unix epoch.
pub type UnixTimestamp = u64;

/// A non-negative span of time in seconds.
pub type DurationSecs = u64;

/// A block identified by its number and timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef {
    /// Block number (height).
    pub number: u64,
    /// Block timestamp (seconds since epoch).
    pub timestamp: UnixTimestamp,
}

impl BlockRef {
    pub const fn new(number: u64, timestamp: UnixTimestamp) -> Self {
        Self { number, timestamp }
    }

    /// Returns `true` if `self` is at or before `other` on the same chain.
    ///
    /// Both the number and the timestamp must be non-decreasing.
    pub fn is_before_or_equal(&self, other: &BlockRef) -> bool {
        self.number <= other.number && self.timestamp <= other.timestamp
    }
}

impl Ord for BlockRef {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.timestamp, self.number).cmp(&(other.timestamp, other.number))
    }
}

impl PartialOrd for BlockRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {} @ {}", self.number, self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_timestamp_then_number() {
        let a = BlockRef::new(200, 1000);
        let b = BlockRef::new(100, 1000);
        let c = BlockRef::new(50, 1001);
        assert!(b < a);
        assert!(a < c);
    }

    #[test]
    fn before_or_equal_checks_both_fields() {
        let start = BlockRef::new(100, 1000);
        assert!(start.is_before_or_equal(&start));
        assert!(start.is_before_or_equal(&BlockRef::new(101, 1012)));
        // a higher number with an older timestamp is not ordered after `start`
        assert!(!BlockRef::new(101, 999).is_before_or_equal(&start));
        assert!(!start.is_before_or_equal(&BlockRef::new(99, 1012)));
    }
}
