//! Strong types for configuration values
//!
//! These types ensure configuration values are not confused with
//! blockchain values (block numbers, gas amounts, etc.).

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Maximum block range for a single `eth_getLogs` query
///
/// This prevents overloading RPC nodes with queries that are too large.
/// Different chains have different limits based on their RPC infrastructure.
///
/// Typical values:
/// - Conservative: 1000 blocks (the default events range, accepted everywhere)
/// - Moderate: 5000 blocks
/// - Generous: 10000 blocks (chains with robust RPC like Base)
///
/// # Examples
///
/// ```
/// use ethopt::MaxBlockRange;
///
/// let default = MaxBlockRange::DEFAULT;
/// assert_eq!(default.as_u64(), 1000);
///
/// let generous = MaxBlockRange::GENEROUS;
/// assert_eq!(generous.as_u64(), 10000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxBlockRange(u64);

impl MaxBlockRange {
    /// Default events range
    pub const DEFAULT: Self = Self(1000);

    /// Moderate range for chains with good RPC support
    pub const MODERATE: Self = Self(5000);

    /// For chains with generous RPC limits (e.g., Base)
    pub const GENEROUS: Self = Self(10000);

    /// Create a new max block range
    ///
    /// A zero width is representable but rejected by [`MaxBlockRange::partition`].
    pub const fn new(blocks: u64) -> Self {
        Self(blocks)
    }

    /// Get the inner u64 value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Calculate number of chunks needed to cover a range
    ///
    /// # Examples
    ///
    /// ```
    /// use ethopt::MaxBlockRange;
    ///
    /// let range = MaxBlockRange::new(1000);
    /// assert_eq!(range.chunks_needed(0, 2500), 3); // 0-999, 1000-1999, 2000-2500
    /// ```
    pub fn chunks_needed(&self, start: u64, end: u64) -> usize {
        if end < start || self.0 == 0 {
            return 0;
        }
        let total_blocks = (end - start).saturating_add(1);
        total_blocks.div_ceil(self.0) as usize
    }

    /// Split an inclusive block range into partitions of at most `self` blocks
    ///
    /// Partitions are contiguous and cover `[from_block, to_block]` exactly
    /// once. With `reverse` set the same partitions are yielded newest-first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBlockRange`] if `from_block > to_block` and
    /// [`ConfigError::ZeroSize`] for a zero width. Both are reported before any
    /// request is issued.
    ///
    /// # Examples
    ///
    /// ```
    /// use ethopt::{BlockRange, MaxBlockRange};
    ///
    /// let parts: Vec<_> = MaxBlockRange::new(1000).partition(0, 2500, false).unwrap().collect();
    /// assert_eq!(
    ///     parts,
    ///     vec![BlockRange::new(0, 999), BlockRange::new(1000, 1999), BlockRange::new(2000, 2500)]
    /// );
    /// ```
    pub fn partition(
        &self,
        from_block: u64,
        to_block: u64,
        reverse: bool,
    ) -> Result<ChunkIterator, ConfigError> {
        if self.0 == 0 {
            return Err(ConfigError::zero_size("range width"));
        }
        if from_block > to_block {
            return Err(ConfigError::invalid_block_range(from_block, to_block));
        }
        Ok(ChunkIterator {
            start: from_block,
            end: to_block,
            remaining: self.chunks_needed(from_block, to_block),
            chunk_size: self.0,
            reverse,
        })
    }
}

impl From<u64> for MaxBlockRange {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Default for MaxBlockRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for MaxBlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} blocks", self.0)
    }
}

/// An inclusive `{from_block, to_block}` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRange {
    /// First block (inclusive)
    pub from_block: u64,
    /// Last block (inclusive)
    pub to_block: u64,
}

impl BlockRange {
    /// Create a new block range. Callers are responsible for `from_block <= to_block`.
    pub const fn new(from_block: u64, to_block: u64) -> Self {
        Self {
            from_block,
            to_block,
        }
    }

    /// Number of blocks covered
    pub const fn len(&self) -> u64 {
        self.to_block - self.from_block + 1
    }

    /// Always false for a well-formed range
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Display for BlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from_block, self.to_block)
    }
}

/// Iterator over block range partitions
///
/// Created by [`MaxBlockRange::partition`]. Partitions are computed by index
/// from the range start, so a reversed scan yields exactly the forward
/// partitions in the opposite order (the short partition, if any, comes first).
#[derive(Debug, Clone)]
pub struct ChunkIterator {
    start: u64,
    end: u64,
    remaining: usize,
    chunk_size: u64,
    reverse: bool,
}

impl ChunkIterator {
    fn nth_forward(&self, index: usize) -> BlockRange {
        let from_block = self.start + index as u64 * self.chunk_size;
        let to_block = from_block.saturating_add(self.chunk_size - 1).min(self.end);
        BlockRange::new(from_block, to_block)
    }

    fn total(&self) -> usize {
        (self.end - self.start).saturating_add(1).div_ceil(self.chunk_size) as usize
    }
}

impl Iterator for ChunkIterator {
    type Item = BlockRange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let total = self.total();
        let index = if self.reverse {
            self.remaining - 1
        } else {
            total - self.remaining
        };
        self.remaining -= 1;
        Some(self.nth_forward(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ChunkIterator {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(width: u64, from: u64, to: u64, reverse: bool) -> Vec<(u64, u64)> {
        MaxBlockRange::new(width)
            .partition(from, to, reverse)
            .unwrap()
            .map(|r| (r.from_block, r.to_block))
            .collect()
    }

    #[test]
    fn test_max_block_range_constants() {
        assert_eq!(MaxBlockRange::DEFAULT.as_u64(), 1000);
        assert_eq!(MaxBlockRange::MODERATE.as_u64(), 5000);
        assert_eq!(MaxBlockRange::GENEROUS.as_u64(), 10000);
        assert_eq!(MaxBlockRange::default(), MaxBlockRange::DEFAULT);
    }

    #[test]
    fn test_chunks_needed() {
        let range = MaxBlockRange::new(1000);

        assert_eq!(range.chunks_needed(0, 999), 1);
        assert_eq!(range.chunks_needed(0, 1000), 2);
        assert_eq!(range.chunks_needed(0, 2500), 3);
        assert_eq!(range.chunks_needed(100, 50), 0);
        assert_eq!(range.chunks_needed(100, 100), 1);
        assert_eq!(MaxBlockRange::new(0).chunks_needed(0, 10), 0);
    }

    #[test]
    fn test_partition_partial_last_chunk() {
        assert_eq!(
            collect(1000, 0, 2500, false),
            vec![(0, 999), (1000, 1999), (2000, 2500)]
        );
    }

    #[test]
    fn test_partition_exact_multiple() {
        assert_eq!(
            collect(1000, 0, 2999, false),
            vec![(0, 999), (1000, 1999), (2000, 2999)]
        );
    }

    #[test]
    fn test_partition_single_block() {
        assert_eq!(collect(1000, 5, 5, false), vec![(5, 5)]);
        assert_eq!(collect(1000, 5, 5, true), vec![(5, 5)]);
    }

    #[test]
    fn test_partition_reverse_is_forward_reversed() {
        assert_eq!(
            collect(1000, 0, 2500, true),
            vec![(2000, 2500), (1000, 1999), (0, 999)]
        );
    }

    #[test]
    fn test_partition_rejects_inverted_range() {
        let err = MaxBlockRange::new(1000).partition(10, 5, false).unwrap_err();
        assert_eq!(err, ConfigError::invalid_block_range(10, 5));
    }

    #[test]
    fn test_partition_rejects_zero_width() {
        let err = MaxBlockRange::new(0).partition(0, 10, false).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroSize { .. }));
    }

    #[test]
    fn test_partition_near_u64_max() {
        assert_eq!(
            collect(10, u64::MAX - 14, u64::MAX, false),
            vec![(u64::MAX - 14, u64::MAX - 5), (u64::MAX - 4, u64::MAX)]
        );
    }

    #[test]
    fn test_chunk_iterator_size_hint() {
        let mut iter = MaxBlockRange::new(1000).partition(0, 2500, false).unwrap();

        assert_eq!(iter.size_hint(), (3, Some(3)));
        iter.next();
        assert_eq!(iter.size_hint(), (2, Some(2)));
        iter.next();
        iter.next();
        assert_eq!(iter.size_hint(), (0, Some(0)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_block_range_display_and_len() {
        let range = BlockRange::new(1000, 1999);
        assert_eq!(range.to_string(), "1000-1999");
        assert_eq!(range.len(), 1000);
    }

    #[test]
    fn test_block_range_serializes_camel_case() {
        let json = serde_json::to_value(BlockRange::new(1, 2)).unwrap();
        assert_eq!(json, serde_json::json!({"fromBlock": 1, "toBlock": 2}));
    }

    #[test]
    fn test_serialization() {
        let range = MaxBlockRange::new(2000);
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, "2000");
        let deserialized: MaxBlockRange = serde_json::from_str(&json).unwrap();
        assert_eq!(range, deserialized);
    }

    #[test]
    fn test_real_world_scenario() {
        // One day of Arbitrum blocks (≈7200 blocks per hour × 24 hours)
        let daily_blocks = 7200 * 24;
        let chunks = collect(5000, 1_000_000, 1_000_000 + daily_blocks, false);

        assert_eq!(chunks.len(), 35);
        assert_eq!(chunks[0].0, 1_000_000);
        assert_eq!(chunks[34].1, 1_000_000 + daily_blocks);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].1 + 1, pair[1].0);
        }
    }
}
