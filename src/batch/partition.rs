//! Range partitioning for paginated queries

use std::ops::RangeInclusive;

use crate::config_types::{BlockRange, MaxBlockRange};
use crate::errors::ConfigError;

/// Split `[from_block, to_block]` into contiguous partitions of at most `width` blocks
///
/// With `reverse` set the partitions come newest-first; they are the same
/// partitions as the forward split, in the opposite order.
///
/// # Errors
///
/// [`ConfigError::InvalidBlockRange`] if `from_block > to_block`, and
/// [`ConfigError::ZeroSize`] if `width` is zero.
///
/// # Examples
///
/// ```rust
/// use ethopt::{partition_block_range, BlockRange};
///
/// assert_eq!(
///     partition_block_range(0, 2500, 1000, false).unwrap(),
///     vec![BlockRange::new(0, 999), BlockRange::new(1000, 1999), BlockRange::new(2000, 2500)]
/// );
/// assert_eq!(partition_block_range(5, 5, 1000, false).unwrap(), vec![BlockRange::new(5, 5)]);
/// assert!(partition_block_range(10, 5, 1000, false).is_err());
/// ```
pub fn partition_block_range(
    from_block: u64,
    to_block: u64,
    width: u64,
    reverse: bool,
) -> Result<Vec<BlockRange>, ConfigError> {
    Ok(MaxBlockRange::new(width)
        .partition(from_block, to_block, reverse)?
        .collect())
}

/// Split an inclusive index range the same way block ranges are split
///
/// # Errors
///
/// [`ConfigError::InvalidIndexRange`] if the range is empty, and
/// [`ConfigError::ZeroSize`] if `width` is zero.
pub fn partition_index_range(
    indices: &RangeInclusive<u64>,
    width: u64,
) -> Result<Vec<RangeInclusive<u64>>, ConfigError> {
    let (start, end) = (*indices.start(), *indices.end());
    if start > end {
        return Err(ConfigError::InvalidIndexRange { start, end });
    }
    Ok(MaxBlockRange::new(width)
        .partition(start, end, false)?
        .map(|range| range.from_block..=range.to_block)
        .collect())
}
