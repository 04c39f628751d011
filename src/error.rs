//! Error types for the bit reservoir.
//!
//! This module provides the [`ReservoirError`] type. Every variant is a caller
//! contract violation; running out of data is never an error.
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | State | [`InvalidState`] | Operation not allowed in the current reservoir state |
//! | Arguments | [`OutOfRange`] | Offset/count pair does not fit the given buffer |
//!
//! Exhausted input is reported through the return values instead:
//! [`peek_bits`] and [`get_bits`] return `None`, and [`copy_bytes`] returns a
//! count smaller than requested.
//!
//! ## Example
//!
//! ```rust
//! use bit_reservoir::{BitReservoir, ReservoirError};
//!
//! let data = [0x12, 0x34, 0x56, 0x78];
//! let mut reservoir = BitReservoir::new();
//! reservoir.set_input(&data, 0, 4).unwrap();
//!
//! // The window is not drained yet, so new input is refused.
//! match reservoir.set_input(&data, 0, 2) {
//!     Err(ReservoirError::InvalidState(msg)) => println!("refused: {}", msg),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```
//!
//! [`InvalidState`]: ReservoirError::InvalidState
//! [`OutOfRange`]: ReservoirError::OutOfRange
//! [`peek_bits`]: crate::BitReservoir::peek_bits
//! [`get_bits`]: crate::BitReservoir::get_bits
//! [`copy_bytes`]: crate::BitReservoir::copy_bytes

use std::fmt;

/// Error type for reservoir operations.
///
/// Both variants indicate a bug in the caller. They are reported so the
/// decoder can fail cleanly, and are never retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservoirError {
    /// The operation is not valid in the current state.
    ///
    /// Raised when:
    /// - [`set_input`] is called before the previous window is drained
    /// - [`set_input`] would fold an odd byte into an accumulator that
    ///   already holds more than 23 bits
    /// - [`copy_bytes`] is called while the reservoir is not byte aligned
    ///
    /// [`set_input`]: crate::BitReservoir::set_input
    /// [`copy_bytes`]: crate::BitReservoir::copy_bytes
    InvalidState(&'static str),

    /// An `offset`/`count` pair does not describe a range inside a buffer.
    ///
    /// Covers both `offset + count` overflowing `usize` and the range ending
    /// past the buffer.
    OutOfRange {
        /// Name of the offending argument.
        param: &'static str,
        /// Requested start offset.
        offset: usize,
        /// Requested number of bytes.
        count: usize,
        /// Actual buffer length.
        len: usize,
    },
}

impl fmt::Display for ReservoirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState(msg) => write!(f, "Invalid reservoir state: {}", msg),
            Self::OutOfRange {
                param,
                offset,
                count,
                len,
            } => write!(
                f,
                "Argument out of range: {} (offset {} + count {} exceeds buffer length {})",
                param, offset, count, len
            ),
        }
    }
}

impl std::error::Error for ReservoirError {}

/// Result type for reservoir operations.
pub type Result<T> = std::result::Result<T, ReservoirError>;

/// Checks that `buf[offset..offset + count]` is a valid range.
pub(crate) fn check_range(
    param: &'static str,
    offset: usize,
    count: usize,
    len: usize,
) -> Result<usize> {
    // checked_add also catches wrap-around
    match offset.checked_add(count) {
        Some(end) if end <= len => Ok(end),
        _ => Err(ReservoirError::OutOfRange {
            param,
            offset,
            count,
            len,
        }),
    }
}
