//! Bit reservoir for DEFLATE-style decoders.
//!
//! The reservoir turns a sequence of caller-supplied byte chunks into a stream
//! of 1 to 16 bit codes, LSB first, and also exposes a byte-aligned bulk copy
//! for stored blocks.
//!
//! ## Architecture
//!
//! ```text
//! caller chunk ──set_input──► ByteWindow ──2 bytes──► accumulator (≤31 bits)
//!                                 │                        │
//!                                 └──────copy_bytes◄───────┘
//! ```
//!
//! ## Usage contract
//!
//! The reservoir is tuned for an inflater's inner loop and trusts its caller:
//!
//! - **Peek before drop.** [`BitReservoir::drop_bits`] may only drop bits that
//!   a previous successful [`BitReservoir::peek_bits`] made available.
//! - **Peek at most 16 bits.** A refill adds exactly 16 bits, once per call.
//! - **Drain before refilling.** [`BitReservoir::set_input`] is only accepted
//!   once [`BitReservoir::is_needing_input`] is true.
//!
//! Running out of data is ordinary control flow: bit reads return `None` and
//! [`BitReservoir::copy_bytes`] returns a short count.

mod window;


pub use window::ByteWindow;

use crate::error::{check_range, ReservoirError, Result};

/// Largest number of valid bits the accumulator ever holds.
pub const MAX_BUFFERED_BITS: u32 = 31;

/// Largest bit count accepted by [`BitReservoir::peek_bits`] and
/// [`BitReservoir::get_bits`].
pub const MAX_PEEK_BITS: u32 = 16;

/// Bit-level input buffer over borrowed byte chunks.
///
/// The low `bits_in_buffer` bits of the accumulator hold bits that have been
/// folded in from the window but not yet consumed; every higher bit is zero.
///
/// # Example
///
/// ```rust
/// use bit_reservoir::BitReservoir;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05];
/// let mut reservoir = BitReservoir::new();
/// reservoir.set_input(&data, 0, data.len()).unwrap();
///
/// assert_eq!(reservoir.get_bits(8), Some(0x01));
/// assert_eq!(reservoir.get_bits(16), Some(0x0302));
/// ```
#[derive(Debug, Default)]
pub struct BitReservoir<'a> {
    window: ByteWindow<'a>,
    /// Pending bits, LSB is the next bit of the stream
    buffer: u32,
    /// Number of valid bits in `buffer`
    bits_in_buffer: u32,
}

impl<'a> BitReservoir<'a> {
    /// Create an empty reservoir with no input.
    pub const fn new() -> Self {
        Self {
            window: ByteWindow::empty(),
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Look at the next `bit_count` bits without consuming them.
    ///
    /// `bit_count` must be in `1..=16`; this is only checked in debug builds.
    /// Returns `None` if fewer than `bit_count` bits are buffered and the
    /// window is empty, in which case nothing changes.
    ///
    /// # Side effects
    ///
    /// Despite its name this is not a pure accessor. When the accumulator is
    /// short it folds two window bytes into it, advancing the window cursor
    /// and raising [`available_bits`](Self::available_bits) by 16. The value
    /// of the stream is unchanged by this, but [`window`](Self::window) and
    /// [`is_needing_input`](Self::is_needing_input) may differ afterwards.
    ///
    /// After a successful peek of `n` bits the caller should drop at least
    /// `n - 8` of them before peeking again, so the accumulator never needs
    /// more than one refill per call.
    #[inline(always)]
    pub fn peek_bits(&mut self, bit_count: u32) -> Option<u32> {
        debug_assert!(
            (1..=MAX_PEEK_BITS).contains(&bit_count),
            "bit_count {} outside 1..=16",
            bit_count
        );
        if self.bits_in_buffer < bit_count {
            let pair = self.window.take_pair()?;
            self.buffer |= pair << self.bits_in_buffer;
            self.bits_in_buffer += 16;
        }
        Some(self.buffer & ((1 << bit_count) - 1))
    }

    /// Discard the next `bit_count` bits.
    ///
    /// The bits must have been made available by a prior successful
    /// [`peek_bits`](Self::peek_bits) of at least `bit_count`. This is not
    /// checked in release builds.
    #[inline(always)]
    pub fn drop_bits(&mut self, bit_count: u32) {
        debug_assert!(
            bit_count <= self.bits_in_buffer,
            "dropping {} bits with only {} buffered",
            bit_count,
            self.bits_in_buffer
        );
        self.buffer >>= bit_count;
        self.bits_in_buffer -= bit_count;
    }

    /// Read and consume the next `bit_count` bits.
    ///
    /// Equivalent to [`peek_bits`](Self::peek_bits) followed by
    /// [`drop_bits`](Self::drop_bits), except that nothing is consumed when
    /// the peek returns `None`.
    #[inline(always)]
    pub fn get_bits(&mut self, bit_count: u32) -> Option<u32> {
        let bits = self.peek_bits(bit_count)?;
        self.drop_bits(bit_count);
        Some(bits)
    }

    /// Number of bits currently held in the accumulator (0 to 31).
    ///
    /// Only a complete count of what is left once a previous
    /// [`peek_bits`](Self::peek_bits) has returned `None`; before that the
    /// window may still hold unfolded bytes.
    #[inline]
    pub fn available_bits(&self) -> u32 {
        self.bits_in_buffer
    }

    /// Unread window bytes plus whole bytes still in the accumulator.
    #[inline]
    pub fn available_bytes(&self) -> usize {
        self.window.len() + (self.bits_in_buffer >> 3) as usize
    }

    /// Every bit the reservoir can still produce without more input.
    #[inline]
    pub fn total_available_bits(&self) -> usize {
        self.window.len() * 8 + self.bits_in_buffer as usize
    }

    /// Discard the bits left over from a partially consumed byte.
    ///
    /// Those bits are format padding in front of a stored block and are thrown
    /// away, never reinterpreted.
    #[inline]
    pub fn skip_to_byte_boundary(&mut self) {
        self.buffer >>= self.bits_in_buffer & 7;
        self.bits_in_buffer &= !7;
    }

    /// True when every raw byte of the current window has been consumed.
    ///
    /// Bits may still be buffered. Once this returns true,
    /// [`set_input`](Self::set_input) may be called.
    #[inline]
    pub fn is_needing_input(&self) -> bool {
        self.window.is_empty()
    }

    /// The unread part of the current input chunk.
    pub fn window(&self) -> &ByteWindow<'a> {
        &self.window
    }

    /// Copy byte-aligned data into `output[offset..offset + length]`.
    ///
    /// Whole bytes still in the accumulator come first, then bytes straight
    /// from the window. Returns how many bytes were written, which is less
    /// than `length` when the reservoir runs dry. A `length` of zero is
    /// allowed.
    ///
    /// # Errors
    ///
    /// - [`ReservoirError::InvalidState`] if the reservoir is not on a byte
    ///   boundary; call [`skip_to_byte_boundary`](Self::skip_to_byte_boundary)
    ///   first. Nothing is written.
    /// - [`ReservoirError::OutOfRange`] if the range does not fit `output`.
    pub fn copy_bytes(&mut self, output: &mut [u8], offset: usize, length: usize) -> Result<usize> {
        if self.bits_in_buffer & 7 != 0 {
            lwarn!(
                "copy_bytes: {} buffered bits are not byte aligned",
                self.bits_in_buffer
            );
            return Err(ReservoirError::InvalidState("bit buffer is not byte aligned"));
        }
        let end = check_range("length", offset, length, output.len())?;
        let out = &mut output[offset..end];

        let mut count = 0;
        while self.bits_in_buffer > 0 && count < out.len() {
            out[count] = self.buffer as u8;
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
            count += 1;
        }
        if count == out.len() {
            return Ok(count);
        }

        debug_assert_eq!(self.bits_in_buffer, 0);
        count += self.window.copy_into(&mut out[count..]);

        if self.window.len() & 1 != 0 {
            // Restore the even window for the next two-byte refill
            if let Some(byte) = self.window.take_byte() {
                self.buffer = u32::from(byte);
                self.bits_in_buffer = 8;
            }
        }

        ltrace!(
            "copy_bytes: {} of {} bytes, {} left in window",
            count,
            length,
            self.window.len()
        );
        Ok(count)
    }

    /// Return to the empty state, releasing the borrowed window.
    pub fn reset(&mut self) {
        ldebug!(
            "reset: discarding {} bits and {} window bytes",
            self.bits_in_buffer,
            self.window.len()
        );
        self.buffer = 0;
        self.bits_in_buffer = 0;
        self.window = ByteWindow::empty();
    }

    /// Supply the next input chunk, `buffer[offset..offset + count]`.
    ///
    /// Buffered bits from the previous chunk are kept. If `count` is odd the
    /// first byte is folded straight into the accumulator so the window always
    /// holds an even number of bytes.
    ///
    /// # Errors
    ///
    /// - [`ReservoirError::InvalidState`] if the previous window is not drained
    ///   (checked before anything else), or if `count` is odd while more than
    ///   23 bits are buffered, since the extra byte would not fit.
    /// - [`ReservoirError::OutOfRange`] if the range does not fit `buffer`.
    ///
    /// On error the reservoir is left untouched.
    pub fn set_input(&mut self, buffer: &'a [u8], offset: usize, count: usize) -> Result<()> {
        if !self.window.is_empty() {
            lwarn!(
                "set_input: {} bytes of the previous input are unread",
                self.window.len()
            );
            return Err(ReservoirError::InvalidState(
                "old input was not completely processed",
            ));
        }
        let end = check_range("count", offset, count, buffer.len())?;

        let mut start = offset;
        if count & 1 != 0 {
            if self.bits_in_buffer > MAX_BUFFERED_BITS - 8 {
                lwarn!(
                    "set_input: odd chunk with {} bits already buffered",
                    self.bits_in_buffer
                );
                return Err(ReservoirError::InvalidState(
                    "bit buffer too full to fold an odd input byte",
                ));
            }
            self.buffer |= u32::from(buffer[start]) << self.bits_in_buffer;
            self.bits_in_buffer += 8;
            start += 1;
        }

        ltrace!(
            "set_input: {} bytes at offset {}, {} bits buffered",
            count,
            offset,
            self.bits_in_buffer
        );
        self.window.load(buffer, start, end);
        Ok(())
    }

    /// Supply a whole slice as the next input chunk.
    ///
    /// Shorthand for `set_input(buffer, 0, buffer.len())`.
    pub fn set_input_slice(&mut self, buffer: &'a [u8]) -> Result<()> {
        self.set_input(buffer, 0, buffer.len())
    }
}
