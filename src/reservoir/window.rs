//! Borrowed byte window feeding the reservoir.
//!
//! The window tracks the unread span of the caller's current input chunk. Its
//! length must be even whenever the reservoir refills from it, because a
//! refill always takes exactly two bytes. Only [`ByteWindow::load`] and the
//! single-byte [`ByteWindow::take_byte`] can change that parity.

/// Unread span `data[start..end]` of the caller's input buffer.
#[derive(Clone, Copy, Default)]
pub struct ByteWindow<'a> {
    data: &'a [u8],
    start: usize,
    end: usize,
}

impl<'a> ByteWindow<'a> {
    /// An empty window borrowing nothing.
    pub const fn empty() -> Self {
        Self {
            data: &[],
            start: 0,
            end: 0,
        }
    }

    /// Replace the window with `data[start..end]`.
    ///
    /// The caller has already range-checked the bounds and folded the odd
    /// leading byte, so the new span is even.
    pub(crate) fn load(&mut self, data: &'a [u8], start: usize, end: usize) {
        debug_assert!(start <= end && end <= data.len());
        debug_assert!((end - start) & 1 == 0, "window must hold an even byte count");
        self.data = data;
        self.start = start;
        self.end = end;
    }

    /// Number of unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when every byte of the window has been consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The unread bytes.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.start..self.end]
    }

    /// Start cursor into the borrowed buffer.
    pub fn start(&self) -> usize {
        self.start
    }

    /// End cursor into the borrowed buffer.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Take the next two bytes as a little-endian 16-bit value.
    ///
    /// Returns `None` if the window is empty. An even window never holds a
    /// single byte, so a non-empty window always has a full pair.
    #[inline(always)]
    pub(crate) fn take_pair(&mut self) -> Option<u32> {
        if self.start == self.end {
            return None;
        }
        debug_assert!(self.len() >= 2, "odd window during two-byte refill");
        let pair = u16::from_le_bytes([self.data[self.start], self.data[self.start + 1]]);
        self.start += 2;
        Some(u32::from(pair))
    }

    /// Take a single byte, flipping the window parity.
    #[inline]
    pub(crate) fn take_byte(&mut self) -> Option<u8> {
        if self.start == self.end {
            return None;
        }
        let byte = self.data[self.start];
        self.start += 1;
        Some(byte)
    }

    /// Copy up to `out.len()` bytes into `out`, returning how many were copied.
    pub(crate) fn copy_into(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.len());
        out[..n].copy_from_slice(&self.data[self.start..self.start + n]);
        self.start += n;
        n
    }
}

impl std::fmt::Debug for ByteWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteWindow")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("buffer_len", &self.data.len())
            .finish()
    }
}
