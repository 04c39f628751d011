//! Bit-level input reservoir for DEFLATE-style decoders.
//!
//! Feeds an inflater's inner loop with 1 to 16 bit codes read LSB first from a
//! sequence of borrowed input chunks, and copies byte-aligned stored blocks
//! straight out of the input.
//!
//! ## Features
//! - Core library has **zero dependencies** and never allocates
//! - `logging` - Cold-path diagnostics through the `log` crate
//!
//! ## Example
//!
//! ```rust
//! use bit_reservoir::BitReservoir;
//!
//! // A final stored block: BFINAL=1, BTYPE=00, then LEN/NLEN and the payload
//! let block = [0x01, 0x03, 0x00, 0xFC, 0xFF, b'a', b'b', b'c'];
//!
//! let mut input = BitReservoir::new();
//! input.set_input(&block, 0, block.len()).unwrap();
//!
//! assert_eq!(input.get_bits(1), Some(1));
//! assert_eq!(input.get_bits(2), Some(0));
//! input.skip_to_byte_boundary();
//!
//! let len = input.get_bits(16).unwrap();
//! let nlen = input.get_bits(16).unwrap();
//! assert_eq!(len, !nlen & 0xFFFF);
//!
//! let mut out = [0u8; 3];
//! assert_eq!(input.copy_bytes(&mut out, 0, len as usize).unwrap(), 3);
//! assert_eq!(&out, b"abc");
//! ```

#[macro_use]
mod log;

pub mod error;
pub mod reservoir;

pub use error::{ReservoirError, Result};
pub use reservoir::{BitReservoir, ByteWindow, MAX_BUFFERED_BITS, MAX_PEEK_BITS};
