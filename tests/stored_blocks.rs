//! Stored block decoding through the reservoir.
//!
//! A minimal raw DEFLATE reader that understands stored blocks and empty fixed
//! blocks, fed in small irregular chunks the way a streaming inflater would be.

use std::io::{Read, Write};

use bit_reservoir::BitReservoir;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

/// Chunk sizes cycled over when splitting compressed input.
const CHUNK_PATTERN: &[usize] = &[1, 7, 2, 0, 3, 64, 5, 4096, 11];

fn split<'a>(data: &'a [u8], pattern: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    for &size in pattern.iter().cycle() {
        if pos >= data.len() {
            break;
        }
        let end = (pos + size).min(data.len());
        chunks.push(&data[pos..end]);
        pos = end;
    }
    chunks
}

/// Reservoir plus the queue of chunks still to be supplied.
struct Feeder<'a> {
    input: BitReservoir<'a>,
    chunks: std::vec::IntoIter<&'a [u8]>,
}

impl<'a> Feeder<'a> {
    fn new(data: &'a [u8], pattern: &[usize]) -> Self {
        Self {
            input: BitReservoir::new(),
            chunks: split(data, pattern).into_iter(),
        }
    }

    fn feed(&mut self) -> bool {
        match self.chunks.next() {
            Some(chunk) => {
                assert!(self.input.is_needing_input());
                self.input.set_input_slice(chunk).unwrap();
                true
            }
            None => false,
        }
    }

    fn bits(&mut self, n: u32) -> Option<u32> {
        loop {
            if let Some(v) = self.input.get_bits(n) {
                return Some(v);
            }
            if !self.feed() {
                return None;
            }
        }
    }

    fn copy(&mut self, out: &mut [u8]) -> usize {
        let mut done = 0;
        while done < out.len() {
            let want = out.len() - done;
            done += self.input.copy_bytes(out, done, want).unwrap();
            if done < out.len() && !self.feed() {
                break;
            }
        }
        done
    }
}

fn inflate_stored(compressed: &[u8], pattern: &[usize]) -> Option<Vec<u8>> {
    let mut f = Feeder::new(compressed, pattern);
    let mut out = Vec::new();

    loop {
        let last = f.bits(1)? == 1;
        match f.bits(2)? {
            0 => {
                f.input.skip_to_byte_boundary();
                let len = f.bits(16)?;
                let nlen = f.bits(16)?;
                assert_eq!(len, !nlen & 0xFFFF, "LEN/NLEN mismatch");

                let start = out.len();
                out.resize(start + len as usize, 0);
                if f.copy(&mut out[start..]) != len as usize {
                    return None;
                }
            }
            // Fixed Huffman block holding only end-of-block (code 256, seven zero bits)
            1 => assert_eq!(f.bits(7)?, 0, "only empty fixed blocks are supported"),
            t => panic!("unsupported block type {}", t),
        }
        if last {
            break;
        }
    }
    Some(out)
}

fn stored_block(out: &mut Vec<u8>, last: bool, payload: &[u8]) {
    out.push(u8::from(last));
    let len = payload.len() as u16;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&(!len).to_le_bytes());
    out.extend_from_slice(payload);
}

#[test]
fn test_hand_built_stored_blocks() {
    let mut stream = Vec::new();
    stored_block(&mut stream, false, b"hello, ");
    stored_block(&mut stream, false, b"");
    stored_block(&mut stream, true, b"stored world");

    let patterns: [&[usize]; 5] = [&[1], &[2], &[3, 1], CHUNK_PATTERN, &[1000]];
    for pattern in patterns {
        let out = inflate_stored(&stream, pattern).expect("truncated");
        assert_eq!(out, b"hello, stored world");
    }

    // Sanity check the hand-built stream against a real inflater
    let mut check = Vec::new();
    DeflateDecoder::new(stream.as_slice())
        .read_to_end(&mut check)
        .unwrap();
    assert_eq!(check, b"hello, stored world");
}

#[test]
fn test_stored_block_after_unaligned_header() {
    // Empty fixed block (10 bits), then a final stored block starting at bit 10
    let mut stream = vec![0x02, 0x04];
    let payload = b"unaligned";
    let len = payload.len() as u16;
    stream.extend_from_slice(&len.to_le_bytes());
    stream.extend_from_slice(&(!len).to_le_bytes());
    stream.extend_from_slice(payload);

    let patterns: [&[usize]; 3] = [&[1], &[5], CHUNK_PATTERN];
    for pattern in patterns {
        let out = inflate_stored(&stream, pattern).expect("truncated");
        assert_eq!(out, payload);
    }

    let mut check = Vec::new();
    DeflateDecoder::new(stream.as_slice())
        .read_to_end(&mut check)
        .unwrap();
    assert_eq!(check, payload);
}

#[test]
fn test_truncated_stream_is_short_read() {
    let mut stream = Vec::new();
    stored_block(&mut stream, true, b"cut short");
    stream.truncate(stream.len() - 3);

    assert_eq!(inflate_stored(&stream, CHUNK_PATTERN), None);
}

#[test]
fn test_flate2_uncompressed_output() {
    // Longer than one stored block can hold (65535 bytes)
    let data: Vec<u8> = (0..150_000u32).map(|i| (i * 31 % 251) as u8).collect();

    let mut enc = DeflateEncoder::new(Vec::new(), Compression::none());
    enc.write_all(&data).unwrap();
    let compressed = enc.finish().unwrap();

    let patterns: [&[usize]; 3] = [CHUNK_PATTERN, &[65_537], &[3]];
    for pattern in patterns {
        let out = inflate_stored(&compressed, pattern).expect("truncated");
        assert_eq!(out.len(), data.len());
        assert_eq!(out, data);
    }
}
