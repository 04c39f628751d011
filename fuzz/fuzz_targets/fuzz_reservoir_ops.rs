#![no_main]
use bit_reservoir::{BitReservoir, ReservoirError};
use libfuzzer_sys::fuzz_target;

fn stream_bits(data: &[u8], from: usize, n: u32) -> u32 {
    (0..n as usize).fold(0, |acc, k| {
        let i = from + k;
        acc | (u32::from((data[i / 8] >> (i % 8)) & 1) << k)
    })
}

fuzz_target!(|input: &[u8]| {
    // First half: operation script. Second half: the compressed stream.
    let (ops, data) = input.split_at(input.len() / 2);

    let mut reservoir = BitReservoir::new();
    let mut fed = 0usize;
    let mut pos = 0usize;
    let mut out = [0u8; 32];

    for &op in ops {
        let arg = (op >> 3) as usize;
        match op & 7 {
            0 | 1 => {
                let count = arg.min(data.len() - fed);
                let was_drained = reservoir.is_needing_input();
                match reservoir.set_input(data, fed, count) {
                    Ok(()) => fed += count,
                    Err(ReservoirError::InvalidState(_)) => {
                        assert!(!was_drained || (count % 2 == 1 && reservoir.available_bits() > 23));
                    }
                    Err(e) => panic!("{}", e),
                }
            }
            2 | 3 => {
                let n = 1 + (arg % 16) as u32;
                match reservoir.get_bits(n) {
                    Some(v) => {
                        assert_eq!(v, stream_bits(data, pos, n));
                        pos += n as usize;
                    }
                    None => assert!(fed * 8 - pos < n as usize),
                }
            }
            4 => {
                let n = 1 + (arg % 16) as u32;
                if let Some(v) = reservoir.peek_bits(n) {
                    assert_eq!(v, stream_bits(data, pos, n));
                    let k = 1 + (arg as u32 / 16) % n;
                    reservoir.drop_bits(k);
                    pos += k as usize;
                }
            }
            5 => {
                reservoir.skip_to_byte_boundary();
                pos += (fed * 8 - pos) % 8;
            }
            6 => {
                let len = arg.min(out.len());
                match reservoir.copy_bytes(&mut out, 0, len) {
                    Ok(n) => {
                        assert_eq!(&out[..n], &data[pos / 8..pos / 8 + n]);
                        pos += n * 8;
                    }
                    Err(_) => assert_ne!(reservoir.available_bits() % 8, 0),
                }
            }
            _ => {
                reservoir.reset();
                // Restart the stream at the next unfed byte
                pos = fed * 8;
            }
        }

        assert!(reservoir.available_bits() <= bit_reservoir::MAX_BUFFERED_BITS);
        assert_eq!(reservoir.window().len() % 2, 0);
        assert_eq!(reservoir.total_available_bits(), fed * 8 - pos);
        assert_eq!(
            reservoir.available_bytes() == 0,
            reservoir.is_needing_input() && reservoir.available_bits() < 8
        );
    }
});
