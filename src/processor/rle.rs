//! Byte-oriented run-length codec for collision grids.
//!
//! A run of `n > 1` equal cells becomes `0x80 | (n - 1)` followed by the
//! value, in chunks of at most 128. A lone cell is written as its value.
//! Decoding therefore reads any byte with the high bit set as a run tag, so
//! a lone literal `>= 0x80` cannot be told apart from one; such values are
//! emitted unchanged and reported.

use tracing::warn;

/// Longest run a single tag byte can describe.
pub const MAX_RUN: usize = 128;

const RUN_FLAG: u8 = 0x80;

pub fn encode(cells: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(cells.len());
    let mut i = 0;

    while i < cells.len() {
        let value = cells[i];
        let run = cells[i..].iter().take_while(|&&c| c == value).count();
        let byte = (value & 0xFF) as u8;

        if run == 1 {
            if byte & RUN_FLAG != 0 {
                warn!(index = i, value, "literal >= 0x80 reads back as a run tag");
            }
            out.push(byte);
        } else {
            let mut left = run;
            while left > 0 {
                let chunk = left.min(MAX_RUN);
                out.push(RUN_FLAG | (chunk - 1) as u8);
                out.push(byte);
                left -= chunk;
            }
        }
        i += run;
    }

    out
}

/// Inverse of [`encode`] for literals below `0x80`. A trailing tag with no
/// value byte is dropped.
pub fn decode(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied();

    while let Some(byte) = iter.next() {
        if byte & RUN_FLAG == 0 {
            out.push(byte);
            continue;
        }
        let Some(value) = iter.next() else {
            break;
        };
        let len = usize::from(byte & !RUN_FLAG) + 1;
        out.extend(std::iter::repeat_n(value, len));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widen(bytes: &[u8]) -> Vec<u32> {
        bytes.iter().map(|&b| u32::from(b)).collect()
    }

    #[test]
    fn test_run_then_literal() {
        assert_eq!(encode(&[3, 3, 3, 5]), vec![0x82, 3, 5]);
    }

    #[test]
    fn test_empty() {
        assert!(encode(&[]).is_empty());
        assert!(decode(&[]).is_empty());
    }

    #[test]
    fn test_pairs_and_singletons() {
        assert_eq!(encode(&[1, 2, 2, 1]), vec![1, 0x81, 2, 1]);
    }

    #[test]
    fn test_long_runs_are_chunked() {
        let cells = vec![7; 300];
        let encoded = encode(&cells);
        // 128 + 128 + 44
        assert_eq!(encoded, vec![0xFF, 7, 0xFF, 7, 0x80 | 43, 7]);
        assert_eq!(decode(&encoded), vec![7u8; 300]);
    }

    #[test]
    fn test_exact_chunk_boundary() {
        assert_eq!(encode(&[0; 128]), vec![0xFF, 0]);
        // a 129th cell becomes a run of one inside the same value, still tagged
        assert_eq!(encode(&[0; 129]), vec![0xFF, 0, 0x80, 0]);
    }

    #[test]
    fn test_values_are_masked_to_a_byte() {
        assert_eq!(encode(&[0x101, 0x101]), vec![0x81, 0x01]);
    }

    #[test]
    fn test_high_literal_is_kept_ambiguous() {
        assert_eq!(encode(&[0x90]), vec![0x90]);
    }

    #[test]
    fn test_round_trip() {
        let grids: [&[u8]; 4] = [
            &[0, 0, 0, 1, 2, 2, 0, 0],
            &[5],
            &[1, 2, 3, 4, 5, 6],
            &[127; 260],
        ];
        for grid in grids {
            let encoded = encode(&widen(grid));
            assert_eq!(decode(&encoded), grid.to_vec());

            let mut i = 0;
            while i < encoded.len() {
                if encoded[i] & RUN_FLAG != 0 {
                    let run = usize::from(encoded[i] & 0x7F) + 1;
                    assert!((1..=MAX_RUN).contains(&run));
                    i += 2;
                } else {
                    i += 1;
                }
            }
        }
    }

    #[test]
    fn test_pseudo_random_round_trip() {
        // xorshift keeps the sequence deterministic; runs come from the
        // small value range
        let mut state = 0x2545_F491_u32;
        let mut grid = Vec::with_capacity(4096);
        for _ in 0..4096 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            grid.push((state % 3) as u8);
        }
        assert_eq!(decode(&encode(&widen(&grid))), grid);
    }
}
