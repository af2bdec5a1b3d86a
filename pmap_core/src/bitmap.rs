//! Presence-map transform for one fixed-size block.
//!
//! A block is rewritten as one entry per distinct byte value present, in
//! ascending value order: `[value:u8][bitmap:512 bytes]`, where bit `7 - (p % 8)`
//! of bitmap byte `p / 8` is set iff position `p` of the block holds `value`.
//! The entries' bitmaps partition the block's 4096 positions exactly. The
//! transform is stateless and performs no integrity checking of its own;
//! the decode driver verifies blocks by re-encoding them.

use crate::format::{BLOCK_SIZE, ENTRY_SIZE, MAP_BYTES};

/// Transform one block into its presence-map form.
///
/// Output length is `distinct_value_count * 513`. For high-entropy blocks
/// this exceeds the block size; the downstream compressor, not the
/// transform, is responsible for net size reduction on redundant data.
pub fn encode_block(block: &[u8; BLOCK_SIZE]) -> Vec<u8> {
    let mut present = [false; 256];
    for &b in block.iter() {
        present[b as usize] = true;
    }

    let distinct = present.iter().filter(|&&p| p).count();
    let mut out = Vec::with_capacity(distinct * ENTRY_SIZE);

    for v in 0..=255u8 {
        if !present[v as usize] {
            continue;
        }
        out.push(v);
        let map_start = out.len();
        out.resize(map_start + MAP_BYTES, 0);
        for (p, &b) in block.iter().enumerate() {
            if b == v {
                out[map_start + p / 8] |= 1 << (7 - p % 8);
            }
        }
    }
    out
}

/// Reconstruct a block from its presence-map form.
///
/// Entries are parsed in 513-byte strides; trailing bytes shorter than one
/// entry are ignored. Positions no entry covers stay zero — truncated or
/// malformed input is not an error here.
pub fn decode_block(data: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    for entry in data.chunks_exact(ENTRY_SIZE) {
        let value = entry[0];
        for (i, &map_byte) in entry[1..].iter().enumerate() {
            if map_byte == 0 {
                continue;
            }
            for bit in 0..8 {
                if map_byte & (1 << (7 - bit)) != 0 {
                    block[i * 8 + bit] = value;
                }
            }
        }
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned_block() -> [u8; BLOCK_SIZE] {
        let mut block = [0u8; BLOCK_SIZE];
        for (i, b) in block.iter_mut().enumerate() {
            *b = ((i * 7) % 13) as u8;
        }
        block
    }

    #[test]
    fn roundtrip_patterned_block() {
        let block = patterned_block();
        assert_eq!(decode_block(&encode_block(&block)), block);
    }

    #[test]
    fn roundtrip_all_distinct_values() {
        let mut block = [0u8; BLOCK_SIZE];
        for (i, b) in block.iter_mut().enumerate() {
            *b = (i % 256) as u8;
        }
        assert_eq!(decode_block(&encode_block(&block)), block);
    }

    #[test]
    fn encode_is_deterministic() {
        let block = patterned_block();
        assert_eq!(encode_block(&block), encode_block(&block));
    }

    #[test]
    fn uniform_block_is_one_entry() {
        let block = [0u8; BLOCK_SIZE];
        let encoded = encode_block(&block);
        assert_eq!(encoded.len(), ENTRY_SIZE);
        assert_eq!(encoded[0], 0);
        // every position belongs to value 0
        assert!(encoded[1..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn size_law_k_distinct_values() {
        let mut block = [0u8; BLOCK_SIZE];
        for (i, b) in block.iter_mut().enumerate() {
            *b = (i % 5) as u8; // exactly 5 distinct values
        }
        assert_eq!(encode_block(&block).len(), 5 * ENTRY_SIZE);
    }

    #[test]
    fn entries_are_sorted_ascending_by_value() {
        let mut block = [0u8; BLOCK_SIZE];
        block[0] = 200;
        block[1] = 3;
        block[2] = 77;
        let encoded = encode_block(&block);
        let values: Vec<u8> = encoded.chunks_exact(ENTRY_SIZE).map(|e| e[0]).collect();
        assert_eq!(values, vec![0, 3, 77, 200]);
    }

    #[test]
    fn bitmaps_partition_every_position_exactly_once() {
        let block = patterned_block();
        let encoded = encode_block(&block);
        let mut coverage = [0u32; BLOCK_SIZE];
        for entry in encoded.chunks_exact(ENTRY_SIZE) {
            for (i, &map_byte) in entry[1..].iter().enumerate() {
                for bit in 0..8 {
                    if map_byte & (1 << (7 - bit)) != 0 {
                        coverage[i * 8 + bit] += 1;
                    }
                }
            }
        }
        assert!(coverage.iter().all(|&c| c == 1));
    }

    #[test]
    fn truncated_input_leaves_uncovered_positions_zero() {
        let mut block = [7u8; BLOCK_SIZE];
        block[0] = 1; // two entries: value 1, value 7
        let encoded = encode_block(&block);
        assert_eq!(encoded.len(), 2 * ENTRY_SIZE);
        // drop the second entry's final byte: it no longer parses
        let decoded = decode_block(&encoded[..2 * ENTRY_SIZE - 1]);
        assert_eq!(decoded[0], 1);
        assert!(decoded[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_input_decodes_to_zero_block() {
        assert_eq!(decode_block(&[]), [0u8; BLOCK_SIZE]);
    }
}
