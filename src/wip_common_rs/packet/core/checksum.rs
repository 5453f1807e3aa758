//! Checksum-12: a 12-bit ones-complement folded sum protecting a whole packet.

use super::bitcodec;

/// Bit offset of the 12-bit checksum field within the fixed header.
pub const CHECKSUM_BIT_START: usize = 116;
pub const CHECKSUM_BIT_LEN: usize = 12;

/// Sums every byte into a 32-bit accumulator, folds down to 12 bits, and
/// complements. The checksum field itself must already be zeroed in `data`.
pub fn calc_checksum12(data: &[u8]) -> u16 {
    let mut total: u32 = data.iter().map(|&b| b as u32).sum();
    while total >> 12 != 0 {
        total = (total & 0xFFF) + (total >> 12);
    }
    (!total & 0xFFF) as u16
}

/// Zeroes the checksum field, computes Checksum-12 over the whole buffer,
/// and writes it back into bits 116..127.
pub fn embed_checksum12(buf: &mut [u8]) {
    bitcodec::set_bits(buf, CHECKSUM_BIT_START, CHECKSUM_BIT_LEN, 0);
    let sum = calc_checksum12(buf);
    bitcodec::set_bits(buf, CHECKSUM_BIT_START, CHECKSUM_BIT_LEN, sum as u64);
}

/// Recomputes Checksum-12 over `buf` with the stored checksum bits cleared
/// and compares against what was stored.
pub fn verify_checksum12(buf: &[u8]) -> bool {
    let stored = bitcodec::get_bits(buf, CHECKSUM_BIT_START, CHECKSUM_BIT_LEN) as u16;
    let mut cleared = buf.to_vec();
    bitcodec::set_bits(&mut cleared, CHECKSUM_BIT_START, CHECKSUM_BIT_LEN, 0);
    calc_checksum12(&cleared) == stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_checksums_to_all_ones() {
        assert_eq!(calc_checksum12(&[]), 0xFFF);
    }

    #[test]
    fn embed_then_verify_round_trips() {
        let mut buf = vec![0u8; 16];
        buf[0] = 0x11;
        buf[5] = 0xAB;
        embed_checksum12(&mut buf);
        assert!(verify_checksum12(&buf));
    }

    #[test]
    fn embed_covers_bytes_past_the_header() {
        let mut buf = vec![0u8; 40];
        buf[39] = 0xEF;
        buf[20] = 0x7A;
        embed_checksum12(&mut buf);
        assert!(verify_checksum12(&buf));
        buf[39] ^= 0x01;
        assert!(!verify_checksum12(&buf));
    }

    #[test]
    fn flipping_any_bit_breaks_verification() {
        let mut buf = vec![0u8; 20];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = i as u8;
        }
        embed_checksum12(&mut buf);
        for byte_idx in 0..buf.len() {
            for bit in 0..8u8 {
                let mut corrupted = buf.clone();
                corrupted[byte_idx] ^= 1 << bit;
                assert!(!verify_checksum12(&corrupted), "byte {byte_idx} bit {bit} should break checksum");
            }
        }
    }
}
