//! Little-endian bit-field read/write over a byte buffer.
//!
//! Bit `i` of a field starting at global position `p` lives in byte
//! `(p+i)/8`, bit `(p+i) mod 8` (LSB-first within the byte). Out-of-range
//! accesses are programmer errors and panic rather than silently returning
//! zero, unlike the legacy u128-based field helpers this replaces.

use bitvec::field::BitField;
use bitvec::order::Lsb0;
use bitvec::slice::BitSlice;

const MAX_FIELD_BITS: usize = 64;

fn check_bounds(buf_len_bytes: usize, start: usize, len: usize) {
    assert!(len > 0 && len <= MAX_FIELD_BITS, "bit field length {len} out of range 1..={MAX_FIELD_BITS}");
    assert!(
        start + len <= buf_len_bytes * 8,
        "bit range {}..{} out of bounds for a {}-byte buffer",
        start,
        start + len,
        buf_len_bytes
    );
}

/// Reads `len` bits starting at `start` and returns them as an unsigned integer.
pub fn get_bits(buf: &[u8], start: usize, len: usize) -> u64 {
    check_bounds(buf.len(), start, len);
    let bits = BitSlice::<u8, Lsb0>::from_slice(buf);
    bits[start..start + len].load_le::<u64>()
}

/// Writes the `len` least-significant bits of `value` starting at `start`.
pub fn set_bits(buf: &mut [u8], start: usize, len: usize, value: u64) {
    check_bounds(buf.len(), start, len);
    if len < MAX_FIELD_BITS {
        assert!(value < (1u64 << len), "value {value} does not fit in {len} bits");
    }
    let bits = BitSlice::<u8, Lsb0>::from_slice_mut(buf);
    bits[start..start + len].store_le(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_field_within_one_byte() {
        let mut buf = [0u8; 2];
        set_bits(&mut buf, 4, 4, 0b1011);
        assert_eq!(get_bits(&buf, 4, 4), 0b1011);
    }

    #[test]
    fn round_trips_a_field_crossing_byte_boundaries() {
        let mut buf = [0u8; 16];
        set_bits(&mut buf, 32, 64, 0x0123_4567_89AB_CDEF);
        assert_eq!(get_bits(&buf, 32, 64), 0x0123_4567_89AB_CDEF);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn panics_on_out_of_range_access() {
        let buf = [0u8; 2];
        get_bits(&buf, 12, 8);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn panics_when_value_overflows_field_width() {
        let mut buf = [0u8; 2];
        set_bits(&mut buf, 0, 3, 0b1000);
    }
}
