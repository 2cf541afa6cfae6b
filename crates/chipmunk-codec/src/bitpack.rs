//! Bit-level packing of polynomial coefficients (`# 4.7`): "`N` coefficients,
//! each packed into `ceil(log2(q))` bits, concatenated and zero-padded to a
//! whole byte." Big-endian: the first coefficient's high bit lands in the
//! first output byte's high bit, and bits are written most-significant-first
//! throughout.

/// Number of bits needed to represent any value in `[0, q)`.
#[must_use]
pub fn bits_per_coeff(q: u32) -> u32 {
    32u32.saturating_sub((q.saturating_sub(1)).leading_zeros())
}

/// Byte length of a packed polynomial of `n` coefficients at `bits` bits each.
#[must_use]
pub fn packed_len(n: usize, bits: u32) -> usize {
    let total_bits = n.saturating_mul(bits as usize);
    total_bits.div_ceil(8)
}

/// Pack `coeffs` into a big-endian bitstream, `bits` bits per coefficient,
/// zero-padded to a whole byte.
///
/// # Panics
/// Panics (in debug builds) if any coefficient does not fit in `bits` bits.
#[must_use]
pub fn pack(coeffs: &[u32], bits: u32) -> Vec<u8> {
    debug_assert!(
        coeffs.iter().all(|&c| bits >= 32 || c < (1u32 << bits)),
        "coefficient exceeds bits_per_coeff width"
    );
    let mut out = vec![0u8; packed_len(coeffs.len(), bits)];
    let mut bit_cursor: usize = 0;
    for &coeff in coeffs {
        for shift in (0..bits).rev() {
            let bit = (coeff >> shift) & 1;
            let byte_index = bit_cursor / 8;
            let bit_in_byte = 7 - (bit_cursor % 8);
            if let Some(slot) = out.get_mut(byte_index) {
                *slot |= (bit as u8) << bit_in_byte;
            }
            bit_cursor = bit_cursor.saturating_add(1);
        }
    }
    out
}

/// Inverse of [`pack`]: unpack `n` coefficients of `bits` bits each from a
/// big-endian bitstream. Returns `None` if `bytes` is shorter than
/// [`packed_len`] requires.
#[must_use]
pub fn unpack(bytes: &[u8], n: usize, bits: u32) -> Option<Vec<u32>> {
    if bytes.len() < packed_len(n, bits) {
        return None;
    }
    let mut out = Vec::with_capacity(n);
    let mut bit_cursor: usize = 0;
    for _ in 0..n {
        let mut value: u32 = 0;
        for _ in 0..bits {
            let byte_index = bit_cursor / 8;
            let bit_in_byte = 7 - (bit_cursor % 8);
            let bit = (bytes.get(byte_index)? >> bit_in_byte) & 1;
            value = (value << 1) | u32::from(bit);
            bit_cursor = bit_cursor.saturating_add(1);
        }
        out.push(value);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_per_coeff_matches_known_modulus() {
        // q = 12289 needs ceil(log2(12289)) = 14 bits (2^13 = 8192 < 12289 <= 16384 = 2^14).
        assert_eq!(bits_per_coeff(12289), 14);
        assert_eq!(bits_per_coeff(2), 1);
        assert_eq!(bits_per_coeff(256), 8);
        assert_eq!(bits_per_coeff(257), 9);
    }

    #[test]
    fn pack_then_unpack_round_trips() {
        let bits = bits_per_coeff(12289);
        let coeffs: Vec<u32> = (0..64).map(|i| (i * 37) % 12289).collect();
        let packed = pack(&coeffs, bits);
        assert_eq!(packed.len(), packed_len(64, bits));
        let unpacked = unpack(&packed, 64, bits).expect("packed length matches");
        assert_eq!(unpacked, coeffs);
    }

    #[test]
    fn packed_len_rounds_up_to_whole_byte() {
        // 3 coefficients at 3 bits each = 9 bits -> 2 bytes.
        assert_eq!(packed_len(3, 3), 2);
        // 8 coefficients at 1 bit each = 8 bits -> 1 byte, exact.
        assert_eq!(packed_len(8, 1), 1);
    }

    #[test]
    fn unpack_rejects_truncated_input() {
        let bits = bits_per_coeff(12289);
        let coeffs: Vec<u32> = (0..4).map(|i| i * 100).collect();
        let mut packed = pack(&coeffs, bits);
        packed.pop();
        assert!(unpack(&packed, 4, bits).is_none());
    }

    #[test]
    fn all_zero_and_all_max_round_trip() {
        let bits = 14;
        let coeffs = vec![0u32, 12288, 0, 12288];
        let packed = pack(&coeffs, bits);
        let unpacked = unpack(&packed, 4, bits).expect("valid length");
        assert_eq!(unpacked, coeffs);
    }
}
