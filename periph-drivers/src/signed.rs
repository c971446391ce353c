//! Two's complement decoding of fixed-width register values

/// Interpret the low `width_bits` of `value` as a two's complement number
///
/// `value` must fit in `width_bits` (1-32). If bit `width_bits - 1` is set
/// the result is `value - 2^width_bits`, otherwise `value` itself.
pub const fn to_signed(value: u32, width_bits: u32) -> i64 {
    debug_assert!(width_bits >= 1 && width_bits <= 32);

    let sign_bit = 1u64 << (width_bits - 1);
    let value = value as u64;
    if value & sign_bit != 0 {
        value as i64 - (1i64 << width_bits)
    } else {
        value as i64
    }
}

/// Decode a little-endian 16-bit register pair
pub const fn i16_from_le(bytes: [u8; 2]) -> i16 {
    to_signed(u16::from_le_bytes(bytes) as u32, 16) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_values() {
        assert_eq!(to_signed(0x00FF, 16), 255);
        assert_eq!(to_signed(0xFF01, 16), -255);
        assert_eq!(to_signed(0x7FFF, 16), i16::MAX as i64);
        assert_eq!(to_signed(0x8000, 16), i16::MIN as i64);
        assert_eq!(to_signed(0xFFFF, 16), -1);
        assert_eq!(to_signed(0, 16), 0);
    }

    #[test]
    fn test_single_bit_width() {
        assert_eq!(to_signed(0, 1), 0);
        assert_eq!(to_signed(1, 1), -1);
    }

    #[test]
    fn test_full_width() {
        assert_eq!(to_signed(u32::MAX, 32), -1);
        assert_eq!(to_signed(0x8000_0000, 32), i32::MIN as i64);
        assert_eq!(to_signed(0x7FFF_FFFF, 32), i32::MAX as i64);
    }

    #[test]
    fn test_i16_from_le() {
        assert_eq!(i16_from_le([0xFF, 0x00]), 255);
        assert_eq!(i16_from_le([0x01, 0xFF]), -255);
    }

    proptest! {
        #[test]
        fn prop_matches_sign_bit(width in 1u32..=32, raw in any::<u32>()) {
            let value = if width == 32 { raw } else { raw & ((1u32 << width) - 1) };
            let decoded = to_signed(value, width);

            if value & (1u32 << (width - 1)) == 0 {
                prop_assert_eq!(decoded, value as i64);
            } else {
                prop_assert_eq!(decoded, value as i64 - (1i64 << width));
            }
        }

        #[test]
        fn prop_reencodes_to_raw(width in 1u32..=32, raw in any::<u32>()) {
            let value = if width == 32 { raw } else { raw & ((1u32 << width) - 1) };
            let modulus = 1i64 << width;

            prop_assert_eq!(to_signed(value, width).rem_euclid(modulus), value as i64);
        }

        #[test]
        fn prop_agrees_with_native_i16(raw in any::<u16>()) {
            prop_assert_eq!(to_signed(raw as u32, 16), raw as i16 as i64);
        }
    }
}
