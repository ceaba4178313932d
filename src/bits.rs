/// Returns the `width`-bit field of `value` starting `offset` bits from the
/// least significant end.
///
/// Total for any `offset + width <= 16`; the mask is computed in 32 bits so
/// that a full-width extract doesn't overflow.
pub fn extract(value: u16, offset: u8, width: u8) -> u16 {
    ((u32::from(value) >> offset) & ((1 << width) - 1)) as u16
}

#[cfg(test)]
mod test_bits {
    use super::*;

    #[test]
    fn test_extract_low_nibble() {
        assert_eq!(extract(0xABCD, 0, 4), 0xD);
    }

    #[test]
    fn test_extract_mid_field() {
        assert_eq!(extract(0xABCD, 4, 8), 0xBC);
    }

    #[test]
    fn test_extract_high_nibble() {
        assert_eq!(extract(0xABCD, 12, 4), 0xA);
    }

    #[test]
    fn test_extract_single_bit() {
        assert_eq!(extract(0b1000_0000, 7, 1), 1);
        assert_eq!(extract(0b0111_1111, 7, 1), 0);
    }

    #[test]
    fn test_extract_full_width() {
        assert_eq!(extract(0xABCD, 0, 16), 0xABCD);
    }
}
