pub use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Splits a RGB565 pixel into its components.
#[inline]
pub const fn decode_565(pixel: u16) -> [u8; 3] {
    let r = (pixel & 0b1111_1000_0000_0000) >> 11;
    let g = (pixel & 0b0000_0111_1110_0000) >> 5;
    let b = pixel & 0b0000_0000_0001_1111;

    [r as u8, g as u8, b as u8]
}

/// Compose the 5-bit R, 6-bit G, and 5-bit B values into a RGB565 u16 pixel. Does not mask off
/// higher bits if they are set.
#[inline]
pub const fn encode_rgb565_unchecked([r, g, b]: [u8; 3]) -> u16 {
    ((r as u16) << 11) | ((g as u16) << 5) | (b as u16)
}

/// Converts an RGB888 pixel into an RGB565 pixel by truncating the low bits of each channel.
#[inline]
pub const fn rgb888_to_rgb565([r, g, b]: [u8; 3]) -> [u8; 3] {
    [r >> 3, g >> 2, b >> 3]
}

/// Converts an RGB565 pixel into an RGB888 pixel, mapping each component onto `0..=255` with
/// `round(v * 255 / max)`.
#[inline]
pub const fn rgb565_to_rgb888([r, g, b]: [u8; 3]) -> [u8; 3] {
    [expand_n::<5>(r), expand_n::<6>(g), expand_n::<5>(b)]
}

/// Expands an N-bit channel value to 8 bits, rounding to nearest.
///
/// `255 * v / max` never lands exactly on `.5` for `max` of 31 or 63, so adding `max / 2` before
/// the integer division is an exact round.
#[inline]
pub const fn expand_n<const N: u8>(v: u8) -> u8 {
    let max = (1u32 << N) - 1;
    ((v as u32 * 255 + max / 2) / max) as u8
}

/// Rounds a float channel value and clamps it into `0..=255`.
#[inline]
pub(crate) fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_matches_rounded_division() {
        for v in 0..32u8 {
            let expected = (f64::from(v) * 255.0 / 31.0).round() as u8;
            assert_eq!(expand_n::<5>(v), expected, "5-bit value {v}");
        }
        for v in 0..64u8 {
            let expected = (f64::from(v) * 255.0 / 63.0).round() as u8;
            assert_eq!(expand_n::<6>(v), expected, "6-bit value {v}");
        }
    }

    #[test]
    fn pack_unpack_components() {
        let pixel = encode_rgb565_unchecked([31, 63, 31]);
        assert_eq!(pixel, 0xFFFF);
        assert_eq!(decode_565(0xF800), [31, 0, 0]);
        assert_eq!(decode_565(0x07E0), [0, 63, 0]);
        assert_eq!(decode_565(0x001F), [0, 0, 31]);
    }

    #[test]
    fn truncating_quantization() {
        assert_eq!(rgb888_to_rgb565([248, 252, 255]), [31, 63, 31]);
        assert_eq!(rgb888_to_rgb565([7, 3, 7]), [0, 0, 0]);
        assert_eq!(rgb565_to_rgb888([31, 63, 31]), [255, 255, 255]);
    }

    #[test]
    fn clamp_rounds_and_saturates() {
        assert_eq!(clamp_u8(-4.0), 0);
        assert_eq!(clamp_u8(254.6), 255);
        assert_eq!(clamp_u8(300.0), 255);
        assert_eq!(clamp_u8(12.4), 12);
    }
}
