//! Gamma correction for WS281x LEDs
//!
//! Maps a linear 0–255 channel value to the value that looks linear on a
//! NeoPixel-style LED (gamma ≈ 2.8).

use voxel_hal::Rgb;

/// Gamma lookup table, indexed by linear channel value
#[rustfmt::skip]
pub static GAMMA8: [u8; 256] = [
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   1,   1,   1,   1,
      1,   1,   1,   1,   1,   1,   1,   1,   1,   2,   2,   2,   2,   2,   2,   2,
      2,   3,   3,   3,   3,   3,   3,   3,   4,   4,   4,   4,   4,   5,   5,   5,
      5,   6,   6,   6,   6,   7,   7,   7,   7,   8,   8,   8,   9,   9,   9,  10,
     10,  10,  11,  11,  11,  12,  12,  13,  13,  13,  14,  14,  15,  15,  16,  16,
     17,  17,  18,  18,  19,  19,  20,  20,  21,  21,  22,  22,  23,  24,  24,  25,
     25,  26,  27,  27,  28,  29,  29,  30,  31,  32,  32,  33,  34,  35,  35,  36,
     37,  38,  39,  39,  40,  41,  42,  43,  44,  45,  46,  47,  48,  49,  50,  50,
     51,  52,  54,  55,  56,  57,  58,  59,  60,  61,  62,  63,  64,  66,  67,  68,
     69,  70,  72,  73,  74,  75,  77,  78,  79,  81,  82,  83,  85,  86,  87,  89,
     90,  92,  93,  95,  96,  98,  99, 101, 102, 104, 105, 107, 109, 110, 112, 114,
    115, 117, 119, 120, 122, 124, 126, 127, 129, 131, 133, 135, 137, 138, 140, 142,
    144, 146, 148, 150, 152, 154, 156, 158, 160, 162, 164, 167, 169, 171, 173, 175,
    177, 180, 182, 184, 186, 189, 191, 193, 196, 198, 200, 203, 205, 208, 210, 213,
    215, 218, 220, 223, 225, 228, 231, 233, 236, 239, 241, 244, 247, 249, 252, 255,
];

/// Correct one channel value
#[inline]
pub fn gamma8(value: u8) -> u8 {
    GAMMA8[value as usize]
}

/// Correct every channel of a colour
#[inline]
pub fn gamma_correct(color: Rgb) -> Rgb {
    Rgb::new(gamma8(color.r), gamma8(color.g), gamma8(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(gamma8(0), 0);
        assert_eq!(gamma8(255), 255);
    }

    #[test]
    fn test_monotonic() {
        for pair in GAMMA8.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_correct_rgb() {
        let out = gamma_correct(Rgb::new(255, 128, 0));
        assert_eq!(out, Rgb::new(255, GAMMA8[128], 0));
        assert_eq!(out.g, 37);
    }
}
