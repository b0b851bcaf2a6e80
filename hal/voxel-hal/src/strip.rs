//! LED strip output abstraction

/// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from the first three bytes of `bytes`
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [r, g, b, ..] => Some(Self::new(*r, *g, *b)),
            _ => None,
        }
    }
}

/// Addressable LED strip driver
///
/// Pixels are addressed by a flat index across every strip the driver owns.
/// Writes go to a back buffer and become visible on [`StripDriver::show`].
pub trait StripDriver {
    /// (Re)initialise output for `leds_per_strip` LEDs on each strip
    fn begin(&mut self, leds_per_strip: usize);

    /// Set the colour of one pixel
    fn set_pixel(&mut self, index: usize, color: Rgb);

    /// Push the back buffer to the LEDs
    fn show(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_slice() {
        assert_eq!(Rgb::from_slice(&[1, 2, 3, 4]), Some(Rgb::new(1, 2, 3)));
        assert_eq!(Rgb::from_slice(&[1, 2]), None);
    }
}
