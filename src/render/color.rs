// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;

/// An 8-bit per channel RGB color from a palette.
///
/// This type can be formatted as a hex code using the standard formatting syntax. The formatted
/// output will have a leading '#'.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl From<colorous::Color> for Color {
    fn from(other_color: colorous::Color) -> Self {
        Self::new(other_color.r, other_color.g, other_color.b)
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(color: Color) -> Self {
        image::Rgb(color.as_array())
    }
}

impl fmt::LowerHex for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl fmt::UpperHex for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl Color {
    /// Create a new [Color] with the given 8-bit color values.
    pub(crate) fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// The red, green, and blue components as a 3 element array.
    pub(crate) fn as_array(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

#[cfg(test)]
mod test {
    use super::Color;

    #[test]
    fn new_order() {
        let c = Color::new(25, 125, 225);
        assert_eq!(c.as_array(), [25, 125, 225]);
    }

    #[test]
    fn hex() {
        let c = Color::new(0x0a, 0xbc, 0xff);
        assert_eq!(format!("{:x}", c), "#0abcff");
        assert_eq!(format!("{:X}", c), "#0ABCFF");
    }

    #[test]
    fn from_colorous() {
        let c = Color::from(colorous::Color {
            r: 1,
            g: 2,
            b: 3,
        });
        assert_eq!(c, Color::new(1, 2, 3));
    }

    #[test]
    fn into_pixel() {
        let pixel: image::Rgb<u8> = Color::new(200, 100, 50).into();
        assert_eq!(pixel.0, [200, 100, 50]);
    }
}
