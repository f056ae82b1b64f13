//! Color handling for Annograph diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Colors are accepted in any CSS syntax and emitted in
//! the `#RRGGBB` form Graphviz understands.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as `"#66B2FF"`,
    /// `"rgb(255, 0, 0)"` or `"gray"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use annograph_core::color::Color;
    ///
    /// let blue = Color::new("#66B2FF").unwrap();
    /// assert_eq!(blue.to_hex(), "#66B2FF");
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Create an opaque sRGB `Color` from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            color: DynamicColor::from_alpha_color(AlphaColor::<Srgb>::from_rgb8(r, g, b)),
        }
    }

    /// Returns the color as uppercase `#RRGGBB`, or `#RRGGBBAA` when it is
    /// not fully opaque.
    pub fn to_hex(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        if rgba.a == u8::MAX {
            format!("#{:02X}{:02X}{:02X}", rgba.r, rgba.g, rgba.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", rgba.r, rgba.g, rgba.b, rgba.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_rgb8(0, 0, 0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
