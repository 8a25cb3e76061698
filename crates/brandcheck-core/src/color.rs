use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB color. Serialized as a `[r, g, b]` array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Errors produced when parsing a `#RRGGBB` string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RgbParseError {
    #[error("expected 6 hex digits, got {len} characters")]
    Length { len: usize },
    #[error("invalid hex digit in {input:?}")]
    Digit { input: String },
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Squared Euclidean distance in channel space.
    #[inline]
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Euclidean distance in channel space, in `[0, 441.7]`.
    #[inline]
    pub fn distance(self, other: Rgb) -> f64 {
        (self.distance_sq(other) as f64).sqrt()
    }

    /// `true` when `other` lies within `tolerance` (inclusive) of `self`.
    #[inline]
    pub fn within(self, other: Rgb, tolerance: u32) -> bool {
        self.distance_sq(other) as u64 <= tolerance as u64 * tolerance as u64
    }

    /// Parse `RRGGBB` or `#RRGGBB` (case-insensitive). Surrounding
    /// whitespace is rejected like any other stray character.
    pub fn from_hex(input: &str) -> Result<Self, RgbParseError> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.len() != 6 {
            return Err(RgbParseError::Length { len: digits.len() });
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RgbParseError::Digit {
                input: input.to_string(),
            });
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| RgbParseError::Digit {
                input: input.to_string(),
            })
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Upper-case `#RRGGBB` form.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

impl FromStr for Rgb {
    type Err = RgbParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLD: Rgb = Rgb::new(255, 188, 13);

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#FFBC0D"), Ok(GOLD));
        assert_eq!(Rgb::from_hex("FFBC0D"), Ok(GOLD));
        assert_eq!(Rgb::from_hex("ffbc0d"), Ok(GOLD));
        assert_eq!("#ffBC0d".parse::<Rgb>(), Ok(GOLD));
        assert_eq!(GOLD.to_hex(), "#FFBC0D");
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(Rgb::from_hex("#FFF"), Err(RgbParseError::Length { len: 3 }));
        assert!(matches!(
            Rgb::from_hex("#GGBC0D"),
            Err(RgbParseError::Digit { .. })
        ));
        assert!(matches!(
            Rgb::from_hex("+FBC0D"),
            Err(RgbParseError::Digit { .. })
        ));
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#ÿÿÿ").is_err());
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        assert_eq!(
            Rgb::from_hex(" FFBC0D "),
            Err(RgbParseError::Length { len: 8 })
        );
        assert!(matches!(
            Rgb::from_hex("#FFBC0\n"),
            Err(RgbParseError::Digit { .. })
        ));
        assert!(" #FFBC0D".parse::<Rgb>().is_err());
    }

    #[test]
    fn distance_and_tolerance() {
        let red = Rgb::new(255, 0, 0);
        assert_eq!(GOLD.distance_sq(GOLD), 0);
        assert!((GOLD.distance(red) - (188.0f64 * 188.0 + 13.0 * 13.0).sqrt()).abs() < 1e-9);
        assert!(GOLD.within(Rgb::new(255, 180, 7), 10));
        assert!(!GOLD.within(Rgb::new(255, 177, 13), 10));
        assert!(GOLD.within(GOLD, 0));
    }

    #[test]
    fn serializes_as_array() {
        let json = serde_json::to_string(&GOLD).unwrap();
        assert_eq!(json, "[255,188,13]");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GOLD);
    }
}
