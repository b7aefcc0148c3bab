use serde::{Deserialize, Serialize};

/// Straight 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an array in `r, g, b` order.
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Look up one of the named colors accepted by scripts (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        let c = match name.trim().to_ascii_lowercase().as_str() {
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "red" => Self::new(255, 0, 0),
            "green" => Self::new(0, 128, 0),
            "lime" => Self::new(0, 255, 0),
            "blue" => Self::new(0, 0, 255),
            "yellow" => Self::new(255, 255, 0),
            "pink" => Self::new(255, 192, 203),
            "orange" => Self::new(255, 165, 0),
            "purple" => Self::new(128, 0, 128),
            "cyan" => Self::new(0, 255, 255),
            "magenta" => Self::new(255, 0, 255),
            "gray" | "grey" => Self::new(128, 128, 128),
            _ => return None,
        };
        Some(c)
    }

    /// Parse `#RRGGBB`, `RRGGBB` or a named color.
    pub fn parse(s: &str) -> Result<Self, String> {
        if let Some(c) = Self::named(s) {
            return Ok(c);
        }
        parse_hex(s)
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            RgbObj { r: u8, g: u8, b: u8 },
            Arr([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            Repr::RgbObj { r, g, b } => Ok(Self::new(r, g, b)),
            Repr::Arr(v) => Ok(Self::from(v)),
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgb8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if s.len() != 6 || !s.is_ascii() {
        return Err(format!(
            "color must be #RRGGBB or a known color name (got \"{s}\")"
        ));
    }
    Ok(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
