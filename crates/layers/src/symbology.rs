use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB colour, serialized as `#rrggbb`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional, case-insensitive).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| D::Error::custom(format!("invalid colour {s:?}")))
    }
}

/// Surface material parameters handed to the renderer.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialStyle {
    pub color: Color,
    pub double_sided: bool,
    pub roughness: f32,
    pub metalness: f32,
    pub vertex_colors: bool,
    pub wireframe: bool,
    pub transparent: bool,
    pub opacity: f32,
}

impl MaterialStyle {
    pub const fn opaque(color: Color) -> Self {
        Self {
            color,
            double_sided: false,
            roughness: 1.0,
            metalness: 0.0,
            vertex_colors: false,
            wireframe: false,
            transparent: false,
            opacity: 1.0,
        }
    }

    pub const fn translucent(color: Color, opacity: f32) -> Self {
        Self {
            transparent: true,
            opacity,
            ..Self::opaque(color)
        }
    }
}
