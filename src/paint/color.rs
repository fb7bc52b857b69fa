use crate::foundation::core::Rgb8;
use serde::Deserialize;

impl serde::Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&to_hex(*self))
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
            Hex(String),
            RgbObj { r: f64, g: f64, b: f64 },
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbObj { r, g, b } => Ok(from_unit(r, g, b)),
            Repr::Arr(v) => {
                if v.len() == 3 {
                    Ok(from_unit(v[0], v[1], v[2]))
                } else {
                    Err(serde::de::Error::custom(
                        "rgb array must have len 3 ([r,g,b])",
                    ))
                }
            }
        }
    }
}

fn from_unit(r: f64, g: f64, b: f64) -> Rgb8 {
    fn to_u8(x: f64) -> u8 {
        (x.clamp(0.0, 1.0) * 255.0).round() as u8
    }
    Rgb8::new(to_u8(r), to_u8(g), to_u8(b))
}

/// Format as lowercase `#rrggbb`.
pub fn to_hex(c: Rgb8) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Parse `#RRGGBB` (leading `#` optional, case-insensitive).
pub fn parse_hex(s: &str) -> Result<Rgb8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if s.len() != 6 || !s.is_ascii() {
        return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
    }
    Ok(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}
