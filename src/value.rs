use serde_json::Value;

use crate::color_order::ColorOrder;
use crate::error::{Error, Result};

/// Unscaled pixel color in logical R,G,B[,W] order, as read back from a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Present only for orders with a white channel
    pub w: Option<u8>,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, w: None }
    }

    pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Self {
        Color { r, g, b, w: Some(w) }
    }

    pub(crate) fn from_logical(channels: &[u8]) -> Self {
        Color {
            r: channels[0],
            g: channels[1],
            b: channels[2],
            w: channels.get(3).copied(),
        }
    }
}

impl PartialEq<(u8, u8, u8)> for Color {
    fn eq(&self, other: &(u8, u8, u8)) -> bool {
        *self == Color::rgb(other.0, other.1, other.2)
    }
}

impl PartialEq<(u8, u8, u8, u8)> for Color {
    fn eq(&self, other: &(u8, u8, u8, u8)) -> bool {
        *self == Color::rgbw(other.0, other.1, other.2, other.3)
    }
}

/// A pixel value as accepted by writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelValue {
    Rgb(u8, u8, u8),
    Rgbw(u8, u8, u8, u8),
    /// 0xRRGGBB for 3 byte orders, 0xWWRRGGBB for 4 byte orders
    Packed(u32),
}

impl PixelValue {
    /// Attach a brightness that applies to this write only
    pub fn with_brightness(self, brightness: f64) -> PixelInput {
        PixelInput {
            value: self,
            brightness: Some(brightness),
        }
    }
}

/// One pixel write: a value plus an optional per-write brightness override
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelInput {
    pub value: PixelValue,
    pub brightness: Option<f64>,
}

/// Channel values checked against an order, ready to scale and store
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Normalized {
    pub channels: [u8; 4],
    pub brightness: Option<f64>,
}

impl PixelInput {
    pub(crate) fn normalize(&self, order: ColorOrder) -> Result<Normalized> {
        let width = order.byte_width();
        let channels = match self.value {
            PixelValue::Rgb(r, g, b) => {
                if width != 3 {
                    return Err(Error::Arity {
                        what: "pixel components",
                        expected: width,
                        actual: 3,
                    });
                }
                [r, g, b, 0]
            }
            PixelValue::Rgbw(r, g, b, w) => {
                if !order.has_white() {
                    return Err(Error::UnsupportedChannel {
                        order: order.to_string(),
                    });
                }
                [r, g, b, w]
            }
            PixelValue::Packed(packed) => {
                if width == 3 && packed > 0xFF_FFFF {
                    return Err(Error::value_range("packed RGB value", format!("{packed:#x}")));
                }
                let [w, r, g, b] = packed.to_be_bytes();
                [r, g, b, w]
            }
        };

        let brightness = self
            .brightness
            .map(|b| check_brightness("pixel brightness", b))
            .transpose()?;

        Ok(Normalized { channels, brightness })
    }

    /// Convert a dynamically typed value (JSON) into a pixel write for `order`
    ///
    /// Integers are packed colors. Arrays hold one integer per channel, optionally
    /// followed by a brightness in `[0.0, 1.0]`.
    pub fn from_json(value: &Value, order: ColorOrder) -> Result<Self> {
        match value {
            Value::Number(n) => {
                let packed = n
                    .as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| Error::value_range("packed color", n))?;
                Ok(PixelValue::Packed(packed).into())
            }
            Value::Array(items) => {
                let width = order.byte_width();
                let (components, brightness) = if items.len() == width {
                    (&items[..], None)
                } else if items.len() == width + 1 {
                    (&items[..width], Some(&items[width]))
                } else {
                    return Err(Error::Arity {
                        what: "pixel components",
                        expected: width,
                        actual: items.len(),
                    });
                };

                let mut channels = [0u8; 4];
                for (slot, item) in channels.iter_mut().zip(components) {
                    *slot = json_channel(item)?;
                }
                let [r, g, b, w] = channels;
                let value = if width == 4 {
                    PixelValue::Rgbw(r, g, b, w)
                } else {
                    PixelValue::Rgb(r, g, b)
                };

                let brightness = match brightness {
                    Some(Value::Number(n)) => Some(n.as_f64().unwrap_or(f64::NAN)),
                    Some(other) => return Err(Error::Type(other.to_string())),
                    None => None,
                };
                Ok(PixelInput { value, brightness })
            }
            other => Err(Error::Type(other.to_string())),
        }
    }
}

/// Whether a JSON array of numbers reads as one pixel for `order`
///
/// That is `byte_width` channel values in `0..=255`, optionally followed by a
/// brightness in `[0.0, 1.0]`.
pub(crate) fn is_pixel_tuple(items: &[Value], order: ColorOrder) -> bool {
    let width = order.byte_width();
    if items.len() != width && items.len() != width + 1 {
        return false;
    }
    let channels_fit = items[..width]
        .iter()
        .all(|v| v.as_u64().is_some_and(|c| c <= 255));
    let brightness_fits = items
        .get(width)
        .map_or(true, |b| b.as_f64().is_some_and(|b| (0.0..=1.0).contains(&b)));
    channels_fit && brightness_fits
}

fn json_channel(item: &Value) -> Result<u8> {
    match item {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| Error::value_range("channel value", n)),
        other => Err(Error::Type(other.to_string())),
    }
}

impl From<PixelValue> for PixelInput {
    fn from(value: PixelValue) -> Self {
        PixelInput {
            value,
            brightness: None,
        }
    }
}

impl From<(u8, u8, u8)> for PixelInput {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        PixelValue::Rgb(r, g, b).into()
    }
}

impl From<(u8, u8, u8, u8)> for PixelInput {
    fn from((r, g, b, w): (u8, u8, u8, u8)) -> Self {
        PixelValue::Rgbw(r, g, b, w).into()
    }
}

impl From<u32> for PixelInput {
    fn from(packed: u32) -> Self {
        PixelValue::Packed(packed).into()
    }
}

impl From<Color> for PixelInput {
    fn from(color: Color) -> Self {
        match color.w {
            Some(w) => PixelValue::Rgbw(color.r, color.g, color.b, w).into(),
            None => PixelValue::Rgb(color.r, color.g, color.b).into(),
        }
    }
}

pub(crate) fn check_brightness(what: &'static str, brightness: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&brightness) {
        Ok(brightness)
    } else {
        Err(Error::value_range(what, brightness))
    }
}

/// Scale one channel, rounding half up
pub(crate) fn scale(value: u8, brightness: f64) -> u8 {
    if brightness >= 1.0 {
        return value;
    }
    (f64::from(value) * brightness + 0.5).floor() as u8
}

/// Color wheel: 0..=255 runs red -> green -> blue -> back to red
pub fn wheel(pos: u8) -> Color {
    match pos {
        0..=84 => Color::rgb(255 - pos * 3, pos * 3, 0),
        85..=169 => {
            let pos = pos - 85;
            Color::rgb(0, 255 - pos * 3, pos * 3)
        }
        _ => {
            let pos = pos - 170;
            Color::rgb(pos * 3, 0, 255 - pos * 3)
        }
    }
}
