use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use self::Channel::{Blue, Green, Red, White};

/// Logical color channel, in the order pixel values are written and read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    White = 3,
}

impl Channel {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Channel::Red),
            'G' => Some(Channel::Green),
            'B' => Some(Channel::Blue),
            'W' => Some(Channel::White),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Channel::Red => 'R',
            Channel::Green => 'G',
            Channel::Blue => 'B',
            Channel::White => 'W',
        }
    }
}

/// Physical channel layout of one pixel (e.g. "GRB" or "RGBW")
///
/// Maps every logical channel to the byte offset it occupies inside a pixel.
/// Pixels are 3 bytes wide without a white channel and 4 bytes wide with one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorOrder {
    /// Channel stored at each physical position; slot 3 is `White` padding for 3-byte orders
    layout: [Channel; 4],
    /// Physical offset of each logical channel, indexed by `Channel as usize`
    offsets: [usize; 4],
    width: usize,
}

impl ColorOrder {
    pub const RGB: ColorOrder = ColorOrder::from_layout([Red, Green, Blue, White], 3);
    pub const RBG: ColorOrder = ColorOrder::from_layout([Red, Blue, Green, White], 3);
    pub const GRB: ColorOrder = ColorOrder::from_layout([Green, Red, Blue, White], 3);
    pub const GBR: ColorOrder = ColorOrder::from_layout([Green, Blue, Red, White], 3);
    pub const BRG: ColorOrder = ColorOrder::from_layout([Blue, Red, Green, White], 3);
    pub const BGR: ColorOrder = ColorOrder::from_layout([Blue, Green, Red, White], 3);
    pub const RGBW: ColorOrder = ColorOrder::from_layout([Red, Green, Blue, White], 4);
    pub const RBGW: ColorOrder = ColorOrder::from_layout([Red, Blue, Green, White], 4);
    pub const GRBW: ColorOrder = ColorOrder::from_layout([Green, Red, Blue, White], 4);
    pub const GBRW: ColorOrder = ColorOrder::from_layout([Green, Blue, Red, White], 4);
    pub const BRGW: ColorOrder = ColorOrder::from_layout([Blue, Red, Green, White], 4);
    pub const BGRW: ColorOrder = ColorOrder::from_layout([Blue, Green, Red, White], 4);

    const fn from_layout(layout: [Channel; 4], width: usize) -> Self {
        let mut offsets = [0usize; 4];
        let mut pos = 0;
        while pos < width {
            offsets[layout[pos] as usize] = pos;
            pos += 1;
        }
        ColorOrder { layout, offsets, width }
    }

    /// Parse an order specifier such as "GRB" or "rgbw"
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidOrder {
            order: spec.to_string(),
            reason,
        };

        let chars: Vec<char> = spec.chars().collect();
        if chars.len() != 3 && chars.len() != 4 {
            return Err(invalid("length must be 3 or 4"));
        }

        let mut layout = [Channel::White; 4];
        let mut seen = [false; 4];
        for (pos, &c) in chars.iter().enumerate() {
            let channel = Channel::from_char(c).ok_or_else(|| invalid("unknown channel"))?;
            if seen[channel as usize] {
                return Err(invalid("duplicate channel"));
            }
            seen[channel as usize] = true;
            layout[pos] = channel;
        }

        // "RGW" passes the duplicate check but has no blue
        if !(seen[Red as usize] && seen[Green as usize] && seen[Blue as usize]) {
            return Err(invalid("R, G and B are all required"));
        }

        Ok(Self::from_layout(layout, chars.len()))
    }

    /// Bytes per pixel (3 or 4)
    pub fn byte_width(&self) -> usize {
        self.width
    }

    pub fn has_white(&self) -> bool {
        self.width == 4
    }

    /// Physical byte offset of `channel` within a pixel
    pub fn offset(&self, channel: Channel) -> Option<usize> {
        if channel == Channel::White && !self.has_white() {
            return None;
        }
        Some(self.offsets[channel as usize])
    }

    /// Write one pixel's logical R,G,B[,W] values into `physical` in device order
    pub fn to_physical(&self, logical: &[u8], physical: &mut [u8]) {
        for (channel, &value) in logical.iter().enumerate().take(self.width) {
            physical[self.offsets[channel]] = value;
        }
    }

    /// Read one pixel's device-order bytes back into logical R,G,B[,W] order
    pub fn to_logical(&self, physical: &[u8], logical: &mut [u8]) {
        for (channel, value) in logical.iter_mut().enumerate().take(self.width) {
            *value = physical[self.offsets[channel]];
        }
    }
}

impl Default for ColorOrder {
    fn default() -> Self {
        ColorOrder::RGB
    }
}

impl fmt::Display for ColorOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for channel in &self.layout[..self.width] {
            write!(f, "{}", channel.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for ColorOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ColorOrder::parse(s)
    }
}

impl TryFrom<String> for ColorOrder {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        ColorOrder::parse(&s)
    }
}

impl From<ColorOrder> for String {
    fn from(order: ColorOrder) -> Self {
        order.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physical(order: ColorOrder, logical: &[u8]) -> Vec<u8> {
        let mut out = vec![0; order.byte_width()];
        order.to_physical(logical, &mut out);
        out
    }

    #[test]
    fn test_rgb_passthrough() {
        let order = ColorOrder::parse("RGB").unwrap();
        assert_eq!(order, ColorOrder::RGB);
        assert_eq!(physical(order, &[255, 0, 0]), vec![255, 0, 0]);
    }

    #[test]
    fn test_grb_order() {
        let order = ColorOrder::parse("GRB").unwrap();
        assert_eq!(physical(order, &[255, 0, 0]), vec![0, 255, 0]); // Red lands in byte 1
        assert_eq!(order.offset(Channel::Green), Some(0));
    }

    #[test]
    fn test_bgr_order() {
        let order = ColorOrder::parse("BGR").unwrap();
        assert_eq!(physical(order, &[255, 0, 0]), vec![0, 0, 255]);
    }

    #[test]
    fn test_grbw_order() {
        let order = ColorOrder::parse("GRBW").unwrap();
        assert_eq!(physical(order, &[1, 2, 3, 4]), vec![2, 1, 3, 4]);
        assert_eq!(order.offset(Channel::White), Some(3));
    }

    #[test]
    fn test_white_first() {
        let order = ColorOrder::parse("WRGB").unwrap();
        assert_eq!(physical(order, &[1, 2, 3, 4]), vec![4, 1, 2, 3]);

        let mut logical = [0u8; 4];
        order.to_logical(&[4, 1, 2, 3], &mut logical);
        assert_eq!(logical, [1, 2, 3, 4]);
    }

    #[test]
    fn test_width_matches_length() {
        for spec in ["RGB", "RBG", "GRB", "GBR", "BRG", "BGR"] {
            let order = ColorOrder::parse(spec).unwrap();
            assert_eq!(order.byte_width(), 3);
            assert!(!order.has_white());
            assert_eq!(order.offset(Channel::White), None);
        }
        for spec in ["RGBW", "GRBW", "WBGR", "BWRG"] {
            let order = ColorOrder::parse(spec).unwrap();
            assert_eq!(order.byte_width(), 4);
            assert!(order.has_white());
        }
    }

    #[test]
    fn test_case_insensitive() {
        let order: ColorOrder = "grbw".parse().unwrap();
        assert_eq!(order, ColorOrder::GRBW);
        assert_eq!(order.to_string(), "GRBW");
    }

    #[test]
    fn test_invalid_orders() {
        for spec in ["RGX", "RG", "RGBWW", "", "RRB", "RGBR", "RGWW", "RGW"] {
            assert!(
                matches!(ColorOrder::parse(spec), Err(Error::InvalidOrder { .. })),
                "{spec} should be rejected"
            );
        }
    }

    #[test]
    fn test_luminosity_orders_rejected() {
        for spec in ["PBGR", "PRGB", "BGRP"] {
            let err = ColorOrder::parse(spec);
            assert!(matches!(err, Err(Error::InvalidOrder { reason: "unknown channel", .. })));
        }
    }

    #[test]
    fn test_serde_string_form() {
        let order: ColorOrder = serde_json::from_str("\"bgr\"").unwrap();
        assert_eq!(order, ColorOrder::BGR);
        assert_eq!(serde_json::to_string(&order).unwrap(), "\"BGR\"");
        assert!(serde_json::from_str::<ColorOrder>("\"RGP\"").is_err());
    }
}
