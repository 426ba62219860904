use pixelbuf::ColorOrder;
use serde::{Deserialize, Serialize};

use crate::protocol::Protocol;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub strip: StripConfig,
    /// Serial device to drive; frames are only logged when absent
    #[serde(default)]
    pub output: Option<OutputConfig>,
    /// Color-wheel animation; without it the initial pixels are shown once
    #[serde(default)]
    pub animation: Option<AnimationConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripConfig {
    pub led_count: usize,
    #[serde(default)]
    pub pixel_format: ColorOrder,
    #[serde(default = "default_brightness")]
    pub brightness: f64,
    #[serde(default)]
    pub auto_write: bool,
    /// Initial contents: one pixel value broadcast to the strip, or one value per LED
    #[serde(default)]
    pub pixels: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub port: String,
    pub protocol: Protocol,
    pub baud_rate: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnimationConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Wheel distance between neighbouring LEDs
    #[serde(default = "default_wheel_step")]
    pub wheel_step: u8,
    /// Wheel distance the strip advances per frame
    #[serde(default = "default_speed")]
    pub speed: u8,
}

fn default_brightness() -> f64 {
    1.0
}

fn default_fps() -> u32 {
    30
}

fn default_wheel_step() -> u8 {
    8
}

fn default_speed() -> u8 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config: Config = serde_json::from_str(r#"{ "strip": { "led_count": 30 } }"#).unwrap();
        assert_eq!(config.strip.led_count, 30);
        assert_eq!(config.strip.pixel_format, ColorOrder::RGB);
        assert_eq!(config.strip.brightness, 1.0);
        assert!(!config.strip.auto_write);
        assert!(config.output.is_none());
        assert!(config.animation.is_none());
    }

    #[test]
    fn test_full_config() {
        let config: Config = serde_json::from_str(
            r#"{
                "strip": {
                    "led_count": 60,
                    "pixel_format": "GRBW",
                    "brightness": 0.25,
                    "auto_write": true,
                    "pixels": [255, 0, 0, 0]
                },
                "output": { "port": "/dev/ttyACM0", "protocol": "awa", "baud_rate": 2000000 },
                "animation": { "fps": 60 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.strip.pixel_format, ColorOrder::GRBW);
        assert_eq!(config.output.unwrap().protocol, Protocol::Awa);
        let animation = config.animation.unwrap();
        assert_eq!(animation.fps, 60);
        assert_eq!(animation.wheel_step, 8);
    }

    #[test]
    fn test_bad_pixel_format() {
        let json = r#"{ "strip": { "led_count": 3, "pixel_format": "RGX" } }"#;
        let result = serde_json::from_str::<Config>(json);
        assert!(result.is_err());
    }
}
