use anyhow::{Context, Result};
use log::{info, warn};
use pixelbuf::{PixelBuffer, Slice};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::{AnimationConfig, Config};
use crate::output::{Output, SerialOutput};

const STATS_INTERVAL: Duration = Duration::from_secs(5);

/// Drives a strip: shows its initial pixels, then optionally animates a color wheel
pub struct Player {
    strip: PixelBuffer<'static, Output>,
    animation: Option<AnimationConfig>,
    running: Arc<AtomicBool>,
}

impl Player {
    /// Build the strip and its output from configuration
    pub fn new(config: Config) -> Result<Self> {
        let strip_config = config.strip;
        let order = strip_config.pixel_format;

        let output = match config.output {
            Some(output_config) => {
                Output::Serial(SerialOutput::open(output_config, order.byte_width())?)
            }
            None => {
                info!("No output configured, frames are logged only");
                Output::Log { frames_sent: 0 }
            }
        };

        let mut strip = PixelBuffer::builder(strip_config.led_count)
            .order(order)
            .brightness(strip_config.brightness)
            .build(output)
            .context("Invalid strip configuration")?;

        if let Some(pixels) = &strip_config.pixels {
            strip
                .assign_json(Slice::full(), pixels)
                .context("Invalid initial pixels")?;
        }
        strip.set_auto_write(strip_config.auto_write);

        info!(
            "Strip ready: {} LEDs, {} order, brightness {:.2}",
            strip.len(),
            strip.order(),
            strip.brightness()
        );

        Ok(Player {
            strip,
            animation: config.animation,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    /// Get a clone of the running flag for signal handlers
    pub fn get_running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Show the initial frame, then animate until stopped or `max_frames` is reached
    pub fn run(&mut self, max_frames: Option<u64>) -> Result<()> {
        self.strip.show()?;

        let Some(animation) = self.animation.clone() else {
            return Ok(());
        };

        let frame_time = Duration::from_secs(1) / animation.fps.max(1);
        let mut position: u8 = 0;
        let mut frames: u64 = 0;
        let mut last_stats = Instant::now();
        let mut last_sent = self.strip.transmitter().frames_sent();

        info!("Animating at {} fps (Press Ctrl-C to stop)", animation.fps);

        while self.running.load(Ordering::Relaxed) {
            if max_frames.is_some_and(|max| frames >= max) {
                break;
            }
            let started = Instant::now();

            // With auto_write the fill itself transmits
            self.strip.fill_wheel(position, animation.wheel_step)?;
            self.strip.show_if_dirty()?;

            position = ((u16::from(position) + u16::from(animation.speed)) % 255) as u8;
            frames += 1;

            if last_stats.elapsed() >= STATS_INTERVAL {
                let sent = self.strip.transmitter().frames_sent();
                let fps = (sent - last_sent) as f64 / last_stats.elapsed().as_secs_f64();
                info!("[Stats] Sent: {:.1} fps", fps);
                last_sent = sent;
                last_stats = Instant::now();
            }

            if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }

        Ok(())
    }

    /// Run, then blank the strip when it was animated or the run failed
    pub fn play(&mut self, max_frames: Option<u64>) -> Result<()> {
        let result = self.run(max_frames);
        if self.is_animated() || result.is_err() {
            self.shutdown();
        }
        result
    }

    /// Turn the LEDs off
    pub fn shutdown(&mut self) {
        info!("Turning off LEDs...");

        self.strip.set_auto_write(false);
        // Packed 0 is black for every order
        if let Err(e) = self.strip.fill(0u32).and_then(|_| self.strip.show()) {
            warn!("Failed to blank strip: {}", e);
        }

        info!("✓ Stopped after {} frames", self.strip.transmitter().frames_sent());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(json: &str) -> Player {
        Player::new(serde_json::from_str(json).unwrap()).unwrap()
    }

    #[test]
    fn test_static_frame_shown_once() {
        let mut p = player(r#"{ "strip": { "led_count": 2, "pixels": [[1, 2, 3], [4, 5, 6]] } }"#);
        assert!(!p.is_animated());
        p.run(None).unwrap();
        assert_eq!(p.strip.transmitter().frames_sent(), 1);
        assert_eq!(p.strip.as_bytes(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_one_transmit_per_frame() {
        for auto_write in [false, true] {
            let mut p = player(&format!(
                r#"{{ "strip": {{ "led_count": 8, "pixel_format": "GRB",
                                 "auto_write": {auto_write} }},
                     "animation": {{ "fps": 1000 }} }}"#
            ));
            p.run(Some(3)).unwrap();
            assert_eq!(p.strip.transmitter().frames_sent(), 4);

            p.shutdown();
            assert_eq!(p.strip.transmitter().frames_sent(), 5);
            assert!(p.strip.as_bytes().iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_play_blanks_animated_strip() {
        let mut p = player(r#"{ "strip": { "led_count": 3 }, "animation": { "fps": 1000 } }"#);
        p.play(Some(2)).unwrap();
        // initial frame, two animation frames, black frame
        assert_eq!(p.strip.transmitter().frames_sent(), 4);
        assert!(p.strip.as_bytes().iter().all(|&b| b == 0));

        let mut p = player(r#"{ "strip": { "led_count": 1, "pixels": [9, 8, 7] } }"#);
        p.play(None).unwrap();
        assert_eq!(p.strip.transmitter().frames_sent(), 1);
        assert_eq!(p.strip.as_bytes(), &[9, 8, 7]);
    }

    #[test]
    fn test_stop_flag() {
        let mut p = player(r#"{ "strip": { "led_count": 4 }, "animation": {} }"#);
        p.get_running_flag().store(false, Ordering::Relaxed);
        p.run(None).unwrap();
        assert_eq!(p.strip.transmitter().frames_sent(), 1);
    }

    #[test]
    fn test_bad_initial_pixels() {
        let config =
            serde_json::from_str(r#"{ "strip": { "led_count": 2, "pixels": [[1, 2, 3]] } }"#)
                .unwrap();
        assert!(Player::new(config).is_err());
    }
}
