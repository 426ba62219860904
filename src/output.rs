use anyhow::{Context, Result};
use log::{info, trace, warn};
use pixelbuf::Transmit;
use serialport::SerialPort;
use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::config::OutputConfig;

/// Where the strip's frames go
pub enum Output {
    Serial(SerialOutput),
    /// No device configured: frames are only logged
    Log { frames_sent: u64 },
}

impl Output {
    pub fn frames_sent(&self) -> u64 {
        match self {
            Output::Serial(serial) => serial.frames_sent,
            Output::Log { frames_sent } => *frames_sent,
        }
    }
}

impl Transmit for Output {
    fn transmit(&mut self, pixels: &[u8]) -> Result<()> {
        match self {
            Output::Serial(serial) => serial.transmit(pixels),
            Output::Log { frames_sent } => {
                trace!("frame: {}", hex(pixels));
                *frames_sent += 1;
                Ok(())
            }
        }
    }
}

/// LED controller on a serial port, written synchronously frame by frame
pub struct SerialOutput {
    config: OutputConfig,
    port: Box<dyn SerialPort>,
    stride: usize,
    frames_sent: u64,
}

impl SerialOutput {
    /// Open the configured port; `stride` is the strip's bytes per pixel
    pub fn open(config: OutputConfig, stride: usize) -> Result<Self> {
        let mut port = serialport::new(&config.port, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .open()
            .context(format!("Failed to open serial port {}", config.port))?;

        // Bound writes so a stalled device surfaces as an error
        port.set_timeout(Duration::from_millis(1000))
            .context("Failed to set serial port timeout")?;

        if let Err(e) = port.write_data_terminal_ready(true) {
            warn!("Failed to set DTR on {}: {}", config.port, e);
        }

        // Allow device to initialize
        thread::sleep(Duration::from_millis(100));

        info!(
            "Opened {} ({:?} @ {} baud, {} bytes per pixel)",
            config.port, config.protocol, config.baud_rate, stride
        );

        Ok(SerialOutput {
            config,
            port,
            stride,
            frames_sent: 0,
        })
    }
}

impl Transmit for SerialOutput {
    fn transmit(&mut self, pixels: &[u8]) -> Result<()> {
        let frame = self.config.protocol.build_frame(pixels, self.stride);
        trace!(
            "[{}] Sending frame: {} bytes ({} pixels, {} stride): {}",
            self.config.port,
            frame.len(),
            pixels.len() / self.stride,
            self.stride,
            hex(&frame)
        );

        self.port
            .write_all(&frame)
            .context(format!("Serial error on {}", self.config.port))?;
        self.port
            .flush()
            .context(format!("Failed to flush {}", self.config.port))?;

        self.frames_sent += 1;
        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump() {
        assert_eq!(hex(&[0x41, 0x00, 0xff]), "41 00 ff");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn test_log_output_counts_frames() {
        let mut output = Output::Log { frames_sent: 0 };
        output.transmit(&[1, 2, 3]).unwrap();
        output.transmit(&[4, 5, 6]).unwrap();
        assert_eq!(output.frames_sent(), 2);
    }
}
