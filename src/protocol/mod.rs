use serde::{Deserialize, Serialize};

mod adalight;
mod awa;

pub use adalight::build_adalight_frame;
pub use awa::build_awa_frame;

/// Serial framing used to carry pixel bytes to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// HyperSerial 'Awa' frames with Fletcher checksums
    Awa,
    Adalight,
}

impl Protocol {
    pub fn build_frame(self, pixel_data: &[u8], stride: usize) -> Vec<u8> {
        match self {
            Protocol::Awa => build_awa_frame(pixel_data, stride),
            Protocol::Adalight => build_adalight_frame(pixel_data, stride),
        }
    }
}

/// 6 byte header shared by both protocols: magic, (count - 1) big-endian, checksum
fn header(magic: &[u8; 3], pixel_data: &[u8], stride: usize) -> [u8; 6] {
    let last = (pixel_data.len() / stride).saturating_sub(1);
    let [count_hi, count_lo] = (last as u16).to_be_bytes();
    [magic[0], magic[1], magic[2], count_hi, count_lo, count_hi ^ count_lo ^ 0x55]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_counts_from_zero() {
        let pixels = vec![0u8; 300 * 3];
        let h = header(b"Ada", &pixels, 3);
        assert_eq!(h, [b'A', b'd', b'a', 0x01, 0x2b, 0x01 ^ 0x2b ^ 0x55]);
    }

    #[test]
    fn test_header_uses_stride() {
        let pixels = vec![0u8; 8];
        assert_eq!(header(b"Awa", &pixels, 4)[3..5], [0, 1]);
        assert_eq!(header(b"Awa", &pixels[..6], 3)[3..5], [0, 1]);
    }

    #[test]
    fn test_protocol_from_config() {
        let p: Protocol = serde_json::from_str("\"adalight\"").unwrap();
        assert_eq!(p, Protocol::Adalight);
        assert!(serde_json::from_str::<Protocol>("\"tpm2\"").is_err());
    }
}
