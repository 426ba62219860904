use super::header;

/// Build an AWA frame (HyperSerialPico format): 'Awa' header, pixel bytes, Fletcher trailer
pub fn build_awa_frame(pixel_data: &[u8], stride: usize) -> Vec<u8> {
    let mut frame = Vec::with_capacity(6 + pixel_data.len() + 3);
    frame.extend_from_slice(&header(b"Awa", pixel_data, stride));
    frame.extend_from_slice(pixel_data);
    frame.extend_from_slice(&fletcher(pixel_data));
    frame
}

/// Fletcher-16 sums plus the position-mixed extension byte
fn fletcher(pixel_data: &[u8]) -> [u8; 3] {
    let mut fletcher1: u16 = 0;
    let mut fletcher2: u16 = 0;
    let mut fletcher_ext: u16 = 0;

    for (position, &byte) in pixel_data.iter().enumerate() {
        fletcher1 = (fletcher1 + u16::from(byte)) % 255;
        fletcher2 = (fletcher2 + fletcher1) % 255;
        fletcher_ext = (fletcher_ext + (u16::from(byte) ^ position as u16)) % 255;
    }

    // 0x41 would read as the start of the next 'Awa' header
    if fletcher_ext == 0x41 {
        fletcher_ext = 0xaa;
    }

    [fletcher1 as u8, fletcher2 as u8, fletcher_ext as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_awa_frame_layout() {
        let frame = build_awa_frame(&[1, 2, 3], 3);
        assert_eq!(&frame[..6], &[0x41, 0x77, 0x61, 0, 0, 0x55]);
        assert_eq!(&frame[6..9], &[1, 2, 3]);
        // f1: 1, 3, 6  f2: 1, 4, 10  ext: 1^0, 2^1, 3^2 -> 1 + 3 + 1
        assert_eq!(&frame[9..], &[6, 10, 5]);
    }

    #[test]
    fn test_fletcher_ext_escape() {
        // single byte 0x41 at position 0 gives ext == 0x41
        assert_eq!(fletcher(&[0x41])[2], 0xaa);
    }
}
