use super::header;

/// Build an Adalight frame: 'Ada' header followed by the raw pixel bytes
pub fn build_adalight_frame(pixel_data: &[u8], stride: usize) -> Vec<u8> {
    let mut frame = Vec::with_capacity(6 + pixel_data.len());
    frame.extend_from_slice(&header(b"Ada", pixel_data, stride));
    frame.extend_from_slice(pixel_data);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adalight_frame() {
        let frame = build_adalight_frame(&[1, 2, 3, 4, 5, 6], 3);
        assert_eq!(frame, vec![0x41, 0x64, 0x61, 0, 1, 0x54, 1, 2, 3, 4, 5, 6]);
    }
}
