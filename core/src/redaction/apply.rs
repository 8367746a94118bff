use crate::types::PixelBuffer;

/// Zeroes rows `[0, y0)` of every frame
///
/// `y0` is clamped to the frame height. Planar buffers are zeroed in
/// each color plane. Returns the number of rows zeroed per frame.
///
/// # Example
///
/// ```
/// use sonoscrub_core::redaction::redact_rows;
/// use sonoscrub_core::PixelBuffer;
///
/// let mut buffer = PixelBuffer::new(4, 2, 1, 1, 8, vec![9; 8]).unwrap();
/// assert_eq!(redact_rows(&mut buffer, 1), 1);
/// assert_eq!(buffer.data(), &[0, 0, 9, 9, 9, 9, 9, 9]);
/// ```
pub fn redact_rows(buffer: &mut PixelBuffer, y0: u32) -> u32 {
    let rows = y0.min(buffer.rows());
    if rows == 0 {
        return 0;
    }

    let planes = if buffer.is_planar() {
        buffer.samples_per_pixel() as usize
    } else {
        1
    };
    let plane_len = buffer.frame_stride() / planes;
    let zeroed_len = rows as usize * buffer.plane_row_stride();

    for frame in buffer.frames_mut() {
        for plane in frame.chunks_exact_mut(plane_len) {
            plane[..zeroed_len].fill(0);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(rows: u32, columns: u32, frames: u32, spp: u16, bits: u16, value: u8) -> PixelBuffer {
        let len = rows as usize * columns as usize * frames as usize * spp as usize * (bits / 8) as usize;
        PixelBuffer::new(rows, columns, frames, spp, bits, vec![value; len]).unwrap()
    }

    fn assert_redacted(buffer: &PixelBuffer, y0: u32, value: u8) {
        for frame in 0..buffer.frames() {
            for row in 0..buffer.rows() {
                let bytes = buffer.row(frame, row).unwrap();
                if row < y0 {
                    assert!(bytes.iter().all(|&b| b == 0), "frame {} row {} not zeroed", frame, row);
                } else {
                    assert!(bytes.iter().all(|&b| b == value), "frame {} row {} altered", frame, row);
                }
            }
        }
    }

    #[test]
    fn test_single_frame() {
        let mut buffer = filled(200, 300, 1, 1, 8, 255);
        assert_eq!(redact_rows(&mut buffer, 80), 80);
        assert_redacted(&buffer, 80, 255);
    }

    #[test]
    fn test_each_frame_redacted_independently() {
        let mut buffer = filled(50, 40, 5, 3, 8, 7);
        redact_rows(&mut buffer, 10);
        assert_redacted(&buffer, 10, 7);
    }

    #[test]
    fn test_sixteen_bit_samples() {
        let mut buffer = filled(20, 10, 2, 1, 16, 0xAB);
        redact_rows(&mut buffer, 5);
        assert_redacted(&buffer, 5, 0xAB);
    }

    #[test]
    fn test_rows_below_y0_untouched() {
        let data: Vec<u8> = (0..=255).cycle().take(64 * 64).collect();
        let mut buffer = PixelBuffer::new(64, 64, 1, 1, 8, data.clone()).unwrap();
        redact_rows(&mut buffer, 16);
        assert_eq!(&buffer.data()[16 * 64..], &data[16 * 64..]);
        assert!(buffer.data()[..16 * 64].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_y0_clamped_to_height() {
        let mut buffer = filled(10, 10, 2, 1, 8, 1);
        assert_eq!(redact_rows(&mut buffer, 101), 10);
        assert!(buffer.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_y0_is_noop() {
        let mut buffer = filled(10, 10, 1, 1, 8, 3);
        assert_eq!(redact_rows(&mut buffer, 0), 0);
        assert!(buffer.data().iter().all(|&b| b == 3));
    }

    #[test]
    fn test_planar_buffer() {
        // 2 rows x 2 columns, RGB planes: R R R R | G G G G | B B B B
        let mut buffer = PixelBuffer::new(2, 2, 1, 3, 8, vec![5; 12])
            .unwrap()
            .with_planar(true);
        redact_rows(&mut buffer, 1);
        assert_eq!(buffer.data(), &[0, 0, 5, 5, 0, 0, 5, 5, 0, 0, 5, 5]);
    }
}
