use std::fmt;

/// Decoded raster of a single record
///
/// Samples are stored row-major with interleaved channels, frame after
/// frame, in little-endian byte order for multi-byte samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    rows: u32,
    columns: u32,
    frames: u32,
    samples_per_pixel: u16,
    bits_allocated: u16,
    planar: bool,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a buffer after checking that the byte length matches the geometry
    ///
    /// # Errors
    ///
    /// Returns an error message if the geometry is degenerate, if the
    /// sample depth is not a whole number of bytes, or if `data` is
    /// shorter than the geometry requires. Trailing padding bytes are
    /// dropped.
    pub fn new(
        rows: u32,
        columns: u32,
        frames: u32,
        samples_per_pixel: u16,
        bits_allocated: u16,
        mut data: Vec<u8>,
    ) -> Result<Self, String> {
        if rows == 0 || columns == 0 || frames == 0 || samples_per_pixel == 0 {
            return Err(format!(
                "Degenerate pixel geometry {}x{}x{} ({} samples)",
                columns, rows, frames, samples_per_pixel
            ));
        }
        if bits_allocated == 0 || bits_allocated % 8 != 0 {
            return Err(format!("Unsupported BitsAllocated {}", bits_allocated));
        }

        let expected = [
            rows as usize,
            samples_per_pixel as usize,
            (bits_allocated / 8) as usize,
            frames as usize,
        ]
        .into_iter()
        .try_fold(columns as usize, |acc, factor| acc.checked_mul(factor))
        .ok_or_else(|| {
            format!(
                "Pixel geometry {}x{}x{} ({} samples, {}-bit) overflows",
                columns, rows, frames, samples_per_pixel, bits_allocated
            )
        })?;
        if data.len() < expected {
            return Err(format!(
                "Pixel data holds {} bytes, geometry requires {}",
                data.len(),
                expected
            ));
        }
        data.truncate(expected);
        Ok(Self {
            rows,
            columns,
            frames,
            samples_per_pixel,
            bits_allocated,
            planar: false,
            data,
        })
    }

    /// Marks the samples as stored plane by plane (PlanarConfiguration 1)
    pub fn with_planar(mut self, planar: bool) -> Self {
        self.planar = planar && self.samples_per_pixel > 1;
        self
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn samples_per_pixel(&self) -> u16 {
        self.samples_per_pixel
    }

    pub fn bits_allocated(&self) -> u16 {
        self.bits_allocated
    }

    /// Returns true when each frame stores one color plane after another
    pub fn is_planar(&self) -> bool {
        self.planar
    }

    /// Number of bytes in one sample
    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_allocated / 8) as usize
    }

    /// Returns true for buffers holding more than one frame
    pub fn is_multi_frame(&self) -> bool {
        self.frames > 1
    }

    /// Number of bytes in one pixel row
    pub fn row_stride(&self) -> usize {
        self.columns as usize * self.samples_per_pixel as usize * self.bytes_per_sample()
    }

    /// Number of bytes in one frame
    pub fn frame_stride(&self) -> usize {
        self.row_stride() * self.rows as usize
    }

    /// Raw sample bytes of every frame
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of one row of one frame
    ///
    /// For planar buffers this is the row of the first color plane.
    pub fn row(&self, frame: u32, row: u32) -> Option<&[u8]> {
        if frame >= self.frames || row >= self.rows {
            return None;
        }
        let row_len = self.plane_row_stride();
        let start = frame as usize * self.frame_stride() + row as usize * row_len;
        self.data.get(start..start + row_len)
    }

    /// Number of bytes in one row of one color plane
    ///
    /// Equal to [`row_stride`](Self::row_stride) for interleaved buffers.
    pub fn plane_row_stride(&self) -> usize {
        if self.planar {
            self.columns as usize * self.bytes_per_sample()
        } else {
            self.row_stride()
        }
    }

    /// Mutable iterator over the frames of the buffer
    pub fn frames_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        let stride = self.frame_stride();
        self.data.chunks_exact_mut(stride)
    }
}

impl fmt::Display for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{} ({} samples, {}-bit)",
            self.columns, self.rows, self.frames, self.samples_per_pixel, self.bits_allocated
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides() {
        let buffer = PixelBuffer::new(4, 3, 2, 3, 16, vec![0; 4 * 3 * 2 * 3 * 2]).unwrap();
        assert_eq!(buffer.row_stride(), 18);
        assert_eq!(buffer.frame_stride(), 72);
        assert!(buffer.is_multi_frame());
        assert_eq!(buffer.to_string(), "3x4x2 (3 samples, 16-bit)");
    }

    #[test]
    fn test_trailing_padding_dropped() {
        // odd-length pixel data is padded to even length on disk
        let buffer = PixelBuffer::new(1, 3, 1, 1, 8, vec![1, 2, 3, 0]).unwrap();
        assert_eq!(buffer.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_rejects_short_data() {
        assert!(PixelBuffer::new(2, 2, 1, 1, 8, vec![0; 3]).is_err());
    }

    #[test]
    fn test_rejects_overflowing_geometry() {
        let result = PixelBuffer::new(65535, 65535, i32::MAX as u32, 3, 16, vec![0; 16]);
        let message = result.unwrap_err();
        assert!(message.contains("overflows"));
    }

    #[test]
    fn test_rejects_bit_packed_samples() {
        assert!(PixelBuffer::new(8, 8, 1, 1, 1, vec![0; 8]).is_err());
    }

    #[test]
    fn test_planar_row_stride() {
        let buffer = PixelBuffer::new(2, 4, 1, 3, 8, vec![0; 24])
            .unwrap()
            .with_planar(true);
        assert!(buffer.is_planar());
        assert_eq!(buffer.row_stride(), 12);
        assert_eq!(buffer.plane_row_stride(), 4);

        let mono = PixelBuffer::new(2, 4, 1, 1, 8, vec![0; 8])
            .unwrap()
            .with_planar(true);
        assert!(!mono.is_planar());
    }

    #[test]
    fn test_row_access() {
        let data: Vec<u8> = (0..12).collect();
        let buffer = PixelBuffer::new(3, 2, 2, 1, 8, data).unwrap();
        assert_eq!(buffer.row(1, 0), Some(&[6u8, 7][..]));
        assert_eq!(buffer.row(2, 0), None);
        assert_eq!(buffer.row(0, 3), None);
    }
}
