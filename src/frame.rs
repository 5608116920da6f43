use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Pixel layouts produced by the camera and consumed by the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Packed 8-bit R, G, B
    Rgb24,
    /// XRGB8888 as laid out in memory on little-endian hosts: B, G, R, X
    Bgrx32,
}

impl PixelFormat {
    /// Get bytes per pixel for the format
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb24 => 3,
            PixelFormat::Bgrx32 => 4,
        }
    }
}

/// Rotation options for frame processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise (90 degrees counter-clockwise)
    Rotate270,
}

impl Rotation {
    /// Get rotation angle in degrees
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        }
    }

    /// Map a source pixel coordinate to its position after rotation
    pub fn map_point(&self, x: u32, y: u32, width: u32, height: u32) -> (u32, u32) {
        match self {
            Rotation::Rotate90 => (height - 1 - y, x),
            Rotation::Rotate180 => (width - 1 - x, height - 1 - y),
            Rotation::Rotate270 => (y, width - 1 - x),
        }
    }
}

/// A single captured frame. Created each loop iteration and dropped after display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel layout of `data`
    pub format: PixelFormat,
    /// Tightly packed rows, no stride padding
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            data,
        }
    }

    /// A frame filled with a single RGB colour
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self::new(width, height, PixelFormat::Rgb24, data)
    }

    /// Expected buffer length for the frame's dimensions and format
    pub fn expected_size(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    /// Validate frame data size against expected size
    pub fn validate_size(&self) -> bool {
        self.data.len() == self.expected_size()
    }

    /// RGB value at (x, y), if in bounds
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = (y as usize * self.width as usize + x as usize) * bpp;
        let px = self.data.get(offset..offset + bpp)?;
        Some(match self.format {
            PixelFormat::Rgb24 => [px[0], px[1], px[2]],
            PixelFormat::Bgrx32 => [px[2], px[1], px[0]],
        })
    }

    /// Normalize into a 3-channel RGB image
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        if !self.validate_size() {
            return None;
        }
        match self.format {
            PixelFormat::Rgb24 => RgbImage::from_raw(self.width, self.height, self.data.clone()),
            PixelFormat::Bgrx32 => {
                let rgb = self
                    .data
                    .chunks_exact(4)
                    .flat_map(|px| [px[2], px[1], px[0]])
                    .collect();
                RgbImage::from_raw(self.width, self.height, rgb)
            }
        }
    }

    pub fn from_rgb_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(width, height, PixelFormat::Rgb24, image.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_properties() {
        assert_eq!(PixelFormat::Rgb24.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::Bgrx32.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_rotation_degrees() {
        assert_eq!(Rotation::Rotate90.degrees(), 90);
        assert_eq!(Rotation::Rotate180.degrees(), 180);
        assert_eq!(Rotation::Rotate270.degrees(), 270);
    }

    #[test]
    fn test_rotation_map_point() {
        // 4x2 source: (0, 0) is top-left
        assert_eq!(Rotation::Rotate90.map_point(0, 0, 4, 2), (1, 0));
        assert_eq!(Rotation::Rotate90.map_point(3, 1, 4, 2), (0, 3));
        assert_eq!(Rotation::Rotate180.map_point(0, 0, 4, 2), (3, 1));
        assert_eq!(Rotation::Rotate270.map_point(0, 0, 4, 2), (0, 3));
    }

    #[test]
    fn test_frame_size_validation() {
        let valid = Frame::new(4, 4, PixelFormat::Rgb24, vec![0u8; 48]);
        assert!(valid.validate_size());

        let invalid = Frame::new(4, 4, PixelFormat::Bgrx32, vec![0u8; 48]);
        assert!(!invalid.validate_size());
        assert!(invalid.to_rgb_image().is_none());
    }

    #[test]
    fn test_bgrx_normalizes_to_rgb() {
        let frame = Frame::new(1, 1, PixelFormat::Bgrx32, vec![10, 20, 30, 0]);
        assert_eq!(frame.rgb_at(0, 0), Some([30, 20, 10]));

        let image = frame.to_rgb_image().unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [30, 20, 10]);
    }

    #[test]
    fn test_solid_frame() {
        let frame = Frame::solid(2, 3, [1, 2, 3]);
        assert!(frame.validate_size());
        assert_eq!(frame.rgb_at(1, 2), Some([1, 2, 3]));
        assert_eq!(frame.rgb_at(2, 0), None);
    }
}
