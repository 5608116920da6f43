use crate::error::DisplayError;

/// Display format conversion utilities
pub struct DisplayConverter;

impl DisplayConverter {
    /// Pack a single RGB triple as RGB565
    pub fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
        ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
    }

    /// Convert RGB24 to little-endian RGB565, the framebuffer's native layout
    pub fn rgb24_to_rgb565(rgb24_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, DisplayError> {
        let expected_size = width as usize * height as usize * 3;
        if rgb24_data.len() != expected_size {
            return Err(DisplayError::FormatConversion {
                details: format!(
                    "Invalid RGB24 data size: expected {}, got {}",
                    expected_size,
                    rgb24_data.len()
                ),
            });
        }

        let mut rgb565_data = Vec::with_capacity(width as usize * height as usize * 2);
        for chunk in rgb24_data.chunks_exact(3) {
            let rgb565 = Self::pack_rgb565(chunk[0], chunk[1], chunk[2]);
            rgb565_data.extend_from_slice(&rgb565.to_le_bytes());
        }

        Ok(rgb565_data)
    }

    /// Byte ranges of `rgb565` rows that land inside the panel, paired with
    /// their byte offset into the framebuffer. Pixels past the panel edge are clipped.
    pub fn blit_rows(
        frame_width: u32,
        frame_height: u32,
        panel: (u32, u32),
        offset: (u32, u32),
    ) -> Vec<(u64, std::ops::Range<usize>)> {
        let (panel_w, panel_h) = panel;
        let (x_off, y_off) = offset;
        if x_off >= panel_w || y_off >= panel_h {
            return Vec::new();
        }

        let visible_w = frame_width.min(panel_w - x_off) as usize;
        let visible_h = frame_height.min(panel_h - y_off);
        let src_stride = frame_width as usize * 2;

        (0..visible_h)
            .map(|row| {
                let fb_offset = ((y_off + row) as u64 * panel_w as u64 + x_off as u64) * 2;
                let start = row as usize * src_stride;
                (fb_offset, start..start + visible_w * 2)
            })
            .collect()
    }
}
