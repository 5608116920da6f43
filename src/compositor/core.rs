use super::overlay::OverlayState;
use crate::error::DisplayError;
use crate::frame::{Frame, Rotation};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use tokio::time::Instant;

/// Space between the banner text and the edge of its box
pub const BANNER_PADDING: u32 = 5;

const BANNER_BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
const BANNER_TEXT: Rgb<u8> = Rgb([255, 255, 255]);

/// Turns a raw camera frame into what the panel shows.
///
/// Composition holds no state between calls: the output depends only on the
/// frame, the overlay and `now`.
pub struct FrameCompositor {
    rotation: Rotation,
    message: String,
    font: Option<Font<'static>>,
    font_size: f32,
}

impl FrameCompositor {
    pub fn new(
        rotation: Rotation,
        message: impl Into<String>,
        font: Option<Font<'static>>,
        font_size: f32,
    ) -> Self {
        Self {
            rotation,
            message: message.into(),
            font,
            font_size,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Rotate, normalize to RGB24 and draw the banner while the overlay is live
    pub fn compose(
        &self,
        raw: &Frame,
        overlay: Option<&OverlayState>,
        now: Instant,
    ) -> Result<Frame, DisplayError> {
        let image = raw.to_rgb_image().ok_or_else(|| DisplayError::FormatConversion {
            details: format!(
                "frame buffer is {} bytes, expected {} for {}x{} {:?}",
                raw.data.len(),
                raw.expected_size(),
                raw.width,
                raw.height,
                raw.format
            ),
        })?;

        let mut rotated = match self.rotation {
            Rotation::Rotate90 => imageops::rotate90(&image),
            Rotation::Rotate180 => imageops::rotate180(&image),
            Rotation::Rotate270 => imageops::rotate270(&image),
        };

        if overlay.is_some_and(|o| o.is_visible(now)) {
            self.draw_banner(&mut rotated);
        }

        Ok(Frame::from_rgb_image(rotated))
    }

    /// Black box centered on the image with the message in white, shrunk to fit
    fn draw_banner(&self, image: &mut RgbImage) {
        let (width, height) = image.dimensions();
        let max_text_w = width.saturating_sub(2 * BANNER_PADDING).max(1);
        let max_text_h = height.saturating_sub(2 * BANNER_PADDING).max(1);

        let mut scale = Scale::uniform(self.font_size);
        let (text_w, text_h) = match &self.font {
            Some(font) => {
                let (w, h) = text_size(scale, font, &self.message);
                let (w, h) = (w.max(0) as u32, h.max(0) as u32);
                let shrink = (max_text_w as f32 / w.max(1) as f32)
                    .min(max_text_h as f32 / h.max(1) as f32);
                if shrink < 1.0 {
                    scale = Scale::uniform(self.font_size * shrink);
                    let (w, h) = text_size(scale, font, &self.message);
                    (w.max(0) as u32, h.max(0) as u32)
                } else {
                    (w, h)
                }
            }
            None => estimate_text_size(&self.message, self.font_size),
        };
        let text_w = text_w.min(max_text_w);
        let text_h = text_h.min(max_text_h);

        let box_w = text_w + 2 * BANNER_PADDING;
        let box_h = text_h + 2 * BANNER_PADDING;
        let box_x = (width.saturating_sub(box_w) / 2) as i32;
        let box_y = (height.saturating_sub(box_h) / 2) as i32;

        draw_filled_rect_mut(
            image,
            Rect::at(box_x, box_y).of_size(box_w.max(1), box_h.max(1)),
            BANNER_BACKGROUND,
        );

        if let Some(font) = &self.font {
            draw_text_mut(
                image,
                BANNER_TEXT,
                box_x + BANNER_PADDING as i32,
                box_y + BANNER_PADDING as i32,
                scale,
                font,
                &self.message,
            );
        }
    }
}

/// Rough glyph box used when no font could be loaded
fn estimate_text_size(text: &str, font_size: f32) -> (u32, u32) {
    let width = (text.chars().count() as f32 * font_size * 0.5).ceil() as u32;
    (width, font_size.ceil() as u32)
}
