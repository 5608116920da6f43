use super::*;
use crate::config::DisplayConfig;
use crate::frame::{Frame, PixelFormat, Rotation};

fn create_test_config(device: &std::path::Path) -> DisplayConfig {
    DisplayConfig {
        framebuffer_device: device.to_string_lossy().to_string(),
        resolution: (4, 4),
        offset: (0, 0),
        rotation: Rotation::Rotate90,
    }
}

fn fake_framebuffer(size: usize) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), vec![0xAAu8; size]).unwrap();
    file
}

fn pixel_at(bytes: &[u8], x: u32, y: u32, panel_width: u32) -> u16 {
    let offset = ((y * panel_width + x) * 2) as usize;
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[test]
fn test_rgb24_to_rgb565_conversion() {
    let rgb24_data = vec![
        255, 0, 0, // Red
        0, 255, 0, // Green
        0, 0, 255, // Blue
    ];

    let rgb565_data = DisplayConverter::rgb24_to_rgb565(&rgb24_data, 3, 1).unwrap();
    assert_eq!(rgb565_data.len(), 6);

    let red = u16::from_le_bytes([rgb565_data[0], rgb565_data[1]]);
    let green = u16::from_le_bytes([rgb565_data[2], rgb565_data[3]]);
    let blue = u16::from_le_bytes([rgb565_data[4], rgb565_data[5]]);
    assert_eq!(red, 0xF800);
    assert_eq!(green, 0x07E0);
    assert_eq!(blue, 0x001F);
}

#[test]
fn test_rgb24_to_rgb565_invalid_size() {
    let invalid_data = vec![255, 0];
    let result = DisplayConverter::rgb24_to_rgb565(&invalid_data, 1, 1);
    assert!(result.is_err());
}

#[test]
fn test_blit_rows_clip_to_panel() {
    // 4x4 frame at (2, 3) on a 4x4 panel: one row of two pixels is visible
    let rows = DisplayConverter::blit_rows(4, 4, (4, 4), (2, 3));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, ((3 * 4 + 2) * 2) as u64);
    assert_eq!(rows[0].1, 0..4);

    assert!(DisplayConverter::blit_rows(4, 4, (4, 4), (4, 0)).is_empty());
}

#[tokio::test]
async fn test_framebuffer_show_writes_whole_panel() {
    let fb = fake_framebuffer(4 * 4 * 2);
    let config = create_test_config(fb.path());
    let mut display = FramebufferDisplay::open(&config).unwrap();

    let frame = Frame::solid(4, 4, [255, 255, 255]);
    display.show(&frame, 0, 0).await.unwrap();

    let written = std::fs::read(fb.path()).unwrap();
    assert_eq!(written.len(), 32);
    assert!(written.iter().all(|b| *b == 0xFF));
    assert_eq!(display.stats().frames_shown, 1);
}

#[tokio::test]
async fn test_framebuffer_show_honours_offset() {
    let fb = fake_framebuffer(4 * 4 * 2);
    let config = create_test_config(fb.path());
    let mut display = FramebufferDisplay::open(&config).unwrap();
    display.clear().await.unwrap();

    let frame = Frame::solid(2, 2, [255, 0, 0]);
    display.show(&frame, 1, 1).await.unwrap();

    let written = std::fs::read(fb.path()).unwrap();
    assert_eq!(pixel_at(&written, 0, 0, 4), 0x0000);
    assert_eq!(pixel_at(&written, 1, 1, 4), 0xF800);
    assert_eq!(pixel_at(&written, 2, 2, 4), 0xF800);
    assert_eq!(pixel_at(&written, 3, 3, 4), 0x0000);
}

#[tokio::test]
async fn test_framebuffer_clear() {
    let fb = fake_framebuffer(4 * 4 * 2);
    let config = create_test_config(fb.path());
    let mut display = FramebufferDisplay::open(&config).unwrap();

    display.clear().await.unwrap();

    let written = std::fs::read(fb.path()).unwrap();
    assert!(written.iter().all(|b| *b == 0));
    assert_eq!(display.stats().clears, 1);
}

#[tokio::test]
async fn test_framebuffer_rejects_non_rgb_frames() {
    let fb = fake_framebuffer(4 * 4 * 2);
    let config = create_test_config(fb.path());
    let mut display = FramebufferDisplay::open(&config).unwrap();

    let frame = Frame::new(4, 4, PixelFormat::Bgrx32, vec![0u8; 64]);
    assert!(display.show(&frame, 0, 0).await.is_err());
}

#[test]
fn test_framebuffer_open_missing_device() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&dir.path().join("fb9"));

    let result = FramebufferDisplay::open(&config);
    assert!(matches!(
        result,
        Err(crate::error::DisplayError::FramebufferOpen { .. })
    ));
}

#[tokio::test]
async fn test_mock_display_records_frames() {
    let mut display = MockDisplay::new((128, 128));
    let frame = Frame::solid(128, 128, [1, 2, 3]);

    display.show(&frame, 0, 0).await.unwrap();
    assert_eq!(display.last_frame().map(|(f, _, _)| f), Some(&frame));

    display.clear().await.unwrap();
    assert!(display.last_frame().is_none());
    assert_eq!(display.stats().frames_shown, 1);
    assert_eq!(display.stats().clears, 1);
}
