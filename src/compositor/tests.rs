use super::*;
use crate::frame::{Frame, PixelFormat, Rotation};
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;

const WHITE: [u8; 3] = [255, 255, 255];
const RED: [u8; 3] = [255, 0, 0];
const GREEN: [u8; 3] = [0, 255, 0];

fn create_compositor(rotation: Rotation) -> FrameCompositor {
    FrameCompositor::new(rotation, "Picture Taken", None, 16.0)
}

fn marker_frame() -> Frame {
    // 4x2, red at (0, 0) and green at (3, 1)
    let mut frame = Frame::solid(4, 2, WHITE);
    frame.data[0..3].copy_from_slice(&RED);
    let offset = (4 + 3) * 3;
    frame.data[offset..offset + 3].copy_from_slice(&GREEN);
    frame
}

fn overlay_at(started_at: Instant) -> OverlayState {
    OverlayState::new(started_at, Duration::from_secs(3))
}

#[test]
fn test_rotate90_moves_marker_pixels() {
    let compositor = create_compositor(Rotation::Rotate90);
    let out = compositor
        .compose(&marker_frame(), None, Instant::now())
        .unwrap();

    assert_eq!((out.width, out.height), (2, 4));
    assert_eq!(out.format, PixelFormat::Rgb24);

    let (x, y) = Rotation::Rotate90.map_point(0, 0, 4, 2);
    assert_eq!((x, y), (1, 0));
    assert_eq!(out.rgb_at(x, y), Some(RED));

    let (x, y) = Rotation::Rotate90.map_point(3, 1, 4, 2);
    assert_eq!((x, y), (0, 3));
    assert_eq!(out.rgb_at(x, y), Some(GREEN));
}

#[test]
fn test_rotate270_and_180_follow_map_point() {
    for rotation in [Rotation::Rotate180, Rotation::Rotate270] {
        let out = create_compositor(rotation)
            .compose(&marker_frame(), None, Instant::now())
            .unwrap();
        let (x, y) = rotation.map_point(3, 1, 4, 2);
        assert_eq!(out.rgb_at(x, y), Some(GREEN), "{:?}", rotation);
    }
}

#[test]
fn test_bgrx_frames_are_normalized() {
    let raw = Frame::new(1, 1, PixelFormat::Bgrx32, vec![0, 0, 255, 0]);
    let out = create_compositor(Rotation::Rotate90)
        .compose(&raw, None, Instant::now())
        .unwrap();
    assert_eq!(out.format, PixelFormat::Rgb24);
    assert_eq!(out.rgb_at(0, 0), Some(RED));
}

#[test]
fn test_short_buffer_is_rejected() {
    let raw = Frame::new(4, 4, PixelFormat::Rgb24, vec![0; 10]);
    assert!(create_compositor(Rotation::Rotate90)
        .compose(&raw, None, Instant::now())
        .is_err());
}

#[test]
fn test_overlay_window_is_exclusive_at_three_seconds() {
    let start = Instant::now();
    let overlay = overlay_at(start);

    assert!(overlay.is_visible(start));
    assert!(overlay.is_visible(start + Duration::from_millis(2999)));
    assert!(!overlay.is_visible(start + Duration::from_secs(3)));
    assert!(!overlay.is_visible(start + Duration::from_secs(10)));
}

#[test]
fn test_banner_drawn_only_while_visible() {
    let compositor = create_compositor(Rotation::Rotate90);
    let raw = Frame::solid(128, 128, WHITE);
    let start = Instant::now();
    let overlay = overlay_at(start);

    let shown = compositor
        .compose(&raw, Some(&overlay), start + Duration::from_millis(2999))
        .unwrap();
    assert_eq!(shown.rgb_at(64, 64), Some([0, 0, 0]));
    // Corners stay untouched
    assert_eq!(shown.rgb_at(0, 0), Some(WHITE));
    assert_eq!(shown.rgb_at(127, 127), Some(WHITE));

    let expired = compositor
        .compose(&raw, Some(&overlay), start + Duration::from_secs(3))
        .unwrap();
    assert_eq!(expired.rgb_at(64, 64), Some(WHITE));

    let plain = compositor.compose(&raw, None, start).unwrap();
    assert_eq!(plain, expired);
}

#[test]
fn test_compose_is_deterministic() {
    let compositor = create_compositor(Rotation::Rotate90);
    let raw = Frame::solid(64, 48, [10, 20, 30]);
    let start = Instant::now();
    let overlay = overlay_at(start);
    let now = start + Duration::from_secs(1);

    let first = compositor.compose(&raw, Some(&overlay), now).unwrap();
    let second = compositor.compose(&raw, Some(&overlay), now).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_banner_fits_tiny_panel() {
    let compositor = FrameCompositor::new(Rotation::Rotate90, "Picture Taken", None, 64.0);
    let raw = Frame::solid(20, 20, WHITE);
    let start = Instant::now();
    let out = compositor
        .compose(&raw, Some(&overlay_at(start)), start)
        .unwrap();
    assert_eq!((out.width, out.height), (20, 20));
    assert_eq!(out.rgb_at(10, 10), Some([0, 0, 0]));
}

#[test]
fn test_load_font_missing_file_uses_builtin() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_font(dir.path().join("missing.ttf")).is_some());
}

#[test]
fn test_load_font_invalid_file_uses_builtin() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"definitely not a font").unwrap();
    assert!(load_font(file.path()).is_some());
}

fn bright_pixels(frame: &Frame) -> Vec<(u32, u32)> {
    let mut found = Vec::new();
    for y in 0..frame.height {
        for x in 0..frame.width {
            if let Some([r, g, b]) = frame.rgb_at(x, y) {
                if r > 200 && g > 200 && b > 200 {
                    found.push((x, y));
                }
            }
        }
    }
    found
}

#[test]
fn test_banner_renders_message_text() {
    let dir = tempfile::tempdir().unwrap();
    let font = load_font(dir.path().join("missing.ttf"));
    let compositor = FrameCompositor::new(Rotation::Rotate90, "Picture Taken", font, 16.0);
    assert!(compositor.has_font());

    let raw = Frame::solid(128, 128, [128, 128, 128]);
    let start = Instant::now();
    let shown = compositor
        .compose(&raw, Some(&overlay_at(start)), start)
        .unwrap();

    let text = bright_pixels(&shown);
    assert!(!text.is_empty());
    // Glyphs sit inside the centered banner, clear of the frame edges
    assert!(text
        .iter()
        .all(|&(x, y)| x >= BANNER_PADDING && x < 128 - BANNER_PADDING && (32..96).contains(&y)));

    let expired = compositor
        .compose(&raw, Some(&overlay_at(start)), start + Duration::from_secs(3))
        .unwrap();
    assert!(bright_pixels(&expired).is_empty());
}
