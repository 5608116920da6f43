use rusttype::Font;
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// The "picture taken" banner, anchored at the moment a still was saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayState {
    pub started_at: Instant,
    pub duration: Duration,
}

impl OverlayState {
    pub fn new(started_at: Instant, duration: Duration) -> Self {
        Self {
            started_at,
            duration,
        }
    }

    /// Visible while `now - started_at < duration`; the end of the window is exclusive
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) < self.duration
    }
}

/// DejaVu Sans Bold, used when the configured font cannot be loaded
const BUILTIN_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

fn builtin_font() -> Option<Font<'static>> {
    Font::try_from_bytes(BUILTIN_FONT)
}

/// Load the banner font, falling back to the built-in one when the file is
/// missing or unparsable
pub fn load_font<P: AsRef<Path>>(path: P) -> Option<Font<'static>> {
    let path = path.as_ref();
    let parsed = match std::fs::read(path) {
        Ok(data) => match Font::try_from_vec(data) {
            Some(font) => Ok(font),
            None => Err("not a usable TrueType font".to_string()),
        },
        Err(e) => Err(e.to_string()),
    };

    match parsed {
        Ok(font) => {
            debug!("Loaded overlay font {}", path.display());
            Some(font)
        }
        Err(reason) => {
            warn!(
                "Failed to load font file '{}': {}; using built-in font",
                path.display(),
                reason
            );
            let font = builtin_font();
            if font.is_none() {
                warn!("Built-in font failed to parse; overlay text disabled");
            }
            font
        }
    }
}
