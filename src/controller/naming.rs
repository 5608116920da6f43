use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Timestamp layout used in still filenames
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// `<dir>/<counter:06>_<YYYYMMDD-HHMMSS>.jpg`
pub fn image_path(dir: &Path, counter: u64, taken_at: &NaiveDateTime) -> PathBuf {
    dir.join(format!(
        "{:06}_{}.jpg",
        counter,
        taken_at.format(FILENAME_TIMESTAMP_FORMAT)
    ))
}

/// Wall clock used to stamp still filenames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureClock {
    /// System local time
    Local,
    Zone(Tz),
}

impl CaptureClock {
    /// `"local"` (or empty) selects system time; anything else must be an IANA zone name
    pub fn resolve(tz_name: &str) -> Self {
        let name = tz_name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("local") {
            return CaptureClock::Local;
        }
        match name.parse::<Tz>() {
            Ok(tz) => CaptureClock::Zone(tz),
            Err(_) => {
                warn!(
                    "Invalid timestamp timezone '{}', falling back to local time",
                    tz_name
                );
                CaptureClock::Local
            }
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        match self {
            CaptureClock::Local => Local::now().naive_local(),
            CaptureClock::Zone(tz) => Utc::now().with_timezone(tz).naive_local(),
        }
    }
}
