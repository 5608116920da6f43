use super::converter::DisplayConverter;
use super::stats::DisplayStats;
use super::surface::DisplaySurface;
use crate::config::DisplayConfig;
use crate::error::DisplayError;
use crate::frame::{Frame, PixelFormat};
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Linux framebuffer panel (the fbtft driver exposes the 1.44" LCD HAT as a
/// 16 bpp RGB565 framebuffer)
pub struct FramebufferDisplay {
    device: String,
    file: File,
    resolution: (u32, u32),
    stats: DisplayStats,
}

impl FramebufferDisplay {
    /// Open the framebuffer device for writing
    pub fn open(config: &DisplayConfig) -> Result<Self, DisplayError> {
        info!(
            "Opening framebuffer {} ({}x{})",
            config.framebuffer_device, config.resolution.0, config.resolution.1
        );

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.framebuffer_device)
            .map_err(|e| DisplayError::FramebufferOpen {
                device: config.framebuffer_device.clone(),
                source: e,
            })?;

        Self::check_geometry(&config.framebuffer_device, config.resolution)?;

        Ok(Self {
            device: config.framebuffer_device.clone(),
            file,
            resolution: config.resolution,
            stats: DisplayStats::default(),
        })
    }

    /// Compare the configured geometry with what the kernel reports, when sysfs is available
    fn check_geometry(device: &str, resolution: (u32, u32)) -> Result<(), DisplayError> {
        let Some(sysfs) = sysfs_dir(device) else {
            return Ok(());
        };

        if let Some(bpp) = read_sysfs_value(&sysfs.join("bits_per_pixel")) {
            if bpp.trim() != "16" {
                return Err(DisplayError::Geometry {
                    device: device.to_string(),
                    details: format!("expected 16 bits per pixel, found {}", bpp.trim()),
                });
            }
        }

        if let Some(size) = read_sysfs_value(&sysfs.join("virtual_size")) {
            let parsed: Vec<u32> = size
                .trim()
                .split(',')
                .filter_map(|v| v.parse().ok())
                .collect();
            if let &[width, height] = parsed.as_slice() {
                if width < resolution.0 || height < resolution.1 {
                    return Err(DisplayError::Geometry {
                        device: device.to_string(),
                        details: format!(
                            "panel is {}x{} but {}x{} was configured",
                            width, height, resolution.0, resolution.1
                        ),
                    });
                }
                if (width, height) != resolution {
                    warn!(
                        "Framebuffer {} is {}x{}, configured for {}x{}",
                        device, width, height, resolution.0, resolution.1
                    );
                }
            }
        }

        Ok(())
    }

    pub fn stats(&self) -> &DisplayStats {
        &self.stats
    }

    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> Result<(), DisplayError> {
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|source| DisplayError::Write { source })?;
        self.file
            .write_all(bytes)
            .map_err(|source| DisplayError::Write { source })
    }
}

#[async_trait]
impl DisplaySurface for FramebufferDisplay {
    async fn clear(&mut self) -> Result<(), DisplayError> {
        let (width, height) = self.resolution;
        let blank = vec![0u8; width as usize * height as usize * 2];
        self.write_at(0, &blank)?;
        self.file
            .flush()
            .map_err(|source| DisplayError::Write { source })?;
        self.stats.record_clear();
        debug!("Framebuffer {} cleared", self.device);
        Ok(())
    }

    async fn show(&mut self, frame: &Frame, x_offset: u32, y_offset: u32) -> Result<(), DisplayError> {
        if frame.format != PixelFormat::Rgb24 {
            return Err(DisplayError::FormatConversion {
                details: format!("display expects RGB24 frames, got {:?}", frame.format),
            });
        }

        let rgb565 = DisplayConverter::rgb24_to_rgb565(&frame.data, frame.width, frame.height)?;
        let rows = DisplayConverter::blit_rows(
            frame.width,
            frame.height,
            self.resolution,
            (x_offset, y_offset),
        );

        for (fb_offset, range) in rows {
            self.write_at(fb_offset, &rgb565[range])?;
        }
        self.file
            .flush()
            .map_err(|source| DisplayError::Write { source })?;

        self.stats.record_frame();
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }
}

/// `/dev/fb1` -> `/sys/class/graphics/fb1`
fn sysfs_dir(device: &str) -> Option<PathBuf> {
    let name = Path::new(device).file_name()?.to_str()?;
    if !name.starts_with("fb") {
        return None;
    }
    Some(Path::new("/sys/class/graphics").join(name))
}

fn read_sysfs_value(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}
