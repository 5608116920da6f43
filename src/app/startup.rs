use super::{HardwareSession, Session};
use crate::camera::{CameraBuilder, CameraDevice, ModeProfiles};
use crate::compositor::{load_font, FrameCompositor};
use crate::config::ViewfinderConfig;
use crate::controller::{CaptureClock, ModeController};
use crate::display::{DisplaySurface, FramebufferDisplay};
use crate::error::Result;
use crate::input::{open_buttons, InputPoller};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

impl HardwareSession {
    /// Open the camera, panel and buttons named in `config`.
    ///
    /// If a later device fails to open, devices already opened are released
    /// before the error is returned.
    pub async fn open(config: &ViewfinderConfig, shutdown: CancellationToken) -> Result<Self> {
        info!("Opening viewfinder devices");

        let controller = create_controller(config);
        controller.ensure_image_dir()?;

        let mut camera: Box<dyn CameraDevice> =
            Box::new(CameraBuilder::new().config(config.camera.clone()).build()?);

        let display: Box<dyn DisplaySurface> = match FramebufferDisplay::open(&config.display) {
            Ok(display) => Box::new(display),
            Err(e) => {
                error!("Failed to open display: {}", e);
                release_camera(&mut camera).await;
                return Err(e.into());
            }
        };

        let input: Box<dyn InputPoller> = match open_buttons(&config.input, shutdown) {
            Ok(input) => input,
            Err(e) => {
                error!("Failed to open buttons: {}", e);
                release_camera(&mut camera).await;
                return Err(e.into());
            }
        };

        Ok(Session::new(
            camera,
            display,
            input,
            controller,
            create_compositor(config),
            config.display.offset,
        ))
    }
}

impl<C, D, I> Session<C, D, I>
where
    C: CameraDevice,
    D: DisplaySurface,
    I: InputPoller,
{
    /// Blank the panel and start the camera in preview mode
    pub async fn start(&mut self) -> Result<()> {
        self.display.clear().await?;
        self.controller.enter_preview(&mut self.camera).await?;
        info!(
            "Viewfinder started; stills go to {}",
            self.controller.image_dir().display()
        );
        Ok(())
    }
}

pub fn create_controller(config: &ViewfinderConfig) -> ModeController {
    ModeController::new(
        &config.storage.image_dir,
        ModeProfiles::from_config(&config.camera),
        CaptureClock::resolve(&config.storage.timestamp_timezone),
        Duration::from_secs_f64(config.overlay.duration_seconds),
    )
}

pub fn create_compositor(config: &ViewfinderConfig) -> FrameCompositor {
    FrameCompositor::new(
        config.display.rotation,
        config.overlay.message.clone(),
        load_font(&config.overlay.font_path),
        config.overlay.font_size,
    )
}

/// Lower (or raise) the scheduling priority of the whole process.
/// Failure is logged and otherwise ignored.
pub fn apply_niceness(niceness: Option<i32>) {
    let Some(niceness) = niceness else {
        return;
    };

    #[cfg(unix)]
    {
        // SAFETY: setpriority only reads its scalar arguments
        let result = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, niceness) };
        if result == 0 {
            info!("Process niceness set to {}", niceness);
        } else {
            warn!(
                "Failed to set process niceness to {}: {}",
                niceness,
                std::io::Error::last_os_error()
            );
        }
    }

    #[cfg(not(unix))]
    warn!("Process niceness {} ignored on this platform", niceness);
}

async fn release_camera(camera: &mut Box<dyn CameraDevice>) {
    if let Err(e) = camera.close().await {
        warn!("Failed to release camera: {}", e);
    }
}
