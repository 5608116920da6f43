use super::naming::{image_path, CaptureClock};
use super::state::{ControllerState, TransitionStage};
use crate::camera::{CameraDevice, CaptureMode, ModeProfile, ModeProfiles};
use crate::compositor::OverlayState;
use crate::error::{CameraError, Result, StorageError, ViewfinderError};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// One saved still
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImageRecord {
    pub counter: u64,
    pub path: PathBuf,
    pub taken_at: NaiveDateTime,
}

/// Owns the capture mode, the image counter and the overlay anchor, and runs
/// the stop/reconfigure/start chain between preview and still.
pub struct ModeController {
    state: ControllerState,
    counter: u64,
    image_dir: PathBuf,
    profiles: ModeProfiles,
    clock: CaptureClock,
    overlay_duration: Duration,
    overlay: Option<OverlayState>,
}

fn at(stage: TransitionStage) -> impl FnOnce(CameraError) -> ViewfinderError {
    move |source| ViewfinderError::Transition { stage, source }
}

impl ModeController {
    pub fn new(
        image_dir: impl Into<PathBuf>,
        profiles: ModeProfiles,
        clock: CaptureClock,
        overlay_duration: Duration,
    ) -> Self {
        Self {
            state: ControllerState::Previewing,
            counter: 0,
            image_dir: image_dir.into(),
            profiles,
            clock,
            overlay_duration,
            overlay: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Number of stills saved so far, which is also the next filename counter
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn active_mode(&self) -> CaptureMode {
        self.state.capture_mode()
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Anchor of the most recent "picture taken" banner. Visibility is decided
    /// by the caller against its own `now`.
    pub fn overlay(&self) -> Option<&OverlayState> {
        self.overlay.as_ref()
    }

    /// Create the image directory if it does not exist
    pub fn ensure_image_dir(&self) -> std::result::Result<(), StorageError> {
        let path = &self.image_dir;
        if path.exists() {
            if !path.is_dir() {
                return Err(StorageError::NotADirectory {
                    path: path.display().to_string(),
                });
            }
            return Ok(());
        }

        std::fs::create_dir_all(path).map_err(|source| StorageError::DirectoryCreation {
            path: path.display().to_string(),
            source,
        })?;
        info!("Created image directory {}", path.display());
        Ok(())
    }

    /// Bring a freshly opened camera into preview mode and start streaming
    pub async fn enter_preview<C: CameraDevice + ?Sized>(&mut self, camera: &mut C) -> Result<()> {
        let preview = self.profiles.get(CaptureMode::Preview);
        if camera.is_running() {
            camera.stop().await?;
        }
        Self::apply_profile(camera, preview).await?;
        camera.start().await?;
        self.state = ControllerState::Previewing;
        info!(
            "Preview running at {}x{}, exposure {}us",
            preview.resolution.0, preview.resolution.1, preview.exposure_us
        );
        Ok(())
    }

    /// Shutter press: switch to still mode, save one image, and return to
    /// preview. Runs to completion before returning.
    pub async fn trigger_still<C: CameraDevice + ?Sized>(
        &mut self,
        camera: &mut C,
    ) -> Result<CapturedImageRecord> {
        let clock = self.clock;
        self.run_transition(camera, move || clock.now()).await
    }

    /// [`trigger_still`](Self::trigger_still) with a fixed filename timestamp
    pub async fn trigger_still_at<C: CameraDevice + ?Sized>(
        &mut self,
        camera: &mut C,
        taken_at: NaiveDateTime,
    ) -> Result<CapturedImageRecord> {
        self.run_transition(camera, move || taken_at).await
    }

    async fn run_transition<C, F>(&mut self, camera: &mut C, timestamp: F) -> Result<CapturedImageRecord>
    where
        C: CameraDevice + ?Sized,
        F: FnOnce() -> NaiveDateTime,
    {
        if self.state != ControllerState::Previewing {
            return Err(ViewfinderError::system(format!(
                "shutter transition requested while {}",
                self.state
            )));
        }

        let still = self.profiles.get(CaptureMode::Still);
        let preview = self.profiles.get(CaptureMode::Preview);

        // Previewing -> TransitioningToStill
        self.state = ControllerState::TransitioningToStill;
        debug!("Controller {}", self.state);
        camera.stop().await.map_err(at(TransitionStage::StopPreview))?;
        Self::apply_profile(camera, still)
            .await
            .map_err(at(TransitionStage::ConfigureStill))?;
        camera.start().await.map_err(at(TransitionStage::StartStill))?;

        // TransitioningToStill -> Stilling
        self.state = ControllerState::Stilling;
        debug!("Controller {}", self.state);
        let taken_at = timestamp();
        let path = image_path(&self.image_dir, self.counter, &taken_at);
        camera
            .capture_to_file(&path)
            .await
            .map_err(at(TransitionStage::CaptureStill))?;
        let record = CapturedImageRecord {
            counter: self.counter,
            path,
            taken_at,
        };
        self.counter += 1;
        self.overlay = Some(OverlayState::new(Instant::now(), self.overlay_duration));
        info!("Saved still #{} to {}", record.counter, record.path.display());
        camera.stop().await.map_err(at(TransitionStage::StopStill))?;

        // Stilling -> TransitioningToPreview
        self.state = ControllerState::TransitioningToPreview;
        debug!("Controller {}", self.state);
        Self::apply_profile(camera, preview)
            .await
            .map_err(at(TransitionStage::ConfigurePreview))?;
        camera
            .start()
            .await
            .map_err(at(TransitionStage::StartPreview))?;

        // TransitioningToPreview -> Previewing
        self.state = ControllerState::Previewing;
        debug!("Controller {}", self.state);
        Ok(record)
    }

    /// Resolution and exposure always change together
    async fn apply_profile<C: CameraDevice + ?Sized>(
        camera: &mut C,
        profile: ModeProfile,
    ) -> std::result::Result<(), CameraError> {
        camera.configure(profile).await?;
        camera.set_exposure(profile.exposure_us).await
    }
}
