use super::*;
use crate::config::ViewfinderConfig;
use crate::error::{CameraError, ViewfinderError};

fn preview() -> ModeProfile {
    ModeProfiles::default().get(CaptureMode::Preview)
}

#[test]
fn test_profiles_from_config() {
    let config = ViewfinderConfig::default();
    let profiles = ModeProfiles::from_config(&config.camera);

    let preview = profiles.get(CaptureMode::Preview);
    assert_eq!(preview.mode, CaptureMode::Preview);
    assert_eq!(preview.resolution, (128, 128));
    assert_eq!(preview.exposure_us, 45_000);

    let still = profiles.get(CaptureMode::Still);
    assert_eq!(still.mode, CaptureMode::Still);
    assert_eq!(still.resolution, (2592, 1944));
    assert_eq!(still.exposure_us, 25_000);
}

#[test]
fn test_capture_mode_display() {
    assert_eq!(CaptureMode::Preview.to_string(), "preview");
    assert_eq!(CaptureMode::Still.to_string(), "still");
}

#[test]
fn test_camera_builder_validation() {
    let result = CameraBuilder::new().build();
    assert!(result.is_err());

    if let Err(ViewfinderError::System { message }) = result {
        assert!(message.contains("Camera configuration must be specified"));
    } else {
        panic!("Expected system error for missing configuration");
    }
}

#[tokio::test]
async fn test_mock_camera_lifecycle() {
    let mut camera = MockCamera::new();
    assert!(!camera.is_running());
    assert_eq!(camera.configured_mode(), None);

    camera.configure(preview()).await.unwrap();
    camera.set_exposure(45_000).await.unwrap();
    camera.start().await.unwrap();
    assert!(camera.is_running());
    assert_eq!(camera.configured_mode(), Some(CaptureMode::Preview));

    let frame = camera.capture_frame().await.unwrap();
    assert_eq!((frame.width, frame.height), (128, 128));
    assert!(frame.validate_size());

    camera.stop().await.unwrap();
    camera.close().await.unwrap();
    assert!(camera.is_closed());

    assert_eq!(
        camera.ops(),
        &[
            CameraOp::Configure(CaptureMode::Preview),
            CameraOp::SetExposure(45_000),
            CameraOp::Start,
            CameraOp::CaptureFrame,
            CameraOp::Stop,
            CameraOp::Close,
        ]
    );
}

#[tokio::test]
async fn test_mock_camera_rejects_configure_while_running() {
    let mut camera = MockCamera::new();
    camera.configure(preview()).await.unwrap();
    camera.start().await.unwrap();

    let err = camera
        .configure(ModeProfiles::default().get(CaptureMode::Still))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CameraError::InvalidState {
            operation: "configure",
            ..
        }
    ));
    assert_eq!(camera.configured_mode(), Some(CaptureMode::Preview));
}

#[tokio::test]
async fn test_mock_camera_rejects_double_start_and_stop() {
    let mut camera = MockCamera::new();
    assert!(camera.start().await.is_err());

    camera.configure(preview()).await.unwrap();
    camera.start().await.unwrap();
    assert!(camera.start().await.is_err());

    camera.stop().await.unwrap();
    assert!(camera.stop().await.is_err());
}

#[tokio::test]
async fn test_mock_camera_capture_requires_running() {
    let mut camera = MockCamera::new();
    camera.configure(preview()).await.unwrap();
    assert!(camera.capture_frame().await.is_err());
}

#[tokio::test]
async fn test_mock_camera_configure_resets_exposure() {
    let mut camera = MockCamera::new();
    camera.configure(preview()).await.unwrap();
    camera.set_exposure(45_000).await.unwrap();
    assert_eq!(camera.exposure_us(), Some(45_000));

    camera
        .configure(ModeProfiles::default().get(CaptureMode::Still))
        .await
        .unwrap();
    assert_eq!(camera.exposure_us(), None);
}

#[tokio::test]
async fn test_mock_camera_injected_failure_fires_once() {
    let mut camera = MockCamera::new().fail_on(CameraOp::Start);
    camera.configure(preview()).await.unwrap();

    assert!(camera.start().await.is_err());
    assert!(!camera.is_running());
    camera.start().await.unwrap();
}

#[tokio::test]
async fn test_mock_camera_capture_to_file_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("still.jpg");

    let mut camera = MockCamera::new();
    camera
        .configure(ModeProfiles::default().get(CaptureMode::Still))
        .await
        .unwrap();
    camera.start().await.unwrap();
    camera.capture_to_file(&path).await.unwrap();

    assert!(path.exists());
}
