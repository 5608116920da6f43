use super::*;
use crate::camera::{CameraDevice, CameraOp, CaptureMode, MockCamera};
use crate::config::ViewfinderConfig;
use crate::display::MockDisplay;
use crate::error::{ErrorKind, ViewfinderError};
use crate::input::ScriptedButtons;
use crate::scheduler::{LoopScheduler, LoopStats};
use tokio_util::sync::CancellationToken;

type TestSession = Session<MockCamera, MockDisplay, ScriptedButtons>;

fn create_test_config(dir: &std::path::Path) -> ViewfinderConfig {
    let mut config = ViewfinderConfig::default();
    config.storage.image_dir = dir.join("images").to_string_lossy().to_string();
    config.overlay.font_path = dir.join("missing.ttf").to_string_lossy().to_string();
    config
}

fn create_session(config: &ViewfinderConfig, display: MockDisplay) -> TestSession {
    let controller = create_controller(config);
    controller.ensure_image_dir().unwrap();
    Session::new(
        MockCamera::new(),
        display,
        ScriptedButtons::new(),
        controller,
        create_compositor(config),
        config.display.offset,
    )
}

#[test]
fn test_shutdown_reason_exit_code() {
    assert_eq!(ShutdownReason::Interrupted.exit_code(), 0);
}

#[test]
fn test_components_from_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());

    let controller = create_controller(&config);
    assert_eq!(controller.counter(), 0);
    assert_eq!(controller.image_dir(), dir.path().join("images"));
    assert!(controller.overlay().is_none());

    let compositor = create_compositor(&config);
    assert_eq!(compositor.rotation(), crate::frame::Rotation::Rotate90);
    // Missing font falls back to the built-in one
    assert!(compositor.has_font());
}

#[tokio::test]
async fn test_start_enters_preview_and_clears_panel() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let mut session = create_session(&config, MockDisplay::new((128, 128)));

    session.start().await.unwrap();

    assert!(session.camera().is_running());
    assert_eq!(session.camera().configured_mode(), Some(CaptureMode::Preview));
    assert_eq!(session.display().stats().clears, 1);
}

#[tokio::test]
async fn test_run_interrupted_tears_down() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let mut session = create_session(&config, MockDisplay::new((128, 128)));
    let mut scheduler = LoopScheduler::from_fps(24);

    let shutdown = CancellationToken::new();
    shutdown.cancel();
    let reason = session.run(&mut scheduler, shutdown).await.unwrap();

    assert_eq!(reason, ShutdownReason::Interrupted);
    assert!(session.is_torn_down());
    assert!(session.camera().is_closed());
    assert_eq!(session.camera().ops().last(), Some(&CameraOp::Close));
    // Once at start, once at shutdown
    assert_eq!(session.display().stats().clears, 2);
}

#[tokio::test]
async fn test_run_device_failure_still_tears_down() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let mut session = create_session(&config, MockDisplay::new((128, 128)).failing());
    let mut scheduler = LoopScheduler::from_fps(24);

    let err = session
        .run(&mut scheduler, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ViewfinderError::Display(_)));
    assert_eq!(err.kind(), ErrorKind::DeviceOperation);
    assert!(session.camera().is_closed());
    assert_eq!(session.display().stats().clears, 2);
}

#[tokio::test]
async fn test_start_failure_still_tears_down() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let controller = create_controller(&config);
    let mut session = Session::new(
        MockCamera::new().fail_on(CameraOp::Start),
        MockDisplay::new((128, 128)),
        ScriptedButtons::new(),
        controller,
        create_compositor(&config),
        (0, 0),
    );
    let mut scheduler = LoopScheduler::from_fps(24);

    let result = session.run(&mut scheduler, CancellationToken::new()).await;

    assert!(matches!(result, Err(ViewfinderError::Camera(_))));
    assert!(session.camera().is_closed());
    assert_eq!(scheduler.stats().iterations, 0);
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let mut session = create_session(&config, MockDisplay::new((128, 128)));
    let stats = LoopStats::default();

    session.shutdown(&stats).await.unwrap();
    session.shutdown(&stats).await.unwrap();

    let closes = session
        .camera()
        .ops()
        .iter()
        .filter(|op| **op == CameraOp::Close)
        .count();
    assert_eq!(closes, 1);
    assert_eq!(session.display().stats().clears, 1);
}

#[tokio::test]
async fn test_hardware_open_rejects_bad_image_dir() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut config = ViewfinderConfig::default();
    config.storage.image_dir = file.path().to_string_lossy().to_string();

    let result = HardwareSession::open(&config, CancellationToken::new()).await;
    match result {
        Err(e) => assert_eq!(e.kind(), ErrorKind::Storage),
        Ok(_) => panic!("image dir pointing at a file must be rejected"),
    }
}

#[test]
fn test_apply_niceness_none_is_noop() {
    apply_niceness(None);
}
