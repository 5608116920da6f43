use super::types::{ButtonId, InputPoller};
use crate::error::InputError;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Terminal stand-in for the HAT buttons, for bench use over SSH.
///
/// Each key press reads as pressed for exactly one query of that button.
pub struct KeyboardButtons {
    pub(crate) pressed: Arc<[AtomicBool; 8]>,
    cancellation_token: CancellationToken,
    shutdown: CancellationToken,
}

impl KeyboardButtons {
    /// `shutdown` is cancelled when the operator presses q, Esc or Ctrl+C,
    /// since raw mode swallows the terminal's SIGINT.
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            pressed: Arc::new(Default::default()),
            cancellation_token: CancellationToken::new(),
            shutdown,
        }
    }

    /// Start listening for keyboard input
    pub fn start(&self) -> Result<(), InputError> {
        enable_raw_mode().map_err(|e| InputError::Terminal {
            details: format!("Failed to enable raw mode: {}", e),
        })?;
        info!("Keyboard buttons active: space/1 shutter, arrows, enter, 2, 3; q quits");

        let pressed = Arc::clone(&self.pressed);
        let cancellation_token = self.cancellation_token.clone();
        let shutdown = self.shutdown.clone();

        task::spawn_blocking(move || {
            loop {
                if cancellation_token.is_cancelled() {
                    debug!("Keyboard input handler stopping");
                    break;
                }

                match event::poll(Duration::from_millis(50)) {
                    Ok(true) => {
                        let Ok(Event::Key(key_event)) = event::read() else {
                            continue;
                        };
                        if key_event.kind != KeyEventKind::Press {
                            continue;
                        }

                        let quit = matches!(key_event.code, KeyCode::Char('q') | KeyCode::Esc)
                            || (key_event.code == KeyCode::Char('c')
                                && key_event.modifiers.contains(KeyModifiers::CONTROL));
                        if quit {
                            info!("Quit key pressed - requesting shutdown");
                            shutdown.cancel();
                            break;
                        }

                        match button_for(key_event.code) {
                            Some(button) => {
                                pressed[button.index()].store(true, Ordering::Relaxed);
                            }
                            None => debug!("Unmapped key: {:?}", key_event.code),
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Error polling for keyboard events: {}", e);
                    }
                }
            }

            if let Err(e) = disable_raw_mode() {
                error!("Failed to disable raw mode: {}", e);
            }
            debug!("Keyboard input handler task exited");
        });

        Ok(())
    }

    /// Stop the keyboard listener and restore the terminal
    pub fn stop(&self) {
        info!("Stopping keyboard input handler");
        self.cancellation_token.cancel();
        let _ = disable_raw_mode();
    }
}

impl InputPoller for KeyboardButtons {
    fn is_pressed(&mut self, button: ButtonId) -> bool {
        self.pressed[button.index()].swap(false, Ordering::Relaxed)
    }
}

impl Drop for KeyboardButtons {
    fn drop(&mut self) {
        if !self.cancellation_token.is_cancelled() {
            self.stop();
        }
    }
}

pub(crate) fn button_for(code: KeyCode) -> Option<ButtonId> {
    match code {
        KeyCode::Char(' ') | KeyCode::Char('1') => Some(ButtonId::Key1),
        KeyCode::Up => Some(ButtonId::Up),
        KeyCode::Down => Some(ButtonId::Down),
        KeyCode::Left => Some(ButtonId::Left),
        KeyCode::Right => Some(ButtonId::Right),
        KeyCode::Enter => Some(ButtonId::Center),
        KeyCode::Char('2') => Some(ButtonId::Key2),
        KeyCode::Char('3') => Some(ButtonId::Key3),
        _ => None,
    }
}
