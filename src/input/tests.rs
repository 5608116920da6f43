use super::*;
use crossterm::event::KeyCode;

#[test]
fn test_button_names() {
    assert_eq!(ButtonId::Key1.to_string(), "KEY1");
    assert_eq!(ButtonId::Center.to_string(), "Center");
    assert_eq!(ButtonId::Key3.to_string(), "KEY3");
    assert_eq!(ButtonId::SHUTTER, ButtonId::Key1);
}

#[test]
fn test_button_indices_are_distinct() {
    for (i, button) in ButtonId::ALL.iter().enumerate() {
        assert_eq!(button.index(), i);
    }
    assert!(!ButtonId::NON_SHUTTER.contains(&ButtonId::SHUTTER));
    assert_eq!(ButtonId::NON_SHUTTER.len() + 1, ButtonId::ALL.len());
}

#[test]
fn test_scripted_press_once_reads_pressed_once() {
    let mut buttons = ScriptedButtons::new();
    let handle = buttons.clone();

    handle.press_once(ButtonId::Key1);
    assert!(buttons.is_pressed(ButtonId::Key1));
    assert!(!buttons.is_pressed(ButtonId::Key1));
    assert_eq!(handle.queries(ButtonId::Key1), 2);
}

#[test]
fn test_scripted_hold_is_level_triggered() {
    let mut buttons = ScriptedButtons::new();
    buttons.hold(ButtonId::Up);
    buttons.hold(ButtonId::Left);

    // No edge detection and no mutual exclusion
    for _ in 0..3 {
        assert!(buttons.is_pressed(ButtonId::Up));
        assert!(buttons.is_pressed(ButtonId::Left));
    }
    assert!(!buttons.is_pressed(ButtonId::Down));

    buttons.release(ButtonId::Up);
    assert!(!buttons.is_pressed(ButtonId::Up));
}

#[test]
fn test_sample_reports_button() {
    let mut buttons = ScriptedButtons::new();
    buttons.hold(ButtonId::Key2);
    let event = buttons.sample(ButtonId::Key2);
    assert_eq!(
        event,
        ButtonEvent {
            button: ButtonId::Key2,
            pressed: true
        }
    );
    assert!(!buttons.sample(ButtonId::Key3).pressed);
}

#[test]
fn test_boxed_poller_delegates() {
    let handle = ScriptedButtons::new();
    let mut boxed: Box<dyn InputPoller> = Box::new(handle.clone());
    handle.press_once(ButtonId::Right);
    assert!(boxed.is_pressed(ButtonId::Right));
    assert!(!boxed.is_pressed(ButtonId::Right));
}

#[test]
fn test_keyboard_key_mapping() {
    assert_eq!(keyboard::button_for(KeyCode::Char(' ')), Some(ButtonId::Key1));
    assert_eq!(keyboard::button_for(KeyCode::Char('1')), Some(ButtonId::Key1));
    assert_eq!(keyboard::button_for(KeyCode::Enter), Some(ButtonId::Center));
    assert_eq!(keyboard::button_for(KeyCode::Down), Some(ButtonId::Down));
    assert_eq!(keyboard::button_for(KeyCode::Char('x')), None);
}

#[test]
fn test_keyboard_press_is_consumed_by_query() {
    let mut keyboard = KeyboardButtons::new(tokio_util::sync::CancellationToken::new());
    keyboard.pressed[ButtonId::Key1.index()].store(true, std::sync::atomic::Ordering::Relaxed);
    assert!(keyboard.is_pressed(ButtonId::Key1));
    assert!(!keyboard.is_pressed(ButtonId::Key1));
}

#[cfg(all(target_os = "linux", feature = "buttons"))]
#[test]
fn test_evdev_key_mapping_is_unique() {
    use std::collections::HashSet;
    let keys: HashSet<_> = ButtonId::ALL.iter().map(|b| gpio_keys::key_for(*b)).collect();
    assert_eq!(keys.len(), ButtonId::ALL.len());
}

#[cfg(all(target_os = "linux", feature = "buttons"))]
#[test]
fn test_evdev_open_missing_device() {
    let result = EvdevButtons::open("/dev/input/does-not-exist");
    assert!(matches!(result, Err(crate::error::InputError::DeviceOpen { .. })));
}
