/// Tests for GroupedEvents

use super::*;

#[test]
fn test_events_start_idle() {
    let events = GroupedEvents::new();
    assert!(!events.quit);
    assert_eq!(events.keys_pressed, 0);
    assert!(!events.mouse_left && !events.mouse_right && !events.mouse_middle);
    assert!(events.last_mouse_motion.is_none());
}

#[test]
fn test_key_count_tracks_held_keys() {
    let mut events = GroupedEvents::new();
    events.key_pressed();
    events.key_pressed();
    events.key_released();
    assert_eq!(events.keys_pressed, 1);
}

#[test]
fn test_key_release_never_underflows() {
    let mut events = GroupedEvents::new();
    events.key_released();
    events.key_released();
    assert_eq!(events.keys_pressed, 0);
}

#[test]
fn test_mouse_buttons_are_independent() {
    let mut events = GroupedEvents::new();
    events.set_mouse_button(MouseButton::Right, true);
    events.set_mouse_button(MouseButton::Middle, true);
    events.set_mouse_button(MouseButton::Middle, false);

    assert!(!events.mouse_left);
    assert!(events.mouse_right);
    assert!(!events.mouse_middle);
}

#[test]
fn test_mouse_motion_records_timestamp() {
    let mut events = GroupedEvents::new();
    events.mouse_moved(12.0, 34.0);
    assert_eq!((events.mouse_x, events.mouse_y), (12.0, 34.0));
    assert!(events.last_mouse_motion.is_some());
}

#[test]
fn test_touch_maps_to_left_button() {
    let mut events = GroupedEvents::new();
    events.touch(100.0, 200.0, true);
    assert!(events.mouse_left);
    assert!(events.last_mouse_motion.is_some());

    events.touch(110.0, 210.0, false);
    assert!(!events.mouse_left);
    assert_eq!((events.mouse_x, events.mouse_y), (110.0, 210.0));
}
