//! Mouse and keyboard state for the orbit controls.

use glam::Vec2;
use std::collections::HashSet;

/// Lines-to-pixels factor for wheels that report whole notches.
const PIXELS_PER_LINE: f32 = 40.0;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,

    /// Last known cursor position in window coordinates.
    mouse_position: Option<Vec2>,
    /// Cursor movement delta for this frame.
    mouse_delta: Vec2,
    /// Cursor movement collected since the last `begin_frame`.
    accumulated_delta: Vec2,

    /// Wheel movement for this frame, in pixels (positive = away from the user).
    scroll: f32,
    accumulated_scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the input collected since the previous frame. Call once per frame
    /// before reading deltas.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
        self.scroll = self.accumulated_scroll;
        self.accumulated_scroll = 0.0;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process a cursor position update. The first position after the cursor
    /// enters the window produces no delta.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        let position = Vec2::new(position.0 as f32, position.1 as f32);
        if let Some(previous) = self.mouse_position {
            self.accumulated_delta += position - previous;
        }
        self.mouse_position = Some(position);
    }

    /// Forget the cursor position (cursor left the window).
    pub fn process_cursor_left(&mut self) {
        self.mouse_position = None;
    }

    /// Process a wheel event.
    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        self.accumulated_scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y * PIXELS_PER_LINE,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
        };
    }

    /// Drop held buttons and keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys_held.clear();
        self.mouse_held.clear();
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Get the wheel movement for this frame, in pixels.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Drag delta while the orbit button (left) is held.
    pub fn orbit_drag(&self) -> Vec2 {
        if self.is_mouse_held(MouseButton::Left) {
            self.mouse_delta
        } else {
            Vec2::ZERO
        }
    }

    /// Drag delta while a pan button (right or middle) is held.
    pub fn pan_drag(&self) -> Vec2 {
        if self.is_mouse_held(MouseButton::Right) || self.is_mouse_held(MouseButton::Middle) {
            self.mouse_delta
        } else {
            Vec2::ZERO
        }
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton, MouseScrollDelta};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_motion_accumulates_until_frame() {
        let mut input = InputState::new();
        input.process_cursor_position((10.0, 10.0));
        input.process_cursor_position((14.0, 7.0));
        input.process_cursor_position((20.0, 5.0));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::new(10.0, -5.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn first_cursor_position_after_leaving_has_no_delta() {
        let mut input = InputState::new();
        input.process_cursor_position((0.0, 0.0));
        input.process_cursor_left();
        input.process_cursor_position((300.0, 200.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn drags_depend_on_held_button() {
        let mut input = InputState::new();
        input.process_cursor_position((0.0, 0.0));
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.process_cursor_position((3.0, 4.0));
        input.begin_frame();
        assert_eq!(input.orbit_drag(), Vec2::new(3.0, 4.0));
        assert_eq!(input.pan_drag(), Vec2::ZERO);

        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        input.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        input.process_cursor_position((4.0, 4.0));
        input.begin_frame();
        assert_eq!(input.orbit_drag(), Vec2::ZERO);
        assert_eq!(input.pan_drag(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn scroll_lines_convert_to_pixels() {
        let mut input = InputState::new();
        input.process_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        input.process_scroll(MouseScrollDelta::LineDelta(0.0, 0.5));
        input.begin_frame();
        assert_eq!(input.scroll(), 60.0);
        input.begin_frame();
        assert_eq!(input.scroll(), 0.0);
    }

    #[test]
    fn key_pressed_only_on_first_frame() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::Escape));
        input.begin_frame();
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert!(!input.is_key_pressed(KeyCode::Escape));
        assert!(input.is_key_held(KeyCode::Escape));
    }
}
