//! Input state tracking

use std::collections::HashSet;

use glam::Vec2;

/// Keys the editor reacts to. Anything else is carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowLeft,
    ArrowDown,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Map a DOM-style `KeyboardEvent.code` (e.g. "KeyW", "ArrowUp").
    pub fn from_code(code: &str) -> Key {
        match code {
            "KeyW" => Key::W,
            "KeyA" => Key::A,
            "KeyS" => Key::S,
            "KeyD" => Key::D,
            "ArrowUp" => Key::ArrowUp,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowDown" => Key::ArrowDown,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }

    pub fn is_movement(&self) -> bool {
        !matches!(self, Key::Other(_))
    }
}

/// Canvas size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1.0,
            height: 1.0,
            device_pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    /// CSS-pixel pointer position → normalized device coordinates (y up).
    pub fn to_ndc(&self, pointer: Vec2) -> Vec2 {
        Vec2::new(
            pointer.x / self.width * 2.0 - 1.0,
            -(pointer.y / self.height) * 2.0 + 1.0,
        )
    }

    pub fn physical_size(&self) -> (u32, u32) {
        let dpr = self.device_pixel_ratio.max(0.0);
        (
            (self.width * dpr).round() as u32,
            (self.height * dpr).round() as u32,
        )
    }
}

/// Tracks keyboard and pointer state between host events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_pressed: HashSet<Key>,
    focused: bool,
    pointer_over: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.keys_pressed.insert(key);
    }

    pub fn release(&mut self, key: &Key) {
        self.keys_pressed.remove(key);
    }

    pub fn is_key_pressed(&self, key: &Key) -> bool {
        self.keys_pressed.contains(key)
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            // Key-up events are not delivered after focus is lost.
            self.keys_pressed.clear();
        }
    }

    pub fn set_pointer_over(&mut self, over: bool) {
        self.pointer_over = over;
    }

    /// The canvas accepts continuous movement while focused or hovered.
    pub fn is_active(&self) -> bool {
        self.focused || self.pointer_over
    }

    /// Held movement direction in screen axes (x right, y up), normalized.
    pub fn movement(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.is_key_pressed(&Key::W) || self.is_key_pressed(&Key::ArrowUp) {
            dir.y += 1.0;
        }
        if self.is_key_pressed(&Key::S) || self.is_key_pressed(&Key::ArrowDown) {
            dir.y -= 1.0;
        }
        if self.is_key_pressed(&Key::D) || self.is_key_pressed(&Key::ArrowRight) {
            dir.x += 1.0;
        }
        if self.is_key_pressed(&Key::A) || self.is_key_pressed(&Key::ArrowLeft) {
            dir.x -= 1.0;
        }
        dir.normalize_or_zero()
    }
}
