use std::collections::HashSet;

/// Mouse buttons the viewport reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// The keys the editor binds.  Everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Digit1,
    Digit2,
    Digit3,
    T,
    Delete,
    Escape,
    Space,
    ShiftLeft,
    ShiftRight,
    Other(u32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
}

/// Window events as the UI shell forwards them.  Coordinates are viewport
/// pixels with the origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MousePress { button: MouseButton, x: f32, y: f32 },
    MouseMove { x: f32, y: f32 },
    MouseRelease { button: MouseButton, x: f32, y: f32 },
    /// Wheel delta in eighths of a degree (one notch is 120).
    Scroll { delta: f32 },
    KeyPress { key: KeyCode, modifiers: Modifiers },
    KeyRelease { key: KeyCode },
    Resize { width: f32, height: f32 },
}

/// State of the keyboard and mouse at a given moment.
///
/// The viewport feeds every [`InputEvent`] through [`InputState::apply`] and
/// then queries held buttons and the last movement delta.
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    mouse_pos: (f32, f32),
    /// movement since last time `consume_mouse_delta` was called
    mouse_delta: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Record what `event` says about held keys, buttons and the cursor.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::MousePress { button, x, y } => {
                self.set_mouse_position(x, y);
                self.mouse_delta = (0.0, 0.0);
                self.update_mouse_button(button, true);
            }
            InputEvent::MouseMove { x, y } => self.set_mouse_position(x, y),
            InputEvent::MouseRelease { button, x, y } => {
                self.set_mouse_position(x, y);
                self.update_mouse_button(button, false);
            }
            InputEvent::KeyPress { key, .. } => self.update_key(key, true),
            InputEvent::KeyRelease { key } => self.update_key(key, false),
            InputEvent::Scroll { .. } | InputEvent::Resize { .. } => {}
        }
    }

    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn shift_held(&self) -> bool {
        self.is_key_pressed(KeyCode::ShiftLeft) || self.is_key_pressed(KeyCode::ShiftRight)
    }

    pub fn update_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Update the cursor position; the delta accumulates until consumed.
    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        let (px, py) = self.mouse_pos;
        self.mouse_pos = (x, y);
        self.mouse_delta.0 += x - px;
        self.mouse_delta.1 += y - py;
    }

    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_pos
    }

    /// Retrieve and reset the mouse movement since the last call.
    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }
}
