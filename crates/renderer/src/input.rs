use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{Key, NamedKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Advance,
    TogglePause,
    Quit,
}

/// Maps a pressed key to a showcase command.
pub fn command_for_key(key: &Key) -> Option<Command> {
    match key {
        Key::Named(NamedKey::Space | NamedKey::ArrowRight) => Some(Command::Advance),
        Key::Named(NamedKey::Escape) => Some(Command::Quit),
        Key::Character(value) => match value.to_ascii_lowercase().as_str() {
            " " | "n" => Some(Command::Advance),
            "p" => Some(Command::TogglePause),
            "q" => Some(Command::Quit),
            _ => None,
        },
        _ => None,
    }
}

pub fn command_for_button(button: MouseButton, state: ElementState) -> Option<Command> {
    match (button, state) {
        (MouseButton::Right, ElementState::Pressed) => Some(Command::Advance),
        _ => None,
    }
}

/// Left-button drag tracking for the interactive effect.
#[derive(Debug, Default)]
pub struct PointerState {
    position: Option<PhysicalPosition<f64>>,
    is_pressed: bool,
}

impl PointerState {
    pub fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.position = Some(position);
    }

    pub fn handle_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.is_pressed = state == ElementState::Pressed;
        }
    }

    /// Current position while the left button is held.
    pub fn drag_position(&self) -> Option<PhysicalPosition<f64>> {
        if self.is_pressed {
            self.position
        } else {
            None
        }
    }
}
