use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

/// Key value as seen by the typing engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A single printable character, space included
    Char(char),
    Backspace,
    Tab,
    Escape,
    Enter,
    Shift,
    CapsLock,
    Control,
    Alt,
    Meta,
    /// Any other key whose value is not a single character (arrows, F-keys, ...)
    Named(String),
}

impl Key {
    /// Non-printable keys that never reach typing state
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Key::Tab
                | Key::Escape
                | Key::Enter
                | Key::Shift
                | Key::CapsLock
                | Key::Control
                | Key::Alt
                | Key::Meta
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keystroke {
    pub key: Key,
    pub modifiers: KeyModifiers,
}

impl Keystroke {
    pub fn new(key: Key, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c), KeyModifiers::NONE)
    }

    pub fn backspace() -> Self {
        Self::new(Key::Backspace, KeyModifiers::NONE)
    }

    pub fn space() -> Self {
        Self::char(' ')
    }

    /// Ctrl, Alt or Meta held. Shift is part of producing symbols and is fine.
    pub fn has_command_modifier(&self) -> bool {
        self.modifiers.intersects(
            KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::META | KeyModifiers::SUPER,
        )
    }

    /// Dropped before any state change
    pub fn is_rejected(&self) -> bool {
        self.has_command_modifier() || self.key.is_control()
    }
}

impl From<KeyEvent> for Keystroke {
    fn from(event: KeyEvent) -> Self {
        let key = match event.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab | KeyCode::BackTab => Key::Tab,
            KeyCode::Esc => Key::Escape,
            KeyCode::Enter => Key::Enter,
            KeyCode::CapsLock => Key::CapsLock,
            KeyCode::Modifier(m) => match m {
                ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Key::Shift,
                ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => Key::Control,
                ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => Key::Alt,
                ModifierKeyCode::LeftMeta
                | ModifierKeyCode::RightMeta
                | ModifierKeyCode::LeftSuper
                | ModifierKeyCode::RightSuper => Key::Meta,
                other => Key::Named(format!("{other:?}")),
            },
            KeyCode::Left => Key::Named("ArrowLeft".into()),
            KeyCode::Right => Key::Named("ArrowRight".into()),
            KeyCode::Up => Key::Named("ArrowUp".into()),
            KeyCode::Down => Key::Named("ArrowDown".into()),
            other => Key::Named(format!("{other:?}")),
        };
        Keystroke::new(key, event.modifiers)
    }
}
