#![forbid(unsafe_code)]

//! Input events delivered to a [`Model`](crate::program::Model).
//!
//! Only the input a scrolling list reacts to is mapped: key presses for the
//! controls and navigation, the mouse wheel, and terminal resizes. Anything
//! else crossterm reports is dropped at the boundary.

use bitflags::bitflags;
use crossterm::event as cte;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),
    /// One notch of the mouse wheel.
    Wheel(Wheel),
    /// Terminal was resized.
    Resize {
        /// New terminal width in columns.
        width: u16,
        /// New terminal height in rows.
        height: u16,
    },
}

impl Event {
    /// Convert a crossterm event. Returns `None` for events with no mapping.
    #[must_use]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) => KeyEvent::from_crossterm(key).map(Event::Key),
            cte::Event::Mouse(mouse) => Wheel::from_crossterm(mouse.kind).map(Event::Wheel),
            cte::Event::Resize(width, height) => Some(Event::Resize { width, height }),
            cte::Event::FocusGained | cte::Event::FocusLost | cte::Event::Paste(_) => None,
        }
    }

    /// Shorthand for a plain key press.
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Event::Key(KeyEvent::new(code))
    }

    /// Shorthand for a plain character key press.
    #[must_use]
    pub fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Unmodified key press.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is the character key `c`.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }

    /// Whether Ctrl is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    fn from_crossterm(event: cte::KeyEvent) -> Option<Self> {
        let code = match event.code {
            cte::KeyCode::Char(c) => KeyCode::Char(c),
            other => NAMED_KEYS
                .iter()
                .find_map(|&(ct, code)| (ct == other).then_some(code))?,
        };
        let kind = match event.kind {
            cte::KeyEventKind::Press => KeyEventKind::Press,
            cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
            cte::KeyEventKind::Release => KeyEventKind::Release,
        };
        Some(Self {
            code,
            modifiers: Modifiers::from_crossterm(event.modifiers),
            kind,
        })
    }
}

/// Keys the list understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Escape,
    Tab,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

const NAMED_KEYS: [(cte::KeyCode, KeyCode); 8] = [
    (cte::KeyCode::Esc, KeyCode::Escape),
    (cte::KeyCode::Tab, KeyCode::Tab),
    (cte::KeyCode::Up, KeyCode::Up),
    (cte::KeyCode::Down, KeyCode::Down),
    (cte::KeyCode::PageUp, KeyCode::PageUp),
    (cte::KeyCode::PageDown, KeyCode::PageDown),
    (cte::KeyCode::Home, KeyCode::Home),
    (cte::KeyCode::End, KeyCode::End),
];

/// Press, auto-repeat, or release. Terminals without the kitty keyboard
/// protocol only ever report `Press`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1;
        const ALT = 1 << 1;
        const CTRL = 1 << 2;
    }
}

impl Modifiers {
    fn from_crossterm(modifiers: cte::KeyModifiers) -> Self {
        [
            (cte::KeyModifiers::SHIFT, Self::SHIFT),
            (cte::KeyModifiers::ALT, Self::ALT),
            (cte::KeyModifiers::CONTROL, Self::CTRL),
        ]
        .into_iter()
        .filter(|(ct, _)| modifiers.contains(*ct))
        .fold(Self::empty(), |acc, (_, m)| acc | m)
    }
}

/// Mouse wheel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wheel {
    Up,
    Down,
}

impl Wheel {
    fn from_crossterm(kind: cte::MouseEventKind) -> Option<Self> {
        match kind {
            cte::MouseEventKind::ScrollUp => Some(Self::Up),
            cte::MouseEventKind::ScrollDown => Some(Self::Down),
            _ => None,
        }
    }
}
