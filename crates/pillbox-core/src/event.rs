#![forbid(unsafe_code)]

//! Input events as pills see them.
//!
//! A host converts backend input into [`Event`] before dispatch. Only what a
//! pill can react to is modeled: activation keys, focus traversal keys, and
//! pointer presses. Anything else a backend reports is dropped at the
//! conversion boundary.
//!
//! Coordinates are 0-indexed cells. Backends that cannot tell press from
//! release report `KeyEventKind::Press`.

use bitflags::bitflags;
#[cfg(not(target_arch = "wasm32"))]
use crossterm::event as cte;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The host surface changed size.
    Resize { width: u16, height: u16 },
    /// The host window gained (`true`) or lost (`false`) focus.
    Focus(bool),
}

impl Event {
    /// Convert a crossterm event.
    ///
    /// Pastes, horizontal scrolling, and keys with no [`KeyCode`]
    /// counterpart yield `None`.
    #[must_use]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) => KeyEvent::try_from(key).ok().map(Self::Key),
            cte::Event::Mouse(mouse) => MouseEvent::try_from(mouse).ok().map(Self::Mouse),
            cte::Event::Resize(width, height) => Some(Self::Resize { width, height }),
            cte::Event::FocusGained => Some(Self::Focus(true)),
            cte::Event::FocusLost => Some(Self::Focus(false)),
            cte::Event::Paste(_) => None,
        }
    }

    /// A key-down of `code` with no modifiers.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// A left-button press at `(x, y)`.
    #[must_use]
    pub const fn left_click(x: u16, y: u16) -> Self {
        Self::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), x, y))
    }
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

/// A key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A press of `code` with no modifiers.
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

    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }

    /// Press or auto-repeat. Releases never trigger pill actions.
    #[must_use]
    pub const fn is_down(&self) -> bool {
        !matches!(self.kind, KeyEventKind::Release)
    }

    /// `Enter` or `Space`, the keys that press a focused button.
    #[must_use]
    pub fn is_activation(&self) -> bool {
        self.code == KeyCode::Enter || self.is_char(' ')
    }
}

/// Keys a pill host can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character. Space arrives as `Char(' ')`.
    Char(char),
    Enter,
    Escape,
    Tab,
    /// `Shift+Tab`.
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
        /// Super, Hyper, and Meta all fold into this bit.
        const SUPER = 1 << 3;
    }
}

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

/// A pointer event at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// A left-button press, the only pointer event that activates a pill.
    #[must_use]
    pub const fn is_primary_activation(&self) -> bool {
        matches!(self.kind, MouseEventKind::Down(MouseButton::Left))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    Scroll(ScrollDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
}

// ---------------------------------------------------------------------------
// Crossterm conversion
// ---------------------------------------------------------------------------

/// The backend event has no pill-level meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported;

#[cfg(not(target_arch = "wasm32"))]
impl TryFrom<cte::KeyEvent> for KeyEvent {
    type Error = Unsupported;

    fn try_from(event: cte::KeyEvent) -> Result<Self, Self::Error> {
        let code = match event.code {
            cte::KeyCode::Char(c) => KeyCode::Char(c),
            cte::KeyCode::Enter => KeyCode::Enter,
            cte::KeyCode::Esc => KeyCode::Escape,
            cte::KeyCode::Tab => KeyCode::Tab,
            cte::KeyCode::BackTab => KeyCode::BackTab,
            cte::KeyCode::Backspace => KeyCode::Backspace,
            cte::KeyCode::Delete => KeyCode::Delete,
            cte::KeyCode::Left => KeyCode::Left,
            cte::KeyCode::Right => KeyCode::Right,
            cte::KeyCode::Up => KeyCode::Up,
            cte::KeyCode::Down => KeyCode::Down,
            cte::KeyCode::Home => KeyCode::Home,
            cte::KeyCode::End => KeyCode::End,
            _ => return Err(Unsupported),
        };
        let kind = match event.kind {
            cte::KeyEventKind::Press => KeyEventKind::Press,
            cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
            cte::KeyEventKind::Release => KeyEventKind::Release,
        };
        Ok(Self::new(code)
            .with_modifiers(event.modifiers.into())
            .with_kind(kind))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TryFrom<cte::MouseEvent> for MouseEvent {
    type Error = Unsupported;

    fn try_from(event: cte::MouseEvent) -> Result<Self, Self::Error> {
        let kind = match event.kind {
            cte::MouseEventKind::Down(button) => MouseEventKind::Down(button.into()),
            cte::MouseEventKind::Up(button) => MouseEventKind::Up(button.into()),
            cte::MouseEventKind::Drag(button) => MouseEventKind::Drag(button.into()),
            cte::MouseEventKind::Moved => MouseEventKind::Moved,
            cte::MouseEventKind::ScrollUp => MouseEventKind::Scroll(ScrollDirection::Up),
            cte::MouseEventKind::ScrollDown => MouseEventKind::Scroll(ScrollDirection::Down),
            cte::MouseEventKind::ScrollLeft | cte::MouseEventKind::ScrollRight => {
                return Err(Unsupported);
            }
        };
        Ok(Self::new(kind, event.column, event.row).with_modifiers(event.modifiers.into()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<cte::MouseButton> for MouseButton {
    fn from(button: cte::MouseButton) -> Self {
        match button {
            cte::MouseButton::Left => Self::Left,
            cte::MouseButton::Right => Self::Right,
            cte::MouseButton::Middle => Self::Middle,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<cte::KeyModifiers> for Modifiers {
    fn from(modifiers: cte::KeyModifiers) -> Self {
        let pairs = [
            (cte::KeyModifiers::SHIFT, Self::SHIFT),
            (cte::KeyModifiers::ALT, Self::ALT),
            (cte::KeyModifiers::CONTROL, Self::CTRL),
            (cte::KeyModifiers::SUPER, Self::SUPER),
            (cte::KeyModifiers::HYPER, Self::SUPER),
            (cte::KeyModifiers::META, Self::SUPER),
        ];
        pairs
            .into_iter()
            .filter(|(backend, _)| modifiers.contains(*backend))
            .fold(Self::empty(), |acc, (_, ours)| acc | ours)
    }
}
