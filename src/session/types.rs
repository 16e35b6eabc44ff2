//! Shared session types: key events, routing outcomes, ghost decorations,
//! and the record of the currently rendered suggestion.

use crate::protocol::CompletionItem;

/// A key as reported by a browser keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A single printable character (`event.key.length == 1`).
    Char(char),
    Tab,
    Escape,
    Enter,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    /// Any other named key (CapsLock, Shift, F-keys, ...).
    Other(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_event_key(key: &str) -> Key {
        match key {
            "Tab" => Key::Tab,
            "Escape" => Key::Escape,
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other(key.to_string()),
                }
            }
        }
    }

    pub(crate) fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::Delete
                | Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }
}

/// A keyboard event with its modifier and composition state.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    /// Whether an input-method composition is in progress.
    pub composing: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
            composing: false,
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c))
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_composing(mut self) -> Self {
        self.composing = true;
        self
    }

    pub(crate) fn has_modifier(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.meta
    }
}

/// Accept/dismiss key bindings, modifier-free by contract.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub accept: Key,
    pub dismiss: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            accept: Key::Tab,
            dismiss: Key::Escape,
        }
    }
}

/// Per-editor session behavior. Adapters that route accept/dismiss through
/// their own command system disable the corresponding handling here.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub bindings: KeyBindings,
    pub handling: KeyHandling,
}

/// Which of the bound keys this session handles directly.
#[derive(Debug, Clone)]
pub struct KeyHandling {
    pub accept: bool,
    pub dismiss: bool,
}

impl Default for KeyHandling {
    fn default() -> Self {
        Self {
            accept: true,
            dismiss: true,
        }
    }
}

/// Decision for one key event.
///
/// `consume` is three-valued: `Some(true)` means the adapter must swallow
/// the event, `Some(false)` means it must let the editor handle it and stop,
/// and `None` means fall through to normal editor behavior and schedule a
/// trigger afterwards.
#[derive(Debug, Clone, Default)]
pub struct KeyOutcome {
    pub consume: Option<bool>,
    pub force_trigger: bool,
    /// Set when this event accepted a completion with a payload; the caller
    /// reports acceptance telemetry with this id.
    pub accepted_completion_id: Option<String>,
}

impl KeyOutcome {
    pub(crate) fn pass_through(force_trigger: bool) -> Self {
        Self {
            consume: Some(false),
            force_trigger,
            accepted_completion_id: None,
        }
    }

    pub(crate) fn consumed(force_trigger: bool) -> Self {
        Self {
            consume: Some(true),
            force_trigger,
            accepted_completion_id: None,
        }
    }

    pub(crate) fn fall_through(force_trigger: bool) -> Self {
        Self {
            consume: None,
            force_trigger,
            accepted_completion_id: None,
        }
    }
}

/// Result of an accept attempt.
#[derive(Debug, Clone, Default)]
pub struct AcceptResult {
    /// Whether a session existed (the event should be consumed).
    pub accepted: bool,
    /// Telemetry id; absent when the item carried no completion payload.
    pub completion_id: Option<String>,
}

/// A render-scoped resource released when the session clears: keybinding
/// registrations, DOM nodes, subscriptions. Invoked exactly once on every
/// exit path.
pub trait Disposable {
    fn dispose(&mut self);
}

/// One inline ghost-text fragment. The anchor moves with the typing
/// illusion: consuming a character advances it, Backspace retracts it.
#[derive(Debug, Clone)]
pub struct GhostMarker {
    pub(crate) offset: u32,
    pub(crate) text: String,
}

impl GhostMarker {
    /// Anchor position in UTF-16 code units.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Remaining (unconsumed) ghost text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Full ghost lines rendered below a buffer line.
#[derive(Debug, Clone)]
pub struct GhostBlock {
    pub(crate) after_line: u32,
    pub(crate) lines: Vec<String>,
}

impl GhostBlock {
    /// Zero-based buffer line the block is rendered after.
    pub fn after_line(&self) -> u32 {
        self.after_line
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Requesting,
    Rendering,
}

/// A request issued but not yet resolved. Its generation is the session's
/// `generation` at issue time; only that token's response can reach it.
pub(crate) struct PendingRequest {
    /// Cursor snapshot at trigger time, re-validated on arrival.
    pub cursor: u32,
}

/// The single rendered suggestion and everything needed to accept or clear
/// it. Exactly one exists at a time across the session.
pub(crate) struct ActiveCompletion {
    pub item: CompletionItem,
    pub markers: Vec<GhostMarker>,
    pub blocks: Vec<GhostBlock>,
    /// Replacement range in the current buffer, UTF-16 code units.
    pub start: u32,
    pub end: u32,
    /// Buffer text at render time; divergence forces a clear.
    pub doc_snapshot: String,
    pub disposables: Vec<Box<dyn Disposable>>,
}
