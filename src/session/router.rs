//! Key-event routing: classify each keystroke into accept, dismiss,
//! pass-through-and-clear, or pass-through-and-maybe-trigger.
//!
//! Runs on keydown, before the editor applies the keystroke. The caller is
//! responsible for scheduling a trigger after the editor has updated, and
//! for skipping it when `force_trigger` is unset and the document text
//! provably did not change.

use super::types::{Key, KeyEvent, KeyOutcome};
use super::CompletionSession;
use crate::buffer::TextBuffer;
use crate::unicode;

/// Keys some editors auto-close; the keystroke may not change the document,
/// so triggering is forced.
const AUTO_CLOSING: [char; 5] = ['"', '\'', ')', '}', ']'];

impl CompletionSession {
    /// Route one key event against the current session state.
    pub fn handle_key(&mut self, buffer: &mut dyn TextBuffer, event: &KeyEvent) -> KeyOutcome {
        let mut force_trigger = false;
        if event.ctrl {
            if event.key == Key::Char(' ') {
                force_trigger = true;
            } else {
                // Other Ctrl chords belong to the editor.
                return KeyOutcome::pass_through(false);
            }
        }
        if let Key::Char(c) = &event.key {
            if AUTO_CLOSING.contains(c) {
                force_trigger = true;
            }
        }
        if event.composing {
            self.clear_completion("composing");
            return KeyOutcome::pass_through(force_trigger);
        }
        if event.key.is_navigation() {
            self.clear_completion("navigation key");
            return KeyOutcome::pass_through(force_trigger);
        }

        if !event.has_modifier() {
            if self.config.handling.accept && event.key == self.config.bindings.accept {
                let result = self.accept_completion(buffer);
                if result.accepted {
                    return KeyOutcome {
                        consume: Some(true),
                        force_trigger,
                        accepted_completion_id: result.completion_id,
                    };
                }
            }
            if self.config.handling.dismiss
                && event.key == self.config.bindings.dismiss
                && self.clear_completion("user dismissed")
            {
                return KeyOutcome::consumed(force_trigger);
            }
        }

        let text = buffer.text();
        let cursor = buffer.cursor_code_units();
        let char_before_cursor = unicode::char_before(&text, cursor);
        let updated = self.any_marker_updated(&event.key, cursor, char_before_cursor);
        // A key that neither sustains the illusion nor is printable (caps
        // lock, modifiers) must not clear the completion.
        if !updated && matches!(event.key, Key::Char(_)) {
            self.clear_completion("key did not match ghost text");
        }
        if event.key == Key::Enter {
            self.clear_completion("enter");
        }
        KeyOutcome::fall_through(force_trigger)
    }
}
