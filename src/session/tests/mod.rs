mod proptest_fsm;
mod router;

use std::cell::Cell;
use std::rc::Rc;

use crate::buffer::{CellBuffer, TextBuffer};
use crate::language::Language;
use crate::protocol::{
    Completion, CompletionItem, CompletionPart, CompletionPartKind, OffsetRange,
};
use crate::unicode;

use super::types::Disposable;
use super::{CompletionSession, SessionConfig};

pub(super) fn session() -> CompletionSession {
    CompletionSession::new(SessionConfig::default())
}

pub(super) fn buffer(text: &str) -> CellBuffer {
    CellBuffer::new(text, Language::Python)
}

/// An item whose completion text doubles as a single inline part at `at`
/// (prompt bytes), replacing the empty range there.
pub(super) fn inline_item(text: &str, at: u64) -> CompletionItem {
    CompletionItem {
        completion: Some(Completion {
            completion_id: "c-1".to_string(),
            text: text.to_string(),
        }),
        range: Some(OffsetRange {
            start_offset: at,
            end_offset: at,
        }),
        suffix: None,
        completion_parts: vec![CompletionPart {
            kind: CompletionPartKind::Inline,
            text: text.to_string(),
            offset: at,
        }],
    }
}

/// Drive a full trigger/response cycle so `item` is rendered.
pub(super) fn render(session: &mut CompletionSession, buffer: &CellBuffer, item: CompletionItem) {
    let generation = session.begin_request(buffer.cursor_code_units());
    assert!(session.receive_completions(generation, buffer, Some(vec![item]), 0, Vec::new));
}

/// Apply a printable keystroke to the buffer the way an editor would:
/// insert at the cursor and advance it.
pub(super) fn type_char(buffer: &mut CellBuffer, ch: char) {
    let cursor = buffer.cursor_code_units();
    buffer.splice(cursor, cursor, &ch.to_string());
    buffer.set_cursor_code_units(cursor + ch.len_utf16() as u32);
}

/// Apply a backspace to the buffer: remove the character before the cursor.
pub(super) fn apply_backspace(buffer: &mut CellBuffer) {
    let cursor = buffer.cursor_code_units();
    let Some(ch) = unicode::char_before(&buffer.text(), cursor) else {
        return;
    };
    let width = ch.len_utf16() as u32;
    buffer.splice(cursor - width, cursor, "");
    buffer.set_cursor_code_units(cursor - width);
}

/// Disposable that counts its dispose calls.
pub(super) struct TrackingDisposable(pub Rc<Cell<u32>>);

impl Disposable for TrackingDisposable {
    fn dispose(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}
