//! Ghost-text rendering and the fake-typing illusion.
//!
//! Inline parts become zero-width markers anchored at their byte-derived
//! position; block parts become full decorative lines below the cursor's
//! line. When no inline part lands exactly at the cursor, an empty marker is
//! synthesized there so the illusion still has an anchor to update — this
//! covers the Backspace-at-end-of-line case where no inline part exists.

use super::types::{ActiveCompletion, Disposable, GhostBlock, GhostMarker, Key};
use super::CompletionSession;
use crate::buffer::TextBuffer;
use crate::protocol::{CompletionItem, CompletionPartKind};
use crate::unicode;

impl GhostMarker {
    /// Typing-illusion step for one key at one marker.
    ///
    /// A printable character matching the front of the remaining text is
    /// consumed by the real keystroke: trim it and advance the anchor.
    /// Backspace undoes the illusion by prepending the character that is
    /// about to be deleted. Anything else is not handled. Only applies at
    /// the exact cursor position, and a remaining text of exactly one
    /// character is never trimmed: some editors auto-close that final
    /// pair character and typing through it would desynchronize the
    /// overlay.
    pub(crate) fn maybe_update(
        &mut self,
        key: &Key,
        cursor: u32,
        char_before_cursor: Option<char>,
    ) -> bool {
        if self.offset != cursor {
            return false;
        }
        if *key == Key::Backspace {
            let Some(ch) = char_before_cursor else {
                return false;
            };
            self.text.insert(0, ch);
            self.offset = self.offset.saturating_sub(ch.len_utf16() as u32);
            return true;
        }
        let Key::Char(ch) = key else {
            return false;
        };
        if self.text.chars().count() == 1 {
            return false;
        }
        if !self.text.starts_with(*ch) {
            return false;
        }
        self.text.remove(0);
        self.offset += ch.len_utf16() as u32;
        true
    }
}

impl CompletionSession {
    /// Materialize a suggestion, atomically replacing any rendered one.
    pub(crate) fn render_completion<F>(
        &mut self,
        buffer: &dyn TextBuffer,
        item: CompletionItem,
        prefix_byte_offset: u64,
        create_disposables: F,
    ) where
        F: FnOnce() -> Vec<Box<dyn Disposable>>,
    {
        self.clear_completion("about to render new completion");

        let text = buffer.text();
        let cursor = buffer.cursor_code_units();
        let to_units =
            |byte: u64| unicode::bytes_to_code_units(&text, byte.saturating_sub(prefix_byte_offset));

        let range = item.range.unwrap_or_default();
        let start = to_units(range.start_offset);
        let end = to_units(range.end_offset);
        let cursor_line = unicode::position_at(&text, cursor).line;

        let mut markers = Vec::new();
        let mut blocks = Vec::new();
        let mut inline_at_cursor = false;
        for part in &item.completion_parts {
            match part.kind {
                CompletionPartKind::Inline => {
                    let offset = to_units(part.offset);
                    if offset == cursor {
                        inline_at_cursor = true;
                    }
                    markers.push(GhostMarker {
                        offset,
                        text: part.text.clone(),
                    });
                }
                CompletionPartKind::Block => {
                    let lines = part
                        .text
                        .split('\n')
                        .map(|line| {
                            // An empty decorative line collapses; render a
                            // single space to preserve layout.
                            if line.is_empty() {
                                " ".to_string()
                            } else {
                                line.to_string()
                            }
                        })
                        .collect();
                    blocks.push(GhostBlock {
                        after_line: cursor_line,
                        lines,
                    });
                }
                CompletionPartKind::Unspecified => {}
            }
        }
        if !inline_at_cursor {
            markers.push(GhostMarker {
                offset: cursor,
                text: String::new(),
            });
        }

        self.current = Some(ActiveCompletion {
            item,
            markers,
            blocks,
            start,
            end,
            doc_snapshot: text,
            disposables: create_disposables(),
        });
    }

    /// Run the typing illusion over the rendered markers; the first marker
    /// that handles the key wins.
    pub(crate) fn any_marker_updated(
        &mut self,
        key: &Key,
        cursor: u32,
        char_before_cursor: Option<char>,
    ) -> bool {
        let Some(active) = self.current.as_mut() else {
            return false;
        };
        active
            .markers
            .iter_mut()
            .any(|marker| marker.maybe_update(key, cursor, char_before_cursor))
    }
}
