//! The completion session: the state machine owning at most one in-flight
//! request and at most one rendered suggestion.
//!
//! States are `Idle → Requesting → Rendering`, with accept and clear
//! returning to `Idle`. A monotonically increasing generation token makes
//! triggering last-wins: a response is applied only if it carries the
//! latest generation *and* the cursor still sits where the request was
//! issued — the position check is the authoritative race guard, so
//! correctness never depends on cancellation succeeding.

mod render;
mod router;
mod types;

#[cfg(test)]
mod tests;

pub use types::{
    AcceptResult, Disposable, GhostBlock, GhostMarker, Key, KeyBindings, KeyEvent, KeyHandling,
    KeyOutcome, SessionConfig, SessionPhase,
};

use tracing::{debug, error};

use crate::buffer::TextBuffer;
use crate::protocol::CompletionItem;
use crate::unicode;

use types::{ActiveCompletion, PendingRequest};

pub struct CompletionSession {
    config: SessionConfig,
    /// Latest issued request token; only this generation's response applies.
    generation: u64,
    pending: Option<PendingRequest>,
    current: Option<ActiveCompletion>,
}

impl CompletionSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            generation: 0,
            pending: None,
            current: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.current.is_some() {
            SessionPhase::Rendering
        } else if self.pending.is_some() {
            SessionPhase::Requesting
        } else {
            SessionPhase::Idle
        }
    }

    /// Latest request generation, for staleness checks.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Markers of the rendered suggestion, in part order.
    pub fn markers(&self) -> &[GhostMarker] {
        self.current.as_ref().map_or(&[], |c| c.markers.as_slice())
    }

    /// Block decorations of the rendered suggestion.
    pub fn blocks(&self) -> &[GhostBlock] {
        self.current.as_ref().map_or(&[], |c| c.blocks.as_slice())
    }

    /// Record a new outstanding request, superseding any previous one, and
    /// return its generation token. The rendered suggestion (if any) stays
    /// visible until the response arrives; the typing illusion depends on
    /// that.
    pub fn begin_request(&mut self, cursor: u32) -> u64 {
        self.generation += 1;
        self.pending = Some(PendingRequest { cursor });
        self.generation
    }

    /// Apply a resolved request.
    ///
    /// `outcome` is `None` for a transport error or cancellation: the
    /// pending request resolves but the rendered suggestion is left alone.
    /// A `Some` outcome replaces the rendered suggestion if the cursor
    /// still matches the trigger snapshot and a candidate exists. Returns
    /// whether a suggestion was rendered.
    pub fn receive_completions<F>(
        &mut self,
        generation: u64,
        buffer: &dyn TextBuffer,
        outcome: Option<Vec<CompletionItem>>,
        prefix_byte_offset: u64,
        create_disposables: F,
    ) -> bool
    where
        F: FnOnce() -> Vec<Box<dyn Disposable>>,
    {
        if generation != self.generation {
            debug!(generation, latest = self.generation, "discarding superseded response");
            return false;
        }
        let pending = self.pending.take();
        let Some(items) = outcome else {
            return false;
        };
        self.clear_completion("about to replace completion");
        let Some(pending) = pending else {
            return false;
        };
        if buffer.cursor_code_units() != pending.cursor {
            debug!("discarding response: cursor moved since request");
            return false;
        }
        let Some(item) = items.into_iter().next() else {
            return false;
        };
        self.render_completion(buffer, item, prefix_byte_offset, create_disposables);
        true
    }

    /// Splice the rendered suggestion into the buffer.
    ///
    /// Clears first, replaces `[start, end)` with the completion text,
    /// then inserts the suffix at the new cursor and repositions it by the
    /// suffix byte delta. An item without a completion payload is a logged
    /// no-op accept.
    pub fn accept_completion(&mut self, buffer: &mut dyn TextBuffer) -> AcceptResult {
        let Some(active) = self.current.take() else {
            return AcceptResult::default();
        };
        let ActiveCompletion {
            item,
            start,
            end,
            disposables,
            ..
        } = active;
        Self::release(disposables, "about to accept completion");

        let Some(completion) = item.completion else {
            error!("accepted completion has no payload");
            return AcceptResult {
                accepted: true,
                completion_id: None,
            };
        };

        buffer.set_cursor_code_units(start);
        buffer.splice(start, end, &completion.text);
        let mut cursor = start + unicode::utf16_len(&completion.text);
        buffer.set_cursor_code_units(cursor);

        if let Some(suffix) = item.suffix.filter(|s| !s.text.is_empty()) {
            buffer.splice(cursor, cursor, &suffix.text);
            cursor += unicode::utf16_len(&suffix.text);
            let text = buffer.text();
            let end_bytes = unicode::code_units_to_bytes(&text, cursor) as i64;
            let target = (end_bytes + suffix.delta_cursor_offset).clamp(0, text.len() as i64);
            cursor = unicode::bytes_to_code_units(&text, target as u64);
            buffer.set_cursor_code_units(cursor);
        }

        AcceptResult {
            accepted: true,
            completion_id: Some(completion.completion_id),
        }
    }

    /// Dispose the rendered suggestion and drop any outstanding request.
    /// Idempotent; returns whether a rendered suggestion existed. `reason`
    /// is diagnostic only and never affects behavior.
    pub fn clear_completion(&mut self, reason: &str) -> bool {
        self.pending = None;
        let Some(active) = self.current.take() else {
            return false;
        };
        Self::release(active.disposables, reason);
        true
    }

    /// Whether the live buffer still matches the text captured at render
    /// time. Editors with concurrent editing clear eagerly when it does not.
    pub fn document_matches(&self, buffer: &dyn TextBuffer) -> bool {
        match &self.current {
            Some(active) => active.doc_snapshot == buffer.text(),
            None => true,
        }
    }

    fn release(disposables: Vec<Box<dyn Disposable>>, reason: &str) {
        debug!(reason, "clearing completion");
        for mut disposable in disposables {
            disposable.dispose();
        }
    }
}
