//! The engine facade: one editor instance's session, its fetch worker, and
//! the provider collaborator, wired together.
//!
//! Adapters call `handle_key` from their keydown hook, `trigger_completion`
//! from the deferred (post-keystroke) callback, and `poll` when results may
//! be ready. Acceptance telemetry is dispatched here so the session itself
//! stays a pure state machine.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::buffer::TextBuffer;
use crate::context::{assemble_prompt, ContextRequest, PromptCell};
use crate::protocol::{
    AcceptCompletionRequest, Document, EditorOptions, GetCompletionsRequest, Metadata,
    EXTENSION_NAME, EXTENSION_VERSION,
};
use crate::session::{CompletionSession, Disposable, GhostBlock, GhostMarker, KeyEvent, KeyOutcome, SessionPhase};
use crate::settings::EngineSettings;
use crate::worker::{CompletionProvider, CompletionWork, FetchWorker, HealthSink};

/// Identity of the hosting editor, reported in request metadata.
#[derive(Debug, Clone)]
pub struct IdeInfo {
    pub name: String,
    pub version: String,
}

/// Produces render-scoped resources (e.g. keybinding registrations) each
/// time a suggestion is rendered.
pub type DisposableFactory = Box<dyn Fn() -> Vec<Box<dyn Disposable>> + Send>;

/// Per-trigger inputs beyond the current buffer itself.
pub struct TriggerOptions<'a> {
    /// All visible cells in document order; empty outside notebooks.
    pub cells: &'a [PromptCell<'a>],
    /// Position of the current buffer within `cells`, if it is one of them.
    pub current_index: Option<usize>,
    /// Output-augmented variant of the current cell text.
    pub current_text_with_output: Option<&'a str>,
    pub is_notebook: bool,
    /// Editor-native language identifier for the request document.
    pub editor_language: &'a str,
    pub editor_options: EditorOptions,
    pub relative_path: Option<&'a str>,
    pub absolute_path: Option<&'a str>,
}

impl Default for TriggerOptions<'_> {
    fn default() -> Self {
        Self {
            cells: &[],
            current_index: None,
            current_text_with_output: None,
            is_notebook: false,
            editor_language: "",
            editor_options: EditorOptions::default(),
            relative_path: None,
            absolute_path: None,
        }
    }
}

pub struct CompletionEngine {
    session: CompletionSession,
    worker: FetchWorker,
    provider: Arc<dyn CompletionProvider>,
    settings: EngineSettings,
    ide: IdeInfo,
    session_id: String,
    request_counter: u64,
    disposable_factory: Option<DisposableFactory>,
}

impl CompletionEngine {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        health: Arc<dyn HealthSink>,
        settings: EngineSettings,
        ide: IdeInfo,
        session_id: impl Into<String>,
    ) -> Self {
        let session = CompletionSession::new(settings.session_config());
        let worker = FetchWorker::new(Arc::clone(&provider), health);
        Self {
            session,
            worker,
            provider,
            settings,
            ide,
            session_id: session_id.into(),
            request_counter: 0,
            disposable_factory: None,
        }
    }

    /// Install a factory for render-scoped resources.
    pub fn set_disposable_factory(&mut self, factory: DisposableFactory) {
        self.disposable_factory = Some(factory);
    }

    /// Route one keydown event. Fires acceptance telemetry when the event
    /// accepted a completion.
    pub fn handle_key(&mut self, buffer: &mut dyn TextBuffer, event: &KeyEvent) -> KeyOutcome {
        let outcome = self.session.handle_key(buffer, event);
        if let Some(completion_id) = &outcome.accepted_completion_id {
            self.notify_accepted(completion_id.clone());
        }
        outcome
    }

    /// Assemble the prompt and issue a completion request, superseding any
    /// outstanding one. Returns whether a request was issued; triggering is
    /// a silent no-op while no API key is configured.
    pub fn trigger_completion(
        &mut self,
        buffer: &dyn TextBuffer,
        options: &TriggerOptions<'_>,
    ) -> bool {
        if self.settings.request.api_key.is_empty() {
            return false;
        }
        let current_text = buffer.text();
        let cursor = buffer.cursor_code_units();
        let context = assemble_prompt(&ContextRequest {
            cells: options.cells,
            current_index: options.current_index,
            current_text: &current_text,
            current_language: buffer.language(),
            current_text_with_output: options.current_text_with_output,
            cursor_code_units: cursor,
            is_notebook: options.is_notebook,
        });

        let generation = self.session.begin_request(cursor);
        self.request_counter += 1;
        let request = GetCompletionsRequest {
            metadata: self.metadata(),
            document: Document {
                text: context.text.clone(),
                editor_language: options.editor_language.to_string(),
                language: buffer.language(),
                cursor_offset: context.absolute_cursor_offset(),
                line_ending: "\n".to_string(),
                relative_path: options.relative_path.map(str::to_string),
                absolute_path: options.absolute_path.map(str::to_string),
            },
            editor_options: options.editor_options.clone(),
        };
        debug!(generation, cursor, "issuing completion request");
        self.worker.submit(CompletionWork {
            request,
            prefix_byte_offset: context.prefix_byte_offset,
            generation,
            debounce: Duration::from_millis(self.settings.request.debounce_ms),
        });
        true
    }

    /// Apply any resolved requests. Returns whether a suggestion was
    /// rendered.
    pub fn poll(&mut self, buffer: &dyn TextBuffer) -> bool {
        let mut rendered = false;
        while let Some(result) = self.worker.try_recv() {
            let factory = &self.disposable_factory;
            rendered |= self.session.receive_completions(
                result.generation,
                buffer,
                result.items,
                result.prefix_byte_offset,
                || factory.as_ref().map_or_else(Vec::new, |f| f()),
            );
        }
        rendered
    }

    /// Accept the rendered suggestion, if any, reporting telemetry.
    pub fn accept_completion(&mut self, buffer: &mut dyn TextBuffer) -> bool {
        let result = self.session.accept_completion(buffer);
        if let Some(completion_id) = result.completion_id {
            self.notify_accepted(completion_id);
        }
        result.accepted
    }

    /// Clear the rendered suggestion, if any, and drop any outstanding
    /// request. A response already in flight is discarded on arrival.
    pub fn clear_completion(&mut self, reason: &str) -> bool {
        self.session.clear_completion(reason)
    }

    pub fn document_matches(&self, buffer: &dyn TextBuffer) -> bool {
        self.session.document_matches(buffer)
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn markers(&self) -> &[GhostMarker] {
        self.session.markers()
    }

    pub fn blocks(&self) -> &[GhostBlock] {
        self.session.blocks()
    }

    fn notify_accepted(&mut self, completion_id: String) {
        self.request_counter += 1;
        let request = AcceptCompletionRequest {
            metadata: self.metadata(),
            completion_id,
        };
        self.provider.completion_accepted(&request);
    }

    fn metadata(&self) -> Metadata {
        Metadata {
            ide_name: self.ide.name.clone(),
            ide_version: self.ide.version.clone(),
            extension_name: EXTENSION_NAME.to_string(),
            extension_version: EXTENSION_VERSION.to_string(),
            api_key: self.settings.request.api_key.clone(),
            session_id: self.session_id.clone(),
            request_id: self.request_counter,
            locale: None,
            url: None,
        }
    }
}
