//! Completion lifecycle engine for in-browser code editors.
//!
//! The engine detects nothing and renders nothing itself: editor adapters
//! (CodeMirror 5, Monaco, Jupyter notebook/JupyterLab) feed it key events
//! and buffers through the [`buffer::TextBuffer`] capability trait, and read
//! back ghost-text decorations to draw. What lives here is the part that has
//! to be correct under concurrent edits and slow networks:
//!
//! - prompt assembly across notebook cells ([`context`]),
//! - UTF-16 ↔ UTF-8 offset conversion for the byte-addressed wire
//!   protocol ([`unicode`], [`protocol`]),
//! - the single-suggestion request/render/accept/clear state machine with
//!   debouncing and stale-response rejection ([`session`], [`worker`]),
//! - key routing and the fake-typing illusion ([`session`]).
//!
//! [`engine::CompletionEngine`] wires one editor instance's session to a
//! [`worker::CompletionProvider`]; [`http::HttpCompletionProvider`] is the
//! stock transport.

pub mod buffer;
pub mod context;
pub mod engine;
pub mod http;
pub mod language;
pub mod protocol;
pub mod session;
pub mod settings;
pub mod trace_init;
pub mod unicode;
pub mod worker;

pub use buffer::{CellBuffer, TextBuffer};
pub use context::{PromptCell, PromptContext};
pub use engine::{CompletionEngine, IdeInfo, TriggerOptions};
pub use language::Language;
pub use session::{CompletionSession, Key, KeyEvent, KeyOutcome, SessionPhase};
pub use settings::EngineSettings;
pub use worker::{CompletionProvider, FetchError, HealthSink};
