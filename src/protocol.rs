//! Wire data model for the completion service.
//!
//! The service speaks protobuf-JSON: camelCase field names, stringly-typed
//! enums, and byte-addressed offsets into the prompt text. These types
//! mirror that shape with serde so a request can be marshalled by any
//! transport, and so responses parse leniently (`default` everywhere —
//! missing payloads become `None`/empty rather than parse errors).

use serde::{Deserialize, Serialize};

use crate::language::Language;

pub const EXTENSION_NAME: &str = "quill-browser";
pub const EXTENSION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Per-request client metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub ide_name: String,
    pub ide_version: String,
    pub extension_name: String,
    pub extension_version: String,
    pub api_key: String,
    pub session_id: String,
    pub request_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The document the completion is requested for: the assembled prompt text
/// and the absolute cursor byte offset into it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub text: String,
    /// Editor-native language identifier (mode name / language id).
    pub editor_language: String,
    pub language: Language,
    pub cursor_offset: u64,
    pub line_ending: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_path: Option<String>,
}

/// Editor whitespace settings, passed through opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorOptions {
    pub tab_size: u32,
    pub insert_spaces: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetCompletionsRequest {
    pub metadata: Metadata,
    pub document: Document,
    pub editor_options: EditorOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetCompletionsResponse {
    pub completion_items: Vec<CompletionItem>,
}

/// One candidate suggestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionItem {
    /// The completion payload proper; absent on malformed items.
    pub completion: Option<Completion>,
    /// Replacement range in prompt bytes.
    pub range: Option<OffsetRange>,
    /// Text inserted after the completion, with a cursor adjustment.
    pub suffix: Option<CompletionSuffix>,
    /// Render plan: inline fragments and block lines.
    pub completion_parts: Vec<CompletionPart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Completion {
    pub completion_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OffsetRange {
    pub start_offset: u64,
    pub end_offset: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionSuffix {
    pub text: String,
    /// Cursor adjustment after inserting the suffix, in prompt bytes
    /// (typically negative, moving back inside inserted brackets).
    pub delta_cursor_offset: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionPart {
    #[serde(rename = "type")]
    pub kind: CompletionPartKind,
    pub text: String,
    /// Offset of the part's anchor, in prompt bytes.
    pub offset: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompletionPartKind {
    #[default]
    #[serde(rename = "COMPLETION_PART_TYPE_UNSPECIFIED")]
    Unspecified,
    /// Ghost text rendered at a point on the current line.
    #[serde(rename = "COMPLETION_PART_TYPE_INLINE")]
    Inline,
    /// Ghost text rendered as full lines below the cursor.
    #[serde(rename = "COMPLETION_PART_TYPE_BLOCK")]
    Block,
}

/// Fire-and-forget acceptance report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcceptCompletionRequest {
    pub metadata: Metadata,
    pub completion_id: String,
}
