//! Prompt assembly: concatenating the visible buffers into a single context
//! window and locating the cursor inside it in wire (UTF-8 byte) offsets.
//!
//! A prompt is built from cells of the same language as the current buffer,
//! in document order. Markdown prompts interleave markdown cells verbatim
//! with fenced code blocks for allowed code cells; code prompts take only
//! cells of exactly the same language and never mix markdown in. The current
//! cell may be substituted with an output-augmented variant carrying its
//! captured execution output.

use std::borrow::Cow;

use crate::language::Language;
use crate::unicode;

/// Separator between cells of a Markdown prompt.
pub const MARKDOWN_SEPARATOR: &str = "\n\n";
/// Cell-boundary token between cells of a code prompt.
pub const CELL_SEPARATOR: &str = "\nCELL:\n";
/// Token prefixed once to notebook code prompts.
pub const NOTEBOOK_HEADER: &str = "CELL:\n";
/// Header preceding captured execution output inside a cell.
pub const OUTPUT_HEADER: &str = "\nOUTPUT:\n";

const MAX_OUTPUT_LINES: usize = 10;
const MAX_OUTPUT_LINE_CHARS: usize = 500;

/// One buffer as seen by prompt assembly: a transient borrow of its text and
/// its declared language. Never owned by the engine beyond one call.
#[derive(Debug, Clone)]
pub struct PromptCell<'a> {
    pub text: Cow<'a, str>,
    pub language: Language,
}

impl<'a> PromptCell<'a> {
    pub fn new(text: impl Into<Cow<'a, str>>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }
}

/// Everything prompt assembly needs for one completion trigger.
#[derive(Debug)]
pub struct ContextRequest<'a> {
    /// All visible cells, in document order.
    pub cells: &'a [PromptCell<'a>],
    /// Index of the current cell within `cells`, or `None` when the current
    /// document is not part of the collected set.
    pub current_index: Option<usize>,
    /// Plain text of the current buffer.
    pub current_text: &'a str,
    /// Language of the current buffer.
    pub current_language: Language,
    /// Output-augmented variant of the current cell's text, if any.
    pub current_text_with_output: Option<&'a str>,
    /// Cursor offset into the current buffer, UTF-16 code units.
    pub cursor_code_units: u32,
    /// Whether the cells come from a notebook document.
    pub is_notebook: bool,
}

/// The assembled prompt plus the byte offsets locating the cursor in it.
///
/// The absolute cursor offset into `text` is
/// `prefix_byte_offset + cursor_byte_offset`; `prefix_byte_offset` is always
/// a boundary between whole cell texts and separators, never a mid-cell cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub text: String,
    pub cursor_byte_offset: u64,
    pub prefix_byte_offset: u64,
}

impl PromptContext {
    /// Absolute cursor byte offset into the assembled text.
    pub fn absolute_cursor_offset(&self) -> u64 {
        self.prefix_byte_offset + self.cursor_byte_offset
    }
}

/// Assemble the prompt for one completion trigger.
pub fn assemble_prompt(request: &ContextRequest<'_>) -> PromptContext {
    let model_language = request.current_language;
    let model_is_markdown = model_language == Language::Markdown;
    let model_is_expected = model_language.is_prompt_language();

    let separator = if model_is_markdown {
        MARKDOWN_SEPARATOR
    } else {
        CELL_SEPARATOR
    };

    let mut collected: Vec<Cow<'_, str>> = Vec::new();
    let mut prefix_byte_offset = 0u64;
    let mut found = false;

    for (idx, cell) in request.cells.iter().enumerate() {
        if model_is_expected && request.current_index == Some(idx) {
            // Bytes of every cell collected strictly before the current one,
            // plus the separator after each.
            prefix_byte_offset = collected.iter().map(|t| t.len() as u64).sum::<u64>()
                + (separator.len() * collected.len()) as u64;
            found = true;
        }
        if model_is_expected && !model_is_markdown {
            // Markdown never feeds a code-language prompt.
            if cell.language == Language::Markdown {
                continue;
            }
            if cell.language == model_language {
                if request.current_index == Some(idx) {
                    if let Some(with_output) = request.current_text_with_output {
                        collected.push(Cow::Borrowed(with_output));
                        continue;
                    }
                }
                collected.push(Cow::Borrowed(cell.text.as_ref()));
            }
        } else if model_is_markdown {
            if cell.language == Language::Markdown {
                collected.push(Cow::Borrowed(cell.text.as_ref()));
            } else if let Some(tag) = cell.language.fence_tag() {
                collected.push(Cow::Owned(format!("```{}\n{}\n```", tag, cell.text)));
            }
        }
    }

    let text = if found {
        let joined = collected.join(separator);
        if request.is_notebook && !model_is_markdown {
            prefix_byte_offset += NOTEBOOK_HEADER.len() as u64;
            format!("{NOTEBOOK_HEADER}{joined}")
        } else {
            joined
        }
    } else {
        prefix_byte_offset = 0;
        request.current_text.to_string()
    };

    let cursor_text = request
        .current_text_with_output
        .unwrap_or(request.current_text);
    let cursor_byte_offset = unicode::code_units_to_bytes(cursor_text, request.cursor_code_units);

    tracing::debug!(
        found,
        prefix_byte_offset,
        cursor_byte_offset,
        cells = request.cells.len(),
        "assembled prompt"
    );
    PromptContext {
        text,
        cursor_byte_offset,
        prefix_byte_offset,
    }
}

/// Kind of a captured notebook cell output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    ExecuteResult,
    Error,
    Stream,
    DisplayData,
}

/// One entry of a cell's recorded outputs.
#[derive(Debug, Clone)]
pub struct ExecutionOutput {
    pub kind: OutputKind,
    /// Stream name (`stdout`, `stderr`) for `Stream` outputs.
    pub name: Option<String>,
    /// `text/plain` payload of an execute result.
    pub text_plain: Option<String>,
    /// `text/html` payload of an execute result.
    pub text_html: Option<String>,
    /// Raw text of a stream output.
    pub text: Option<String>,
}

/// Append a cell's captured execution output to its source text, producing
/// the output-augmented variant fed to prompt assembly. Output is truncated
/// to the first 10 lines and 500 characters per line; with no usable output
/// the source is returned unchanged.
pub fn append_execution_output(source: &str, outputs: &[ExecutionOutput]) -> String {
    let mut output_text = String::new();
    for output in outputs {
        match output.kind {
            OutputKind::ExecuteResult => {
                if let Some(plain) = &output.text_plain {
                    output_text = plain.clone();
                } else if let Some(html) = &output.text_html {
                    output_text = html.clone();
                }
            }
            OutputKind::Stream => {
                if output.name.as_deref() == Some("stdout") {
                    if let Some(text) = &output.text {
                        output_text = text.clone();
                    }
                }
            }
            OutputKind::Error | OutputKind::DisplayData => {}
        }
    }

    let truncated = output_text
        .split('\n')
        .take(MAX_OUTPUT_LINES)
        .map(|line| {
            let end = line
                .char_indices()
                .nth(MAX_OUTPUT_LINE_CHARS)
                .map_or(line.len(), |(idx, _)| idx);
            &line[..end]
        })
        .collect::<Vec<_>>()
        .join("\n");

    if truncated.is_empty() {
        source.to_string()
    } else {
        format!("{source}{OUTPUT_HEADER}{truncated}")
    }
}
