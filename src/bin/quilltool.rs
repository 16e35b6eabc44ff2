use std::fs;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use quill_engine::context::{assemble_prompt, ContextRequest, PromptCell};
use quill_engine::language::Language;
use quill_engine::unicode;

#[derive(Parser)]
#[command(name = "quilltool", about = "Quill prompt-assembly diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a prompt from cell files and report cursor offsets
    Assemble {
        /// Cell files in document order; language is inferred from the
        /// extension (.py, .sql, .r, .scala, .md)
        files: Vec<String>,
        /// Index of the current cell
        #[arg(short, long, default_value = "0")]
        current: usize,
        /// Cursor offset into the current cell in UTF-16 code units
        /// (defaults to the end of the cell)
        #[arg(long)]
        cursor: Option<u32>,
        /// Treat the cells as notebook cells
        #[arg(long)]
        notebook: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Convert a cursor offset between UTF-16 code units and UTF-8 bytes
    Offsets {
        /// File holding the text
        file: String,
        /// Offset to convert
        offset: u64,
        /// Interpret the offset as bytes and convert to code units
        #[arg(long)]
        from_bytes: bool,
    },
}

#[derive(Serialize)]
struct AssembleReport {
    text: String,
    prefix_byte_offset: u64,
    cursor_byte_offset: u64,
    absolute_cursor_offset: u64,
    language: String,
}

fn language_for(path: &str) -> Language {
    match path.rsplit('.').next() {
        Some("py") => Language::Python,
        Some("sql") => Language::Sql,
        Some("r") | Some("R") => Language::R,
        Some("scala") => Language::Scala,
        Some("md") | Some("markdown") => Language::Markdown,
        _ => Language::Unspecified,
    }
}

fn read_file(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("error: {path}: {e}");
            process::exit(1);
        }
    }
}

fn run_assemble(files: &[String], current: usize, cursor: Option<u32>, notebook: bool, json: bool) {
    if files.is_empty() {
        eprintln!("error: no cell files given");
        process::exit(1);
    }
    if current >= files.len() {
        eprintln!(
            "error: current index {current} out of range ({} cells)",
            files.len()
        );
        process::exit(1);
    }

    let texts: Vec<String> = files.iter().map(|f| read_file(f)).collect();
    let cells: Vec<PromptCell<'_>> = files
        .iter()
        .zip(&texts)
        .map(|(path, text)| PromptCell::new(text.as_str(), language_for(path)))
        .collect();

    let current_text = texts[current].as_str();
    let current_language = cells[current].language;
    let cursor_code_units = cursor.unwrap_or_else(|| unicode::utf16_len(current_text));

    let context = assemble_prompt(&ContextRequest {
        cells: &cells,
        current_index: Some(current),
        current_text,
        current_language,
        current_text_with_output: None,
        cursor_code_units,
        is_notebook: notebook,
    });

    if json {
        let report = AssembleReport {
            text: context.text.clone(),
            prefix_byte_offset: context.prefix_byte_offset,
            cursor_byte_offset: context.cursor_byte_offset,
            absolute_cursor_offset: context.absolute_cursor_offset(),
            language: format!("{current_language:?}"),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("language: {current_language:?}");
        println!("prefix bytes: {}", context.prefix_byte_offset);
        println!("cursor bytes: {}", context.cursor_byte_offset);
        println!("absolute cursor: {}", context.absolute_cursor_offset());
        println!("--- prompt ---");
        println!("{}", context.text);
    }
}

fn run_offsets(file: &str, offset: u64, from_bytes: bool) {
    let text = read_file(file);
    if from_bytes {
        let units = unicode::bytes_to_code_units(&text, offset);
        println!("{offset} bytes -> {units} code units");
    } else {
        let offset = u32::try_from(offset).unwrap_or_else(|_| {
            eprintln!("error: code-unit offset {offset} out of range");
            process::exit(1);
        });
        let bytes = unicode::code_units_to_bytes(&text, offset);
        println!("{offset} code units -> {bytes} bytes");
    }
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Assemble {
            files,
            current,
            cursor,
            notebook,
            json,
        } => run_assemble(&files, current, cursor, notebook, json),
        Command::Offsets {
            file,
            offset,
            from_bytes,
        } => run_offsets(&file, offset, from_bytes),
    }
}
