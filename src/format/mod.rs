//! Log-schema revision detection for Claude Code JSONL records.

mod classifier;
mod version;

pub use classifier::{LogFormat, classify_entry, classify_file, classify_files, format_confidence};
