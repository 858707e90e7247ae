//! Diff engine
//!
//! This module turns raw unified diff text into structured records:
//! - `chunk_header` - `@@ ... @@` line decoding
//! - `binary` - binary/extension classification for diffs and loose files
//! - `parser` - per-file section parsing
//! - `types` - `FileDiff`, `DiffChunk`, `DiffChange`
//!
//! Every function here is pure and infallible; malformed input degrades to
//! empty or zeroed values.

mod binary;
mod chunk_header;
mod parser;
mod types;

pub use binary::{
    detect_binary, detect_binary_in_diff, file_extension, is_binary_extension,
    sample_looks_binary, BinaryInfo, BINARY_DIFF_MARKER, BINARY_PATCH_MARKER,
    SNIFF_LIMIT,
};
pub use chunk_header::parse_chunk_header;
pub use parser::{parse_diff, parse_file_diff};
pub use types::{ChangeStatus, ChangeType, ChunkRange, DiffChange, DiffChunk, FileDiff};
