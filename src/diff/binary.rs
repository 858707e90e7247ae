//! Binary classification
//!
//! Two narrowly-scoped predicates:
//! - [`detect_binary_in_diff`] decides binary-ness of a diff section from git's
//!   `Binary files` marker or the path's extension.
//! - [`detect_binary`] classifies a path outside a diff (e.g. untracked files),
//!   using the extension first and a caller-supplied byte sample second.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Marker git prints instead of chunks for binary content
pub const BINARY_DIFF_MARKER: &str = "Binary files";

/// Header of the literal/delta payload written by `git diff --binary`
pub const BINARY_PATCH_MARKER: &str = "GIT binary patch";

/// Number of leading bytes inspected when sniffing content
pub const SNIFF_LIMIT: usize = 8192;

/// Extensions treated as binary regardless of content (lowercase)
const BINARY_EXTENSIONS: &[&str] = &[
    // Images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "tif", "psd", "heic", "avif",
    // Archives
    "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar", "zst", "jar", "war",
    // Executables and objects
    "exe", "dll", "so", "dylib", "bin", "o", "a", "lib", "obj", "class", "wasm", "pyc", "pyo",
    "node",
    // Fonts
    "ttf", "otf", "woff", "woff2", "eot",
    // Audio
    "mp3", "wav", "ogg", "flac", "aac", "m4a", "wma",
    // Video
    "mp4", "avi", "mov", "mkv", "webm", "wmv", "flv", "m4v",
    // Documents and databases
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "sqlite", "sqlite3", "db",
];

/// Result of classifying a path (and optionally its content)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryInfo {
    pub is_binary: bool,
    pub is_image: bool,
    /// Lowercase extension without the dot, empty when the path has none
    pub extension: String,
    pub mime_type: String,
}

/// Lowercase extension of the final path segment, if any
pub fn file_extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_lowercase())
}

/// Whether the path's extension (case-insensitive) is a known binary type
pub fn is_binary_extension(path: &str) -> bool {
    file_extension(path)
        .map(|ext| BINARY_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Binary check for a diff section: one of git's markers, or a known binary extension
pub fn detect_binary_in_diff(diff_text: &str, path: &str) -> bool {
    diff_text.contains(BINARY_DIFF_MARKER)
        || diff_text.contains(BINARY_PATCH_MARKER)
        || is_binary_extension(path)
}

/// Content sniff over at most [`SNIFF_LIMIT`] bytes.
///
/// Any NUL byte means binary. Otherwise binary when more than 10% of the
/// sampled bytes are control characters other than tab, LF and CR.
pub fn sample_looks_binary(sample: &[u8]) -> bool {
    let sample = &sample[..sample.len().min(SNIFF_LIMIT)];
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }

    let control = sample
        .iter()
        .filter(|&&b| (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r')) || b == 0x7f)
        .count();

    control * 10 > sample.len()
}

/// Classify a path outside of a diff.
///
/// The extension decides first; the byte sample is only consulted when the
/// extension is not a known binary type.
pub fn detect_binary(path: &str, sample: Option<&[u8]>) -> BinaryInfo {
    let extension = file_extension(path).unwrap_or_default();
    let guessed = mime_guess::from_path(path).first();
    let is_image = guessed
        .as_ref()
        .map(|m| m.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false);

    let is_binary = if is_binary_extension(path) {
        true
    } else {
        sample.map(sample_looks_binary).unwrap_or(false)
    };

    let mime_type = match guessed {
        Some(mime) => mime.essence_str().to_string(),
        None if is_binary => "application/octet-stream".to_string(),
        None => "text/plain".to_string(),
    };

    BinaryInfo {
        is_binary,
        is_image,
        extension,
        mime_type,
    }
}
