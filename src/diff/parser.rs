//! Unified diff parser
//!
//! Turns the text printed by `git diff` / `git show` into one [`FileDiff`] per
//! `diff --git` section. Parsing is permissive: input comes from a tool we do
//! not control, so unknown lines are skipped and unreadable headers degrade to
//! zeroed values instead of errors.

use regex::Regex;
use std::sync::OnceLock;

use super::binary::{is_binary_extension, BINARY_DIFF_MARKER, BINARY_PATCH_MARKER};
use super::chunk_header::parse_chunk_header;
use super::types::{ChangeStatus, ChangeType, DiffChange, DiffChunk, FileDiff};

const SECTION_PREFIX: &str = "diff --git ";
const CHUNK_PREFIX: &str = "@@ ";
const DEV_NULL: &str = "/dev/null";

static HEADER_PATHS_PATTERN: OnceLock<Regex> = OnceLock::new();

fn header_paths_pattern() -> &'static Regex {
    HEADER_PATHS_PATTERN.get_or_init(|| Regex::new(r"^a/(.+?) b/(.+)$").unwrap())
}

/// Parse a complete diff into per-file records, in input order.
///
/// Empty or whitespace-only input yields no records. Any text before the
/// first `diff --git` line (e.g. the commit header of `git show`) is ignored.
pub fn parse_diff(raw: &str) -> Vec<FileDiff> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let files: Vec<FileDiff> = split_sections(raw)
        .into_iter()
        .map(parse_file_diff)
        .collect();

    log::debug!("[DiffParser] Parsed {} file section(s)", files.len());
    files
}

/// Split raw diff text at every line that starts a `diff --git` section.
fn split_sections(raw: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        if line.starts_with(SECTION_PREFIX) {
            match start {
                Some(s) => sections.push(&raw[s..offset]),
                None if offset > 0 => {
                    log::trace!("[DiffParser] Skipping {} byte(s) of preamble", offset);
                }
                None => {}
            }
            start = Some(offset);
        }
        offset += line.len();
    }

    if let Some(s) = start {
        sections.push(&raw[s..]);
    }

    sections
}

/// Parse a single `diff --git` section.
///
/// Lines are split on `\n` only, so a change's content keeps a trailing `\r`
/// and line-ending-only edits stay visible.
pub fn parse_file_diff(section: &str) -> FileDiff {
    let mut parser = SectionParser::default();
    let mut lines = section.strip_suffix('\n').unwrap_or(section).split('\n');

    if let Some(first) = lines.next() {
        if first.starts_with(SECTION_PREFIX) {
            parser.seed_from_git_header(first);
        } else {
            parser.header_line(first);
        }
    }

    for line in lines {
        if parser.chunk.is_none() && !line.starts_with(CHUNK_PREFIX) {
            parser.header_line(line);
            continue;
        }
        if line.starts_with(SECTION_PREFIX) {
            break;
        }
        parser.body_line(line);
    }

    parser.finish()
}

/// Running state while walking one section top to bottom
#[derive(Default)]
struct SectionParser {
    path: Option<String>,
    old_path: Option<String>,
    /// Paths came from the `diff --git` line; `---`/`+++` are fallbacks only
    seeded_from_header: bool,
    status: Option<ChangeStatus>,
    saw_binary_marker: bool,
    chunks: Vec<DiffChunk>,
    chunk: Option<ChunkCursor>,
    additions: usize,
    deletions: usize,
}

/// The chunk being filled and its line counters
struct ChunkCursor {
    chunk: DiffChunk,
    old_line: u32,
    new_line: u32,
}

impl SectionParser {
    fn seed_from_git_header(&mut self, line: &str) {
        let line = line.trim_end_matches('\r');
        let Some((old, new)) = parse_git_header_paths(line) else {
            log::trace!("[DiffParser] Could not read paths from {:?}", line);
            return;
        };
        if old != new {
            self.old_path = Some(old);
        }
        self.path = Some(new);
        self.seeded_from_header = true;
    }

    fn header_line(&mut self, line: &str) {
        let line = line.trim_end_matches('\r');
        if line.starts_with(BINARY_DIFF_MARKER) || line.starts_with(BINARY_PATCH_MARKER) {
            self.saw_binary_marker = true;
        } else if line.starts_with("new file mode") {
            self.status = Some(ChangeStatus::Added);
        } else if line.starts_with("deleted file mode") {
            self.status = Some(ChangeStatus::Deleted);
        } else if let Some(from) = line.strip_prefix("rename from ") {
            self.status = Some(ChangeStatus::Renamed);
            self.old_path = Some(unquote_path(from));
        } else if let Some(to) = line.strip_prefix("rename to ") {
            self.status = Some(ChangeStatus::Renamed);
            self.path = Some(unquote_path(to));
        } else if let Some(from) = line.strip_prefix("copy from ") {
            self.status = Some(ChangeStatus::Copied);
            self.old_path = Some(unquote_path(from));
        } else if let Some(to) = line.strip_prefix("copy to ") {
            self.status = Some(ChangeStatus::Copied);
            self.path = Some(unquote_path(to));
        } else if let Some(old) = line.strip_prefix("--- ") {
            if old == DEV_NULL {
                self.status = Some(ChangeStatus::Added);
            } else if !self.seeded_from_header && self.old_path.is_none() {
                self.old_path = Some(strip_side_prefix(old, "a/"));
            }
        } else if let Some(new) = line.strip_prefix("+++ ") {
            if new == DEV_NULL {
                self.status = Some(ChangeStatus::Deleted);
            } else if !self.seeded_from_header && self.path.is_none() {
                self.path = Some(strip_side_prefix(new, "b/"));
            }
        }
    }

    fn body_line(&mut self, line: &str) {
        if line.starts_with(CHUNK_PREFIX) {
            self.close_chunk();
            let line = line.trim_end_matches('\r');
            let range = parse_chunk_header(line);
            self.chunk = Some(ChunkCursor {
                chunk: DiffChunk::new(range, line),
                old_line: range.old_start,
                new_line: range.new_start,
            });
            return;
        }

        let Some(cursor) = self.chunk.as_mut() else {
            return;
        };

        // `\ No newline at end of file` and anything unrecognized leave counters alone
        let mut chars = line.chars();
        let change = match chars.next() {
            Some('+') => {
                self.additions += 1;
                let change = DiffChange {
                    change_type: ChangeType::Add,
                    old_line: None,
                    new_line: Some(cursor.new_line),
                    content: chars.as_str().to_string(),
                };
                cursor.new_line = cursor.new_line.saturating_add(1);
                change
            }
            Some('-') => {
                self.deletions += 1;
                let change = DiffChange {
                    change_type: ChangeType::Delete,
                    old_line: Some(cursor.old_line),
                    new_line: None,
                    content: chars.as_str().to_string(),
                };
                cursor.old_line = cursor.old_line.saturating_add(1);
                change
            }
            Some(' ') => {
                let change = DiffChange {
                    change_type: ChangeType::Context,
                    old_line: Some(cursor.old_line),
                    new_line: Some(cursor.new_line),
                    content: chars.as_str().to_string(),
                };
                cursor.old_line = cursor.old_line.saturating_add(1);
                cursor.new_line = cursor.new_line.saturating_add(1);
                change
            }
            _ => return,
        };

        cursor.chunk.changes.push(change);
    }

    fn close_chunk(&mut self) {
        if let Some(cursor) = self.chunk.take() {
            self.chunks.push(cursor.chunk);
        }
    }

    fn finish(mut self) -> FileDiff {
        self.close_chunk();

        let path = self.path.unwrap_or_default();
        let status = self.status.unwrap_or(ChangeStatus::Modified);
        // Known binary extensions on either side count even when git printed a text diff
        let is_binary = self.saw_binary_marker
            || is_binary_extension(&path)
            || self.old_path.as_deref().is_some_and(is_binary_extension);

        let old_path = match status {
            ChangeStatus::Added | ChangeStatus::Deleted => None,
            _ => self.old_path.filter(|old| *old != path || status.has_old_path()),
        };

        FileDiff {
            path,
            status,
            old_path,
            additions: self.additions,
            deletions: self.deletions,
            chunks: self.chunks,
            is_binary,
            file_size: None,
        }
    }
}

/// Read `(old, new)` from `diff --git a/<old> b/<new>`.
///
/// Handles C-style quoted paths and paths containing spaces. When both sides
/// are the same path the split is unambiguous even if the path contains ` b/`.
fn parse_git_header_paths(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix(SECTION_PREFIX)?.trim_end();

    if rest.starts_with('"') {
        let (old, remainder) = take_quoted(rest)?;
        let remainder = remainder.trim_start();
        let new = if remainder.starts_with('"') {
            take_quoted(remainder)?.0
        } else {
            remainder.to_string()
        };
        return Some((strip_side_prefix(&old, "a/"), strip_side_prefix(&new, "b/")));
    }

    if rest.len() % 2 == 1 {
        let mid = rest.len() / 2;
        if let (Some(left), Some(right)) = (rest.get(..mid), rest.get(mid + 1..)) {
            if rest.as_bytes()[mid] == b' ' {
                if let (Some(old), Some(new)) = (left.strip_prefix("a/"), right.strip_prefix("b/"))
                {
                    if old == new {
                        return Some((old.to_string(), new.to_string()));
                    }
                }
            }
        }
    }

    if let Some(caps) = header_paths_pattern().captures(rest) {
        let old = caps.get(1)?.as_str();
        let new = caps.get(2)?.as_str();
        return Some((old.to_string(), new.to_string()));
    }

    None
}

fn strip_side_prefix(path: &str, prefix: &str) -> String {
    let path = unquote_path(path);
    match path.strip_prefix(prefix) {
        Some(stripped) => stripped.to_string(),
        None => path,
    }
}

/// Undo git's C-style quoting (`core.quotePath`); plain paths pass through.
fn unquote_path(path: &str) -> String {
    if path.len() >= 2 && path.starts_with('"') && path.ends_with('"') {
        if let Some((unquoted, rest)) = take_quoted(path) {
            if rest.is_empty() {
                return unquoted;
            }
        }
    }
    path.to_string()
}

/// Consume one quoted token from the start of `input`, returning it unescaped
/// along with the remaining text.
fn take_quoted(input: &str) -> Option<(String, &str)> {
    let body = input.strip_prefix('"')?;
    let bytes = body.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let value = String::from_utf8_lossy(&out).into_owned();
                return Some((value, &body[i + 1..]));
            }
            b'\\' if i + 1 < bytes.len() => {
                let esc = bytes[i + 1];
                match esc {
                    b'0'..=b'7' => {
                        let digits: Vec<u8> = bytes[i + 1..]
                            .iter()
                            .take(3)
                            .take_while(|b| (b'0'..=b'7').contains(*b))
                            .copied()
                            .collect();
                        let value = digits
                            .iter()
                            .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                        out.push(value.min(255) as u8);
                        i += 1 + digits.len();
                        continue;
                    }
                    b'n' => out.push(b'\n'),
                    b't' => out.push(b'\t'),
                    b'r' => out.push(b'\r'),
                    b'a' => out.push(0x07),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'v' => out.push(0x0b),
                    other => out.push(other),
                }
                i += 2;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    None
}
