// Chunk header decoding: `@@ -O[,L] +O2[,L2] @@[ trailing text]`

use regex::Regex;
use std::sync::OnceLock;

use super::types::ChunkRange;

static CHUNK_HEADER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn chunk_header_pattern() -> &'static Regex {
    CHUNK_HEADER_PATTERN
        .get_or_init(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap())
}

/// Decode a chunk header line into its four line counters.
///
/// An omitted length defaults to 1. Anything that does not match (including
/// counters too large to represent) decodes to all zeros; this never fails.
pub fn parse_chunk_header(line: &str) -> ChunkRange {
    let Some(caps) = chunk_header_pattern().captures(line) else {
        log::trace!("[DiffParser] Unrecognized chunk header: {:?}", line);
        return ChunkRange::default();
    };

    let field = |idx: usize| -> Option<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };

    match (field(1), field(2), field(3), field(4)) {
        (Some(old_start), Some(old_lines), Some(new_start), Some(new_lines)) => ChunkRange {
            old_start,
            old_lines,
            new_start,
            new_lines,
        },
        _ => {
            log::trace!("[DiffParser] Chunk header counter overflow: {:?}", line);
            ChunkRange::default()
        }
    }
}
