//! Offset-based pagination over fetched documents
//!
//! Positions are counted in `char`s so a chunk never splits a code point.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Characters returned per `fetch_content` call
pub const CHUNK_SIZE: i64 = 30_000;

/// One bounded slice of a document plus its continuation cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChunk {
    /// The slice returned for this call
    pub text: String,
    /// Requested start position
    pub offset: i64,
    /// Where the next call should start, present only if content remains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<i64>,
    /// `true` iff `next_offset` is present
    pub is_truncated: bool,
    /// Length of the whole document
    pub total_length: i64,
}

/// Slice `full_text` starting at `offset`, returning at most `chunk_size` chars.
///
/// An offset at or past the end yields an empty, non-truncated chunk.
pub fn paginate(full_text: &str, offset: i64, chunk_size: i64) -> Result<ContentChunk> {
    if offset < 0 {
        return Err(Error::InvalidArgument(format!(
            "offset must be non-negative, got {}",
            offset
        )));
    }
    if chunk_size <= 0 {
        return Err(Error::InvalidArgument(format!(
            "chunk_size must be positive, got {}",
            chunk_size
        )));
    }

    let total_length = full_text.chars().count() as i64;
    if offset >= total_length {
        return Ok(ContentChunk {
            text: String::new(),
            offset,
            next_offset: None,
            is_truncated: false,
            total_length,
        });
    }

    let end = offset.saturating_add(chunk_size).min(total_length);
    let start_byte = byte_index(full_text, offset);
    let end_byte = byte_index(full_text, end);
    let is_truncated = end < total_length;

    Ok(ContentChunk {
        text: full_text[start_byte..end_byte].to_string(),
        offset,
        next_offset: is_truncated.then_some(end),
        is_truncated,
        total_length,
    })
}

/// Byte position of the `char_pos`-th char, or the string length past the end.
fn byte_index(s: &str, char_pos: i64) -> usize {
    s.char_indices()
        .nth(char_pos as usize)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
