//! Fixed-size sliding-window chunking.
//!
//! Windows are measured in characters (Unicode scalar values), never bytes, so
//! Vietnamese or other multi-byte résumé text is never split inside a code point.

use thiserror::Error;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkerError {
    #[error("chunk size must be greater than zero")]
    ZeroSize,

    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    OverlapTooLarge { size: usize, overlap: usize },
}

/// Window parameters, validated once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    size: usize,
    overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkConfig {
    pub fn new(size: usize, overlap: usize) -> Result<Self, ChunkerError> {
        if size == 0 {
            return Err(ChunkerError::ZeroSize);
        }
        if overlap >= size {
            return Err(ChunkerError::OverlapTooLarge { size, overlap });
        }
        Ok(Self { size, overlap })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Lazily splits `text` into overlapping windows.
    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        let text = text.trim();
        Chunks {
            text,
            byte_pos: 0,
            char_pos: 0,
            index: 0,
            size: self.size,
            step: self.size - self.overlap,
            finished: text.is_empty(),
        }
    }
}

/// A window of résumé text borrowed from the extracted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub index: usize,
    /// Offset of the first character, counted in characters.
    pub start_char: usize,
    pub text: &'a str,
}

/// Iterator returned by [`ChunkConfig::chunks`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
    index: usize,
    size: usize,
    step: usize,
    finished: bool,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let rest = &self.text[self.byte_pos..];
        let end = byte_offset(rest, self.size);
        let chunk = Chunk {
            index: self.index,
            start_char: self.char_pos,
            text: &rest[..end],
        };

        if end == rest.len() {
            self.finished = true;
        } else {
            self.byte_pos += byte_offset(rest, self.step);
            self.char_pos += self.step;
            self.index += 1;
        }

        Some(chunk)
    }
}

/// Byte offset just past the first `chars` characters of `s` (or `s.len()`).
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices()
        .nth(chars)
        .map(|(offset, _)| offset)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHABET: &str = "abcdefghijklmnopqrstuvwxy"; // 25 chars

    #[test]
    fn test_short_input_yields_single_chunk() {
        let config = ChunkConfig::new(1000, 200).unwrap();
        let chunks: Vec<_> = config.chunks("Senior Rust engineer, 6 years").collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Senior Rust engineer, 6 years");
        assert_eq!(chunks[0].start_char, 0);
    }

    #[test]
    fn test_input_exactly_chunk_size_yields_single_chunk() {
        let config = ChunkConfig::new(25, 5).unwrap();
        assert_eq!(config.chunks(ALPHABET).count(), 1);
    }

    #[test]
    fn test_windows_overlap_by_configured_amount() {
        let config = ChunkConfig::new(10, 3).unwrap();
        let chunks: Vec<_> = config.chunks(ALPHABET).collect();

        let texts: Vec<_> = chunks.iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["abcdefghij", "hijklmnopq", "opqrstuvwx", "vwxy"]);

        for pair in chunks.windows(2) {
            let prev_tail: String = pair[0].text.chars().skip(7).collect();
            let next_head: String = pair[1].text.chars().take(3).collect();
            assert_eq!(prev_tail, next_head);
        }
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 10));
        assert_eq!(chunks[3].index, 3);
        assert_eq!(chunks[3].start_char, 21);
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = "Rust, Tokio, Axum. ".repeat(200);
        let config = ChunkConfig::default();
        let first: Vec<_> = config.chunks(&text).collect();
        let second: Vec<_> = config.chunks(&text).collect();
        assert_eq!(first, second);
        assert!(first.len() > 1);
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let text = "Kỹ năng lãnh đạo nhóm phát triển phần mềm";
        let config = ChunkConfig::new(8, 2).unwrap();
        let chunks: Vec<_> = config.chunks(text).collect();
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 8));
        assert_eq!(chunks[0].text, text.chars().take(8).collect::<String>());
    }

    #[test]
    fn test_whitespace_only_yields_nothing() {
        assert_eq!(ChunkConfig::default().chunks("  \n\t ").count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert_eq!(ChunkConfig::new(0, 0), Err(ChunkerError::ZeroSize));
        assert_eq!(
            ChunkConfig::new(100, 100),
            Err(ChunkerError::OverlapTooLarge {
                size: 100,
                overlap: 100
            })
        );
    }
}
