//! Character-window text chunking with word-boundary alignment.
//!
//! Positions are measured in characters, not bytes, so multi-byte UTF-8
//! input never splits inside a code point.

use echomind_core::{AppError, AppResult};

/// How far back from the window end we look for a space to break on.
const BOUNDARY_BACKSCAN: usize = 100;

/// Splits text into overlapping character windows.
#[derive(Debug, Clone)]
pub struct Chunker {
    size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker with the given window size and overlap (characters).
    ///
    /// Fails if `size` is zero or `overlap >= size`.
    pub fn new(size: usize, overlap: usize) -> AppResult<Self> {
        if size == 0 || overlap >= size {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, size
            )));
        }
        Ok(Self { size, overlap })
    }

    /// Split `text` into chunks.
    ///
    /// Each window is at most `size` characters. When a window does not end
    /// at the end of the text, its end is pulled back to the last space
    /// within the final `BOUNDARY_BACKSCAN` characters of the window, so
    /// words stay whole where possible. Consecutive windows overlap by
    /// `overlap` characters. The window that reaches the end of the text is
    /// the last chunk; no trailing remainder window is emitted after it.
    ///
    /// Empty or all-whitespace input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Byte offset of every char boundary, plus the end of the text.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let n = boundaries.len() - 1;

        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < n {
            let window_end = (start + self.size).min(n);
            let mut end = window_end;

            if window_end < n {
                let floor = (start + self.size)
                    .saturating_sub(BOUNDARY_BACKSCAN)
                    .max(start + 1);
                if let Some(space_at) = (floor..window_end)
                    .rev()
                    .find(|&i| chars[i].is_whitespace())
                {
                    end = space_at;
                }
            }

            let piece = text[boundaries[start]..boundaries[end]].trim();
            if !piece.is_empty() {
                chunks.push(piece.to_string());
            }

            // The window that touched end-of-text is the final chunk.
            if window_end == n {
                break;
            }

            start = if end > self.overlap && end - self.overlap > start {
                end - self.overlap
            } else {
                start + 1
            };
        }

        chunks
    }

    /// Configured window size in characters.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Configured overlap in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_starts(text: &str, chunks: &[String]) -> Vec<usize> {
        // Recover each chunk's character offset in the original text.
        let mut starts = Vec::new();
        let mut from = 0;
        for chunk in chunks {
            let byte_pos = text[..]
                .match_indices(chunk.as_str())
                .map(|(i, _)| i)
                .find(|&i| i >= from)
                .expect("chunk text present in source");
            starts.push(text[..byte_pos].chars().count());
            from = byte_pos + 1;
        }
        starts
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Chunker::new(0, 0).is_err());
        assert!(Chunker::new(100, 100).is_err());
        assert!(Chunker::new(100, 150).is_err());
        assert!(Chunker::new(100, 99).is_ok());
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunker = Chunker::new(1000, 200).unwrap();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n\t  ").is_empty());
    }

    #[test]
    fn test_short_input_is_single_chunk() {
        let chunker = Chunker::new(1000, 200).unwrap();
        let chunks = chunker.chunk("hello world");
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_2500_chars_yields_three_chunks() {
        // 2500 chars of unbroken text at size 1000 / overlap 200:
        // windows [0,1000), [800,1800), [1600,2500) and no remainder.
        let text = "x".repeat(2500);
        let chunker = Chunker::new(1000, 200).unwrap();
        let chunks = chunker.chunk(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 1000);
        assert_eq!(chunks[1].len(), 1000);
        assert_eq!(chunks[2].len(), 900);
    }

    #[test]
    fn test_2500_chars_with_spaces_three_chunks_overlapping() {
        // 500 unique 4-char tokens, space-separated: exactly 2500 chars.
        let text: String = (0..500).map(|i| format!("{:04} ", i)).collect();
        assert_eq!(text.chars().count(), 2500);

        let chunker = Chunker::new(1000, 200).unwrap();
        let chunks = chunker.chunk(&text);

        assert_eq!(chunks.len(), 3);
        let starts = chunk_starts(&text, &chunks);
        assert_eq!(starts[0], 0);
        assert!(starts[1] <= 800, "second chunk starts at {}", starts[1]);
        // Consecutive chunks share overlapping text
        assert!(starts[1] < 1000);
        assert!(starts[2] < starts[1] + 1000);
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(60);
        let chunker = Chunker::new(1000, 200).unwrap();
        assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
    }

    #[test]
    fn test_chunks_respect_size_bound() {
        let text = "lorem ipsum dolor sit amet ".repeat(100);
        let chunker = Chunker::new(100, 20).unwrap();
        for chunk in chunker.chunk(&text) {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn test_breaks_on_word_boundary() {
        // Words of 9 chars + space; a window end of 100 falls mid-word,
        // so the break must land on a space within the backscan region.
        let text = "abcdefghi ".repeat(30);
        let chunker = Chunker::new(100, 20).unwrap();
        let chunks = chunker.chunk(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.ends_with("abcdefghi"), "chunk ends mid-word: {:?}", chunk);
        }
    }

    #[test]
    fn test_utf8_multibyte_safe() {
        let text = "مرحبا بالعالم هذا نص عربي طويل ".repeat(100);
        let chunker = Chunker::new(200, 50).unwrap();
        let chunks = chunker.chunk(&text);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 200);
        }
    }

    #[test]
    fn test_terminates_on_pathological_input() {
        // No whitespace at all and tiny overlap; must still make progress.
        let text = "y".repeat(10_000);
        let chunker = Chunker::new(50, 49).unwrap();
        let chunks = chunker.chunk(&text);
        assert!(!chunks.is_empty());
    }
}
