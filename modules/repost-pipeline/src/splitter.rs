use repost_common::{Document, DocumentChunk};

/// Separators tried in order when choosing a cut point: paragraph break,
/// line break, sentence end, word boundary.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Deterministically partitions document content into bounded, overlapping
/// chunks. Sizes and offsets are measured in characters, not bytes.
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(2000, 200)
    }
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        assert!(
            chunk_overlap < chunk_size,
            "chunk_overlap must be smaller than chunk_size"
        );
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split each document's content, preserving document order and
    /// intra-document chunk order.
    pub fn split(&self, documents: &[Document]) -> Vec<DocumentChunk> {
        documents
            .iter()
            .flat_map(|doc| self.split_text(&doc.content))
            .map(|content| DocumentChunk { content })
            .collect()
    }

    /// Split one text into chunks of at most `chunk_size` characters, with
    /// `chunk_overlap` characters shared between consecutive chunks. Cuts
    /// prefer a natural boundary in the latter half of the window and fall
    /// back to a hard character cut.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        // byte offset of every char boundary, including the end
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = bounds.len() - 1;

        if total == 0 {
            return Vec::new();
        }
        if total <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let window_end = (start + self.chunk_size).min(total);
            let end = if window_end == total {
                total
            } else {
                self.cut_point(text, &bounds, start, window_end)
            };
            chunks.push(text[bounds[start]..bounds[end]].to_string());
            if end == total {
                break;
            }
            // step back so consecutive chunks share chunk_overlap chars,
            // clamped to keep forward progress
            start = end.saturating_sub(self.chunk_overlap).max(start + 1);
        }
        chunks
    }

    /// Choose the char index where the chunk starting at `start` ends.
    /// Takes the last separator occurrence inside the window, most natural
    /// separator first, but only if it lands in the latter half of the
    /// window (a cut near the window start would degenerate into a run of
    /// tiny chunks). Falls back to a hard cut at the window edge.
    fn cut_point(&self, text: &str, bounds: &[usize], start: usize, window_end: usize) -> usize {
        let window = &text[bounds[start]..bounds[window_end]];
        let min_cut = start + self.chunk_size.div_ceil(2);

        for sep in SEPARATORS {
            if let Some(pos) = window.rfind(sep) {
                let cut = bounds[start] + pos + sep.len();
                // separators are ASCII, so the cut is a char boundary
                let cut_char = bounds
                    .binary_search(&cut)
                    .expect("cut must be a char boundary");
                if cut_char >= min_cut {
                    return cut_char;
                }
            }
        }

        window_end
    }
}
