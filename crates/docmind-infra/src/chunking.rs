//! Page content chunking for embeddings.
//!
//! Splits on semantic boundaries with `text-splitter`; markdown content
//! goes through the markdown-aware splitter so headings and lists stay
//! together. Offsets are reported in characters, not bytes.

use text_splitter::{MarkdownSplitter, TextSplitter};

use docmind_types::embedding::{ContentFormat, TextChunk};

/// Target chunk size in characters.
pub const CHUNK_CAPACITY: usize = 1000;

/// Split `content` into chunks of at most [`CHUNK_CAPACITY`] characters.
///
/// Whitespace-only content yields no chunks.
pub fn chunk_content(content: &str, format: ContentFormat) -> Vec<TextChunk> {
    let pieces: Vec<(usize, &str)> = match format {
        ContentFormat::Markdown => MarkdownSplitter::new(CHUNK_CAPACITY)
            .chunk_indices(content)
            .collect(),
        ContentFormat::Text => TextSplitter::new(CHUNK_CAPACITY)
            .chunk_indices(content)
            .collect(),
    };

    // Walk byte offsets forward once, counting characters as we go.
    let mut chunks = Vec::with_capacity(pieces.len());
    let mut byte_cursor = 0;
    let mut char_cursor = 0;
    for (index, (byte_offset, text)) in pieces.into_iter().enumerate() {
        char_cursor += content[byte_cursor..byte_offset].chars().count();
        byte_cursor = byte_offset;

        chunks.push(TextChunk {
            index: index as u32,
            start: char_cursor as u32,
            length: text.chars().count() as u32,
            text: text.to_string(),
        });
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substring(content: &str, chunk: &TextChunk) -> String {
        content
            .chars()
            .skip(chunk.start as usize)
            .take(chunk.length as usize)
            .collect()
    }

    #[test]
    fn test_empty_content_has_no_chunks() {
        assert!(chunk_content("", ContentFormat::Text).is_empty());
        assert!(chunk_content("   \n\n ", ContentFormat::Markdown).is_empty());
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = chunk_content("A short page.", ContentFormat::Text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].start, 0);
        assert_eq!(chunks[0].text, "A short page.");
    }

    #[test]
    fn test_offsets_are_characters_and_in_order() {
        let paragraph = "Ünïcödé säfe sentence with ümlauts and ßharp s. ";
        let content = paragraph.repeat(80);
        let chunks = chunk_content(&content, ContentFormat::Text);
        assert!(chunks.len() > 1);

        let mut previous_end = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index as usize, i);
            assert!(chunk.length as usize <= CHUNK_CAPACITY);
            assert!(chunk.start >= previous_end);
            assert_eq!(substring(&content, chunk), chunk.text);
            previous_end = chunk.start + chunk.length;
        }
    }

    #[test]
    fn test_markdown_chunks_map_back_to_source() {
        let section = "## Heading\n\nSome paragraph text that goes on for a while.\n\n- item one\n- item two\n\n";
        let content = section.repeat(40);
        let chunks = chunk_content(&content, ContentFormat::Markdown);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert_eq!(substring(&content, chunk), chunk.text);
        }
    }
}
