#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Character budget per chunk; a single oversized paragraph still forms its own chunk.
    pub max_chunk_size: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 1000,
        }
    }
}

/// Paragraph-preserving text chunker.
#[derive(Debug, Clone, Default)]
pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Accumulate blank-line separated paragraphs into chunks of at most
    /// `max_chunk_size` characters.
    #[must_use]
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for paragraph in text.split("\n\n") {
            if !current.is_empty() && current.len() + paragraph.len() > self.config.max_chunk_size
            {
                push_trimmed(&mut chunks, &current);
                current = paragraph.to_owned();
            } else if current.is_empty() {
                current.push_str(paragraph);
            } else {
                current.push_str("\n\n");
                current.push_str(paragraph);
            }
        }

        push_trimmed(&mut chunks, &current);
        chunks
    }
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_owned());
    }
}

/// Split text into trimmed sentences on `.`, `?`, `!` followed by a space and on paragraph breaks.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        current.push(chars[i]);

        // Split on paragraph breaks
        if chars[i] == '\n' && i + 1 < chars.len() && chars[i + 1] == '\n' {
            i += 1;
            push_trimmed(&mut sentences, &current);
            current.clear();
        }
        // Split on sentence endings followed by space
        else if (chars[i] == '.' || chars[i] == '?' || chars[i] == '!')
            && i + 1 < chars.len()
            && chars[i + 1].is_whitespace()
            && !current.trim().is_empty()
        {
            push_trimmed(&mut sentences, &current);
            current.clear();
        }

        i += 1;
    }

    push_trimmed(&mut sentences, &current);
    sentences
}
