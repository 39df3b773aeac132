use std::fmt::Write;

use aging_memory::Document;

const DEFAULT_SOURCE: &str = "Aging Research";

/// Builds the grounding, rewriting and fact-checking prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Expert persona, numbered context items with their sources, then the question.
    #[must_use]
    pub fn answer(&self, query: &str, context: &[Document]) -> String {
        let mut prompt = String::from(
            "You are an expert in the biology of aging and longevity research. \
             Answer the question using the numbered context below and cite the sources \
             you rely on. If the context does not cover the question, say so.\n\n",
        );
        push_context(&mut prompt, context);
        let _ = write!(prompt, "Question: {query}\n\nAnswer:");
        prompt
    }

    #[must_use]
    pub fn rewrite(&self, query: &str) -> String {
        format!(
            "Rewrite the following question about aging biology into a search query. \
             Keep its meaning and add closely related scientific terms, such as genes, \
             pathways, cellular processes and interventions. Return only the expanded query.\n\n\
             Question: {query}\n\nExpanded query:"
        )
    }

    #[must_use]
    pub fn verify(&self, query: &str, answer: &str, context: &[Document]) -> String {
        let mut prompt = String::from(
            "You are a scientific fact-checker for aging biology. Compare the draft answer \
             with the numbered context. Remove or correct any claim the context does not \
             support and return only the corrected answer.\n\n",
        );
        push_context(&mut prompt, context);
        let _ = write!(
            prompt,
            "Question: {query}\n\nDraft answer: {answer}\n\nCorrected answer:"
        );
        prompt
    }
}

fn push_context(prompt: &mut String, context: &[Document]) {
    prompt.push_str("Context:\n");
    for (i, doc) in context.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "[{}] {} (Source: {})",
            i + 1,
            doc.content,
            doc.metadata.source_or(DEFAULT_SOURCE)
        );
    }
    prompt.push('\n');
}
