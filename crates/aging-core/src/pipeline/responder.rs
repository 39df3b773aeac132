//! Deterministic templated answers used when no generative capability can answer.

use std::fmt::Write;

use aging_memory::Document;

pub const NO_INFORMATION: &str = "I don't have specific information about that in my aging \
                                  biology knowledge base. Please ask another question related \
                                  to aging.";

const HALLMARK_TERMS: &[&str] = &["hallmark", "hallmarks", "characteristic", "characteristics"];
const INTERVENTION_TERMS: &[&str] = &["intervention", "extend", "lifespan", "longevity", "treatment"];
const MECHANISM_TERMS: &[&str] = &["mechanism", "cause", "pathway", "molecular", "cellular"];

const INTERVENTION_CONTENT_TERMS: &[&str] =
    &["intervention", "restrict", "treatment", "therapy", "extend", "lifespan"];
const MECHANISM_CONTENT_TERMS: &[&str] = &["mechanism", "pathway", "molecular", "cellular"];

const DEFAULT_SOURCE: &str = "Aging Research";

/// Query family used to pick an answer template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Hallmarks,
    Interventions,
    Mechanisms,
    General,
}

impl QueryKind {
    /// First matching keyword family wins, in hallmark, intervention, mechanism order.
    #[must_use]
    pub fn classify(query: &str) -> Self {
        let lower = query.to_lowercase();
        let mentions = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));
        if mentions(HALLMARK_TERMS) {
            Self::Hallmarks
        } else if mentions(INTERVENTION_TERMS) {
            Self::Interventions
        } else if mentions(MECHANISM_TERMS) {
            Self::Mechanisms
        } else {
            Self::General
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedResponder;

impl RuleBasedResponder {
    /// Always returns a non-empty answer. An empty context yields [`NO_INFORMATION`].
    #[must_use]
    pub fn respond(&self, query: &str, context: &[Document]) -> String {
        if context.is_empty() {
            return NO_INFORMATION.to_owned();
        }
        match QueryKind::classify(query) {
            QueryKind::Hallmarks => hallmarks(context),
            QueryKind::Interventions => interventions(context),
            QueryKind::Mechanisms => mechanisms(context),
            QueryKind::General => general(query, context),
        }
    }
}

fn source(doc: &Document) -> &str {
    doc.metadata.source_or(DEFAULT_SOURCE)
}

fn content_mentions(doc: &Document, terms: &[&str]) -> bool {
    let lower = doc.content.to_lowercase();
    terms.iter().any(|t| lower.contains(t))
}

fn has_category(doc: &Document, category: &str) -> bool {
    doc.metadata.category.as_deref() == Some(category)
}

fn hallmarks(context: &[Document]) -> String {
    let hallmark_docs: Vec<&Document> = context
        .iter()
        .filter(|d| d.content.to_lowercase().contains("hallmark"))
        .collect();

    if hallmark_docs.is_empty() {
        return "Aging is characterized by several hallmarks, including genomic instability, \
                telomere attrition, and cellular senescence. These processes contribute to the \
                gradual decline in physiological function that we recognize as aging."
            .to_owned();
    }

    let mut out = String::from(
        "## Hallmarks of Aging\n\nThe scientific understanding of aging has converged on nine \
         hallmarks that contribute to the aging process:\n\n",
    );

    let Some(doc) = hallmark_docs
        .iter()
        .find(|d| d.content.to_lowercase().contains("nine hallmarks"))
    else {
        out.push_str(
            "The key hallmarks include genomic instability, telomere attrition, epigenetic \
             alterations, loss of proteostasis, deregulated nutrient sensing, mitochondrial \
             dysfunction, cellular senescence, stem cell exhaustion, and altered intercellular \
             communication.",
        );
        return out;
    };

    let Some((_, list)) = doc.content.split_once(':') else {
        out.push_str(&doc.content);
        return out;
    };

    for (i, hallmark) in list.trim().split(", ").enumerate() {
        let _ = writeln!(out, "{}. **{}**", i + 1, hallmark.trim());
    }
    let _ = write!(
        out,
        "\nSource: {}\n\n",
        doc.metadata.source_or("Research on Aging Hallmarks")
    );
    out.push_str(
        "These hallmarks represent the primary mechanisms that contribute to age-related decline \
         in organisms. Understanding these processes is crucial for developing interventions \
         that may slow or reverse aspects of aging.",
    );
    out
}

fn interventions(context: &[Document]) -> String {
    let docs: Vec<&Document> = context
        .iter()
        .filter(|d| has_category(d, "interventions") || content_mentions(d, INTERVENTION_CONTENT_TERMS))
        .collect();

    if docs.is_empty() {
        return "Several interventions have shown promise in aging research, including caloric \
                restriction, rapamycin, senolytics (compounds that eliminate senescent cells), \
                and NAD+ precursors. Research is ongoing to understand how these interventions \
                might be applied to promote healthy aging in humans."
            .to_owned();
    }

    let mut out = String::from(
        "## Interventions in Aging Research\n\nSeveral interventions have shown promise in \
         extending lifespan or healthspan in model organisms:\n\n",
    );
    for doc in docs {
        let _ = write!(out, "- **{}**\n  Source: {}\n\n", doc.content, source(doc));
    }
    out.push_str(
        "Research on these interventions is ongoing, with a focus on translating findings from \
         model organisms to potential applications in human aging.",
    );
    out
}

fn mechanisms(context: &[Document]) -> String {
    let docs: Vec<&Document> = context
        .iter()
        .filter(|d| has_category(d, "aging_mechanisms") || content_mentions(d, MECHANISM_CONTENT_TERMS))
        .collect();

    if docs.is_empty() {
        return "Aging involves complex molecular and cellular mechanisms, including accumulation \
                of DNA damage, protein misfolding, cellular senescence, and chronic inflammation. \
                These processes interact to drive the physiological changes associated with aging."
            .to_owned();
    }

    let mut out = String::from("## Molecular and Cellular Mechanisms of Aging\n\n");
    for doc in docs {
        let _ = write!(out, "- {}\n  Source: {}\n\n", doc.content, source(doc));
    }
    out.push_str(
        "These mechanisms interact in complex ways to drive the aging phenotype. Understanding \
         these interactions is a key focus of current aging research.",
    );
    out
}

fn general(query: &str, context: &[Document]) -> String {
    let mut out = format!(
        "## Information on Aging Biology\n\nBased on your query about '{query}', here's what \
         current research indicates:\n\n"
    );
    for doc in context {
        let _ = write!(out, "- {}\n  Source: {}\n\n", doc.content, source(doc));
    }
    out.push_str(
        "This information represents current understanding in the field of aging biology and is \
         subject to revision as new research emerges.",
    );
    out
}
