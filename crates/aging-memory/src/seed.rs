//! Built-in knowledge written to an empty store on first open.

use crate::document::{Document, DocumentMetadata};

/// The five canonical aging-biology facts every fresh store starts with.
#[must_use]
pub fn default_knowledge() -> Vec<Document> {
    vec![
        Document::new(
            "hallmarks_aging_1",
            "Aging is characterized by nine hallmarks: genomic instability, telomere attrition, \
             epigenetic alterations, loss of proteostasis, deregulated nutrient sensing, \
             mitochondrial dysfunction, cellular senescence, stem cell exhaustion, and altered \
             intercellular communication.",
            DocumentMetadata::with_source("Hallmarks of Aging, López-Otín et al., 2013")
                .category("aging_mechanisms"),
        ),
        Document::new(
            "caloric_restriction_1",
            "Caloric restriction has been shown to extend lifespan in various model organisms \
             including yeast, worms, flies, and mice.",
            DocumentMetadata::with_source("Caloric Restriction Research").category("interventions"),
        ),
        Document::new(
            "cell_senescence_1",
            "Senescent cells accumulate with age and secrete pro-inflammatory cytokines, \
             chemokines, and extracellular matrix proteases, collectively known as the \
             senescence-associated secretory phenotype (SASP).",
            DocumentMetadata::with_source("Cellular Senescence Research")
                .category("aging_mechanisms"),
        ),
        Document::new(
            "rapamycin_1",
            "Rapamycin, which inhibits the mTOR pathway, has been shown to extend lifespan in mice \
             and is being studied for its potential anti-aging effects in humans.",
            DocumentMetadata::with_source("mTOR Inhibition Research").category("interventions"),
        ),
        Document::new(
            "mitochondria_1",
            "Mitochondrial dysfunction is a key hallmark of aging, characterized by reduced \
             efficiency in the electron transport chain and increased production of reactive \
             oxygen species.",
            DocumentMetadata::with_source("Mitochondrial Theory of Aging")
                .category("aging_mechanisms"),
        ),
    ]
}
