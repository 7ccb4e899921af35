//! Bridge from a parsed forms pipeline to cache entries.
//!
//! Entries computed from markup in one run become evidence for later runs:
//! the pipeline's uniqued views are flattened into the cache record format
//! and written out with [`varhist_cache::write_batches`].

use varhist_cache::{CachedEntry, VariantRecord, WordclassBlock};
use varhist_markup::FormsList;
use varhist_types::wordclass::Wordclass;

/// Flatten one entry's forms into a cached entry for the given wordclass.
///
/// Every uniqued form goes into the block: unmarked forms carry the base
/// wordclass, and inflected spellings are evidence for the same entry.
/// Verbal spellings ending in `-en` (infinitives and plural inflections of
/// the older language) are flagged so downstream trimming can drop them.
pub fn cache_entry(
    id: &str,
    weight: u32,
    wordclass: Wordclass,
    forms: &mut FormsList,
) -> CachedEntry {
    let verbal = wordclass == Wordclass::Verb;
    let variants: Vec<VariantRecord> = forms
        .uniqued()
        .iter()
        .map(|form| {
            let mut record = VariantRecord::from_form(form);
            record.en_ending = record.en_ending || (verbal && record.form.ends_with("en"));
            record
        })
        .collect();
    CachedEntry {
        id: id.to_string(),
        lemma: forms.headword().to_string(),
        weight,
        blocks: vec![WordclassBlock {
            wordclass: wordclass.tag().to_string(),
            variants,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varhist_types::daterange::DateRange;
    use varhist_types::variant::VariantForm;

    #[test]
    fn entry_carries_uniqued_forms_under_one_block() {
        let base = vec![
            VariantForm::new("wolf", DateRange::of(1500, 0)),
            VariantForm::new("wolfe", DateRange::of(1400, 1699)),
            VariantForm::new("wolfe", DateRange::of(1500, 1750)),
        ];
        let mut forms = FormsList::new("wolf", base);
        let entry = cache_entry("e1", 7, Wordclass::Noun, &mut forms);
        assert_eq!(entry.lemma, "wolf");
        assert_eq!(entry.blocks.len(), 1);
        assert_eq!(entry.blocks[0].wordclass, "NN");
        assert_eq!(entry.blocks[0].variants.len(), 2, "equal spellings merge");
    }

    #[test]
    fn verbal_en_endings_are_flagged() {
        let base = vec![
            VariantForm::new("help", DateRange::of(1500, 0)),
            VariantForm::new("helpen", DateRange::of(1150, 1499)),
        ];
        let mut forms = FormsList::new("help", base.clone());
        let entry = cache_entry("e1", 7, Wordclass::Verb, &mut forms);
        let helpen = entry.blocks[0]
            .variants
            .iter()
            .find(|v| v.form == "helpen")
            .unwrap();
        assert!(helpen.en_ending);
        let help = entry.blocks[0]
            .variants
            .iter()
            .find(|v| v.form == "help")
            .unwrap();
        assert!(!help.en_ending);

        // The ending only matters for verbs.
        let mut forms = FormsList::new("help", base);
        let entry = cache_entry("e2", 7, Wordclass::Noun, &mut forms);
        assert!(entry.blocks[0].variants.iter().all(|v| !v.en_ending));
    }
}
