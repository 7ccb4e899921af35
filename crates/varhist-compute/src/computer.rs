//! The top-level evidence chain producing one variant set per request.
//!
//! Evidence sources are tried in a fixed order: cached parses for the entry
//! itself and its hint entries, component recombination for compounds, and
//! finally a synthetic form equal to the lemma. Each fallback taken is
//! logged at debug level. The cache is injected and read-only; the computer
//! holds no state of its own beyond the cap.

use std::collections::HashSet;

use tracing::debug;
use varhist_cache::{CachedEntry, VariantCache, WordclassBlock};
use varhist_types::daterange::{CURRENT_CUTOFF, DateRange};
use varhist_types::variant::{VariantForm, normalize};
use varhist_types::wordclass::Wordclass;

use crate::combiner::{self, ComponentList, DEFAULT_CAP};
use crate::lemma::CompoundLemma;

/// One unit of work: a headword with its lookup keys and requested window.
#[derive(Clone, Debug)]
pub struct ComputeRequest {
    /// Structural identifier of the entry itself, if known.
    pub id: Option<String>,
    pub lemma: String,
    pub wordclass: Option<Wordclass>,
    pub range: DateRange,
    /// Declared alternate headword spelling, always present in the output.
    pub alternate: Option<String>,
    /// Identifiers of related entries to consult for extra evidence.
    pub hints: Vec<String>,
}

impl ComputeRequest {
    pub fn new(lemma: &str, range: DateRange) -> Self {
        ComputeRequest {
            id: None,
            lemma: lemma.to_string(),
            wordclass: None,
            range,
            alternate: None,
            hints: Vec::new(),
        }
    }
}

/// Orchestrator over the injected read-only cache.
pub struct VariantsComputer<'a> {
    cache: &'a VariantCache,
    cap: usize,
}

impl<'a> VariantsComputer<'a> {
    pub fn new(cache: &'a VariantCache) -> Self {
        VariantsComputer {
            cache,
            cap: DEFAULT_CAP,
        }
    }

    pub fn with_cap(cache: &'a VariantCache, cap: usize) -> Self {
        VariantsComputer { cache, cap }
    }

    /// Compute the ordered variant set for one request.
    pub fn compute(&self, request: &ComputeRequest) -> Vec<VariantForm> {
        let mut forms = self.resolve(
            &request.lemma,
            request.id.as_deref(),
            &request.hints,
            request.wordclass,
            &request.range,
        );
        self.post_pass(request, &mut forms);

        let lemma = normalize(&request.lemma);
        forms.sort_by_key(|f| f.sort_score(&lemma));
        forms
    }

    /// The evidence chain proper; never returns an empty list.
    fn resolve(
        &self,
        lemma: &str,
        id: Option<&str>,
        hints: &[String],
        wordclass: Option<Wordclass>,
        range: &DateRange,
    ) -> Vec<VariantForm> {
        let cached = self.cached_evidence(lemma, id, hints, wordclass, range);
        if !cached.is_empty() {
            return cached;
        }

        let compound = CompoundLemma::split(lemma);
        if compound.is_compound() {
            debug!(lemma, "no cached evidence; recombining components");
            let lists: Vec<ComponentList> = compound
                .components
                .iter()
                .map(|component| ComponentList {
                    forms: self.resolve(&component.text, None, &[], wordclass, range),
                    connector: component.connector,
                })
                .collect();
            let combined = combiner::combine(lists, self.cap, Some(range));
            if !combined.is_empty() {
                return combined;
            }
        }

        debug!(lemma, "no evidence at all; falling back to the lemma itself");
        vec![synthetic(lemma, range)]
    }

    /// Steps 1-3: gather primary and hint candidates, filter to the target
    /// wordclass (falling back to all blocks), take the best-attested entry,
    /// and intersect its variants with the requested range.
    fn cached_evidence(
        &self,
        lemma: &str,
        id: Option<&str>,
        hints: &[String],
        wordclass: Option<Wordclass>,
        range: &DateRange,
    ) -> Vec<VariantForm> {
        let mut candidates: Vec<&CachedEntry> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut push = |entry: &'a CachedEntry, candidates: &mut Vec<&'a CachedEntry>| {
            if seen.insert(entry.id.as_str()) {
                candidates.push(entry);
            }
        };
        if let Some(id) = id
            && let Some(entry) = self.cache.by_id(id)
        {
            push(entry, &mut candidates);
        }
        for entry in self.cache.by_lemma(lemma) {
            push(entry, &mut candidates);
        }
        for hint in hints {
            if let Some(entry) = self.cache.by_id(hint) {
                push(entry, &mut candidates);
            }
        }
        if candidates.is_empty() {
            return Vec::new();
        }

        let tag = wordclass.map(Wordclass::tag);
        let mut scoped: Vec<(&CachedEntry, Vec<&WordclassBlock>)> = candidates
            .iter()
            .map(|entry| {
                let blocks = entry
                    .blocks
                    .iter()
                    .filter(|block| tag.is_none_or(|t| block.wordclass == t))
                    .collect::<Vec<_>>();
                (*entry, blocks)
            })
            .filter(|(_, blocks)| !blocks.is_empty())
            .collect();
        if scoped.is_empty() {
            debug!(lemma, "no candidate matches the wordclass; using all blocks");
            scoped = candidates
                .iter()
                .map(|entry| (*entry, entry.blocks.iter().collect::<Vec<_>>()))
                .filter(|(_, blocks)| !blocks.is_empty())
                .collect();
        }

        let Some((best, blocks)) = scoped.into_iter().max_by_key(|(entry, _)| entry.weight)
        else {
            return Vec::new();
        };
        debug!(lemma, entry = %best.id, weight = best.weight, "using cached evidence");

        let mut out = Vec::new();
        for block in blocks {
            let wordclass = Wordclass::from_tag(&block.wordclass);
            for record in &block.variants {
                let mut form = record.clone().into_form();
                let Some(narrowed) = form.date.overlap(range) else {
                    continue;
                };
                form.date = narrowed;
                form.wordclass = wordclass;
                out.push(form);
            }
        }
        out
    }

    /// Adjustments applied after the evidence chain, in order: alternate
    /// spelling injection, modern-spelling end-date extension, and the
    /// productive hyphen/space/solid variations for two-word compounds.
    fn post_pass(&self, request: &ComputeRequest, forms: &mut Vec<VariantForm>) {
        if let Some(alternate) = &request.alternate {
            let spelling = normalize(alternate);
            if !spelling.is_empty() && !forms.iter().any(|f| f.form == spelling) {
                debug!(alternate = %alternate, "injecting declared alternate spelling");
                forms.push(synthetic(alternate, &request.range));
            }
        }

        // Component-derived evidence can stamp the modern spelling with a
        // short end date; a still-current lemma must not read as obsolete.
        if request.range.projected_end() > CURRENT_CUTOFF {
            let lemma = normalize(&request.lemma);
            for form in forms.iter_mut() {
                if form.form == lemma && form.date.projected_end() < request.range.projected_end()
                {
                    form.date.set_end(request.range.end());
                    form.date.hard_end = false;
                    form.date.explicit_obsolete = false;
                }
            }
        }

        let compound = CompoundLemma::split(&request.lemma);
        if compound.components.len() == 2 && !CompoundLemma::is_affix(&request.lemma) {
            let first = &compound.components[0].text;
            let second = &compound.components[1].text;
            for joined in [
                format!("{first} {second}"),
                format!("{first}-{second}"),
                format!("{first}{second}"),
            ] {
                let spelling = normalize(&joined);
                if spelling != normalize(&request.lemma)
                    && !forms.iter().any(|f| f.form == spelling)
                {
                    debug!(variant = %joined, "injecting productive compound variation");
                    forms.push(synthetic(&joined, &request.range));
                }
            }
        }
    }
}

/// A computed form equal to the given text, spanning the requested window.
fn synthetic(text: &str, range: &DateRange) -> VariantForm {
    let mut form = VariantForm::computed(text, DateRange::of(range.start(), range.end()));
    form.date.hard_end = range.hard_end;
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use varhist_cache::VariantRecord;
    use varhist_types::daterange::{PROJECTED_END, UNKNOWN};

    fn record(form: &str, start: u32, end: u32) -> VariantRecord {
        VariantRecord {
            form: form.to_string(),
            start,
            end,
            regional: false,
            irregular: false,
            undated: false,
            en_ending: false,
        }
    }

    fn entry(id: &str, lemma: &str, weight: u32, blocks: Vec<WordclassBlock>) -> CachedEntry {
        CachedEntry {
            id: id.to_string(),
            lemma: lemma.to_string(),
            weight,
            blocks,
        }
    }

    fn block(tag: &str, variants: Vec<VariantRecord>) -> WordclassBlock {
        WordclassBlock {
            wordclass: tag.to_string(),
            variants,
        }
    }

    fn cache_of(entries: Vec<CachedEntry>) -> VariantCache {
        let dir = tempfile::tempdir().unwrap();
        varhist_cache::write_batches(dir.path(), &entries, 100).unwrap();
        VariantCache::load(dir.path(), varhist_cache::LoadMode::Owned).unwrap()
    }

    #[test]
    fn no_evidence_yields_the_lemma_itself() {
        let cache = VariantCache::empty();
        let computer = VariantsComputer::new(&cache);
        let request = ComputeRequest::new("zyzzle", DateRange::of(1900, UNKNOWN));
        let forms = computer.compute(&request);
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].form, "zyzzle");
        assert!(forms[0].computed);
        assert_eq!(forms[0].date.start(), 1900);
        assert_eq!(forms[0].date.projected_end(), PROJECTED_END);
    }

    #[test]
    fn cached_evidence_is_intersected_with_the_request_range() {
        let cache = cache_of(vec![entry(
            "e1",
            "wolf",
            5,
            vec![block(
                "NN",
                vec![record("wulf", 750, 1499), record("wolf", 1500, UNKNOWN)],
            )],
        )]);
        let computer = VariantsComputer::new(&cache);
        let mut request = ComputeRequest::new("wolf", DateRange::of(1600, UNKNOWN));
        request.wordclass = Some(Wordclass::Noun);
        let forms = computer.compute(&request);

        // "wulf" (ends 1499) is disjoint with the request window.
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].form, "wolf");
        assert_eq!(forms[0].wordclass, Some(Wordclass::Noun));
    }

    #[test]
    fn wordclass_filter_falls_back_to_all_blocks() {
        let cache = cache_of(vec![entry(
            "e1",
            "wolf",
            5,
            vec![block("NN", vec![record("wolf", 1500, UNKNOWN)])],
        )]);
        let computer = VariantsComputer::new(&cache);
        let mut request = ComputeRequest::new("wolf", DateRange::of(1500, UNKNOWN));
        request.wordclass = Some(Wordclass::Verb);
        let forms = computer.compute(&request);
        assert_eq!(forms[0].form, "wolf");
    }

    #[test]
    fn best_attested_entry_wins() {
        let cache = cache_of(vec![
            entry(
                "e1",
                "wolf",
                2,
                vec![block("NN", vec![record("wolff", 1500, UNKNOWN)])],
            ),
            entry(
                "e2",
                "wolf",
                9,
                vec![block("NN", vec![record("wolf", 1500, UNKNOWN)])],
            ),
        ]);
        let computer = VariantsComputer::new(&cache);
        let forms = computer.compute(&ComputeRequest::new("wolf", DateRange::of(1500, UNKNOWN)));
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].form, "wolf");
    }

    #[test]
    fn hint_entries_supply_evidence() {
        let cache = cache_of(vec![entry(
            "other_id",
            "lupine",
            3,
            vec![block("NN", vec![record("wolfish", 1600, UNKNOWN)])],
        )]);
        let computer = VariantsComputer::new(&cache);
        let mut request = ComputeRequest::new("wolfish", DateRange::of(1500, UNKNOWN));
        request.hints = vec!["other_id".to_string()];
        let forms = computer.compute(&request);
        assert_eq!(forms[0].form, "wolfish");
        assert!(!forms[0].computed);
    }

    #[test]
    fn compounds_recombine_component_evidence() {
        let cache = cache_of(vec![
            entry(
                "w",
                "well",
                5,
                vec![block(
                    "NN",
                    vec![record("well", 1500, UNKNOWN), record("welle", 1400, 1599)],
                )],
            ),
            entry(
                "h",
                "head",
                5,
                vec![block(
                    "NN",
                    vec![record("head", 1500, UNKNOWN), record("hede", 1400, 1599)],
                )],
            ),
        ]);
        let computer = VariantsComputer::new(&cache);
        let request = ComputeRequest::new("well-head", DateRange::of(1400, UNKNOWN));
        let forms = computer.compute(&request);

        assert!(forms.iter().any(|f| f.form == "well-head"));
        assert!(forms.iter().any(|f| f.form == "welle-hede"));
        assert!(forms.iter().all(|f| f.computed));
        // The modern spelling sorts first.
        assert_eq!(forms[0].form, "well-head");

        let old = forms
            .iter()
            .find(|f| f.form == "welle-hede")
            .expect("welle-hede present");
        assert_eq!((old.date.start(), old.date.end()), (1400, 1599));
    }

    #[test]
    fn alternate_spelling_is_injected_once() {
        let cache = VariantCache::empty();
        let computer = VariantsComputer::new(&cache);
        let mut request = ComputeRequest::new("wolf", DateRange::of(1500, UNKNOWN));
        request.alternate = Some("woolf".to_string());
        let forms = computer.compute(&request);
        assert!(forms.iter().any(|f| f.form == "woolf"));

        request.alternate = Some("wolf".to_string());
        let forms = computer.compute(&request);
        assert_eq!(forms.iter().filter(|f| f.form == "wolf").count(), 1);
    }

    #[test]
    fn current_lemma_end_date_is_extended() {
        // Component evidence gives the modern spelling a short end date.
        let cache = cache_of(vec![
            entry(
                "w",
                "well",
                5,
                vec![block("NN", vec![record("well", 1500, 1800)])],
            ),
            entry(
                "h",
                "head",
                5,
                vec![block("NN", vec![record("head", 1500, 1800)])],
            ),
        ]);
        let computer = VariantsComputer::new(&cache);
        let request = ComputeRequest::new("well-head", DateRange::of(1500, UNKNOWN));
        let forms = computer.compute(&request);
        let lemma_form = forms
            .iter()
            .find(|f| f.form == "well-head")
            .expect("lemma spelling present");
        assert_eq!(lemma_form.date.projected_end(), PROJECTED_END);
    }

    #[test]
    fn two_word_compounds_gain_productive_variations() {
        let cache = VariantCache::empty();
        let computer = VariantsComputer::new(&cache);
        let request = ComputeRequest::new("well head", DateRange::of(1500, UNKNOWN));
        let forms = computer.compute(&request);
        assert!(forms.iter().any(|f| f.form == "well head"));
        assert!(forms.iter().any(|f| f.form == "well-head"));
        assert!(forms.iter().any(|f| f.form == "wellhead"));
    }

    #[test]
    fn affix_lemmas_get_no_productive_variations() {
        let cache = VariantCache::empty();
        let computer = VariantsComputer::new(&cache);
        let request = ComputeRequest::new("over-", DateRange::of(1500, UNKNOWN));
        let forms = computer.compute(&request);
        assert_eq!(forms.len(), 1);
    }
}
