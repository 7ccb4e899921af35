//! Lazy, memoized pipeline of filtered views over one entry's forms.
//!
//! Each stage is derived deterministically from the one before it and cached
//! in an explicit `Option` field on first access; nothing is recomputed once
//! populated. The chain is base -> detruncated -> uniqued -> marked/unmarked
//! -> per-inflection.

use std::collections::HashMap;

use varhist_types::daterange::DateRange;
use varhist_types::grammar::GrammarCategory;
use varhist_types::variant::{VariantForm, normalize};

use crate::detrunc::{self, TruncationChecker};
use crate::node::Node;
use crate::{revised, unrevised};

/// A named pipeline stage that synthetic forms can be appended to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Base,
    Detruncated,
    Uniqued,
    Marked,
    Unmarked,
}

/// The variant-forms pipeline for one entry.
pub struct FormsList {
    headword: String,
    base: Vec<VariantForm>,
    detruncated: Option<Vec<VariantForm>>,
    uniqued: Option<Vec<VariantForm>>,
    marked: Option<Vec<VariantForm>>,
    unmarked: Option<Vec<VariantForm>>,
    inflections: HashMap<GrammarCategory, Vec<VariantForm>>,
}

impl FormsList {
    pub fn new(headword: &str, base: Vec<VariantForm>) -> Self {
        FormsList {
            headword: headword.to_string(),
            base,
            detruncated: None,
            uniqued: None,
            marked: None,
            unmarked: None,
            inflections: HashMap::new(),
        }
    }

    /// Build the pipeline from a revised-dialect subtree.
    pub fn from_revised(headword: &str, root: &Node) -> Self {
        FormsList::new(headword, revised::parse(root))
    }

    /// Build the pipeline from an unrevised-dialect subtree.
    pub fn from_unrevised(headword: &str, nodes: &[Node]) -> Self {
        FormsList::new(headword, unrevised::parse(nodes))
    }

    pub fn headword(&self) -> &str {
        &self.headword
    }

    pub fn base(&self) -> &[VariantForm] {
        &self.base
    }

    /// Base forms with truncated fragments expanded against a running
    /// comparator: the headword at each section boundary, then each full
    /// form as it is encountered. Fragments no strategy can expand are left
    /// as they are.
    pub fn detruncated(&mut self) -> &[VariantForm] {
        if self.detruncated.is_none() {
            let checker = TruncationChecker::new(&self.headword);
            let mut out = Vec::with_capacity(self.base.len());
            let mut comparator = self.headword.clone();
            let mut section: Option<String> = None;

            for form in &self.base {
                let mut form = form.clone();
                if form.structural_id != section {
                    section = form.structural_id.clone();
                    comparator = self.headword.clone();
                }

                let mut text = form.original_text.clone();
                if !form.is_truncated()
                    && let Some(checker) = &checker
                    && let Some(marked) = checker.mark(&form.form)
                {
                    // Component-sized variant of a compound headword; treat
                    // it as a truncation of the matching component.
                    text = marked;
                }

                if text.starts_with('-') || text.ends_with('-') {
                    if let Some(full) = detrunc::detruncate(&comparator, &text) {
                        form.set_text(&full);
                    }
                } else {
                    comparator = form.form.clone();
                }
                out.push(form);
            }
            self.detruncated = Some(out);
        }
        self.detruncated.as_deref().unwrap_or_default()
    }

    /// Detruncated forms merged by identical normalized spelling and
    /// identical grammar signature.
    pub fn uniqued(&mut self) -> &[VariantForm] {
        if self.uniqued.is_none() {
            let detruncated = self.detruncated().to_vec();
            let mut out: Vec<VariantForm> = Vec::with_capacity(detruncated.len());
            let mut index: HashMap<(String, String), usize> = HashMap::new();
            for form in detruncated {
                let key = (form.form.clone(), form.grammar_signature());
                match index.get(&key) {
                    Some(&i) => out[i].merge(&form),
                    None => {
                        index.insert(key, out.len());
                        out.push(form);
                    }
                }
            }
            self.uniqued = Some(out);
        }
        self.uniqued.as_deref().unwrap_or_default()
    }

    /// Uniqued forms carrying no grammatical marking (the headword's own
    /// wordclass).
    pub fn unmarked(&mut self) -> &[VariantForm] {
        if self.unmarked.is_none() {
            self.split_marked();
        }
        self.unmarked.as_deref().unwrap_or_default()
    }

    /// Uniqued forms carrying a grammatical marking.
    pub fn marked(&mut self) -> &[VariantForm] {
        if self.marked.is_none() {
            self.split_marked();
        }
        self.marked.as_deref().unwrap_or_default()
    }

    fn split_marked(&mut self) {
        let uniqued = self.uniqued().to_vec();
        let (marked, unmarked): (Vec<_>, Vec<_>) =
            uniqued.into_iter().partition(|f| !f.is_unmarked());
        self.marked = Some(marked);
        self.unmarked = Some(unmarked);
    }

    /// Marked forms for one inflection. Compound and negative markings are
    /// never inflections of the headword and are always excluded.
    pub fn inflection(&mut self, category: GrammarCategory) -> &[VariantForm] {
        if !self.inflections.contains_key(&category) {
            let forms = if matches!(
                category,
                GrammarCategory::Compound | GrammarCategory::Negative
            ) {
                Vec::new()
            } else {
                self.marked()
                    .iter()
                    .filter(|f| f.grammar_category() == Some(category))
                    .cloned()
                    .collect()
            };
            self.inflections.insert(category, forms);
        }
        self.inflections
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Append a synthetic form to a stage unless an equal spelling is
    /// already present. Returns whether it was added.
    pub fn append(&mut self, stage: Stage, text: &str, start: u32, end: u32) -> bool {
        let normalized = normalize(text);
        let form = VariantForm::computed(text, DateRange::of(start, end));
        let target = match stage {
            Stage::Base => &mut self.base,
            Stage::Detruncated => {
                self.detruncated();
                self.detruncated.as_mut().unwrap_or(&mut self.base)
            }
            Stage::Uniqued => {
                self.uniqued();
                self.uniqued.as_mut().unwrap_or(&mut self.base)
            }
            Stage::Marked => {
                self.marked();
                self.marked.as_mut().unwrap_or(&mut self.base)
            }
            Stage::Unmarked => {
                self.unmarked();
                self.unmarked.as_mut().unwrap_or(&mut self.base)
            }
        };
        if target.iter().any(|f| f.form == normalized) {
            return false;
        }
        target.push(form);
        true
    }
}
