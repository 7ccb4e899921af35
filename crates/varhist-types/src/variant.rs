//! One attested spelling variant with its range and reliability flags.

use crate::daterange::{DateRange, PROJECTED_END};
use crate::grammar::{self, GrammarCategory};
use crate::wordclass::Wordclass;

/// Salience penalty for not matching the base lemma spelling.
pub const MISMATCH_WEIGHT: i64 = 500;

/// Salience penalty for a regional form.
pub const REGIONAL_WEIGHT: i64 = 1500;

/// Salience penalty for an irregular form.
pub const IRREGULAR_WEIGHT: i64 = 2000;

/// Labels and header text indicating an irregular or corrupt transmission.
const IRREGULARITY_INDICATORS: &[&str] = &[
    "irreg",
    "erron",
    "misprint",
    "transmission error",
    "curtailed",
    "contracted",
    "aphetic",
    "inverted spelling",
];

/// Header text indicating a regionally restricted form.
const REGIONAL_INDICATORS: &[&str] = &[
    "sc.",
    "scottish",
    "north",
    "south",
    "midlands",
    "dial",
    "u.s.",
    "irish english",
    "welsh english",
    "regional",
    "caribbean",
    "n.z.",
];

/// A historically attested spelling of a headword, valid over a date range.
///
/// `original_text` preserves the source spelling (affix hyphens, optional
/// bracket groups); `form` is the normalized comparison spelling with those
/// markers stripped.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantForm {
    pub original_text: String,
    pub form: String,
    pub date: DateRange,
    pub wordclass: Option<Wordclass>,
    pub regional: bool,
    pub irregular: bool,
    pub has_en_ending: bool,
    pub undated: bool,
    /// Synthesized rather than read from source markup.
    pub computed: bool,
    /// Identifier of the markup section this form was parsed from.
    pub structural_id: Option<String>,
    /// Annotation text inherited from ancestor sections, outermost last.
    pub headers: Vec<String>,
    pub header_labels: Vec<String>,
    pub label: Option<String>,
    pub grammatical_information: Option<String>,
}

impl VariantForm {
    pub fn new(text: &str, date: DateRange) -> Self {
        let undated = date.start() == 0 && date.end() == 0;
        VariantForm {
            original_text: text.to_string(),
            form: normalize(text),
            date,
            wordclass: None,
            regional: false,
            irregular: false,
            has_en_ending: false,
            undated,
            computed: false,
            structural_id: None,
            headers: Vec::new(),
            header_labels: Vec::new(),
            label: None,
            grammatical_information: None,
        }
    }

    /// A synthesized form (not present in source markup).
    pub fn computed(text: &str, date: DateRange) -> Self {
        let mut form = VariantForm::new(text, date);
        form.computed = true;
        form
    }

    /// Re-derive the normalized form after the display text changed.
    pub fn set_text(&mut self, text: &str) {
        self.original_text = text.to_string();
        self.form = normalize(text);
    }

    /// True when the source recorded this as an affix fragment (`-ing`,
    /// `un-`).
    pub fn is_truncated(&self) -> bool {
        self.original_text.starts_with('-') || self.original_text.ends_with('-')
    }

    /// The governing grammatical category, if any marking applies.
    pub fn grammar_category(&self) -> Option<GrammarCategory> {
        grammar::classify(
            self.grammatical_information.as_deref(),
            &self.headers,
            &self.form,
        )
    }

    /// True when no grammatical marking applies, i.e. the form represents the
    /// headword's base wordclass.
    pub fn is_unmarked(&self) -> bool {
        self.grammar_category().is_none()
    }

    /// Canonical grammar-marking string used when uniquing equal spellings.
    pub fn grammar_signature(&self) -> String {
        grammar::signature(self.grammatical_information.as_deref(), &self.headers)
    }

    /// Derive the regional and irregular flags from the explicit label and
    /// the inherited header annotations.
    pub fn infer_marks(&mut self) {
        let label_irregular = self
            .label
            .as_deref()
            .is_some_and(is_irregularity_indicator);
        let inherited_irregular = self
            .header_labels
            .iter()
            .chain(self.headers.iter())
            .any(|text| is_irregularity_indicator(text));
        self.irregular = self.irregular || label_irregular || inherited_irregular;

        // Any label that does not indicate irregularity is a regional label.
        let label_regional = self.label.is_some() && !label_irregular;
        let inherited_regional = self
            .header_labels
            .iter()
            .chain(self.headers.iter())
            .any(|text| is_regional_indicator(text));
        self.regional = self.regional || label_regional || inherited_regional;
    }

    /// Fold `other` into this form: the date ranges are unioned and the
    /// reliability flags are taken from whichever side is more important
    /// (later projected end, wider span on a tie).
    pub fn merge(&mut self, other: &VariantForm) {
        if more_important(other, self) {
            self.regional = other.regional;
            self.irregular = other.irregular;
            self.has_en_ending = other.has_en_ending;
            self.label = other.label.clone();
            if other.wordclass.is_some() {
                self.wordclass = other.wordclass;
            }
        }
        self.date.extend_range(&other.date);
        self.undated = self.undated && other.undated;
    }

    /// Ranking score, lower is more salient. Penalizes mismatch with the base
    /// lemma, recency deficit, regionality, and irregularity.
    pub fn sort_score(&self, base_lemma: &str) -> i64 {
        let mut score = 0i64;
        if self.form != base_lemma {
            score += MISMATCH_WEIGHT;
        }
        score += i64::from(PROJECTED_END.saturating_sub(self.date.projected_end()));
        if self.regional {
            score += REGIONAL_WEIGHT;
        }
        if self.irregular {
            score += IRREGULAR_WEIGHT;
        }
        score
    }
}

/// `other` carries the flags when it projects later, or spans wider on a tie.
fn more_important(other: &VariantForm, current: &VariantForm) -> bool {
    let (oe, ce) = (other.date.projected_end(), current.date.projected_end());
    if oe != ce {
        return oe > ce;
    }
    other.date.span() > current.date.span()
}

/// Strip affix hyphens and bracket characters for comparison; display text is
/// kept elsewhere.
pub fn normalize(text: &str) -> String {
    let trimmed = text.trim().trim_matches('-');
    trimmed
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '[' | ']'))
        .collect()
}

fn is_irregularity_indicator(text: &str) -> bool {
    let text = text.to_lowercase();
    IRREGULARITY_INDICATORS.iter().any(|kw| text.contains(kw))
}

fn is_regional_indicator(text: &str) -> bool {
    let text = text.to_lowercase();
    REGIONAL_INDICATORS.iter().any(|kw| text.contains(kw))
}
