//! Classification of a variant's grammatical role.
//!
//! A fixed, ordered table maps each category to a keyword predicate evaluated
//! against a form's explicit grammatical information first, then against each
//! inherited header in ascending order; the first match governs. Forms that
//! match no category are "unmarked": they represent the headword's own base
//! wordclass.

/// Grammatical role a variant form can be marked with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum GrammarCategory {
    Plural,
    ThirdSingular,
    PresentParticiple,
    PastTense,
    PastParticiple,
    Comparative,
    Superlative,
    Negative,
    Genitive,
    Compound,
    /// Marked as inflected without saying how.
    Inflected,
}

/// Precedence order of the classification table; earlier entries win.
pub const ALL_CATEGORIES: &[GrammarCategory] = &[
    GrammarCategory::Plural,
    GrammarCategory::ThirdSingular,
    GrammarCategory::PresentParticiple,
    GrammarCategory::PastTense,
    GrammarCategory::PastParticiple,
    GrammarCategory::Comparative,
    GrammarCategory::Superlative,
    GrammarCategory::Negative,
    GrammarCategory::Genitive,
    GrammarCategory::Compound,
    GrammarCategory::Inflected,
];

impl GrammarCategory {
    pub fn label(self) -> &'static str {
        match self {
            GrammarCategory::Plural => "plural",
            GrammarCategory::ThirdSingular => "third-singular",
            GrammarCategory::PresentParticiple => "present-participle",
            GrammarCategory::PastTense => "past-tense",
            GrammarCategory::PastParticiple => "past-participle",
            GrammarCategory::Comparative => "comparative",
            GrammarCategory::Superlative => "superlative",
            GrammarCategory::Negative => "negative",
            GrammarCategory::Genitive => "genitive",
            GrammarCategory::Compound => "compound",
            GrammarCategory::Inflected => "inflected",
        }
    }

    /// Keyword predicate for this category over a fragment of annotation
    /// text. Keyword sets are curated data; the table order is the logic.
    pub fn matches_text(self, text: &str) -> bool {
        let text = text.to_lowercase();
        keywords_for(self).iter().any(|kw| text.contains(kw))
    }
}

fn keywords_for(category: GrammarCategory) -> &'static [&'static str] {
    match category {
        GrammarCategory::Plural => &["plural", "pl."],
        GrammarCategory::ThirdSingular => &[
            "3rd singular",
            "3rd sing",
            "third singular",
            "3rd pers. sing",
        ],
        GrammarCategory::PresentParticiple => &["present participle", "pres. pple", "prp."],
        GrammarCategory::PastTense => &["past tense", "pa. t.", "pa.t."],
        GrammarCategory::PastParticiple => &["past participle", "pa. pple", "ppl."],
        GrammarCategory::Comparative => &["comparative", "compar."],
        GrammarCategory::Superlative => &["superlative", "superl."],
        GrammarCategory::Negative => &["negative", "neg."],
        GrammarCategory::Genitive => &["genitive", "gen."],
        GrammarCategory::Compound => &["compound", "comb.", "in combinations"],
        GrammarCategory::Inflected => &["inflected", "infl.", "inflexion", "inflection"],
    }
}

/// Classify a form's grammatical role from its explicit grammatical
/// information and its inherited headers (checked in ascending order). The
/// first matching category governs; an unspecified "inflected" match is
/// upgraded by suffix to present participle or past tense.
pub fn classify(
    grammatical_information: Option<&str>,
    headers: &[String],
    form: &str,
) -> Option<GrammarCategory> {
    let mut sources: Vec<&str> = Vec::with_capacity(1 + headers.len());
    if let Some(info) = grammatical_information {
        sources.push(info);
    }
    sources.extend(headers.iter().map(String::as_str));

    for source in sources {
        for &category in ALL_CATEGORIES {
            if category.matches_text(source) {
                return Some(upgrade_inflected(category, form));
            }
        }
    }
    None
}

/// An unspecified inflection ending in `-ing` is a present participle; one
/// ending in `-ed`/`-d`/`-t` is a past tense or participle.
fn upgrade_inflected(category: GrammarCategory, form: &str) -> GrammarCategory {
    if category != GrammarCategory::Inflected {
        return category;
    }
    if form.ends_with("ing") {
        GrammarCategory::PresentParticiple
    } else if form.ends_with("ed") || form.ends_with('d') || form.ends_with('t') {
        GrammarCategory::PastTense
    } else {
        category
    }
}

/// Canonical string of every category boolean for a form, used to decide
/// whether two equal spellings carry the same grammatical marking.
pub fn signature(grammatical_information: Option<&str>, headers: &[String]) -> String {
    let mut out = String::with_capacity(ALL_CATEGORIES.len() * 4);
    for &category in ALL_CATEGORIES {
        let hit = grammatical_information.is_some_and(|info| category.matches_text(info))
            || headers.iter().any(|h| category.matches_text(h));
        out.push_str(category.label());
        out.push(if hit { '1' } else { '0' });
        out.push(';');
    }
    out
}
