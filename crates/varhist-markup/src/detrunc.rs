//! Expansion of truncated (affix-marked) variant forms.
//!
//! Legacy forms lists often record a variant only as a fragment: "-ynge",
//! "un-", "-s". Given a known full form (the comparator), [`detruncate`]
//! reconstructs the full variant by trying an ordered cascade of strategies,
//! each a pure function; the first success wins and failure is an ordinary
//! `None`, never an error.
//!
//! The final strategy abstracts both strings through increasing levels of
//! orthographic flattening (doubled consonants, vowel identity, vowel
//! classes, consonant place classes) so that e.g. comparator "walking" and
//! truncation "-ynge" line up at the "walk|ing" split even though no literal
//! characters match.

use tracing::trace;

/// Length tolerance used when matching truncations to compound components.
const COMPONENT_LEN_TOLERANCE: usize = 2;

/// Archaic truncated-plural codes: (truncation core, comparator ending to
/// replace, replacement). An empty ending means "append".
const PLURAL_RULES: &[(&str, &str, &str)] = &[
    ("s", "", "s"),
    ("es", "", "es"),
    ("en", "", "en"),
    ("i", "o", "i"),
    ("a", "um", "a"),
    ("men", "man", "men"),
];

/// Deepest level of orthographic abstraction in the fuzzy cascade.
const MAX_ABSTRACTION: u8 = 7;

#[derive(Clone, Debug)]
struct Truncation {
    core: Vec<char>,
    is_prefix: bool,
    is_suffix: bool,
}

impl Truncation {
    /// Parse an affix-marked fragment; `None` when no affix marker is
    /// present (the text is not a truncation at all).
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        // A leading hyphen marks a suffix fragment, a trailing one a prefix.
        let is_suffix = text.starts_with('-');
        let is_prefix = text.ends_with('-') && text.len() > 1;
        if !is_prefix && !is_suffix {
            return None;
        }
        let core: Vec<char> = text.trim_matches('-').chars().collect();
        if core.is_empty() {
            return None;
        }
        Some(Truncation {
            core,
            is_prefix,
            is_suffix,
        })
    }

    fn core_string(&self) -> String {
        self.core.iter().collect()
    }
}

type Strategy = fn(&[char], &Truncation) -> Option<String>;

/// Ordered cascade; earlier strategies are more reliable.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("infix", infix),
    ("compound-boundary", compound_boundary),
    ("unchanged-substring", unchanged_substring),
    ("three-char-boundary", three_char_boundary),
    ("plural-suffix", plural_suffix),
    ("fuzzy-cascade", fuzzy_cascade),
];

/// Expand the affix-marked `truncation` against the full `comparator`.
///
/// Returns `None` when the truncation has no affix marker or no strategy
/// succeeds; the caller leaves the form unexpanded in that case.
pub fn detruncate(comparator: &str, truncation: &str) -> Option<String> {
    let trunc = Truncation::parse(truncation)?;
    let comp: Vec<char> = comparator.trim().chars().collect();
    if comp.is_empty() {
        return None;
    }
    for (name, strategy) in STRATEGIES {
        if let Some(result) = strategy(&comp, &trunc) {
            trace!(strategy = name, comparator, truncation, "detruncated");
            return Some(result);
        }
    }
    None
}

/// Strategy 1: a doubly-marked fragment replaces an internal slice of the
/// comparator whose first and last one-to-two characters match its own.
fn infix(comp: &[char], trunc: &Truncation) -> Option<String> {
    if !(trunc.is_prefix && trunc.is_suffix) {
        return None;
    }
    let core = &trunc.core;
    for edge in [2usize, 1] {
        if core.len() < edge {
            continue;
        }
        for i in 0..comp.len() {
            for j in (i + edge.max(1))..=comp.len() {
                let slice = &comp[i..j];
                if slice.len() < edge {
                    continue;
                }
                let heads_match = slice[..edge] == core[..edge];
                let tails_match = slice[slice.len() - edge..] == core[core.len() - edge..];
                if heads_match && tails_match {
                    let mut out: String = comp[..i].iter().collect();
                    out.extend(core.iter());
                    out.extend(comp[j..].iter());
                    return Some(out);
                }
            }
        }
    }
    None
}

/// Strategy 2: when the comparator is a hyphen or space compound and the
/// fragment's size roughly matches a boundary component, replace that
/// component wholesale.
fn compound_boundary(comp: &[char], trunc: &Truncation) -> Option<String> {
    if !comp.iter().any(|c| *c == '-' || *c == ' ') {
        return None;
    }
    let text: String = comp.iter().collect();
    let core = trunc.core_string();

    if trunc.is_suffix && !trunc.is_prefix {
        let split = text.rfind(['-', ' '])?;
        let last = &text[split + 1..];
        if len_close(last.chars().count(), trunc.core.len()) {
            return Some(format!("{}{}", &text[..split + 1], core));
        }
    }
    if trunc.is_prefix && !trunc.is_suffix {
        let split = text.find(['-', ' '])?;
        let first = &text[..split];
        if len_close(first.chars().count(), trunc.core.len()) {
            return Some(format!("{}{}", core, &text[split..]));
        }
    }
    None
}

fn len_close(a: usize, b: usize) -> bool {
    a.abs_diff(b) <= COMPONENT_LEN_TOLERANCE
}

/// Strategy 3: the fragment is an unchanged edge of the comparator; the full
/// form is the comparator itself.
fn unchanged_substring(comp: &[char], trunc: &Truncation) -> Option<String> {
    for k in 1..comp.len() {
        let (left, right) = comp.split_at(k);
        if trunc.is_suffix && !trunc.is_prefix && right == trunc.core.as_slice() {
            let mut out: String = left.iter().collect();
            out.push_str(&trunc.core_string());
            return Some(out);
        }
        if trunc.is_prefix && !trunc.is_suffix && left == trunc.core.as_slice() {
            let mut out = trunc.core_string();
            out.extend(right.iter());
            return Some(out);
        }
    }
    None
}

/// Strategy 4: match only the three boundary characters of the fragment
/// against a bisection edge, preferring the smallest replaced side.
fn three_char_boundary(comp: &[char], trunc: &Truncation) -> Option<String> {
    if trunc.core.len() < 3 || comp.len() < 3 {
        return None;
    }
    if trunc.is_suffix && !trunc.is_prefix {
        for k in (1..=comp.len() - 3).rev() {
            let right = &comp[k..];
            if right[..3] == trunc.core[..3] {
                let mut out: String = comp[..k].iter().collect();
                out.push_str(&trunc.core_string());
                return Some(out);
            }
        }
    }
    if trunc.is_prefix && !trunc.is_suffix {
        for k in 3..comp.len() {
            let left = &comp[..k];
            if left[left.len() - 3..] == trunc.core[trunc.core.len() - 3..] {
                let mut out = trunc.core_string();
                out.extend(comp[k..].iter());
                return Some(out);
            }
        }
    }
    None
}

/// Strategy 5: archaic truncated-plural codes transform the comparator's
/// ending instead of replacing a substring.
fn plural_suffix(comp: &[char], trunc: &Truncation) -> Option<String> {
    if !trunc.is_suffix || trunc.is_prefix {
        return None;
    }
    let text: String = comp.iter().collect();
    let core = trunc.core_string();
    for (code, ending, replacement) in PLURAL_RULES {
        if core != *code {
            continue;
        }
        if ending.is_empty() {
            // Append, but only when the comparator does not already carry it.
            if !text.ends_with(code) {
                return Some(format!("{text}{replacement}"));
            }
        } else if let Some(stem) = text.strip_suffix(ending) {
            return Some(format!("{stem}{replacement}"));
        }
    }
    None
}

/// Strategy 6: abstract both sides through increasing orthographic
/// flattening and substitute at the best-aligned bisection.
fn fuzzy_cascade(comp: &[char], trunc: &Truncation) -> Option<String> {
    if trunc.is_prefix == trunc.is_suffix {
        return None;
    }
    for level in 0..=MAX_ABSTRACTION {
        let target = abstract_chars(&trunc.core, level);
        let mut best: Option<(usize, usize)> = None; // (matched_len, split)
        for k in 1..comp.len() {
            // Never split a vowel pair; those belong to one syllable nucleus.
            if is_vowel(comp[k - 1]) && is_vowel(comp[k]) {
                continue;
            }
            let (left, right) = comp.split_at(k);
            let matched = if trunc.is_suffix { right } else { left };
            if abstract_chars(matched, level) == target {
                let better = match best {
                    Some((len, _)) => matched.len() > len,
                    None => true,
                };
                if better {
                    best = Some((matched.len(), k));
                }
            }
        }
        if let Some((_, k)) = best {
            let (left, right) = comp.split_at(k);
            let out = if trunc.is_suffix {
                let mut s: String = left.iter().collect();
                s.push_str(&trunc.core_string());
                s
            } else {
                let mut s = trunc.core_string();
                s.extend(right.iter());
                s
            };
            return Some(out);
        }
    }
    None
}

fn is_vowel(c: char) -> bool {
    matches!(
        c.to_ascii_lowercase(),
        'a' | 'e' | 'i' | 'o' | 'u' | 'y' | 'æ'
    )
}

/// Flatten a string's orthographic detail. Each level includes every prior
/// one: 0 identity, 1 doubled consonants collapsed, 2 i/y and u/w merged,
/// 3 front and back vowel classes, 4 all vowels to one class with runs
/// collapsed, 5 consonant place classes, 6 h dropped, 7 vowels dropped.
fn abstract_chars(chars: &[char], level: u8) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut prev: Option<char> = None;
    for &raw in chars {
        let mut c = raw.to_ascii_lowercase();
        if level >= 2 {
            c = match c {
                'y' => 'i',
                'w' => 'u',
                'æ' => 'e',
                'þ' | 'ð' => 't',
                'ȝ' => 'g',
                _ => c,
            };
        }
        if level >= 3 {
            c = match c {
                'e' | 'i' => 'i',
                'o' | 'u' => 'u',
                _ => c,
            };
        }
        if level >= 4 && is_vowel(c) {
            c = 'a';
        }
        if level >= 5 {
            c = match c {
                'b' | 'p' | 'f' | 'v' => 'b',
                'c' | 'k' | 'q' | 'g' | 'j' => 'c',
                'd' | 't' => 'd',
                's' | 'z' => 's',
                'm' | 'n' => 'n',
                _ => c,
            };
        }
        if level >= 6 && c == 'h' {
            continue;
        }
        if level >= 7 && is_vowel(c) {
            continue;
        }
        let collapse = if level >= 4 {
            prev == Some(c)
        } else {
            level >= 1 && prev == Some(c) && !is_vowel(c)
        };
        if !collapse {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Pre-marks unusually short variants of a compound headword with an affix
/// marker, so the detruncation cascade can expand them like any other
/// fragment.
#[derive(Clone, Debug)]
pub struct TruncationChecker {
    first: String,
    last: String,
}

impl TruncationChecker {
    /// `None` when the headword is not a compound.
    pub fn new(headword: &str) -> Option<Self> {
        let split = headword.rfind(['-', ' '])?;
        let first_split = headword.find(['-', ' ']).unwrap_or(split);
        let first = headword[..first_split].to_string();
        let last = headword[split + 1..].to_string();
        if first.is_empty() || last.is_empty() {
            return None;
        }
        Some(TruncationChecker { first, last })
    }

    /// Affix-marked text for a form that plausibly stands for one boundary
    /// component of the headword; `None` when it reads as a whole-word form.
    pub fn mark(&self, form: &str) -> Option<String> {
        let form_len = form.chars().count();
        let whole_len = self.first.chars().count() + self.last.chars().count();
        if form_len + COMPONENT_LEN_TOLERANCE >= whole_len {
            return None;
        }

        // Strong pass: shared boundary triple plus length tolerance.
        if matches_component(form, &self.last, 3) {
            return Some(format!("-{form}"));
        }
        if matches_component(form, &self.first, 3) {
            return Some(format!("{form}-"));
        }
        // Weak pass: shared initial or terminal letter, tighter tolerance.
        if shares_edge_letter(form, &self.last) && len_close(form_len, self.last.chars().count())
        {
            return Some(format!("-{form}"));
        }
        if shares_edge_letter(form, &self.first) && len_close(form_len, self.first.chars().count())
        {
            return Some(format!("{form}-"));
        }
        None
    }
}

fn matches_component(form: &str, component: &str, edge: usize) -> bool {
    let f: Vec<char> = form.chars().collect();
    let c: Vec<char> = component.chars().collect();
    if f.len() < edge || c.len() < edge || !len_close(f.len(), c.len()) {
        return false;
    }
    f[..edge] == c[..edge] || f[f.len() - edge..] == c[c.len() - edge..]
}

fn shares_edge_letter(form: &str, component: &str) -> bool {
    let (Some(ff), Some(cf)) = (form.chars().next(), component.chars().next()) else {
        return false;
    };
    let fl = form.chars().next_back();
    let cl = component.chars().next_back();
    ff == cf || (fl.is_some() && fl == cl)
}
