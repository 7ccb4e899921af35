//! Recombination of per-component variant lists into whole-compound variants.
//!
//! A compound headword's variants are the cross product of its components'
//! variants, which blows up fast. The combiner trims each component list to
//! its most reliable forms, enforces a hard cap on the estimated product
//! before generating anything, and narrows every generated form's date range
//! to the intersection of its parts.

use tracing::debug;
use varhist_types::daterange::{CURRENT_CUTOFF, DateRange};
use varhist_types::variant::VariantForm;

use crate::lemma::Connector;

/// Default ceiling on the number of recombined variants.
pub const DEFAULT_CAP: usize = 50;

// Private-use placeholders for connectors during generation, so that
// normalization cannot eat a literal separator before the final pass
// restores it.
const SPACE_MARK: char = '\u{e000}';
const HYPHEN_MARK: char = '\u{e001}';

/// One compound component's candidate variants, with the separator that
/// precedes the component in the headword.
#[derive(Clone, Debug)]
pub struct ComponentList {
    pub forms: Vec<VariantForm>,
    pub connector: Connector,
}

/// Cross-product the component lists into whole-compound variants.
///
/// `reference`, when given, discards any candidate whose own range does not
/// overlap it. Component lists are trimmed and capped before generation, so
/// the output never exceeds `cap`.
pub fn combine(
    components: Vec<ComponentList>,
    cap: usize,
    reference: Option<&DateRange>,
) -> Vec<VariantForm> {
    if components.is_empty() {
        return Vec::new();
    }

    let mut lists: Vec<ComponentList> = components
        .into_iter()
        .map(|list| ComponentList {
            forms: trim(list.forms),
            connector: list.connector,
        })
        .collect();
    enforce_cap(&mut lists, cap.max(1));

    let mut partials = vec![VariantForm::computed("", DateRange::full())];
    for list in &lists {
        let mark = match list.connector {
            Connector::None => None,
            Connector::Space => Some(SPACE_MARK),
            Connector::Hyphen => Some(HYPHEN_MARK),
        };
        let mut next = Vec::new();
        for partial in &partials {
            for candidate in &list.forms {
                let Some(narrowed) = partial.date.overlap(&candidate.date) else {
                    continue;
                };
                if let Some(reference) = reference
                    && candidate.date.overlap(reference).is_none()
                {
                    continue;
                }
                let mut text = partial.original_text.clone();
                if let Some(mark) = mark {
                    text.push(mark);
                }
                text.push_str(&candidate.form);

                let mut merged = VariantForm::computed(&text, narrowed);
                merged.regional = partial.regional || candidate.regional;
                merged.irregular = partial.irregular || candidate.irregular;
                next.push(merged);
            }
        }
        partials = next;
        if partials.is_empty() {
            return Vec::new();
        }
    }

    partials
        .into_iter()
        .map(|mut form| {
            let text: String = form
                .original_text
                .chars()
                .map(|c| match c {
                    SPACE_MARK => ' ',
                    HYPHEN_MARK => '-',
                    c => c,
                })
                .collect();
            form.set_text(&text);
            form
        })
        .collect()
}

/// Reduce a component list to its most reliable forms.
///
/// Strict pass first; relax the irregularity and en-ending filters when it
/// empties the list; keep the list as-is when even that leaves nothing.
fn trim(forms: Vec<VariantForm>) -> Vec<VariantForm> {
    let dated = |f: &VariantForm| f.date.start_or_min() < CURRENT_CUTOFF;
    let strict: Vec<VariantForm> = forms
        .iter()
        .filter(|f| !f.regional && !f.irregular && !f.has_en_ending && dated(f))
        .cloned()
        .collect();
    if !strict.is_empty() {
        return strict;
    }
    let relaxed: Vec<VariantForm> = forms
        .iter()
        .filter(|f| !f.regional && dated(f))
        .cloned()
        .collect();
    if !relaxed.is_empty() {
        return relaxed;
    }
    forms
}

/// Shrink the largest list one entry at a time until the estimated product
/// fits under the cap. The chronologically oldest entry (lowest projected
/// end) goes first.
fn enforce_cap(lists: &mut [ComponentList], cap: usize) {
    loop {
        let product = lists
            .iter()
            .fold(1usize, |p, l| p.saturating_mul(l.forms.len().max(1)));
        if product <= cap {
            return;
        }
        let Some(largest) = lists
            .iter_mut()
            .filter(|l| l.forms.len() > 1)
            .max_by_key(|l| l.forms.len())
        else {
            return;
        };
        let oldest = largest
            .forms
            .iter()
            .enumerate()
            .min_by_key(|(_, f)| f.date.projected_end())
            .map(|(i, _)| i);
        if let Some(i) = oldest {
            let dropped = largest.forms.remove(i);
            debug!(form = %dropped.form, "cap enforcement dropped oldest variant");
        }
    }
}
