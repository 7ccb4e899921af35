//! Unpacking of parenthetical optional letter-groups.
//!
//! A form written `fo(u)l` attests both `fol` and `foul` over the same
//! range. After either parser has produced its raw list, any form whose text
//! contains exactly one parenthesized letter-group is replaced by two forms:
//! a clone with the group removed and the original with the group kept.

use varhist_types::variant::VariantForm;

/// Expand single parenthetical letter-groups into form pairs.
pub fn unpack_parentheticals(forms: Vec<VariantForm>) -> Vec<VariantForm> {
    let mut out = Vec::with_capacity(forms.len());
    for form in forms {
        match optional_group(&form.original_text) {
            Some((open, close)) => {
                let text = &form.original_text;
                // Clone of the parsed form, not a fresh parse.
                let mut stripped = form.clone();
                let without: String =
                    format!("{}{}", &text[..open], &text[close + 1..]);
                stripped.set_text(&without);
                out.push(stripped);

                let mut kept = form.clone();
                let with: String = format!(
                    "{}{}{}",
                    &text[..open],
                    &text[open + 1..close],
                    &text[close + 1..]
                );
                kept.set_text(&with);
                out.push(kept);
            }
            None => out.push(form),
        }
    }
    out
}

/// Byte offsets of the single optional group's parentheses, if the text
/// contains exactly one non-empty alphabetic group.
fn optional_group(text: &str) -> Option<(usize, usize)> {
    if text.matches('(').count() != 1 || text.matches(')').count() != 1 {
        return None;
    }
    let open = text.find('(')?;
    let close = text.find(')')?;
    if close <= open + 1 {
        return None;
    }
    let group = &text[open + 1..close];
    if group.chars().all(|c| c.is_alphabetic()) {
        Some((open, close))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varhist_types::DateRange;

    #[test]
    fn unpacks_single_optional_group() {
        let form = VariantForm::new("fo(u)l", DateRange::of(1400, 1599));
        let out = unpack_parentheticals(vec![form]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].form, "fol");
        assert_eq!(out[1].form, "foul");
        assert_eq!(out[0].date, out[1].date);
    }

    #[test]
    fn leaves_plain_forms_alone() {
        let form = VariantForm::new("foul", DateRange::of(1400, 1599));
        let out = unpack_parentheticals(vec![form.clone()]);
        assert_eq!(out, vec![form]);
    }

    #[test]
    fn ignores_empty_or_multiple_groups() {
        let out = unpack_parentheticals(vec![
            VariantForm::new("fo()l", DateRange::of(1400, 1599)),
            VariantForm::new("f(o)(u)l", DateRange::of(1400, 1599)),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].form, "fol");
        assert_eq!(out[1].form, "foul");
    }
}
