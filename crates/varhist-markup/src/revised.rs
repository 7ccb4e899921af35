//! Parser for the revised forms dialect.
//!
//! Revised markup nests reliably: each unit carries its own form, date
//! sub-nodes, and optional grammar/label annotation, grouped under sections
//! whose header annotations are inherited by every descendant form. No state
//! machine is needed; the only subtlety is date resolution.

use varhist_types::daterange::{DateRange, UNKNOWN};
use varhist_types::variant::VariantForm;

use crate::dates::{self, PRE_SEVENTEEN};
use crate::node::{Node, Tag};
use crate::unpack;

/// Parse a revised subtree into variant forms.
///
/// `root` is the forms-list node; its `Section` children group `Unit`
/// children, and units may also sit directly under the root.
pub fn parse(root: &Node) -> Vec<VariantForm> {
    let mut forms = Vec::new();
    collect(root, None, None, None, &mut forms);
    unpack::unpack_parentheticals(forms)
}

fn collect(
    node: &Node,
    header: Option<&str>,
    label: Option<&str>,
    section_id: Option<&str>,
    out: &mut Vec<VariantForm>,
) {
    for child in &node.children {
        match child.tag {
            Tag::Section => {
                let header_text = child
                    .child(Tag::Header)
                    .map(|h| h.text.as_str())
                    .or(header);
                // A label placed on the section restricts every form in it.
                let label_text = child
                    .child(Tag::Label)
                    .map(|l| l.text.as_str())
                    .or(label);
                let id = child.id.as_deref().or(section_id);
                collect(child, header_text, label_text, id, out);
            }
            Tag::Unit => {
                if let Some(form) = parse_unit(child, header, label, section_id) {
                    out.push(form);
                }
            }
            _ => {}
        }
    }
}

fn parse_unit(
    unit: &Node,
    header: Option<&str>,
    label: Option<&str>,
    section_id: Option<&str>,
) -> Option<VariantForm> {
    let text = unit.child(Tag::Form)?.text.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let date = resolve_unit_date(unit);
    let mut form = VariantForm::new(&text, date.unwrap_or_default());
    form.grammatical_information = unit.child(Tag::Grammar).map(|g| g.text.trim().to_string());
    form.label = unit.child(Tag::Label).map(|l| l.text.trim().to_string());
    form.structural_id = unit
        .id
        .clone()
        .or_else(|| section_id.map(str::to_string));
    if let Some(header) = header {
        form.headers.push(header.to_string());
    }
    if let Some(label) = label {
        form.header_labels.push(label.to_string());
    }
    form.infer_marks();
    Some(form)
}

/// Resolve a unit's declared date codes to one stamped range.
///
/// The unit's range spans the minimum start to the maximum end of all its
/// resolvable codes. A single ambiguous code (a bare period with no explicit
/// range shape, other than the blanket pre-17 code) is read as open-ended
/// going forward: "15 wolfe" means the form is attested from the 15th
/// century on, not confined to it.
fn resolve_unit_date(unit: &Node) -> Option<DateRange> {
    let codes: Vec<&Node> = unit.children_tagged(Tag::Date).collect();
    let mut resolved: Vec<(DateRange, bool)> = Vec::new();
    for node in &codes {
        let code = node.text.trim();
        if let Some(range) = dates::parse_date_code(code) {
            // Only a bare century code is ambiguous: named periods, decades,
            // explicit ranges, and pre-17 all state their own extent. An
            // uncertainty marker does not change the shape of the code.
            let bare = code.strip_prefix('?').map_or(code, str::trim_start);
            let ambiguous = bare != PRE_SEVENTEEN
                && bare.len() <= 2
                && bare.chars().all(|c| c.is_ascii_digit());
            resolved.push((range, ambiguous));
        }
    }
    if resolved.is_empty() {
        return None;
    }

    if resolved.len() == 1 && resolved[0].1 {
        // Not inside a wrapper with multiple ranges: open-ended forward.
        let mut range = DateRange::open_from(resolved[0].0.start());
        range.is_estimated = resolved[0].0.is_estimated;
        return Some(range);
    }

    let start = resolved
        .iter()
        .map(|(r, _)| r.start_or_min())
        .min()
        .unwrap_or(UNKNOWN);
    // An open-ended code keeps the whole unit open.
    let end = if resolved.iter().any(|(r, _)| r.end() == UNKNOWN) {
        UNKNOWN
    } else {
        resolved
            .iter()
            .map(|(r, _)| r.end())
            .max()
            .unwrap_or(UNKNOWN)
    };
    let mut range = DateRange::of(start, end);
    range.is_estimated = resolved.iter().any(|(r, _)| r.is_estimated);
    Some(range)
}
