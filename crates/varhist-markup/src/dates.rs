//! Period-code lookup and textual date-range resolution.
//!
//! The legacy markup dates forms with named periods ("Old English", "eME"),
//! century codes ("15" is the 15th century, 1400-1499), decade codes
//! ("1610s"), the special "pre-17" code, and three textual range shapes:
//! `X-` (open-ended forward), `-Y` (open-ended backward), and `X-Y`.
//! Unknown codes resolve to `None` and the owning form stays undated.

use varhist_types::daterange::{DateRange, MIN_YEAR, UNKNOWN};

/// Named-period table. Century and decade codes are handled numerically.
const PERIODS: &[(&str, (u32, u32))] = &[
    ("OE", (750, 1149)),
    ("Old English", (750, 1149)),
    ("eOE", (750, 949)),
    ("early Old English", (750, 949)),
    ("lOE", (950, 1149)),
    ("late Old English", (950, 1149)),
    ("ME", (1150, 1499)),
    ("Middle English", (1150, 1499)),
    ("eME", (1150, 1324)),
    ("early Middle English", (1150, 1324)),
    ("lME", (1325, 1499)),
    ("late Middle English", (1325, 1499)),
];

/// Everything attested before the 17th century, used when a forms list opens
/// with the blanket "pre-17" code.
pub const PRE_SEVENTEEN: &str = "pre-17";

/// Resolve one period code to its `(start, end)` year bounds.
fn code_bounds(code: &str) -> Option<(u32, u32)> {
    let code = code.trim().trim_end_matches('.');
    if code == PRE_SEVENTEEN {
        return Some((MIN_YEAR, 1699));
    }
    for (name, bounds) in PERIODS {
        if code.eq_ignore_ascii_case(name) {
            return Some(*bounds);
        }
    }
    // Decade code: "1610s".
    if code.len() == 5
        && code.ends_with('s')
        && let Ok(year) = code[..4].parse::<u32>()
        && year % 10 == 0
    {
        return Some((year, year + 9));
    }
    // Century code: "15" is the 15th century, 1400-1499.
    if (1..=2).contains(&code.len())
        && code.chars().all(|c| c.is_ascii_digit())
        && let Ok(century) = code.parse::<u32>()
        && (9..=21).contains(&century)
    {
        let start = (century - 1) * 100;
        return Some((start, start + 99));
    }
    // Literal year.
    if code.len() == 4
        && code.chars().all(|c| c.is_ascii_digit())
        && let Ok(year) = code.parse::<u32>()
    {
        return Some((year, year));
    }
    None
}

/// Resolve a date code or textual range to a [`DateRange`].
///
/// A leading `?` marks the dating as uncertain; the resolved range carries
/// the estimation flag but the bounds are read as written.
pub fn parse_date_code(text: &str) -> Option<DateRange> {
    let text = text.trim();
    let (text, estimated) = match text.strip_prefix('?') {
        Some(rest) => (rest.trim_start(), true),
        None => (text, false),
    };
    let mut range = parse_shape(text)?;
    range.is_estimated = estimated;
    Some(range)
}

fn parse_shape(text: &str) -> Option<DateRange> {
    if text.is_empty() {
        return None;
    }

    // The blanket pre-17 code contains a hyphen but is not a range.
    if let Some((start, end)) = code_bounds(text) {
        return Some(DateRange::of(start, end));
    }

    if let Some(rest) = text.strip_prefix('-') {
        // "-Y": open-ended backward to Y.
        let (_, end) = code_bounds(rest)?;
        return Some(DateRange::of(UNKNOWN, end));
    }
    if let Some(rest) = text.strip_suffix('-') {
        // "X-": open-ended forward from X.
        let (start, _) = code_bounds(rest)?;
        return Some(DateRange::open_from(start));
    }
    if let Some((left, right)) = text.split_once('-') {
        let (start, _) = code_bounds(left)?;
        let (_, end) = code_bounds(right)?;
        return Some(DateRange::of(start, end));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use varhist_types::daterange::PROJECTED_END;

    #[test]
    fn resolves_named_periods() {
        let oe = parse_date_code("OE").unwrap();
        assert_eq!((oe.start(), oe.end()), (750, 1149));
        let eme = parse_date_code("early Middle English").unwrap();
        assert_eq!((eme.start(), eme.end()), (1150, 1324));
    }

    #[test]
    fn resolves_century_and_decade_codes() {
        let c15 = parse_date_code("15").unwrap();
        assert_eq!((c15.start(), c15.end()), (1400, 1499));
        let c17 = parse_date_code("17").unwrap();
        assert_eq!((c17.start(), c17.end()), (1600, 1699));
        let decade = parse_date_code("1610s").unwrap();
        assert_eq!((decade.start(), decade.end()), (1610, 1619));
    }

    #[test]
    fn resolves_pre_seventeen_as_single_code() {
        let r = parse_date_code("pre-17").unwrap();
        assert_eq!((r.start(), r.end()), (MIN_YEAR, 1699));
    }

    #[test]
    fn resolves_range_shapes() {
        let open_forward = parse_date_code("16-").unwrap();
        assert_eq!(open_forward.start(), 1500);
        assert_eq!(open_forward.end(), UNKNOWN);
        assert_eq!(open_forward.projected_end(), PROJECTED_END);

        let open_backward = parse_date_code("-15").unwrap();
        assert_eq!(open_backward.start(), UNKNOWN);
        assert_eq!(open_backward.end(), 1499);

        let closed = parse_date_code("OE-15").unwrap();
        assert_eq!((closed.start(), closed.end()), (750, 1499));
    }

    #[test]
    fn question_mark_marks_the_range_estimated() {
        let r = parse_date_code("?15").unwrap();
        assert_eq!((r.start(), r.end()), (1400, 1499));
        assert!(r.is_estimated);

        let r = parse_date_code("?OE-15").unwrap();
        assert_eq!((r.start(), r.end()), (750, 1499));
        assert!(r.is_estimated);

        assert!(!parse_date_code("15").unwrap().is_estimated);
        assert!(parse_date_code("?").is_none());
    }

    #[test]
    fn unknown_codes_are_none() {
        assert!(parse_date_code("gibberish").is_none());
        assert!(parse_date_code("").is_none());
        assert!(parse_date_code("99").is_none());
    }
}
