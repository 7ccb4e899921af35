//! Attestation date ranges and the interval algebra over them.
//!
//! Years are plain `u32`s clamped into the working envelope
//! `[MIN_YEAR, MAX_YEAR]`; anything outside collapses to [`UNKNOWN`] (`0`).
//! A range whose end is unknown and which is not obsolete projects forward to
//! the open sentinel [`PROJECTED_END`].

/// Sentinel for an unknown bound.
pub const UNKNOWN: u32 = 0;

/// Earliest year the subsystem reasons about (early Old English material).
pub const MIN_YEAR: u32 = 750;

/// Latest year the subsystem reasons about.
pub const MAX_YEAR: u32 = 2050;

/// Open "still current" end used when a range is not obsolete.
pub const PROJECTED_END: u32 = 2050;

/// A known end before this year marks the range as assumed obsolete.
pub const OBSOLETE_BEFORE: u32 = 1700;

/// A lemma whose projected end reaches past this year counts as current.
pub const CURRENT_CUTOFF: u32 = 2000;

/// Which bound a fuzzing operation rounds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bound {
    Start,
    End,
}

/// An attestation interval with obsoleteness and fuzzing metadata.
///
/// Invariant: when both bounds are known, `start <= end` (the constructor
/// reorders reversed input). `exact_start`/`exact_end` shadow the displayed
/// bounds once [`DateRange::fuzz`] has rounded them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    start: u32,
    end: u32,
    pub is_estimated: bool,
    pub explicit_obsolete: bool,
    pub hard_end: bool,
    exact_start: Option<u32>,
    exact_end: Option<u32>,
}

impl DateRange {
    /// Build a range, clamping out-of-envelope years to [`UNKNOWN`].
    pub fn of(start: u32, end: u32) -> Self {
        let mut start = clamp_to_envelope(start);
        let mut end = clamp_to_envelope(end);
        if start != UNKNOWN && end != UNKNOWN && start > end {
            std::mem::swap(&mut start, &mut end);
        }
        DateRange {
            start,
            end,
            ..DateRange::default()
        }
    }

    /// Open-ended range starting at `start` (end unknown, projects forward).
    pub fn open_from(start: u32) -> Self {
        DateRange::of(start, UNKNOWN)
    }

    /// The widest range the subsystem handles.
    pub fn full() -> Self {
        DateRange::of(MIN_YEAR, UNKNOWN)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn set_start(&mut self, year: u32) {
        self.start = clamp_to_envelope(year);
    }

    pub fn set_end(&mut self, year: u32) {
        self.end = clamp_to_envelope(year);
    }

    /// Start with unknown resolved to the envelope floor.
    pub fn start_or_min(&self) -> u32 {
        if self.start == UNKNOWN { MIN_YEAR } else { self.start }
    }

    /// Pre-fuzz start, if [`fuzz`](Self::fuzz) has run on the start bound.
    pub fn exact_start(&self) -> Option<u32> {
        self.exact_start
    }

    /// Pre-fuzz end, if [`fuzz`](Self::fuzz) has run on the end bound.
    pub fn exact_end(&self) -> Option<u32> {
        self.exact_end
    }

    /// Obsolete either by explicit source markup or by ending before 1700.
    pub fn assumed_obsolete(&self) -> bool {
        self.explicit_obsolete || (self.end != UNKNOWN && self.end < OBSOLETE_BEFORE)
    }

    /// The end used for forward projection: the literal end when the range is
    /// obsolete or hard-ended, otherwise the open sentinel.
    pub fn projected_end(&self) -> u32 {
        if self.assumed_obsolete() || self.hard_end {
            self.end
        } else {
            PROJECTED_END
        }
    }

    /// End with unknown resolved to the literal end or open sentinel.
    fn effective_end(&self) -> u32 {
        if self.end == UNKNOWN { PROJECTED_END } else { self.end }
    }

    /// Years covered, start floor to projected end.
    pub fn span(&self) -> u32 {
        self.projected_end().saturating_sub(self.start_or_min())
    }

    pub fn contains_year(&self, year: u32) -> bool {
        self.start_or_min() <= year && year <= self.effective_end()
    }

    /// Round the given bound outward to its granularity boundary: starts are
    /// floored, ends are ceiled. Granularity is 100 years before 1500 and 50
    /// years thereafter. The pre-fuzz value is kept in the shadow fields.
    pub fn fuzz(&mut self, which: Bound) {
        match which {
            Bound::Start => {
                if self.start != UNKNOWN {
                    self.exact_start = Some(self.start);
                    self.start = fuzz_floor(self.start);
                }
            }
            Bound::End => {
                if self.end != UNKNOWN {
                    self.exact_end = Some(self.end);
                    self.end = fuzz_ceil(self.end);
                }
            }
        }
    }

    /// Intersection of two ranges, or `None` when they are disjoint.
    ///
    /// When one range is nested inside the other the result is a copy of the
    /// inner one. A known end on the result is hard so later projection
    /// cannot reopen it; an unknown end stays open.
    pub fn overlap(&self, other: &DateRange) -> Option<DateRange> {
        let (s1, e1) = (self.start_or_min(), self.effective_end());
        let (s2, e2) = (other.start_or_min(), other.effective_end());
        if e1 < s2 || e2 < s1 {
            return None;
        }
        let mut out = if s2 >= s1 && e2 <= e1 {
            other.clone()
        } else if s1 >= s2 && e1 <= e2 {
            self.clone()
        } else {
            let mut merged = DateRange::of(s1.max(s2), e1.min(e2));
            merged.is_estimated = self.is_estimated || other.is_estimated;
            merged.explicit_obsolete = self.explicit_obsolete || other.explicit_obsolete;
            merged
        };
        out.hard_end = out.end != UNKNOWN;
        Some(out)
    }

    /// Clip `start` and `projected_end()` into `window`, returning the pair.
    pub fn constrain(&self, window: &DateRange) -> (u32, u32) {
        let lo = window.start_or_min();
        let hi = window.effective_end().max(lo);
        let start = self.start_or_min().clamp(lo, hi);
        let end = self.projected_end().clamp(lo, hi);
        (start, end.max(start))
    }

    /// [`constrain`](Self::constrain), also writing the clipped pair back.
    pub fn constrain_in_place(&mut self, window: &DateRange) -> (u32, u32) {
        let (start, end) = self.constrain(window);
        self.start = start;
        self.end = end;
        (start, end)
    }

    /// Widen this range to include `other`: start moves down, end moves up,
    /// and a current `other` clears the obsolete flag.
    pub fn extend_range(&mut self, other: &DateRange) {
        if other.start != UNKNOWN && (self.start == UNKNOWN || other.start < self.start) {
            self.start = other.start;
        }
        if other.projected_end() > self.projected_end() {
            // May set the end back to unknown, reopening the range.
            self.end = other.end;
            self.hard_end = other.hard_end;
        }
        if !other.assumed_obsolete() {
            self.explicit_obsolete = false;
        }
    }
}

fn clamp_to_envelope(year: u32) -> u32 {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        year
    } else {
        UNKNOWN
    }
}

fn granularity(year: u32) -> u32 {
    if year < 1500 { 100 } else { 50 }
}

/// Round a year down to its granularity boundary, floored at [`MIN_YEAR`].
pub fn fuzz_floor(year: u32) -> u32 {
    let g = granularity(year);
    (year - year % g).max(MIN_YEAR)
}

/// Round a year up to its granularity boundary, capped at [`MAX_YEAR`].
pub fn fuzz_ceil(year: u32) -> u32 {
    let g = granularity(year);
    let rem = year % g;
    let up = if rem == 0 { year } else { year + (g - rem) };
    up.min(MAX_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_envelope_years_to_unknown() {
        let r = DateRange::of(100, 9999);
        assert_eq!(r.start(), UNKNOWN);
        assert_eq!(r.end(), UNKNOWN);
    }

    #[test]
    fn reorders_reversed_bounds() {
        let r = DateRange::of(1600, 1500);
        assert_eq!((r.start(), r.end()), (1500, 1600));
    }

    #[test]
    fn fuzz_uses_fifty_year_band_before_1700() {
        assert_eq!(fuzz_floor(1680), 1650);
        assert_eq!(fuzz_ceil(1680), 1700);
        assert_eq!(fuzz_floor(1680) % 50, 0);
        assert_eq!(fuzz_ceil(1680) % 50, 0);
    }

    #[test]
    fn fuzz_uses_century_band_before_1500() {
        assert_eq!(fuzz_floor(1437), 1400);
        assert_eq!(fuzz_ceil(1437), 1500);
        assert_eq!(fuzz_floor(1437) % 100, 0);
    }

    #[test]
    fn fuzz_keeps_exact_values_in_shadow() {
        let mut r = DateRange::of(1437, 1688);
        r.fuzz(Bound::Start);
        r.fuzz(Bound::End);
        assert_eq!((r.start(), r.end()), (1400, 1700));
        assert_eq!(r.exact_start(), Some(1437));
        assert_eq!(r.exact_end(), Some(1688));
    }

    #[test]
    fn overlap_intersects_partial_ranges() {
        let got = DateRange::of(1500, 1600)
            .overlap(&DateRange::of(1550, 1650))
            .unwrap();
        assert_eq!((got.start(), got.end()), (1550, 1600));
        assert!(got.hard_end);
    }

    #[test]
    fn overlap_of_disjoint_ranges_is_none() {
        assert!(
            DateRange::of(1200, 1300)
                .overlap(&DateRange::of(1400, 1500))
                .is_none()
        );
    }

    #[test]
    fn overlap_with_subset_copies_the_subset() {
        let outer = DateRange::of(1400, 1900);
        let inner = DateRange::of(1500, 1600);
        let got = outer.overlap(&inner).unwrap();
        assert_eq!((got.start(), got.end()), (1500, 1600));
        let got = inner.overlap(&outer).unwrap();
        assert_eq!((got.start(), got.end()), (1500, 1600));
    }

    #[test]
    fn projection_respects_obsoleteness_and_hard_end() {
        let current = DateRange::of(1800, UNKNOWN);
        assert_eq!(current.projected_end(), PROJECTED_END);

        let obsolete = DateRange::of(1400, 1550);
        assert!(obsolete.assumed_obsolete());
        assert_eq!(obsolete.projected_end(), 1550);

        let mut hard = DateRange::of(1800, 1950);
        hard.hard_end = true;
        assert_eq!(hard.projected_end(), 1950);
    }

    #[test]
    fn extend_widens_and_clears_obsoleteness() {
        let mut r = DateRange::of(1500, 1600);
        r.explicit_obsolete = true;
        r.extend_range(&DateRange::of(1400, 1900));
        assert_eq!((r.start(), r.end()), (1400, 1900));
        assert!(!r.explicit_obsolete);
    }

    #[test]
    fn constrain_clips_into_window() {
        let window = DateRange::of(1500, 1700);
        let (s, e) = DateRange::of(1400, 1600).constrain(&window);
        assert_eq!((s, e), (1500, 1600));

        let mut hard = DateRange::of(1650, 1900);
        hard.hard_end = true;
        let (s, e) = hard.constrain(&window);
        assert_eq!((s, e), (1650, 1700));
    }
}
