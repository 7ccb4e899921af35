//! Core value types for historical variant-form resolution.
//!
//! Everything here is a plain value: [`DateRange`] (interval algebra over
//! attestation years), [`Wordclass`] (the fixed tagging scheme),
//! [`GrammarCategory`] (inflection classification), and [`VariantForm`] (one
//! attested spelling with its range and reliability flags). The crate has no
//! dependencies so that parsers, caches, and the compute pipeline can all
//! share these types without dragging their stacks along.
//!
//! ```rust
//! use varhist_types::{DateRange, VariantForm};
//!
//! let range = DateRange::of(1500, 1600);
//! let other = DateRange::of(1550, 1650);
//! let clipped = range.overlap(&other).unwrap();
//! assert_eq!((clipped.start(), clipped.end()), (1550, 1600));
//!
//! let form = VariantForm::new("walkynge", DateRange::of(1400, 1500));
//! assert_eq!(form.form, "walkynge");
//! ```

pub mod daterange;
pub mod grammar;
pub mod variant;
pub mod wordclass;

pub use daterange::{
    Bound, CURRENT_CUTOFF, DateRange, MAX_YEAR, MIN_YEAR, OBSOLETE_BEFORE, PROJECTED_END, UNKNOWN,
};
pub use grammar::GrammarCategory;
pub use variant::{IRREGULAR_WEIGHT, MISMATCH_WEIGHT, REGIONAL_WEIGHT, VariantForm};
pub use wordclass::Wordclass;
