//! Variant-set computation for historical dictionary entries.
//!
//! Given a headword, a wordclass, and a requested date window, the
//! [`VariantsComputer`] walks a fixed evidence chain: cached parses for the
//! entry and its hint entries, recombined component evidence for compounds
//! (via [`combiner`], capped), and a synthetic fallback equal to the lemma.
//! The [`batch`] module wraps the computer in the offline driver's wire
//! records, and [`ingest`] flattens parsed forms into cache entries for
//! later runs.

pub mod batch;
pub mod combiner;
pub mod computer;
pub mod ingest;
pub mod lemma;

pub use batch::{RequestError, RequestRecord, ResultRecord, run_batch};
pub use combiner::{ComponentList, DEFAULT_CAP, combine};
pub use computer::{ComputeRequest, VariantsComputer};
pub use lemma::{CompoundLemma, Connector};
