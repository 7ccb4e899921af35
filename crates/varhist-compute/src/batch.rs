//! Wire records and the per-request isolation loop for the batch driver.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use varhist_cache::{VariantCache, VariantRecord};
use varhist_types::daterange::{DateRange, UNKNOWN};
use varhist_types::wordclass::Wordclass;

use crate::computer::{ComputeRequest, VariantsComputer};

/// Why a request record could not be turned into a compute request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("lemma is empty")]
    EmptyLemma,
    #[error("unknown wordclass tag `{0}`")]
    UnknownWordclass(String),
}

/// One request as it appears in the input document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RequestRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub lemma: String,
    #[serde(default)]
    pub wordclass: Option<String>,
    /// Requested window; `0` on both bounds means the full envelope.
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub end: u32,
    #[serde(default)]
    pub alternate: Option<String>,
    #[serde(default)]
    pub hints: Vec<String>,
}

impl RequestRecord {
    pub fn validate(&self) -> Result<ComputeRequest, RequestError> {
        let lemma = self.lemma.trim();
        if lemma.is_empty() {
            return Err(RequestError::EmptyLemma);
        }
        let wordclass = match self.wordclass.as_deref() {
            Some(tag) => Some(
                Wordclass::from_tag(tag)
                    .ok_or_else(|| RequestError::UnknownWordclass(tag.to_string()))?,
            ),
            None => None,
        };
        let range = if self.start == UNKNOWN && self.end == UNKNOWN {
            DateRange::full()
        } else {
            DateRange::of(self.start, self.end)
        };
        Ok(ComputeRequest {
            id: self.id.clone(),
            lemma: lemma.to_string(),
            wordclass,
            range,
            alternate: self.alternate.clone(),
            hints: self.hints.clone(),
        })
    }
}

/// One computed variant set in the output document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ResultRecord {
    pub lemma: String,
    #[serde(default)]
    pub id: Option<String>,
    pub variants: Vec<VariantRecord>,
}

/// Compute every request, isolating malformed ones: a bad record is logged
/// and skipped, never aborting the run.
pub fn run_batch(cache: &VariantCache, requests: &[RequestRecord], cap: usize) -> Vec<ResultRecord> {
    let computer = VariantsComputer::with_cap(cache, cap);
    let mut results = Vec::with_capacity(requests.len());
    for (index, record) in requests.iter().enumerate() {
        let request = match record.validate() {
            Ok(request) => request,
            Err(err) => {
                warn!(index, lemma = %record.lemma, %err, "skipping malformed request");
                continue;
            }
        };
        let variants = computer
            .compute(&request)
            .iter()
            .map(VariantRecord::from_form)
            .collect();
        results.push(ResultRecord {
            lemma: request.lemma.clone(),
            id: request.id.clone(),
            variants,
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(lemma: &str) -> RequestRecord {
        RequestRecord {
            id: None,
            lemma: lemma.to_string(),
            wordclass: None,
            start: 1500,
            end: 0,
            alternate: None,
            hints: Vec::new(),
        }
    }

    #[test]
    fn validation_rejects_empty_lemma_and_bad_wordclass() {
        assert!(matches!(
            request("  ").validate(),
            Err(RequestError::EmptyLemma)
        ));
        let mut bad = request("wolf");
        bad.wordclass = Some("XX".to_string());
        assert!(matches!(
            bad.validate(),
            Err(RequestError::UnknownWordclass(_))
        ));
        assert!(request("wolf").validate().is_ok());
    }

    #[test]
    fn unbounded_request_defaults_to_the_full_envelope() {
        let mut record = request("wolf");
        record.start = 0;
        let parsed = record.validate().unwrap();
        assert_eq!(parsed.range, DateRange::full());
    }

    #[test]
    fn malformed_requests_are_skipped_not_fatal() {
        let cache = VariantCache::empty();
        let records = vec![request("wolf"), request(""), request("fox")];
        let results = run_batch(&cache, &records, 50);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].lemma, "wolf");
        assert_eq!(results[1].lemma, "fox");
    }
}
