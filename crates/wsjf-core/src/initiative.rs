//! Initiative records and the raw drafts they are created from.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::scoring::{cost_of_delay, wsjf, ScoreSet, WeightSet};

/// Accepted range for each score, matching the input sliders.
pub const SCORE_RANGE: (f64, f64) = (1.0, 10.0);
/// Accepted range for job size in story points.
pub const JOB_SIZE_RANGE: (f64, f64) = (1.0, 20.0);

/// Raw add-initiative payload, before an id is minted.
///
/// Serialized flat: `{name, user_value, time_criticality, risk_reduction,
/// compliance, job_size}`; the short codes (`uvTri`, `jobSize`, ...) are
/// accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DraftRecord", into = "DraftRecord")]
pub struct InitiativeDraft {
    pub name: String,
    pub scores: ScoreSet,
    pub job_size: f64,
}

#[derive(Serialize, Deserialize)]
struct DraftRecord {
    name: String,
    #[serde(alias = "uvTri")]
    user_value: f64,
    #[serde(alias = "tcEd")]
    time_criticality: f64,
    #[serde(alias = "rrOe")]
    risk_reduction: f64,
    #[serde(alias = "crSla")]
    compliance: f64,
    #[serde(alias = "jobSize")]
    job_size: f64,
}

impl From<DraftRecord> for InitiativeDraft {
    fn from(r: DraftRecord) -> Self {
        Self {
            name: r.name,
            scores: ScoreSet::new(r.user_value, r.time_criticality, r.risk_reduction, r.compliance),
            job_size: r.job_size,
        }
    }
}

impl From<InitiativeDraft> for DraftRecord {
    fn from(d: InitiativeDraft) -> Self {
        Self {
            name: d.name,
            user_value: d.scores.user_value,
            time_criticality: d.scores.time_criticality,
            risk_reduction: d.scores.risk_reduction,
            compliance: d.scores.compliance,
            job_size: d.job_size,
        }
    }
}

impl InitiativeDraft {
    pub fn new(name: impl Into<String>, scores: ScoreSet, job_size: f64) -> Self {
        Self {
            name: name.into(),
            scores,
            job_size,
        }
    }

    /// Input-boundary checks. The store itself accepts anything.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        for (field, value) in self.scores.components() {
            check_range(field.as_str(), value, SCORE_RANGE)?;
        }
        check_range("job_size", self.job_size, JOB_SIZE_RANGE)
    }
}

/// Whole numbers in `[min, max]`; the sliders step by one.
fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), ValidationError> {
    // NaN fails both comparisons, so test for containment rather than exclusion.
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    if value.fract() != 0.0 {
        return Err(ValidationError::NotAnInteger { field, value });
    }
    Ok(())
}

/// A scored initiative held by the store.
///
/// `cod` and `wsjf` are derived from the record's own scores and the weights
/// of the last recompute; they can only be changed through a rescore.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Initiative {
    id: String,
    name: String,
    scores: ScoreSet,
    job_size: f64,
    cod: f64,
    wsjf: f64,
}

impl Initiative {
    /// Mint a new id and score the draft against `weights`.
    pub(crate) fn from_draft(draft: InitiativeDraft, weights: &WeightSet) -> Self {
        let mut initiative = Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            scores: draft.scores,
            job_size: draft.job_size,
            cod: 0.0,
            wsjf: 0.0,
        };
        initiative.rescore(weights);
        initiative
    }

    pub(crate) fn rescore(&mut self, weights: &WeightSet) {
        self.cod = cost_of_delay(&self.scores, weights);
        self.wsjf = wsjf(self.cod, self.job_size);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scores(&self) -> &ScoreSet {
        &self.scores
    }

    pub fn job_size(&self) -> f64 {
        self.job_size
    }

    pub fn cod(&self) -> f64 {
        self.cod
    }

    pub fn wsjf(&self) -> f64 {
        self.wsjf
    }
}
