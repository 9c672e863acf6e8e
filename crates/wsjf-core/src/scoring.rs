//! Cost of Delay and WSJF scoring.
//!
//! ```text
//! CoD  = uv·w_uv + tc·w_tc + rr·w_rr + cr·w_cr
//! WSJF = CoD / job_size      (job_size > 0, otherwise 0)
//! ```
//!
//! Both functions are pure. Inputs are not range checked here; the input
//! boundary lives in [`crate::initiative::InitiativeDraft::validate`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The four Cost of Delay component scores of an initiative.
///
/// Each score is intended to lie in `[1, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    /// User Value / Training Readiness Impact (UV/TRI)
    #[serde(alias = "uvTri")]
    pub user_value: f64,
    /// Time Criticality / Event Dependency (TC/ED)
    #[serde(alias = "tcEd")]
    pub time_criticality: f64,
    /// Risk Reduction / Opportunity Enablement (RR/OE)
    #[serde(alias = "rrOe")]
    pub risk_reduction: f64,
    /// Compliance / Regulatory / SLA (CR/SLA)
    #[serde(alias = "crSla")]
    pub compliance: f64,
}

impl ScoreSet {
    pub fn new(user_value: f64, time_criticality: f64, risk_reduction: f64, compliance: f64) -> Self {
        Self {
            user_value,
            time_criticality,
            risk_reduction,
            compliance,
        }
    }

    /// Scores paired with their field, in display order.
    pub fn components(&self) -> [(WeightField, f64); 4] {
        [
            (WeightField::UserValue, self.user_value),
            (WeightField::TimeCriticality, self.time_criticality),
            (WeightField::RiskReduction, self.risk_reduction),
            (WeightField::Compliance, self.compliance),
        ]
    }
}

/// Multipliers applied to each [`ScoreSet`] component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    #[serde(default = "default_user_value_weight", alias = "wUvTri")]
    pub user_value: f64,
    #[serde(default = "default_time_criticality_weight", alias = "wTcEd")]
    pub time_criticality: f64,
    #[serde(default = "default_risk_reduction_weight", alias = "wRrOe")]
    pub risk_reduction: f64,
    #[serde(default = "default_compliance_weight", alias = "wCrSla")]
    pub compliance: f64,
}

fn default_user_value_weight() -> f64 {
    3.0
}
fn default_time_criticality_weight() -> f64 {
    2.0
}
fn default_risk_reduction_weight() -> f64 {
    2.0
}
fn default_compliance_weight() -> f64 {
    1.0
}

impl Default for WeightSet {
    fn default() -> Self {
        Self {
            user_value: default_user_value_weight(),
            time_criticality: default_time_criticality_weight(),
            risk_reduction: default_risk_reduction_weight(),
            compliance: default_compliance_weight(),
        }
    }
}

impl WeightSet {
    pub fn get(&self, field: WeightField) -> f64 {
        match field {
            WeightField::UserValue => self.user_value,
            WeightField::TimeCriticality => self.time_criticality,
            WeightField::RiskReduction => self.risk_reduction,
            WeightField::Compliance => self.compliance,
        }
    }

    /// Replace a single weight.
    pub fn set(&mut self, field: WeightField, value: f64) {
        match field {
            WeightField::UserValue => self.user_value = value,
            WeightField::TimeCriticality => self.time_criticality = value,
            WeightField::RiskReduction => self.risk_reduction = value,
            WeightField::Compliance => self.compliance = value,
        }
    }

    /// Apply a raw weight-change event and return the value stored.
    ///
    /// Unparseable, non-finite and negative input is stored as `0.0`.
    pub fn apply(&mut self, field: WeightField, raw: &str) -> f64 {
        let value = parse_weight(raw);
        self.set(field, value);
        value
    }

    /// Copy with every non-finite or negative weight replaced by `0.0`.
    ///
    /// Weight sets read from files bypass [`parse_weight`], so they go
    /// through this before scoring.
    pub fn sanitized(mut self) -> Self {
        for field in WeightField::ALL {
            let value = self.get(field);
            if !is_valid_weight(value) {
                tracing::warn!(%field, value, "weight is not a non-negative number, using 0");
                self.set(field, 0.0);
            }
        }
        self
    }

    /// First field holding a weight [`WeightSet::sanitized`] would replace.
    pub fn first_invalid(&self) -> Option<(WeightField, f64)> {
        self.components()
            .into_iter()
            .find(|(_, value)| !is_valid_weight(*value))
    }

    /// Weights paired with their field, in display order.
    pub fn components(&self) -> [(WeightField, f64); 4] {
        [
            (WeightField::UserValue, self.user_value),
            (WeightField::TimeCriticality, self.time_criticality),
            (WeightField::RiskReduction, self.risk_reduction),
            (WeightField::Compliance, self.compliance),
        ]
    }
}

fn is_valid_weight(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Parse user-entered weight text, falling back to `0.0`.
pub fn parse_weight(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if is_valid_weight(v) => v,
        _ => {
            tracing::warn!(input = raw, "weight input is not a non-negative number, using 0");
            0.0
        }
    }
}

/// Names one component of a [`WeightSet`] / [`ScoreSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightField {
    UserValue,
    TimeCriticality,
    RiskReduction,
    Compliance,
}

impl WeightField {
    pub const ALL: [WeightField; 4] = [
        WeightField::UserValue,
        WeightField::TimeCriticality,
        WeightField::RiskReduction,
        WeightField::Compliance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightField::UserValue => "user_value",
            WeightField::TimeCriticality => "time_criticality",
            WeightField::RiskReduction => "risk_reduction",
            WeightField::Compliance => "compliance",
        }
    }

    /// Short column code used in tables.
    pub fn code(&self) -> &'static str {
        match self {
            WeightField::UserValue => "UV/TRI",
            WeightField::TimeCriticality => "TC/ED",
            WeightField::RiskReduction => "RR/OE",
            WeightField::Compliance => "CR/SLA",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeightField::UserValue => "User Value / Training Readiness Impact",
            WeightField::TimeCriticality => "Time Criticality / Event Dependency",
            WeightField::RiskReduction => "Risk Reduction / Opportunity Enablement",
            WeightField::Compliance => "Compliance / Regulatory / SLA",
        }
    }
}

impl fmt::Display for WeightField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "uservalue" | "uv" | "uvtri" | "wuvtri" => Ok(WeightField::UserValue),
            "timecriticality" | "tc" | "tced" | "wtced" => Ok(WeightField::TimeCriticality),
            "riskreduction" | "rr" | "rroe" | "wrroe" => Ok(WeightField::RiskReduction),
            "compliance" | "cr" | "crsla" | "wcrsla" => Ok(WeightField::Compliance),
            _ => Err(ValidationError::UnknownWeightField(s.to_string())),
        }
    }
}

/// Cost of Delay: the dot product of scores and weights.
///
/// Non-finite inputs propagate.
pub fn cost_of_delay(scores: &ScoreSet, weights: &WeightSet) -> f64 {
    scores.user_value * weights.user_value
        + scores.time_criticality * weights.time_criticality
        + scores.risk_reduction * weights.risk_reduction
        + scores.compliance * weights.compliance
}

/// WSJF for a CoD and job size. Non-positive (or NaN) job size yields `0.0`.
pub fn wsjf(cod: f64, job_size: f64) -> f64 {
    if job_size > 0.0 {
        cod / job_size
    } else {
        0.0
    }
}

/// Descending WSJF order.
///
/// A total order so it is safe for `sort_by`: NaN ranks after every number
/// and `-0.0 == 0.0`.
pub fn compare_wsjf_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
