use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::WeightSet;

/// Every state change of a [`crate::Backlog`] produces an Event.
/// Front ends drain them to refresh their views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BacklogEvent {
    InitiativeAdded {
        id: String,
        name: String,
        /// 1-based rank after the insert.
        rank: usize,
        at: DateTime<Utc>,
    },
    InitiativeDeleted {
        id: String,
        name: String,
        at: DateTime<Utc>,
    },
    /// Weights replaced and every initiative rescored.
    WeightsChanged {
        weights: WeightSet,
        at: DateTime<Utc>,
    },
    ReportExported {
        path: PathBuf,
        initiatives: usize,
        pages: usize,
        at: DateTime<Utc>,
    },
}
