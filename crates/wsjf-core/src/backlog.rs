//! Backlog facade: the current weights plus the initiative store.
//!
//! This is the single entry point front ends drive. It validates add
//! events at the input boundary and turns every weight change into exactly
//! one store recompute.

use std::path::Path;

use chrono::Utc;
use tracing::debug;

use crate::error::{ExportError, ValidationError};
use crate::events::BacklogEvent;
use crate::initiative::{Initiative, InitiativeDraft};
use crate::report::{ExportOutcome, ReportExporter, ReportSnapshot};
use crate::scoring::{WeightField, WeightSet};
use crate::store::InitiativeStore;

#[derive(Debug, Clone, Default)]
pub struct Backlog {
    weights: WeightSet,
    store: InitiativeStore,
    events: Vec<BacklogEvent>,
}

impl Backlog {
    /// Empty backlog scored with `weights`. Invalid weights become `0.0`.
    pub fn new(weights: WeightSet) -> Self {
        Self {
            weights: weights.sanitized(),
            store: InitiativeStore::new(),
            events: Vec::new(),
        }
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn initiatives(&self) -> &InitiativeStore {
        &self.store
    }

    /// Validate and insert a draft. Rejected drafts leave the backlog untouched.
    pub fn add(&mut self, draft: InitiativeDraft) -> Result<&Initiative, ValidationError> {
        draft.validate()?;
        let (id, name) = {
            let added = self.store.add(draft, &self.weights);
            (added.id().to_string(), added.name().to_string())
        };

        let index = self
            .store
            .iter()
            .position(|i| i.id() == id)
            .unwrap_or(self.store.len() - 1);
        self.events.push(BacklogEvent::InitiativeAdded {
            id,
            name,
            rank: index + 1,
            at: Utc::now(),
        });
        Ok(&self.store.as_slice()[index])
    }

    /// Remove by id. Absent ids are a no-op; no recompute happens either way.
    pub fn delete(&mut self, id: &str) -> Option<Initiative> {
        let removed = self.store.delete(id)?;
        self.events.push(BacklogEvent::InitiativeDeleted {
            id: removed.id().to_string(),
            name: removed.name().to_string(),
            at: Utc::now(),
        });
        Some(removed)
    }

    /// Handle a single weight-change event. Returns the stored value.
    pub fn set_weight(&mut self, field: WeightField, raw: &str) -> f64 {
        let value = self.weights.apply(field, raw);
        debug!(%field, value, "weight changed");
        self.weights_changed();
        value
    }

    /// Replace all four weights at once. Invalid weights become `0.0`.
    pub fn set_weights(&mut self, weights: WeightSet) {
        self.weights = weights.sanitized();
        self.weights_changed();
    }

    fn weights_changed(&mut self) {
        self.store.recompute(&self.weights);
        self.events.push(BacklogEvent::WeightsChanged {
            weights: self.weights,
            at: Utc::now(),
        });
    }

    /// Read-only copy of the current state, taken now.
    pub fn snapshot(&self) -> ReportSnapshot {
        ReportSnapshot::new(self.store.snapshot(), self.weights)
    }

    /// Export the current state to `path`.
    ///
    /// The exporter works on a snapshot taken here, so the report reflects
    /// the backlog at the moment of the call.
    pub fn export(
        &mut self,
        exporter: &ReportExporter,
        path: &Path,
    ) -> Result<ExportOutcome, ExportError> {
        let outcome = exporter.export_to(&self.snapshot(), path)?;
        self.events.push(BacklogEvent::ReportExported {
            path: outcome.path.clone(),
            initiatives: outcome.initiatives,
            pages: outcome.pages,
            at: Utc::now(),
        });
        Ok(outcome)
    }

    /// Take all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<BacklogEvent> {
        std::mem::take(&mut self.events)
    }
}
