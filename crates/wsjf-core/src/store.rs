//! In-memory initiative store.
//!
//! Holds initiatives ordered by descending WSJF. Every add and every
//! recompute ends with a stable sort, so initiatives with equal WSJF keep
//! the relative order they had before the sort.
//!
//! The store never recomputes on its own. Callers invoke [`InitiativeStore::recompute`]
//! once per weight change; removing an initiative leaves the remaining
//! derived values and order untouched.

use tracing::debug;

use crate::initiative::{Initiative, InitiativeDraft};
use crate::scoring::{compare_wsjf_desc, WeightSet};

/// Ordered collection of scored initiatives.
#[derive(Debug, Clone, Default)]
pub struct InitiativeStore {
    items: Vec<Initiative>,
}

impl InitiativeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `draft` against `weights`, insert it and re-sort.
    ///
    /// No validation happens here; see [`InitiativeDraft::validate`].
    pub fn add(&mut self, draft: InitiativeDraft, weights: &WeightSet) -> &Initiative {
        let initiative = Initiative::from_draft(draft, weights);
        let id = initiative.id().to_string();
        debug!(id = %id, name = initiative.name(), cod = initiative.cod(), wsjf = initiative.wsjf(), "initiative added");
        self.items.push(initiative);
        self.sort();

        let index = self.position(&id).unwrap_or(self.items.len() - 1);
        &self.items[index]
    }

    /// Remove the initiative with `id`. Unknown ids are a no-op.
    pub fn delete(&mut self, id: &str) -> Option<Initiative> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        debug!(id, name = removed.name(), "initiative deleted");
        Some(removed)
    }

    /// Rescore every initiative against `weights` and re-sort.
    ///
    /// Idempotent: a second call with the same weights leaves derived values
    /// bit-identical and the order unchanged.
    pub fn recompute(&mut self, weights: &WeightSet) {
        for item in &mut self.items {
            item.rescore(weights);
        }
        self.sort();
        debug!(count = self.items.len(), "initiatives recomputed");
    }

    fn sort(&mut self) {
        // `sort_by` is stable.
        self.items.sort_by(|a, b| compare_wsjf_desc(a.wsjf(), b.wsjf()));
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&Initiative> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Initiative> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Initiative] {
        &self.items
    }

    /// Owned copy of the current order, for exports.
    pub fn snapshot(&self) -> Vec<Initiative> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a InitiativeStore {
    type Item = &'a Initiative;
    type IntoIter = std::slice::Iter<'a, Initiative>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ScoreSet, WeightField};
    use proptest::prelude::*;

    fn draft(name: &str, score: f64, job_size: f64) -> InitiativeDraft {
        InitiativeDraft::new(name, ScoreSet::new(score, score, score, score), job_size)
    }

    fn names(store: &InitiativeStore) -> Vec<&str> {
        store.iter().map(|i| i.name()).collect()
    }

    #[test]
    fn add_keeps_descending_order() {
        let weights = WeightSet::default();
        let mut store = InitiativeStore::new();
        store.add(draft("A", 5.0, 5.0), &weights);
        let b = store.add(draft("B", 10.0, 1.0), &weights);
        assert_eq!(b.name(), "B");
        assert_eq!(b.wsjf(), 80.0);
        store.add(draft("C", 2.0, 2.0), &weights);
        assert_eq!(names(&store), vec!["B", "A", "C"]);
    }

    #[test]
    fn equal_wsjf_keeps_insertion_order() {
        let weights = WeightSet::default();
        let mut store = InitiativeStore::new();
        store.add(draft("first", 5.0, 5.0), &weights);
        store.add(draft("second", 10.0, 10.0), &weights);
        store.add(draft("third", 1.0, 1.0), &weights);
        // All three have WSJF 8.
        assert_eq!(names(&store), vec!["first", "second", "third"]);

        store.recompute(&weights);
        assert_eq!(names(&store), vec!["first", "second", "third"]);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let weights = WeightSet::default();
        let mut store = InitiativeStore::new();
        store.add(draft("A", 5.0, 5.0), &weights);
        assert!(store.delete("missing").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let weights = WeightSet::default();
        let mut store = InitiativeStore::new();
        let a_id = store.add(draft("A", 5.0, 5.0), &weights).id().to_string();
        let b_id = store.add(draft("B", 10.0, 1.0), &weights).id().to_string();

        let removed = store.delete(&b_id).unwrap();
        assert_eq!(removed.name(), "B");
        assert_eq!(store.len(), 1);
        let a = store.get(&a_id).unwrap();
        assert_eq!(a.cod(), 40.0);
        assert_eq!(a.wsjf(), 8.0);
    }

    #[test]
    fn recompute_reorders_on_weight_change() {
        let mut weights = WeightSet::default();
        let mut store = InitiativeStore::new();
        store.add(
            InitiativeDraft::new("value-heavy", ScoreSet::new(10.0, 1.0, 1.0, 1.0), 5.0),
            &weights,
        );
        store.add(
            InitiativeDraft::new("compliance-heavy", ScoreSet::new(1.0, 1.0, 1.0, 10.0), 5.0),
            &weights,
        );
        assert_eq!(names(&store), vec!["value-heavy", "compliance-heavy"]);

        weights.set(WeightField::Compliance, 10.0);
        store.recompute(&weights);
        assert_eq!(names(&store), vec!["compliance-heavy", "value-heavy"]);
    }

    #[test]
    fn non_positive_job_size_ranks_with_zero_wsjf() {
        let weights = WeightSet::default();
        let mut store = InitiativeStore::new();
        store.add(draft("zero", 5.0, 0.0), &weights);
        store.add(draft("normal", 1.0, 20.0), &weights);
        assert_eq!(names(&store), vec!["normal", "zero"]);
        assert_eq!(store.iter().last().unwrap().wsjf(), 0.0);
    }

    fn arb_draft() -> impl Strategy<Value = InitiativeDraft> {
        (1u8..=10, 1u8..=10, 1u8..=10, 1u8..=10, 0u8..=20).prop_map(|(uv, tc, rr, cr, job)| {
            InitiativeDraft::new(
                format!("{uv}-{tc}-{rr}-{cr}-{job}"),
                ScoreSet::new(uv as f64, tc as f64, rr as f64, cr as f64),
                job as f64,
            )
        })
    }

    fn arb_weights() -> impl Strategy<Value = WeightSet> {
        (0.0f64..10.0, 0.0f64..10.0, 0.0f64..10.0, 0.0f64..10.0).prop_map(|(a, b, c, d)| WeightSet {
            user_value: a,
            time_criticality: b,
            risk_reduction: c,
            compliance: d,
        })
    }

    fn is_sorted_desc(store: &InitiativeStore) -> bool {
        store
            .as_slice()
            .windows(2)
            .all(|w| w[0].wsjf() >= w[1].wsjf())
    }

    proptest! {
        #[test]
        fn sorted_after_every_add(drafts in prop::collection::vec(arb_draft(), 0..30), weights in arb_weights()) {
            let mut store = InitiativeStore::new();
            for d in drafts {
                store.add(d, &weights);
                prop_assert!(is_sorted_desc(&store));
            }
        }

        #[test]
        fn recompute_is_idempotent(
            drafts in prop::collection::vec(arb_draft(), 0..30),
            initial in arb_weights(),
            next in arb_weights(),
        ) {
            let mut store = InitiativeStore::new();
            for d in drafts {
                store.add(d, &initial);
            }

            store.recompute(&next);
            prop_assert!(is_sorted_desc(&store));
            let first: Vec<(String, u64, u64)> = store
                .iter()
                .map(|i| (i.id().to_string(), i.cod().to_bits(), i.wsjf().to_bits()))
                .collect();

            store.recompute(&next);
            let second: Vec<(String, u64, u64)> = store
                .iter()
                .map(|i| (i.id().to_string(), i.cod().to_bits(), i.wsjf().to_bits()))
                .collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn ties_preserve_prior_order(
            drafts in prop::collection::vec(arb_draft(), 0..30),
            initial in arb_weights(),
            next in arb_weights(),
        ) {
            let mut store = InitiativeStore::new();
            for d in drafts {
                store.add(d, &initial);
            }
            let before: Vec<String> = store.iter().map(|i| i.id().to_string()).collect();

            store.recompute(&next);
            let after = store.as_slice();
            for (i, a) in after.iter().enumerate() {
                for b in &after[i + 1..] {
                    if a.wsjf() == b.wsjf() {
                        let pos_a = before.iter().position(|id| id == a.id()).unwrap();
                        let pos_b = before.iter().position(|id| id == b.id()).unwrap();
                        prop_assert!(pos_a < pos_b);
                    }
                }
            }
        }
    }
}
