//! Plain terminal rendering of the ranked initiatives.

use std::fmt::Write;

use wsjf_core::{InitiativeStore, WeightField, WeightSet};

const NAME_WIDTH: usize = 32;
const ID_WIDTH: usize = 8;

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}

/// Leading characters of an id. Session `delete` accepts them as a prefix.
pub fn id_prefix(id: &str) -> String {
    id.chars().take(ID_WIDTH).collect()
}

pub fn render_weights(weights: &WeightSet) -> String {
    let mut out = String::from("Configured Weights:\n");
    for (field, value) in weights.components() {
        let _ = writeln!(out, "  {:<7} {:<40} {value}", field.code(), field.label());
    }
    out
}

pub fn render_initiatives(store: &InitiativeStore) -> String {
    if store.is_empty() {
        return "No initiatives added yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = write!(out, "{:>4}  {:<ID_WIDTH$}  {:<NAME_WIDTH$}", "Rank", "ID", "Initiative");
    for field in WeightField::ALL {
        let _ = write!(out, "  {:>6}", field.code());
    }
    let _ = writeln!(out, "  {:>7}  {:>8}  {:>8}", "Job SP", "CoD", "WSJF");

    for (index, initiative) in store.iter().enumerate() {
        let _ = write!(
            out,
            "{:>4}  {:<ID_WIDTH$}  {:<NAME_WIDTH$}",
            index + 1,
            id_prefix(initiative.id()),
            clip(initiative.name(), NAME_WIDTH)
        );
        for (_, score) in initiative.scores().components() {
            let _ = write!(out, "  {score:>6}");
        }
        let _ = writeln!(
            out,
            "  {:>7}  {:>8.2}  {:>8.2}",
            initiative.job_size(),
            initiative.cod(),
            initiative.wsjf()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsjf_core::{InitiativeDraft, ScoreSet};

    #[test]
    fn empty_store_message() {
        assert_eq!(render_initiatives(&InitiativeStore::new()), "No initiatives added yet.\n");
    }

    #[test]
    fn rows_in_rank_order_with_two_decimals() {
        let weights = WeightSet::default();
        let mut store = InitiativeStore::new();
        store.add(InitiativeDraft::new("A", ScoreSet::new(5.0, 5.0, 5.0, 5.0), 5.0), &weights);
        store.add(InitiativeDraft::new("B", ScoreSet::new(10.0, 10.0, 10.0, 10.0), 1.0), &weights);

        let text = render_initiatives(&store);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("WSJF"));
        assert!(lines[1].contains(" B ") && lines[1].trim_end().ends_with("80.00"));
        assert!(lines[2].contains(" A ") && lines[2].trim_end().ends_with("8.00"));
    }

    #[test]
    fn ids_are_shown_as_plain_prefixes() {
        let weights = WeightSet::default();
        let mut store = InitiativeStore::new();
        let id = store
            .add(InitiativeDraft::new("A", ScoreSet::new(5.0, 5.0, 5.0, 5.0), 5.0), &weights)
            .id()
            .to_string();
        let prefix = id_prefix(&id);
        assert_eq!(prefix.len(), ID_WIDTH);
        assert!(id.starts_with(&prefix));
        assert!(render_initiatives(&store).contains(&prefix));
        assert!(!render_initiatives(&store).contains('~'));
    }

    #[test]
    fn long_names_are_clipped() {
        assert_eq!(clip("abcdef", 4), "abc~");
        assert_eq!(clip("abc", 4), "abc");
    }
}
