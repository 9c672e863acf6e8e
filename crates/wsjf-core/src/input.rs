//! Batch input files.
//!
//! Two formats are accepted, chosen by extension (`.json`, otherwise TOML):
//!
//! ```toml
//! [weights]            # optional, overrides configured weights
//! compliance = 4
//!
//! [[initiative]]
//! name = "SSO rollout"
//! user_value = 8
//! time_criticality = 6
//! risk_reduction = 5
//! compliance = 9
//! job_size = 8
//! ```
//!
//! JSON is either a bare array of initiatives or an object with
//! `initiatives` and optional `weights`.

use std::path::Path;

use serde::Deserialize;

use crate::backlog::Backlog;
use crate::error::InputError;
use crate::initiative::InitiativeDraft;
use crate::scoring::WeightSet;

/// Parsed contents of a batch file.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BatchInput {
    #[serde(default)]
    pub weights: Option<WeightSet>,
    #[serde(default, alias = "initiative")]
    pub initiatives: Vec<InitiativeDraft>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonBatch {
    List(Vec<InitiativeDraft>),
    Document(BatchInput),
}

impl BatchInput {
    /// Read and parse `path`.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        };
        parsed.map_err(|message| InputError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        match serde_json::from_str::<JsonBatch>(content).map_err(|e| e.to_string())? {
            JsonBatch::List(initiatives) => Ok(Self {
                weights: None,
                initiatives,
            }),
            JsonBatch::Document(batch) => Ok(batch),
        }
    }

    /// Build a backlog from this batch. The file's weights win over `fallback`.
    ///
    /// NaN or negative weights in the file are stored as `0.0`.
    ///
    /// Every entry is validated first, so a bad entry leaves nothing half-built.
    pub fn into_backlog(self, fallback: WeightSet) -> Result<Backlog, InputError> {
        for (index, draft) in self.initiatives.iter().enumerate() {
            draft.validate().map_err(|source| InputError::InvalidEntry {
                index: index + 1,
                name: draft.name.clone(),
                source,
            })?;
        }

        let mut backlog = Backlog::new(self.weights.unwrap_or(fallback));
        for (index, draft) in self.initiatives.into_iter().enumerate() {
            let name = draft.name.clone();
            backlog
                .add(draft)
                .map_err(|source| InputError::InvalidEntry {
                    index: index + 1,
                    name,
                    source,
                })?;
        }
        Ok(backlog)
    }
}
