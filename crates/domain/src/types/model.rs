//! Candidate backends and their priority order

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a backend a fallback chain may try (e.g. an AI model name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CandidateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CandidateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A primary model plus fallbacks in priority order
///
/// Duplicates are kept as given; a repeated model is simply tried again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSelection {
    pub primary_model: CandidateId,
    #[serde(default)]
    pub fallback_models: Vec<CandidateId>,
}

impl ModelSelection {
    pub fn new(primary_model: CandidateId, fallback_models: Vec<CandidateId>) -> Self {
        Self { primary_model, fallback_models }
    }

    /// Only the primary model, no fallbacks
    pub fn primary_only(primary_model: impl Into<CandidateId>) -> Self {
        Self::new(primary_model.into(), Vec::new())
    }

    /// Ordered candidate list: primary first, then fallbacks
    pub fn candidates(&self) -> Vec<CandidateId> {
        std::iter::once(self.primary_model.clone())
            .chain(self.fallback_models.iter().cloned())
            .collect()
    }

    /// Number of candidates, counting duplicates
    pub fn candidate_count(&self) -> usize {
        1 + self.fallback_models.len()
    }
}
