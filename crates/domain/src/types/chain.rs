//! Fallback chain status and the snapshot pushed to observers

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;
use crate::types::model::CandidateId;

/// Lifecycle of a fallback chain
///
/// `Idle` is the only start state; `Success` and `Failure` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainStatus {
    #[default]
    Idle,
    InProgress,
    Success,
    Failure,
}

impl_domain_status_conversions!(ChainStatus {
    Idle => "idle",
    InProgress => "in-progress",
    Success => "success",
    Failure => "failure",
});

impl ChainStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

/// Point-in-time view of a fallback chain
///
/// Serializes to the shape a status indicator renders: `status`,
/// `currentModel`, `attemptedModels` and `error`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    pub status: ChainStatus,
    pub current_model: Option<CandidateId>,
    pub attempted_models: Vec<CandidateId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChainSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_status_display_and_parse() {
        assert_eq!(ChainStatus::InProgress.to_string(), "in-progress");
        assert_eq!(ChainStatus::from_str("IN-PROGRESS").unwrap(), ChainStatus::InProgress);
        assert!(ChainStatus::from_str("running").is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ChainStatus::Idle.is_terminal());
        assert!(!ChainStatus::InProgress.is_terminal());
        assert!(ChainStatus::Success.is_terminal());
        assert!(ChainStatus::Failure.is_terminal());
    }

    #[test]
    fn test_snapshot_presentation_shape() {
        let snapshot = ChainSnapshot {
            status: ChainStatus::Failure,
            current_model: None,
            attempted_models: vec!["gpt-4".into(), "claude-3".into()],
            error: Some("rate limited".into()),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "failure",
                "currentModel": null,
                "attemptedModels": ["gpt-4", "claude-3"],
                "error": "rate limited"
            })
        );
    }

    #[test]
    fn test_idle_snapshot_omits_error() {
        let json = serde_json::to_value(ChainSnapshot::idle()).unwrap();
        assert_eq!(json["status"], "idle");
        assert!(json.get("error").is_none());
    }
}
