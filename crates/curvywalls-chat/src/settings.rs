//! Merge options consumed from the host's settings store.

use serde::{Deserialize, Serialize};

/// Default merge window in seconds.
pub const DEFAULT_EPOCH_SECONDS: u32 = 10;

/// How roll messages participate in merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollPolicy {
    /// Neither message may be a roll.
    None,
    /// Both or neither must be rolls.
    #[default]
    Rolls,
    /// Rolls never block a merge.
    All,
}

/// Options for the merge classifier. Any change should be followed by a
/// full [`retag_all`](crate::merge::MergeLog::retag_all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeSettings {
    /// Master switch; when off no tags are produced.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Group by speaking actor where present, falling back to the user.
    /// When off, only the user is compared.
    #[serde(default = "default_true")]
    pub split_speaker: bool,
    /// Maximum gap between messages, in seconds (1..=60).
    #[serde(default = "default_epoch")]
    pub epoch_seconds: u32,
    /// Roll participation policy.
    #[serde(default)]
    pub allow_rolls: RollPolicy,
}

fn default_true() -> bool {
    true
}

fn default_epoch() -> u32 {
    DEFAULT_EPOCH_SECONDS
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            split_speaker: true,
            epoch_seconds: DEFAULT_EPOCH_SECONDS,
            allow_rolls: RollPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_registration() {
        let settings = MergeSettings::default();
        assert!(settings.enabled);
        assert!(settings.split_speaker);
        assert_eq!(settings.epoch_seconds, 10);
        assert_eq!(settings.allow_rolls, RollPolicy::Rolls);
    }

    #[test]
    fn test_roll_policy_serializes_lowercase() {
        let json = serde_json::to_string(&RollPolicy::All).unwrap();
        assert_eq!(json, "\"all\"");
        let back: RollPolicy = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(back, RollPolicy::None);
    }

    #[test]
    fn test_empty_blob_falls_back_to_defaults() {
        let settings: MergeSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, MergeSettings::default());
    }
}
