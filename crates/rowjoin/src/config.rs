//! Joiner configuration.
//!
//! `JoinConfig` is plain data so host applications can embed it in their own
//! TOML or JSON configuration; missing keys take their defaults.

use serde::{Deserialize, Serialize};

/// How a pair whose output record cannot be constructed is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructFailurePolicy {
    /// Skip-on-construct-failure: drop the row and report it in
    /// [`Joined::skipped`](crate::Joined::skipped).
    #[default]
    Skip,
    /// Fail the whole join on the first row that cannot be constructed.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    pub on_construct_failure: ConstructFailurePolicy,
    /// Emit a `warn` event for every skipped row.
    pub log_skipped: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            on_construct_failure: ConstructFailurePolicy::Skip,
            log_skipped: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_skip_and_log() {
        let config = JoinConfig::default();
        assert_eq!(config.on_construct_failure, ConstructFailurePolicy::Skip);
        assert!(config.log_skipped);
    }

    #[test]
    fn policy_uses_snake_case_names() {
        let json = serde_json::to_string(&ConstructFailurePolicy::Abort).unwrap();
        assert_eq!(json, "\"abort\"");
        let parsed: JoinConfig = serde_json::from_str(r#"{"on_construct_failure":"abort"}"#).unwrap();
        assert_eq!(parsed.on_construct_failure, ConstructFailurePolicy::Abort);
        assert!(parsed.log_skipped);
    }
}
