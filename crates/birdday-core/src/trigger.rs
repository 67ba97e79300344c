use serde::{Deserialize, Serialize};

/// What initiated a refresh. Affects the cascade's last-resort policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// Daily sweep, either the in-process cron job or the authenticated endpoint.
    Scheduled,
    /// Device playback webhook.
    Webhook,
    /// Operator-initiated refresh from the CLI.
    Manual,
}

impl TriggerKind {
    /// Interactive triggers have a person listening, so they must never be
    /// given a silently rotated location.
    #[must_use]
    pub fn is_interactive(self) -> bool {
        !matches!(self, TriggerKind::Scheduled)
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerKind::Scheduled => write!(f, "scheduled"),
            TriggerKind::Webhook => write!(f, "webhook"),
            TriggerKind::Manual => write!(f, "manual"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_scheduled_is_non_interactive() {
        assert!(!TriggerKind::Scheduled.is_interactive());
        assert!(TriggerKind::Webhook.is_interactive());
        assert!(TriggerKind::Manual.is_interactive());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TriggerKind::Webhook).expect("serialize");
        assert_eq!(json, "\"webhook\"");
    }
}
