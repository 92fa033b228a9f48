use crate::configuration::suite::{ButtonAction, Card};
use crate::device::message::{Penalty, SolveMessage};
use serde_derive::Serialize;

/// Names `VerifySnapshot` may list, in serialization order.
pub const SNAPSHOT_FIELDS: &[&str] = &[
    "scannedCard",
    "groupId",
    "secondaryText",
    "inspectionActive",
    "solveTime",
    "penalty",
    "delegatePending",
    "lastSent",
];

/// Externally observable state of the station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub scanned_card: Option<Card>,
    pub group_id: Option<String>,
    pub secondary_text: Option<String>,
    pub inspection_active: bool,
    pub solve_time: Option<u64>,
    pub penalty: Penalty,
    pub delegate_pending: bool,
    pub last_sent: Option<SolveMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonEvent {
    pub name: String,
    pub action: ButtonAction,
    pub pressed_at: u64,
    pub held_ms: u64,
}

/// Everything known about a finished test, attached to its report when the
/// suite asks for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDump {
    pub snapshot: Snapshot,
    pub last_snapshot: Option<Snapshot>,
    pub clock_ms: u64,
    pub button_events: Vec<ButtonEvent>,
    pub sent: Vec<SolveMessage>,
    pub rng_draws: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_field_names_match_serialized_keys() {
        let snapshot = Snapshot {
            scanned_card: None,
            group_id: None,
            secondary_text: None,
            inspection_active: false,
            solve_time: None,
            penalty: Penalty::None,
            delegate_pending: false,
            last_sent: None,
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        let keys: BTreeSet<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();

        assert_eq!(keys, SNAPSHOT_FIELDS.iter().copied().collect());
    }
}
