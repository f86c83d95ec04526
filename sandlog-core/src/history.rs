// Copyright 2025 Sandlog (https://github.com/sandlog/sandlog)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Change-history records for a robot part, as served by the
//! robot-management service, and the resolved-configuration result types
//! returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record in a part's configuration change log.
///
/// The service emits these newest-first. `old` holds the full part snapshot
/// as it existed *before* this change was applied; synthetic initial entries
/// carry no snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeHistoryEntry {
    /// When the change was applied.
    pub when: DateTime<Utc>,

    /// Robot the part belonged to at the time of the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot: Option<String>,

    /// Email of whoever made the change, when the service knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_by: Option<String>,

    /// Part snapshot prior to this change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<PartSnapshot>,
}

/// A snapshot of a robot part, either historical (`old` on a history entry)
/// or live (the current-part fetch).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot: Option<String>,

    /// The configuration document. Anything other than a JSON object is
    /// treated as an unusable snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl PartSnapshot {
    /// The configuration root, if this snapshot carries a usable one.
    pub fn config_root(&self) -> Option<&Value> {
        self.config.as_ref().filter(|config| config.is_object())
    }
}

/// Provenance attached to a resolved configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    pub part_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot_id: Option<String>,

    /// Timestamp of the change that put this configuration into effect.
    pub config_timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_by: Option<String>,

    /// True when the configuration was read from a historical snapshot,
    /// false when the live configuration had to be fetched.
    pub has_old_config: bool,
}

impl ConfigMetadata {
    /// Build metadata from the matched history entry. Metadata always
    /// describes the matched change itself, regardless of which record the
    /// snapshot was read from.
    pub fn from_boundary(part_id: &str, entry: &ChangeHistoryEntry, has_old_config: bool) -> Self {
        Self {
            part_id: part_id.to_string(),
            robot_id: entry.robot.clone(),
            config_timestamp: entry.when,
            edited_by: entry.edited_by.clone(),
            has_old_config,
        }
    }
}

/// A fully resolved configuration: the expanded document plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub config: Value,
    pub metadata: ConfigMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn history_entries_round_trip_with_optional_fields_absent() {
        let raw = json!({"when": "2025-03-01T12:00:00Z"});
        let entry: ChangeHistoryEntry = serde_json::from_value(raw).unwrap();
        assert!(entry.robot.is_none());
        assert!(entry.edited_by.is_none());
        assert!(entry.old.is_none());
    }

    #[test]
    fn non_object_config_is_not_a_usable_root() {
        let snapshot: PartSnapshot =
            serde_json::from_value(json!({"config": [1, 2, 3]})).unwrap();
        assert!(snapshot.config_root().is_none());

        let snapshot: PartSnapshot =
            serde_json::from_value(json!({"config": {"components": []}})).unwrap();
        assert!(snapshot.config_root().is_some());
    }

    #[test]
    fn metadata_reflects_the_matched_entry() {
        let entry: ChangeHistoryEntry = serde_json::from_value(json!({
            "when": "2025-03-01T12:00:00Z",
            "robot": "robot-7",
            "edited_by": "op@example.com",
        }))
        .unwrap();

        let meta = ConfigMetadata::from_boundary("part-1", &entry, true);
        assert_eq!(meta.part_id, "part-1");
        assert_eq!(meta.robot_id.as_deref(), Some("robot-7"));
        assert_eq!(meta.edited_by.as_deref(), Some("op@example.com"));
        assert_eq!(meta.config_timestamp, entry.when);
        assert!(meta.has_old_config);
    }
}
