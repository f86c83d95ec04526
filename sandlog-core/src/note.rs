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

//! Operator notes attached to individual sanding passes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Addresses one pass note: every pass belongs to exactly one robot, which
/// belongs to a location inside an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassNoteKey {
    pub organization_id: String,
    pub location_id: String,
    pub robot_id: String,
    pub pass_id: String,
}

impl PassNoteKey {
    pub fn new(
        organization_id: impl Into<String>,
        location_id: impl Into<String>,
        robot_id: impl Into<String>,
        pass_id: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            location_id: location_id.into(),
            robot_id: robot_id.into(),
            pass_id: pass_id.into(),
        }
    }

    /// True when every tuple field is non-empty.
    pub fn is_complete(&self) -> bool {
        !self.organization_id.is_empty()
            && !self.location_id.is_empty()
            && !self.robot_id.is_empty()
            && !self.pass_id.is_empty()
    }
}

/// A free-text note attached to one sanding pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassNote {
    pub organization_id: String,
    pub location_id: String,
    pub robot_id: String,
    pub pass_id: String,

    pub note: String,

    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl PassNote {
    pub fn key(&self) -> PassNoteKey {
        PassNoteKey::new(
            self.organization_id.clone(),
            self.location_id.clone(),
            self.robot_id.clone(),
            self.pass_id.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tuple_fields_are_incomplete() {
        let key = PassNoteKey::new("org", "loc", "", "pass");
        assert!(!key.is_complete());

        let key = PassNoteKey::new("org", "loc", "robot", "pass");
        assert!(key.is_complete());
    }
}
