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

//! The configuration-at-timestamp entry point.
//!
//! Composes the history fetch, boundary selection, and fragment-mod
//! expansion into one call. Every invocation re-fetches the history; there
//! is no cache and no retry. `Ok(None)` means "no configuration is known
//! for that time" — either the timestamp predates all history or the
//! matched snapshot is unusable. Transport failures propagate.

use chrono::{DateTime, Utc};
use tracing::debug;

use sandlog_core::{
    expand, select_boundary, BoundarySource, ConfigMetadata, ResolvedConfig,
};

use crate::client::{ClientError, RobotApi, RobotServiceClient};

/// Resolve the configuration in effect for `part_id` at `at`.
pub async fn config_at_time<A>(
    api: &A,
    part_id: &str,
    at: DateTime<Utc>,
) -> Result<Option<ResolvedConfig>, ClientError>
where
    A: RobotApi + ?Sized,
{
    let history = api.change_history(part_id).await?;
    debug!(part_id, entries = history.len(), "fetched change history");

    let Some(selection) = select_boundary(&history, at) else {
        debug!(part_id, %at, "timestamp predates recorded history");
        return Ok(None);
    };

    let boundary = &history[selection.boundary];
    debug!(
        part_id,
        boundary = selection.boundary,
        when = %boundary.when,
        "matched change"
    );

    let (raw, has_old_config) = match selection.source {
        BoundarySource::Neighbor(index) => {
            let root = history[index]
                .old
                .as_ref()
                .and_then(|snapshot| snapshot.config_root());
            match root {
                Some(config) => (config.clone(), true),
                None => {
                    debug!(part_id, index, "snapshot lacks a configuration root");
                    return Ok(None);
                }
            }
        }
        BoundarySource::Current => {
            debug!(part_id, "matched change is the newest; fetching live configuration");
            let part = api.current_part(part_id).await?;
            match part.config_root() {
                Some(config) => (config.clone(), false),
                None => {
                    debug!(part_id, "live part carries no configuration root");
                    return Ok(None);
                }
            }
        }
    };

    let metadata = ConfigMetadata::from_boundary(part_id, boundary, has_old_config);
    let config = expand(&raw);

    Ok(Some(ResolvedConfig { config, metadata }))
}

impl RobotServiceClient {
    /// Resolve the configuration in effect for `part_id` at `at` against
    /// this client's service.
    pub async fn config_at_time(
        &self,
        part_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<ResolvedConfig>, ClientError> {
        config_at_time(self, part_id, at).await
    }
}
