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

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use sandlog_client::config_at_time;
use sandlog_core::ResolvedConfig;

use crate::api::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ConfigAtQuery {
    pub part_id: String,
    /// RFC 3339 timestamp to reconstruct the configuration for
    pub at: DateTime<Utc>,
}

/// GET /api/config - Configuration in effect for a part at a timestamp
pub async fn get_config_at(
    State(state): State<AppState>,
    Query(query): Query<ConfigAtQuery>,
) -> Result<Json<ResolvedConfig>, ApiError> {
    let Some(robot) = &state.robot else {
        return Err(ApiError::Unavailable(
            "no robot service configured".to_string(),
        ));
    };

    debug!(part_id = %query.part_id, at = %query.at, "resolving configuration");

    match config_at_time(robot.as_ref(), &query.part_id, query.at).await {
        Ok(Some(resolved)) => Ok(Json(resolved)),
        Ok(None) => Err(ApiError::NotFound(format!(
            "no configuration recorded for part {} at {}",
            query.part_id, query.at
        ))),
        Err(err) => Err(ApiError::Upstream(err.to_string())),
    }
}
