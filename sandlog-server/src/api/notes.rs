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
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sandlog_core::{PassNote, PassNoteKey};

use crate::api::{ApiError, AppState};

/// Request body for creating or replacing a note
#[derive(Debug, Deserialize)]
pub struct UpsertNoteRequest {
    pub organization_id: String,
    pub location_id: String,
    pub robot_id: String,
    pub pass_id: String,
    pub note: String,
    #[serde(default)]
    pub updated_by: Option<String>,
}

/// Query parameters addressing notes; `pass_id` switches between a single
/// lookup and a per-robot listing
#[derive(Debug, Deserialize)]
pub struct NoteQuery {
    pub organization_id: String,
    pub location_id: String,
    pub robot_id: String,
    pub pass_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteNoteQuery {
    pub organization_id: String,
    pub location_id: String,
    pub robot_id: String,
    pub pass_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PruneQuery {
    /// RFC 3339 cutoff; notes updated strictly before it are removed
    pub before: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub notes: Vec<PassNote>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct PruneResponse {
    pub deleted: usize,
}

/// POST /api/notes - Create or replace the note for one pass
pub async fn upsert_note(
    State(state): State<AppState>,
    Json(req): Json<UpsertNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let key = PassNoteKey::new(
        req.organization_id.clone(),
        req.location_id.clone(),
        req.robot_id.clone(),
        req.pass_id.clone(),
    );
    if !key.is_complete() {
        return Err(ApiError::BadRequest(
            "organization_id, location_id, robot_id and pass_id must all be non-empty".to_string(),
        ));
    }

    debug!(
        robot_id = %req.robot_id,
        pass_id = %req.pass_id,
        "upserting pass note"
    );

    let note = PassNote {
        organization_id: req.organization_id,
        location_id: req.location_id,
        robot_id: req.robot_id,
        pass_id: req.pass_id,
        note: req.note,
        updated_at: Utc::now(),
        updated_by: req.updated_by,
    };

    state.store.upsert(&note)?;

    Ok((StatusCode::OK, Json(note)))
}

/// GET /api/notes - Fetch one note (with `pass_id`) or list a robot's notes
pub async fn get_notes(
    State(state): State<AppState>,
    Query(query): Query<NoteQuery>,
) -> Result<axum::response::Response, ApiError> {
    match query.pass_id {
        Some(pass_id) => {
            let key = PassNoteKey::new(
                query.organization_id,
                query.location_id,
                query.robot_id,
                pass_id,
            );
            match state.store.get(&key)? {
                Some(note) => Ok(Json(note).into_response()),
                None => Err(ApiError::NotFound(format!(
                    "no note for pass {}",
                    key.pass_id
                ))),
            }
        }
        None => {
            let notes = state.store.list_for_robot(
                &query.organization_id,
                &query.location_id,
                &query.robot_id,
            )?;
            let total = notes.len();
            Ok(Json(NotesResponse { notes, total }).into_response())
        }
    }
}

/// DELETE /api/notes - Remove the note for one pass
pub async fn delete_note(
    State(state): State<AppState>,
    Query(query): Query<DeleteNoteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let key = PassNoteKey::new(
        query.organization_id,
        query.location_id,
        query.robot_id,
        query.pass_id,
    );

    let deleted = state.store.delete(&key)?;
    debug!(pass_id = %key.pass_id, deleted, "deleted pass note");

    Ok(Json(DeleteResponse { deleted }))
}

/// DELETE /api/notes/old - Remove notes last updated before a cutoff
pub async fn delete_old_notes(
    State(state): State<AppState>,
    Query(query): Query<PruneQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.store.delete_older_than(query.before)?;
    Ok(Json(PruneResponse { deleted }))
}
