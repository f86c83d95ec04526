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

//! Sandlog Core
//!
//! Data model and pure logic for reconstructing a robot part's
//! configuration at an arbitrary point in time: change-history records,
//! dotted-path patch application, fragment-mod expansion, and history
//! boundary selection. Everything here is synchronous and network-free;
//! fetching belongs to `sandlog-client`.

pub mod fragment;
pub mod history;
pub mod note;
pub mod patch;
pub mod resolve;

pub use fragment::{expand, FragmentMod, PatchOp, FRAGMENT_MODS_KEY};
pub use history::{ChangeHistoryEntry, ConfigMetadata, PartSnapshot, ResolvedConfig};
pub use note::{PassNote, PassNoteKey};
pub use patch::{apply_set, parse_path, PathSegment};
pub use resolve::{select_boundary, BoundarySelection, BoundarySource};
