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

//! Fragment-mod expansion.
//!
//! A robot configuration may embed a `fragment_mods` list: groups of
//! declarative patch operations layered onto the base document. [`expand`]
//! replays every operation onto a copy of the document and returns the
//! flattened configuration.
//!
//! Replay order is significant on overlapping paths: groups apply in list
//! order, mods within a group in list order, and the keys of a `set` map in
//! insertion order. The last write wins.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::patch::apply_set;

/// Key under which a configuration document embeds its mod groups.
pub const FRAGMENT_MODS_KEY: &str = "fragment_mods";

const COMPONENTS_KEY: &str = "components";

/// One group of patch operations embedded in a configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FragmentMod {
    #[serde(default)]
    pub mods: Vec<PatchOp>,
}

/// A single declarative patch operation.
///
/// Externally tagged, so the wire shape is `{"set": {"path": value, ...}}`.
/// New operation kinds (an `unset` is the obvious candidate) are new
/// variants here plus a match arm in [`expand`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOp {
    Set(Map<String, Value>),
}

/// Replay all embedded fragment mods and return the flattened configuration.
///
/// Always returns a fresh document, even when there is nothing to replay.
/// The `fragment_mods` (and any `fragments`) keys are left on the result;
/// consumers of the expanded document still see what produced it.
///
/// Groups or mods that do not have the expected shape are skipped. An
/// operation whose path cannot be resolved (unknown component, unmatched
/// array filter) is dropped on its own; the remaining operations still
/// apply.
pub fn expand(config: &Value) -> Value {
    let mut working = config.clone();

    let groups: Vec<FragmentMod> = match config.get(FRAGMENT_MODS_KEY) {
        Some(Value::Array(raw)) => raw
            .iter()
            .filter_map(|group| serde_json::from_value(group.clone()).ok())
            .collect(),
        _ => return working,
    };

    for group in groups {
        for op in group.mods {
            match op {
                PatchOp::Set(set) => {
                    for (path, value) in set {
                        apply_mod(&mut working, &path, value);
                    }
                }
            }
        }
    }

    working
}

/// Apply one `set` entry, routing `components.<name>.<rest>` paths through
/// the component list.
///
/// The `components.<name>` prefix is consumed: `<rest>` applies to the
/// matched component element itself. A name with no matching component makes
/// the operation a no-op. Every other path shape applies to the document
/// root directly.
fn apply_mod(working: &mut Value, path: &str, value: Value) {
    if let Some(rest) = path.strip_prefix("components.") {
        if let Some((name, tail)) = rest.split_once('.') {
            if let Some(component) = find_component(working, name) {
                apply_set(component, tail, value);
            }
            return;
        }
    }
    apply_set(working, path, value);
}

fn find_component<'a>(working: &'a mut Value, name: &str) -> Option<&'a mut Value> {
    match working.get_mut(COMPONENTS_KEY) {
        Some(Value::Array(components)) => components
            .iter_mut()
            .find(|c| c.get("name").and_then(Value::as_str) == Some(name)),
        _ => None,
    }
}
