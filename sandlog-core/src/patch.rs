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

//! Dotted-path write operations over JSON configuration trees.
//!
//! Paths look like `motion.limits.max_rpm`. A single segment may instead
//! address an array element by a field match: `components[name=motor1]`
//! selects the first element of the `components` array whose `name` field
//! equals `motor1`.
//!
//! Writes are best-effort: an unmatched array filter or a non-object value
//! sitting where the walk needs to descend turns that one operation into a
//! no-op instead of an error. Missing intermediate objects on plain segments
//! are created, so a set on a fresh document always lands.

use serde_json::{Map, Value};

/// One parsed segment of a dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Plain object field.
    Field(String),
    /// Array element addressed by a field match: `array[key=value]`.
    Filter {
        array: String,
        key: String,
        value: String,
    },
}

/// Parse a dotted path into segments.
///
/// Segments that look like `name[key=value]` become [`PathSegment::Filter`];
/// anything else, including malformed bracket syntax, is treated as a plain
/// field name.
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    path.split('.').map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> PathSegment {
    if let (Some(open), true) = (segment.find('['), segment.ends_with(']')) {
        let inner = &segment[open + 1..segment.len() - 1];
        if let Some((key, value)) = inner.split_once('=') {
            if !key.is_empty() {
                return PathSegment::Filter {
                    array: segment[..open].to_string(),
                    key: key.to_string(),
                    value: value.to_string(),
                };
            }
        }
    }
    PathSegment::Field(segment.to_string())
}

/// Set `value` at `path` inside `root`, mutating `root` in place.
///
/// Replace semantics: whatever sat at the final key is overwritten, not
/// merged. Callers that need the original intact must clone before calling.
pub fn apply_set(root: &mut Value, path: &str, value: Value) {
    let segments = parse_path(path);
    let Some((last, walk)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in walk {
        node = match descend(node, segment) {
            Some(next) => next,
            None => return,
        };
    }

    match last {
        PathSegment::Field(key) => {
            if let Value::Object(map) = node {
                map.insert(key.clone(), value);
            }
        }
        // A trailing filter replaces the matched element wholesale.
        PathSegment::Filter {
            array,
            key,
            value: want,
        } => {
            if let Some(Value::Array(items)) = node.get_mut(array) {
                if let Some(slot) = items.iter_mut().find(|el| filter_matches(el, key, want)) {
                    *slot = value;
                }
            }
        }
    }
}

/// Walk one segment down from `node`.
///
/// Plain fields create a missing entry as an empty object but refuse to
/// replace an existing non-object value. Filters never create anything.
fn descend<'a>(node: &'a mut Value, segment: &PathSegment) -> Option<&'a mut Value> {
    match segment {
        PathSegment::Field(key) => {
            let map = node.as_object_mut()?;
            let entry = map
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            entry.is_object().then_some(entry)
        }
        PathSegment::Filter { array, key, value } => match node.get_mut(array) {
            Some(Value::Array(items)) => {
                items.iter_mut().find(|el| filter_matches(el, key, value))
            }
            _ => None,
        },
    }
}

fn filter_matches(element: &Value, key: &str, want: &str) -> bool {
    element.get(key).and_then(Value::as_str) == Some(want)
}
