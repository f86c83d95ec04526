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

//! Selecting the change-history record that answers "what configuration was
//! in effect at time t".
//!
//! The history feed is newest-first, and each entry's `old` snapshot is the
//! state *before* that entry's change. So the state in effect after a change
//! is recorded as the `old` snapshot of the next-newer entry — and when the
//! matched change is the newest one, only the live configuration reflects
//! it. This module does the pure selection; fetching lives with the caller.

use chrono::{DateTime, Utc};

use crate::history::ChangeHistoryEntry;

/// Where the effective configuration must be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySource {
    /// The `old` snapshot of the entry at this index (the entry immediately
    /// newer than the matched change).
    Neighbor(usize),
    /// The matched change is the newest entry; fetch the live configuration.
    Current,
}

/// Result of boundary selection over a newest-first history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundarySelection {
    /// Index of the matched change. Metadata derives from this entry.
    pub boundary: usize,
    /// Where to read the configuration document itself.
    pub source: BoundarySource,
}

/// Find the latest change applied at or before `at`.
///
/// Returns `None` when `at` predates every recorded change (including the
/// empty-history case): no configuration is known for that time.
pub fn select_boundary(
    history: &[ChangeHistoryEntry],
    at: DateTime<Utc>,
) -> Option<BoundarySelection> {
    let boundary = history.iter().position(|entry| entry.when <= at)?;

    let source = if boundary == 0 {
        BoundarySource::Current
    } else {
        BoundarySource::Neighbor(boundary - 1)
    };

    Some(BoundarySelection { boundary, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(when: DateTime<Utc>) -> ChangeHistoryEntry {
        ChangeHistoryEntry {
            when,
            robot: None,
            edited_by: None,
            old: None,
        }
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    /// Newest-first: t3 > t2 > t1.
    fn three_changes() -> Vec<ChangeHistoryEntry> {
        vec![entry(ts(3000)), entry(ts(2000)), entry(ts(1000))]
    }

    #[test]
    fn at_or_after_newest_change_needs_the_live_config() {
        let history = three_changes();

        for at in [ts(3000), ts(4500)] {
            let selection = select_boundary(&history, at).unwrap();
            assert_eq!(selection.boundary, 0);
            assert_eq!(selection.source, BoundarySource::Current);
        }
    }

    #[test]
    fn interior_timestamp_reads_the_newer_neighbor_snapshot() {
        let history = three_changes();

        // Between t2 and t3: the change at t2 is in effect, and the state
        // after it is the snapshot stored on the t3 entry.
        let selection = select_boundary(&history, ts(2500)).unwrap();
        assert_eq!(selection.boundary, 1);
        assert_eq!(selection.source, BoundarySource::Neighbor(0));

        // Exactly at t2 behaves the same.
        let selection = select_boundary(&history, ts(2000)).unwrap();
        assert_eq!(selection.boundary, 1);
        assert_eq!(selection.source, BoundarySource::Neighbor(0));
    }

    #[test]
    fn oldest_change_reads_its_newer_neighbor() {
        let history = three_changes();

        let selection = select_boundary(&history, ts(1500)).unwrap();
        assert_eq!(selection.boundary, 2);
        assert_eq!(selection.source, BoundarySource::Neighbor(1));
    }

    #[test]
    fn timestamp_before_all_history_selects_nothing() {
        assert!(select_boundary(&three_changes(), ts(500)).is_none());
    }

    #[test]
    fn empty_history_selects_nothing() {
        assert!(select_boundary(&[], ts(1000)).is_none());
    }

    #[test]
    fn identical_timestamps_resolve_to_the_first_listed() {
        let history = vec![entry(ts(2000)), entry(ts(2000)), entry(ts(1000))];
        let selection = select_boundary(&history, ts(2000)).unwrap();
        assert_eq!(selection.boundary, 0);
        assert_eq!(selection.source, BoundarySource::Current);
    }
}
