//! Set arithmetic for many-to-many `sync`.
//!
//! A sync replaces an entity's whole relation set. Only the difference
//! between the current and desired sets is written: unchanged links are not
//! touched.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::EntityId;

/// Links added and removed by a sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncChanges {
    pub attached: Vec<EntityId>,
    pub detached: Vec<EntityId>,
}

impl SyncChanges {
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty()
    }
}

/// Compute the changes needed to turn `current` into `desired`.
///
/// Duplicates in either input are ignored. Output ids are sorted.
pub fn diff(current: &[EntityId], desired: &[EntityId]) -> SyncChanges {
    let current: BTreeSet<EntityId> = current.iter().copied().collect();
    let desired: BTreeSet<EntityId> = desired.iter().copied().collect();

    SyncChanges {
        attached: desired.difference(&current).copied().collect(),
        detached: current.difference(&desired).copied().collect(),
    }
}

/// Ids in `requested` that are absent from `known`, deduplicated and sorted.
pub fn missing_ids(requested: &[EntityId], known: &[EntityId]) -> Vec<EntityId> {
    let known: BTreeSet<EntityId> = known.iter().copied().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !known.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<EntityId> {
        let mut v: Vec<EntityId> = (0..n).map(|_| EntityId::now_v7()).collect();
        v.sort();
        v
    }

    #[test]
    fn replacing_set_attaches_and_detaches() {
        let v = ids(3);
        let (a, b, c) = (v[0], v[1], v[2]);

        let changes = diff(&[a, b], &[b, c]);
        assert_eq!(changes.attached, vec![c]);
        assert_eq!(changes.detached, vec![a]);
    }

    #[test]
    fn identical_sets_produce_no_changes() {
        let v = ids(2);
        assert!(diff(&v, &[v[1], v[0]]).is_empty());
    }

    #[test]
    fn empty_desired_detaches_everything() {
        let v = ids(2);
        let changes = diff(&v, &[]);
        assert!(changes.attached.is_empty());
        assert_eq!(changes.detached, v);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let v = ids(1);
        let changes = diff(&[], &[v[0], v[0]]);
        assert_eq!(changes.attached, vec![v[0]]);
    }

    #[test]
    fn missing_ids_reports_unknown_only() {
        let v = ids(3);
        assert_eq!(missing_ids(&[v[0], v[2], v[2]], &[v[0], v[1]]), vec![v[2]]);
        assert!(missing_ids(&[v[1]], &v).is_empty());
    }
}
