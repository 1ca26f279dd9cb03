//! Authoritative collection of guides and guide groups.
//!
//! Every successful mutation builds a brand-new collection and swaps the
//! `Arc`, never editing in place. Consumers (renderer, snapping engine)
//! detect change with `Arc::ptr_eq` or the version counter instead of
//! deep comparison; that reference-inequality contract is load-bearing
//! and must survive refactoring.
//!
//! The public write path fails quiet: rejected mutations return
//! `None`/`false` and mutate nothing. The `try_*` variants expose the
//! reason for callers that want diagnostics.

use std::sync::Arc;

use guidekit_core::config::ConstructionConfig;
use guidekit_core::constants::MIN_DISTANCE;
use guidekit_core::error::GuideError;
use guidekit_core::geometry::{self, Point};
use guidekit_core::notify::{ChangeNotifier, SubscriptionId};

use crate::guide::{Axis, Guide, GuideGroup, Orientation};

/// Change notification payload published after every successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum GuideStoreEvent {
    /// A single guide was added.
    GuideAdded { id: u64, version: u64 },
    /// A single guide was removed.
    GuideRemoved { id: u64, version: u64 },
    /// A single guide changed (moved, rotated, restored, regrouped).
    GuideModified { id: u64, version: u64 },
    /// Several guides changed in one atomic mutation.
    GuidesModified { ids: Vec<u64>, version: u64 },
    /// A group was added, removed, or had flags changed.
    GroupChanged { id: u64, version: u64 },
    /// All guides were removed.
    Cleared { version: u64 },
}

/// Guide and guide-group store.
pub struct GuideStore {
    guides: Arc<Vec<Guide>>,
    groups: Arc<Vec<GuideGroup>>,
    config: ConstructionConfig,
    next_id: u64,
    version: u64,
    notifier: ChangeNotifier<GuideStoreEvent>,
}

impl GuideStore {
    /// Creates an empty store with default limits.
    pub fn new() -> Self {
        Self::with_config(ConstructionConfig::default())
    }

    /// Creates an empty store with explicit limits.
    pub fn with_config(config: ConstructionConfig) -> Self {
        Self {
            guides: Arc::new(Vec::new()),
            groups: Arc::new(Vec::new()),
            config,
            next_id: 0,
            version: 0,
            notifier: ChangeNotifier::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ConstructionConfig {
        &self.config
    }

    /// Current snapshot of all guides, in insertion order.
    ///
    /// The returned `Arc` is replaced wholesale on every mutation, so two
    /// snapshots compare equal by pointer exactly when nothing changed.
    pub fn guides(&self) -> Arc<Vec<Guide>> {
        Arc::clone(&self.guides)
    }

    /// Current snapshot of all groups.
    pub fn groups(&self) -> Arc<Vec<GuideGroup>> {
        Arc::clone(&self.groups)
    }

    /// Monotonic counter bumped on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.guides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }

    /// Looks up a guide by id.
    pub fn get_guide(&self, id: u64) -> Option<&Guide> {
        self.guides.iter().find(|g| g.id == id)
    }

    /// Looks up a group by id.
    pub fn get_group(&self, id: u64) -> Option<&GuideGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Generates the next unique entity id.
    pub fn generate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Subscribes to change notifications.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&GuideStoreEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(handler)
    }

    /// Removes a subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    fn bump_and_notify(&mut self, event_for: impl FnOnce(u64) -> GuideStoreEvent) {
        self.version += 1;
        let event = event_for(self.version);
        self.notifier.notify(&event);
    }

    /// Finds an existing guide whose offset on `orientation` sits closer
    /// than the configured minimum separation.
    fn offset_conflict(
        &self,
        orientation: Orientation,
        offset: f64,
        exclude_id: Option<u64>,
    ) -> Option<u64> {
        self.guides
            .iter()
            .filter(|g| Some(g.id) != exclude_id)
            .filter(|g| g.axis.orientation() == Some(orientation))
            .find(|g| {
                let existing = g.axis.offset().unwrap_or(f64::INFINITY);
                (existing - offset).abs() < self.config.min_offset_delta
            })
            .map(|g| g.id)
    }

    /// Adds an infinite guide, validating capacity and offset uniqueness.
    pub fn try_add_guide_raw(
        &mut self,
        orientation: Orientation,
        offset: f64,
        label: Option<String>,
        parent_id: Option<u64>,
        group_id: Option<u64>,
    ) -> Result<Guide, GuideError> {
        if self.guides.len() >= self.config.max_guides {
            return Err(GuideError::CapacityExceeded {
                limit: self.config.max_guides,
            });
        }
        if let Some(existing_id) = self.offset_conflict(orientation, offset, None) {
            return Err(GuideError::DuplicateOffset {
                offset,
                existing_id,
                min_delta: self.config.min_offset_delta,
            });
        }

        let id = self.generate_id();
        let guide = Guide {
            label,
            parent_id,
            group_id,
            ..Guide::new(id, Axis::from_orientation(orientation, offset))
        };

        let mut guides = self.guides.as_ref().clone();
        guides.push(guide.clone());
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuideAdded { id, version });
        tracing::debug!(id, offset, "guide added");
        Ok(guide)
    }

    /// Fail-quiet wrapper around [`Self::try_add_guide_raw`].
    pub fn add_guide_raw(
        &mut self,
        orientation: Orientation,
        offset: f64,
        label: Option<String>,
        parent_id: Option<u64>,
        group_id: Option<u64>,
    ) -> Option<Guide> {
        match self.try_add_guide_raw(orientation, offset, label, parent_id, group_id) {
            Ok(guide) => Some(guide),
            Err(err) => {
                tracing::warn!(%err, "guide creation rejected");
                None
            }
        }
    }

    /// Adds a finite diagonal guide. Zero-length segments are rejected.
    pub fn add_diagonal_guide_raw(
        &mut self,
        start: Point,
        end: Point,
        label: Option<String>,
        parent_id: Option<u64>,
    ) -> Option<Guide> {
        if self.guides.len() >= self.config.max_guides {
            tracing::warn!(limit = self.config.max_guides, "guide limit reached");
            return None;
        }
        if start.distance_to(&end) < MIN_DISTANCE {
            tracing::warn!("diagonal guide rejected: zero-length segment");
            return None;
        }

        let id = self.generate_id();
        let guide = Guide {
            label,
            parent_id,
            ..Guide::new(id, Axis::Diagonal { start, end })
        };

        let mut guides = self.guides.as_ref().clone();
        guides.push(guide.clone());
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuideAdded { id, version });
        tracing::debug!(id, "diagonal guide added");
        Some(guide)
    }

    /// Removes a guide, validating it exists and is unlocked.
    pub fn try_remove_guide_by_id(&mut self, id: u64) -> Result<Guide, GuideError> {
        let index = self
            .guides
            .iter()
            .position(|g| g.id == id)
            .ok_or(GuideError::NotFound { id })?;
        if self.guides[index].locked {
            return Err(GuideError::Locked { id });
        }

        let mut guides = self.guides.as_ref().clone();
        let removed = guides.remove(index);
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuideRemoved { id, version });
        Ok(removed)
    }

    /// Fail-quiet wrapper around [`Self::try_remove_guide_by_id`].
    pub fn remove_guide_by_id(&mut self, id: u64) -> Option<Guide> {
        match self.try_remove_guide_by_id(id) {
            Ok(removed) => Some(removed),
            Err(err) => {
                tracing::warn!(%err, "guide removal rejected");
                None
            }
        }
    }

    /// Moves an infinite guide to a new offset.
    ///
    /// Fails on locked/missing guides, on diagonals, and when the new
    /// offset would collide with another guide on the same orientation.
    pub fn try_move_guide_by_id(&mut self, id: u64, new_offset: f64) -> Result<(), GuideError> {
        let index = self
            .guides
            .iter()
            .position(|g| g.id == id)
            .ok_or(GuideError::NotFound { id })?;
        let guide = &self.guides[index];
        if guide.locked {
            return Err(GuideError::Locked { id });
        }
        let orientation = guide
            .axis
            .orientation()
            .ok_or(GuideError::AxisMismatch { id })?;
        if let Some(existing_id) = self.offset_conflict(orientation, new_offset, Some(id)) {
            return Err(GuideError::DuplicateOffset {
                offset: new_offset,
                existing_id,
                min_delta: self.config.min_offset_delta,
            });
        }

        let mut guides = self.guides.as_ref().clone();
        guides[index].axis = Axis::from_orientation(orientation, new_offset);
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuideModified { id, version });
        Ok(())
    }

    /// Fail-quiet wrapper around [`Self::try_move_guide_by_id`].
    pub fn move_guide_by_id(&mut self, id: u64, new_offset: f64) -> bool {
        match self.try_move_guide_by_id(id, new_offset) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "guide move rejected");
                false
            }
        }
    }

    /// Moves both endpoints of a diagonal guide. Fails quiet on locked,
    /// missing, or non-diagonal targets and on degenerate endpoints.
    pub fn move_diagonal_guide_by_id(&mut self, id: u64, start: Point, end: Point) -> bool {
        let Some(index) = self.guides.iter().position(|g| g.id == id) else {
            tracing::warn!(id, "move rejected: guide not found");
            return false;
        };
        let guide = &self.guides[index];
        if guide.locked {
            tracing::warn!(id, "move rejected: guide is locked");
            return false;
        }
        if !guide.axis.is_diagonal() {
            tracing::warn!(id, "move rejected: guide is not diagonal");
            return false;
        }
        if start.distance_to(&end) < MIN_DISTANCE {
            tracing::warn!(id, "move rejected: zero-length segment");
            return false;
        }

        let mut guides = self.guides.as_ref().clone();
        guides[index].axis = Axis::Diagonal { start, end };
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuideModified { id, version });
        true
    }

    /// Converts any guide into a diagonal guide with the given endpoints,
    /// preserving id, label, style, flags, timestamps, and references.
    ///
    /// Returns the complete pre-replacement snapshot (the undo anchor),
    /// or `None` when the guide is locked, missing, or the endpoints are
    /// degenerate.
    pub fn replace_guide_with_rotated(
        &mut self,
        id: u64,
        new_start: Point,
        new_end: Point,
    ) -> Option<Guide> {
        let index = self.guides.iter().position(|g| g.id == id)?;
        if self.guides[index].locked {
            tracing::warn!(id, "rotation rejected: guide is locked");
            return None;
        }
        if new_start.distance_to(&new_end) < MIN_DISTANCE {
            tracing::warn!(id, "rotation rejected: zero-length segment");
            return None;
        }

        let mut guides = self.guides.as_ref().clone();
        let snapshot = guides[index].clone();
        guides[index].axis = Axis::Diagonal {
            start: new_start,
            end: new_end,
        };
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuideModified { id, version });
        Some(snapshot)
    }

    /// Reinstates an exact prior state of a guide that still exists.
    ///
    /// No-op returning `false` when the id is gone; deleted guides come
    /// back through [`Self::reinsert_guide`].
    pub fn restore_guide_snapshot(&mut self, snapshot: Guide) -> bool {
        let id = snapshot.id;
        let Some(index) = self.guides.iter().position(|g| g.id == id) else {
            return false;
        };

        let mut guides = self.guides.as_ref().clone();
        guides[index] = snapshot;
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuideModified { id, version });
        true
    }

    /// Reinserts a previously removed guide under its original id.
    ///
    /// Used by undo of delete and redo of create; skips offset/capacity
    /// validation because the snapshot was valid when captured. Fails only
    /// if the id is already present.
    pub fn reinsert_guide(&mut self, snapshot: Guide) -> bool {
        let id = snapshot.id;
        if self.get_guide(id).is_some() {
            return false;
        }

        self.next_id = self.next_id.max(id);
        let mut guides = self.guides.as_ref().clone();
        guides.push(snapshot);
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuideAdded { id, version });
        true
    }

    /// Applies a set of axis replacements atomically.
    ///
    /// All-or-nothing: every target must exist and be unlocked, diagonal
    /// targets must be non-degenerate, and the resulting offsets must stay
    /// pairwise separated. One version bump, one notification.
    pub fn apply_axes_bulk(&mut self, updates: &[(u64, Axis)]) -> bool {
        if updates.is_empty() {
            return false;
        }

        let mut guides = self.guides.as_ref().clone();
        for (id, axis) in updates {
            let Some(g) = guides.iter_mut().find(|g| g.id == *id) else {
                tracing::warn!(id, "bulk update rejected: guide not found");
                return false;
            };
            if g.locked {
                tracing::warn!(id, "bulk update rejected: guide is locked");
                return false;
            }
            if let Axis::Diagonal { start, end } = axis {
                if start.distance_to(end) < MIN_DISTANCE {
                    tracing::warn!(id, "bulk update rejected: zero-length segment");
                    return false;
                }
            }
            g.axis = axis.clone();
        }

        // Validate the final offset spacing across the whole collection.
        for (i, a) in guides.iter().enumerate() {
            let (Some(orientation), Some(offset)) = (a.axis.orientation(), a.axis.offset()) else {
                continue;
            };
            for b in guides.iter().skip(i + 1) {
                if b.axis.orientation() == Some(orientation) {
                    let other = b.axis.offset().unwrap_or(f64::INFINITY);
                    if (other - offset).abs() < self.config.min_offset_delta {
                        tracing::warn!(a.id, b.id, "bulk update rejected: duplicate offsets");
                        return false;
                    }
                }
            }
        }

        let ids: Vec<u64> = updates.iter().map(|(id, _)| *id).collect();
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuidesModified { ids, version });
        true
    }

    /// Restores a set of full guide snapshots atomically (bulk undo).
    ///
    /// Snapshots whose id vanished are skipped, matching the single-guide
    /// restore semantics.
    pub fn restore_guides_bulk(&mut self, snapshots: &[Guide]) -> bool {
        if snapshots.is_empty() {
            return false;
        }

        let mut guides = self.guides.as_ref().clone();
        let mut restored = Vec::new();
        for snapshot in snapshots {
            if let Some(slot) = guides.iter_mut().find(|g| g.id == snapshot.id) {
                *slot = snapshot.clone();
                restored.push(snapshot.id);
            }
        }
        if restored.is_empty() {
            return false;
        }

        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuidesModified {
            ids: restored,
            version,
        });
        true
    }

    /// Removes every guide. Locked guides are removed too; this is the
    /// bulk reset the tool exposes behind a confirmation.
    pub fn clear(&mut self) {
        if self.guides.is_empty() {
            return;
        }
        self.guides = Arc::new(Vec::new());
        self.bump_and_notify(|version| GuideStoreEvent::Cleared { version });
    }

    // Group operations

    /// Creates a new group.
    pub fn add_group(&mut self, name: impl Into<String>) -> GuideGroup {
        let id = self.generate_id();
        let group = GuideGroup::new(id, name);
        let mut groups = self.groups.as_ref().clone();
        groups.push(group.clone());
        self.groups = Arc::new(groups);
        self.bump_and_notify(|version| GuideStoreEvent::GroupChanged { id, version });
        group
    }

    /// Removes a group, ungrouping (not deleting) its members.
    pub fn remove_group(&mut self, id: u64) -> Option<GuideGroup> {
        let index = self.groups.iter().position(|g| g.id == id)?;

        let mut groups = self.groups.as_ref().clone();
        let removed = groups.remove(index);
        let mut guides = self.guides.as_ref().clone();
        for g in guides.iter_mut().filter(|g| g.group_id == Some(id)) {
            g.group_id = None;
        }
        self.groups = Arc::new(groups);
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GroupChanged { id, version });
        Some(removed)
    }

    /// Removes a group and deletes its members. Locked members survive,
    /// ungrouped.
    pub fn remove_group_with_members(&mut self, id: u64) -> Option<GuideGroup> {
        let index = self.groups.iter().position(|g| g.id == id)?;

        let mut groups = self.groups.as_ref().clone();
        let removed = groups.remove(index);
        let mut guides = self.guides.as_ref().clone();
        guides.retain(|g| g.group_id != Some(id) || g.locked);
        for g in guides.iter_mut().filter(|g| g.group_id == Some(id)) {
            g.group_id = None;
        }
        self.groups = Arc::new(groups);
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GroupChanged { id, version });
        Some(removed)
    }

    /// Locks or unlocks a group, cascading to its members.
    pub fn set_group_locked(&mut self, id: u64, locked: bool) -> bool {
        let Some(index) = self.groups.iter().position(|g| g.id == id) else {
            return false;
        };

        let mut groups = self.groups.as_ref().clone();
        groups[index].locked = locked;
        let mut guides = self.guides.as_ref().clone();
        for g in guides.iter_mut().filter(|g| g.group_id == Some(id)) {
            g.locked = locked;
        }
        self.groups = Arc::new(groups);
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GroupChanged { id, version });
        true
    }

    /// Shows or hides a group, cascading to its members.
    pub fn set_group_visible(&mut self, id: u64, visible: bool) -> bool {
        let Some(index) = self.groups.iter().position(|g| g.id == id) else {
            return false;
        };

        let mut groups = self.groups.as_ref().clone();
        groups[index].visible = visible;
        let mut guides = self.guides.as_ref().clone();
        for g in guides.iter_mut().filter(|g| g.group_id == Some(id)) {
            g.visible = visible;
        }
        self.groups = Arc::new(groups);
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GroupChanged { id, version });
        true
    }

    /// Assigns or clears a guide's group membership.
    pub fn set_guide_group_id(&mut self, guide_id: u64, group_id: Option<u64>) -> bool {
        let Some(index) = self.guides.iter().position(|g| g.id == guide_id) else {
            return false;
        };
        if let Some(gid) = group_id {
            if self.get_group(gid).is_none() {
                tracing::warn!(gid, "group assignment rejected: group not found");
                return false;
            }
        }

        let mut guides = self.guides.as_ref().clone();
        guides[index].group_id = group_id;
        self.guides = Arc::new(guides);
        self.bump_and_notify(|version| GuideStoreEvent::GuideModified {
            id: guide_id,
            version,
        });
        true
    }

    /// Finds the closest visible guide within `max_distance` of a point.
    ///
    /// Distance is the perpendicular offset distance for infinite guides
    /// and point-to-segment distance for diagonals. Guides hidden by their
    /// own flag or a hidden group never match.
    pub fn find_nearest_guide(&self, x: f64, y: f64, max_distance: f64) -> Option<(Guide, f64)> {
        let probe = Point::new(x, y);
        let mut best: Option<(&Guide, f64)> = None;

        for guide in self.guides.iter() {
            if !self.is_guide_visible(guide) {
                continue;
            }
            let distance = match &guide.axis {
                Axis::Vertical { offset } => (x - offset).abs(),
                Axis::Horizontal { offset } => (y - offset).abs(),
                Axis::Diagonal { start, end } => {
                    geometry::point_to_segment_distance(probe, *start, *end)
                }
            };
            if distance <= max_distance && best.map_or(true, |(_, d)| distance < d) {
                best = Some((guide, distance));
            }
        }

        best.map(|(g, d)| (g.clone(), d))
    }

    fn is_guide_visible(&self, guide: &Guide) -> bool {
        if !guide.visible {
            return false;
        }
        match guide.group_id {
            Some(gid) => self.get_group(gid).map(|g| g.visible).unwrap_or(true),
            None => true,
        }
    }
}

impl Default for GuideStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get_guide() {
        let mut store = GuideStore::new();
        let guide = store
            .add_guide_raw(Orientation::Vertical, 5.0, None, None, None)
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_guide(guide.id).unwrap().axis.offset(), Some(5.0));
    }

    #[test]
    fn test_duplicate_offset_rejected() {
        let mut store = GuideStore::new();
        store
            .add_guide_raw(Orientation::Vertical, 5.0, None, None, None)
            .unwrap();
        assert!(store
            .add_guide_raw(Orientation::Vertical, 5.0005, None, None, None)
            .is_none());
        // Same offset on the other orientation is fine.
        assert!(store
            .add_guide_raw(Orientation::Horizontal, 5.0, None, None, None)
            .is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_try_add_reports_duplicate() {
        let mut store = GuideStore::new();
        let first = store
            .add_guide_raw(Orientation::Horizontal, 1.0, None, None, None)
            .unwrap();
        let err = store
            .try_add_guide_raw(Orientation::Horizontal, 1.0002, None, None, None)
            .unwrap_err();
        assert_eq!(
            err,
            GuideError::DuplicateOffset {
                offset: 1.0002,
                existing_id: first.id,
                min_delta: store.config().min_offset_delta,
            }
        );
    }

    #[test]
    fn test_capacity_limit() {
        let mut store = GuideStore::with_config(ConstructionConfig {
            max_guides: 2,
            ..Default::default()
        });
        assert!(store
            .add_guide_raw(Orientation::Vertical, 0.0, None, None, None)
            .is_some());
        assert!(store
            .add_guide_raw(Orientation::Vertical, 10.0, None, None, None)
            .is_some());
        assert!(store
            .add_guide_raw(Orientation::Vertical, 20.0, None, None, None)
            .is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_zero_length_diagonal_rejected() {
        let mut store = GuideStore::new();
        let p = Point::new(3.0, 3.0);
        assert!(store.add_diagonal_guide_raw(p, p, None, None).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_locked_guide_cannot_be_removed_or_moved() {
        let mut store = GuideStore::new();
        let guide = store
            .add_guide_raw(Orientation::Vertical, 5.0, None, None, None)
            .unwrap();
        let id = guide.id;

        let mut snapshot = store.get_guide(id).unwrap().clone();
        snapshot.locked = true;
        assert!(store.restore_guide_snapshot(snapshot));

        assert!(store.remove_guide_by_id(id).is_none());
        assert!(!store.move_guide_by_id(id, 9.0));
        assert!(store
            .replace_guide_with_rotated(id, Point::new(0.0, 0.0), Point::new(1.0, 1.0))
            .is_none());
        assert_eq!(store.get_guide(id).unwrap().axis.offset(), Some(5.0));
    }

    #[test]
    fn test_snapshot_replaced_on_mutation() {
        let mut store = GuideStore::new();
        let before = store.guides();
        store
            .add_guide_raw(Orientation::Vertical, 5.0, None, None, None)
            .unwrap();
        let after = store.guides();
        assert!(!Arc::ptr_eq(&before, &after));
        // Reads without mutation share the same snapshot.
        assert!(Arc::ptr_eq(&after, &store.guides()));
    }

    #[test]
    fn test_version_bumps_and_observer_fires() {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::sync::Arc as StdArc;

        let mut store = GuideStore::new();
        let seen = StdArc::new(AtomicU64::new(0));
        let seen_clone = seen.clone();
        store.subscribe(move |event| {
            let version = match event {
                GuideStoreEvent::GuideAdded { version, .. }
                | GuideStoreEvent::GuideRemoved { version, .. }
                | GuideStoreEvent::GuideModified { version, .. }
                | GuideStoreEvent::GuidesModified { version, .. }
                | GuideStoreEvent::GroupChanged { version, .. }
                | GuideStoreEvent::Cleared { version } => *version,
            };
            seen_clone.store(version, Ordering::SeqCst);
        });

        store
            .add_guide_raw(Orientation::Vertical, 5.0, None, None, None)
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), store.version());
        assert_eq!(store.version(), 1);

        // Rejected mutations bump nothing.
        store.add_guide_raw(Orientation::Vertical, 5.0, None, None, None);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_replace_with_rotated_preserves_metadata() {
        let mut store = GuideStore::new();
        let guide = store
            .add_guide_raw(
                Orientation::Vertical,
                5.0,
                Some("margin".to_string()),
                None,
                None,
            )
            .unwrap();

        let snapshot = store
            .replace_guide_with_rotated(guide.id, Point::new(0.0, 0.0), Point::new(10.0, 10.0))
            .unwrap();
        assert_eq!(snapshot.axis.offset(), Some(5.0));

        let rotated = store.get_guide(guide.id).unwrap();
        assert!(rotated.axis.is_diagonal());
        assert_eq!(rotated.label.as_deref(), Some("margin"));
        assert_eq!(rotated.created_at, snapshot.created_at);

        // Undo path: the snapshot restores the original orientation.
        assert!(store.restore_guide_snapshot(snapshot));
        assert_eq!(store.get_guide(guide.id).unwrap().axis.offset(), Some(5.0));
    }

    #[test]
    fn test_group_cascades() {
        let mut store = GuideStore::new();
        let group = store.add_group("layout");
        let a = store
            .add_guide_raw(Orientation::Vertical, 0.0, None, None, Some(group.id))
            .unwrap();
        let b = store
            .add_guide_raw(Orientation::Vertical, 10.0, None, None, Some(group.id))
            .unwrap();

        assert!(store.set_group_visible(group.id, false));
        assert!(!store.get_guide(a.id).unwrap().visible);
        assert!(store.find_nearest_guide(0.0, 50.0, 1.0).is_none());

        assert!(store.set_group_locked(group.id, true));
        assert!(!store.move_guide_by_id(b.id, 20.0));

        assert!(store.set_group_locked(group.id, false));
        store.remove_group(group.id);
        assert!(store.get_guide(a.id).unwrap().group_id.is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_group_with_members_skips_locked() {
        let mut store = GuideStore::new();
        let group = store.add_group("layout");
        let a = store
            .add_guide_raw(Orientation::Vertical, 0.0, None, None, Some(group.id))
            .unwrap();
        let b = store
            .add_guide_raw(Orientation::Vertical, 10.0, None, None, Some(group.id))
            .unwrap();

        let mut locked = store.get_guide(b.id).unwrap().clone();
        locked.locked = true;
        store.restore_guide_snapshot(locked);

        store.remove_group_with_members(group.id);
        assert!(store.get_guide(a.id).is_none());
        let survivor = store.get_guide(b.id).unwrap();
        assert!(survivor.group_id.is_none());
    }

    #[test]
    fn test_find_nearest_guide_prefers_closest() {
        let mut store = GuideStore::new();
        store
            .add_guide_raw(Orientation::Vertical, 0.0, None, None, None)
            .unwrap();
        let near = store
            .add_guide_raw(Orientation::Vertical, 4.0, None, None, None)
            .unwrap();
        store
            .add_diagonal_guide_raw(Point::new(-50.0, 30.0), Point::new(50.0, 30.0), None, None)
            .unwrap();

        let (hit, distance) = store.find_nearest_guide(5.0, 0.0, 10.0).unwrap();
        assert_eq!(hit.id, near.id);
        assert!((distance - 1.0).abs() < 1e-9);

        assert!(store.find_nearest_guide(500.0, 500.0, 10.0).is_none());
    }

    #[test]
    fn test_apply_axes_bulk_is_atomic() {
        let mut store = GuideStore::new();
        let a = store
            .add_guide_raw(Orientation::Vertical, 0.0, None, None, None)
            .unwrap();
        let b = store
            .add_guide_raw(Orientation::Vertical, 3.0, None, None, None)
            .unwrap();
        store
            .add_guide_raw(Orientation::Vertical, 10.0, None, None, None)
            .unwrap();
        let version = store.version();

        // Second update collides with the guide at offset 10: nothing moves.
        let rejected = store.apply_axes_bulk(&[
            (a.id, Axis::Vertical { offset: 1.0 }),
            (b.id, Axis::Vertical { offset: 10.0 }),
        ]);
        assert!(!rejected);
        assert_eq!(store.version(), version);
        assert_eq!(store.get_guide(a.id).unwrap().axis.offset(), Some(0.0));

        assert!(store.apply_axes_bulk(&[
            (a.id, Axis::Vertical { offset: 1.0 }),
            (b.id, Axis::Vertical { offset: 5.0 }),
        ]));
        assert_eq!(store.version(), version + 1);
        assert_eq!(store.get_guide(b.id).unwrap().axis.offset(), Some(5.0));
    }

    #[test]
    fn test_try_variants_report_reason() {
        let mut store = GuideStore::new();
        assert_eq!(
            store.try_remove_guide_by_id(99),
            Err(GuideError::NotFound { id: 99 })
        );

        let guide = store
            .add_guide_raw(Orientation::Vertical, 5.0, None, None, None)
            .unwrap();
        let diagonal = store
            .add_diagonal_guide_raw(Point::new(0.0, 0.0), Point::new(1.0, 1.0), None, None)
            .unwrap();
        assert_eq!(
            store.try_move_guide_by_id(diagonal.id, 3.0),
            Err(GuideError::AxisMismatch { id: diagonal.id })
        );

        let mut locked = store.get_guide(guide.id).unwrap().clone();
        locked.locked = true;
        store.restore_guide_snapshot(locked);
        assert_eq!(
            store.try_move_guide_by_id(guide.id, 3.0),
            Err(GuideError::Locked { id: guide.id })
        );
        assert_eq!(
            store.try_remove_guide_by_id(guide.id),
            Err(GuideError::Locked { id: guide.id })
        );
    }

    #[test]
    fn test_reinsert_preserves_id_and_advances_id_counter() {
        let mut store = GuideStore::new();
        let guide = store
            .add_guide_raw(Orientation::Horizontal, 7.0, None, None, None)
            .unwrap();
        let removed = store.remove_guide_by_id(guide.id).unwrap();

        assert!(store.reinsert_guide(removed.clone()));
        assert!(!store.reinsert_guide(removed));
        let fresh = store
            .add_guide_raw(Orientation::Horizontal, 9.0, None, None, None)
            .unwrap();
        assert_ne!(fresh.id, guide.id);
    }
}
