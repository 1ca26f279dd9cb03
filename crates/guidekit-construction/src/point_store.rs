//! Store for the snap points produced by construction commands.
//!
//! Mirrors the guide store's contract: snapshot-on-mutation via `Arc`
//! swap, a monotonic version counter, synchronous notification, and a
//! fail-quiet public write path. Batch ids tie the points placed by one
//! command together so the whole placement undoes as a unit.

use std::sync::Arc;

use guidekit_core::config::ConstructionConfig;
use guidekit_core::error::PointError;
use guidekit_core::geometry::Point;
use guidekit_core::notify::{ChangeNotifier, SubscriptionId};

use crate::guide::ConstructionPoint;

/// Change notification payload for the point store.
#[derive(Debug, Clone, PartialEq)]
pub enum PointStoreEvent {
    PointAdded { id: u64, version: u64 },
    PointRemoved { id: u64, version: u64 },
    PointModified { id: u64, version: u64 },
    BatchAdded { batch_id: u64, count: usize, version: u64 },
    BatchRemoved { batch_id: u64, count: usize, version: u64 },
    PointsRestored { count: usize, version: u64 },
    Cleared { version: u64 },
}

/// Construction-point store.
pub struct PointStore {
    points: Arc<Vec<ConstructionPoint>>,
    config: ConstructionConfig,
    next_id: u64,
    next_batch_id: u64,
    version: u64,
    notifier: ChangeNotifier<PointStoreEvent>,
}

impl PointStore {
    pub fn new() -> Self {
        Self::with_config(ConstructionConfig::default())
    }

    pub fn with_config(config: ConstructionConfig) -> Self {
        Self {
            points: Arc::new(Vec::new()),
            config,
            next_id: 0,
            next_batch_id: 0,
            version: 0,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn config(&self) -> &ConstructionConfig {
        &self.config
    }

    /// Current snapshot of all points, replaced wholesale on mutation.
    pub fn points(&self) -> Arc<Vec<ConstructionPoint>> {
        Arc::clone(&self.points)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get_point(&self, id: u64) -> Option<&ConstructionPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// All points placed under one batch, in insertion order.
    pub fn points_by_batch(&self, batch_id: u64) -> Vec<ConstructionPoint> {
        self.points
            .iter()
            .filter(|p| p.batch_id == Some(batch_id))
            .cloned()
            .collect()
    }

    pub fn generate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Generates the batch id shared by one command's points.
    pub fn generate_batch_id(&mut self) -> u64 {
        self.next_batch_id += 1;
        self.next_batch_id
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&PointStoreEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    fn bump_and_notify(&mut self, event_for: impl FnOnce(u64) -> PointStoreEvent) {
        self.version += 1;
        let event = event_for(self.version);
        self.notifier.notify(&event);
    }

    /// Adds a single point, enforcing the capacity limit.
    pub fn try_add_point(
        &mut self,
        point: Point,
        label: Option<String>,
        batch_id: Option<u64>,
    ) -> Result<ConstructionPoint, PointError> {
        if self.points.len() >= self.config.max_points {
            return Err(PointError::CapacityExceeded {
                limit: self.config.max_points,
            });
        }

        let id = self.generate_id();
        let cp = ConstructionPoint {
            id,
            point,
            label,
            visible: true,
            batch_id,
        };
        let mut points = self.points.as_ref().clone();
        points.push(cp.clone());
        self.points = Arc::new(points);
        self.bump_and_notify(|version| PointStoreEvent::PointAdded { id, version });
        Ok(cp)
    }

    /// Fail-quiet wrapper around [`Self::try_add_point`].
    pub fn add_point(
        &mut self,
        point: Point,
        label: Option<String>,
        batch_id: Option<u64>,
    ) -> Option<ConstructionPoint> {
        match self.try_add_point(point, label, batch_id) {
            Ok(cp) => Some(cp),
            Err(err) => {
                tracing::warn!(%err, "point creation rejected");
                None
            }
        }
    }

    /// Adds a batch of points atomically under a fresh batch id.
    ///
    /// All-or-nothing: if the whole batch would push the store past its
    /// capacity, no point is added and `None` is returned. An empty input
    /// adds nothing.
    pub fn add_points_batch(
        &mut self,
        positions: &[Point],
        label: Option<&str>,
    ) -> Option<(u64, Vec<ConstructionPoint>)> {
        if positions.is_empty() {
            return None;
        }
        if self.points.len() + positions.len() > self.config.max_points {
            tracing::warn!(
                requested = positions.len(),
                limit = self.config.max_points,
                "point batch rejected: would exceed capacity"
            );
            return None;
        }

        let batch_id = self.generate_batch_id();
        let mut points = self.points.as_ref().clone();
        let mut added = Vec::with_capacity(positions.len());
        for position in positions {
            let cp = ConstructionPoint {
                id: self.generate_id(),
                point: *position,
                label: label.map(str::to_string),
                visible: true,
                batch_id: Some(batch_id),
            };
            points.push(cp.clone());
            added.push(cp);
        }
        self.points = Arc::new(points);
        let count = added.len();
        self.bump_and_notify(|version| PointStoreEvent::BatchAdded {
            batch_id,
            count,
            version,
        });
        tracing::debug!(batch_id, count, "point batch added");
        Some((batch_id, added))
    }

    /// Removes a point, returning its snapshot.
    pub fn try_remove_point_by_id(&mut self, id: u64) -> Result<ConstructionPoint, PointError> {
        let index = self
            .points
            .iter()
            .position(|p| p.id == id)
            .ok_or(PointError::NotFound { id })?;
        let mut points = self.points.as_ref().clone();
        let removed = points.remove(index);
        self.points = Arc::new(points);
        self.bump_and_notify(|version| PointStoreEvent::PointRemoved { id, version });
        Ok(removed)
    }

    /// Fail-quiet wrapper around [`Self::try_remove_point_by_id`].
    pub fn remove_point_by_id(&mut self, id: u64) -> Option<ConstructionPoint> {
        match self.try_remove_point_by_id(id) {
            Ok(removed) => Some(removed),
            Err(err) => {
                tracing::warn!(%err, "point removal rejected");
                None
            }
        }
    }

    /// Removes every point of a batch, returning the removed snapshots in
    /// insertion order.
    pub fn try_remove_points_by_batch(
        &mut self,
        batch_id: u64,
    ) -> Result<Vec<ConstructionPoint>, PointError> {
        let mut points = self.points.as_ref().clone();
        let mut removed = Vec::new();
        points.retain(|p| {
            if p.batch_id == Some(batch_id) {
                removed.push(p.clone());
                false
            } else {
                true
            }
        });
        if removed.is_empty() {
            return Err(PointError::BatchNotFound { batch_id });
        }

        self.points = Arc::new(points);
        let count = removed.len();
        self.bump_and_notify(|version| PointStoreEvent::BatchRemoved {
            batch_id,
            count,
            version,
        });
        Ok(removed)
    }

    /// Fail-quiet wrapper around [`Self::try_remove_points_by_batch`]:
    /// an empty result means the batch id matched nothing and nothing
    /// changed.
    pub fn remove_points_by_batch(&mut self, batch_id: u64) -> Vec<ConstructionPoint> {
        match self.try_remove_points_by_batch(batch_id) {
            Ok(removed) => removed,
            Err(err) => {
                tracing::debug!(%err, "batch removal matched nothing");
                Vec::new()
            }
        }
    }

    /// Reinstates a removed point under its original id and batch id.
    /// Fails if the id is already present.
    pub fn restore_point(&mut self, snapshot: ConstructionPoint) -> bool {
        let id = snapshot.id;
        if self.get_point(id).is_some() {
            return false;
        }

        self.next_id = self.next_id.max(id);
        if let Some(batch_id) = snapshot.batch_id {
            self.next_batch_id = self.next_batch_id.max(batch_id);
        }
        let mut points = self.points.as_ref().clone();
        points.push(snapshot);
        self.points = Arc::new(points);
        self.bump_and_notify(|version| PointStoreEvent::PointAdded { id, version });
        true
    }

    /// Reinstates a removed batch from its snapshots, one version bump.
    pub fn restore_points_batch(&mut self, snapshots: &[ConstructionPoint]) -> bool {
        if snapshots.is_empty() {
            return false;
        }
        if snapshots.iter().any(|s| self.get_point(s.id).is_some()) {
            return false;
        }

        let batch_id = snapshots[0].batch_id.unwrap_or(0);
        let mut points = self.points.as_ref().clone();
        for snapshot in snapshots {
            self.next_id = self.next_id.max(snapshot.id);
            if let Some(bid) = snapshot.batch_id {
                self.next_batch_id = self.next_batch_id.max(bid);
            }
            points.push(snapshot.clone());
        }
        self.points = Arc::new(points);
        let count = snapshots.len();
        self.bump_and_notify(|version| PointStoreEvent::BatchAdded {
            batch_id,
            count,
            version,
        });
        true
    }

    /// Reinstates a set of removed points with mixed (or no) batch ids in
    /// one mutation: one snapshot swap, one version bump, one
    /// notification. Fails without changing anything if any id is
    /// already present.
    pub fn restore_points_bulk(&mut self, snapshots: &[ConstructionPoint]) -> bool {
        if snapshots.is_empty() {
            return false;
        }
        if snapshots.iter().any(|s| self.get_point(s.id).is_some()) {
            return false;
        }

        let mut points = self.points.as_ref().clone();
        for snapshot in snapshots {
            self.next_id = self.next_id.max(snapshot.id);
            if let Some(bid) = snapshot.batch_id {
                self.next_batch_id = self.next_batch_id.max(bid);
            }
            points.push(snapshot.clone());
        }
        self.points = Arc::new(points);
        let count = snapshots.len();
        self.bump_and_notify(|version| PointStoreEvent::PointsRestored { count, version });
        true
    }

    /// Finds the closest visible point within `max_distance` of a probe.
    pub fn find_nearest_point(
        &self,
        probe: Point,
        max_distance: f64,
    ) -> Option<(ConstructionPoint, f64)> {
        let mut best: Option<(&ConstructionPoint, f64)> = None;

        for cp in self.points.iter().filter(|p| p.visible) {
            let distance = probe.distance_to(&cp.point);
            if distance <= max_distance && best.map_or(true, |(_, d)| distance < d) {
                best = Some((cp, distance));
            }
        }

        best.map(|(p, d)| (p.clone(), d))
    }

    /// Removes every point.
    pub fn clear_all(&mut self) {
        if self.points.is_empty() {
            return;
        }
        self.points = Arc::new(Vec::new());
        self.bump_and_notify(|version| PointStoreEvent::Cleared { version });
    }
}

impl Default for PointStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_find_point() {
        let mut store = PointStore::new();
        let cp = store.add_point(Point::new(3.0, 4.0), None, None).unwrap();
        assert_eq!(store.len(), 1);

        let origin = Point::new(0.0, 0.0);
        let (hit, distance) = store.find_nearest_point(origin, 10.0).unwrap();
        assert_eq!(hit.id, cp.id);
        assert!((distance - 5.0).abs() < 1e-9);
        assert!(store.find_nearest_point(origin, 4.0).is_none());
    }

    #[test]
    fn test_batch_is_atomic_under_capacity() {
        let mut store = PointStore::with_config(ConstructionConfig {
            max_points: 3,
            ..Default::default()
        });
        store.add_point(Point::new(0.0, 0.0), None, None).unwrap();

        let positions = vec![
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        ];
        assert!(store.add_points_batch(&positions, None).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.version(), 1);

        let (batch_id, added) = store.add_points_batch(&positions[..2], None).unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(store.points_by_batch(batch_id).len(), 2);
    }

    #[test]
    fn test_remove_and_restore_batch() {
        let mut store = PointStore::new();
        let positions = vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)];
        let (batch_id, _) = store.add_points_batch(&positions, Some("divide")).unwrap();
        let version_after_add = store.version();

        let removed = store.remove_points_by_batch(batch_id);
        assert_eq!(removed.len(), 2);
        assert!(store.is_empty());
        assert_eq!(store.version(), version_after_add + 1);

        // Unknown batch id mutates nothing.
        assert!(store.remove_points_by_batch(999).is_empty());
        assert_eq!(store.version(), version_after_add + 1);

        assert!(store.restore_points_batch(&removed));
        assert_eq!(store.points_by_batch(batch_id).len(), 2);
        assert_eq!(
            store.points_by_batch(batch_id)[0].label.as_deref(),
            Some("divide")
        );
    }

    #[test]
    fn test_restore_point_keeps_id() {
        let mut store = PointStore::new();
        let cp = store.add_point(Point::new(1.0, 1.0), None, None).unwrap();
        let removed = store.remove_point_by_id(cp.id).unwrap();

        assert!(store.restore_point(removed.clone()));
        assert!(!store.restore_point(removed));
        let fresh = store.add_point(Point::new(2.0, 2.0), None, None).unwrap();
        assert_ne!(fresh.id, cp.id);
    }

    #[test]
    fn test_try_variants_report_reason() {
        let mut store = PointStore::new();
        assert_eq!(
            store.try_remove_point_by_id(7),
            Err(PointError::NotFound { id: 7 })
        );
        assert_eq!(
            store.try_remove_points_by_batch(3),
            Err(PointError::BatchNotFound { batch_id: 3 })
        );
    }

    #[test]
    fn test_snapshot_pointer_identity() {
        let mut store = PointStore::new();
        let before = store.points();
        store.add_point(Point::new(0.0, 0.0), None, None).unwrap();
        assert!(!Arc::ptr_eq(&before, &store.points()));
        assert!(Arc::ptr_eq(&store.points(), &store.points()));
    }

    #[test]
    fn test_bulk_restore_is_one_mutation() {
        let mut store = PointStore::new();
        store.add_point(Point::new(0.0, 0.0), None, None).unwrap();
        store.add_point(Point::new(1.0, 1.0), None, None).unwrap();
        let all = store.points().as_ref().clone();
        store.clear_all();

        let version = store.version();
        assert!(store.restore_points_bulk(&all));
        assert_eq!(store.version(), version + 1);
        assert_eq!(store.len(), 2);

        // Any already-present id rejects the whole restore.
        assert!(!store.restore_points_bulk(&all));
        assert_eq!(store.version(), version + 1);
    }

    #[test]
    fn test_clear_all() {
        let mut store = PointStore::new();
        store.add_point(Point::new(0.0, 0.0), None, None).unwrap();
        store.clear_all();
        assert!(store.is_empty());

        let version = store.version();
        store.clear_all();
        assert_eq!(store.version(), version);
    }
}
