//! Construction-point commands.
//!
//! Batch placements precompute their positions from the geometry kernel
//! at construction time; the command only carries coordinates. Undo of a
//! batch removes exactly the points its batch id owns.

use guidekit_core::geometry::{
    arc_distance_points, arc_segment_points, circle_circle_intersections, distance_points,
    line_arc_intersections, segment_points, Point,
};
use serde_json::json;

use crate::envelope::CommandEnvelope;
use crate::guide::ConstructionPoint;
use crate::space::ConstructionSpace;

use super::{Command, CommandState};

/// Places a single snap point.
pub struct CreatePointCommand {
    position: Point,
    label: Option<String>,
    created: Option<ConstructionPoint>,
    state: CommandState,
}

impl CreatePointCommand {
    pub fn new(position: Point, label: Option<String>) -> Self {
        Self {
            position,
            label,
            created: None,
            state: CommandState::Unexecuted,
        }
    }

    pub fn created_point(&self) -> Option<&ConstructionPoint> {
        self.created.as_ref()
    }
}

impl Command for CreatePointCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        let ok = match &self.created {
            Some(snapshot) => space.points.restore_point(snapshot.clone()),
            None => match space
                .points
                .add_point(self.position, self.label.clone(), None)
            {
                Some(cp) => {
                    self.created = Some(cp);
                    true
                }
                None => false,
            },
        };
        if ok {
            self.state = CommandState::Executed;
        }
        ok
    }

    fn undo(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state != CommandState::Executed {
            return false;
        }
        let Some(id) = self.created.as_ref().map(|p| p.id) else {
            return false;
        };
        if space.points.remove_point_by_id(id).is_some() {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        format!(
            "Create point at ({}, {})",
            self.position.x, self.position.y
        )
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        self.created.iter().map(|p| p.id).collect()
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new(
            "create_point",
            json!({
                "position": self.position,
                "label": self.label,
            }),
        )
    }
}

/// Places a batch of snap points precomputed from the kernel.
///
/// An empty position list (degenerate input geometry, no intersections)
/// makes an invalid command whose execute is a silent no-op.
pub struct CreatePointBatchCommand {
    positions: Vec<Point>,
    label: Option<String>,
    batch_id: Option<u64>,
    created: Vec<ConstructionPoint>,
    state: CommandState,
}

impl CreatePointBatchCommand {
    pub fn new(positions: Vec<Point>, label: Option<String>) -> Self {
        Self {
            positions,
            label,
            batch_id: None,
            created: Vec::new(),
            state: CommandState::Unexecuted,
        }
    }

    /// Points dividing a segment into `n` equal parts (endpoints
    /// included).
    pub fn along_segment(start: Point, end: Point, n: usize, label: Option<String>) -> Self {
        Self::new(segment_points(start, end, n), label)
    }

    /// Points stepped along a segment at a fixed distance.
    pub fn spaced_along_segment(
        start: Point,
        end: Point,
        dist: f64,
        label: Option<String>,
    ) -> Self {
        Self::new(distance_points(start, end, dist), label)
    }

    /// Points dividing an arc or full circle into equal angular steps.
    pub fn along_arc(
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        count: usize,
        full_circle: bool,
        label: Option<String>,
    ) -> Self {
        Self::new(
            arc_segment_points(center, radius, start_deg, end_deg, count, full_circle),
            label,
        )
    }

    /// Points stepped along an arc at a fixed chordless arc distance.
    pub fn spaced_along_arc(
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        dist: f64,
        full_circle: bool,
        label: Option<String>,
    ) -> Self {
        Self::new(
            arc_distance_points(center, radius, start_deg, end_deg, dist, full_circle),
            label,
        )
    }

    /// Points where a segment crosses an arc or circle.
    #[allow(clippy::too_many_arguments)]
    pub fn at_line_arc_intersections(
        seg_start: Point,
        seg_end: Point,
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        full_circle: bool,
        label: Option<String>,
    ) -> Self {
        Self::new(
            line_arc_intersections(
                seg_start,
                seg_end,
                center,
                radius,
                start_deg,
                end_deg,
                full_circle,
            ),
            label,
        )
    }

    /// Points where two arcs or circles cross.
    #[allow(clippy::too_many_arguments)]
    pub fn at_circle_circle_intersections(
        center1: Point,
        radius1: f64,
        start1_deg: f64,
        end1_deg: f64,
        full1: bool,
        center2: Point,
        radius2: f64,
        start2_deg: f64,
        end2_deg: f64,
        full2: bool,
        label: Option<String>,
    ) -> Self {
        Self::new(
            circle_circle_intersections(
                center1, radius1, start1_deg, end1_deg, full1, center2, radius2, start2_deg,
                end2_deg, full2,
            ),
            label,
        )
    }

    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty()
    }

    pub fn batch_id(&self) -> Option<u64> {
        self.batch_id
    }

    pub fn created_points(&self) -> &[ConstructionPoint] {
        &self.created
    }
}

impl Command for CreatePointBatchCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if !self.is_valid() || self.state == CommandState::Executed {
            return false;
        }
        let ok = if self.created.is_empty() {
            match space
                .points
                .add_points_batch(&self.positions, self.label.as_deref())
            {
                Some((batch_id, created)) => {
                    self.batch_id = Some(batch_id);
                    self.created = created;
                    true
                }
                None => false,
            }
        } else {
            space.points.restore_points_batch(&self.created)
        };
        if ok {
            self.state = CommandState::Executed;
        }
        ok
    }

    fn undo(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state != CommandState::Executed {
            return false;
        }
        let Some(batch_id) = self.batch_id else {
            return false;
        };
        if space.points.remove_points_by_batch(batch_id).is_empty() {
            false
        } else {
            self.state = CommandState::Undone;
            true
        }
    }

    fn description(&self) -> String {
        format!("Create {} points", self.positions.len())
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        self.created.iter().map(|p| p.id).collect()
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new(
            "create_point_batch",
            json!({
                "positions": self.positions,
                "label": self.label,
            }),
        )
    }
}

/// Deletes a single snap point.
pub struct DeletePointCommand {
    point_id: u64,
    removed: Option<ConstructionPoint>,
    state: CommandState,
}

impl DeletePointCommand {
    pub fn new(point_id: u64) -> Self {
        Self {
            point_id,
            removed: None,
            state: CommandState::Unexecuted,
        }
    }
}

impl Command for DeletePointCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        match space.points.remove_point_by_id(self.point_id) {
            Some(removed) => {
                self.removed = Some(removed);
                self.state = CommandState::Executed;
                true
            }
            None => false,
        }
    }

    fn undo(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state != CommandState::Executed {
            return false;
        }
        let Some(snapshot) = self.removed.clone() else {
            return false;
        };
        if space.points.restore_point(snapshot) {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        format!("Delete point {}", self.point_id)
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        vec![self.point_id]
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new("delete_point", json!({ "point_id": self.point_id }))
    }
}

/// Deletes every point of one batch.
pub struct DeletePointBatchCommand {
    batch_id: u64,
    removed: Vec<ConstructionPoint>,
    state: CommandState,
}

impl DeletePointBatchCommand {
    pub fn new(batch_id: u64) -> Self {
        Self {
            batch_id,
            removed: Vec::new(),
            state: CommandState::Unexecuted,
        }
    }
}

impl Command for DeletePointBatchCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        let removed = space.points.remove_points_by_batch(self.batch_id);
        if removed.is_empty() {
            return false;
        }
        self.removed = removed;
        self.state = CommandState::Executed;
        true
    }

    fn undo(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state != CommandState::Executed {
            return false;
        }
        if space.points.restore_points_batch(&self.removed) {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        format!("Delete point batch {}", self.batch_id)
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        self.removed.iter().map(|p| p.id).collect()
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new("delete_point_batch", json!({ "batch_id": self.batch_id }))
    }
}

/// Removes every snap point; undo brings them all back.
pub struct ClearPointsCommand {
    removed: Vec<ConstructionPoint>,
    state: CommandState,
}

impl ClearPointsCommand {
    pub fn new() -> Self {
        Self {
            removed: Vec::new(),
            state: CommandState::Unexecuted,
        }
    }
}

impl Default for ClearPointsCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for ClearPointsCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        if space.points.is_empty() {
            return false;
        }
        if self.removed.is_empty() {
            self.removed = space.points.points().as_ref().clone();
        }
        space.points.clear_all();
        self.state = CommandState::Executed;
        true
    }

    fn undo(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state != CommandState::Executed {
            return false;
        }
        if space.points.restore_points_bulk(&self.removed) {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        "Clear all points".to_string()
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        self.removed.iter().map(|p| p.id).collect()
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new("clear_points", json!({}))
    }
}
