//! Guide rotation commands.
//!
//! Rotation always produces diagonal guides. Infinite guides are first
//! extended to a finite segment centered on the pivot's projection onto
//! the guide line; the segment spans twice the configured rotation
//! extent so the rotated guide still crosses any practical viewport.

use guidekit_core::geometry::{rotate_point, Point};
use serde_json::json;

use crate::envelope::CommandEnvelope;
use crate::guide::{Axis, Guide};
use crate::space::ConstructionSpace;

use super::{Command, CommandState};

/// Extends `axis` to a finite segment (if needed) and rotates both
/// endpoints about `pivot`.
fn rotated_endpoints(axis: &Axis, pivot: Point, angle_deg: f64, extent: f64) -> (Point, Point) {
    let (start, end) = match axis {
        Axis::Vertical { offset } => (
            Point::new(*offset, pivot.y - extent),
            Point::new(*offset, pivot.y + extent),
        ),
        Axis::Horizontal { offset } => (
            Point::new(pivot.x - extent, *offset),
            Point::new(pivot.x + extent, *offset),
        ),
        Axis::Diagonal { start, end } => (*start, *end),
    };
    (
        rotate_point(start, pivot, angle_deg),
        rotate_point(end, pivot, angle_deg),
    )
}

/// Rotates one guide about a pivot.
///
/// Undo restores the complete pre-rotation snapshot, so a rotated
/// vertical guide comes back as a vertical guide, not a degenerate
/// diagonal.
pub struct RotateGuideCommand {
    guide_id: u64,
    pivot: Point,
    angle_deg: f64,
    target: Option<(Point, Point)>,
    snapshot: Option<Guide>,
    state: CommandState,
}

impl RotateGuideCommand {
    pub fn new(guide_id: u64, pivot: Point, angle_deg: f64) -> Self {
        Self {
            guide_id,
            pivot,
            angle_deg,
            target: None,
            snapshot: None,
            state: CommandState::Unexecuted,
        }
    }
}

impl Command for RotateGuideCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        let target = match self.target {
            Some(frozen) => frozen,
            None => {
                let Some(guide) = space.guides.get_guide(self.guide_id) else {
                    return false;
                };
                let extent = space.config().rotation_extent;
                let target = rotated_endpoints(&guide.axis, self.pivot, self.angle_deg, extent);
                self.target = Some(target);
                target
            }
        };

        match space
            .guides
            .replace_guide_with_rotated(self.guide_id, target.0, target.1)
        {
            Some(snapshot) => {
                if self.snapshot.is_none() {
                    self.snapshot = Some(snapshot);
                }
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
        let Some(snapshot) = self.snapshot.clone() else {
            return false;
        };
        if space.guides.restore_guide_snapshot(snapshot) {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        format!(
            "Rotate guide {} by {}° about ({}, {})",
            self.guide_id, self.angle_deg, self.pivot.x, self.pivot.y
        )
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        vec![self.guide_id]
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new(
            "rotate_guide",
            json!({
                "guide_id": self.guide_id,
                "pivot": self.pivot,
                "angle_deg": self.angle_deg,
            }),
        )
    }
}

/// Shared core of the bulk rotation commands.
///
/// Eligibility and geometry freeze on first execute: the pre-rotation
/// snapshots and per-guide target endpoints are captured before any
/// mutation, then applied in one atomic bulk update.
struct BulkRotation {
    pivot: Point,
    angle_deg: f64,
    snapshots: Vec<Guide>,
    targets: Vec<(u64, Axis)>,
    state: CommandState,
}

impl BulkRotation {
    fn new(pivot: Point, angle_deg: f64) -> Self {
        Self {
            pivot,
            angle_deg,
            snapshots: Vec::new(),
            targets: Vec::new(),
            state: CommandState::Unexecuted,
        }
    }

    fn freeze<'a>(&mut self, eligible: impl Iterator<Item = &'a Guide>, extent: f64) {
        for guide in eligible {
            let (start, end) =
                rotated_endpoints(&guide.axis, self.pivot, self.angle_deg, extent);
            self.snapshots.push(guide.clone());
            self.targets.push((guide.id, Axis::Diagonal { start, end }));
        }
    }

    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed || self.targets.is_empty() {
            return false;
        }
        if space.guides.apply_axes_bulk(&self.targets) {
            self.state = CommandState::Executed;
            true
        } else {
            false
        }
    }

    fn undo(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state != CommandState::Executed {
            return false;
        }
        if space.guides.restore_guides_bulk(&self.snapshots) {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        self.targets.iter().map(|(id, _)| *id).collect()
    }
}

/// Rotates every visible, unlocked guide about a pivot.
pub struct RotateAllGuidesCommand {
    inner: BulkRotation,
}

impl RotateAllGuidesCommand {
    pub fn new(pivot: Point, angle_deg: f64) -> Self {
        Self {
            inner: BulkRotation::new(pivot, angle_deg),
        }
    }
}

impl Command for RotateAllGuidesCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.inner.state == CommandState::Unexecuted && self.inner.targets.is_empty() {
            let extent = space.config().rotation_extent;
            let guides = space.guides.guides();
            self.inner.freeze(
                guides.iter().filter(|g| g.visible && !g.locked),
                extent,
            );
        }
        self.inner.execute(space)
    }

    fn undo(&mut self, space: &mut ConstructionSpace) -> bool {
        self.inner.undo(space)
    }

    fn description(&self) -> String {
        format!("Rotate all guides by {}°", self.inner.angle_deg)
    }

    fn affected_ids(&self) -> Vec<u64> {
        self.inner.affected_ids()
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new(
            "rotate_all_guides",
            json!({
                "pivot": self.inner.pivot,
                "angle_deg": self.inner.angle_deg,
            }),
        )
    }
}

/// Rotates an explicit set of guides about a pivot. Locked and missing
/// ids are skipped at freeze time.
pub struct RotateGuideGroupCommand {
    guide_ids: Vec<u64>,
    inner: BulkRotation,
}

impl RotateGuideGroupCommand {
    pub fn new(guide_ids: Vec<u64>, pivot: Point, angle_deg: f64) -> Self {
        Self {
            guide_ids,
            inner: BulkRotation::new(pivot, angle_deg),
        }
    }
}

impl Command for RotateGuideGroupCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.inner.state == CommandState::Unexecuted && self.inner.targets.is_empty() {
            let extent = space.config().rotation_extent;
            let guides = space.guides.guides();
            self.inner.freeze(
                guides
                    .iter()
                    .filter(|g| self.guide_ids.contains(&g.id) && !g.locked),
                extent,
            );
        }
        self.inner.execute(space)
    }

    fn undo(&mut self, space: &mut ConstructionSpace) -> bool {
        self.inner.undo(space)
    }

    fn description(&self) -> String {
        format!(
            "Rotate {} guides by {}°",
            self.guide_ids.len(),
            self.inner.angle_deg
        )
    }

    fn affected_ids(&self) -> Vec<u64> {
        self.inner.affected_ids()
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new(
            "rotate_guide_group",
            json!({
                "guide_ids": self.guide_ids,
                "pivot": self.inner.pivot,
                "angle_deg": self.inner.angle_deg,
            }),
        )
    }
}
