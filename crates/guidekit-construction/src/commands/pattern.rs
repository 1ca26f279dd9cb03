//! Multi-guide layout commands: equalize spacing, polar arrays, global
//! scaling.

use guidekit_core::geometry::Point;
use serde_json::json;

use crate::envelope::CommandEnvelope;
use crate::guide::{Axis, Guide};
use crate::space::ConstructionSpace;

use super::{Command, CommandState};

/// Redistributes three or more parallel guides to equal spacing.
///
/// The outermost pair stays put; intermediates move to multiples of
/// (max − min) / (n − 1). Validity is decided at construction: fewer
/// than three targets, mixed orientations, diagonals, or locked guides
/// make an invalid command whose execute is a no-op.
pub struct EqualizeGuidesCommand {
    guide_ids: Vec<u64>,
    snapshots: Vec<Guide>,
    targets: Vec<(u64, Axis)>,
    valid: bool,
    state: CommandState,
}

impl EqualizeGuidesCommand {
    pub fn new(space: &ConstructionSpace, guide_ids: Vec<u64>) -> Self {
        let mut command = Self {
            guide_ids,
            snapshots: Vec::new(),
            targets: Vec::new(),
            valid: false,
            state: CommandState::Unexecuted,
        };
        command.freeze(space);
        command
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    fn freeze(&mut self, space: &ConstructionSpace) {
        if self.guide_ids.len() < 3 {
            return;
        }

        let mut eligible: Vec<Guide> = Vec::with_capacity(self.guide_ids.len());
        for id in &self.guide_ids {
            let Some(guide) = space.guides.get_guide(*id) else {
                return;
            };
            if guide.locked || guide.axis.orientation().is_none() {
                return;
            }
            eligible.push(guide.clone());
        }
        let orientation = eligible[0].axis.orientation();
        if eligible.iter().any(|g| g.axis.orientation() != orientation) {
            return;
        }
        let orientation = orientation.unwrap();

        eligible.sort_by(|a, b| {
            a.axis
                .offset()
                .partial_cmp(&b.axis.offset())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let min = eligible[0].axis.offset().unwrap();
        let max = eligible[eligible.len() - 1].axis.offset().unwrap();
        let step = (max - min) / (eligible.len() - 1) as f64;

        for (i, guide) in eligible.iter().enumerate() {
            self.snapshots.push(guide.clone());
            self.targets.push((
                guide.id,
                Axis::from_orientation(orientation, min + step * i as f64),
            ));
        }
        self.valid = true;
    }
}

impl Command for EqualizeGuidesCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if !self.valid || self.state == CommandState::Executed {
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

    fn description(&self) -> String {
        format!("Equalize spacing of {} guides", self.guide_ids.len())
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        self.targets.iter().map(|(id, _)| *id).collect()
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new("equalize_guides", json!({ "guide_ids": self.guide_ids }))
    }
}

/// Creates `count` diagonal guides fanned through a center point at
/// 360 / count degree spacing.
pub struct PolarArrayGuidesCommand {
    center: Point,
    count: usize,
    created: Vec<Guide>,
    state: CommandState,
}

impl PolarArrayGuidesCommand {
    pub fn new(center: Point, count: usize) -> Self {
        Self {
            center,
            count,
            created: Vec::new(),
            state: CommandState::Unexecuted,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.count >= 2
    }

    pub fn created_guides(&self) -> &[Guide] {
        &self.created
    }
}

impl Command for PolarArrayGuidesCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if !self.is_valid() || self.state == CommandState::Executed {
            return false;
        }

        if self.created.is_empty() {
            // First execute: place the spokes.
            if space.guides.len() + self.count > space.config().max_guides {
                tracing::warn!(count = self.count, "polar array rejected: guide limit");
                return false;
            }
            let extent = space.config().rotation_extent;
            let step = 360.0 / self.count as f64;
            for i in 0..self.count {
                let angle = (step * i as f64).to_radians();
                let (dx, dy) = (angle.cos() * extent, angle.sin() * extent);
                let start = Point::new(self.center.x - dx, self.center.y - dy);
                let end = Point::new(self.center.x + dx, self.center.y + dy);
                match space.guides.add_diagonal_guide_raw(start, end, None, None) {
                    Some(guide) => self.created.push(guide),
                    None => {
                        // Roll back the partial fan.
                        for placed in self.created.drain(..) {
                            space.guides.remove_guide_by_id(placed.id);
                        }
                        return false;
                    }
                }
            }
        } else {
            // Redo: reinstate the frozen spokes.
            for guide in &self.created {
                space.guides.reinsert_guide(guide.clone());
            }
        }

        self.state = CommandState::Executed;
        true
    }

    fn undo(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state != CommandState::Executed {
            return false;
        }
        for guide in &self.created {
            space.guides.remove_guide_by_id(guide.id);
        }
        self.state = CommandState::Undone;
        true
    }

    fn description(&self) -> String {
        format!(
            "Polar array of {} guides about ({}, {})",
            self.count, self.center.x, self.center.y
        )
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        self.created.iter().map(|g| g.id).collect()
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new(
            "polar_array_guides",
            json!({
                "center": self.center,
                "count": self.count,
            }),
        )
    }
}

/// Scales every visible, unlocked guide away from an origin.
///
/// Offsets and endpoints scale; axis kind is preserved. A factor of
/// exactly 1 is invalid.
pub struct ScaleAllGuidesCommand {
    origin: Point,
    factor: f64,
    snapshots: Vec<Guide>,
    targets: Vec<(u64, Axis)>,
    state: CommandState,
}

impl ScaleAllGuidesCommand {
    pub fn new(origin: Point, factor: f64) -> Self {
        Self {
            origin,
            factor,
            snapshots: Vec::new(),
            targets: Vec::new(),
            state: CommandState::Unexecuted,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.factor != 1.0 && self.factor.is_finite() && self.factor != 0.0
    }

    fn scaled_axis(&self, axis: &Axis) -> Axis {
        let scale = |value: f64, about: f64| about + (value - about) * self.factor;
        match axis {
            Axis::Vertical { offset } => Axis::Vertical {
                offset: scale(*offset, self.origin.x),
            },
            Axis::Horizontal { offset } => Axis::Horizontal {
                offset: scale(*offset, self.origin.y),
            },
            Axis::Diagonal { start, end } => Axis::Diagonal {
                start: Point::new(scale(start.x, self.origin.x), scale(start.y, self.origin.y)),
                end: Point::new(scale(end.x, self.origin.x), scale(end.y, self.origin.y)),
            },
        }
    }
}

impl Command for ScaleAllGuidesCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if !self.is_valid() || self.state == CommandState::Executed {
            return false;
        }

        if self.targets.is_empty() {
            let guides = space.guides.guides();
            for guide in guides.iter().filter(|g| g.visible && !g.locked) {
                self.snapshots.push(guide.clone());
                self.targets.push((guide.id, self.scaled_axis(&guide.axis)));
            }
            if self.targets.is_empty() {
                return false;
            }
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

    fn description(&self) -> String {
        format!("Scale all guides by {} about ({}, {})", self.factor, self.origin.x, self.origin.y)
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        self.targets.iter().map(|(id, _)| *id).collect()
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new(
            "scale_all_guides",
            json!({
                "origin": self.origin,
                "factor": self.factor,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::Orientation;
    use guidekit_core::constants::DEFAULT_ROTATION_EXTENT;

    fn vertical(space: &mut ConstructionSpace, offset: f64) -> u64 {
        space
            .guides
            .add_guide_raw(Orientation::Vertical, offset, None, None, None)
            .unwrap()
            .id
    }

    #[test]
    fn test_equalize_fixes_ends_and_spreads_middle() {
        let mut space = ConstructionSpace::new();
        let a = vertical(&mut space, 0.0);
        let b = vertical(&mut space, 3.0);
        let c = vertical(&mut space, 10.0);

        let mut cmd = EqualizeGuidesCommand::new(&space, vec![a, b, c]);
        assert!(cmd.is_valid());
        assert!(cmd.execute(&mut space));

        assert_eq!(space.guides.get_guide(a).unwrap().axis.offset(), Some(0.0));
        assert_eq!(space.guides.get_guide(b).unwrap().axis.offset(), Some(5.0));
        assert_eq!(space.guides.get_guide(c).unwrap().axis.offset(), Some(10.0));

        assert!(cmd.undo(&mut space));
        assert_eq!(space.guides.get_guide(b).unwrap().axis.offset(), Some(3.0));
    }

    #[test]
    fn test_equalize_rejects_mixed_orientations_and_small_sets() {
        let mut space = ConstructionSpace::new();
        let a = vertical(&mut space, 0.0);
        let b = vertical(&mut space, 10.0);
        let h = space
            .guides
            .add_guide_raw(Orientation::Horizontal, 5.0, None, None, None)
            .unwrap()
            .id;

        let mixed = EqualizeGuidesCommand::new(&space, vec![a, b, h]);
        assert!(!mixed.is_valid());

        let short = EqualizeGuidesCommand::new(&space, vec![a, b]);
        assert!(!short.is_valid());

        let mut cmd = EqualizeGuidesCommand::new(&space, vec![a, b, h]);
        assert!(!cmd.execute(&mut space));
        assert!(cmd.affected_ids().is_empty());
    }

    #[test]
    fn test_polar_array_four_spokes() {
        let mut space = ConstructionSpace::new();
        let mut cmd = PolarArrayGuidesCommand::new(Point::new(0.0, 0.0), 4);
        assert!(cmd.execute(&mut space));
        assert_eq!(space.guides.len(), 4);

        // Spoke 1 runs at 90°: a vertical-looking diagonal through the
        // center with half-length equal to the rotation extent.
        let (start, end) = cmd.created_guides()[1].axis.endpoints().unwrap();
        assert!(start.x.abs() < 1e-9);
        assert!(end.x.abs() < 1e-9);
        assert!((end.y - DEFAULT_ROTATION_EXTENT).abs() < 1e-6);

        assert!(cmd.undo(&mut space));
        assert!(space.guides.is_empty());
        assert!(cmd.redo(&mut space));
        assert_eq!(space.guides.len(), 4);
    }

    #[test]
    fn test_polar_array_invalid_count() {
        let mut space = ConstructionSpace::new();
        let mut cmd = PolarArrayGuidesCommand::new(Point::new(0.0, 0.0), 1);
        assert!(!cmd.is_valid());
        assert!(!cmd.execute(&mut space));
        assert!(space.guides.is_empty());
    }

    #[test]
    fn test_scale_preserves_axis_kind() {
        let mut space = ConstructionSpace::new();
        let v = vertical(&mut space, 4.0);
        let d = space
            .guides
            .add_diagonal_guide_raw(Point::new(1.0, 1.0), Point::new(3.0, 1.0), None, None)
            .unwrap()
            .id;

        let mut cmd = ScaleAllGuidesCommand::new(Point::new(2.0, 0.0), 2.0);
        assert!(cmd.execute(&mut space));

        assert_eq!(space.guides.get_guide(v).unwrap().axis.offset(), Some(6.0));
        let (start, end) = space.guides.get_guide(d).unwrap().axis.endpoints().unwrap();
        assert_eq!(start, Point::new(0.0, 2.0));
        assert_eq!(end, Point::new(4.0, 2.0));

        assert!(cmd.undo(&mut space));
        assert_eq!(space.guides.get_guide(v).unwrap().axis.offset(), Some(4.0));
    }

    #[test]
    fn test_scale_identity_factor_invalid() {
        let mut space = ConstructionSpace::new();
        vertical(&mut space, 4.0);
        let mut cmd = ScaleAllGuidesCommand::new(Point::new(0.0, 0.0), 1.0);
        assert!(!cmd.is_valid());
        assert!(!cmd.execute(&mut space));
        assert_eq!(space.guides.version(), 1);
    }
}
