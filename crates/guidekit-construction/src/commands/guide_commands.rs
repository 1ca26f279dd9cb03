//! Single-guide commands: create, delete, parallel-offset, move.

use guidekit_core::constants::MIN_DISTANCE;
use guidekit_core::geometry::Point;
use serde_json::json;

use crate::envelope::CommandEnvelope;
use crate::guide::{Axis, Guide, Orientation};
use crate::space::ConstructionSpace;

use super::{Command, CommandState};

/// Creates a vertical or horizontal guide at a fixed offset.
pub struct CreateGuideCommand {
    orientation: Orientation,
    offset: f64,
    label: Option<String>,
    created: Option<Guide>,
    state: CommandState,
}

impl CreateGuideCommand {
    pub fn new(orientation: Orientation, offset: f64, label: Option<String>) -> Self {
        Self {
            orientation,
            offset,
            label,
            created: None,
            state: CommandState::Unexecuted,
        }
    }

    /// The guide produced by the last successful execute.
    pub fn created_guide(&self) -> Option<&Guide> {
        self.created.as_ref()
    }
}

impl Command for CreateGuideCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        let ok = match &self.created {
            // Redo reinstates the frozen guide under its original id.
            Some(snapshot) => space.guides.reinsert_guide(snapshot.clone()),
            None => {
                match space.guides.add_guide_raw(
                    self.orientation,
                    self.offset,
                    self.label.clone(),
                    None,
                    None,
                ) {
                    Some(guide) => {
                        self.created = Some(guide);
                        true
                    }
                    None => false,
                }
            }
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
        let Some(id) = self.created.as_ref().map(|g| g.id) else {
            return false;
        };
        if space.guides.remove_guide_by_id(id).is_some() {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        match self.orientation {
            Orientation::Vertical => format!("Create vertical guide at x = {}", self.offset),
            Orientation::Horizontal => format!("Create horizontal guide at y = {}", self.offset),
        }
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        self.created.iter().map(|g| g.id).collect()
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new(
            "create_guide",
            json!({
                "orientation": self.orientation,
                "offset": self.offset,
                "label": self.label,
            }),
        )
    }
}

/// Creates a finite diagonal guide between two points.
pub struct CreateDiagonalGuideCommand {
    start: Point,
    end: Point,
    label: Option<String>,
    created: Option<Guide>,
    state: CommandState,
}

impl CreateDiagonalGuideCommand {
    pub fn new(start: Point, end: Point, label: Option<String>) -> Self {
        Self {
            start,
            end,
            label,
            created: None,
            state: CommandState::Unexecuted,
        }
    }

    pub fn created_guide(&self) -> Option<&Guide> {
        self.created.as_ref()
    }
}

impl Command for CreateDiagonalGuideCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        let ok = match &self.created {
            Some(snapshot) => space.guides.reinsert_guide(snapshot.clone()),
            None => {
                match space.guides.add_diagonal_guide_raw(
                    self.start,
                    self.end,
                    self.label.clone(),
                    None,
                ) {
                    Some(guide) => {
                        self.created = Some(guide);
                        true
                    }
                    None => false,
                }
            }
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
        let Some(id) = self.created.as_ref().map(|g| g.id) else {
            return false;
        };
        if space.guides.remove_guide_by_id(id).is_some() {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        format!(
            "Create diagonal guide ({}, {}) to ({}, {})",
            self.start.x, self.start.y, self.end.x, self.end.y
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
            "create_diagonal_guide",
            json!({
                "start": self.start,
                "end": self.end,
                "label": self.label,
            }),
        )
    }
}

/// Deletes a guide; undo reinstates the captured entity verbatim.
pub struct DeleteGuideCommand {
    guide_id: u64,
    removed: Option<Guide>,
    state: CommandState,
}

impl DeleteGuideCommand {
    pub fn new(guide_id: u64) -> Self {
        Self {
            guide_id,
            removed: None,
            state: CommandState::Unexecuted,
        }
    }
}

impl Command for DeleteGuideCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        match space.guides.remove_guide_by_id(self.guide_id) {
            Some(guide) => {
                self.removed = Some(guide);
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
        if space.guides.reinsert_guide(snapshot) {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        format!("Delete guide {}", self.guide_id)
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        vec![self.guide_id]
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new("delete_guide", json!({ "guide_id": self.guide_id }))
    }
}

/// Creates a guide parallel to an existing one at a signed distance.
///
/// For infinite references the distance adds to the offset on the same
/// orientation. For diagonal references both endpoints shift along the
/// segment's left-hand unit normal. The new guide records the reference
/// as its parent.
pub struct CreateParallelGuideCommand {
    reference_id: u64,
    distance: f64,
    label: Option<String>,
    created: Option<Guide>,
    state: CommandState,
}

impl CreateParallelGuideCommand {
    pub fn new(reference_id: u64, distance: f64, label: Option<String>) -> Self {
        Self {
            reference_id,
            distance,
            label,
            created: None,
            state: CommandState::Unexecuted,
        }
    }

    pub fn created_guide(&self) -> Option<&Guide> {
        self.created.as_ref()
    }

    fn create(&self, space: &mut ConstructionSpace) -> Option<Guide> {
        let reference = space.guides.get_guide(self.reference_id)?.clone();
        match reference.axis {
            Axis::Vertical { offset } => space.guides.add_guide_raw(
                Orientation::Vertical,
                offset + self.distance,
                self.label.clone(),
                Some(reference.id),
                None,
            ),
            Axis::Horizontal { offset } => space.guides.add_guide_raw(
                Orientation::Horizontal,
                offset + self.distance,
                self.label.clone(),
                Some(reference.id),
                None,
            ),
            Axis::Diagonal { start, end } => {
                let length = start.distance_to(&end);
                if length < MIN_DISTANCE {
                    return None;
                }
                let nx = -(end.y - start.y) / length;
                let ny = (end.x - start.x) / length;
                let shift = |p: Point| {
                    Point::new(p.x + nx * self.distance, p.y + ny * self.distance)
                };
                space.guides.add_diagonal_guide_raw(
                    shift(start),
                    shift(end),
                    self.label.clone(),
                    Some(reference.id),
                )
            }
        }
    }
}

impl Command for CreateParallelGuideCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        let ok = match &self.created {
            Some(snapshot) => space.guides.reinsert_guide(snapshot.clone()),
            None => match self.create(space) {
                Some(guide) => {
                    self.created = Some(guide);
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
        let Some(id) = self.created.as_ref().map(|g| g.id) else {
            return false;
        };
        if space.guides.remove_guide_by_id(id).is_some() {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        format!(
            "Create guide parallel to {} at distance {}",
            self.reference_id, self.distance
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
            "create_parallel_guide",
            json!({
                "reference_id": self.reference_id,
                "distance": self.distance,
                "label": self.label,
            }),
        )
    }
}

/// Moves an infinite guide between two offsets captured up front.
pub struct MoveGuideCommand {
    guide_id: u64,
    old_offset: f64,
    new_offset: f64,
    state: CommandState,
}

impl MoveGuideCommand {
    pub fn new(guide_id: u64, old_offset: f64, new_offset: f64) -> Self {
        Self {
            guide_id,
            old_offset,
            new_offset,
            state: CommandState::Unexecuted,
        }
    }
}

impl Command for MoveGuideCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        if space.guides.move_guide_by_id(self.guide_id, self.new_offset) {
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
        if space.guides.move_guide_by_id(self.guide_id, self.old_offset) {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        format!(
            "Move guide {} from {} to {}",
            self.guide_id, self.old_offset, self.new_offset
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
            "move_guide",
            json!({
                "guide_id": self.guide_id,
                "old_offset": self.old_offset,
                "new_offset": self.new_offset,
            }),
        )
    }
}

/// Moves both endpoints of a diagonal guide, old and new captured up
/// front.
pub struct MoveDiagonalGuideCommand {
    guide_id: u64,
    old_start: Point,
    old_end: Point,
    new_start: Point,
    new_end: Point,
    state: CommandState,
}

impl MoveDiagonalGuideCommand {
    pub fn new(
        guide_id: u64,
        old_start: Point,
        old_end: Point,
        new_start: Point,
        new_end: Point,
    ) -> Self {
        Self {
            guide_id,
            old_start,
            old_end,
            new_start,
            new_end,
            state: CommandState::Unexecuted,
        }
    }
}

impl Command for MoveDiagonalGuideCommand {
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool {
        if self.state == CommandState::Executed {
            return false;
        }
        if space
            .guides
            .move_diagonal_guide_by_id(self.guide_id, self.new_start, self.new_end)
        {
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
        if space
            .guides
            .move_diagonal_guide_by_id(self.guide_id, self.old_start, self.old_end)
        {
            self.state = CommandState::Undone;
            true
        } else {
            false
        }
    }

    fn description(&self) -> String {
        format!("Move diagonal guide {}", self.guide_id)
    }

    fn affected_ids(&self) -> Vec<u64> {
        if self.state == CommandState::Unexecuted {
            return Vec::new();
        }
        vec![self.guide_id]
    }

    fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::new(
            "move_diagonal_guide",
            json!({
                "guide_id": self.guide_id,
                "old_start": self.old_start,
                "old_end": self.old_end,
                "new_start": self.new_start,
                "new_end": self.new_end,
            }),
        )
    }
}
