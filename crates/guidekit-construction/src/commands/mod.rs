//! Undoable command layer over the construction space.
//!
//! Every command captures the geometry it needs at construction or on
//! first execute, and repeated undo/redo replays those captured
//! snapshots. Nothing is recomputed from live store state on redo, so a
//! rotate→undo→redo cycle lands on bit-identical coordinates no matter
//! how often it repeats.
//!
//! Commands with unmet preconditions execute as silent no-ops: `execute`
//! returns `false`, `affected_ids` stays empty, the stores never notice.

mod guide_commands;
mod pattern;
mod point_commands;
mod rotate;

pub use guide_commands::{
    CreateDiagonalGuideCommand, CreateGuideCommand, CreateParallelGuideCommand,
    DeleteGuideCommand, MoveDiagonalGuideCommand, MoveGuideCommand,
};
pub use pattern::{EqualizeGuidesCommand, PolarArrayGuidesCommand, ScaleAllGuidesCommand};
pub use point_commands::{
    ClearPointsCommand, CreatePointBatchCommand, CreatePointCommand, DeletePointBatchCommand,
    DeletePointCommand,
};
pub use rotate::{RotateAllGuidesCommand, RotateGuideCommand, RotateGuideGroupCommand};

use crate::envelope::CommandEnvelope;
use crate::space::ConstructionSpace;

/// Lifecycle of a command instance.
///
/// `Unexecuted → Executed`, then `Executed ⇄ Undone`. Undoing an
/// unexecuted command and re-executing an already-executed one are
/// no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    #[default]
    Unexecuted,
    Executed,
    Undone,
}

/// An undoable mutation of the construction space.
pub trait Command {
    /// Applies the command. Returns `false` when preconditions fail or
    /// the command has already run; a `false` execute changed nothing.
    fn execute(&mut self, space: &mut ConstructionSpace) -> bool;

    /// Reverts the command. Returns `false` when there is nothing to
    /// revert.
    fn undo(&mut self, space: &mut ConstructionSpace) -> bool;

    /// Re-applies after an undo. Replays frozen geometry via `execute`.
    fn redo(&mut self, space: &mut ConstructionSpace) -> bool {
        self.execute(space)
    }

    /// Human-readable summary for history UI and logs.
    fn description(&self) -> String;

    /// Ids of the entities the last successful execute touched. Empty
    /// for unexecuted and no-op commands.
    fn affected_ids(&self) -> Vec<u64>;

    /// Whether this command can absorb `other` into one history entry.
    /// No command type merges today.
    fn can_merge_with(&self, _other: &dyn Command) -> bool {
        false
    }

    /// Self-describing serialization envelope for journaling.
    fn envelope(&self) -> CommandEnvelope;
}

#[cfg(test)]
mod tests {
    use super::*;
    use guidekit_core::geometry::Point;
    use serde_json::json;

    struct Noop;

    impl Command for Noop {
        fn execute(&mut self, _space: &mut ConstructionSpace) -> bool {
            true
        }
        fn undo(&mut self, _space: &mut ConstructionSpace) -> bool {
            true
        }
        fn description(&self) -> String {
            "noop".to_string()
        }
        fn affected_ids(&self) -> Vec<u64> {
            Vec::new()
        }
        fn envelope(&self) -> CommandEnvelope {
            CommandEnvelope::new("noop", json!({}))
        }
    }

    #[test]
    fn test_default_redo_delegates_to_execute() {
        let mut space = ConstructionSpace::new();
        let mut cmd = Noop;
        assert!(cmd.redo(&mut space));
    }

    #[test]
    fn test_no_command_merges() {
        let a = Noop;
        let b = Noop;
        assert!(!a.can_merge_with(&b));
        let c = CreatePointCommand::new(Point::new(0.0, 0.0), None);
        assert!(!c.can_merge_with(&a));
    }
}
