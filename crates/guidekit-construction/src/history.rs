//! Undo/redo stack over executed commands.

use crate::commands::Command;
use crate::space::ConstructionSpace;

const DEFAULT_CAPACITY: usize = 100;

/// Bounded undo stack with a paired redo stack.
///
/// Callers execute a command themselves and push it here on success;
/// pushing clears the redo stack. When the undo stack outgrows its
/// capacity the oldest entry falls off the bottom.
pub struct CommandHistory {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    capacity: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Records an already-executed command.
    pub fn push(&mut self, command: Box<dyn Command>) {
        self.redo_stack.clear();
        self.undo_stack.push(command);
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.remove(0);
        }
        tracing::debug!(depth = self.undo_stack.len(), "command pushed");
    }

    /// Undoes the most recent command. Returns `false` when the stack is
    /// empty or the command declined to revert.
    pub fn undo(&mut self, space: &mut ConstructionSpace) -> bool {
        let Some(mut command) = self.undo_stack.pop() else {
            return false;
        };
        if command.undo(space) {
            tracing::debug!(description = %command.description(), "command undone");
            self.redo_stack.push(command);
            true
        } else {
            // Undo failed (entity locked or gone in the meantime); the
            // entry is no longer replayable, drop it.
            tracing::warn!(description = %command.description(), "undo failed, entry dropped");
            false
        }
    }

    /// Re-applies the most recently undone command.
    pub fn redo(&mut self, space: &mut ConstructionSpace) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };
        if command.redo(space) {
            tracing::debug!(description = %command.description(), "command redone");
            self.undo_stack.push(command);
            true
        } else {
            tracing::warn!(description = %command.description(), "redo failed, entry dropped");
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drops both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CreateGuideCommand;
    use crate::guide::Orientation;

    fn executed_create(space: &mut ConstructionSpace, offset: f64) -> Box<dyn Command> {
        let mut cmd = CreateGuideCommand::new(Orientation::Vertical, offset, None);
        assert!(cmd.execute(space));
        Box::new(cmd)
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut space = ConstructionSpace::new();
        let mut history = CommandHistory::new();
        history.push(executed_create(&mut space, 5.0));
        assert!(history.can_undo());
        assert!(!history.can_redo());

        assert!(history.undo(&mut space));
        assert!(space.guides.is_empty());
        assert!(history.can_redo());

        assert!(history.redo(&mut space));
        assert_eq!(space.guides.len(), 1);
        assert!(!history.redo(&mut space));
    }

    #[test]
    fn test_push_clears_redo() {
        let mut space = ConstructionSpace::new();
        let mut history = CommandHistory::new();
        history.push(executed_create(&mut space, 5.0));
        assert!(history.undo(&mut space));

        history.push(executed_create(&mut space, 8.0));
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut space = ConstructionSpace::new();
        let mut history = CommandHistory::with_capacity(2);
        history.push(executed_create(&mut space, 1.0));
        history.push(executed_create(&mut space, 2.0));
        history.push(executed_create(&mut space, 3.0));
        assert_eq!(history.undo_depth(), 2);

        assert!(history.undo(&mut space));
        assert!(history.undo(&mut space));
        assert!(!history.can_undo());
        // The first guide survives; its command fell off the stack.
        assert_eq!(space.guides.len(), 1);
    }
}
