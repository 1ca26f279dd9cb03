//! Construction guides and snap points for a headless CAD document.
//!
//! Two stores, a command layer, and an undo stack:
//!
//! - [`guide_store::GuideStore`] holds infinite vertical/horizontal
//!   guides and finite diagonal guides, plus guide groups.
//! - [`point_store::PointStore`] holds the snap points that construction
//!   commands place along segments, arcs, and intersections.
//! - [`commands`] wraps every mutation in an undoable [`commands::Command`]
//!   whose geometry freezes on first execute.
//! - [`history::CommandHistory`] is the bounded undo/redo stack.
//!
//! Stores publish immutable snapshots behind `Arc` and bump a version
//! counter on every change; consumers poll with `Arc::ptr_eq` or listen
//! synchronously through the store's subscribe API.

pub mod commands;
pub mod envelope;
pub mod guide;
pub mod guide_store;
pub mod history;
pub mod point_store;
pub mod space;

pub use commands::{Command, CommandState};
pub use envelope::CommandEnvelope;
pub use guide::{Axis, ConstructionPoint, Guide, GuideGroup, GuideStyle, Orientation};
pub use guide_store::{GuideStore, GuideStoreEvent};
pub use history::CommandHistory;
pub use point_store::{PointStore, PointStoreEvent};
pub use space::ConstructionSpace;
