//! # GuideKit Core
//!
//! Core building blocks for the construction-guide and snap-point
//! subsystem: the pure geometry kernel, shared constants and
//! configuration, the error taxonomy, and the synchronous change
//! notifier the stores publish through.
//!
//! Everything here is headless and allocation-light; rendering, input
//! handling, and the wider entity-snapping engine live above this crate
//! and only consume its snapshots.

pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod notify;

pub use config::ConstructionConfig;
pub use error::{Error, GeometryError, GuideError, PointError, Result};
pub use geometry::Point;
pub use notify::{ChangeNotifier, SubscriptionId};
