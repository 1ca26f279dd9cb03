//! Error handling for GuideKit
//!
//! Provides error types for the layers of the construction core:
//! - Guide errors (capacity, duplicate offsets, locked entities)
//! - Point errors (capacity, missing entities)
//! - Geometry errors (degenerate input)
//!
//! All error types use `thiserror` for ergonomic error handling.
//!
//! Guide placement runs inside continuous pointer-drag interactions, so
//! the public write path of the stores stays "fail quiet": these errors
//! surface only through the `try_*` store variants and in log output.

use thiserror::Error;

/// Guide store error type
///
/// Represents errors raised while validating guide mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuideError {
    /// Adding the guide would exceed the configured maximum
    #[error("Guide limit reached ({limit})")]
    CapacityExceeded {
        /// The configured guide limit.
        limit: usize,
    },

    /// A guide with a near-identical offset already exists on this orientation
    #[error("Duplicate offset {offset} (existing guide {existing_id} within {min_delta})")]
    DuplicateOffset {
        /// The rejected offset.
        offset: f64,
        /// The id of the conflicting guide.
        existing_id: u64,
        /// The configured minimum separation.
        min_delta: f64,
    },

    /// The guide is locked and cannot be mutated
    #[error("Guide {id} is locked")]
    Locked {
        /// The id of the locked guide.
        id: u64,
    },

    /// No guide with this id exists
    #[error("Guide {id} not found")]
    NotFound {
        /// The id that was looked up.
        id: u64,
    },

    /// The operation targets the wrong guide orientation
    #[error("Guide {id} has the wrong orientation for this operation")]
    AxisMismatch {
        /// The id of the mismatched guide.
        id: u64,
    },

    /// No group with this id exists
    #[error("Guide group {id} not found")]
    GroupNotFound {
        /// The group id that was looked up.
        id: u64,
    },
}

/// Construction-point store error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointError {
    /// Adding the point(s) would exceed the configured maximum
    #[error("Construction point limit reached ({limit})")]
    CapacityExceeded {
        /// The configured point limit.
        limit: usize,
    },

    /// No point with this id exists
    #[error("Construction point {id} not found")]
    NotFound {
        /// The id that was looked up.
        id: u64,
    },

    /// No points carry this batch id
    #[error("Construction point batch {batch_id} not found")]
    BatchNotFound {
        /// The batch id that was looked up.
        batch_id: u64,
    },
}

/// Geometry kernel error type
///
/// The kernel itself returns empty results for degenerate input; this type
/// exists for callers that validate input ahead of time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Segment endpoints coincide (within epsilon)
    #[error("Degenerate segment: length {length} below epsilon")]
    DegenerateSegment {
        /// The measured segment length.
        length: f64,
    },

    /// Radius is zero or negative
    #[error("Degenerate arc: radius {radius}")]
    DegenerateRadius {
        /// The rejected radius.
        radius: f64,
    },

    /// Step or count parameter cannot produce any samples
    #[error("Invalid sampling parameter: {reason}")]
    InvalidSampling {
        /// Why the parameter was rejected.
        reason: String,
    },
}

/// Main error type for GuideKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Guide store error
    #[error(transparent)]
    Guide(#[from] GuideError),

    /// Construction-point store error
    #[error(transparent)]
    Point(#[from] PointError),

    /// Geometry kernel error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a capacity error
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            Error::Guide(GuideError::CapacityExceeded { .. })
                | Error::Point(PointError::CapacityExceeded { .. })
        )
    }

    /// Check if this is a locked/missing precondition error
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::Guide(GuideError::Locked { .. })
                | Error::Guide(GuideError::NotFound { .. })
                | Error::Guide(GuideError::GroupNotFound { .. })
                | Error::Point(PointError::NotFound { .. })
                | Error::Point(PointError::BatchNotFound { .. })
        )
    }

    /// Check if this is a degenerate-geometry error
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
