//! Runtime configuration for the construction stores.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunable limits and extents for a construction space.
///
/// The defaults match the drawing scale the tool ships with; embedders
/// working at a different scale should override `rotation_extent` rather
/// than rely on the 10,000-unit default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionConfig {
    /// Maximum number of guides the guide store accepts.
    pub max_guides: usize,
    /// Maximum number of construction points the point store accepts.
    pub max_points: usize,
    /// Minimum separation between two offsets on the same orientation.
    pub min_offset_delta: f64,
    /// Half-length used when an infinite guide is extended to a finite
    /// segment (rotation) and for polar-array spokes.
    pub rotation_extent: f64,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            max_guides: constants::MAX_GUIDES,
            max_points: constants::MAX_SNAP_POINTS,
            min_offset_delta: constants::MIN_OFFSET_DELTA,
            rotation_extent: constants::DEFAULT_ROTATION_EXTENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_constants() {
        let config = ConstructionConfig::default();
        assert_eq!(config.max_guides, constants::MAX_GUIDES);
        assert_eq!(config.max_points, constants::MAX_SNAP_POINTS);
        assert_eq!(config.rotation_extent, constants::DEFAULT_ROTATION_EXTENT);
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = ConstructionConfig {
            rotation_extent: 250.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ConstructionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
