//! The mutation handle commands operate through.

use guidekit_core::config::ConstructionConfig;

use crate::guide_store::GuideStore;
use crate::point_store::PointStore;

/// Owns the guide and construction-point stores.
///
/// Commands receive this handle explicitly on execute/undo instead of
/// reaching for shared state, so the same command types work against any
/// number of independent documents.
pub struct ConstructionSpace {
    pub guides: GuideStore,
    pub points: PointStore,
}

impl ConstructionSpace {
    pub fn new() -> Self {
        Self::with_config(ConstructionConfig::default())
    }

    pub fn with_config(config: ConstructionConfig) -> Self {
        Self {
            guides: GuideStore::with_config(config.clone()),
            points: PointStore::with_config(config),
        }
    }

    pub fn config(&self) -> &ConstructionConfig {
        self.guides.config()
    }
}

impl Default for ConstructionSpace {
    fn default() -> Self {
        Self::new()
    }
}
