//! Self-describing serialization envelope produced by every command.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current envelope schema version.
pub const ENVELOPE_VERSION: u32 = 1;

/// A serialized command record.
///
/// `data` fully determines the command's effect; replaying an envelope
/// against a compatible space reproduces the mutation without consulting
/// any other state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    /// Command kind discriminator, e.g. `"create_guide"`.
    pub kind: String,
    /// Unique id of this command instance.
    pub id: Uuid,
    /// Wall-clock time the envelope was produced.
    pub timestamp: DateTime<Utc>,
    /// Kind-specific payload.
    pub data: serde_json::Value,
    /// Schema version, for forward migration.
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    ENVELOPE_VERSION
}

impl CommandEnvelope {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            data,
            version: ENVELOPE_VERSION,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
