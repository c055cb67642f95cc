use serde::{Deserialize, Serialize};

/// Version record kept by [`FileEngine`](super::FileEngine).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    /// Last applied version; `None` before the first migration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Set while a migration step is in progress or after it failed.
    #[serde(default)]
    pub dirty: bool,
}

impl EngineState {
    /// The version as a signed number, `-1` when none is recorded.
    pub fn signed_version(&self) -> i64 {
        self.version
            .map(|v| i64::try_from(v).unwrap_or(i64::MAX))
            .unwrap_or(-1)
    }
}
