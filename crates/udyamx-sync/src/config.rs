//! Sync settings.
//!
//! Stored as the `[sync]` table of the app config file:
//!
//! ```toml
//! [sync]
//! delay_ms = 1500
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Upper bound for `delay_ms`; anything longer is almost certainly a typo.
const MAX_DELAY_MS: u64 = 600_000;

fn default_delay_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Wait between coming online and flipping queued invoices.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            delay_ms: default_delay_ms(),
        }
    }
}

impl SyncSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.delay_ms > MAX_DELAY_MS {
            return Err(SyncError::InvalidConfig(format!(
                "sync.delay_ms must be at most {MAX_DELAY_MS}, got {}",
                self.delay_ms
            )));
        }
        Ok(())
    }
}
