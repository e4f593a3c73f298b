//! Global settings shared by all employees.

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Scheduled start used when neither the employee nor the global settings set one.
pub fn fallback_scheduled_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

fn default_time_zone() -> Tz {
    Tz::UTC
}

/// Singleton settings for the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Default scheduled start time for employees without an override.
    #[serde(default)]
    pub scheduled_start_time: Option<NaiveTime>,
    /// Business time zone. Calendar dates and scheduled starts are local to it.
    #[serde(default = "default_time_zone")]
    pub time_zone: Tz,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            scheduled_start_time: None,
            time_zone: default_time_zone(),
        }
    }
}
