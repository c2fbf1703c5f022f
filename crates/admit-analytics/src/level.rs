//! Workload levels: weekly scheduled minutes bucketed into display bands.

use serde::Serialize;
use std::fmt;

/// Weekly-minute bands. `0` is unconfigured; each band above is 480 minutes wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadLevel {
    Unconfigured,
    Low,
    Normal,
    High,
    Overload,
}

impl WorkloadLevel {
    pub const ALL: [WorkloadLevel; 5] = [
        WorkloadLevel::Unconfigured,
        WorkloadLevel::Low,
        WorkloadLevel::Normal,
        WorkloadLevel::High,
        WorkloadLevel::Overload,
    ];

    pub fn classify(total_minutes: u64) -> Self {
        match total_minutes {
            0 => WorkloadLevel::Unconfigured,
            1..=479 => WorkloadLevel::Low,
            480..=959 => WorkloadLevel::Normal,
            960..=1439 => WorkloadLevel::High,
            _ => WorkloadLevel::Overload,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadLevel::Unconfigured => "unconfigured",
            WorkloadLevel::Low => "low",
            WorkloadLevel::Normal => "normal",
            WorkloadLevel::High => "high",
            WorkloadLevel::Overload => "overload",
        }
    }
}

impl fmt::Display for WorkloadLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
