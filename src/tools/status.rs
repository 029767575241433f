//! ComparaPreco Status Tool
//!
//! Provides runtime status information about the service, plus usage notes
//! for assistants driving the tools.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// How to run a comparison with the tools
pub const COMPARISON_INSTRUCTIONS: &str = r#"
# ComparaPreco Comparison Instructions

A comparison holds a list of candidates (package options of the same product).
Each candidate has a name, a price and a quantity. The unit value is
price / quantity and the cheapest unit value is marked as the best value.

## Workflow

1. `reset_comparison` to start clean (one blank candidate, id 1).
2. `set_comparison_unit` to the unit quantities are typed in: ml, L, g, kg, un
   (m and cm are also accepted).
3. `update_candidate` with field `price` and `quantity` for candidate 1.
4. `add_candidate` for every other package, then fill it the same way.
5. `get_comparison` shows each unit value and the `best_value_id`.
6. Optionally `save_comparison` to store the priced candidates as
   presentations of a product (new or existing).

## Input rules

- Prices and quantities are text. Both "3,50" and "3.50" are accepted.
  Only the leading number is read, so "2L" counts as 2 and "1,5,0" as 1,5.
- A candidate with an empty or non-numeric price/quantity, or quantity 0,
  has no unit value and shows "-". This is not an error.
- A best value is only marked when at least two candidates have a unit value.
  On a tie, the first candidate in the list wins.

## Saving

- Saving appends presentations; it never overwrites earlier ones.
- Candidates without a usable price/quantity are skipped and reported.
- Quantities are converted to the product's unit (e.g. L -> ml). Saving
  weights into a volume product is rejected.
"#;

/// Runtime status of the service
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/comparapreco.db"));
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert!(status.database_path.ends_with("comparapreco.db"));
    }
}
