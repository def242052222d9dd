//! Types that mirror the metrics stream's JSON schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskCounters {
    // cumulative since the collector started; the client diffs to get rates
    pub read_bytes: u64,
    pub write_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSample {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    #[serde(default)]
    pub memory_used_gb: f64,
    #[serde(default)]
    pub memory_total_gb: f64,
    #[serde(default)]
    pub uptime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskCounters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkCounters>,
}

/// Process state as reported by the host. Only "running" is distinguished;
/// everything else keeps its raw label for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessStatus {
    Running,
    Other(String),
}

impl ProcessStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProcessStatus::Running => "running",
            ProcessStatus::Other(s) => s,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ProcessStatus::Running)
    }
}

impl Default for ProcessStatus {
    fn default() -> Self {
        ProcessStatus::Other("unknown".into())
    }
}

impl From<String> for ProcessStatus {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("running") {
            ProcessStatus::Running
        } else {
            ProcessStatus::Other(s)
        }
    }
}

impl From<ProcessStatus> for String {
    fn from(s: ProcessStatus) -> Self {
        match s {
            ProcessStatus::Running => "running".into(),
            ProcessStatus::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    #[serde(default)]
    pub status: ProcessStatus,
    #[serde(default)]
    pub username: Option<String>,
}

/// One complete stream message. Applied as a unit or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub system: SystemSample,
    #[serde(default)]
    pub process_count: usize,
    #[serde(default)]
    pub processes: Vec<ProcessSample>,
}
