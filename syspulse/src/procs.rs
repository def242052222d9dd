//! Filtered, sorted projection of the latest process list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::types::ProcessSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Pid,
    Name,
    #[default]
    Cpu,
    Memory,
    Status,
    User,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Pid,
        SortColumn::Name,
        SortColumn::Cpu,
        SortColumn::Memory,
        SortColumn::Status,
        SortColumn::User,
    ];

    /// Field name used by the stream schema.
    pub fn key(self) -> &'static str {
        match self {
            SortColumn::Pid => "pid",
            SortColumn::Name => "name",
            SortColumn::Cpu => "cpu_percent",
            SortColumn::Memory => "memory_percent",
            SortColumn::Status => "status",
            SortColumn::User => "username",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SortColumn::Pid => "PID",
            SortColumn::Name => "Name",
            SortColumn::Cpu => "CPU %",
            SortColumn::Memory => "Mem %",
            SortColumn::Status => "Status",
            SortColumn::User => "User",
        }
    }

    fn compare(self, a: &ProcessSample, b: &ProcessSample) -> Ordering {
        match self {
            SortColumn::Pid => a.pid.cmp(&b.pid),
            SortColumn::Cpu => a.cpu_percent.partial_cmp(&b.cpu_percent).unwrap_or(Ordering::Equal),
            SortColumn::Memory => a
                .memory_percent
                .partial_cmp(&b.memory_percent)
                .unwrap_or(Ordering::Equal),
            SortColumn::Name => cmp_text(a.name.as_deref(), b.name.as_deref()),
            SortColumn::Status => cmp_text(Some(a.status.as_str()), Some(b.status.as_str())),
            SortColumn::User => cmp_text(a.username.as_deref(), b.username.as_deref()),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("unknown sort column '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

// Missing values sort as the empty string.
fn cmp_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.unwrap_or("").to_lowercase();
    let b = b.unwrap_or("").to_lowercase();
    a.cmp(&b)
}

#[derive(Debug, Default, Clone)]
pub struct ProcessView {
    processes: Vec<ProcessSample>,
    filter: String,
    sort_by: SortColumn,
    direction: SortDirection,
}

impl ProcessView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held list wholesale.
    pub fn set_processes(&mut self, list: Vec<ProcessSample>) {
        self.processes = list;
    }

    pub fn processes(&self) -> &[ProcessSample] {
        &self.processes
    }

    /// Stored as typed; matching ignores case.
    pub fn set_filter(&mut self, term: &str) {
        self.filter = term.to_string();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_sort(&mut self, column: SortColumn, direction: SortDirection) {
        self.sort_by = column;
        self.direction = direction;
    }

    /// Header-click semantics: the active column flips direction, a new column starts descending.
    pub fn select_sort(&mut self, column: SortColumn) {
        if self.sort_by == column {
            self.direction = self.direction.flipped();
        } else {
            self.sort_by = column;
            self.direction = SortDirection::Desc;
        }
    }

    pub fn sort(&self) -> (SortColumn, SortDirection) {
        (self.sort_by, self.direction)
    }

    fn matches(&self, p: &ProcessSample) -> bool {
        if self.filter.is_empty() {
            return true;
        }
        let term = self.filter.to_lowercase();
        let term = term.as_str();
        p.name.as_deref().is_some_and(|n| n.to_lowercase().contains(term))
            || p.pid.to_string().contains(term)
            || p.username.as_deref().is_some_and(|u| u.to_lowercase().contains(term))
    }

    /// Filter, then sort. Equal keys may come out in any order.
    pub fn project(&self) -> Vec<&ProcessSample> {
        let mut rows: Vec<&ProcessSample> =
            self.processes.iter().filter(|p| self.matches(p)).collect();
        let col = self.sort_by;
        match self.direction {
            SortDirection::Asc => rows.sort_unstable_by(|a, b| col.compare(a, b)),
            SortDirection::Desc => rows.sort_unstable_by(|a, b| col.compare(b, a)),
        }
        rows
    }
}
