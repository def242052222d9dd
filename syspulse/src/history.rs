//! Bounded, co-indexed history buffers for the charts.

use std::collections::VecDeque;

pub const DEFAULT_MAX_DATA_POINTS: usize = 60;

// Appends at the tail, then drops at most one element from the head.
pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) -> Option<T> {
    dq.push_back(v);
    if dq.len() > cap {
        dq.pop_front()
    } else {
        None
    }
}

/// Which numeric series of the window to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Cpu,
    Memory,
    Upload,
    Download,
}

/// One point in time as pushed into the window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSample {
    pub label: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub upload_kbps: f64,
    pub download_kbps: f64,
}

/// Sliding window of the most recent samples sharing one time axis.
///
/// The five sequences are only ever touched together through [`MetricsWindow::push`],
/// so they always have equal length, never above `cap`.
#[derive(Debug, Clone)]
pub struct MetricsWindow {
    labels: VecDeque<String>,
    cpu: VecDeque<f64>,
    memory: VecDeque<f64>,
    upload: VecDeque<f64>,
    download: VecDeque<f64>,
    cap: usize,
}

impl MetricsWindow {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            labels: VecDeque::new(),
            cpu: VecDeque::new(),
            memory: VecDeque::new(),
            upload: VecDeque::new(),
            download: VecDeque::new(),
            cap,
        }
    }

    pub fn push(&mut self, sample: WindowSample) {
        let cap = self.cap;
        push_capped(&mut self.labels, sample.label, cap);
        push_capped(&mut self.cpu, sample.cpu_percent, cap);
        push_capped(&mut self.memory, sample.memory_percent, cap);
        push_capped(&mut self.upload, sample.upload_kbps, cap);
        push_capped(&mut self.download, sample.download_kbps, cap);
        debug_assert!(self.is_aligned());
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn labels(&self) -> &VecDeque<String> {
        &self.labels
    }

    pub fn series(&self, which: Series) -> &VecDeque<f64> {
        match which {
            Series::Cpu => &self.cpu,
            Series::Memory => &self.memory,
            Series::Upload => &self.upload,
            Series::Download => &self.download,
        }
    }

    pub fn latest(&self, which: Series) -> Option<f64> {
        self.series(which).back().copied()
    }

    pub fn peak(&self, which: Series) -> f64 {
        self.series(which).iter().copied().fold(0.0_f64, f64::max)
    }

    /// Labels plus the four numeric series, in chart order (cpu, memory, upload, download).
    pub fn chart_data(&self) -> (Vec<String>, Vec<Vec<f64>>) {
        let labels = self.labels.iter().cloned().collect();
        let series = [Series::Cpu, Series::Memory, Series::Upload, Series::Download]
            .into_iter()
            .map(|s| self.series(s).iter().copied().collect())
            .collect();
        (labels, series)
    }

    fn is_aligned(&self) -> bool {
        let n = self.labels.len();
        n <= self.cap
            && self.cpu.len() == n
            && self.memory.len() == n
            && self.upload.len() == n
            && self.download.len() == n
    }
}

impl Default for MetricsWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DATA_POINTS)
    }
}
