//! Turns cumulative disk/network byte counters into bytes-per-second rates.

use std::time::Instant;

use tracing::debug;

use crate::types::{DiskCounters, NetworkCounters, SystemSample};

/// Counters seen on the previous tick of the current connection epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBaseline {
    pub disk: Option<DiskCounters>,
    pub network: Option<NetworkCounters>,
    pub observed_at: Instant,
}

/// Rates in bytes/s. `None` means no rate could be derived for that channel this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IoRates {
    pub disk_read: Option<f64>,
    pub disk_write: Option<f64>,
    pub upload: Option<f64>,
    pub download: Option<f64>,
}

impl IoRates {
    pub fn upload_or_zero(&self) -> f64 {
        self.upload.unwrap_or(0.0)
    }

    pub fn download_or_zero(&self) -> f64 {
        self.download.unwrap_or(0.0)
    }
}

/// Clamped rate between two counter readings. A counter that went backwards
/// (collector restart, host reboot) yields zero.
pub fn counter_rate(prev: u64, curr: u64, elapsed_secs: f64) -> f64 {
    let delta = curr as f64 - prev as f64;
    (delta / elapsed_secs).max(0.0)
}

#[derive(Debug, Default)]
pub struct RateEngine {
    baseline: Option<RateBaseline>,
    last: IoRates,
}

impl RateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the baseline; the next sample only seeds a new one.
    pub fn reset(&mut self) {
        self.baseline = None;
    }

    pub fn baseline(&self) -> Option<&RateBaseline> {
        self.baseline.as_ref()
    }

    /// Rates produced by the most recent non-skipped tick.
    pub fn last(&self) -> IoRates {
        self.last
    }

    /// Feed one sample observed at `now`.
    ///
    /// If `now` is not strictly after the baseline timestamp the tick is skipped:
    /// the baseline is kept and the previous rates are returned unchanged.
    pub fn observe(&mut self, sample: &SystemSample, now: Instant) -> IoRates {
        let elapsed = match self.baseline.as_ref() {
            Some(base) => match now.checked_duration_since(base.observed_at) {
                Some(d) if !d.is_zero() => Some(d.as_secs_f64()),
                _ => {
                    debug!("non-positive elapsed time since last sample, skipping rate tick");
                    return self.last;
                }
            },
            None => None,
        };

        let base = self.baseline.as_ref();
        let mut rates = IoRates::default();
        if let Some(dt) = elapsed {
            if let (Some(prev), Some(curr)) = (base.and_then(|b| b.disk), sample.disk) {
                if curr.read_bytes < prev.read_bytes || curr.write_bytes < prev.write_bytes {
                    debug!("disk counters went backwards, clamping rate to zero");
                }
                rates.disk_read = Some(counter_rate(prev.read_bytes, curr.read_bytes, dt));
                rates.disk_write = Some(counter_rate(prev.write_bytes, curr.write_bytes, dt));
            }
            if let (Some(prev), Some(curr)) = (base.and_then(|b| b.network), sample.network) {
                if curr.bytes_sent < prev.bytes_sent || curr.bytes_recv < prev.bytes_recv {
                    debug!("network counters went backwards, clamping rate to zero");
                }
                rates.upload = Some(counter_rate(prev.bytes_sent, curr.bytes_sent, dt));
                rates.download = Some(counter_rate(prev.bytes_recv, curr.bytes_recv, dt));
            }
        }

        self.baseline = Some(RateBaseline {
            disk: sample.disk,
            network: sample.network,
            observed_at: now,
        });
        self.last = rates;
        rates
    }
}
