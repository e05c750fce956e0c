use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::metrics::sample::{round_pct, StatsSample};
use crate::metrics::source::MetricSource;

/// Rate limit for the console summary. `last` starts out empty so the first
/// check always emits. Each sampler owns its own throttle clock.
pub struct SummaryThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl SummaryThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns true at most once per interval, advancing the clock when it
    /// does.
    pub fn should_emit(&mut self) -> bool {
        match self.last {
            Some(last) if last.elapsed() < self.interval => false,
            _ => {
                self.last = Some(Instant::now());
                true
            }
        }
    }
}

/// Collects the three host metrics, degrading per metric: a failed reading
/// is logged and reported as 0.0 while the others proceed.
pub struct StatsSampler<S> {
    source: S,
    disk_path: PathBuf,
    throttle: SummaryThrottle,
}

impl<S: MetricSource> StatsSampler<S> {
    pub fn new(source: S, disk_path: PathBuf, summary_interval: Duration) -> Self {
        Self {
            source,
            disk_path,
            throttle: SummaryThrottle::new(summary_interval),
        }
    }

    /// Produce one complete sample. Total: no accessor failure escapes.
    pub fn sample_all(&mut self) -> StatsSample {
        let cpu = match self.source.cpu_percent() {
            Ok(value) => round_pct(value),
            Err(e) => {
                log::error!("Failed to get CPU usage: {}", e);
                0.0
            }
        };

        let memory = match self.source.memory_percent() {
            Ok(value) => round_pct(value),
            Err(e) => {
                log::error!("Failed to get memory usage: {}", e);
                0.0
            }
        };

        let disk = match self.source.disk_percent(&self.disk_path) {
            Ok(value) => round_pct(value),
            Err(e) => {
                log::error!("Failed to get disk usage: {}", e);
                0.0
            }
        };

        let sample = StatsSample::new(cpu, memory, disk);

        if self.throttle.should_emit() {
            println!("{}", sample.summary_line());
        }

        sample
    }
}
