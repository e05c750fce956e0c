use chrono::Local;
use serde::Serialize;

/// One reading of host utilization, built fresh each cycle and sent as-is.
///
/// Field order matches the wire format the receiver knows. `network_rx` is
/// always 0.0; the receiver still expects the key after the network probe
/// was removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSample {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub network_rx: f64,
}

impl StatsSample {
    pub fn new(cpu: f64, memory: f64, disk: f64) -> Self {
        Self {
            cpu,
            memory,
            disk,
            network_rx: 0.0,
        }
    }

    /// Console summary line, printed at most once per throttle interval.
    pub fn summary_line(&self) -> String {
        format!(
            "[{}] CPU: {:.1}%, Memory: {:.1}%, Disk: {:.1}%",
            Local::now().format("%H:%M:%S"),
            self.cpu,
            self.memory,
            self.disk
        )
    }
}

/// Clamp to [0, 100] and round to one decimal, half away from zero.
pub fn round_pct(value: f64) -> f64 {
    (value.clamp(0.0, 100.0) * 10.0).round() / 10.0
}
