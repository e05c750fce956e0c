use std::time::Duration;

use crate::metrics::{MetricSource, StatsSampler};
use crate::transport::{CallError, Transport};

/// One sample-and-send cycle. `tick` is the loop body handed to the driver:
/// it samples, serializes, calls out, classifies any failure into a log
/// line, and hands back how long to idle before the next cycle. Nothing in
/// here propagates — a failed cycle must never stop the next one.
pub struct Reporter<S, T> {
    sampler: StatsSampler<S>,
    transport: T,
    method: String,
    idle: Duration,
}

impl<S: MetricSource, T: Transport> Reporter<S, T> {
    pub fn new(sampler: StatsSampler<S>, transport: T, method: String, idle: Duration) -> Self {
        Self {
            sampler,
            transport,
            method,
            idle,
        }
    }

    pub fn tick(&mut self) -> Duration {
        let sample = self.sampler.sample_all();

        let payload = match serde_json::to_string(&sample) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Failed to serialize stats sample: {}", e);
                return self.idle;
            }
        };

        match self.transport.call(&self.method, &payload) {
            Ok(()) => log::debug!("Sent system stats: {}", payload),
            Err(CallError::Timeout(detail)) => {
                log::warn!("Stats call timeout - peer may be unresponsive: {}", detail);
            }
            Err(CallError::Connection(detail)) => {
                log::error!("Stats transport connection failed: {}", detail);
            }
            Err(CallError::InvalidArgument(detail)) => {
                log::error!("Invalid argument in stats call: {}", detail);
            }
            Err(CallError::Other(detail)) => {
                log::error!("Unexpected stats call error: {}", detail);
            }
        }

        self.idle
    }

    /// The transport, for tests that need to inspect recorded calls.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::source::ProbeError;
    use crate::metrics::StatsSampler;
    use crate::transport::FakeTransport;
    use std::path::{Path, PathBuf};

    struct ConstSource {
        cpu: f64,
        memory: f64,
        disk: f64,
    }

    impl MetricSource for ConstSource {
        fn cpu_percent(&mut self) -> Result<f64, ProbeError> {
            Ok(self.cpu)
        }

        fn memory_percent(&mut self) -> Result<f64, ProbeError> {
            Ok(self.memory)
        }

        fn disk_percent(&mut self, _path: &Path) -> Result<f64, ProbeError> {
            Ok(self.disk)
        }
    }

    fn reporter(transport: FakeTransport) -> Reporter<ConstSource, FakeTransport> {
        let source = ConstSource {
            cpu: 12.3,
            memory: 45.6,
            disk: 78.9,
        };
        let sampler = StatsSampler::new(source, PathBuf::from("/"), Duration::from_secs(3600));
        Reporter::new(
            sampler,
            transport,
            "receive_system_stats".to_string(),
            Duration::from_millis(200),
        )
    }

    #[test]
    fn test_success_sends_payload_and_returns_idle_hint() {
        let mut reporter = reporter(FakeTransport::always_ok());
        let idle = reporter.tick();
        assert_eq!(idle, Duration::from_millis(200));

        let calls = reporter.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "receive_system_stats");
        assert_eq!(
            calls[0].1,
            r#"{"cpu":12.3,"memory":45.6,"disk":78.9,"network_rx":0.0}"#
        );
    }

    #[test]
    fn test_every_failure_kind_is_swallowed() {
        let failures = vec![
            CallError::Timeout("deadline".to_string()),
            CallError::Connection("refused".to_string()),
            CallError::InvalidArgument("bad method".to_string()),
            CallError::Other("boom".to_string()),
        ];

        for failure in failures {
            let mut reporter = reporter(FakeTransport::new(vec![Err(failure)]));
            // Same contract as the success path: tick returns the hint.
            let idle = reporter.tick();
            assert_eq!(idle, Duration::from_millis(200));
            assert_eq!(reporter.transport().calls().len(), 1);
        }
    }

    #[test]
    fn test_failed_tick_does_not_affect_next_tick() {
        let mut reporter = reporter(FakeTransport::new(vec![Err(CallError::Connection(
            "refused".to_string(),
        ))]));
        reporter.tick();
        reporter.tick();
        assert_eq!(reporter.transport().calls().len(), 2);
    }

    #[test]
    fn test_n_ticks_produce_n_valid_payloads() {
        let mut reporter = reporter(FakeTransport::always_ok());
        for _ in 0..5 {
            reporter.tick();
        }

        let calls = reporter.transport().calls();
        assert_eq!(calls.len(), 5);
        for (method, payload) in calls {
            assert_eq!(method, "receive_system_stats");
            let value: serde_json::Value = serde_json::from_str(payload).unwrap();
            for key in ["cpu", "memory", "disk", "network_rx"] {
                assert!(value[key].is_number(), "missing numeric key {}", key);
            }
            assert_eq!(value.as_object().unwrap().len(), 4);
        }
    }
}
