use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::metrics::{StatsSampler, SysinfoSource};
use crate::report::Reporter;
use crate::signals;
use crate::transport::UnixSocketTransport;

/// Wires the production sampler and transport together and drives the
/// report loop until a stop signal arrives.
pub struct App {
    reporter: Reporter<SysinfoSource, UnixSocketTransport>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let sampler = StatsSampler::new(
            SysinfoSource::new(),
            config.sampler.disk_path.clone(),
            Duration::from_secs(config.sampler.summary_interval_secs),
        );

        let transport = UnixSocketTransport::new(
            config.transport.socket.clone(),
            Duration::from_millis(config.transport.timeout_ms),
        );

        let reporter = Reporter::new(
            sampler,
            transport,
            config.report.method.clone(),
            Duration::from_millis(config.report.interval_ms),
        );

        Self { reporter }
    }

    pub fn run(mut self) -> Result<()> {
        signals::setup_signal_handlers()?;

        log::info!("Starting report loop");

        loop {
            if signals::should_stop() {
                log::info!("Stop signal received");
                break;
            }

            let idle = self.reporter.tick();
            std::thread::sleep(idle);
        }

        Ok(())
    }
}
