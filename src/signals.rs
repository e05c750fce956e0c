use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::{consts::SIGINT, consts::SIGTERM, iterator::Signals};

use crate::error::{Error, Result};

static STOP_FLAG: AtomicBool = AtomicBool::new(false);

pub fn should_stop() -> bool {
    STOP_FLAG.load(Ordering::Relaxed)
}

pub fn set_stop_flag() {
    STOP_FLAG.store(true, Ordering::Relaxed);
}

/// Registers SIGTERM/SIGINT to raise the stop flag. The loop drains its
/// current cycle and exits at the next tick boundary.
pub fn setup_signal_handlers() -> Result<()> {
    let mut signals = Signals::new([SIGTERM, SIGINT])
        .map_err(|e| Error::Daemon(format!("Failed to setup signal handlers: {}", e)))?;

    std::thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGTERM | SIGINT => {
                    log::info!("Received termination signal, shutting down gracefully");
                    set_stop_flag();
                }
                _ => {}
            }
        }
    });

    Ok(())
}
