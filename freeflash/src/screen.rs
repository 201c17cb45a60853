use kernel_patcher::{MountRequest, Result};
use log::{error, info};
use std::thread;
use std::time::Duration;

/// How long the outcome stays up before the program exits
pub const DISPLAY_TIME: Duration = Duration::from_secs(6);

/// Presents the result of a run to the user.
pub trait OutcomeScreen {
    fn show(&mut self, outcome: &Result<()>);
}

/// Reports the outcome through the log and holds it for a while.
pub struct LogScreen {
    hold: Duration,
    backend: &'static str,
}

impl LogScreen {
    pub fn new(hold: Duration, backend: &'static str) -> Self {
        LogScreen { hold, backend }
    }

    /// The line shown for an outcome, naming the backend it was reached on
    pub fn describe(&self, outcome: &Result<()>) -> String {
        match outcome {
            Ok(()) => format!(
                "OK: {} is mounted writable ({})",
                MountRequest::FLASH.mount_point,
                self.backend
            ),
            Err(err) => format!("ERROR: {} ({})", err, self.backend),
        }
    }
}

impl OutcomeScreen for LogScreen {
    fn show(&mut self, outcome: &Result<()>) {
        let line = self.describe(outcome);
        match outcome {
            Ok(()) => info!("{}", line),
            Err(_) => error!("{}", line),
        }
        thread::sleep(self.hold);
    }
}
