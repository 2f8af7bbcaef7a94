use alloc::format;
use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Session stopwatch, started by the first accepted flip.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimer {
    started_at: Option<Millis>,
    stopped_at: Option<Millis>,
}

impl GameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.stopped_at.is_none()
    }

    pub fn started_at(&self) -> Option<Millis> {
        self.started_at
    }

    /// Records the start, later calls keep the first timestamp.
    pub fn start(&mut self, now: Millis) {
        if self.started_at.is_none() {
            log::debug!("Timer started at {}", now);
            self.started_at = Some(now);
        }
    }

    pub fn stop(&mut self, now: Millis) {
        if self.is_running() {
            log::debug!("Timer stopped at {}", now);
            self.stopped_at = Some(now);
        }
    }

    /// Milliseconds between start and stop, or until `now` while running, 0 if not started.
    pub fn elapsed_ms(&self, now: Millis) -> Millis {
        match self.started_at {
            Some(started_at) => self.stopped_at.unwrap_or(now).saturating_sub(started_at),
            None => 0,
        }
    }

    pub fn elapsed_secs(&self, now: Millis) -> u64 {
        self.elapsed_ms(now) / 1000
    }
}

/// Formats whole seconds as `MM:SS`, minutes keep counting past the hour.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Current wall clock as milliseconds since the Unix epoch.
pub fn wall_clock_millis() -> Millis {
    use web_time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(Millis::MAX))
        .unwrap_or(0)
}
