//! The simulation clock: the single authoritative source of simulated time.
//!
//! One clock exists per mounted scene and is the only thing in the system
//! that writes `time`. The frame driver calls [`SimulationClock::tick`] once
//! per animation frame and threads the returned timestamp to every consumer,
//! so all bodies rendered in a frame observe the same instant.
//!
//! Wall-clock time is supplied by the caller as monotonic seconds; the clock
//! never reads a system timer on the frame path, which keeps it deterministic
//! under test.

use chrono::{DateTime, Duration, Utc};

/// Preset playback rates (simulated seconds per wall second).
pub mod rates {
    /// Real-time
    pub const REALTIME: f64 = 1.0;
    /// 1 minute per second
    pub const MINUTE_PER_SEC: f64 = 60.0;
    /// 1 hour per second
    pub const HOUR_PER_SEC: f64 = 3600.0;
    /// 1 day per second
    pub const DAY_PER_SEC: f64 = 86400.0;
    /// 1 week per second
    pub const WEEK_PER_SEC: f64 = 7.0 * 86400.0;
    /// 1 year per second
    pub const YEAR_PER_SEC: f64 = 365.25 * 86400.0;
}

/// Play/pause state with the wall-clock anchor captured on play.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ClockState {
    Paused,
    Running { wall_anchor: f64 },
}

/// The single mutable entity of the simulation core.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    time: DateTime<Utc>,
    rate: f64,
    state: ClockState,
}

impl SimulationClock {
    /// Create a paused clock at the given simulated time, rate 1.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            time: start,
            rate: 1.0,
            state: ClockState::Paused,
        }
    }

    /// Current simulated time. Reads never advance the clock.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    /// Start advancing, capturing the wall-clock reference. No-op if already
    /// running.
    pub fn play(&mut self, wall_now: f64) {
        if !self.is_running() {
            self.state = ClockState::Running {
                wall_anchor: wall_now,
            };
        }
    }

    /// Freeze simulated time, settling any wall-clock elapsed since the last
    /// observation first.
    pub fn pause(&mut self, wall_now: f64) {
        self.settle(wall_now);
        self.state = ClockState::Paused;
    }

    /// Change the rate multiplier without changing state. Negative rates run
    /// time backward. A zero rate is rejected: "not advancing" has exactly
    /// one representation, `pause`.
    pub fn set_rate(&mut self, rate: f64, wall_now: f64) {
        assert!(
            rate != 0.0 && rate.is_finite(),
            "clock rate must be finite and non-zero; use pause() to stop"
        );
        // Settle at the old rate so the change is not retroactive.
        self.settle(wall_now);
        self.rate = rate;
    }

    /// Jump to an absolute simulated time. While running, the wall-clock
    /// reference is re-anchored so advancement continues smoothly from the
    /// new time instead of replaying the old anchor's backlog.
    pub fn seek(&mut self, time: DateTime<Utc>, wall_now: f64) {
        self.time = time;
        if self.is_running() {
            self.state = ClockState::Running {
                wall_anchor: wall_now,
            };
        }
    }

    /// Seek to the current wall-clock UTC instant and restore rate 1.
    pub fn reset_to_now(&mut self, wall_now: f64) {
        self.seek(Utc::now(), wall_now);
        self.rate = 1.0;
    }

    /// Advance by elapsed wall time times rate and return the new simulated
    /// time. Call exactly once per frame and thread the result everywhere.
    pub fn tick(&mut self, wall_now: f64) -> DateTime<Utc> {
        self.settle(wall_now);
        self.time
    }

    fn settle(&mut self, wall_now: f64) {
        if let ClockState::Running { wall_anchor } = self.state {
            let sim_secs = (wall_now - wall_anchor) * self.rate;
            self.time = self.time + duration_from_secs(sim_secs);
            self.state = ClockState::Running {
                wall_anchor: wall_now,
            };
        }
    }
}

/// Signed f64 seconds to a chrono Duration, split into whole seconds and
/// nanoseconds to keep precision over large magnitudes.
fn duration_from_secs(secs: f64) -> Duration {
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9) as i64;
    Duration::seconds(whole) + Duration::nanoseconds(nanos)
}
