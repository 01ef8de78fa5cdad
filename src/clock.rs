use std::{thread::sleep, time::{Duration, Instant}};

/// Source of the current time for tick gating.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Calls back into the game loop once per display frame.
pub trait Scheduler {
    fn wait_frame(&mut self);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Sleeps a fixed, short interval between frames. The game tick delay is
/// unrelated to this and is enforced by `TickTimer`.
pub struct FrameScheduler {
    interval: Duration,
}

impl FrameScheduler {
    pub fn new(interval: Duration) -> Self {
        FrameScheduler { interval }
    }
}

impl Scheduler for FrameScheduler {
    fn wait_frame(&mut self) {
        sleep(self.interval);
    }
}

/// Decides whether enough time has passed for the next game tick.
pub struct TickTimer {
    delay: Duration,
    last_tick: Instant,
}

impl TickTimer {
    pub fn new(delay: Duration, now: Instant) -> Self {
        TickTimer { delay, last_tick: now }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_tick) >= self.delay
    }

    pub fn mark(&mut self, now: Instant) {
        self.last_tick = now;
    }
}
