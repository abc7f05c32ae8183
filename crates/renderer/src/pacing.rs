use std::time::{Duration, Instant};

/// Decides when the event loop should request the next redraw.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next_deadline: Option<Instant>,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: interval_for(fps),
            next_deadline: None,
        }
    }

    /// Changes the target rate. The next frame is due immediately.
    pub fn set_frame_rate(&mut self, fps: u32) {
        self.interval = interval_for(fps);
        self.next_deadline = None;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ready(&self, now: Instant) -> bool {
        self.next_deadline.map_or(true, |deadline| now >= deadline)
    }

    /// Schedules the following frame one interval after the previous
    /// deadline, re-anchoring to `now` if the loop fell a whole interval
    /// behind.
    pub fn mark_rendered(&mut self, now: Instant) {
        let next = match self.next_deadline {
            Some(deadline) => deadline + self.interval,
            None => now + self.interval,
        };
        self.next_deadline = Some(if next <= now { now + self.interval } else { next });
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }

    pub fn reset(&mut self) {
        self.next_deadline = None;
    }
}

fn interval_for(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.max(1)))
}
