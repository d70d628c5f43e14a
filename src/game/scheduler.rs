//! Frame-gated tick scheduling
//!
//! The host calls [`FrameScheduler::on_frame`] once per display frame. Ticks
//! are released at most once per `speed` milliseconds regardless of how often
//! frames arrive, and the scheduler stops re-arming as soon as the session
//! leaves [`SessionState::Running`].

use super::state::SessionState;

/// What the host should do with the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// Run one tick, then request the next frame
    Tick,
    /// Interval has not elapsed; request the next frame
    Wait,
    /// Session left Running; the loop is now disarmed
    Stop,
    /// No frame was requested; ignore this callback
    Idle,
}

#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    last_tick_ms: u64,
    armed: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the loop, measuring the first interval from `now_ms`
    pub fn arm(&mut self, now_ms: u64) {
        self.last_tick_ms = now_ms;
        self.armed = true;
    }

    /// Drop the outstanding frame request
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn last_tick_ms(&self) -> u64 {
        self.last_tick_ms
    }

    pub fn on_frame(&mut self, now_ms: u64, state: SessionState, speed_ms: u64) -> FrameDecision {
        if !self.armed {
            return FrameDecision::Idle;
        }

        if state != SessionState::Running {
            self.armed = false;
            return FrameDecision::Stop;
        }

        if now_ms.saturating_sub(self.last_tick_ms) >= speed_ms {
            self.last_tick_ms = now_ms;
            FrameDecision::Tick
        } else {
            FrameDecision::Wait
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_scheduler_ignores_frames() {
        let mut scheduler = FrameScheduler::new();
        assert_eq!(
            scheduler.on_frame(1_000, SessionState::Running, 300),
            FrameDecision::Idle
        );
    }

    #[test]
    fn test_ticks_at_most_once_per_interval() {
        let mut scheduler = FrameScheduler::new();
        scheduler.arm(0);

        let mut ticks = Vec::new();
        for frame in 1..=200u64 {
            let now = frame * 16;
            if scheduler.on_frame(now, SessionState::Running, 300) == FrameDecision::Tick {
                ticks.push(now);
            }
        }

        // First frame at or past 300ms is 19 * 16 = 304
        assert_eq!(ticks[0], 304);
        for pair in ticks.windows(2) {
            assert!(pair[1] - pair[0] >= 300);
            assert!(pair[1] - pair[0] < 300 + 16);
        }
        assert_eq!(ticks.len(), 200 * 16 / 304);
    }

    #[test]
    fn test_stop_disarms() {
        let mut scheduler = FrameScheduler::new();
        scheduler.arm(0);

        assert_eq!(
            scheduler.on_frame(16, SessionState::Paused, 300),
            FrameDecision::Stop
        );
        assert!(!scheduler.is_armed());

        // Resuming alone does not restart the loop
        assert_eq!(
            scheduler.on_frame(400, SessionState::Running, 300),
            FrameDecision::Idle
        );

        scheduler.arm(400);
        assert_eq!(
            scheduler.on_frame(416, SessionState::Running, 300),
            FrameDecision::Wait
        );
        assert_eq!(
            scheduler.on_frame(700, SessionState::Running, 300),
            FrameDecision::Tick
        );
    }

    #[test]
    fn test_speed_change_applies_next_frame() {
        let mut scheduler = FrameScheduler::new();
        scheduler.arm(0);

        assert_eq!(
            scheduler.on_frame(160, SessionState::Running, 300),
            FrameDecision::Wait
        );
        assert_eq!(
            scheduler.on_frame(176, SessionState::Running, 150),
            FrameDecision::Tick
        );
        assert_eq!(scheduler.last_tick_ms(), 176);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = FrameScheduler::new();
        scheduler.arm(0);
        scheduler.cancel();
        assert_eq!(
            scheduler.on_frame(1_000, SessionState::Running, 100),
            FrameDecision::Idle
        );
    }
}
