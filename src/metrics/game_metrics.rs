use std::time::{Duration, Instant};

/// Per-run play statistics shown in the header.
///
/// Play time only accumulates while a round is running. Nothing here outlives
/// the process.
pub struct GameMetrics {
    accumulated: Duration,
    running_since: Option<Instant>,
    pub best_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new(now: Instant) -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: Some(now),
            best_score: 0,
            games_played: 0,
        }
    }

    /// Play time of the current round
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }

    pub fn on_game_start(&mut self, now: Instant) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(now);
    }

    pub fn on_pause(&mut self, now: Instant) {
        self.accumulated = self.elapsed(now);
        self.running_since = None;
    }

    pub fn on_resume(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn on_game_over(&mut self, now: Instant, final_score: u32) {
        self.on_pause(now);
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self, now: Instant) -> String {
        let total_secs = self.elapsed(now).as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}
