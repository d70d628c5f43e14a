use super::{
    config::GameConfig,
    engine::{GameEngine, TickOutcome},
    feedback::Feedback,
    heading::Heading,
    scheduler::{FrameDecision, FrameScheduler},
    state::{Bounds, CollisionType, GameState, SessionState},
};

/// One play session: the canonical game state plus everything the player can
/// change between ticks.
///
/// Ticks mutate `state` in place, so every tick sees the state committed by
/// the one before it. Renderers only get shared references.
pub struct Session<F: Feedback> {
    engine: GameEngine,
    state: GameState,
    pending: Heading,
    speed_ms: u64,
    scheduler: FrameScheduler,
    feedback: F,
}

impl<F: Feedback> Session<F> {
    /// Start a running session on `bounds`, timing the first tick from `now_ms`
    pub fn new(config: GameConfig, bounds: Bounds, feedback: F, now_ms: u64) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset(bounds);
        let pending = engine.config().start_heading;
        let speed_ms = engine.config().initial_speed;

        let mut scheduler = FrameScheduler::new();
        scheduler.arm(now_ms);

        log::info!(
            "session started: {}x{} board, speed {}ms",
            bounds.columns(),
            bounds.rows(),
            speed_ms
        );

        Self {
            engine,
            state,
            pending,
            speed_ms,
            scheduler,
            feedback,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> SessionState {
        self.state.status
    }

    pub fn pending(&self) -> Heading {
        self.pending
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Whether the frame loop still expects callbacks
    pub fn is_looping(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Request a heading for the next tick, replacing any earlier request
    pub fn steer(&mut self, heading: Heading) {
        self.pending = heading;
    }

    /// Frame callback. Returns the tick outcome when this frame ran a tick.
    pub fn on_frame(&mut self, now_ms: u64) -> Option<TickOutcome> {
        let decision = self
            .scheduler
            .on_frame(now_ms, self.state.status, self.speed_ms);
        log::trace!("frame at {}ms: {:?}", now_ms, decision);

        match decision {
            FrameDecision::Tick => {
                let outcome = self
                    .engine
                    .tick(&mut self.state, self.pending, &mut self.feedback);
                if outcome.game_over {
                    self.scheduler.cancel();
                }
                Some(outcome)
            }
            FrameDecision::Wait | FrameDecision::Stop | FrameDecision::Idle => None,
        }
    }

    /// Pause a running game or resume a paused one. No effect after game over.
    pub fn toggle_pause(&mut self, now_ms: u64) {
        match self.state.status {
            SessionState::Running => {
                self.state.status = SessionState::Paused;
                self.scheduler.cancel();
                log::info!("paused");
            }
            SessionState::Paused => {
                self.state.status = SessionState::Running;
                self.scheduler.arm(now_ms);
                log::info!("resumed");
            }
            SessionState::GameOver => {}
        }
    }

    /// Reset every field to its start value and resume running
    pub fn restart(&mut self, now_ms: u64) {
        self.state = self.engine.reset(self.state.bounds);
        self.pending = self.engine.config().start_heading;
        self.speed_ms = self.engine.config().initial_speed;
        self.scheduler.arm(now_ms);
        log::info!("session restarted");
    }

    /// Give up the current round
    pub fn forfeit(&mut self) {
        if self.state.status == SessionState::GameOver {
            return;
        }
        self.state.status = SessionState::GameOver;
        self.state.collision = Some(CollisionType::Forfeit);
        self.scheduler.cancel();
        log::info!("round forfeited with score {}", self.state.score);
    }

    /// Shorten the tick interval by one step, down to the configured floor
    pub fn faster(&mut self) {
        self.speed_ms = self.engine.config().faster(self.speed_ms);
        log::debug!("speed now {}ms", self.speed_ms);
    }

    /// Lengthen the tick interval by one step
    pub fn slower(&mut self) {
        self.speed_ms = self.engine.config().slower(self.speed_ms);
        log::debug!("speed now {}ms", self.speed_ms);
    }

    /// Cancel the outstanding frame request on teardown
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
    }
}
