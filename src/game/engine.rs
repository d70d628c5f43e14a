use super::{
    config::GameConfig,
    feedback::{Feedback, FeedbackKind},
    heading::Heading,
    state::{Bounds, CollisionType, GameState, Position, SessionState},
};
use rand::Rng;

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Heading the snake moved along (or would have, on a collision)
    pub heading: Heading,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// What ended the round, if this tick ended it
    pub collision: Option<CollisionType>,
    /// Whether the round is over after this tick
    pub game_over: bool,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: rand::thread_rng(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fresh state with the configured start values on the given board
    pub fn reset(&mut self, bounds: Bounds) -> GameState {
        let snake = self.config.start_snake();

        let food = if bounds.contains(self.config.start_food) {
            self.config.start_food
        } else {
            log::debug!(
                "start food {:?} is off the board, placing it randomly",
                self.config.start_food
            );
            self.spawn_food(bounds)
        };

        GameState::new(snake, food, bounds)
    }

    /// Advance the snake by one cell.
    ///
    /// Ticking a state that is not running changes nothing.
    pub fn tick(
        &mut self,
        state: &mut GameState,
        pending: Heading,
        feedback: &mut dyn Feedback,
    ) -> TickOutcome {
        if state.status != SessionState::Running {
            return TickOutcome {
                heading: state.snake.heading,
                ate_food: false,
                collision: None,
                game_over: state.is_game_over(),
            };
        }

        let heading = state.snake.heading.resolve(pending);
        let new_head = state.snake.head().stepped(heading);
        let ate_food = new_head == state.food;

        if let Some(collision) = self.check_collision(state, new_head, ate_food) {
            state.status = SessionState::GameOver;
            state.collision = Some(collision);
            feedback.notify(FeedbackKind::Error);
            log::info!(
                "game over: {:?} at {:?}, score {}",
                collision,
                new_head,
                state.score
            );

            return TickOutcome {
                heading,
                ate_food: false,
                collision: Some(collision),
                game_over: true,
            };
        }

        if ate_food {
            feedback.notify(FeedbackKind::Success);
            state.food = self.spawn_food(state.bounds);
            state.score += self.config.score_increment;
            log::debug!(
                "food eaten at {:?}, score {}, next food {:?}",
                new_head,
                state.score,
                state.food
            );
        }

        state.snake.advance(new_head, ate_food);
        state.snake.heading = heading;
        state.steps += 1;

        TickOutcome {
            heading,
            ate_food,
            collision: None,
            game_over: false,
        }
    }

    fn check_collision(
        &self,
        state: &GameState,
        pos: Position,
        growing: bool,
    ) -> Option<CollisionType> {
        if !state.bounds.contains(pos) {
            return Some(CollisionType::Wall);
        }

        if self.config.self_collision && state.snake.occupied_after_move(pos, growing) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Uniformly random cell inside the (inclusive) bounds
    fn spawn_food(&mut self, bounds: Bounds) -> Position {
        let x = self.rng.gen_range(bounds.min_x..=bounds.max_x);
        let y = self.rng.gen_range(bounds.min_y..=bounds.max_y);
        Position::new(x, y)
    }
}
