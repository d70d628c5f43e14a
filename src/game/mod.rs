//! Core game logic module for Snake
//!
//! This module contains the tick, collision and scheduling rules without any
//! I/O or rendering dependencies. Hosts drive a [`Session`] with frame
//! callbacks and player input, and read its state back for rendering.

pub mod config;
pub mod engine;
pub mod feedback;
pub mod heading;
pub mod scheduler;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use config::{GameConfig, GridLayout, Insets};
pub use engine::{GameEngine, TickOutcome};
pub use feedback::{Feedback, FeedbackKind, LogFeedback, TerminalBell};
pub use heading::Heading;
pub use scheduler::{FrameDecision, FrameScheduler};
pub use session::Session;
pub use state::{Bounds, CollisionType, GameState, Position, SessionState, Snake, Viewport};
