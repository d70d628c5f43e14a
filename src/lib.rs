//! Swipe Snake - a Snake game driven by drag gestures
//!
//! This library provides:
//! - Core game logic: heading resolution, tick and collision rules, frame
//!   scheduling and session lifecycle (game module)
//! - Gesture and keyboard input mapping (input module)
//! - TUI rendering (render module)
//! - Per-run play statistics (metrics module)
//! - The interactive terminal host (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
