use anyhow::{Context, Result, anyhow};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, Stdout, stderr, stdout};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{Bounds, Feedback, GameConfig, Session, SessionState, TerminalBell, Viewport};
use crate::input::{DragTracker, InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Display refresh the frame callbacks emulate (~60 Hz)
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Interactive play in the terminal.
///
/// Stands in for the mobile screen: a fixed-rate frame clock plays the role of
/// animation-frame callbacks, mouse drags are the swipe gestures, and the
/// terminal bell is the failure cue.
pub struct HumanMode<F: Feedback> {
    session: Session<F>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    drag: DragTracker,
    epoch: Instant,
    should_quit: bool,
}

impl HumanMode<TerminalBell<Stdout>> {
    /// Size the board from the current terminal and start a session
    pub fn for_terminal(config: GameConfig) -> Result<Self> {
        let (width, height) =
            crossterm::terminal::size().context("Failed to query terminal size")?;
        Self::with_viewport(config, Viewport::new(width, height), TerminalBell::new(stdout()))
    }
}

impl<F: Feedback> HumanMode<F> {
    pub fn with_viewport(config: GameConfig, viewport: Viewport, feedback: F) -> Result<Self> {
        let bounds = Bounds::from_viewport(viewport, &config.layout).ok_or_else(|| {
            anyhow!(
                "Terminal too small ({}x{}) for the board",
                viewport.width,
                viewport.height
            )
        })?;

        let start_snake = config.start_snake();
        if let Some(outside) = start_snake.body().iter().find(|pos| !bounds.contains(**pos)) {
            return Err(anyhow!(
                "Start snake segment {:?} is outside the {}x{} board",
                outside,
                bounds.columns(),
                bounds.rows()
            ));
        }

        let drag = DragTracker::new(config.layout.cell_width, config.layout.cell_height);
        let epoch = Instant::now();

        Ok(Self {
            session: Session::new(config, bounds, feedback, 0),
            metrics: GameMetrics::new(epoch),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            drag,
            epoch,
            should_quit: false,
        })
    }

    pub fn session(&self) -> &Session<F> {
        &self.session
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.session.shutdown();
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = frame_timer.tick() => {
                    self.on_frame(Instant::now());
                    let now = Instant::now();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session, &self.metrics, now);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Milliseconds since the mode started, the session's clock
    fn clock_ms(&self, now: Instant) -> u64 {
        u64::try_from(now.saturating_duration_since(self.epoch).as_millis()).unwrap_or(u64::MAX)
    }

    fn on_frame(&mut self, now: Instant) {
        if let Some(outcome) = self.session.on_frame(self.clock_ms(now)) {
            if outcome.game_over {
                self.metrics.on_game_over(now, self.session.state().score);
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }
                let action = self.input_handler.handle_key_event(key);
                self.apply(action, Instant::now());
            }
            Event::Mouse(mouse) => {
                if let Some(heading) = self.drag.handle_mouse_event(mouse) {
                    self.session.steer(heading);
                }
            }
            _ => {}
        }
    }

    fn apply(&mut self, action: KeyAction, now: Instant) {
        let now_ms = self.clock_ms(now);

        match action {
            KeyAction::Steer(heading) => self.session.steer(heading),
            KeyAction::TogglePause => {
                self.session.toggle_pause(now_ms);
                match self.session.status() {
                    SessionState::Paused => self.metrics.on_pause(now),
                    SessionState::Running => self.metrics.on_resume(now),
                    SessionState::GameOver => {}
                }
            }
            KeyAction::Restart => {
                let was_over = self.session.status() == SessionState::GameOver;
                if !was_over {
                    self.metrics.on_game_over(now, self.session.state().score);
                }
                self.session.restart(now_ms);
                self.metrics.on_game_start(now);
            }
            KeyAction::Faster => self.session.faster(),
            KeyAction::Slower => self.session.slower(),
            KeyAction::Forfeit => {
                if self.session.status() != SessionState::GameOver {
                    self.session.forfeit();
                    self.metrics.on_game_over(now, self.session.state().score);
                }
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{LogFeedback, Position};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

    fn mode() -> HumanMode<LogFeedback> {
        // 80x24 terminal: 16 rows, 20 columns with the default layout
        HumanMode::with_viewport(GameConfig::default(), Viewport::new(80, 24), LogFeedback).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_board_sized_from_viewport() {
        let mode = mode();
        assert_eq!(mode.session().state().bounds, Bounds::with_size(20, 16));
    }

    #[test]
    fn test_tiny_terminal_rejected() {
        let result = HumanMode::with_viewport(GameConfig::default(), Viewport::new(10, 8), LogFeedback);
        assert!(result.is_err());
    }

    #[test]
    fn test_start_outside_board_rejected() {
        let config = GameConfig {
            start_head: Position::new(30, 2),
            ..Default::default()
        };
        let result = HumanMode::with_viewport(config, Viewport::new(80, 24), LogFeedback);
        assert!(result.is_err());
    }

    #[test]
    fn test_start_body_outside_board_rejected() {
        // Head fits, but ten segments trailing left from x = 5 reach x = -4
        let config = GameConfig {
            start_length: 10,
            ..Default::default()
        };
        let err = HumanMode::with_viewport(config, Viewport::new(80, 24), LogFeedback)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Position { x: -1, y: 5 }"));

        let fits = GameConfig {
            start_length: 6,
            ..Default::default()
        };
        assert!(HumanMode::with_viewport(fits, Viewport::new(80, 24), LogFeedback).is_ok());
    }

    #[test]
    fn test_keys_drive_session() {
        let mut mode = mode();

        mode.handle_event(key(KeyCode::Down));
        assert_eq!(mode.session().pending(), crate::game::Heading::Down);

        mode.handle_event(key(KeyCode::Char('+')));
        assert_eq!(mode.session().speed_ms(), 250);

        mode.handle_event(key(KeyCode::Char('p')));
        assert_eq!(mode.session().status(), SessionState::Paused);

        mode.handle_event(key(KeyCode::Char('g')));
        assert_eq!(mode.session().status(), SessionState::GameOver);
        assert_eq!(mode.metrics.games_played, 1);

        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.session().status(), SessionState::Running);
        assert_eq!(mode.session().speed_ms(), 300);
        assert_eq!(mode.metrics.games_played, 1);

        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_drag_steers() {
        let mut mode = mode();

        mode.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 20, 10));
        mode.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 21, 14));
        assert_eq!(mode.session().pending(), crate::game::Heading::Down);
    }

    #[test]
    fn test_frames_advance_snake() {
        let mut mode = mode();
        let start = mode.epoch;

        mode.on_frame(start + Duration::from_millis(100));
        assert_eq!(mode.session().state().snake.head(), Position::new(5, 5));

        mode.on_frame(start + Duration::from_millis(304));
        assert_eq!(mode.session().state().snake.head(), Position::new(6, 5));
    }
}
