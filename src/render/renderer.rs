use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::time::Instant;

use crate::game::{
    CollisionType, Feedback, GameState, GridLayout, Position, Session, SessionState,
};
use crate::metrics::GameMetrics;

/// Screen regions derived from the grid layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Regions {
    header: Rect,
    /// Cells only, without the frame
    cells: Rect,
    /// Cells plus the frame when there is one
    board: Rect,
    footer: Rect,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the whole screen from a read-only view of the session
    pub fn render<F: Feedback>(
        &self,
        frame: &mut Frame,
        session: &Session<F>,
        metrics: &GameMetrics,
        now: Instant,
    ) {
        let screen = frame.area();
        let layout = &session.config().layout;
        let state = session.state();
        let regions = self.regions(screen, layout, state);

        if regions.header.height > 0 {
            let stats = self.render_stats(session, metrics, now);
            frame.render_widget(stats, regions.header);
        }

        if state.status == SessionState::GameOver {
            let game_over = self.render_game_over(state, metrics);
            frame.render_widget(game_over, regions.board);
        } else {
            if layout.has_border() {
                frame.render_widget(self.render_frame(state), regions.board);
            }
            let grid = self.render_grid(state, layout);
            frame.render_widget(grid, regions.cells);
        }

        if regions.footer.height > 0 {
            let controls = self.render_controls();
            frame.render_widget(controls, regions.footer);
        }
    }

    /// Place header, board and footer the same way the board size was
    /// derived, so every in-bounds cell lands on screen.
    fn regions(&self, screen: Rect, layout: &GridLayout, state: &GameState) -> Regions {
        let insets = &layout.insets;
        let bordered = u16::from(layout.has_border());

        let cols = u16::try_from(state.bounds.columns()).unwrap_or(u16::MAX);
        let rows = u16::try_from(state.bounds.rows()).unwrap_or(u16::MAX);
        let cells_width = cols.saturating_mul(layout.cell_width);
        let cells_height = rows.saturating_mul(layout.cell_height);

        let usable_width = screen
            .width
            .saturating_sub(insets.left)
            .saturating_sub(insets.right);
        let x = screen.x + insets.left + usable_width.saturating_sub(cells_width) / 2;
        let y = screen.y + insets.top + layout.header_height;

        let cells = Rect::new(x, y, cells_width, cells_height).intersection(screen);
        let board = Rect::new(
            x.saturating_sub(bordered),
            y.saturating_sub(bordered),
            cells_width.saturating_add(2 * bordered),
            cells_height.saturating_add(2 * bordered),
        )
        .intersection(screen);

        let header = Rect::new(
            screen.x,
            screen.y + insets.top,
            screen.width,
            layout.header_height.saturating_sub(bordered),
        )
        .intersection(screen);

        let footer_top = board.y + board.height;
        let footer = Rect::new(
            screen.x,
            footer_top,
            screen.width,
            (screen.y + screen.height).saturating_sub(footer_top),
        )
        .intersection(screen);

        Regions {
            header,
            cells,
            board,
            footer,
        }
    }

    fn render_frame(&self, state: &GameState) -> Block<'_> {
        let title = if state.status == SessionState::Paused {
            " Snake (paused) "
        } else {
            " Snake "
        };

        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::White))
            .title(title)
    }

    fn render_grid(&self, state: &GameState, layout: &GridLayout) -> Paragraph<'_> {
        let bounds = state.bounds;
        let pad = " ".repeat(usize::from(layout.cell_width.saturating_sub(1)));
        let mut lines = Vec::new();

        for y in bounds.min_y..=bounds.max_y {
            let mut spans = Vec::new();

            for x in bounds.min_x..=bounds.max_x {
                let pos = Position::new(x, y);

                let (glyph, style) = if pos == state.snake.head() {
                    (
                        "■",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.contains(pos) {
                    ("□", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    (
                        "O",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    (".", Style::default().fg(Color::DarkGray))
                };

                spans.push(Span::styled(format!("{glyph}{pad}"), style));
            }

            // Taller cells repeat the row
            for _ in 0..layout.cell_height {
                lines.push(Line::from(spans.clone()));
            }
        }

        Paragraph::new(lines)
    }

    fn render_stats<F: Feedback>(
        &self,
        session: &Session<F>,
        metrics: &GameMetrics,
        now: Instant,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                session.state().score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", session.speed_ms()), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(now), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let reason = match state.collision {
            Some(CollisionType::Wall) => "You hit the wall",
            Some(CollisionType::SelfCollision) => "You ran into yourself",
            Some(CollisionType::Forfeit) => "You gave up",
            None => "",
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Games: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.games_played.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let key = Style::default().fg(Color::Cyan);

        let text = vec![
            Line::from(vec![
                Span::styled("Drag", key),
                Span::raw(", "),
                Span::styled("↑↓←→", key),
                Span::raw(" or "),
                Span::styled("WASD", key),
                Span::raw(" to steer"),
            ]),
            Line::from(vec![
                Span::styled("P", key),
                Span::raw(" pause | "),
                Span::styled("+/-", key),
                Span::raw(" speed | "),
                Span::styled("R", key),
                Span::raw(" restart | "),
                Span::styled("G", key),
                Span::raw(" give up | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" quit"),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
