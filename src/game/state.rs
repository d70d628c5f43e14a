use serde::{Deserialize, Serialize};

use super::config::GridLayout;
use super::heading::Heading;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell along a heading
    pub fn stepped(&self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0. Never empty.
    body: Vec<Position>,
    /// Heading applied on the last tick
    pub heading: Heading,
}

impl Snake {
    /// Create a snake whose body trails straight back from `head`.
    ///
    /// A `length` of zero is treated as one so the body always has a head.
    pub fn new(head: Position, heading: Heading, length: usize) -> Self {
        let (dx, dy) = heading.delta();
        let mut body = Vec::with_capacity(length.max(1));
        body.push(head);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        Self { body, heading }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn body(&self) -> &[Position] {
        &self.body
    }

    /// Body segments excluding head
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Whether `pos` is still occupied once the snake has advanced.
    ///
    /// On a non-growing move the tail cell is vacated in the same tick, so it
    /// does not count.
    pub fn occupied_after_move(&self, pos: Position, growing: bool) -> bool {
        let kept = if growing {
            &self.body[..]
        } else {
            &self.body[..self.body.len() - 1]
        };
        kept.contains(&pos)
    }

    /// Prepend `new_head`, dropping the tail unless `grow` is set
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; the body keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Outer size of the drawing surface, in host units (pixels, terminal cells)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Inclusive rectangle the snake head must stay inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Bounds for a grid of `cols` x `rows` cells anchored at the origin
    pub fn with_size(cols: i32, rows: i32) -> Self {
        Self {
            min_x: 0,
            max_x: cols - 1,
            min_y: 0,
            max_y: rows - 1,
        }
    }

    /// Derive the playable grid from the viewport and cell layout.
    ///
    /// Returns `None` when not even a single cell fits.
    pub fn from_viewport(viewport: Viewport, layout: &GridLayout) -> Option<Self> {
        let insets = &layout.insets;

        let usable_height = i32::from(viewport.height)
            - i32::from(insets.top)
            - i32::from(insets.bottom)
            - i32::from(layout.header_height);
        let usable_width =
            i32::from(viewport.width) - i32::from(insets.left) - i32::from(insets.right);

        let rows = usable_height.div_euclid(i32::from(layout.cell_height.max(1)));
        let cols = usable_width
            .div_euclid(i32::from(layout.cell_width.max(1)))
            .min(i32::from(layout.cols));

        if rows < 1 || cols < 1 {
            return None;
        }

        Some(Self::with_size(cols, rows))
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }

    pub fn columns(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn rows(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

/// Lifecycle of one play session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Paused,
    GameOver,
}

/// What ended the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the bounds
    Wall,
    /// Head entered the body (only when self-collision is enabled)
    SelfCollision,
    /// Player gave up the round
    Forfeit,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub bounds: Bounds,
    pub score: u32,
    pub steps: u32,
    pub status: SessionState,
    pub collision: Option<CollisionType>,
}

impl GameState {
    pub fn new(snake: Snake, food: Position, bounds: Bounds) -> Self {
        Self {
            snake,
            food,
            bounds,
            score: 0,
            steps: 0,
            status: SessionState::Running,
            collision: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionState::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.status == SessionState::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::Insets;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.stepped(Heading::Down), Position::new(5, 6));
        assert_eq!(pos.stepped(Heading::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Heading::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body()[1], Position::new(4, 5));
        assert_eq!(snake.tail(), Position::new(3, 5));
    }

    #[test]
    fn test_zero_length_snake_keeps_head() {
        let snake = Snake::new(Position::new(1, 1), Heading::Up, 0);
        assert_eq!(snake.len(), 1);
        assert!(!snake.is_empty());
        assert_eq!(snake.head(), snake.tail());
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Heading::Right, 3);

        snake.advance(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));

        snake.advance(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Position::new(4, 5));
    }

    #[test]
    fn test_occupied_after_move_ignores_vacating_tail() {
        let snake = Snake::new(Position::new(5, 5), Heading::Right, 3);
        assert!(!snake.occupied_after_move(Position::new(3, 5), false));
        assert!(snake.occupied_after_move(Position::new(3, 5), true));
        assert!(snake.occupied_after_move(Position::new(4, 5), false));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = Bounds::with_size(10, 10);
        assert!(bounds.contains(Position::new(0, 0)));
        assert!(bounds.contains(Position::new(9, 9)));
        assert!(!bounds.contains(Position::new(-1, 0)));
        assert!(!bounds.contains(Position::new(10, 0)));
        assert!(!bounds.contains(Position::new(0, 10)));
        assert_eq!(bounds.columns(), 10);
        assert_eq!(bounds.rows(), 10);
    }

    #[test]
    fn test_bounds_from_viewport() {
        let layout = GridLayout {
            cols: 20,
            cell_width: 10,
            cell_height: 10,
            header_height: 50,
            insets: Insets {
                top: 20,
                bottom: 30,
                left: 0,
                right: 0,
            },
        };

        // (400 - 20 - 30 - 50) / 10 = 30 rows, width allows 30 but cols caps at 20
        let bounds = Bounds::from_viewport(Viewport::new(300, 400), &layout).unwrap();
        assert_eq!(bounds, Bounds::with_size(20, 30));

        // Partial rows are dropped
        let bounds = Bounds::from_viewport(Viewport::new(300, 409), &layout).unwrap();
        assert_eq!(bounds.rows(), 30);

        // Narrow viewport limits columns
        let bounds = Bounds::from_viewport(Viewport::new(55, 400), &layout).unwrap();
        assert_eq!(bounds.columns(), 5);
    }

    #[test]
    fn test_bounds_from_tiny_viewport() {
        let layout = GridLayout::default();
        assert!(Bounds::from_viewport(Viewport::new(2, 2), &layout).is_none());
    }
}
