use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::heading::Heading;
use super::state::{Position, Snake};

/// Space reserved around the board on each edge, in host units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: u16,
    pub bottom: u16,
    pub left: u16,
    pub right: u16,
}

/// How host units map onto grid cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    /// Upper limit on board columns
    pub cols: u16,
    /// Host units per cell horizontally
    pub cell_width: u16,
    /// Host units per cell vertically
    pub cell_height: u16,
    /// Height of the score header; it sits below the top inset
    pub header_height: u16,
    /// Safe-area insets. The board starts below the header and the bottom
    /// inset holds the footer.
    pub insets: Insets,
}

impl GridLayout {
    /// Whether there is room for a one-cell frame around the board. The top
    /// edge takes the last header row.
    pub fn has_border(&self) -> bool {
        self.header_height >= 1
            && self.insets.left >= 1
            && self.insets.right >= 1
            && self.insets.bottom >= 1
    }
}

impl Default for GridLayout {
    /// Terminal layout: two columns per cell, a four-line header whose last
    /// line is the board's top border, side borders, and a bottom border
    /// above a three-line footer.
    fn default() -> Self {
        Self {
            cols: 20,
            cell_width: 2,
            cell_height: 1,
            header_height: 4,
            insets: Insets {
                top: 0,
                bottom: 4,
                left: 1,
                right: 1,
            },
        }
    }
}

/// Start values and tunables for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Head cell of the snake at start and after restart
    pub start_head: Position,
    /// Initial length of the snake
    pub start_length: usize,
    /// Initial heading (also the initial pending heading)
    pub start_heading: Heading,
    /// Food cell at start; replaced by a random cell if it is off the board
    pub start_food: Position,

    /// Milliseconds between ticks at start
    pub initial_speed: u64,
    /// Change applied by one faster/slower action
    pub speed_step: u64,
    /// Shortest allowed tick interval
    pub min_speed: u64,

    /// Points awarded per food eaten
    pub score_increment: u32,
    /// End the round when the head runs into the body
    pub self_collision: bool,

    pub layout: GridLayout,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_head: Position::new(5, 5),
            start_length: 3,
            start_heading: Heading::Right,
            start_food: Position::new(12, 8),
            initial_speed: 300,
            speed_step: 50,
            min_speed: 100,
            score_increment: 10,
            self_collision: false,
            layout: GridLayout::default(),
        }
    }
}

impl GameConfig {
    /// Read a JSON config file. Missing fields take their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is usable, or a message naming the
    /// first offending field
    pub fn validate(&self) -> Result<(), String> {
        if self.start_length == 0 {
            return Err("start_length must be at least 1".to_string());
        }
        if self.min_speed == 0 {
            return Err("min_speed must be positive".to_string());
        }
        if self.speed_step == 0 {
            return Err("speed_step must be positive".to_string());
        }
        if self.initial_speed < self.min_speed {
            return Err(format!(
                "initial_speed ({}) must not be below min_speed ({})",
                self.initial_speed, self.min_speed
            ));
        }
        if self.score_increment == 0 {
            return Err("score_increment must be positive".to_string());
        }
        if self.layout.cols == 0 {
            return Err("layout.cols must be positive".to_string());
        }
        if self.layout.cell_width == 0 || self.layout.cell_height == 0 {
            return Err("layout cell size must be positive".to_string());
        }
        Ok(())
    }

    /// Snake placed at start and after every restart
    pub fn start_snake(&self) -> Snake {
        Snake::new(self.start_head, self.start_heading, self.start_length)
    }

    /// Interval after one "faster" action, floored at `min_speed`
    pub fn faster(&self, speed: u64) -> u64 {
        speed.saturating_sub(self.speed_step).max(self.min_speed)
    }

    /// Interval after one "slower" action; there is no upper limit
    pub fn slower(&self, speed: u64) -> u64 {
        speed.saturating_add(self.speed_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.start_head, Position::new(5, 5));
        assert_eq!(config.start_length, 3);
        assert_eq!(config.start_heading, Heading::Right);
        assert_eq!(config.initial_speed, 300);
        assert_eq!(config.min_speed, 100);
        assert!(!config.self_collision);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_speed_below_floor() {
        let config = GameConfig {
            initial_speed: 50,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_fields() {
        let zero_length = GameConfig {
            start_length: 0,
            ..Default::default()
        };
        assert!(zero_length.validate().is_err());

        let zero_step = GameConfig {
            speed_step: 0,
            ..Default::default()
        };
        assert!(zero_step.validate().is_err());

        let mut zero_cell = GameConfig::default();
        zero_cell.layout.cell_height = 0;
        assert!(zero_cell.validate().is_err());
    }

    #[test]
    fn test_default_layout_has_border() {
        assert!(GridLayout::default().has_border());

        let frameless = GridLayout {
            header_height: 0,
            ..Default::default()
        };
        assert!(!frameless.has_border());
    }

    #[test]
    fn test_start_snake_trails_behind_head() {
        let config = GameConfig {
            start_length: 10,
            ..Default::default()
        };
        let snake = config.start_snake();
        assert_eq!(snake.len(), 10);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(-4, 5));
    }

    #[test]
    fn test_speed_adjustment_clamps() {
        let config = GameConfig::default();
        assert_eq!(config.faster(300), 250);
        assert_eq!(config.faster(150), 100);
        assert_eq!(config.faster(100), 100);
        assert_eq!(config.faster(120), 100);
        assert_eq!(config.slower(300), 350);
        assert_eq!(config.slower(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "initial_speed": 200, "self_collision": true, "layout": {{ "cols": 12 }} }}"#
        )
        .unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.initial_speed, 200);
        assert!(config.self_collision);
        assert_eq!(config.layout.cols, 12);
        assert_eq!(config.layout.cell_width, 2);
        assert_eq!(config.start_length, 3);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(GameConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
