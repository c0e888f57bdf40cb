//! Assorted constants & hard-coded configuration
use crate::engine::Cell;
use ratatui::style::{Color, Modifier, Style};
use std::time::Duration;

/// Identifier under which the worm game's highscore is stored
pub(crate) const GAME_ID: &str = "worm";

/// Default board width
pub(crate) const BOARD_WIDTH: u16 = 10;

/// Default board height
pub(crate) const BOARD_HEIGHT: u16 = 10;

/// Default time between the first two movements of the worm
pub(crate) const STARTING_INTERVAL: Duration = Duration::from_millis(700);

/// Default factor by which the time between movements shrinks after each
/// movement
pub(crate) const SPEED_MULTIPLIER: f64 = 0.99;

/// Default lower limit on the time between movements
pub(crate) const MIN_INTERVAL: Duration = Duration::from_millis(50);

/// Where a new worm's head is placed
pub(crate) const SPAWN_CELL: Cell = Cell::new(0, 1);

/// How long the terminal front-end waits for input before redrawing
pub(crate) const FRAME_PERIOD: Duration = Duration::from_millis(30);

/// Glyph for the worm's head when it is moving up
pub(crate) const WORM_HEAD_UP_SYMBOL: char = 'v';

/// Glyph for the worm's head when it is moving down
pub(crate) const WORM_HEAD_DOWN_SYMBOL: char = '^';

/// Glyph for the worm's head when it is moving right
pub(crate) const WORM_HEAD_RIGHT_SYMBOL: char = '<';

/// Glyph for the worm's head when it is moving left
pub(crate) const WORM_HEAD_LEFT_SYMBOL: char = '>';

/// Glyph for the parts of the worm's body
pub(crate) const WORM_BODY_SYMBOL: char = 'O';

/// Glyph for the food
pub(crate) const FOOD_SYMBOL: char = '*';

/// Glyph for a board cell with nothing on it
pub(crate) const EMPTY_SYMBOL: char = '_';

/// Glyph for the worm's head when it has run into itself
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the worm's head and body
pub(crate) const WORM_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);
