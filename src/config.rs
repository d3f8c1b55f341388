use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Default playfield width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 40;

/// Default playfield height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 30;

/// Segment count of a freshly spawned snake.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Random samples tried before placement falls back to a full board scan.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 256;

/// Lifetime of non-normal food before it relocates.
pub const SPECIAL_FOOD_LIFETIME: Duration = Duration::from_millis(10_000);

/// Duration of the speed and slow effects.
pub const EFFECT_DURATION: Duration = Duration::from_millis(5_000);

/// Movement multiplier granted by speed food.
pub const SPEED_EFFECT_MULTIPLIER: f32 = 1.5;

/// Movement multiplier granted by slow food.
pub const SLOW_EFFECT_MULTIPLIER: f32 = 0.75;

/// Score required to leave level 1.
pub const INITIAL_LEVEL_THRESHOLD: u32 = 100;

/// Threshold growth factor per level, as a ratio (1.5).
pub const LEVEL_THRESHOLD_GROWTH: (u32, u32) = (3, 2);

/// Movement speed at level 1 in cells per second.
pub const BASE_SPEED: u32 = 10;

/// Additional cells per second gained per level.
pub const SPEED_INCREMENT: u32 = 2;

/// First level that receives obstacles on level-up is the one after this.
pub const OBSTACLE_FREE_LEVELS: u32 = 2;

/// Obstacle samples drawn per level-up.
pub const OBSTACLES_PER_LEVEL: usize = 3;

/// Minimum distance in cells between an obstacle and any grid edge.
pub const OBSTACLE_EDGE_MARGIN: i32 = 2;

/// Maximum number of entries kept by the high-score ledger.
pub const MAX_HIGH_SCORES: usize = 10;

/// Maximum length of a high-score name.
pub const MAX_NAME_LENGTH: usize = 10;

/// Main loop frame pacing.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Volume step applied by the sound options screen.
pub const VOLUME_STEP: f32 = 0.1;

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub obstacle: Color,
    pub food_normal: Color,
    pub food_bonus: Color,
    pub food_speed: Color,
    pub food_slow: Color,
    pub border_fg: Color,
    pub border_bg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub menu_title: Color,
    pub menu_selected: Color,
    pub menu_footer: Color,
    pub warning: Color,
}

/// The single built-in theme.
pub const THEME: Theme = Theme {
    snake_head: Color::LightGreen,
    snake_body: Color::Green,
    obstacle: Color::Gray,
    food_normal: Color::Red,
    food_bonus: Color::Yellow,
    food_speed: Color::Blue,
    food_slow: Color::LightGreen,
    border_fg: Color::White,
    border_bg: Color::DarkGray,
    hud_label: Color::DarkGray,
    hud_value: Color::White,
    menu_title: Color::Green,
    menu_selected: Color::LightGreen,
    menu_footer: Color::DarkGray,
    warning: Color::Red,
};

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

pub const GLYPH_SNAKE_HEAD: &str = "█";
pub const GLYPH_SNAKE_BODY: &str = "▓";
pub const GLYPH_OBSTACLE: &str = "▒";
pub const GLYPH_FOOD: &str = "●";
pub const GLYPH_FOOD_SPECIAL: &str = "◆";
