use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step `(dx, dy)` for one cell of movement; rows grow downward.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discrete intents consumed by the game loop, one per loop iteration.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Intent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Pause,
    Confirm,
    Back,
    NavigateUp,
    NavigateDown,
    TextChar(char),
    Backspace,
    Quit,
}

impl Intent {
    /// Returns the movement direction carried by a move intent.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::MoveUp => Some(Direction::Up),
            Self::MoveDown => Some(Direction::Down),
            Self::MoveLeft => Some(Direction::Left),
            Self::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }
}

/// How keystrokes should be interpreted for the current screen.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InputMode {
    /// Gameplay: arrows/WASD steer the snake.
    Play,
    /// Menus: arrows navigate, Enter confirms, Left/Right adjust values.
    Menu,
    /// Name entry: printable keys are text.
    Text,
}

/// Waits up to `timeout` for one key press and maps it to an intent.
pub fn poll_intent(timeout: Duration, mode: InputMode) -> io::Result<Option<Intent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(map_key(key, mode)),
        _ => Ok(None),
    }
}

/// Maps a key event to an intent for the given input mode.
#[must_use]
pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Intent::Quit);
    }

    match mode {
        InputMode::Text => match key.code {
            KeyCode::Enter => Some(Intent::Confirm),
            KeyCode::Esc => Some(Intent::Back),
            KeyCode::Backspace => Some(Intent::Backspace),
            KeyCode::Char(c) => Some(Intent::TextChar(c)),
            _ => None,
        },
        InputMode::Play => match key.code {
            KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => Some(Intent::MoveUp),
            KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => Some(Intent::MoveDown),
            KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => Some(Intent::MoveLeft),
            KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => Some(Intent::MoveRight),
            KeyCode::Char('p' | 'P' | ' ') => Some(Intent::Pause),
            KeyCode::Enter => Some(Intent::Confirm),
            KeyCode::Esc => Some(Intent::Back),
            KeyCode::Char('q' | 'Q') => Some(Intent::Quit),
            _ => None,
        },
        InputMode::Menu => match key.code {
            KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => Some(Intent::NavigateUp),
            KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => Some(Intent::NavigateDown),
            KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => Some(Intent::MoveLeft),
            KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => Some(Intent::MoveRight),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Intent::Confirm),
            KeyCode::Esc | KeyCode::Backspace => Some(Intent::Back),
            KeyCode::Char('q' | 'Q') => Some(Intent::Quit),
            _ => None,
        },
    }
}
