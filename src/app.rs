//! Top-level state machine: menus, play, game over, name entry and the
//! high-score and sound screens.
//!
//! The [`App`] owns the live [`Session`] and replaces it wholesale on every
//! new game. Input arrives as [`Intent`] values; simulation steps run from
//! [`App::update`] when the session's tick interval has elapsed on the
//! injected [`Clock`]. Renderers read a [`Snapshot`], audio backends drain
//! [`AudioCue`] values.

use std::mem;
use std::time::Duration;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{AudioCue, SoundSettings};
use crate::clock::Clock;
use crate::config::{GridSize, MAX_NAME_LENGTH};
use crate::effect::EffectKind;
use crate::food::{Food, PlacementError};
use crate::game::{EndCause, Session};
use crate::input::{InputMode, Intent};
use crate::level::ObstacleSet;
use crate::score::{HighScoreLedger, ScoreEntry};
use crate::snake::Snake;

/// Which screen the game is on.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    GameOver,
    NameInput,
    HighScores,
    SoundOptions,
}

/// Main menu entries, top to bottom.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MenuItem {
    Play,
    HighScores,
    Options,
    Quit,
}

impl MenuItem {
    pub const ALL: [Self; 4] = [Self::Play, Self::HighScores, Self::Options, Self::Quit];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::HighScores => "High Scores",
            Self::Options => "Options",
            Self::Quit => "Quit",
        }
    }
}

/// Game-over screen entries.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameOverItem {
    PlayAgain,
    Menu,
    Quit,
}

impl GameOverItem {
    pub const ALL: [Self; 3] = [Self::PlayAgain, Self::Menu, Self::Quit];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PlayAgain => "Play Again",
            Self::Menu => "Main Menu",
            Self::Quit => "Quit",
        }
    }
}

/// High-score screen buttons.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum HighScoreItem {
    Back,
    Reset,
}

impl HighScoreItem {
    pub const ALL: [Self; 2] = [Self::Back, Self::Reset];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Back => "Back",
            Self::Reset => "Reset Scores",
        }
    }
}

/// Sound options rows.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SoundItem {
    Back,
    Sound,
    Music,
    SoundVolume,
    MusicVolume,
}

impl SoundItem {
    pub const ALL: [Self; 5] = [
        Self::Back,
        Self::Sound,
        Self::Music,
        Self::SoundVolume,
        Self::MusicVolume,
    ];
}

/// Final result of the last finished session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameResult {
    pub score: u32,
    pub level: u32,
    pub cause: EndCause,
}

/// Read-only view handed to renderers once per frame.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub state: GameState,
    pub bounds: GridSize,
    pub snake: &'a Snake,
    pub food: &'a Food,
    pub obstacles: &'a ObstacleSet,
    pub score: u32,
    pub level: u32,
    pub speed: u32,
    pub next_threshold: u32,
    pub effect: Option<EffectKind>,
    pub effect_remaining: Option<Duration>,
    pub cursor: usize,
    pub pending_name: &'a str,
    pub high_scores: Vec<ScoreEntry>,
    pub sound: SoundSettings,
    pub last_result: Option<GameResult>,
}

/// Orchestrates screens and the live session.
pub struct App<L, C> {
    state: GameState,
    session: Session,
    ledger: L,
    clock: C,
    bounds: GridSize,
    rng: StdRng,
    cursor: usize,
    pending_name: String,
    last_result: Option<GameResult>,
    sound: SoundSettings,
    cues: Vec<AudioCue>,
    quit: bool,
}

impl<L: HighScoreLedger, C: Clock> App<L, C> {
    /// Creates the app on the main menu. Fails only when the grid has no room
    /// for the first food.
    pub fn new(bounds: GridSize, seed: u64, ledger: L, clock: C) -> Result<Self, PlacementError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let session = Session::new_with_seed(bounds, rng.gen_range(0..u64::MAX), clock.now())?;

        Ok(Self {
            state: GameState::Menu,
            session,
            ledger,
            clock,
            bounds,
            rng,
            cursor: 0,
            pending_name: String::new(),
            last_result: None,
            sound: SoundSettings::default(),
            cues: Vec::new(),
            quit: false,
        })
    }

    /// Replaces the starting sound preferences.
    #[must_use]
    pub fn with_sound(mut self, sound: SoundSettings) -> Self {
        self.sound = sound;
        self
    }

    /// Applies one input intent to the current screen.
    pub fn handle_intent(&mut self, intent: Intent) {
        if intent == Intent::Quit {
            self.quit = true;
            return;
        }

        match self.state {
            GameState::Menu => self.handle_menu(intent),
            GameState::Playing => self.handle_playing(intent),
            GameState::Paused => self.handle_paused(intent),
            GameState::GameOver => self.handle_game_over(intent),
            GameState::NameInput => self.handle_name_input(intent),
            GameState::HighScores => self.handle_high_scores(intent),
            GameState::SoundOptions => self.handle_sound_options(intent),
        }
    }

    /// Runs one simulation step when playing and the tick interval elapsed.
    pub fn update(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        let now = self.clock.now();
        if !self.session.step_due(now) {
            return;
        }

        let report = self.session.step(now);
        if report.ate.is_some() {
            self.cues.push(AudioCue::Eat);
        }
        if report.leveled_up {
            self.cues.push(AudioCue::LevelUp);
        }
        if report.moved {
            self.cues.push(AudioCue::Move);
        }
        if let Some(cause) = report.ended {
            self.finish(cause);
        }
    }

    /// Discards the current session and starts `session` in its place.
    pub fn start_with(&mut self, mut session: Session) {
        session.rearm(self.clock.now());
        self.session = session;
        self.state = GameState::Playing;
        self.cursor = 0;
    }

    fn new_game(&mut self) {
        let seed = self.rng.gen_range(0..u64::MAX);
        match Session::new_with_seed(self.bounds, seed, self.clock.now()) {
            Ok(session) => self.start_with(session),
            Err(err) => error!("cannot start a new game: {err}"),
        }
    }

    fn finish(&mut self, cause: EndCause) {
        let score = self.session.score();
        self.cues.push(AudioCue::GameOver);
        self.last_result = Some(GameResult {
            score,
            level: self.session.level().number(),
            cause,
        });

        let qualifies = self.ledger.is_high_score(score).unwrap_or_else(|err| {
            warn!("high-score ledger unavailable, score {score} not ranked: {err}");
            false
        });

        self.cursor = 0;
        if qualifies {
            self.pending_name.clear();
            self.state = GameState::NameInput;
        } else {
            self.state = GameState::GameOver;
        }
    }

    fn handle_menu(&mut self, intent: Intent) {
        match intent {
            Intent::NavigateUp | Intent::NavigateDown => {
                self.navigate(intent, MenuItem::ALL.len());
            }
            Intent::Confirm => {
                self.cues.push(AudioCue::MenuSelect);
                match MenuItem::ALL[self.cursor] {
                    MenuItem::Play => self.new_game(),
                    MenuItem::HighScores => self.enter(GameState::HighScores),
                    MenuItem::Options => self.enter(GameState::SoundOptions),
                    MenuItem::Quit => self.quit = true,
                }
            }
            _ => {}
        }
    }

    fn handle_playing(&mut self, intent: Intent) {
        if let Some(direction) = intent.direction() {
            self.session.change_direction(direction);
            return;
        }

        match intent {
            Intent::Pause => self.state = GameState::Paused,
            Intent::Back => self.enter(GameState::Menu),
            _ => {}
        }
    }

    fn handle_paused(&mut self, intent: Intent) {
        match intent {
            Intent::Pause => {
                self.session.rearm(self.clock.now());
                self.state = GameState::Playing;
            }
            Intent::Back => self.enter(GameState::Menu),
            _ => {}
        }
    }

    fn handle_game_over(&mut self, intent: Intent) {
        match intent {
            Intent::NavigateUp | Intent::NavigateDown => {
                self.navigate(intent, GameOverItem::ALL.len());
            }
            Intent::Confirm => {
                self.cues.push(AudioCue::MenuSelect);
                match GameOverItem::ALL[self.cursor] {
                    GameOverItem::PlayAgain => self.new_game(),
                    GameOverItem::Menu => self.enter(GameState::Menu),
                    GameOverItem::Quit => self.quit = true,
                }
            }
            Intent::Back => self.enter(GameState::Menu),
            _ => {}
        }
    }

    fn handle_name_input(&mut self, intent: Intent) {
        match intent {
            Intent::TextChar(c) => {
                if !c.is_control() && self.pending_name.chars().count() < MAX_NAME_LENGTH {
                    self.pending_name.push(c);
                }
            }
            Intent::Backspace => {
                let _ = self.pending_name.pop();
            }
            Intent::Confirm => {
                let name = self.pending_name.trim();
                if name.is_empty() {
                    return;
                }

                let score = self.session.score();
                match self.ledger.add_score(name, score) {
                    Ok(()) => info!("recorded high score {score} for {name}"),
                    Err(err) => warn!("could not record high score {score}: {err}"),
                }
                self.cues.push(AudioCue::MenuSelect);
                self.pending_name.clear();
                self.enter(GameState::HighScores);
            }
            _ => {}
        }
    }

    fn handle_high_scores(&mut self, intent: Intent) {
        match intent {
            Intent::NavigateUp | Intent::NavigateDown => {
                self.navigate(intent, HighScoreItem::ALL.len());
            }
            Intent::Confirm => {
                self.cues.push(AudioCue::MenuSelect);
                match HighScoreItem::ALL[self.cursor] {
                    HighScoreItem::Back => self.enter(GameState::Menu),
                    HighScoreItem::Reset => {
                        if let Err(err) = self.ledger.reset_scores() {
                            warn!("could not reset high scores: {err}");
                        }
                    }
                }
            }
            Intent::Back => self.enter(GameState::Menu),
            _ => {}
        }
    }

    fn handle_sound_options(&mut self, intent: Intent) {
        let item = SoundItem::ALL[self.cursor];
        match intent {
            Intent::NavigateUp | Intent::NavigateDown => {
                self.navigate(intent, SoundItem::ALL.len());
            }
            Intent::Confirm => {
                self.cues.push(AudioCue::MenuSelect);
                match item {
                    SoundItem::Back => self.enter(GameState::Menu),
                    SoundItem::Sound => self.sound.sound_enabled = !self.sound.sound_enabled,
                    SoundItem::Music => self.sound.music_enabled = !self.sound.music_enabled,
                    SoundItem::SoundVolume | SoundItem::MusicVolume => {}
                }
            }
            Intent::MoveLeft | Intent::MoveRight => {
                let steps = if intent == Intent::MoveLeft { -1 } else { 1 };
                match item {
                    SoundItem::SoundVolume => self.sound.nudge_sound_volume(steps),
                    SoundItem::MusicVolume => self.sound.nudge_music_volume(steps),
                    SoundItem::Back | SoundItem::Sound | SoundItem::Music => {}
                }
            }
            Intent::Back => self.enter(GameState::Menu),
            _ => {}
        }
    }

    fn navigate(&mut self, intent: Intent, len: usize) {
        debug_assert!(len > 0);
        self.cursor = match intent {
            Intent::NavigateUp => (self.cursor + len - 1) % len,
            _ => (self.cursor + 1) % len,
        };
        self.cues.push(AudioCue::MenuNavigate);
    }

    fn enter(&mut self, state: GameState) {
        self.state = state;
        self.cursor = 0;
    }

    /// Read-only view of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        let now = self.clock.now();
        let effect = self.session.effect();
        Snapshot {
            state: self.state,
            bounds: self.bounds,
            snake: self.session.snake(),
            food: self.session.food(),
            obstacles: self.session.level().obstacles(),
            score: self.session.score(),
            level: self.session.level().number(),
            speed: self.session.level().speed(),
            next_threshold: self.session.level().next_threshold(),
            effect: effect.kind(),
            effect_remaining: effect.remaining(now),
            cursor: self.cursor,
            pending_name: &self.pending_name,
            high_scores: self.ledger.list_scores(),
            sound: self.sound,
            last_result: self.last_result,
        }
    }

    /// Takes the audio cues queued since the last call.
    pub fn drain_cues(&mut self) -> Vec<AudioCue> {
        mem::take(&mut self.cues)
    }

    /// How the input adapter should interpret keys right now.
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        match self.state {
            GameState::Playing | GameState::Paused => InputMode::Play,
            GameState::NameInput => InputMode::Text,
            GameState::Menu
            | GameState::GameOver
            | GameState::HighScores
            | GameState::SoundOptions => InputMode::Menu,
        }
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    #[must_use]
    pub fn sound(&self) -> &SoundSettings {
        &self.sound
    }

    #[must_use]
    pub fn last_result(&self) -> Option<GameResult> {
        self.last_result
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
