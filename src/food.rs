use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use thiserror::Error;

use crate::config::{GridSize, MAX_PLACEMENT_ATTEMPTS, SPECIAL_FOOD_LIFETIME};
use crate::snake::Position;

/// Food type; decides points, lifetime and the effect granted when eaten.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FoodKind {
    Normal,
    Bonus,
    Speed,
    Slow,
}

impl FoodKind {
    /// Returns the score value granted when eaten.
    #[must_use]
    pub fn points(self) -> u32 {
        match self {
            Self::Normal => 10,
            Self::Bonus => 30,
            Self::Speed => 20,
            Self::Slow => 5,
        }
    }

    /// How long this kind stays put before relocating; `None` means forever.
    #[must_use]
    pub fn lifetime(self) -> Option<Duration> {
        match self {
            Self::Normal => None,
            Self::Bonus | Self::Speed | Self::Slow => Some(SPECIAL_FOOD_LIFETIME),
        }
    }
}

/// Relative spawn weights available at `level`.
fn kind_weights(level: u32) -> &'static [(FoodKind, u32)] {
    const LEVEL_ONE: &[(FoodKind, u32)] = &[(FoodKind::Normal, 1)];
    const LEVEL_TWO: &[(FoodKind, u32)] = &[(FoodKind::Normal, 70), (FoodKind::Bonus, 20)];
    const LEVEL_THREE_UP: &[(FoodKind, u32)] = &[
        (FoodKind::Normal, 70),
        (FoodKind::Bonus, 20),
        (FoodKind::Speed, 5),
        (FoodKind::Slow, 5),
    ];

    match level {
        0 | 1 => LEVEL_ONE,
        2 => LEVEL_TWO,
        _ => LEVEL_THREE_UP,
    }
}

/// Picks a food kind using the level's weight table.
pub fn select_kind<R: Rng + ?Sized>(rng: &mut R, level: u32) -> FoodKind {
    let table = kind_weights(level);
    if table.len() == 1 {
        return table[0].0;
    }

    match WeightedIndex::new(table.iter().map(|(_, weight)| *weight)) {
        Ok(index) => table[index.sample(rng)].0,
        Err(_) => FoodKind::Normal,
    }
}

/// Raised when no free cell is left for a placement.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum PlacementError {
    #[error("no free cell left on the {width}x{height} board")]
    BoardFull { width: u16, height: u16 },
}

/// Finds a uniformly random cell inside `bounds` that is not in `occupied`.
///
/// Random sampling is capped at [`MAX_PLACEMENT_ATTEMPTS`]; after that the
/// free cells are enumerated so a crowded board still succeeds, and a
/// saturated one reports [`PlacementError::BoardFull`].
pub fn place<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    occupied: &HashSet<Position>,
) -> Result<Position, PlacementError> {
    let full = PlacementError::BoardFull {
        width: bounds.width,
        height: bounds.height,
    };
    if bounds.width == 0 || bounds.height == 0 {
        return Err(full);
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Position {
            x: rng.gen_range(0..i32::from(bounds.width)),
            y: rng.gen_range(0..i32::from(bounds.height)),
        };
        if !occupied.contains(&candidate) {
            return Ok(candidate);
        }
    }

    let free = bounds.total_cells().saturating_sub(occupied.len());
    let mut candidates = Vec::with_capacity(free);
    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !occupied.contains(&position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return Err(full);
    }

    let index = rng.gen_range(0..candidates.len());
    Ok(candidates[index])
}

/// Food entity currently active on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
    /// Clock reading when this food appeared.
    pub created_at: Duration,
}

impl Food {
    #[must_use]
    pub fn new(position: Position, kind: FoodKind, created_at: Duration) -> Self {
        Self {
            position,
            kind,
            created_at,
        }
    }

    /// Creates normal food at `position`.
    #[must_use]
    pub fn normal(position: Position) -> Self {
        Self::new(position, FoodKind::Normal, Duration::ZERO)
    }

    /// Places fresh food for `level` in a free cell.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: GridSize,
        occupied: &HashSet<Position>,
        level: u32,
        now: Duration,
    ) -> Result<Self, PlacementError> {
        let position = place(rng, bounds, occupied)?;
        let kind = select_kind(rng, level);
        Ok(Self::new(position, kind, now))
    }

    /// Moves this food to a new free cell with a freshly rolled kind.
    pub fn respawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        bounds: GridSize,
        occupied: &HashSet<Position>,
        level: u32,
        now: Duration,
    ) -> Result<(), PlacementError> {
        *self = Self::spawn(rng, bounds, occupied, level, now)?;
        Ok(())
    }

    #[must_use]
    pub fn is_collision(&self, position: Position) -> bool {
        self.position == position
    }

    /// True once a timed food has outlived its lifetime at `now`.
    #[must_use]
    pub fn should_expire(&self, now: Duration) -> bool {
        match self.kind.lifetime() {
            Some(lifetime) => now.saturating_sub(self.created_at) > lifetime,
            None => false,
        }
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.kind.points()
    }
}
