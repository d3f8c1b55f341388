use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use log::info;
use rand::Rng;

use crate::config::{
    BASE_SPEED, GridSize, INITIAL_LEVEL_THRESHOLD, LEVEL_THRESHOLD_GROWTH, OBSTACLE_EDGE_MARGIN,
    OBSTACLE_FREE_LEVELS, OBSTACLES_PER_LEVEL, SPEED_INCREMENT,
};
use crate::snake::Position;

/// Static blocking cells accumulated over a session.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ObstacleSet {
    cells: BTreeSet<Position>,
}

impl ObstacleSet {
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    /// Adds an obstacle. Returns false when the cell was already blocked.
    pub fn insert(&mut self, position: Position) -> bool {
        self.cells.insert(position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }
}

/// Level progression: thresholds, speed curve and obstacles.
#[derive(Debug, Clone)]
pub struct Level {
    number: u32,
    next_threshold: u32,
    speed: u32,
    obstacles: ObstacleSet,
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl Level {
    #[must_use]
    pub fn new() -> Self {
        Self {
            number: 1,
            next_threshold: INITIAL_LEVEL_THRESHOLD,
            speed: BASE_SPEED,
            obstacles: ObstacleSet::default(),
        }
    }

    /// A level-1 controller with obstacles already in place.
    #[must_use]
    pub fn with_obstacles(cells: impl IntoIterator<Item = Position>) -> Self {
        let mut level = Self::new();
        for cell in cells {
            let _ = level.obstacles.insert(cell);
        }
        level
    }

    /// Advances one level when `score` reached the threshold.
    ///
    /// New obstacles avoid existing obstacles and every cell in `blocked`.
    pub fn check_level_up<R: Rng + ?Sized>(
        &mut self,
        score: u32,
        rng: &mut R,
        bounds: GridSize,
        blocked: &HashSet<Position>,
    ) -> bool {
        if score < self.next_threshold {
            return false;
        }

        let (numerator, denominator) = LEVEL_THRESHOLD_GROWTH;
        self.number += 1;
        self.next_threshold = self.next_threshold * numerator / denominator;
        self.speed = BASE_SPEED + (self.number - 1) * SPEED_INCREMENT;

        if self.number > OBSTACLE_FREE_LEVELS {
            let added = self.generate_obstacles(rng, bounds, blocked);
            info!(
                "level {} reached: speed {}, {added} new obstacles, next at {}",
                self.number, self.speed, self.next_threshold
            );
        } else {
            info!(
                "level {} reached: speed {}, next at {}",
                self.number, self.speed, self.next_threshold
            );
        }

        true
    }

    /// Draws [`OBSTACLES_PER_LEVEL`] interior samples, keeping the free ones.
    fn generate_obstacles<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        bounds: GridSize,
        blocked: &HashSet<Position>,
    ) -> usize {
        let max_x = i32::from(bounds.width) - 1 - OBSTACLE_EDGE_MARGIN;
        let max_y = i32::from(bounds.height) - 1 - OBSTACLE_EDGE_MARGIN;
        if max_x < OBSTACLE_EDGE_MARGIN || max_y < OBSTACLE_EDGE_MARGIN {
            return 0;
        }

        let mut added = 0;
        for _ in 0..OBSTACLES_PER_LEVEL {
            let candidate = Position {
                x: rng.gen_range(OBSTACLE_EDGE_MARGIN..=max_x),
                y: rng.gen_range(OBSTACLE_EDGE_MARGIN..=max_y),
            };
            if blocked.contains(&candidate) {
                continue;
            }
            if self.obstacles.insert(candidate) {
                added += 1;
            }
        }
        added
    }

    #[must_use]
    pub fn check_obstacle_collision(&self, position: Position) -> bool {
        self.obstacles.contains(position)
    }

    /// Time between movement steps at the current speed scaled by
    /// `multiplier`.
    #[must_use]
    pub fn tick_interval(&self, multiplier: f32) -> Duration {
        debug_assert!(multiplier > 0.0, "speed multiplier must be positive");
        let cells_per_second = f64::from(self.speed) * f64::from(multiplier);
        Duration::from_secs_f64(1.0 / cells_per_second)
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn next_threshold(&self) -> u32 {
        self.next_threshold
    }

    /// Movement speed in cells per second.
    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    #[must_use]
    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;
    use crate::snake::Position;

    use super::Level;

    const BOUNDS: GridSize = GridSize {
        width: 40,
        height: 30,
    };

    #[test]
    fn first_level_up_raises_threshold_without_obstacles() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut level = Level::new();

        assert!(level.check_level_up(100, &mut rng, BOUNDS, &HashSet::new()));

        assert_eq!(level.number(), 2);
        assert_eq!(level.next_threshold(), 150);
        assert_eq!(level.speed(), 12);
        assert!(level.obstacles().is_empty());
    }

    #[test]
    fn below_threshold_does_not_advance() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut level = Level::new();

        assert!(!level.check_level_up(99, &mut rng, BOUNDS, &HashSet::new()));
        assert_eq!(level.number(), 1);
        assert_eq!(level.next_threshold(), 100);
    }

    #[test]
    fn thresholds_grow_by_truncated_factor() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut level = Level::new();
        let mut expected = Vec::new();

        for _ in 0..5 {
            let threshold = level.next_threshold();
            assert!(level.check_level_up(threshold, &mut rng, BOUNDS, &HashSet::new()));
            assert!(level.next_threshold() > threshold);
            expected.push(level.next_threshold());
        }

        assert_eq!(expected, vec![150, 225, 337, 505, 757]);
        assert_eq!(level.number(), 6);
        assert_eq!(level.speed(), 20);
    }

    #[test]
    fn third_level_adds_interior_obstacles() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut level = Level::new();

        level.check_level_up(100, &mut rng, BOUNDS, &HashSet::new());
        level.check_level_up(150, &mut rng, BOUNDS, &HashSet::new());

        assert_eq!(level.number(), 3);
        let count = level.obstacles().len();
        assert!((1..=3).contains(&count), "obstacle count was {count}");
        for cell in level.obstacles().iter() {
            assert!((2..=37).contains(&cell.x));
            assert!((2..=27).contains(&cell.y));
            assert!(level.check_obstacle_collision(*cell));
        }
    }

    #[test]
    fn obstacles_skip_blocked_cells() {
        let mut rng = StdRng::seed_from_u64(4);
        let bounds = GridSize {
            width: 5,
            height: 5,
        };
        // The interior of a 5x5 grid is the single cell (2,2).
        let blocked: HashSet<Position> = [Position::new(2, 2)].into_iter().collect();
        let mut level = Level::new();

        level.check_level_up(100, &mut rng, bounds, &blocked);
        level.check_level_up(150, &mut rng, bounds, &blocked);
        assert!(level.obstacles().is_empty());

        level.check_level_up(225, &mut rng, bounds, &HashSet::new());
        assert_eq!(level.obstacles().len(), 1);
        assert!(level.check_obstacle_collision(Position::new(2, 2)));
    }

    #[test]
    fn tiny_grid_has_no_room_for_obstacles() {
        let mut rng = StdRng::seed_from_u64(5);
        let bounds = GridSize {
            width: 4,
            height: 4,
        };
        let mut level = Level::new();

        for score in [100, 150, 225] {
            assert!(level.check_level_up(score, &mut rng, bounds, &HashSet::new()));
        }
        assert!(level.obstacles().is_empty());
    }

    #[test]
    fn tick_interval_scales_with_speed_and_multiplier() {
        let level = Level::new();

        assert_eq!(level.tick_interval(1.0), Duration::from_millis(100));
        assert_eq!(level.tick_interval(0.5), Duration::from_millis(200));
    }
}
