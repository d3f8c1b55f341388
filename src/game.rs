use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{GridSize, INITIAL_SNAKE_LENGTH};
use crate::effect::{Effect, EffectKind};
use crate::food::{Food, FoodKind, PlacementError};
use crate::input::Direction;
use crate::level::Level;
use crate::snake::{MoveOutcome, Position, Snake};

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndCause {
    Obstacle,
    Wall,
    SelfCollision,
    /// No free cell was left to place food on.
    BoardFull,
}

/// What happened during one simulation step.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct StepReport {
    pub moved: bool,
    pub ate: Option<FoodKind>,
    pub leveled_up: bool,
    pub ended: Option<EndCause>,
}

/// Live state of one playthrough: snake, food, level, score and effect.
#[derive(Debug, Clone)]
pub struct Session {
    snake: Snake,
    food: Food,
    level: Level,
    score: u32,
    effect: Effect,
    bounds: GridSize,
    rng: StdRng,
    step_count: u64,
    last_step_at: Duration,
    ended: Option<EndCause>,
}

impl Session {
    /// Starts a session with a centered snake heading right.
    pub fn new_with_seed(
        bounds: GridSize,
        seed: u64,
        now: Duration,
    ) -> Result<Self, PlacementError> {
        let start = Position {
            x: i32::from(bounds.width / 2),
            y: i32::from(bounds.height / 2),
        };
        let snake = Snake::new(start, Direction::Right, INITIAL_SNAKE_LENGTH);
        debug_assert!(
            snake.segments().all(|cell| cell.is_within_bounds(bounds)),
            "grid too small for the starting snake"
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let occupied: HashSet<Position> = snake.segments().copied().collect();
        let food = Food::spawn(&mut rng, bounds, &occupied, 1, now)?;

        info!(
            "new session on {}x{} grid (seed {seed})",
            bounds.width, bounds.height
        );
        Ok(Self::from_parts(bounds, snake, food, Level::new(), rng, now))
    }

    /// Assembles a session from explicit parts, for scripted scenarios.
    #[must_use]
    pub fn from_parts(
        bounds: GridSize,
        snake: Snake,
        food: Food,
        level: Level,
        rng: StdRng,
        now: Duration,
    ) -> Self {
        Self {
            snake,
            food,
            level,
            score: 0,
            effect: Effect::default(),
            bounds,
            rng,
            step_count: 0,
            last_step_at: now,
            ended: None,
        }
    }

    /// Forwards a steering request to the snake.
    pub fn change_direction(&mut self, direction: Direction) {
        if self.ended.is_none() {
            self.snake.change_direction(direction);
        }
    }

    /// Current gap between steps, including the active effect.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.level.tick_interval(self.effect.multiplier())
    }

    /// True once enough time passed since the previous step.
    #[must_use]
    pub fn step_due(&self, now: Duration) -> bool {
        self.ended.is_none() && now.saturating_sub(self.last_step_at) >= self.tick_interval()
    }

    /// Restarts the step timer, e.g. when resuming from pause.
    pub fn rearm(&mut self, now: Duration) {
        self.last_step_at = now;
    }

    /// Advances the simulation by one step at time `now`.
    pub fn step(&mut self, now: Duration) -> StepReport {
        let mut report = StepReport::default();
        if let Some(cause) = self.ended {
            report.ended = Some(cause);
            return report;
        }

        self.step_count += 1;
        self.last_step_at = now;

        if self.effect.expire(now) {
            debug!("effect expired at {now:?}");
        }

        let next_head = self.snake.peek_next_head();

        if self.food.should_expire(now) {
            debug!("{:?} food at {:?} expired", self.food.kind, self.food.position);
            // Prefer a cell other than the one the head is about to enter.
            let mut occupied = self.occupied_cells();
            let _ = occupied.insert(next_head);
            if self.respawn_food(&occupied, now).is_err() {
                let _ = occupied.remove(&next_head);
                if let Err(error) = self.respawn_food(&occupied, now) {
                    return self.end(report, EndCause::BoardFull, Some(error));
                }
            }
        }

        if self.level.check_obstacle_collision(next_head) {
            return self.end(report, EndCause::Obstacle, None);
        }

        if self.food.is_collision(next_head) {
            let kind = self.food.kind;
            self.snake.grow();
            if let Some(effect) = EffectKind::from_food(kind) {
                self.effect.apply(effect, now);
                debug!("{effect:?} effect active until {:?}", self.effect.remaining(now));
            }
            self.score += kind.points();
            report.ate = Some(kind);

            let mut blocked = self.occupied_cells();
            let _ = blocked.insert(next_head);
            let (score, bounds) = (self.score, self.bounds);
            report.leveled_up = self.level.check_level_up(score, &mut self.rng, bounds, &blocked);

            // Obstacles may have been added by the level-up.
            blocked.extend(self.level.obstacles().iter().copied());
            if let Err(error) = self.respawn_food(&blocked, now) {
                return self.end(report, EndCause::BoardFull, Some(error));
            }
        }

        match self.snake.move_forward(self.bounds) {
            MoveOutcome::Moved => report.moved = true,
            MoveOutcome::HitWall => return self.end(report, EndCause::Wall, None),
            MoveOutcome::HitSelf | MoveOutcome::Dead => {
                return self.end(report, EndCause::SelfCollision, None);
            }
        }

        report
    }

    fn respawn_food(
        &mut self,
        occupied: &HashSet<Position>,
        now: Duration,
    ) -> Result<(), PlacementError> {
        let level = self.level.number();
        self.food
            .respawn(&mut self.rng, self.bounds, occupied, level, now)
    }

    fn end(
        &mut self,
        mut report: StepReport,
        cause: EndCause,
        error: Option<PlacementError>,
    ) -> StepReport {
        if let Some(error) = error {
            warn!("ending session: {error}");
        }
        info!(
            "session ended by {cause:?} with score {} at level {} after {} steps",
            self.score,
            self.level.number(),
            self.step_count
        );
        self.ended = Some(cause);
        report.ended = Some(cause);
        report
    }

    /// Snake body and obstacle cells.
    #[must_use]
    pub fn occupied_cells(&self) -> HashSet<Position> {
        self.snake
            .segments()
            .chain(self.level.obstacles().iter())
            .copied()
            .collect()
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> &Food {
        &self.food
    }

    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    #[must_use]
    pub fn ended(&self) -> Option<EndCause> {
        self.ended
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;
    use crate::food::{Food, FoodKind};
    use crate::input::Direction;
    use crate::level::Level;
    use crate::snake::{Position, Snake};

    use super::{EndCause, Session};

    const BOUNDS: GridSize = GridSize {
        width: 40,
        height: 30,
    };

    fn scripted(snake: Snake, food: Food, level: Level) -> Session {
        Session::from_parts(
            BOUNDS,
            snake,
            food,
            level,
            StdRng::seed_from_u64(17),
            Duration::ZERO,
        )
    }

    fn food(kind: FoodKind, x: i32, y: i32) -> Food {
        Food::new(Position::new(x, y), kind, Duration::ZERO)
    }

    #[test]
    fn new_session_starts_centered_with_free_food() {
        let session = Session::new_with_seed(BOUNDS, 1, Duration::ZERO).expect("room for food");

        assert_eq!(session.snake().head(), Position::new(20, 15));
        assert_eq!(session.snake().len(), 3);
        assert!(!session.snake().occupies(session.food().position));
        assert_eq!(session.food().kind, FoodKind::Normal);
        assert_eq!(session.score(), 0);
        assert_eq!(session.level().number(), 1);
    }

    #[test]
    fn snake_grows_after_eating_food() {
        let mut session = scripted(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            food(FoodKind::Normal, 6, 5),
            Level::new(),
        );

        let report = session.step(Duration::from_millis(100));
        assert_eq!(report.ate, Some(FoodKind::Normal));
        assert_eq!(session.snake().len(), 4);
        assert_eq!(session.score(), 10);
        assert!(!session.snake().occupies(session.food().position));
        assert_ne!(session.food().position, Position::new(6, 5));

        session.step(Duration::from_millis(200));
        assert_eq!(session.snake().len(), 4);
    }

    #[test]
    fn each_food_kind_adds_its_points() {
        for (kind, points) in [
            (FoodKind::Normal, 10),
            (FoodKind::Bonus, 30),
            (FoodKind::Speed, 20),
            (FoodKind::Slow, 5),
        ] {
            let mut session = scripted(
                Snake::new(Position::new(5, 5), Direction::Right, 3),
                food(kind, 6, 5),
                Level::new(),
            );

            session.step(Duration::from_millis(100));
            assert_eq!(session.score(), points, "{kind:?}");
        }
    }

    #[test]
    fn speed_food_boosts_for_five_seconds() {
        let mut session = scripted(
            Snake::new(Position::new(2, 5), Direction::Right, 3),
            food(FoodKind::Speed, 3, 5),
            Level::new(),
        );
        let eaten_at = Duration::from_millis(1_000);

        session.step(eaten_at);
        assert_eq!(session.effect().multiplier(), 1.5);
        assert_eq!(session.tick_interval(), Duration::from_secs_f64(1.0 / 15.0));

        session.change_direction(Direction::Down);
        session.step(eaten_at + Duration::from_millis(4_999));
        assert_eq!(session.effect().multiplier(), 1.5);

        session.step(eaten_at + Duration::from_millis(5_000));
        assert_eq!(session.effect().multiplier(), 1.0);
        assert_eq!(session.ended(), None);
    }

    #[test]
    fn slow_food_replaces_active_speed_effect() {
        let mut session = scripted(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            food(FoodKind::Speed, 6, 5),
            Level::new(),
        );
        session.step(Duration::from_millis(100));

        session.food = food(FoodKind::Slow, 7, 5);
        session.step(Duration::from_millis(200));

        assert_eq!(session.effect().multiplier(), 0.75);
    }

    #[test]
    fn expired_bonus_food_relocates_without_scoring() {
        let mut session = scripted(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            food(FoodKind::Bonus, 30, 20),
            Level::new(),
        );

        session.step(Duration::from_millis(10_000));
        assert_eq!(session.food().position, Position::new(30, 20));

        session.step(Duration::from_millis(10_001));
        assert_eq!(session.food().created_at, Duration::from_millis(10_001));
        assert_eq!(session.food().kind, FoodKind::Normal);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn obstacle_ahead_ends_session_before_moving() {
        let mut session = scripted(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            food(FoodKind::Normal, 20, 20),
            Level::with_obstacles([Position::new(6, 5)]),
        );

        let report = session.step(Duration::from_millis(100));

        assert_eq!(report.ended, Some(EndCause::Obstacle));
        assert_eq!(session.snake().head(), Position::new(5, 5));
        assert_eq!(session.ended(), Some(EndCause::Obstacle));
    }

    #[test]
    fn wall_and_self_collisions_report_their_cause() {
        let mut session = scripted(
            Snake::new(Position::new(39, 5), Direction::Right, 3),
            food(FoodKind::Normal, 20, 20),
            Level::new(),
        );
        assert_eq!(
            session.step(Duration::from_millis(100)).ended,
            Some(EndCause::Wall)
        );

        let mut session = scripted(
            Snake::from_segments(
                vec![
                    Position::new(2, 2),
                    Position::new(2, 3),
                    Position::new(1, 3),
                    Position::new(1, 2),
                    Position::new(1, 1),
                ],
                Direction::Up,
            ),
            food(FoodKind::Normal, 20, 20),
            Level::new(),
        );
        session.change_direction(Direction::Left);
        assert_eq!(
            session.step(Duration::from_millis(100)).ended,
            Some(EndCause::SelfCollision)
        );
    }

    #[test]
    fn ended_session_ignores_further_steps() {
        let mut session = scripted(
            Snake::new(Position::new(39, 5), Direction::Right, 3),
            food(FoodKind::Normal, 20, 20),
            Level::new(),
        );
        session.step(Duration::from_millis(100));
        let steps = session.step_count();

        let report = session.step(Duration::from_millis(200));
        assert_eq!(report.ended, Some(EndCause::Wall));
        assert!(!report.moved);
        assert_eq!(session.step_count(), steps);
        assert!(!session.step_due(Duration::from_secs(60)));
    }

    #[test]
    fn reaching_the_threshold_levels_up_while_eating() {
        let mut session = scripted(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            food(FoodKind::Bonus, 6, 5),
            Level::new(),
        );
        session.score = 80;

        let report = session.step(Duration::from_millis(100));

        assert!(report.leveled_up);
        assert_eq!(session.level().number(), 2);
        assert_eq!(session.level().speed(), 12);
    }

    #[test]
    fn full_board_ends_the_session() {
        // A 4x1 corridor: after eating, the 4-cell snake leaves no free cell.
        let bounds = GridSize {
            width: 4,
            height: 1,
        };
        let mut session = Session::from_parts(
            bounds,
            Snake::new(Position::new(2, 0), Direction::Right, 3),
            food(FoodKind::Normal, 3, 0),
            Level::new(),
            StdRng::seed_from_u64(1),
            Duration::ZERO,
        );

        let report = session.step(Duration::from_millis(100));

        assert_eq!(report.ate, Some(FoodKind::Normal));
        assert_eq!(report.ended, Some(EndCause::BoardFull));
        assert_eq!(session.score(), 10);
    }

    #[test]
    fn expired_food_may_land_ahead_when_no_other_cell_is_free() {
        // A 3x1 corridor: the only free cell is the one the head enters next.
        let bounds = GridSize {
            width: 3,
            height: 1,
        };
        let mut session = Session::from_parts(
            bounds,
            Snake::new(Position::new(1, 0), Direction::Right, 2),
            food(FoodKind::Bonus, 2, 0),
            Level::new(),
            StdRng::seed_from_u64(5),
            Duration::ZERO,
        );

        let report = session.step(Duration::from_millis(10_001));

        assert_eq!(report.ate, Some(FoodKind::Normal));
        assert_eq!(report.ended, Some(EndCause::BoardFull));
        assert_eq!(session.score(), 10);
        assert_eq!(session.snake().len(), 2);
    }

    #[test]
    fn steps_are_gated_by_speed() {
        let session = scripted(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            food(FoodKind::Normal, 20, 20),
            Level::new(),
        );

        assert!(!session.step_due(Duration::from_millis(99)));
        assert!(session.step_due(Duration::from_millis(100)));
    }
}
