use std::collections::HashSet;
use std::time::Duration;

use arcade_snake::config::GridSize;
use arcade_snake::effect::EffectKind;
use arcade_snake::food::{self, Food, FoodKind, PlacementError};
use arcade_snake::game::{EndCause, Session};
use arcade_snake::input::Direction;
use arcade_snake::level::Level;
use arcade_snake::snake::{MoveOutcome, Position, Snake};
use rand::SeedableRng;
use rand::rngs::StdRng;

const BOUNDS: GridSize = GridSize {
    width: 40,
    height: 30,
};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn fresh_snake_moves_one_cell_right() {
    let mut snake = Snake::new(Position::new(20, 15), Direction::Right, 3);

    assert_eq!(snake.move_forward(BOUNDS), MoveOutcome::Moved);
    assert_eq!(snake.head(), Position::new(21, 15));
    assert_eq!(snake.len(), 3);
    assert!(snake.is_alive());
}

#[test]
fn growth_applies_once() {
    let mut snake = Snake::new(Position::new(20, 15), Direction::Right, 3);
    snake.grow();

    snake.move_forward(BOUNDS);
    snake.move_forward(BOUNDS);

    assert_eq!(snake.len(), 4);
}

#[test]
fn speed_food_effect_lasts_five_seconds_of_simulated_time() {
    let mut session = Session::from_parts(
        BOUNDS,
        Snake::new(Position::new(5, 5), Direction::Right, 3),
        Food::new(Position::new(6, 5), FoodKind::Speed, Duration::ZERO),
        Level::new(),
        StdRng::seed_from_u64(11),
        Duration::ZERO,
    );

    let report = session.step(ms(100));
    assert_eq!(report.ate, Some(FoodKind::Speed));
    assert_eq!(session.score(), 20);
    assert_eq!(session.effect().kind(), Some(EffectKind::Speed));
    assert_eq!(session.effect().multiplier(), 1.5);

    // Steer down the column so the snake never reaches a wall.
    session.change_direction(Direction::Down);
    session.step(ms(5_099));
    assert_eq!(session.effect().multiplier(), 1.5);

    session.step(ms(5_100));
    assert_eq!(session.effect().multiplier(), 1.0);
    assert_eq!(session.effect().kind(), None);
}

#[test]
fn surrounded_free_space_reports_board_full() {
    let bounds = GridSize {
        width: 3,
        height: 3,
    };
    let occupied: HashSet<Position> = (0..3)
        .flat_map(|x| (0..3).map(move |y| Position::new(x, y)))
        .collect();
    let mut rng = StdRng::seed_from_u64(5);

    assert_eq!(
        food::place(&mut rng, bounds, &occupied),
        Err(PlacementError::BoardFull {
            width: 3,
            height: 3,
        })
    );
}

#[test]
fn scripted_run_eats_then_hits_the_wall() {
    let bounds = GridSize {
        width: 6,
        height: 4,
    };
    let mut session = Session::from_parts(
        bounds,
        Snake::new(Position::new(2, 0), Direction::Right, 2),
        Food::new(Position::new(3, 0), FoodKind::Normal, Duration::ZERO),
        Level::new(),
        StdRng::seed_from_u64(42),
        Duration::ZERO,
    );

    let report = session.step(ms(100));
    assert_eq!(report.ate, Some(FoodKind::Normal));
    assert!(report.moved);
    assert_eq!(session.score(), 10);
    assert_eq!(session.snake().len(), 3);
    assert_eq!(session.snake().head(), Position::new(3, 0));

    session.change_direction(Direction::Up);
    let report = session.step(ms(200));
    assert_eq!(report.ended, Some(EndCause::Wall));
    assert!(!report.moved);
    assert_eq!(session.ended(), Some(EndCause::Wall));
    assert_eq!(session.snake().head(), Position::new(3, 0));
    assert_eq!(session.score(), 10);

    let report = session.step(ms(300));
    assert_eq!(report.ended, Some(EndCause::Wall));
    assert_eq!(session.step_count(), 2);
}

#[test]
fn same_seed_replays_the_same_food_sequence() {
    let first = Session::new_with_seed(BOUNDS, 99, Duration::ZERO).expect("room for food");
    let second = Session::new_with_seed(BOUNDS, 99, Duration::ZERO).expect("room for food");

    assert_eq!(first.food().position, second.food().position);
    assert_eq!(first.food().kind, second.food().kind);
}
