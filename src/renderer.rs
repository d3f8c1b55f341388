use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::app::Snapshot;
use crate::config::{
    BORDER_HALF_BLOCK, GLYPH_FOOD, GLYPH_FOOD_SPECIAL, GLYPH_OBSTACLE, GLYPH_SNAKE_BODY,
    GLYPH_SNAKE_HEAD, GridSize, Theme,
};
use crate::food::FoodKind;
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::render_overlay;

/// Renders the full frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot<'_>, theme: &Theme) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot, theme);
    let play_area = fit_play_area(play_area, snapshot.bounds);

    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(theme.border_fg).bg(theme.border_bg));

    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_obstacles(frame, inner, snapshot, theme);
    render_food(frame, inner, snapshot, theme);
    render_snake(frame, inner, snapshot, theme);

    render_overlay(frame, play_area, snapshot, theme);
}

/// Shrinks `area` to the grid plus its border, centered horizontally.
fn fit_play_area(area: Rect, bounds: GridSize) -> Rect {
    let width = area.width.min(bounds.width.saturating_add(2));
    let height = area.height.min(bounds.height.saturating_add(2));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height,
    }
}

fn render_obstacles(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let style = Style::new().fg(theme.obstacle);
    let buffer = frame.buffer_mut();
    for cell in snapshot.obstacles.iter() {
        if let Some((x, y)) = logical_to_terminal(inner, snapshot.bounds, *cell) {
            buffer.set_string(x, y, GLYPH_OBSTACLE, style);
        }
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let food = snapshot.food;
    let Some((x, y)) = logical_to_terminal(inner, snapshot.bounds, food.position) else {
        return;
    };

    let (glyph, color) = match food.kind {
        FoodKind::Normal => (GLYPH_FOOD, theme.food_normal),
        FoodKind::Bonus => (GLYPH_FOOD_SPECIAL, theme.food_bonus),
        FoodKind::Speed => (GLYPH_FOOD_SPECIAL, theme.food_speed),
        FoodKind::Slow => (GLYPH_FOOD_SPECIAL, theme.food_slow),
    };
    frame
        .buffer_mut()
        .set_string(x, y, glyph, Style::new().fg(color));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let head = snapshot.snake.head();
    let buffer = frame.buffer_mut();

    for segment in snapshot.snake.segments() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.bounds, *segment) else {
            continue;
        };

        if *segment == head {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(theme.snake_head)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(theme.snake_body));
        }
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use crate::config::GridSize;
    use crate::snake::Position;

    use super::{fit_play_area, logical_to_terminal};

    const BOUNDS: GridSize = GridSize {
        width: 10,
        height: 5,
    };

    #[test]
    fn cells_map_inside_the_inner_area() {
        let inner = Rect::new(3, 2, 10, 5);
        assert_eq!(
            logical_to_terminal(inner, BOUNDS, Position::new(0, 0)),
            Some((3, 2))
        );
        assert_eq!(
            logical_to_terminal(inner, BOUNDS, Position::new(9, 4)),
            Some((12, 6))
        );
        assert_eq!(logical_to_terminal(inner, BOUNDS, Position::new(10, 0)), None);
        assert_eq!(logical_to_terminal(inner, BOUNDS, Position::new(-1, 0)), None);
    }

    #[test]
    fn cells_outside_a_clipped_area_are_skipped() {
        let inner = Rect::new(0, 0, 4, 3);
        assert_eq!(logical_to_terminal(inner, BOUNDS, Position::new(5, 1)), None);
    }

    #[test]
    fn play_area_is_centered_around_the_grid() {
        let area = Rect::new(0, 0, 40, 20);
        assert_eq!(fit_play_area(area, BOUNDS), Rect::new(14, 0, 12, 7));

        let tight = Rect::new(0, 0, 8, 4);
        assert_eq!(fit_play_area(tight, BOUNDS), tight);
    }
}
