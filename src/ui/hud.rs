use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::Snapshot;
use crate::config::Theme;
use crate::effect::EffectKind;

const PLAY_AREA_MARGIN_X: u16 = 1;
const HUD_INNER_MARGIN_X: u16 = 1;
const SEPARATOR: &str = " │ ";

/// Renders the two-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot<'_>,
    theme: &Theme,
) -> Rect {
    let [play_area, score_area, status_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let score_area = inset_horizontal(score_area, PLAY_AREA_MARGIN_X + HUD_INNER_MARGIN_X);
    let status_area = inset_horizontal(status_area, PLAY_AREA_MARGIN_X + HUD_INNER_MARGIN_X);

    let best = snapshot
        .high_scores
        .first()
        .map_or(0, |entry| entry.score)
        .max(snapshot.score);
    let stats = TopStats {
        length: snapshot.snake.len(),
        level: snapshot.level,
        score: snapshot.score,
        best,
    };

    frame.render_widget(
        Paragraph::new(top_info_line(stats, usize::from(score_area.width), theme))
            .alignment(Alignment::Right),
        score_area,
    );

    frame.render_widget(
        Paragraph::new(status_line(
            snapshot.speed,
            snapshot.next_threshold,
            snapshot.effect.zip(snapshot.effect_remaining),
            theme,
        ))
        .alignment(Alignment::Right),
        status_area,
    );

    play_area
}

#[derive(Debug, Clone, Copy)]
struct TopStats {
    length: usize,
    level: u32,
    score: u32,
    best: u32,
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let total_margin = margin.saturating_mul(2);
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(total_margin),
        height: area.height,
    }
}

fn top_info_line(stats: TopStats, available_width: usize, theme: &Theme) -> Line<'static> {
    let compact = top_info_width(stats, false) > available_width;
    let labels = if compact {
        ["L", "V", "S", "H"]
    } else {
        ["Length", "Level", "Score", "Hi"]
    };

    let label = Style::default().fg(theme.hud_label);
    let value = Style::default().fg(theme.hud_value);
    let best_style = if stats.score >= stats.best && stats.score > 0 {
        value.fg(theme.menu_selected).add_modifier(Modifier::BOLD)
    } else {
        value
    };

    Line::from(vec![
        Span::styled(format!("{}: ", labels[0]), label),
        Span::styled(stats.length.to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled(format!("{}: ", labels[1]), label),
        Span::styled(stats.level.to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled(format!("{}: ", labels[2]), label),
        Span::styled(stats.score.to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled(format!("{}: ", labels[3]), label),
        Span::styled(stats.best.to_string(), best_style),
    ])
}

fn top_info_width(stats: TopStats, compact: bool) -> usize {
    let labels: [&str; 4] = if compact {
        ["L", "V", "S", "H"]
    } else {
        ["Length", "Level", "Score", "Hi"]
    };
    let values = [
        stats.length.to_string(),
        stats.level.to_string(),
        stats.score.to_string(),
        stats.best.to_string(),
    ];

    let fields: usize = labels
        .iter()
        .zip(&values)
        .map(|(label, value)| label.chars().count() + 2 + value.chars().count())
        .sum();
    fields + SEPARATOR.chars().count() * (labels.len() - 1)
}

fn status_line(
    speed: u32,
    next_threshold: u32,
    effect: Option<(EffectKind, Duration)>,
    theme: &Theme,
) -> Line<'static> {
    let label = Style::default().fg(theme.hud_label);
    let value = Style::default().fg(theme.hud_value);

    let mut spans = Vec::with_capacity(8);
    if let Some(text) = effect_text(effect) {
        let color = match effect.map(|(kind, _)| kind) {
            Some(EffectKind::Speed) => theme.food_speed,
            _ => theme.food_slow,
        };
        spans.push(Span::styled(text, Style::default().fg(color)));
        spans.push(Span::styled(SEPARATOR, label));
    }

    spans.extend([
        Span::styled("Speed: ", label),
        Span::styled(speed.to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled("Next: ", label),
        Span::styled(next_threshold.to_string(), value),
    ]);

    Line::from(spans)
}

fn effect_text(effect: Option<(EffectKind, Duration)>) -> Option<String> {
    let (kind, remaining) = effect?;
    let name = match kind {
        EffectKind::Speed => "Fast",
        EffectKind::Slow => "Slow",
    };
    Some(format!("{name} {:.1}s", remaining.as_secs_f32()))
}
