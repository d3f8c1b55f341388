use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::app::{
    GameOverItem, GameResult, GameState, HighScoreItem, MenuItem, Snapshot, SoundItem,
};
use crate::audio::SoundSettings;
use crate::config::{MAX_HIGH_SCORES, MAX_NAME_LENGTH, Theme};
use crate::game::EndCause;
use crate::score::ScoreEntry;

/// Draws the main menu as a centered popup.
pub fn render_main_menu(frame: &mut Frame<'_>, area: Rect, cursor: usize, theme: &Theme) {
    let popup = centered_popup(area, 60, 50);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme.menu_title)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let labels = MenuItem::ALL.map(MenuItem::label);
    frame.render_widget(
        Paragraph::new(cursor_lines(&labels, cursor, theme))
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" menu ")),
        body_row,
    );

    render_footer(frame, footer_row, "Arrows/WASD steer  P pause  Esc menu", theme);
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 50, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[P]/[Space] Resume"),
        Line::from("[Esc] Main menu"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over screen with the final result.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    result: Option<GameResult>,
    cursor: usize,
    theme: &Theme,
) {
    let popup = centered_popup(area, 60, 50);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from("GAME OVER").style(Style::default().fg(theme.warning)),
        Line::from(""),
    ];
    if let Some(result) = result {
        lines.push(Line::from(format!("Score: {}", result.score)));
        lines.push(Line::from(format!("Level: {}", result.level)));
        lines.push(Line::from(format!("Cause: {}", cause_text(result.cause))));
        lines.push(Line::from(""));
    }
    let labels = GameOverItem::ALL.map(GameOverItem::label);
    lines.extend(cursor_lines(&labels, cursor, theme));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

/// Draws the name prompt shown after a qualifying score.
pub fn render_name_input(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    pending_name: &str,
    theme: &Theme,
) {
    let popup = centered_popup(area, 60, 40);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("NEW HIGH SCORE").style(
            Style::default()
                .fg(theme.menu_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(""),
        Line::from(format!("Name: {pending_name}_"))
            .style(Style::default().fg(theme.menu_selected)),
        Line::from(format!("up to {MAX_NAME_LENGTH} characters")),
        Line::from(""),
        Line::from("[Enter] Save"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" enter name ")),
        popup,
    );
}

/// Draws the ranked high-score table.
pub fn render_high_scores(
    frame: &mut Frame<'_>,
    area: Rect,
    entries: &[ScoreEntry],
    cursor: usize,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 80);
    frame.render_widget(Clear, popup);

    let mut lines = Vec::with_capacity(MAX_HIGH_SCORES + 4);
    if entries.is_empty() {
        lines.push(Line::from("No scores yet"));
    }
    for (rank, entry) in entries.iter().enumerate() {
        lines.push(Line::from(score_row(rank + 1, entry)));
    }
    lines.push(Line::from(""));
    let labels = HighScoreItem::ALL.map(HighScoreItem::label);
    lines.extend(cursor_lines(&labels, cursor, theme));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" high scores ")),
        popup,
    );
}

/// Draws the sound options screen.
pub fn render_sound_options(
    frame: &mut Frame<'_>,
    area: Rect,
    sound: SoundSettings,
    cursor: usize,
    theme: &Theme,
) {
    let popup = centered_popup(area, 60, 50);
    frame.render_widget(Clear, popup);

    let labels = SoundItem::ALL.map(|item| sound_row(item, sound));
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    let mut lines = cursor_lines(&labels, cursor, theme);
    lines.push(Line::from(""));
    lines.push(
        Line::from("Left/Right adjust volume").style(Style::default().fg(theme.menu_footer)),
    );

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" options ")),
        popup,
    );
}

/// Picks the overlay for `snapshot.state`; nothing is drawn while playing.
pub fn render_overlay(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    match snapshot.state {
        GameState::Playing => {}
        GameState::Menu => render_main_menu(frame, area, snapshot.cursor, theme),
        GameState::Paused => render_pause_menu(frame, area),
        GameState::GameOver => {
            render_game_over_menu(frame, area, snapshot.last_result, snapshot.cursor, theme);
        }
        GameState::NameInput => render_name_input(
            frame,
            area,
            snapshot.last_result.map_or(snapshot.score, |r| r.score),
            snapshot.pending_name,
            theme,
        ),
        GameState::HighScores => {
            render_high_scores(frame, area, &snapshot.high_scores, snapshot.cursor, theme);
        }
        GameState::SoundOptions => {
            render_sound_options(frame, area, snapshot.sound, snapshot.cursor, theme);
        }
    }
}

fn cursor_lines(labels: &[&str], cursor: usize, theme: &Theme) -> Vec<Line<'static>> {
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            if index == cursor {
                Line::from(format!("> {label} <")).style(
                    Style::default()
                        .fg(theme.menu_selected)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Line::from(label.to_string())
            }
        })
        .collect()
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, text: &'static str, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(text))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.menu_footer)),
        area,
    );
}

fn cause_text(cause: EndCause) -> &'static str {
    match cause {
        EndCause::Obstacle => "hit an obstacle",
        EndCause::Wall => "hit the wall",
        EndCause::SelfCollision => "bit yourself",
        EndCause::BoardFull => "no room left",
    }
}

fn score_row(rank: usize, entry: &ScoreEntry) -> String {
    format!("{rank:>2}. {:<width$} {:>6}", entry.name, entry.score, width = MAX_NAME_LENGTH)
}

fn sound_row(item: SoundItem, sound: SoundSettings) -> String {
    match item {
        SoundItem::Back => "Back".to_owned(),
        SoundItem::Sound => format!("Sound: {}", on_off(sound.sound_enabled)),
        SoundItem::Music => format!("Music: {}", on_off(sound.music_enabled)),
        SoundItem::SoundVolume => format!("Sound volume: {}", volume_bar(sound.sound_volume)),
        SoundItem::MusicVolume => format!("Music volume: {}", volume_bar(sound.music_volume)),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "On" } else { "Off" }
}

fn volume_bar(volume: f32) -> String {
    let filled = (volume.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}

#[cfg(test)]
mod tests {
    use crate::score::ScoreEntry;

    use super::{score_row, volume_bar};

    #[test]
    fn score_rows_align_names_and_points() {
        let entry = ScoreEntry {
            name: "ada".to_owned(),
            score: 340,
        };
        assert_eq!(score_row(1, &entry), " 1. ada           340");
    }

    #[test]
    fn volume_bar_fills_in_tenths() {
        assert_eq!(volume_bar(0.7), "███████░░░");
        assert_eq!(volume_bar(0.0), "░░░░░░░░░░");
    }
}
