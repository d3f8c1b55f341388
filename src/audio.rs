use std::io::{self, Write};

use crate::config::VOLUME_STEP;

/// Discrete sound cues emitted by the game as transitions happen.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AudioCue {
    Move,
    Eat,
    GameOver,
    LevelUp,
    MenuSelect,
    MenuNavigate,
}

/// User-adjustable sound preferences edited on the options screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundSettings {
    pub sound_enabled: bool,
    pub music_enabled: bool,
    pub sound_volume: f32,
    pub music_volume: f32,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
            sound_volume: 0.7,
            music_volume: 0.5,
        }
    }
}

impl SoundSettings {
    /// Settings with every channel switched off.
    #[must_use]
    pub fn muted() -> Self {
        Self {
            sound_enabled: false,
            music_enabled: false,
            ..Self::default()
        }
    }

    /// Moves the effects volume by `steps` increments, clamped to [0, 1].
    pub fn nudge_sound_volume(&mut self, steps: i8) {
        self.sound_volume = nudge(self.sound_volume, steps);
    }

    /// Moves the music volume by `steps` increments, clamped to [0, 1].
    pub fn nudge_music_volume(&mut self, steps: i8) {
        self.music_volume = nudge(self.music_volume, steps);
    }
}

fn nudge(volume: f32, steps: i8) -> f32 {
    let raw = volume + f32::from(steps) * VOLUME_STEP;
    // Snap to tenths so repeated steps do not drift.
    ((raw * 10.0).round() / 10.0).clamp(0.0, 1.0)
}

/// Playback side of the audio boundary.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue, settings: &SoundSettings);
}

/// Rings the terminal bell for the cues worth hearing.
#[derive(Debug, Default)]
pub struct BellSink;

impl AudioSink for BellSink {
    fn play(&mut self, cue: AudioCue, settings: &SoundSettings) {
        if !settings.sound_enabled || settings.sound_volume <= 0.0 {
            return;
        }

        if matches!(cue, AudioCue::Eat | AudioCue::LevelUp | AudioCue::GameOver) {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(b"\x07");
            let _ = stdout.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SoundSettings;

    #[test]
    fn volume_steps_clamp_to_unit_range() {
        let mut settings = SoundSettings::default();

        for _ in 0..10 {
            settings.nudge_sound_volume(1);
        }
        assert_eq!(settings.sound_volume, 1.0);

        for _ in 0..15 {
            settings.nudge_music_volume(-1);
        }
        assert_eq!(settings.music_volume, 0.0);
    }

    #[test]
    fn volume_steps_stay_on_tenths() {
        let mut settings = SoundSettings::default();
        settings.nudge_sound_volume(-1);
        settings.nudge_sound_volume(-1);
        assert_eq!(settings.sound_volume, 0.5);
    }

    #[test]
    fn muted_settings_disable_both_channels() {
        let settings = SoundSettings::muted();
        assert!(!settings.sound_enabled);
        assert!(!settings.music_enabled);
    }
}
