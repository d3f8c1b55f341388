use std::time::Duration;

use crate::config::{EFFECT_DURATION, SLOW_EFFECT_MULTIPLIER, SPEED_EFFECT_MULTIPLIER};
use crate::food::FoodKind;

/// Which timed movement effect is active.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EffectKind {
    Speed,
    Slow,
}

impl EffectKind {
    #[must_use]
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Speed => SPEED_EFFECT_MULTIPLIER,
            Self::Slow => SLOW_EFFECT_MULTIPLIER,
        }
    }

    /// The effect granted by eating `kind`, if any.
    #[must_use]
    pub fn from_food(kind: FoodKind) -> Option<Self> {
        match kind {
            FoodKind::Speed => Some(Self::Speed),
            FoodKind::Slow => Some(Self::Slow),
            FoodKind::Normal | FoodKind::Bonus => None,
        }
    }
}

/// At most one active movement multiplier with its expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Effect {
    active: Option<(EffectKind, Duration)>,
}

impl Effect {
    /// Starts `kind` at `now`, replacing whatever was active.
    pub fn apply(&mut self, kind: EffectKind, now: Duration) {
        self.active = Some((kind, now + EFFECT_DURATION));
    }

    /// Clears the effect once `now` reaches its expiry. Returns true when it
    /// was cleared by this call.
    pub fn expire(&mut self, now: Duration) -> bool {
        match self.active {
            Some((_, expires_at)) if now >= expires_at => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn multiplier(&self) -> f32 {
        self.active.map_or(1.0, |(kind, _)| kind.multiplier())
    }

    #[must_use]
    pub fn kind(&self) -> Option<EffectKind> {
        self.active.map(|(kind, _)| kind)
    }

    /// Time left before expiry, as seen at `now`.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.active
            .map(|(_, expires_at)| expires_at.saturating_sub(now))
    }
}
