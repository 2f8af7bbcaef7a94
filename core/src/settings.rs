use alloc::string::{String, ToString};
use core::ops::Deref;
use serde::{Deserialize, Serialize};

use crate::*;

pub const INPUT_LOCK_MS: Millis = 300;
pub const RESOLVE_DELAY_MS: Millis = 800;
pub const MIN_RESOLVE_DELAY_MS: Millis = 100;
pub const WIN_SIGNAL_DELAY_MS: Millis = 500;
pub const SCORE_REVEAL_DELAY_MS: Millis = 2000;
pub const MATCH_SIGNAL_COOLDOWN_MS: Millis = 3000;
pub const MATCH_SIGNAL_GRACE_MS: Millis = 2000;
pub const CLOCK_TICK_MS: Millis = 1000;

/// Delays driving a session, all measured on the logical game clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Window after each accepted flip during which further flips are ignored.
    pub input_lock: Millis,
    /// Pause between revealing the second card of a pair and deciding it.
    pub resolve_delay: Millis,
    pub win_signal_delay: Millis,
    pub score_reveal_delay: Millis,
    pub match_signal_cooldown: Millis,
    pub match_signal_grace: Millis,
    pub clock_tick: Millis,
}

impl Timings {
    /// Resolution must stay perceptible, it is never allowed to go below the minimum.
    pub fn normalized(self) -> Self {
        Self {
            resolve_delay: self.resolve_delay.max(MIN_RESOLVE_DELAY_MS),
            clock_tick: self.clock_tick.max(1),
            ..self
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            input_lock: INPUT_LOCK_MS,
            resolve_delay: RESOLVE_DELAY_MS,
            win_signal_delay: WIN_SIGNAL_DELAY_MS,
            score_reveal_delay: SCORE_REVEAL_DELAY_MS,
            match_signal_cooldown: MATCH_SIGNAL_COOLDOWN_MS,
            match_signal_grace: MATCH_SIGNAL_GRACE_MS,
            clock_tick: CLOCK_TICK_MS,
        }
    }
}

/// Playback volume in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Volume(f32);

impl Volume {
    pub const DEFAULT: Self = Self(0.5);

    pub fn new(level: f32) -> Self {
        if level.is_nan() {
            Self::DEFAULT
        } else {
            Self(level.clamp(0.0, 1.0))
        }
    }

    pub const fn level(self) -> f32 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<f32> for Volume {
    fn from(level: f32) -> Self {
        Self::new(level)
    }
}

impl From<Volume> for f32 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

/// Nickname a score is recorded under, never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            Err(GameError::EmptyPlayerName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for PlayerName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Player-facing options that survive between sessions.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub volume: Volume,
    #[serde(default = "default_total_cards")]
    pub total_cards: CardCount,
}

const fn default_total_cards() -> CardCount {
    DEFAULT_TOTAL_CARDS
}

impl Settings {
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(self.difficulty, self.total_cards)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            volume: Volume::default(),
            total_cards: DEFAULT_TOTAL_CARDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_name_is_trimmed_and_non_empty() {
        assert_eq!(PlayerName::new("  ada ").unwrap().as_str(), "ada");
        assert!(matches!(
            PlayerName::new("   "),
            Err(GameError::EmptyPlayerName)
        ));
    }

    #[test]
    fn volume_is_clamped_to_unit_range() {
        assert_eq!(Volume::new(1.5).level(), 1.0);
        assert_eq!(Volume::new(-0.2).level(), 0.0);
        assert_eq!(Volume::new(f32::NAN), Volume::DEFAULT);
        assert_eq!(Volume::new(0.25).level(), 0.25);
    }

    #[test]
    fn volume_deserializes_through_clamp() {
        let volume: Volume = serde_json::from_str("3.0").unwrap();
        assert_eq!(volume.level(), 1.0);
    }

    #[test]
    fn resolve_delay_never_normalizes_to_zero() {
        let timings = Timings {
            resolve_delay: 0,
            ..Timings::default()
        }
        .normalized();
        assert_eq!(timings.resolve_delay, MIN_RESOLVE_DELAY_MS);
        assert_eq!(Timings::default().normalized(), Timings::default());
    }

    #[test]
    fn settings_without_card_count_use_default() {
        let settings: Settings =
            serde_json::from_str(r#"{"difficulty":"hard","volume":0.3}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.total_cards, DEFAULT_TOTAL_CARDS);
    }
}
