use alloc::format;
use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

pub const WIN_BANNER_TEXT: &str = "You Win!";
pub const INSTRUCTION_BANNER_TEXT: &str = "Enter a nickname and press start. Flip two cards at a time and clear the board.";

/// Text slots the engine pushes state into, an empty text hides a banner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayField {
    Time,
    Flips,
    Matches,
    Score,
    WinBanner,
    InstructionBanner,
}

pub fn time_text(elapsed_secs: u64) -> String {
    format!("⏱ Time: {}", format_clock(elapsed_secs))
}

pub fn flips_text(flips: u32) -> String {
    format!("🔁 Flips: {}", flips)
}

pub fn matches_text(matches: CardCount) -> String {
    format!("✅ Matches: {}", matches)
}

pub fn score_text(score: u32) -> String {
    format!("Total Score: {}", score)
}

/// Presentation layer the game drives: board rendering, signal playback and display text.
pub trait Frontend {
    /// Lays out a freshly dealt deck, every card must route its interactions back as flip requests.
    fn render_deck(&mut self, deck: &Deck, difficulty: Difficulty);

    /// Best effort, failures stay inside the implementation.
    fn play_signal(&mut self, signal: Signal);

    fn stop_signal(&mut self, _signal: Signal) {}

    fn set_display(&mut self, field: DisplayField, text: &str);
}

/// Frontend that keeps everything it was asked to do.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingFrontend {
    pub decks: alloc::vec::Vec<Deck>,
    pub signals: alloc::vec::Vec<Signal>,
    pub stopped: alloc::vec::Vec<Signal>,
    pub displays: hashbrown::HashMap<DisplayField, String>,
}

#[cfg(test)]
impl RecordingFrontend {
    pub fn display(&self, field: DisplayField) -> &str {
        self.displays.get(&field).map_or("", String::as_str)
    }
}

#[cfg(test)]
impl Frontend for RecordingFrontend {
    fn render_deck(&mut self, deck: &Deck, _difficulty: Difficulty) {
        self.decks.push(deck.clone());
    }

    fn play_signal(&mut self, signal: Signal) {
        self.signals.push(signal);
    }

    fn stop_signal(&mut self, signal: Signal) {
        self.stopped.push(signal);
    }

    fn set_display(&mut self, field: DisplayField, text: &str) {
        self.displays.insert(field, String::from(text));
    }
}
