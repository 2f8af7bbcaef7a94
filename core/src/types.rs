use alloc::format;
use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Position of a card within the dealt deck.
pub type CardIndex = u8;

/// Count type used for deck sizes and pair counts.
pub type CardCount = u8;

/// Milliseconds on the game clock, epoch based when driven by a wall clock.
pub type Millis = u64;

/// Logical face value of a card, two cards with equal identity form a pair.
///
/// Identities are numbered from 1 and map onto the `coffee<N>.png` assets of a difficulty tier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity(u8);

impl Identity {
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub fn file_name(self) -> String {
        format!("coffee{}.png", self.0)
    }
}
