#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

pub use card::*;
pub use difficulty::*;
pub use display::*;
pub use engine::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use leaderboard::*;
pub use scheduler::*;
pub use score::*;
pub use session::*;
pub use settings::*;
pub use signal::*;
pub use timer::*;
pub use types::*;

mod card;
mod difficulty;
mod display;
mod engine;
mod error;
mod game;
mod generator;
mod leaderboard;
mod scheduler;
mod score;
mod session;
mod settings;
mod signal;
mod timer;
mod types;

pub const MIN_TOTAL_CARDS: CardCount = 2;
pub const MAX_TOTAL_CARDS: CardCount = 64;
pub const DEFAULT_TOTAL_CARDS: CardCount = 12;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub total_cards: CardCount,
}

impl GameConfig {
    pub const fn new_unchecked(difficulty: Difficulty, total_cards: CardCount) -> Self {
        Self {
            difficulty,
            total_cards,
        }
    }

    pub fn new(difficulty: Difficulty, total_cards: CardCount) -> Self {
        let total_cards = total_cards.clamp(MIN_TOTAL_CARDS, MAX_TOTAL_CARDS) & !1;
        Self::new_unchecked(difficulty, total_cards)
    }

    pub const fn pair_count(&self) -> CardCount {
        self.total_cards / 2
    }

    /// Distinct identities actually dealt, never more than there are pairs.
    pub fn unique_count(&self) -> CardCount {
        self.difficulty.unique_count().min(self.pair_count())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Difficulty::default(), DEFAULT_TOTAL_CARDS)
    }
}

/// Ordered card identities of a dealt board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    faces: Vec<Identity>,
}

impl Deck {
    pub fn from_faces(faces: Vec<Identity>) -> Result<Self> {
        let len = faces.len();
        if len < MIN_TOTAL_CARDS.into() || len > MAX_TOTAL_CARDS.into() || len % 2 != 0 {
            return Err(GameError::InvalidDeck);
        }
        Ok(Self { faces })
    }

    pub fn validate_index(&self, index: CardIndex) -> Result<CardIndex> {
        if usize::from(index) < self.faces.len() {
            Ok(index)
        } else {
            Err(GameError::InvalidCard)
        }
    }

    pub fn len(&self) -> CardCount {
        // from_faces keeps the length within MAX_TOTAL_CARDS
        self.faces.len() as CardCount
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn pair_count(&self) -> CardCount {
        self.len() / 2
    }

    pub fn faces(&self) -> &[Identity] {
        &self.faces
    }

    pub fn identity_counts(&self) -> HashMap<Identity, CardCount> {
        let mut counts = HashMap::new();
        for &face in &self.faces {
            *counts.entry(face).or_insert(0) += 1;
        }
        counts
    }

    /// Whether every identity occurs an even number of times, padded decks may break this.
    pub fn is_clearable(&self) -> bool {
        self.identity_counts().values().all(|count| count % 2 == 0)
    }
}

impl Index<CardIndex> for Deck {
    type Output = Identity;

    fn index(&self, index: CardIndex) -> &Self::Output {
        &self.faces[usize::from(index)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    NoChange,
    Revealed,
    /// Second card of a pair is up, the pair awaits resolution.
    PairRevealed,
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Revealed => true,
            Self::PairRevealed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    NoChange,
    Matched,
    Mismatched,
    Won,
}

impl ResolveOutcome {
    pub const fn has_update(self) -> bool {
        use ResolveOutcome::*;
        match self {
            NoChange => false,
            Matched => true,
            Mismatched => true,
            Won => true,
        }
    }
}
