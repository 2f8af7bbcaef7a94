use crate::*;
pub use random::*;

mod random;

pub trait DeckGenerator {
    fn generate(self, config: GameConfig) -> Deck;
}

/// Deals a shuffled deck for `difficulty` using the seeded random generator.
pub fn build_deck(difficulty: Difficulty, total_cards: CardCount, seed: u64) -> Deck {
    RandomDeckGenerator::new(seed).generate(GameConfig::new(difficulty, total_cards))
}
