use alloc::vec::Vec;
use rand::prelude::*;

use super::*;

/// Generation strategy that deals every identity of the tier twice, pads any shortfall with uniformly sampled
/// extra copies and then shuffles the whole deck.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDeckGenerator {
    seed: u64,
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate(self, config: GameConfig) -> Deck {
        let config = GameConfig::new(config.difficulty, config.total_cards);
        let total_cards = usize::from(config.total_cards);
        let unique: Vec<Identity> = (1..=config.unique_count()).map(Identity::new).collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut faces = Vec::with_capacity(total_cards);
        faces.extend_from_slice(&unique);
        faces.extend_from_slice(&unique);

        // pad with single random copies, identities may end up with odd counts
        while faces.len() < total_cards {
            faces.push(unique[rng.random_range(0..unique.len())]);
        }
        faces.truncate(total_cards);
        shuffle(&mut faces, &mut rng);

        let deck = Deck { faces };
        if !deck.is_clearable() {
            log::warn!(
                "Dealt {} deck cannot be fully cleared, counts: {:?}",
                config.difficulty,
                deck.identity_counts()
            );
        }
        log::debug!("Dealt {} cards for {}", deck.len(), config.difficulty);
        deck
    }
}

/// In-place Fisher-Yates shuffle, every element `i` is swapped with a uniformly chosen index `<= i`.
pub fn shuffle<T>(items: &mut [T], rng: &mut SmallRng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
