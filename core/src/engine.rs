use alloc::vec;
use alloc::vec::Vec;
use core::num::Saturating;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Won,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Card state machine, `FaceDown -> Revealed -> Matched | FaceDown`, with no notion of time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEngine {
    deck: Deck,
    cards: Vec<CardState>,
    pending: SmallVec<[CardIndex; 2]>,
    flip_count: Saturating<u32>,
    matched_pairs: Saturating<CardCount>,
    state: EngineState,
}

impl MatchEngine {
    pub fn new(deck: Deck) -> Self {
        let cards = vec![CardState::FaceDown; deck.faces().len()];
        Self {
            deck,
            cards,
            pending: SmallVec::new(),
            flip_count: Saturating(0),
            matched_pairs: Saturating(0),
            state: Default::default(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn len(&self) -> CardCount {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn card_at(&self, index: CardIndex) -> CardState {
        self.cards[usize::from(index)]
    }

    pub fn cards(&self) -> &[CardState] {
        &self.cards
    }

    pub fn flip_count(&self) -> u32 {
        self.flip_count.0
    }

    pub fn matched_pairs(&self) -> CardCount {
        self.matched_pairs.0
    }

    pub fn pending(&self) -> &[CardIndex] {
        &self.pending
    }

    pub fn has_pending_pair(&self) -> bool {
        self.pending.len() == 2
    }

    /// Whether a flip at `index` would currently be accepted, ignoring any input lock.
    pub fn can_flip(&self, index: CardIndex) -> bool {
        !self.state.is_finished()
            && !self.has_pending_pair()
            && self
                .cards
                .get(usize::from(index))
                .is_some_and(|&card| card == CardState::FaceDown)
    }

    pub fn flip(&mut self, index: CardIndex) -> Result<FlipOutcome> {
        let index = self.deck.validate_index(index)?;
        self.check_not_finished()?;

        if !self.can_flip(index) {
            log::trace!("Flip at {} ignored, card is {:?}", index, self.card_at(index));
            return Ok(FlipOutcome::NoChange);
        }

        self.mark_started();
        self.cards[usize::from(index)] = CardState::Revealed;
        self.pending.push(index);
        self.flip_count += 1;
        log::trace!("Revealed card {} ({:?})", index, self.deck[index]);

        Ok(if self.has_pending_pair() {
            FlipOutcome::PairRevealed
        } else {
            FlipOutcome::Revealed
        })
    }

    /// Decides the pending pair, matched cards stay up and mismatched ones turn back face down.
    pub fn resolve_pending(&mut self) -> ResolveOutcome {
        let [first, second] = match self.pending.as_slice() {
            &[first, second] => [first, second],
            _ => return ResolveOutcome::NoChange,
        };
        self.pending.clear();

        if self.deck[first] == self.deck[second] {
            self.cards[usize::from(first)] = CardState::Matched;
            self.cards[usize::from(second)] = CardState::Matched;
            self.matched_pairs += 1;
            log::debug!(
                "Matched {} and {}, {} of {} pairs",
                first,
                second,
                self.matched_pairs,
                self.deck.pair_count()
            );

            if self.matched_pairs.0 == self.deck.pair_count() {
                self.state = EngineState::Won;
                ResolveOutcome::Won
            } else {
                ResolveOutcome::Matched
            }
        } else {
            self.cards[usize::from(first)] = CardState::FaceDown;
            self.cards[usize::from(second)] = CardState::FaceDown;
            log::trace!("Mismatch between {} and {}", first, second);
            ResolveOutcome::Mismatched
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, EngineState::Ready) {
            self.state = EngineState::Active;
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
