use serde::{Deserialize, Serialize};

/// Canonical state of a single card stored by the match engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    FaceDown,
    /// Face up but not yet confirmed as part of a pair.
    Revealed,
    /// Face up for the rest of the session.
    Matched,
}

impl CardState {
    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::Revealed | Self::Matched)
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::FaceDown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revealed_and_matched_cards_are_face_up() {
        assert!(!CardState::FaceDown.is_face_up());
        assert!(CardState::Revealed.is_face_up());
        assert!(CardState::Matched.is_face_up());
    }
}
