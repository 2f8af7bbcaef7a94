use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid card index")]
    InvalidCard,
    #[error("Game already ended, no new flips are accepted")]
    AlreadyEnded,
    #[error("No game in progress")]
    NoSession,
    #[error("Please enter a nickname to start the game.")]
    EmptyPlayerName,
    #[error("Deck must hold an even number of cards between 2 and 64")]
    InvalidDeck,
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
    #[error("Could not write to storage: {0}")]
    StorageWrite(String),
    #[error("Could not encode leaderboard: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, GameError>;
