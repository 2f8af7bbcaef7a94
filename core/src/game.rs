use alloc::vec::Vec;

use crate::*;

/// Top level controller: player settings, the current session and the leaderboard behind it.
#[derive(Debug)]
pub struct Game<S> {
    settings: Settings,
    timings: Timings,
    player: Option<PlayerName>,
    session: Option<Session>,
    leaderboard: Leaderboard<S>,
}

impl<S: KeyValueStore> Game<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self::with_timings(store, settings, Timings::default())
    }

    pub fn with_timings(store: S, settings: Settings, timings: Timings) -> Self {
        Self {
            settings,
            timings,
            player: None,
            session: None,
            leaderboard: Leaderboard::new(store),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty
    }

    pub fn player(&self) -> Option<&PlayerName> {
        self.player.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn leaderboard(&mut self) -> &mut Leaderboard<S> {
        &mut self.leaderboard
    }

    pub fn set_volume(&mut self, volume: Volume) {
        self.settings.volume = volume;
    }

    /// Validates the nickname and deals a new board, an empty name leaves the current state untouched.
    pub fn start(
        &mut self,
        player_name: &str,
        seed: u64,
        frontend: &mut impl Frontend,
    ) -> Result<()> {
        let player = PlayerName::new(player_name)?;
        frontend.set_display(DisplayField::InstructionBanner, "");
        self.player = Some(player.clone());
        self.deal(player, seed, frontend);
        Ok(())
    }

    /// Replaces the session with a fresh board for the same player and shows the instructions again.
    pub fn restart(&mut self, seed: u64, frontend: &mut impl Frontend) {
        self.end_session();
        frontend.set_display(DisplayField::InstructionBanner, INSTRUCTION_BANNER_TEXT);
        match self.player.clone() {
            Some(player) => self.deal(player, seed, frontend),
            None => log::debug!("No player yet, waiting for start"),
        }
    }

    pub fn set_difficulty(
        &mut self,
        difficulty: Difficulty,
        seed: u64,
        frontend: &mut impl Frontend,
    ) {
        log::debug!("Difficulty changed to {}", difficulty);
        self.settings.difficulty = difficulty;
        self.restart(seed, frontend);
    }

    /// Catches up on work due by `now`, then flips the card at `index`.
    pub fn request_flip(
        &mut self,
        index: CardIndex,
        now: Millis,
        frontend: &mut impl Frontend,
    ) -> Result<FlipOutcome> {
        if self.session.is_none() {
            return Err(GameError::NoSession);
        }
        // locks and pairs that expired by `now` must not block this flip
        self.advance(now, frontend);
        let session = self.session.as_mut().ok_or(GameError::NoSession)?;
        session.request_flip(index, now, frontend)
    }

    /// Runs due session work, persisting the score once it is revealed and returning it.
    pub fn advance(&mut self, now: Millis, frontend: &mut impl Frontend) -> Option<ScoreEntry> {
        let entry = self.session.as_mut()?.advance(now, frontend)?;
        if let Err(err) = self.leaderboard.record(entry.clone()) {
            log::error!("Could not save score: {}", err);
        }
        Some(entry)
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.session.as_ref().and_then(Session::next_deadline)
    }

    /// Top [`LEADERBOARD_SIZE`] entries of every tier.
    pub fn leaderboard_view(&mut self) -> Vec<(Difficulty, Vec<ScoreEntry>)> {
        self.leaderboard.standings(LEADERBOARD_SIZE)
    }

    fn deal(&mut self, player: PlayerName, seed: u64, frontend: &mut impl Frontend) {
        self.end_session();
        let session = Session::deal(player, self.settings.game_config(), seed, self.timings);

        frontend.set_display(DisplayField::Time, &time_text(0));
        frontend.set_display(DisplayField::Flips, &flips_text(0));
        frontend.set_display(DisplayField::Matches, &matches_text(0));
        frontend.set_display(DisplayField::Score, "");
        frontend.set_display(DisplayField::WinBanner, "");
        frontend.render_deck(session.deck(), session.difficulty());

        log::debug!(
            "New {} session for {}",
            session.difficulty(),
            session.player().as_str()
        );
        self.session = Some(session);
    }

    fn end_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.teardown();
        }
    }
}
