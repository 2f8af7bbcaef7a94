use alloc::string::ToString;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of a session after the board is dealt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    /// Board cleared, timer stopped, win signal pending.
    Won,
    /// Win banner up, score reveal pending.
    Celebrating,
    Scored(u32),
}

/// One run of the game: a dealt board plus all the timing around it.
///
/// Every deferred effect lives in the session's own scheduler, dropping or tearing down the session cancels them.
#[derive(Clone, Debug)]
pub struct Session {
    config: GameConfig,
    player: PlayerName,
    timings: Timings,
    engine: MatchEngine,
    timer: GameTimer,
    scheduler: Scheduler,
    input_lock: Option<TaskHandle>,
    clock_tick: Option<TaskHandle>,
    match_signal: SignalGate,
    phase: SessionPhase,
}

impl Session {
    pub fn new(player: PlayerName, difficulty: Difficulty, deck: Deck, timings: Timings) -> Self {
        Self {
            config: GameConfig::new(difficulty, deck.len()),
            player,
            timings: timings.normalized(),
            engine: MatchEngine::new(deck),
            timer: GameTimer::new(),
            scheduler: Scheduler::new(),
            input_lock: None,
            clock_tick: None,
            match_signal: SignalGate::default(),
            phase: SessionPhase::Playing,
        }
    }

    /// Deals a fresh random board for `config`.
    pub fn deal(player: PlayerName, config: GameConfig, seed: u64, timings: Timings) -> Self {
        let deck = RandomDeckGenerator::new(seed).generate(config);
        Self::new(player, config.difficulty, deck, timings)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn player(&self) -> &PlayerName {
        &self.player
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn deck(&self) -> &Deck {
        self.engine.deck()
    }

    pub fn card_at(&self, index: CardIndex) -> CardState {
        self.engine.card_at(index)
    }

    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> Option<u32> {
        match self.phase {
            SessionPhase::Scored(score) => Some(score),
            _ => None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.timer.is_started()
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_lock.is_some()
    }

    pub fn elapsed_secs(&self, now: Millis) -> u64 {
        self.timer.elapsed_secs(now)
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.scheduler.next_deadline()
    }

    /// Whether a flip at `index` would be accepted right now.
    pub fn can_flip(&self, index: CardIndex) -> bool {
        !self.is_input_locked() && self.engine.can_flip(index)
    }

    /// Callers advance the session to `now` first, expired locks are only released by [`Session::advance`].
    pub fn request_flip(
        &mut self,
        index: CardIndex,
        now: Millis,
        frontend: &mut impl Frontend,
    ) -> Result<FlipOutcome> {
        let index = self.engine.deck().validate_index(index)?;

        if self.input_lock.is_some() {
            log::trace!("Flip at {} ignored, input locked", index);
            return Ok(FlipOutcome::NoChange);
        }

        let outcome = self.engine.flip(index)?;
        if !outcome.has_update() {
            return Ok(outcome);
        }

        if !self.timer.is_started() {
            self.timer.start(now);
            frontend.set_display(DisplayField::Time, &time_text(0));
            self.clock_tick = Some(
                self.scheduler
                    .schedule(now + self.timings.clock_tick, Task::ClockTick),
            );
        }

        self.input_lock = Some(
            self.scheduler
                .schedule(now + self.timings.input_lock, Task::ReleaseInputLock),
        );
        frontend.play_signal(Signal::Flip);
        self.push_stats(frontend);

        if matches!(outcome, FlipOutcome::PairRevealed) {
            self.scheduler
                .schedule(now + self.timings.resolve_delay, Task::ResolvePair);
        }

        Ok(outcome)
    }

    /// Runs every task due by `now`, returns the score entry once the score is revealed.
    pub fn advance(&mut self, now: Millis, frontend: &mut impl Frontend) -> Option<ScoreEntry> {
        let mut recorded = None;
        while let Some((at, handle, task)) = self.scheduler.pop_due(now) {
            if let Some(entry) = self.run_task(at, handle, task, frontend) {
                recorded = Some(entry);
            }
        }
        recorded
    }

    /// Cancels all pending work, returns how many tasks were dropped.
    pub fn teardown(&mut self) -> usize {
        self.input_lock = None;
        self.clock_tick = None;
        let cancelled = self.scheduler.cancel_all();
        log::debug!("Session torn down, {} pending tasks cancelled", cancelled);
        cancelled
    }

    fn run_task(
        &mut self,
        at: Millis,
        handle: TaskHandle,
        task: Task,
        frontend: &mut impl Frontend,
    ) -> Option<ScoreEntry> {
        log::trace!("Running {:?} at {}", task, at);
        match task {
            Task::ReleaseInputLock => {
                if self.input_lock == Some(handle) {
                    self.input_lock = None;
                }
            }
            Task::ClockTick => {
                self.clock_tick = None;
                if self.timer.is_running() {
                    frontend.set_display(DisplayField::Time, &time_text(self.timer.elapsed_secs(at)));
                    self.clock_tick = Some(
                        self.scheduler
                            .schedule(at + self.timings.clock_tick, Task::ClockTick),
                    );
                }
            }
            Task::ResolvePair => match self.engine.resolve_pending() {
                ResolveOutcome::Matched => {
                    self.signal_match(at, frontend);
                    self.push_stats(frontend);
                }
                ResolveOutcome::Won => {
                    self.signal_match(at, frontend);
                    self.push_stats(frontend);
                    self.begin_end_sequence(at, frontend);
                }
                ResolveOutcome::Mismatched => frontend.play_signal(Signal::Wrong),
                ResolveOutcome::NoChange => {}
            },
            Task::ShowWin => {
                frontend.play_signal(Signal::Win);
                frontend.set_display(DisplayField::WinBanner, WIN_BANNER_TEXT);
                self.phase = SessionPhase::Celebrating;
                self.scheduler
                    .schedule(at + self.timings.score_reveal_delay, Task::RevealScore);
            }
            Task::RevealScore => {
                let score = score(self.timer.elapsed_ms(at), self.difficulty());
                frontend.set_display(DisplayField::WinBanner, "");
                frontend.set_display(DisplayField::Score, &score_text(score));
                self.phase = SessionPhase::Scored(score);
                log::debug!("{} scored {} on {}", self.player.as_str(), score, self.difficulty());
                return Some(ScoreEntry::new(
                    self.player.as_str().to_string(),
                    score,
                    self.difficulty(),
                    at,
                ));
            }
            Task::MatchSignalCooldown => {
                frontend.stop_signal(Signal::Match);
                self.match_signal.end_cooldown();
                self.scheduler
                    .schedule(at + self.timings.match_signal_grace, Task::MatchSignalGrace);
            }
            Task::MatchSignalGrace => self.match_signal.end_grace(),
        }
        None
    }

    fn signal_match(&mut self, at: Millis, frontend: &mut impl Frontend) {
        if self.match_signal.try_trigger() {
            frontend.play_signal(Signal::Match);
            self.scheduler
                .schedule(at + self.timings.match_signal_cooldown, Task::MatchSignalCooldown);
        } else {
            log::trace!("Match signal suppressed, still cooling down");
        }
    }

    fn begin_end_sequence(&mut self, at: Millis, frontend: &mut impl Frontend) {
        self.timer.stop(at);
        if let Some(tick) = self.clock_tick.take() {
            self.scheduler.cancel(tick);
        }
        frontend.set_display(DisplayField::Time, &time_text(self.timer.elapsed_secs(at)));
        self.phase = SessionPhase::Won;
        log::debug!("Board cleared after {} ms", self.timer.elapsed_ms(at));
        self.scheduler
            .schedule(at + self.timings.win_signal_delay, Task::ShowWin);
    }

    fn push_stats(&self, frontend: &mut impl Frontend) {
        frontend.set_display(DisplayField::Flips, &flips_text(self.engine.flip_count()));
        frontend.set_display(
            DisplayField::Matches,
            &matches_text(self.engine.matched_pairs()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Twelve cards, identity `n` sits at `2n - 2` and `2n - 1`.
    fn session() -> Session {
        let faces: Vec<Identity> = (1..=6).flat_map(|n| [Identity::new(n); 2]).collect();
        Session::new(
            PlayerName::new("ada").unwrap(),
            Difficulty::Expert,
            Deck::from_faces(faces).unwrap(),
            Timings::default(),
        )
    }

    #[test]
    fn first_flip_starts_timer_and_locks_input() {
        let mut frontend = RecordingFrontend::default();
        let mut session = session();
        assert!(!session.is_started());

        assert_eq!(session.request_flip(0, 1_000, &mut frontend).unwrap(), FlipOutcome::Revealed);
        assert!(session.is_started());
        assert_eq!(session.timer().started_at(), Some(1_000));
        assert!(session.is_input_locked());
        assert_eq!(frontend.signals, [Signal::Flip]);
        assert_eq!(frontend.display(DisplayField::Flips), "🔁 Flips: 1");

        // debounced
        assert_eq!(session.request_flip(1, 1_299, &mut frontend).unwrap(), FlipOutcome::NoChange);
        assert_eq!(session.card_at(1), CardState::FaceDown);

        session.advance(1_300, &mut frontend);
        assert!(!session.is_input_locked());
        assert_eq!(session.request_flip(1, 1_300, &mut frontend).unwrap(), FlipOutcome::PairRevealed);
        assert_eq!(session.engine().flip_count(), 2);
    }

    #[test]
    fn pair_resolves_only_after_delay() {
        let mut frontend = RecordingFrontend::default();
        let mut session = session();
        session.request_flip(0, 0, &mut frontend).unwrap();
        session.advance(300, &mut frontend);
        session.request_flip(1, 300, &mut frontend).unwrap();

        session.advance(1_099, &mut frontend);
        assert_eq!(session.card_at(0), CardState::Revealed);

        session.advance(1_100, &mut frontend);
        assert_eq!(session.card_at(0), CardState::Matched);
        assert_eq!(session.card_at(1), CardState::Matched);
        assert_eq!(session.engine().matched_pairs(), 1);
        assert_eq!(frontend.display(DisplayField::Matches), "✅ Matches: 1");
        assert!(frontend.signals.contains(&Signal::Match));
    }

    #[test]
    fn third_card_blocked_until_pair_resolves() {
        let mut frontend = RecordingFrontend::default();
        let mut session = session();
        session.request_flip(0, 0, &mut frontend).unwrap();
        session.advance(300, &mut frontend);
        session.request_flip(2, 300, &mut frontend).unwrap();
        session.advance(600, &mut frontend);
        assert!(!session.is_input_locked());

        assert_eq!(session.request_flip(4, 600, &mut frontend).unwrap(), FlipOutcome::NoChange);

        session.advance(1_100, &mut frontend);
        assert_eq!(session.card_at(0), CardState::FaceDown);
        assert_eq!(session.card_at(2), CardState::FaceDown);
        assert_eq!(frontend.signals.last(), Some(&Signal::Wrong));
        assert_eq!(session.engine().matched_pairs(), 0);
        assert_eq!(session.request_flip(4, 1_100, &mut frontend).unwrap(), FlipOutcome::Revealed);
    }

    #[test]
    fn clock_ticks_every_second_while_running() {
        let mut frontend = RecordingFrontend::default();
        let mut session = session();
        session.request_flip(0, 500, &mut frontend).unwrap();
        assert_eq!(frontend.display(DisplayField::Time), "⏱ Time: 00:00");

        session.advance(3_600, &mut frontend);
        assert_eq!(frontend.display(DisplayField::Time), "⏱ Time: 00:03");
        assert_eq!(session.next_deadline(), Some(4_500));
    }

    #[test]
    fn match_signal_is_rate_limited() {
        let mut frontend = RecordingFrontend::default();
        let mut session = session();
        let mut now = 0;
        for first in [0, 2] {
            session.request_flip(first, now, &mut frontend).unwrap();
            now += 300;
            session.advance(now, &mut frontend);
            session.request_flip(first + 1, now, &mut frontend).unwrap();
            now += 800;
            session.advance(now, &mut frontend);
        }
        let matches = frontend.signals.iter().filter(|&&s| s == Signal::Match).count();
        assert_eq!(matches, 1);

        // cooldown ends 3000ms after the first match at 1100, grace 2000ms later
        session.advance(4_100, &mut frontend);
        assert_eq!(frontend.stopped, [Signal::Match]);
        session.advance(6_099, &mut frontend);

        session.request_flip(4, 6_100, &mut frontend).unwrap();
        session.advance(6_400, &mut frontend);
        session.request_flip(5, 6_400, &mut frontend).unwrap();
        session.advance(7_200, &mut frontend);
        let matches = frontend.signals.iter().filter(|&&s| s == Signal::Match).count();
        assert_eq!(matches, 2);
    }

    #[test]
    fn clearing_board_runs_end_sequence() {
        let mut frontend = RecordingFrontend::default();
        let mut session = session();
        let mut now = 10_000;
        for pair in 0..6u8 {
            session.request_flip(2 * pair, now, &mut frontend).unwrap();
            now += 300;
            session.advance(now, &mut frontend);
            session.request_flip(2 * pair + 1, now, &mut frontend).unwrap();
            now += 800;
            assert!(session.advance(now, &mut frontend).is_none());
        }
        let cleared_at = now;
        assert_eq!(session.engine().matched_pairs(), 6);
        assert_eq!(session.phase(), SessionPhase::Won);
        assert!(!session.timer().is_running());
        assert!(matches!(session.request_flip(0, now, &mut frontend), Err(GameError::AlreadyEnded)));

        assert!(session.advance(cleared_at + 499, &mut frontend).is_none());
        assert!(!frontend.signals.contains(&Signal::Win));
        assert!(session.advance(cleared_at + 500, &mut frontend).is_none());
        assert_eq!(session.phase(), SessionPhase::Celebrating);
        assert_eq!(frontend.display(DisplayField::WinBanner), WIN_BANNER_TEXT);

        let entry = session.advance(cleared_at + 2_500, &mut frontend).unwrap();
        assert_eq!(entry.name, "ada");
        assert_eq!(entry.score, 200);
        assert_eq!(entry.difficulty, Difficulty::Expert);
        assert_eq!(entry.timestamp, cleared_at + 2_500);
        assert_eq!(session.score(), Some(200));
        assert_eq!(frontend.display(DisplayField::WinBanner), "");
        assert_eq!(frontend.display(DisplayField::Score), "Total Score: 200");
    }

    #[test]
    fn score_uses_time_at_clear_not_at_reveal() {
        let mut frontend = RecordingFrontend::default();
        let faces = [Identity::new(1); 2].to_vec();
        let mut session = Session::new(
            PlayerName::new("bo").unwrap(),
            Difficulty::Easy,
            Deck::from_faces(faces).unwrap(),
            Timings {
                score_reveal_delay: 120_000,
                ..Timings::default()
            },
        );
        session.request_flip(0, 0, &mut frontend).unwrap();
        session.advance(59_000, &mut frontend);
        session.request_flip(1, 59_000, &mut frontend).unwrap();

        let entry = session.advance(500_000, &mut frontend).unwrap();
        assert_eq!(entry.score, 100);
    }

    #[test]
    fn teardown_cancels_pending_work() {
        let mut frontend = RecordingFrontend::default();
        let mut session = session();
        session.request_flip(0, 0, &mut frontend).unwrap();
        session.advance(300, &mut frontend);
        session.request_flip(1, 300, &mut frontend).unwrap();

        assert!(session.teardown() > 0);
        assert_eq!(session.next_deadline(), None);
        session.advance(10_000, &mut frontend);
        assert_eq!(session.card_at(0), CardState::Revealed);
    }
}
