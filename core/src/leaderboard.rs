use alloc::string::{String, ToString};
use alloc::vec::Vec;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rows shown per tier in the leaderboard view.
pub const LEADERBOARD_SIZE: usize = 5;

/// A finished game as persisted, the tier is implied by the storage key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    #[serde(skip)]
    pub difficulty: Difficulty,
    /// Submission time in epoch milliseconds.
    pub timestamp: Millis,
}

impl ScoreEntry {
    pub fn new(name: String, score: u32, difficulty: Difficulty, timestamp: Millis) -> Self {
        Self {
            name,
            score,
            difficulty,
            timestamp,
        }
    }
}

/// Durable string mapping the leaderboard is persisted in.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store for tests and headless play.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Orders by score descending, earlier submissions first on equal scores.
pub fn rank_entries(entries: &mut [ScoreEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
}

/// Per-tier high scores, read through from the store and cached ranked.
#[derive(Clone, Debug)]
pub struct Leaderboard<S> {
    store: S,
    cache: HashMap<Difficulty, Vec<ScoreEntry>>,
}

impl<S: KeyValueStore> Leaderboard<S> {
    /// Wraps `store`, writing an empty list for every tier that has none yet.
    pub fn new(mut store: S) -> Self {
        for difficulty in Difficulty::ALL {
            let key = difficulty.storage_key();
            if store.get(&key).is_none_or(|raw| raw.is_empty()) {
                if let Err(err) = store.set(&key, "[]") {
                    log::error!("Could not initialize {}: {}", key, err);
                }
            }
        }

        let mut leaderboard = Self {
            store,
            cache: HashMap::new(),
        };
        leaderboard.refresh_all();
        leaderboard
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Appends `entry` to its tier's persisted list.
    pub fn record(&mut self, entry: ScoreEntry) -> Result<()> {
        let difficulty = entry.difficulty;
        let mut entries = self.load(difficulty);
        entries.push(entry);

        let raw = serde_json::to_string(&entries)?;
        self.store.set(&difficulty.storage_key(), &raw)?;
        log::debug!("Recorded score for {}, {} entries", difficulty, entries.len());

        rank_entries(&mut entries);
        self.cache.insert(difficulty, entries);
        Ok(())
    }

    /// All entries of a tier, best first.
    pub fn rank(&mut self, difficulty: Difficulty) -> &[ScoreEntry] {
        self.refresh(difficulty);
        self.cached(difficulty)
    }

    pub fn top_n(&mut self, difficulty: Difficulty, n: usize) -> &[ScoreEntry] {
        let ranked = self.rank(difficulty);
        &ranked[..n.min(ranked.len())]
    }

    /// Top entries of every tier, as shown in the leaderboard view.
    pub fn standings(&mut self, n: usize) -> Vec<(Difficulty, Vec<ScoreEntry>)> {
        self.refresh_all();
        Difficulty::ALL
            .into_iter()
            .map(|difficulty| {
                let ranked = self.cached(difficulty);
                (difficulty, ranked[..n.min(ranked.len())].to_vec())
            })
            .collect()
    }

    pub fn refresh_all(&mut self) {
        for difficulty in Difficulty::ALL {
            self.refresh(difficulty);
        }
    }

    fn refresh(&mut self, difficulty: Difficulty) {
        let mut entries = self.load(difficulty);
        rank_entries(&mut entries);
        self.cache.insert(difficulty, entries);
    }

    fn cached(&self, difficulty: Difficulty) -> &[ScoreEntry] {
        self.cache.get(&difficulty).map(Vec::as_slice).unwrap_or_default()
    }

    /// Reads a tier from the store, absent or unreadable lists count as empty.
    fn load(&self, difficulty: Difficulty) -> Vec<ScoreEntry> {
        let key = difficulty.storage_key();
        let Some(raw) = self.store.get(&key) else {
            return Vec::new();
        };
        if raw.is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Vec<ScoreEntry>>(&raw) {
            Ok(mut entries) => {
                for entry in &mut entries {
                    entry.difficulty = difficulty;
                }
                entries
            }
            Err(err) => {
                log::warn!("Ignoring unreadable {}: {}", key, err);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn entry(name: &str, score: u32, difficulty: Difficulty, timestamp: Millis) -> ScoreEntry {
        ScoreEntry::new(name.to_string(), score, difficulty, timestamp)
    }

    fn names(entries: &[ScoreEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    #[test]
    fn first_use_initializes_every_tier() {
        let leaderboard = Leaderboard::new(MemoryStore::new());
        for difficulty in Difficulty::ALL {
            assert_eq!(
                leaderboard.store().get(&difficulty.storage_key()).as_deref(),
                Some("[]")
            );
        }
    }

    #[test]
    fn existing_lists_are_left_alone() {
        let mut store = MemoryStore::new();
        store
            .set("leaderboard_easy", r#"[{"name":"ada","score":90,"timestamp":5}]"#)
            .unwrap();
        let mut leaderboard = Leaderboard::new(store);

        let ranked = leaderboard.rank(Difficulty::Easy);
        assert_eq!(ranked, [entry("ada", 90, Difficulty::Easy, 5)]);
    }

    #[test]
    fn ranks_by_score_then_earlier_timestamp() {
        let mut leaderboard = Leaderboard::new(MemoryStore::new());
        leaderboard.record(entry("late", 150, Difficulty::Hard, 30)).unwrap();
        leaderboard.record(entry("low", 90, Difficulty::Hard, 10)).unwrap();
        leaderboard.record(entry("early", 150, Difficulty::Hard, 20)).unwrap();
        leaderboard.record(entry("top", 200, Difficulty::Hard, 40)).unwrap();

        assert_eq!(
            names(leaderboard.rank(Difficulty::Hard)),
            vec!["top", "early", "late", "low"]
        );
        assert_eq!(names(leaderboard.top_n(Difficulty::Hard, 2)), vec!["top", "early"]);
        assert_eq!(leaderboard.top_n(Difficulty::Hard, 10).len(), 4);
        assert!(leaderboard.rank(Difficulty::Easy).is_empty());
    }

    #[test]
    fn persisted_layout_omits_difficulty() {
        let mut leaderboard = Leaderboard::new(MemoryStore::new());
        leaderboard.record(entry("ada", 200, Difficulty::Expert, 1_700_000_000_000)).unwrap();

        assert_eq!(
            leaderboard.store().get("leaderboard_expert").as_deref(),
            Some(r#"[{"name":"ada","score":200,"timestamp":1700000000000}]"#)
        );
    }

    #[test]
    fn malformed_storage_ranks_empty() {
        let mut store = MemoryStore::new();
        store.set("leaderboard_hard", "{not json").unwrap();
        let mut leaderboard = Leaderboard::new(store);

        assert!(leaderboard.rank(Difficulty::Hard).is_empty());
        assert_eq!(leaderboard.store().get("leaderboard_hard").as_deref(), Some("{not json"));
    }

    #[test]
    fn recording_over_malformed_storage_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set("leaderboard_hard", "garbage").unwrap();
        let mut leaderboard = Leaderboard::new(store);

        leaderboard.record(entry("ada", 75, Difficulty::Hard, 1)).unwrap();
        assert_eq!(names(leaderboard.rank(Difficulty::Hard)), vec!["ada"]);
    }

    #[test]
    fn rank_reads_through_to_store() {
        let mut leaderboard = Leaderboard::new(MemoryStore::new());
        leaderboard.record(entry("ada", 75, Difficulty::Medium, 1)).unwrap();
        let mut store = leaderboard.into_store();
        store.set("leaderboard_medium", "oops").unwrap();

        let mut leaderboard = Leaderboard::new(store);
        assert!(leaderboard.rank(Difficulty::Medium).is_empty());
    }

    #[test]
    fn standings_cover_all_tiers() {
        let mut leaderboard = Leaderboard::new(MemoryStore::new());
        for i in 0..7 {
            leaderboard.record(entry("p", i, Difficulty::Easy, u64::from(i))).unwrap();
        }

        let standings = leaderboard.standings(LEADERBOARD_SIZE);
        assert_eq!(standings.len(), 4);
        assert_eq!(standings[0].0, Difficulty::Easy);
        assert_eq!(standings[0].1.len(), 5);
        assert_eq!(standings[0].1[0].score, 6);
        assert!(standings[3].1.is_empty());
    }
}
