use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Named tier controlling how many distinct identities are dealt and how scores are weighted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Expert];

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
            Expert => "expert",
        }
    }

    /// Size of the identity pool dealt for this tier.
    pub const fn unique_count(self) -> CardCount {
        use Difficulty::*;
        match self {
            Easy => 3,
            Medium => 4,
            Hard => 5,
            Expert => 6,
        }
    }

    /// Score multiplier in tenths, `15` means `1.5`.
    pub const fn multiplier_tenths(self) -> u64 {
        use Difficulty::*;
        match self {
            Easy => 10,
            Medium => 12,
            Hard => 15,
            Expert => 20,
        }
    }

    /// Key holding this tier's serialized leaderboard.
    pub fn storage_key(self) -> String {
        let mut key = String::from("leaderboard_");
        key.push_str(self.name());
        key
    }

    /// Folder the tier's card faces are served from.
    pub fn image_folder(self) -> String {
        let mut folder = String::from("images/");
        folder.push_str(self.name());
        folder
    }

    /// Parses a tier name, unknown names fall back to the default tier.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|err| {
            log::warn!("{}, falling back to {}", err, Self::default());
            Self::default()
        })
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Expert
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name() == s.trim())
            .ok_or_else(|| GameError::UnknownDifficulty(s.to_string()))
    }
}
