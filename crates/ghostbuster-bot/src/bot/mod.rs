mod belief;
mod params;

pub use belief::BeliefView;
pub use params::BotParams;

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl BotDifficulty {
    pub const ALL: [BotDifficulty; 3] = [Self::Easy, Self::Normal, Self::Hard];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown bot difficulty '{}'", self.0)
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for BotDifficulty {
    type Err = UnknownDifficulty;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" | "random" => Ok(Self::Easy),
            "normal" | "default" | "greedy" => Ok(Self::Normal),
            "hard" | "entropy" => Ok(Self::Hard),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}
