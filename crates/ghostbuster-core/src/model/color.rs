use core::fmt;
use serde::{Deserialize, Serialize};

/// Colour reported by a probe. Sampled, so it may disagree with the true distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ObservedColor {
    Red = 0,
    Orange = 1,
    Yellow = 2,
    Green = 3,
}

impl ObservedColor {
    pub const ALL: [ObservedColor; 4] = [
        ObservedColor::Red,
        ObservedColor::Orange,
        ObservedColor::Yellow,
        ObservedColor::Green,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ObservedColor::Red),
            1 => Some(ObservedColor::Orange),
            2 => Some(ObservedColor::Yellow),
            3 => Some(ObservedColor::Green),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ObservedColor::Red => "red",
            ObservedColor::Orange => "orange",
            ObservedColor::Yellow => "yellow",
            ObservedColor::Green => "green",
        }
    }
}

impl fmt::Display for ObservedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
