//! Meteorological season categories

use serde::{Deserialize, Serialize};

/// Season category with the integer codes used at training time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring = 0,
    Summer = 1,
    Autumn = 2,
    Winter = 3,
}

impl Season {
    /// Map a calendar month (1-12) to its season.
    ///
    /// Dec/Jan/Feb are winter, Mar/Apr/May spring, Jun/Jul/Aug summer and
    /// everything else autumn.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    /// Categorical code fed to the model
    pub fn code(&self) -> u32 {
        *self as u32
    }
}
