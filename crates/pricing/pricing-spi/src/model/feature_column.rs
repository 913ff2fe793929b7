//! Engineered feature columns in training order

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of engineered feature columns
pub const FEATURE_COUNT: usize = 10;

/// One engineered feature column.
///
/// The declaration order is the column order the model was trained with.
/// [`FeatureColumn::ALL`] is the single source of that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureColumn {
    MinimumNights,
    MaximumNights,
    PriceLag,
    DayOfWeek,
    Month,
    Season,
    Quarter,
    IsHoliday,
    Day,
    Year,
}

impl FeatureColumn {
    /// All columns in training order
    pub const ALL: [FeatureColumn; FEATURE_COUNT] = [
        FeatureColumn::MinimumNights,
        FeatureColumn::MaximumNights,
        FeatureColumn::PriceLag,
        FeatureColumn::DayOfWeek,
        FeatureColumn::Month,
        FeatureColumn::Season,
        FeatureColumn::Quarter,
        FeatureColumn::IsHoliday,
        FeatureColumn::Day,
        FeatureColumn::Year,
    ];

    /// Column name as recorded in the training frame
    pub fn name(&self) -> &'static str {
        match self {
            FeatureColumn::MinimumNights => "minimum_nights",
            FeatureColumn::MaximumNights => "maximum_nights",
            FeatureColumn::PriceLag => "price_lag",
            FeatureColumn::DayOfWeek => "day_of_week",
            FeatureColumn::Month => "Month",
            FeatureColumn::Season => "Season",
            FeatureColumn::Quarter => "quarter",
            FeatureColumn::IsHoliday => "is_holiday",
            FeatureColumn::Day => "day",
            FeatureColumn::Year => "year",
        }
    }

    /// Position of this column in a feature vector
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Look a column up by its training-frame name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Training-frame names of all columns, in order
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|c| c.name().to_string()).collect()
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
