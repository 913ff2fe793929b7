//! Model module containing data structures

mod feature_column;
mod feature_row;
mod feature_table;
mod forecast;
mod season;

pub use feature_column::{FeatureColumn, FEATURE_COUNT};
pub use feature_row::FeatureRow;
pub use feature_table::FeatureTable;
pub use forecast::{Forecast, ForecastRequest};
pub use season::Season;
