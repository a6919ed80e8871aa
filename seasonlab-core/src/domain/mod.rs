//! Domain types for SeasonLab

pub mod ids;
pub mod month;
pub mod observation;
pub mod series;

pub use ids::SourceHash;
pub use month::{Month, MonthParseError};
pub use observation::{Observation, TickerSeries};
pub use series::{MonthlyPoint, MonthlySeries, SeriesError};
