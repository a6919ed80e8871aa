//! Price source reading, timestamp validation and ticker extraction

pub mod loader;
pub mod sample;
pub mod schema;
pub mod source;
pub mod timestamp;

pub use loader::{load_ticker, DataError, InvalidRow, Loader, TickerSummary, MIN_RECORDS};
pub use sample::{generate_rows, write_sample, SampleRow, SampleSpec};
pub use schema::{ColumnIndex, SchemaError, SourceSchema};
pub use source::{PriceSource, SourceError, SourceRow};
pub use timestamp::parse_timestamp;
