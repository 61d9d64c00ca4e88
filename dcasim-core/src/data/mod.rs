//! Price sources: the collaborator that supplies raw closes to the engine.

pub mod csv_source;
pub mod memory;
pub mod provider;
pub mod synthetic;

pub use csv_source::{read_price_csv, CsvPriceSource};
pub use memory::InMemorySource;
pub use provider::{DataError, PriceSource, SourceKind};
pub use synthetic::SyntheticSource;
