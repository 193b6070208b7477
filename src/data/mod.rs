//! Data module - CSV loading, normalisation, filtering and joins

mod join;
mod loader;
mod processor;

pub use join::{JoinSuffixes, RegionAligner, MAPPED_REGION};
pub use loader::{load_csv, load_dataset, ColumnKind, Dataset, DatasetCache, LoaderError};
pub use processor::{DataProcessor, ProcessorError, RowFilter};
