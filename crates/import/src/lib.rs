pub mod batch;
pub mod csv;
pub mod mapping;

pub use batch::{
    ImportBatch, ImportError, ImportProgress, ImportSummary, ProgressCallback, DEFAULT_BATCH_SIZE,
};
pub use crate::csv::{import_csv, CsvColumnMapping, CsvError, CsvImportProfile, CsvRow};
pub use mapping::{MappedField, MappingError, MatchType, ResolvedValues, ValueMapper, ValueRule};
