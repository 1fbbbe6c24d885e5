// Donation Ledger - Core Library
// Normalize, merge, search, sort and total political donation returns

pub mod record;
pub mod normalizer;
pub mod classifier;
pub mod merger;
pub mod search;
pub mod sorter;
pub mod aggregator;
pub mod config;
pub mod loader;
pub mod view;

// Re-export commonly used types
pub use record::{parse_amount, row_from_json, CanonicalRecord, Field, SourceRow};
pub use normalizer::{
    default_federal_rewrites, normalize, normalize_source,
    ColumnMapping, RewriteRule, SourceId, SourceProfile,
};
pub use classifier::{
    CategoryBucket, Classifier, ClassifierProfile, ClassifierRule, MatchKind, UNCLASSIFIED_COLOR,
};
pub use merger::{merge, merge_sources};
pub use search::{search, SearchQuery};
pub use sorter::{compare_values, sort_records, SortDirection, SortState};
pub use aggregator::{aggregate, donation_cents, format_amount, BucketTotal, DonationTotals};
pub use config::{AppConfig, SourceConfig, DEFAULT_DEBOUNCE_MS};
pub use loader::{
    load_sources, read_rows, read_rows_from_reader, read_json_rows_from_reader,
    LoadReport, LoadedData, SourceLoadStat,
};
pub use view::{DerivedView, DisplayRow, QueryDebouncer, ViewState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
