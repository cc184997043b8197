pub mod csv;
pub mod dedup;
pub mod detect;
pub mod error;
pub mod model;
pub mod ofx;
pub mod suggest;

pub use csv::parse_csv;
pub use dedup::filter_duplicates;
pub use detect::import_file;
pub use error::ImportError;
pub use model::{FileType, ImportResult, ImportedTransaction};
pub use ofx::parse_ofx;
pub use suggest::{suggest_category, CategorySuggester, KeywordBucket};
