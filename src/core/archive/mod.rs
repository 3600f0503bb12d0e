pub mod extract;

pub use extract::{extract_archive, ExtractSummary};
