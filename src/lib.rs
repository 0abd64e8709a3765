//! Paginated listing harvester.
//!
//! Resolves how many result pages a listing endpoint has, walks every page
//! in order, extracts one [`models::Listing`] per well-formed result row and
//! writes the whole run to a single JSON artifact.

pub mod error;
pub mod extractor;
pub mod fetch;
pub mod harvester;
pub mod metadata;
pub mod models;
pub mod pacing;
pub mod pagination;
pub mod sink;
pub mod traits;

#[cfg(test)]
mod testing;

pub use error::{HarvestError, RecordParseError, Result};
pub use harvester::{Harvester, RunSummary};
pub use models::{Listing, PagingSize, RunMetadata, ScraperOptions};
