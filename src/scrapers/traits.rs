use crate::models::{Normalization, RawUnitRecord, Unit};
use crate::scrapers::error::ScrapeError;
use async_trait::async_trait;

/// Retrieves a page body by URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Per-complex knowledge of where listings live and how they are embedded.
///
/// A markup change on one site only ever touches that site's implementation.
#[async_trait]
pub trait ListingExtractor: Send + Sync {
    /// Name of the complex, also written into every record
    fn complex_name(&self) -> &'static str;

    /// Fetch the site and pull out its raw unit records
    async fn extract(&self, fetcher: &dyn Fetcher) -> Result<Vec<RawUnitRecord>, ScrapeError>;

    fn normalization(&self) -> Normalization {
        Normalization::Lenient
    }

    /// Whether an empty listing means the scrape is broken
    fn requires_units(&self) -> bool {
        false
    }

    /// The complex's own rule for a unit worth reporting
    fn is_wanted(&self, unit: &Unit) -> bool;
}
