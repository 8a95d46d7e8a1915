use crate::models::{DisplayRecord, Normalization, Unit};
use crate::scrapers::error::ScrapeError;
use crate::scrapers::traits::{Fetcher, ListingExtractor};
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// One complex's listing for the current run.
///
/// The site is scraped on first access only; later reads return the same
/// result. Instances are meant for the single-threaded run loop and are never
/// shared across tasks.
pub struct ComplexListing {
    extractor: Box<dyn ListingExtractor>,
    units: OnceCell<Result<Vec<Unit>, ScrapeError>>,
}

impl ComplexListing {
    pub fn new(extractor: Box<dyn ListingExtractor>) -> Self {
        Self {
            extractor,
            units: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.extractor.complex_name()
    }

    /// Scrape result, keeping the cause of a failure
    pub async fn load(&self, fetcher: &dyn Fetcher) -> &Result<Vec<Unit>, ScrapeError> {
        self.units
            .get_or_init(|| async {
                let result = self.scrape(fetcher).await;
                match &result {
                    Ok(units) => info!("Scraped {} units from {}", units.len(), self.name()),
                    Err(e) => warn!("{} listing unavailable: {}", self.name(), e),
                }
                result
            })
            .await
    }

    /// Units, or `None` when the listing could not be scraped
    pub async fn units(&self, fetcher: &dyn Fetcher) -> Option<&[Unit]> {
        self.load(fetcher).await.as_ref().ok().map(Vec::as_slice)
    }

    /// Units wanted by this complex's criteria, ready for the report
    pub async fn matches(&self, fetcher: &dyn Fetcher) -> Option<Vec<DisplayRecord>> {
        let units = self.units(fetcher).await?;
        Some(select(units, |unit| self.extractor.is_wanted(unit)))
    }

    async fn scrape(&self, fetcher: &dyn Fetcher) -> Result<Vec<Unit>, ScrapeError> {
        let records = self.extractor.extract(fetcher).await?;
        if records.is_empty() && self.extractor.requires_units() {
            return Err(ScrapeError::NoListings);
        }

        let scraped_at = Utc::now();
        let mode: Normalization = self.extractor.normalization();
        records
            .iter()
            .map(|record| Unit::normalize(record, mode, scraped_at).map_err(ScrapeError::from))
            .collect()
    }
}

/// Project the units satisfying `wanted` into report rows
pub fn select(units: &[Unit], wanted: impl Fn(&Unit) -> bool) -> Vec<DisplayRecord> {
    units
        .iter()
        .filter(|unit| wanted(*unit))
        .map(DisplayRecord::from)
        .collect()
}
