use crate::models::{Normalization, RawUnitRecord, Unit};
use crate::scrapers::error::ScrapeError;
use crate::scrapers::traits::{Fetcher, ListingExtractor};
use crate::scrapers::types::BrandCriteria;
use async_trait::async_trait;
use tracing::{debug, info};

pub const COMPLEX_NAME: &str = "The Brand";

const DATASET_MARKER: &str = "dataSet";
const DATASET_PREFIX: &str = "var dataSet = ";
const SCRIPT_END: &str = "</script>";

/// The Brand embeds its whole listing as a JavaScript array on the homepage
pub struct BrandScraper {
    url: String,
    criteria: BrandCriteria,
}

impl BrandScraper {
    pub fn new(url: impl Into<String>, criteria: BrandCriteria) -> Self {
        Self {
            url: url.into(),
            criteria,
        }
    }
}

/// Pull the `var dataSet = [...]` literal out of the page and parse it.
///
/// The block starts at the last `dataSet` line before the first line that
/// starts with `</script>`. The site serves CRLF lines, so the line just
/// before that closing tag ends in `;\r`, which is dropped.
pub fn parse_dataset(html: &str) -> Result<Vec<RawUnitRecord>, ScrapeError> {
    let mut lines: Vec<&str> = html.split('\n').collect();
    let mut start = None;
    let mut end = None;

    for i in 0..lines.len() {
        if lines[i].contains(DATASET_MARKER) {
            lines[i] = lines[i]
                .rsplit_once(DATASET_PREFIX)
                .map_or(lines[i], |(_, literal)| literal);
            start = Some(i);
        }

        if start.is_some() && lines[i].starts_with(SCRIPT_END) {
            if let Some(prev) = i.checked_sub(1) {
                lines[prev] = drop_last_chars(lines[prev], 2);
            }
            end = Some(i);
            break;
        }
    }

    let start = start.ok_or(ScrapeError::MissingMarker(DATASET_MARKER))?;
    let end = end.ok_or(ScrapeError::MissingMarker(SCRIPT_END))?;
    let literal = lines[start..end].concat();
    debug!("Embedded dataset spans lines {}..{} ({} bytes)", start, end, literal.len());

    let mut records: Vec<RawUnitRecord> = serde_json::from_str(&literal)?;
    for record in &mut records {
        record.insert("Complex", COMPLEX_NAME);
    }

    Ok(records)
}

fn drop_last_chars(line: &str, n: usize) -> &str {
    match line.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &line[..idx],
        None => "",
    }
}

#[async_trait]
impl ListingExtractor for BrandScraper {
    fn complex_name(&self) -> &'static str {
        COMPLEX_NAME
    }

    async fn extract(&self, fetcher: &dyn Fetcher) -> Result<Vec<RawUnitRecord>, ScrapeError> {
        info!("Fetching {} listing", COMPLEX_NAME);
        let html = fetcher.get_text(&self.url).await?;
        parse_dataset(&html)
    }

    fn normalization(&self) -> Normalization {
        Normalization::Strict
    }

    fn requires_units(&self) -> bool {
        true
    }

    fn is_wanted(&self, unit: &Unit) -> bool {
        self.criteria.matches(unit)
    }
}
