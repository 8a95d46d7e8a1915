use crate::models::{RawUnitRecord, Unit};
use crate::scrapers::error::ScrapeError;
use crate::scrapers::traits::{Fetcher, ListingExtractor};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, info};

pub const COMPLEX_NAME: &str = "Holly St.";

const AVAILABILITY_MARKER: &str = "Availability";
const HEADING_MARKER: &str = "Floor Plan : ";
const RENT_MARKER: &str = "data-label='Rent'>";
const SQFT_MARKER: &str = "Ft.'>";
const UNIT_MARKER: &str = "data-label='Apartment'>";
const MOVE_IN_MARKER: &str = "MoveInDate=";

/// Holly St. lists floor plans on one page and the units of each plan on a
/// detail page of its own
pub struct HollyStScraper {
    base_url: String,
    floor_plans: Vec<String>,
}

impl HollyStScraper {
    pub fn new(base_url: &str, floor_plans: Vec<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            floor_plans,
        }
    }

    fn floor_plans_url(&self) -> String {
        format!("{}/floorplans.aspx", self.base_url)
    }

    fn detail_url(&self, floor_plan: &str) -> String {
        format!("{}/availableunits.aspx?&floorPlans={}", self.base_url, floor_plan)
    }
}

/// Floor plans with units available, in the order they appear on the page
pub fn available_floor_plans(html: &str, floor_plans: &[String]) -> Vec<String> {
    let mut available: Vec<String> = Vec::new();

    for line in html.split('\n') {
        if !line.contains(AVAILABILITY_MARKER) {
            continue;
        }
        for id in floor_plans {
            if line.contains(&format!("floorPlans={}", id)) && !available.contains(id) {
                available.push(id.clone());
            }
        }
    }

    available
}

/// Read the unit from the first floor plan line of a detail page.
///
/// A page without such a line yields an empty record.
pub fn parse_detail_page(html: &str) -> Result<RawUnitRecord, ScrapeError> {
    let mut record = RawUnitRecord::new();

    let Some(line) = html.split('\n').find(|line| line.contains(HEADING_MARKER)) else {
        debug!("No floor plan heading on detail page");
        return Ok(record);
    };

    let heading = floor_plan_heading(line)?;

    // "Floor Plan : B2 - 2 Bedroom, 2 Bath"
    let baths = heading
        .rsplit(", ")
        .next()
        .and_then(|part| part.split_whitespace().next())
        .ok_or_else(|| ScrapeError::Markup(format!("no bath count in heading {:?}", heading)))?;
    record.insert("Baths", baths);
    record.insert("Type", slice_between(&heading, ": ", " -"));
    record.insert("Complex", COMPLEX_NAME);

    for token in line.split_whitespace() {
        if token.contains(RENT_MARKER) {
            record.insert("Rent", slice_between(token, "'>", "<"));
        }
        if token.contains(SQFT_MARKER) {
            record.insert("SqFt", slice_between(token, "'>", "<"));
        }
        if token.contains(UNIT_MARKER) {
            record.insert("Unit", slice_between(token, "'>", "<"));
        }
        if token.contains(MOVE_IN_MARKER) {
            record.insert("Available", slice_between(token, MOVE_IN_MARKER, "')"));
        }
    }

    Ok(record)
}

fn floor_plan_heading(line: &str) -> Result<String, ScrapeError> {
    let fragment = Html::parse_fragment(line);
    let h3 = Selector::parse("h3").map_err(|e| ScrapeError::Markup(e.to_string()))?;

    fragment
        .select(&h3)
        .map(|el| el.text().collect::<String>())
        .find(|text| text.contains(HEADING_MARKER.trim_end()))
        .map(|text| text.trim().to_string())
        .ok_or_else(|| ScrapeError::Markup("floor plan line has no h3 heading".to_string()))
}

/// Text after the last `open` (or from the start) up to the first `close`
/// (or the end).
fn slice_between<'a>(s: &'a str, open: &str, close: &str) -> &'a str {
    let tail = s.rsplit_once(open).map_or(s, |(_, tail)| tail);
    tail.split_once(close).map_or(tail, |(head, _)| head)
}

#[async_trait]
impl ListingExtractor for HollyStScraper {
    fn complex_name(&self) -> &'static str {
        COMPLEX_NAME
    }

    async fn extract(&self, fetcher: &dyn Fetcher) -> Result<Vec<RawUnitRecord>, ScrapeError> {
        info!("Fetching {} floor plans", COMPLEX_NAME);
        let floor_plans_page = fetcher.get_text(&self.floor_plans_url()).await?;
        let available = available_floor_plans(&floor_plans_page, &self.floor_plans);
        info!("{} floor plans with availability: {:?}", COMPLEX_NAME, available);

        let mut records = Vec::with_capacity(available.len());
        for floor_plan in &available {
            let detail_page = fetcher.get_text(&self.detail_url(floor_plan)).await?;
            let record = parse_detail_page(&detail_page)?;
            if record.is_empty() {
                debug!("No unit listed for floor plan {}", floor_plan);
            }
            records.push(record);
        }

        Ok(records)
    }

    fn is_wanted(&self, unit: &Unit) -> bool {
        unit.availability.as_deref().is_some_and(|date| !date.is_empty())
    }
}
