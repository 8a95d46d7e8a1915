use crate::notifier::Mailer;
use crate::report::{alert_body, Report, ALERT_SUBJECT, REPORT_SUBJECT};
use crate::scrapers::{ComplexListing, Fetcher};
use tracing::{error, info};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one listing was unavailable; an alert was attempted
    ScrapeFailed { alert_sent: bool },
    /// Every listing scraped but nothing matched
    NoMatches,
    /// A report was built and delivery attempted
    Reported { delivered: bool },
}

/// Who gets notified, and from which machine
pub struct Notification<'a> {
    pub recipient: &'a str,
    pub hostname: &'a str,
}

/// Scrape every complex in order, then alert, skip, or send the report.
pub async fn run(
    listings: &[ComplexListing],
    fetcher: &dyn Fetcher,
    mailer: &dyn Mailer,
    notification: &Notification<'_>,
) -> Outcome {
    let mut failures = Vec::new();
    for listing in listings {
        if let Err(e) = listing.load(fetcher).await {
            failures.push((listing.name(), e.to_string()));
        }
    }

    if !failures.is_empty() {
        error!("{} of {} listings unavailable", failures.len(), listings.len());
        let body = alert_body(notification.hostname, &failures);

        let alert_sent = match mailer.send(notification.recipient, ALERT_SUBJECT, &body).await {
            Ok(()) => {
                info!("Alert email sent");
                true
            }
            Err(e) => {
                error!("ERROR: {}", e);
                false
            }
        };
        return Outcome::ScrapeFailed { alert_sent };
    }

    let mut records = Vec::new();
    for listing in listings {
        let matches = listing.matches(fetcher).await.unwrap_or_default();
        info!("{} matching units at {}", matches.len(), listing.name());
        records.extend(matches);
    }

    let report = Report::new(records);
    if report.is_empty() {
        info!("No apartments matched");
        return Outcome::NoMatches;
    }
    info!("Reporting {} units", report.records().len());

    match mailer
        .send(notification.recipient, REPORT_SUBJECT, &report.to_email_body())
        .await
    {
        Ok(()) => {
            info!("Email sent successfully!");
            Outcome::Reported { delivered: true }
        }
        Err(e) => {
            error!("ERROR: {}", e);
            Outcome::Reported { delivered: false }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::testing::RecordingMailer;
    use crate::scrapers::fetch::testing::StubFetcher;
    use crate::scrapers::types::BrandCriteria;
    use crate::scrapers::{BrandScraper, HollyStScraper};

    const BRAND_URL: &str = "https://brand.test";
    const HOLLY_URL: &str = "https://holly.test";

    const NOTIFICATION: Notification<'static> = Notification {
        recipient: "me@example.com",
        hostname: "pi-4",
    };

    fn listings() -> Vec<ComplexListing> {
        vec![
            ComplexListing::new(Box::new(BrandScraper::new(BRAND_URL, BrandCriteria::default()))),
            ComplexListing::new(Box::new(HollyStScraper::new(
                HOLLY_URL,
                vec!["1024819".to_string()],
            ))),
        ]
    }

    fn brand_page(sqft: i64, floor: i64) -> String {
        format!(
            "<script>\r\nvar dataSet = [{{\"Unit\": \"1101\", \"Type\": \"B2\", \"Baths\": 2, \"SqFt\": {}, \"Building\": 1, \"Floor\": {}, \"Rent\": \"2,150\", \"Available\": \"04/01/2021\"}}];\r\n</script>\r\n",
            sqft, floor
        )
    }

    fn holly_detail(move_in: &str) -> String {
        format!(
            "<div><h3>Floor Plan : A1 - 1 Bedroom, 1 Bath</h3><td data-label='Apartment'>#204</td><td data-label='Sq. Ft.'>950</td><td data-label='Rent'>$1,495</td><a href=\"javascript:Apply('MoveInDate={}')\">Apply</a></div>\n",
            move_in
        )
    }

    fn fetcher(brand: Option<String>, holly_detail_page: String) -> StubFetcher {
        let mut fetcher = StubFetcher::new()
            .page(
                "https://holly.test/floorplans.aspx",
                "<a href=\"availableunits.aspx?&floorPlans=1024819\">Check Availability</a>\n",
            )
            .page(
                "https://holly.test/availableunits.aspx?&floorPlans=1024819",
                &holly_detail_page,
            );
        if let Some(page) = brand {
            fetcher = fetcher.page(BRAND_URL, &page);
        }
        fetcher
    }

    #[tokio::test]
    async fn no_matches_sends_nothing() {
        let fetcher = fetcher(Some(brand_page(700, 2)), holly_detail(""));
        let mailer = RecordingMailer::new();

        let outcome = run(&listings(), &fetcher, &mailer, &NOTIFICATION).await;

        assert_eq!(outcome, Outcome::NoMatches);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn network_failure_sends_alert() {
        let fetcher = fetcher(None, holly_detail("5/1/2021"));
        let mailer = RecordingMailer::new();

        let outcome = run(&listings(), &fetcher, &mailer, &NOTIFICATION).await;

        assert_eq!(outcome, Outcome::ScrapeFailed { alert_sent: true });
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, ALERT_SUBJECT);
        assert_eq!(sent[0].to, "me@example.com");
        assert!(sent[0].html.contains("pi-4"));
        assert!(sent[0].html.contains("The Brand"));
    }

    #[tokio::test]
    async fn failed_alert_still_aborts() {
        let fetcher = fetcher(None, holly_detail("5/1/2021"));
        let mailer = RecordingMailer::failing();

        let outcome = run(&listings(), &fetcher, &mailer, &NOTIFICATION).await;

        assert_eq!(outcome, Outcome::ScrapeFailed { alert_sent: false });
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn one_match_per_complex_is_reported_largest_first() {
        let fetcher = fetcher(Some(brand_page(1050, 6)), holly_detail("5/1/2021"));
        let mailer = RecordingMailer::new();

        let outcome = run(&listings(), &fetcher, &mailer, &NOTIFICATION).await;

        assert_eq!(outcome, Outcome::Reported { delivered: true });
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, REPORT_SUBJECT);
        assert_eq!(sent[0].html.matches("<tr>").count(), 3);
        assert!(sent[0].html.find("1101").unwrap() < sent[0].html.find("#204").unwrap());
    }

    #[tokio::test]
    async fn failed_report_delivery_is_only_logged() {
        let fetcher = fetcher(Some(brand_page(1050, 6)), holly_detail("5/1/2021"));
        let mailer = RecordingMailer::failing();

        let outcome = run(&listings(), &fetcher, &mailer, &NOTIFICATION).await;

        assert_eq!(outcome, Outcome::Reported { delivered: false });
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn every_site_is_fetched_once() {
        let fetcher = fetcher(Some(brand_page(1050, 6)), holly_detail("5/1/2021"));
        let mailer = RecordingMailer::new();

        run(&listings(), &fetcher, &mailer, &NOTIFICATION).await;

        assert_eq!(fetcher.requests().len(), 3);
    }
}
