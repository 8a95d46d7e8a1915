mod config;
mod models;
mod notifier;
mod report;
mod runner;
mod scrapers;

use anyhow::{bail, Context};
use config::Config;
use notifier::SmtpMailer;
use runner::{Notification, Outcome};
use scrapers::{BrandScraper, ComplexListing, HollyStScraper, HttpFetcher};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Apartment Scout");

    let config = Config::from_env()?;
    let mailer = SmtpMailer::new(&config).context("Failed to configure SMTP mailer")?;
    let fetcher = HttpFetcher::new()?;

    let hostname = hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown-host".to_string());

    let listings = [
        ComplexListing::new(Box::new(BrandScraper::new(
            config.brand_url.as_str(),
            config.brand_criteria.clone(),
        ))),
        ComplexListing::new(Box::new(HollyStScraper::new(
            &config.holly_st_url,
            config.holly_st_floor_plans.clone(),
        ))),
    ];

    let notification = Notification {
        recipient: &config.recipient,
        hostname: &hostname,
    };

    match runner::run(&listings, &fetcher, &mailer, &notification).await {
        Outcome::ScrapeFailed { .. } => {
            bail!("Script exited without completing. Please investigate issues.")
        }
        Outcome::NoMatches => bail!("There were no apartments that matched specified criteria."),
        Outcome::Reported { .. } => Ok(()),
    }
}
