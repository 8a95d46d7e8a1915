use crate::scrapers::types::{BrandCriteria, DEFAULT_FLOOR_PLANS};
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Run configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub brand_url: String,
    pub holly_st_url: String,
    pub recipient: String,
    pub sender: String,
    pub sender_password: String,
    pub smtp_host: String,
    pub holly_st_floor_plans: Vec<String>,
    pub brand_criteria: BrandCriteria,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        let defaults = BrandCriteria::default();
        let brand_criteria = BrandCriteria {
            min_sqft: match lookup("APT_BRAND_MIN_SQFT") {
                Some(value) => value
                    .trim()
                    .parse()
                    .context("APT_BRAND_MIN_SQFT must be a valid number")?,
                None => defaults.min_sqft,
            },
            floors: match lookup("APT_BRAND_FLOORS") {
                Some(value) => parse_list(&value).context("APT_BRAND_FLOORS must be a list of numbers")?,
                None => defaults.floors,
            },
        };

        let holly_st_floor_plans: Vec<String> = match lookup("APT_HOLLYST_FLOOR_PLANS") {
            Some(value) => parse_list(&value)?,
            None => DEFAULT_FLOOR_PLANS.iter().map(|id| id.to_string()).collect(),
        };

        Ok(Self {
            brand_url: required("APT_BRAND_URL")?,
            holly_st_url: required("APT_HOLLYST_URL")?,
            recipient: required("APT_BOT_RECIPIENT")?,
            sender: required("APT_BOT_SENDER")?,
            sender_password: required("APT_BOT_SENDER_PWD")?,
            smtp_host: lookup("APT_BOT_SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            holly_st_floor_plans,
            brand_criteria,
        })
    }
}

/// Comma-separated values, blanks skipped
fn parse_list<T>(value: &str) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<T>().with_context(|| format!("invalid list item {:?}", item)))
        .collect()
}
