pub mod brand;
pub mod error;
pub mod fetch;
pub mod holly_st;
pub mod listing;
pub mod traits;
pub mod types;

pub use brand::BrandScraper;
pub use fetch::HttpFetcher;
pub use holly_st::HollyStScraper;
pub use listing::ComplexListing;
pub use traits::Fetcher;
