use crate::models::Unit;
use serde::{Deserialize, Serialize};

/// Floor plans queried on the Holly St. site
pub const DEFAULT_FLOOR_PLANS: [&str; 6] = [
    "1024819", "1024820", "1024821", "1024822", "1024823", "1024824",
];

/// Which units at The Brand are worth reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandCriteria {
    /// Minimum size in square feet (inclusive)
    pub min_sqft: i64,
    /// Acceptable floors
    pub floors: Vec<i64>,
}

impl BrandCriteria {
    pub fn matches(&self, unit: &Unit) -> bool {
        unit.sqft >= self.min_sqft && self.floors.contains(&unit.floor)
    }
}

impl Default for BrandCriteria {
    fn default() -> Self {
        Self {
            min_sqft: 900,
            floors: vec![1, 6],
        }
    }
}
