use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// A unit as scraped from a site, before any type coercion.
///
/// Field names are site-specific and any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawUnitRecord(Map<String, Value>);

impl RawUnitRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, value: impl Into<Value>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field rendered as text; numbers are stringified, null counts as absent.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Field read as an integer.
    ///
    /// Accepts JSON numbers (fractions truncate) and strings such as `"1,050"`.
    pub fn integer(&self, field: &'static str) -> Result<Option<i64>, NormalizeError> {
        let not_integer = |value: &Value| NormalizeError::NotInteger {
            field,
            value: value.to_string(),
        };

        let Some(value) = self.get(field) else {
            return Ok(None);
        };

        match value {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .map(Some)
                .ok_or_else(|| not_integer(value)),
            Value::String(s) => s
                .trim()
                .replace(',', "")
                .parse::<i64>()
                .map(Some)
                .map_err(|_| not_integer(value)),
            other => Err(not_integer(other)),
        }
    }
}

/// Errors raised by strict normalization.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("required field `{field}` is missing")]
    Missing { field: &'static str },

    #[error("field `{field}` is not an integer: {value}")]
    NotInteger { field: &'static str, value: String },
}

/// How a site's raw records are turned into units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Missing or malformed numbers become 0
    Lenient,
    /// Numbers must be present and well formed
    Strict,
}

/// Normalized apartment unit
///
/// A numeric field of 0 may mean either "zero" or "not listed"; the two are
/// not distinguished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub unit: Option<String>,
    pub unit_type: Option<String>,
    pub baths: i64,
    pub sqft: i64,
    pub building: i64,
    pub floor: i64,
    pub rent: Option<String>,
    pub availability: Option<String>,
    pub complex: String,
    pub scraped_at: DateTime<Utc>,
}

const BATHS: &str = "Baths";
const SQFT: &str = "SqFt";
const BUILDING: &str = "Building";
const FLOOR: &str = "Floor";

impl Unit {
    /// Build a unit, coercing every unusable number to 0. Never fails.
    pub fn lenient(record: &RawUnitRecord, scraped_at: DateTime<Utc>) -> Self {
        let number = |field: &'static str| match record.integer(field) {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                debug!("Coercing to 0: {}", e);
                0
            }
        };

        Self::with_numbers(
            record,
            [number(BATHS), number(SQFT), number(BUILDING), number(FLOOR)],
            scraped_at,
        )
    }

    /// Build a unit from a record whose schema is known to carry every number.
    pub fn strict(record: &RawUnitRecord, scraped_at: DateTime<Utc>) -> Result<Self, NormalizeError> {
        let number = |field: &'static str| {
            record
                .integer(field)?
                .ok_or(NormalizeError::Missing { field })
        };

        Ok(Self::with_numbers(
            record,
            [number(BATHS)?, number(SQFT)?, number(BUILDING)?, number(FLOOR)?],
            scraped_at,
        ))
    }

    pub fn normalize(
        record: &RawUnitRecord,
        mode: Normalization,
        scraped_at: DateTime<Utc>,
    ) -> Result<Self, NormalizeError> {
        match mode {
            Normalization::Lenient => Ok(Self::lenient(record, scraped_at)),
            Normalization::Strict => Self::strict(record, scraped_at),
        }
    }

    fn with_numbers(record: &RawUnitRecord, numbers: [i64; 4], scraped_at: DateTime<Utc>) -> Self {
        let [baths, sqft, building, floor] = numbers;
        Self {
            unit: record.text("Unit"),
            unit_type: record.text("Type"),
            baths,
            sqft,
            building,
            floor,
            rent: record.text("Rent"),
            availability: record.text("Available"),
            complex: record.text("Complex").unwrap_or_default(),
            scraped_at,
        }
    }
}

/// A matching unit flattened into report columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    #[serde(rename = "Unit")]
    pub unit: Option<String>,
    #[serde(rename = "Building")]
    pub building: i64,
    #[serde(rename = "Floor")]
    pub floor: i64,
    #[serde(rename = "Type")]
    pub unit_type: Option<String>,
    #[serde(rename = "Baths")]
    pub baths: i64,
    #[serde(rename = "Sq. Footage")]
    pub sqft: i64,
    #[serde(rename = "Rent")]
    pub rent: String,
    #[serde(rename = "Availability")]
    pub availability: Option<String>,
    #[serde(rename = "Complex")]
    pub complex: String,
}

impl DisplayRecord {
    pub const COLUMNS: [&'static str; 9] = [
        "Unit",
        "Building",
        "Floor",
        "Type",
        "Baths",
        "Sq. Footage",
        "Rent",
        "Availability",
        "Complex",
    ];
}

impl From<&Unit> for DisplayRecord {
    fn from(unit: &Unit) -> Self {
        let rent = unit
            .rent
            .as_deref()
            .map(|rent| format!("${}", rent.trim().trim_start_matches('$')))
            .unwrap_or_default();

        Self {
            unit: unit.unit.clone(),
            building: unit.building,
            floor: unit.floor,
            unit_type: unit.unit_type.clone(),
            baths: unit.baths,
            sqft: unit.sqft,
            rent,
            availability: unit.availability.clone(),
            complex: unit.complex.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawUnitRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn lenient_defaults_missing_numbers_to_zero() {
        let unit = Unit::lenient(&record(json!({ "Unit": "A101", "Type": "B2" })), Utc::now());

        assert_eq!(unit.unit.as_deref(), Some("A101"));
        assert_eq!((unit.baths, unit.sqft, unit.building, unit.floor), (0, 0, 0, 0));
        assert_eq!(unit.complex, "");
    }

    #[test]
    fn lenient_coerces_malformed_numbers_to_zero() {
        let raw = record(json!({ "SqFt": "huge", "Floor": [1], "Baths": "2" }));
        let unit = Unit::lenient(&raw, Utc::now());

        assert_eq!(unit.sqft, 0);
        assert_eq!(unit.floor, 0);
        assert_eq!(unit.baths, 2);
    }

    #[test]
    fn integers_accept_strings_and_fractions() {
        let raw = record(json!({ "SqFt": " 1,050 ", "Floor": 6.0, "Baths": 1.5, "Building": -3 }));
        let unit = Unit::lenient(&raw, Utc::now());

        assert_eq!(unit.sqft, 1050);
        assert_eq!(unit.floor, 6);
        assert_eq!(unit.baths, 1);
        assert_eq!(unit.building, -3);
    }

    #[test]
    fn strict_requires_every_number() {
        let raw = record(json!({ "Baths": 1, "SqFt": 900, "Floor": 1 }));
        let err = Unit::strict(&raw, Utc::now()).unwrap_err();

        assert!(matches!(err, NormalizeError::Missing { field: "Building" }));
    }

    #[test]
    fn strict_rejects_malformed_numbers() {
        let raw = record(json!({ "Baths": 1, "SqFt": "n/a", "Building": 2, "Floor": 1 }));

        assert!(matches!(
            Unit::strict(&raw, Utc::now()),
            Err(NormalizeError::NotInteger { field: "SqFt", .. })
        ));
    }

    #[test]
    fn text_stringifies_numbers_and_skips_null() {
        let raw = record(json!({ "Rent": 1795, "Available": null }));

        assert_eq!(raw.text("Rent").as_deref(), Some("1795"));
        assert_eq!(raw.text("Available"), None);
    }

    #[test]
    fn display_record_prefixes_rent_once() {
        let mut raw = record(json!({ "Rent": "$1,500", "SqFt": 950 }));
        let unit = Unit::lenient(&raw, Utc::now());
        assert_eq!(DisplayRecord::from(&unit).rent, "$1,500");

        raw.insert("Rent", 1795);
        let unit = Unit::lenient(&raw, Utc::now());
        assert_eq!(DisplayRecord::from(&unit).rent, "$1795");
    }
}
