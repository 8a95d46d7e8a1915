use crate::models::DisplayRecord;
use maud::{html, Markup};

pub const REPORT_SUBJECT: &str = "Apartment Bot Alert!";
pub const ALERT_SUBJECT: &str = "Apartment Bot Alert ERROR!";

/// Matching units from every complex, largest first
#[derive(Debug, Clone)]
pub struct Report {
    records: Vec<DisplayRecord>,
}

impl Report {
    /// Sort by square footage, descending; ties keep their incoming order.
    pub fn new(mut records: Vec<DisplayRecord>) -> Self {
        records.sort_by(|a, b| b.sqft.cmp(&a.sqft));
        Self { records }
    }

    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn table(&self) -> Markup {
        html! {
            table border="0" cellpadding="10" {
                thead {
                    tr {
                        @for column in DisplayRecord::COLUMNS {
                            th { (column) }
                        }
                    }
                }
                tbody {
                    @for record in &self.records {
                        tr {
                            td { (record.unit.as_deref().unwrap_or_default()) }
                            td { (record.building) }
                            td { (record.floor) }
                            td { (record.unit_type.as_deref().unwrap_or_default()) }
                            td { (record.baths) }
                            td { (record.sqft) }
                            td { (record.rent) }
                            td { (record.availability.as_deref().unwrap_or_default()) }
                            td { (record.complex) }
                        }
                    }
                }
            }
        }
    }

    /// Full HTML body of the report email
    pub fn to_email_body(&self) -> String {
        html! {
            (banner())
            p { "An apartment you've been waiting for has become available! See below!" }
            (self.table())
        }
        .into_string()
    }
}

/// HTML body of the alert sent when a listing could not be scraped
pub fn alert_body(hostname: &str, failures: &[(&str, String)]) -> String {
    html! {
        (banner())
        p { "There was an issue with the Apartment Bot Automation on " (hostname) "." }
        ul {
            @for (complex, cause) in failures {
                li { b { (complex) } ": " (cause) }
            }
        }
        p { "Please investigate and fix as soon as possible!!!" }
    }
    .into_string()
}

fn banner() -> Markup {
    html! {
        h3 style="color:red;" { i { "Attention!" } }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(unit: &str, sqft: i64) -> DisplayRecord {
        DisplayRecord {
            unit: Some(unit.to_string()),
            building: 1,
            floor: 1,
            unit_type: Some("B2".to_string()),
            baths: 2,
            sqft,
            rent: "$1,795".to_string(),
            availability: None,
            complex: "Holly St.".to_string(),
        }
    }

    #[test]
    fn sorts_by_square_footage_descending() {
        let report = Report::new(vec![record("a", 700), record("b", 1200), record("c", 900)]);
        let order: Vec<i64> = report.records().iter().map(|r| r.sqft).collect();

        assert_eq!(order, vec![1200, 900, 700]);
    }

    #[test]
    fn ties_keep_their_incoming_order() {
        let report = Report::new(vec![record("a", 900), record("b", 1200), record("c", 900)]);
        let units: Vec<&str> = report
            .records()
            .iter()
            .filter_map(|r| r.unit.as_deref())
            .collect();

        assert_eq!(units, vec!["b", "a", "c"]);
    }

    #[test]
    fn renders_table_in_sorted_order() {
        let body = Report::new(vec![record("small", 700), record("large", 1200)]).to_email_body();

        assert!(body.contains(r#"<table border="0" cellpadding="10">"#));
        assert!(body.contains("<th>Sq. Footage</th>"));
        assert!(body.contains("become available"));
        assert!(body.find("large").unwrap() < body.find("small").unwrap());
    }

    #[test]
    fn scraped_values_are_escaped() {
        let body = Report::new(vec![record("<b>1</b>", 900)]).to_email_body();

        assert!(body.contains("&lt;b&gt;1&lt;/b&gt;"));
    }

    #[test]
    fn alert_names_host_and_causes() {
        let body = alert_body("pi-4", &[("Holly St.", "request to x failed".to_string())]);

        assert!(body.contains("Automation on pi-4."));
        assert!(body.contains("<li><b>Holly St.</b>: request to x failed</li>"));
    }
}
