use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

/// Headline counters for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub products: u64,
    #[serde(default)]
    pub total_sales: u64,
    #[serde(default)]
    pub total_revenue: f64,
}

/// One day of sales as it arrives on the wire. The date is whatever
/// string the server produced; normalization happens in `DailySale`.
#[derive(Debug, Clone, Deserialize)]
pub struct DailySaleRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub sales: u64,
    #[serde(default)]
    pub revenue: f64,
}

/// Response envelope for `/analysis-data`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    #[serde(rename = "analyticsData")]
    pub analytics_data: Option<AnalyticsSummary>,
    #[serde(rename = "dailySalesData")]
    pub daily_sales_data: Option<Vec<DailySaleRecord>>,
}

/// One day of sales with the date resolved to a calendar day.
/// `date` is `None` when the server sent something unparseable; the
/// record is kept so the series length still matches the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySale {
    pub date: Option<NaiveDate>,
    pub sales: u64,
    pub revenue: f64,
}

impl DailySale {
    pub fn from_record(record: DailySaleRecord) -> Self {
        Self {
            date: record.date.as_deref().and_then(parse_day),
            sales: record.sales,
            revenue: record.revenue,
        }
    }
}

/// Parse a server-provided date string down to a calendar day.
/// Accepts plain dates and RFC 3339 timestamps.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}
