use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Season bucket as coded in the merged dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Season(u8);

impl Season {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn code(self) -> u8 {
        self.0
    }

    /// Legend text shown next to the season chart.
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Clear, few clouds, partly cloudy",
            2 => "Mist + cloudy, mist + broken clouds, mist + few clouds",
            3 => "Light snow, light rain + thunderstorm + scattered clouds",
            _ => "Heavy rain + ice pellets + thunderstorm + mist, snow + fog",
        }
    }

    pub fn all() -> impl Iterator<Item = Season> {
        (Self::MIN..=Self::MAX).map(Season)
    }
}

impl TryFrom<u8> for Season {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&code) {
            Ok(Season(code))
        } else {
            Err(format!("season code {code} outside {}..={}", Self::MIN, Self::MAX))
        }
    }
}

impl From<Season> for u8 {
    fn from(season: Season) -> Self {
        season.0
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One hourly row of the merged day/hour table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RentalRecord {
    pub date: NaiveDate,
    pub hour: u8,
    pub season: Season,
    pub daily_count: u32,
    pub hourly_count: u32,
    pub month: u8,
}

/// Immutable snapshot of the loaded table, sorted by date then hour.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<RentalRecord>,
}

impl Dataset {
    pub fn new(mut records: Vec<RentalRecord>) -> Self {
        records.sort_by_key(|record| (record.date, record.hour));
        Self { records }
    }

    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|record| record.date)
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|record| record.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub order_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonSummary {
    pub season: Season,
    pub label: &'static str,
    pub customer_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecency {
    pub month: u8,
    pub recency: i64,
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfAverages {
    pub avg_recency: f64,
    pub avg_frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub hour: u8,
    pub avg_hourly_count: f64,
}

/// User-adjustable parameters of one dashboard render.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DashboardParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub start_hour: Option<u8>,
    pub end_hour: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct HourRangeQuery {
    pub start_hour: Option<u8>,
    pub end_hour: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct BoundsResponse {
    pub source: String,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub record_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DailyOrdersResponse {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub total_orders: u64,
    pub points: Vec<DailyOrders>,
}

#[derive(Debug, Serialize)]
pub struct RecencyFrequencyResponse {
    pub months: Vec<MonthRecency>,
    pub averages: RfAverages,
}

#[derive(Debug, Serialize)]
pub struct HourlyResponse {
    pub start_hour: u8,
    pub end_hour: u8,
    pub points: Vec<HourlyPoint>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub total_orders: u64,
    pub daily_orders: Vec<DailyOrders>,
    pub seasons: Vec<SeasonSummary>,
    pub recency_frequency: Vec<MonthRecency>,
    pub rf_averages: RfAverages,
    pub top_recency: Vec<MonthRecency>,
    pub top_frequency: Vec<MonthRecency>,
    pub start_hour: u8,
    pub end_hour: u8,
    pub hourly: Vec<HourlyPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_rejects_codes_outside_enumeration() {
        assert!(Season::try_from(0).is_err());
        assert!(Season::try_from(5).is_err());
        assert_eq!(Season::try_from(3).unwrap().code(), 3);
    }

    #[test]
    fn season_serializes_as_code() {
        let season = Season::try_from(2).unwrap();
        assert_eq!(serde_json::to_string(&season).unwrap(), "2");
        assert_eq!(Season::all().count(), 4);
    }
}
