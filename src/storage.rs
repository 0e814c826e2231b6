use crate::errors::DashboardError;
use crate::models::{Dataset, RentalRecord, Season};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::info;

/// Column layout of the merged day/hour CSV. Columns not listed are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    dteday: NaiveDate,
    hr: u8,
    season_daily: u8,
    cnt_daily: u32,
    cnt_hourly: u32,
    mnth_daily: u8,
}

impl CsvRow {
    fn into_record(self, row: u64) -> Result<RentalRecord, DashboardError> {
        let malformed = |reason: String| DashboardError::MalformedInput { row, reason };

        if self.hr > 23 {
            return Err(malformed(format!("hour {} outside 0..=23", self.hr)));
        }
        if !(1..=12).contains(&self.mnth_daily) {
            return Err(malformed(format!("month {} outside 1..=12", self.mnth_daily)));
        }
        let season = Season::try_from(self.season_daily).map_err(malformed)?;

        Ok(RentalRecord {
            date: self.dteday,
            hour: self.hr,
            season,
            daily_count: self.cnt_daily,
            hourly_count: self.cnt_hourly,
            month: self.mnth_daily,
        })
    }
}

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/bike_merge.csv"))
}

pub async fn load_data(path: &Path) -> Result<Dataset, DashboardError> {
    let bytes = fs::read(path).await.map_err(|source| DashboardError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = Dataset::new(parse_records(&bytes)?);
    info!(
        "loaded {} rental records from {} ({:?} to {:?})",
        dataset.len(),
        path.display(),
        dataset.min_date(),
        dataset.max_date()
    );
    Ok(dataset)
}

/// Parses every row or none: the first bad row rejects the batch.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<RentalRecord>, DashboardError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // header is line 1
        let line = index as u64 + 2;
        let row = result.map_err(|err| DashboardError::MalformedInput {
            row: err.position().map(|pos| pos.line()).unwrap_or(line),
            reason: err.to_string(),
        })?;
        records.push(row.into_record(line)?);
    }

    Ok(records)
}
