use crate::errors::DashboardError;
use crate::models::{
    DailyOrders, DashboardParams, DashboardView, Dataset, HourlyPoint, MonthRecency,
    RentalRecord, RfAverages, Season, SeasonSummary,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Number of months shown in each RF ranking chart.
pub const RF_TOP_N: usize = 12;

pub const FIRST_HOUR: u8 = 0;
pub const LAST_HOUR: u8 = 23;

/// Sums `daily_count` per date over `[start, end]`.
///
/// `daily_count` repeats on every hourly row of a date, so a date with `n`
/// rows contributes `n * daily_count`. Dates without rows are omitted.
pub fn compute_daily_orders(
    records: &[RentalRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyOrders>, DashboardError> {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in filter_by_date_range(records, start, end)? {
        let entry = by_date.entry(record.date).or_default();
        *entry = entry.saturating_add(u64::from(record.daily_count));
    }

    Ok(by_date
        .into_iter()
        .map(|(date, order_count)| DailyOrders { date, order_count })
        .collect())
}

/// Counts distinct `daily_count` values per season, ascending by season code.
pub fn compute_season_summary<'a, I>(records: I) -> Vec<SeasonSummary>
where
    I: IntoIterator<Item = &'a RentalRecord>,
{
    let mut by_season: BTreeMap<Season, BTreeSet<u32>> = BTreeMap::new();
    for record in records {
        by_season
            .entry(record.season)
            .or_default()
            .insert(record.daily_count);
    }

    by_season
        .into_iter()
        .map(|(season, counts)| SeasonSummary {
            season,
            label: season.label(),
            customer_count: counts.len(),
        })
        .collect()
}

/// Recency and frequency per month, ascending by month.
///
/// Recency is measured from the latest date of the whole table; frequency
/// counts hourly rows, not distinct days.
pub fn compute_recency_frequency(records: &[RentalRecord]) -> Vec<MonthRecency> {
    let Some(anchor) = records.iter().map(|record| record.date).max() else {
        return Vec::new();
    };

    let mut by_month: BTreeMap<u8, (NaiveDate, usize)> = BTreeMap::new();
    for record in records {
        let entry = by_month.entry(record.month).or_insert((record.date, 0));
        entry.0 = entry.0.max(record.date);
        entry.1 += 1;
    }

    by_month
        .into_iter()
        .map(|(month, (latest, frequency))| MonthRecency {
            month,
            recency: (anchor - latest).num_days(),
            frequency,
        })
        .collect()
}

pub fn filter_by_date_range(
    records: &[RentalRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<&RentalRecord>, DashboardError> {
    if start > end {
        return Err(DashboardError::InvalidRange { start, end });
    }
    Ok(records
        .iter()
        .filter(|record| record.date >= start && record.date <= end)
        .collect())
}

pub fn filter_by_hour_range(
    records: &[RentalRecord],
    start_hour: u8,
    end_hour: u8,
) -> Result<Vec<&RentalRecord>, DashboardError> {
    if start_hour > end_hour || end_hour > LAST_HOUR {
        return Err(DashboardError::InvalidHourRange {
            start: start_hour,
            end: end_hour,
        });
    }
    Ok(records
        .iter()
        .filter(|record| record.hour >= start_hour && record.hour <= end_hour)
        .collect())
}

/// Mean `hourly_count` per hour of day, ascending by hour.
pub fn hourly_pattern<'a, I>(records: I) -> Vec<HourlyPoint>
where
    I: IntoIterator<Item = &'a RentalRecord>,
{
    let mut by_hour: BTreeMap<u8, (u64, u64)> = BTreeMap::new();
    for record in records {
        let entry = by_hour.entry(record.hour).or_default();
        entry.0 += u64::from(record.hourly_count);
        entry.1 += 1;
    }

    by_hour
        .into_iter()
        .map(|(hour, (sum, rows))| HourlyPoint {
            hour,
            avg_hourly_count: sum as f64 / rows as f64,
        })
        .collect()
}

pub fn rf_averages(rf: &[MonthRecency]) -> RfAverages {
    if rf.is_empty() {
        return RfAverages {
            avg_recency: 0.0,
            avg_frequency: 0.0,
        };
    }

    let months = rf.len() as f64;
    let recency: i64 = rf.iter().map(|row| row.recency).sum();
    let frequency: usize = rf.iter().map(|row| row.frequency).sum();

    RfAverages {
        avg_recency: round_to(recency as f64 / months, 1),
        avg_frequency: round_to(frequency as f64 / months, 2),
    }
}

/// Most recently active months first.
pub fn top_by_recency(rf: &[MonthRecency], n: usize) -> Vec<MonthRecency> {
    let mut rows = rf.to_vec();
    rows.sort_by_key(|row| (row.recency, row.month));
    rows.truncate(n);
    rows
}

/// Busiest months first.
pub fn top_by_frequency(rf: &[MonthRecency], n: usize) -> Vec<MonthRecency> {
    let mut rows = rf.to_vec();
    rows.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.month.cmp(&b.month)));
    rows.truncate(n);
    rows
}

pub fn sort_by_customer_count(mut seasons: Vec<SeasonSummary>) -> Vec<SeasonSummary> {
    seasons.sort_by(|a, b| {
        b.customer_count
            .cmp(&a.customer_count)
            .then(a.season.cmp(&b.season))
    });
    seasons
}

/// Resolves the requested date range against the dataset bounds.
///
/// Returns `None` for an empty dataset. A reversed request is rejected before
/// clamping.
pub fn effective_date_range(
    dataset: &Dataset,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<(NaiveDate, NaiveDate)>, DashboardError> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
    }

    let (Some(min), Some(max)) = (dataset.min_date(), dataset.max_date()) else {
        return Ok(None);
    };
    let start = start.unwrap_or(min).clamp(min, max);
    let end = end.unwrap_or(max).clamp(min, max);
    Ok(Some((start, end)))
}

pub fn daily_orders_in(
    dataset: &Dataset,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(Option<(NaiveDate, NaiveDate)>, Vec<DailyOrders>), DashboardError> {
    let range = effective_date_range(dataset, start, end)?;
    let orders = match range {
        Some((start, end)) => compute_daily_orders(dataset.records(), start, end)?,
        None => Vec::new(),
    };
    Ok((range, orders))
}

pub fn seasons_in(
    dataset: &Dataset,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<SeasonSummary>, DashboardError> {
    let summary = match effective_date_range(dataset, start, end)? {
        Some((start, end)) => {
            compute_season_summary(filter_by_date_range(dataset.records(), start, end)?)
        }
        None => Vec::new(),
    };
    Ok(sort_by_customer_count(summary))
}

pub fn hourly_in(
    dataset: &Dataset,
    start_hour: Option<u8>,
    end_hour: Option<u8>,
) -> Result<(u8, u8, Vec<HourlyPoint>), DashboardError> {
    let start_hour = start_hour.unwrap_or(FIRST_HOUR);
    let end_hour = end_hour.unwrap_or(LAST_HOUR);
    let rows = filter_by_hour_range(dataset.records(), start_hour, end_hour)?;
    Ok((start_hour, end_hour, hourly_pattern(rows)))
}

/// Builds every view of one render from the snapshot and the widget values.
pub fn build_dashboard(
    dataset: &Dataset,
    params: &DashboardParams,
) -> Result<DashboardView, DashboardError> {
    let (range, daily_orders) = daily_orders_in(dataset, params.start, params.end)?;
    let seasons = seasons_in(dataset, params.start, params.end)?;
    let (start_hour, end_hour, hourly) = hourly_in(dataset, params.start_hour, params.end_hour)?;

    let recency_frequency = compute_recency_frequency(dataset.records());
    let total_orders = daily_orders
        .iter()
        .fold(0u64, |acc, day| acc.saturating_add(day.order_count));

    Ok(DashboardView {
        start: range.map(|(start, _)| start),
        end: range.map(|(_, end)| end),
        total_orders,
        daily_orders,
        seasons,
        rf_averages: rf_averages(&recency_frequency),
        top_recency: top_by_recency(&recency_frequency, RF_TOP_N),
        top_frequency: top_by_frequency(&recency_frequency, RF_TOP_N),
        recency_frequency,
        start_hour,
        end_hour,
        hourly,
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: NaiveDate, hour: u8, season: u8, daily: u32, hourly: u32) -> RentalRecord {
        RentalRecord {
            date,
            hour,
            season: Season::try_from(season).unwrap(),
            daily_count: daily,
            hourly_count: hourly,
            month: date.month() as u8,
        }
    }

    fn scenario() -> Vec<RentalRecord> {
        vec![
            record(date(2024, 1, 1), 0, 1, 10, 4),
            record(date(2024, 1, 1), 1, 1, 10, 6),
            record(date(2024, 1, 2), 0, 2, 5, 5),
        ]
    }

    fn year_sample() -> Vec<RentalRecord> {
        let mut rows = Vec::new();
        for (month, day, season, daily) in [
            (1, 3, 1, 100),
            (1, 20, 1, 120),
            (3, 15, 2, 300),
            (6, 1, 2, 300),
            (6, 30, 3, 450),
            (9, 9, 3, 500),
            (12, 31, 4, 80),
        ] {
            for hour in [7, 8, 17] {
                rows.push(record(date(2012, month, day), hour, season, daily, hour as u32));
            }
        }
        rows
    }

    #[test]
    fn daily_orders_reproduce_hourly_double_count() {
        let orders = compute_daily_orders(&scenario(), date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        assert_eq!(
            orders,
            vec![
                DailyOrders { date: date(2024, 1, 1), order_count: 20 },
                DailyOrders { date: date(2024, 1, 2), order_count: 5 },
            ]
        );
    }

    #[test]
    fn season_summary_counts_distinct_daily_values() {
        let summary = compute_season_summary(&scenario());
        let pairs: Vec<(u8, usize)> = summary
            .iter()
            .map(|row| (row.season.code(), row.customer_count))
            .collect();
        assert_eq!(pairs, vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn recency_frequency_counts_hourly_rows() {
        let rf = compute_recency_frequency(&scenario());
        assert_eq!(
            rf,
            vec![MonthRecency { month: 1, recency: 0, frequency: 3 }]
        );
    }

    #[test]
    fn daily_orders_are_strictly_ascending() {
        let mut rows = year_sample();
        rows.reverse();
        let orders = compute_daily_orders(&rows, date(2012, 1, 1), date(2012, 12, 31)).unwrap();
        assert_eq!(orders.len(), 7);
        assert!(orders.windows(2).all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn single_day_range_returns_that_day_only() {
        let rows = year_sample();
        let orders = compute_daily_orders(&rows, date(2012, 3, 15), date(2012, 3, 15)).unwrap();
        assert_eq!(
            orders,
            vec![DailyOrders { date: date(2012, 3, 15), order_count: 900 }]
        );

        let none = compute_daily_orders(&rows, date(2012, 3, 16), date(2012, 3, 16)).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = compute_daily_orders(&scenario(), date(2024, 1, 2), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRange { .. }));
    }

    #[test]
    fn empty_input_yields_empty_views() {
        let rows: Vec<RentalRecord> = Vec::new();
        assert!(compute_daily_orders(&rows, date(2024, 1, 1), date(2024, 1, 2)).unwrap().is_empty());
        assert!(compute_season_summary(&rows).is_empty());
        assert!(compute_recency_frequency(&rows).is_empty());
        assert!(hourly_pattern(&rows).is_empty());
    }

    #[test]
    fn season_summary_covers_exactly_input_seasons() {
        let rows = year_sample();
        let summary = compute_season_summary(&rows);
        let seasons: Vec<u8> = summary.iter().map(|row| row.season.code()).collect();
        assert_eq!(seasons, vec![1, 2, 3, 4]);
        // both season 2 dates share one daily_count
        let second = summary.iter().find(|row| row.season.code() == 2).unwrap();
        assert_eq!(second.customer_count, 1);

        let sorted = sort_by_customer_count(summary);
        assert_eq!(sorted[0].season.code(), 1);
        assert_eq!(sorted[0].customer_count, 2);
    }

    #[test]
    fn recency_is_measured_from_table_max_date() {
        let rf = compute_recency_frequency(&year_sample());
        assert_eq!(rf.len(), 5);
        assert!(rf.iter().all(|row| row.recency >= 0));

        let january = rf.iter().find(|row| row.month == 1).unwrap();
        assert_eq!(january.recency, (date(2012, 12, 31) - date(2012, 1, 20)).num_days());
        assert_eq!(january.frequency, 6);

        let december = rf.iter().find(|row| row.month == 12).unwrap();
        assert_eq!(december.recency, 0);
    }

    #[test]
    fn aggregations_are_idempotent() {
        let rows = year_sample();
        let start = date(2012, 1, 1);
        let end = date(2012, 12, 31);
        assert_eq!(
            compute_daily_orders(&rows, start, end).unwrap(),
            compute_daily_orders(&rows, start, end).unwrap()
        );
        assert_eq!(compute_season_summary(&rows), compute_season_summary(&rows));
        assert_eq!(compute_recency_frequency(&rows), compute_recency_frequency(&rows));
    }

    #[test]
    fn rankings_and_averages() {
        let rf = vec![
            MonthRecency { month: 1, recency: 30, frequency: 10 },
            MonthRecency { month: 2, recency: 0, frequency: 10 },
            MonthRecency { month: 3, recency: 15, frequency: 25 },
        ];
        let by_recency: Vec<u8> = top_by_recency(&rf, 2).iter().map(|row| row.month).collect();
        assert_eq!(by_recency, vec![2, 3]);
        let by_frequency: Vec<u8> = top_by_frequency(&rf, 12).iter().map(|row| row.month).collect();
        assert_eq!(by_frequency, vec![3, 1, 2]);

        let averages = rf_averages(&rf);
        assert_eq!(averages.avg_recency, 15.0);
        assert_eq!(averages.avg_frequency, 15.0);
        assert_eq!(rf_averages(&[]).avg_frequency, 0.0);
    }

    #[test]
    fn averages_round_halves_to_even() {
        // frequency sum 9 over 8 months is 1.125
        let rf: Vec<MonthRecency> = (1..=8)
            .map(|month| MonthRecency {
                month,
                recency: if month == 1 { 5 } else { 0 },
                frequency: if month == 1 { 2 } else { 1 },
            })
            .collect();
        let averages = rf_averages(&rf);
        assert_eq!(averages.avg_frequency, 1.12);
        // 5 / 8 = 0.625 rounds to 0.6
        assert_eq!(averages.avg_recency, 0.6);
    }

    #[test]
    fn hour_filter_and_pattern() {
        let rows = year_sample();
        let morning = filter_by_hour_range(&rows, 7, 8).unwrap();
        assert_eq!(morning.len(), 14);

        let pattern = hourly_pattern(morning);
        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern[0].hour, 7);
        assert_eq!(pattern[0].avg_hourly_count, 7.0);

        assert!(matches!(
            filter_by_hour_range(&rows, 9, 3),
            Err(DashboardError::InvalidHourRange { start: 9, end: 3 })
        ));
        assert!(filter_by_hour_range(&rows, 0, 24).is_err());
    }

    #[test]
    fn dashboard_clamps_dates_and_filters_seasons() {
        let dataset = Dataset::new(year_sample());
        let params = DashboardParams {
            start: Some(date(2011, 6, 1)),
            end: Some(date(2012, 3, 31)),
            start_hour: Some(17),
            end_hour: None,
        };
        let view = build_dashboard(&dataset, &params).unwrap();
        assert_eq!(view.start, Some(date(2012, 1, 3)));
        assert_eq!(view.end, Some(date(2012, 3, 31)));
        assert_eq!(view.daily_orders.len(), 3);
        assert_eq!(view.total_orders, 3 * (100 + 120 + 300));
        let seasons: Vec<u8> = view.seasons.iter().map(|row| row.season.code()).collect();
        assert_eq!(seasons, vec![1, 2]);

        // RF ignores the date selection
        assert_eq!(view.recency_frequency.len(), 5);
        assert_eq!(view.top_recency[0].month, 12);
        assert_eq!(view.hourly.len(), 1);
        assert_eq!((view.start_hour, view.end_hour), (17, 23));
    }

    #[test]
    fn dashboard_rejects_reversed_range_before_clamping() {
        let dataset = Dataset::new(year_sample());
        let params = DashboardParams {
            start: Some(date(2030, 1, 2)),
            end: Some(date(2030, 1, 1)),
            ..DashboardParams::default()
        };
        assert!(matches!(
            build_dashboard(&dataset, &params),
            Err(DashboardError::InvalidRange { .. })
        ));
    }

    #[test]
    fn dashboard_over_empty_dataset_is_empty() {
        let view = build_dashboard(&Dataset::default(), &DashboardParams::default()).unwrap();
        assert_eq!(view.start, None);
        assert!(view.daily_orders.is_empty());
        assert!(view.seasons.is_empty());
        assert!(view.recency_frequency.is_empty());
        assert!(view.hourly.is_empty());
        assert_eq!(view.total_orders, 0);
    }
}
