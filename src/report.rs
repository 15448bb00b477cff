use crate::clean::CleanedRecord;
use crate::config::Config;
use anyhow::{Context, Result};
use chrono::Datelike;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Sum of `value` per calendar year, keeping only years strictly below
/// `cutoff`. The last year of a live series is incomplete and would plot
/// misleadingly low next to the full ones.
pub fn yearly_totals(records: &[CleanedRecord], cutoff: i32) -> Vec<(i32, f64)> {
    let mut sums: BTreeMap<i32, f64> = BTreeMap::new();
    for record in records {
        *sums.entry(record.date.year()).or_insert(0.0) += record.value;
    }
    sums.into_iter().filter(|(year, _)| *year < cutoff).collect()
}

/// Sum of `value` per month number, 1 through 12, across all years.
/// Same-numbered months of different years fold together; this mirrors
/// the original analysis and shows seasonal shape, not growth.
pub fn monthly_totals(records: &[CleanedRecord]) -> Vec<(u32, f64)> {
    let mut sums: BTreeMap<u32, f64> = BTreeMap::new();
    for record in records {
        *sums.entry(record.date.month()).or_insert(0.0) += record.value;
    }
    sums.into_iter().collect()
}

/// Render all three charts under the configured output directory, after
/// the read-back verification in `main` has produced `records`.
pub fn render_all(records: &[CleanedRecord], config: &Config) -> Result<()> {
    if records.is_empty() {
        warn!("no records to plot");
        return Ok(());
    }
    fs::create_dir_all(&config.charts_dir)
        .with_context(|| format!("creating charts dir {:?}", config.charts_dir))?;

    let series_path = config.charts_dir.join("revenue_series.png");
    render_series(records, &series_path)?;
    info!(path = %series_path.display(), "wrote series chart");

    let yearly = yearly_totals(records, config.cutoff_year);
    if yearly.is_empty() {
        warn!(
            cutoff = config.cutoff_year,
            "no complete years below cutoff; skipping yearly chart"
        );
    } else {
        let yearly_path = config.charts_dir.join("revenue_yearly.png");
        render_yearly(&yearly, &yearly_path)?;
        info!(path = %yearly_path.display(), "wrote yearly chart");
    }

    let monthly = monthly_totals(records);
    let monthly_path = config.charts_dir.join("revenue_monthly.png");
    render_monthly(&monthly, &monthly_path)?;
    info!(path = %monthly_path.display(), "wrote monthly chart");

    Ok(())
}

/// Full time series, one point per record.
pub fn render_series(records: &[CleanedRecord], path: &Path) -> Result<()> {
    let mut points: Vec<_> = records.iter().map(|r| (r.date, r.value)).collect();
    points.sort_by_key(|(date, _)| *date);

    let min_date = points.first().map(|(d, _)| *d).context("no records")?;
    let max_date = points.last().map(|(d, _)| *d).context("no records")?;
    let y_max = y_ceiling(points.iter().map(|(_, v)| *v));

    let root = BitMapBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Quarterly revenue ($B)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min_date..max_date, 0.0..y_max)?;
    chart.configure_mesh().x_labels(8).draw()?;
    chart.draw_series(LineSeries::new(points, &BLUE))?;
    root.present()?;
    Ok(())
}

/// Revenue summed per year, complete years only.
pub fn render_yearly(totals: &[(i32, f64)], path: &Path) -> Result<()> {
    let min_year = totals.iter().map(|(y, _)| *y).min().context("no years")?;
    let max_year = totals.iter().map(|(y, _)| *y).max().context("no years")?;
    let y_max = y_ceiling(totals.iter().map(|(_, v)| *v));

    let root = BitMapBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Yearly revenue ($B)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((min_year..max_year + 1).into_segmented(), 0.0..y_max)?;
    chart.configure_mesh().draw()?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.filled())
            .margin(4)
            .data(totals.iter().copied()),
    )?;
    root.present()?;
    Ok(())
}

/// Revenue summed per month number across all years.
pub fn render_monthly(totals: &[(u32, f64)], path: &Path) -> Result<()> {
    let y_max = y_ceiling(totals.iter().map(|(_, v)| *v));

    let root = BitMapBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Revenue by month, all years ($B)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((1u32..13u32).into_segmented(), 0.0..y_max)?;
    chart.configure_mesh().draw()?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.filled())
            .margin(4)
            .data(totals.iter().copied()),
    )?;
    root.present()?;
    Ok(())
}

fn y_ceiling(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, d: u32, value: f64) -> CleanedRecord {
        CleanedRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            value,
        }
    }

    #[test]
    fn yearly_sums_and_applies_cutoff() {
        let records = vec![
            record(2021, 1, 1, 1.0),
            record(2021, 7, 1, 2.0),
            record(2022, 1, 1, 5.0),
            record(2023, 1, 1, 9.0), // incomplete year, cut
        ];
        let totals = yearly_totals(&records, 2023);
        assert_eq!(totals, vec![(2021, 3.0), (2022, 5.0)]);
    }

    #[test]
    fn yearly_cutoff_can_empty_the_output() {
        let records = vec![record(2024, 1, 1, 1.0)];
        assert!(yearly_totals(&records, 2023).is_empty());
    }

    #[test]
    fn monthly_folds_years_together() {
        let records = vec![record(2021, 1, 1, 1.0), record(2022, 1, 1, 2.0)];
        assert_eq!(monthly_totals(&records), vec![(1, 3.0)]);
    }

    #[test]
    fn monthly_keeps_months_sorted() {
        let records = vec![
            record(2021, 9, 30, 1.0),
            record(2021, 3, 31, 2.0),
            record(2021, 6, 30, 4.0),
        ];
        let totals = monthly_totals(&records);
        assert_eq!(totals, vec![(3, 2.0), (6, 4.0), (9, 1.0)]);
    }
}
