use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::month::month_start;
use super::types::{GapRange, GapReport, InflationSeries};

/// Compares the required month range against the periods present in a CPI
/// series and reports the months the series is missing. Pure set difference
/// over the ordered month axis; contiguous misses are additionally grouped
/// into ranges for display.
pub fn build_gap_report(required_range: &[NaiveDate], series: &InflationSeries) -> GapReport {
    let present: BTreeSet<NaiveDate> = series
        .points
        .iter()
        .map(|point| month_start(point.period))
        .collect();

    let missing_periods: Vec<NaiveDate> = required_range
        .iter()
        .copied()
        .filter(|period| !present.contains(period))
        .collect();

    let mut missing_ranges: Vec<GapRange> = Vec::new();
    let mut open: Option<GapRange> = None;
    for &period in required_range {
        if present.contains(&period) {
            if let Some(range) = open.take() {
                missing_ranges.push(range);
            }
        } else {
            match &mut open {
                Some(range) => range.end = period,
                None => {
                    open = Some(GapRange {
                        start: period,
                        end: period,
                    });
                }
            }
        }
    }
    if let Some(range) = open {
        missing_ranges.push(range);
    }

    let expected_months = required_range.len() as u32;
    let missing_months = missing_periods.len() as u32;
    let covered_any = required_range.iter().any(|period| present.contains(period));

    GapReport {
        source: series.source.clone(),
        start_period: required_range.first().copied(),
        end_period: required_range.last().copied(),
        expected_months,
        missing_months,
        missing_periods,
        missing_ranges,
        is_complete: expected_months > 0 && missing_months == 0 && covered_any,
    }
}
