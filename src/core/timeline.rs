use chrono::NaiveDate;

use super::inflation;
use super::month::{iter_months, month_label, month_span, month_start};
use super::types::{
    BaselinePolicy, BonusWindow, EmployerSwitch, InflationSeries, MonthlyTimeline, RecordKind,
    SalaryRecord,
};

/// Records sorted by `(effective_date, created_at)`. The sort is stable, so
/// among records sharing an effective date the most recently created one (or
/// the latest-supplied, when creation times are absent) sorts last and wins
/// resolution.
pub(crate) fn sorted_records(records: &[SalaryRecord]) -> Vec<&SalaryRecord> {
    let mut sorted: Vec<&SalaryRecord> = records.iter().collect();
    sorted.sort_by_key(|record| (record.effective_date, record.created_at));
    sorted
}

/// Contiguous month starts spanning the salary history: from the earliest
/// effective date to the latest end date, with future end dates clipped to
/// `today` and open-ended records running through `today`. Empty input yields
/// an empty range.
pub fn month_range(records: &[SalaryRecord], today: NaiveDate) -> Vec<NaiveDate> {
    let Some(start) = records.iter().map(|record| record.effective_date).min() else {
        return Vec::new();
    };
    let end = records
        .iter()
        .map(|record| record.end_date.map_or(today, |end| end.min(today)))
        .max()
        .unwrap_or(today)
        // A history that starts in the future still renders its first month.
        .max(start);
    iter_months(start, end)
}

/// For each month, the regular record in force: the latest effective record
/// whose start month is not after the month, unless its end date has already
/// passed. A month without coverage is a hole, not an error.
fn resolve_regulars<'a>(
    months: &[NaiveDate],
    regulars: &[&'a SalaryRecord],
) -> Vec<Option<&'a SalaryRecord>> {
    let mut active: Option<&SalaryRecord> = None;
    let mut cursor = 0;
    let mut resolved = Vec::with_capacity(months.len());
    for &month in months {
        while cursor < regulars.len() && month_start(regulars[cursor].effective_date) <= month {
            active = Some(regulars[cursor]);
            cursor += 1;
        }
        if let Some(record) = active {
            if record.end_date.is_some_and(|end| end < month) {
                active = None;
            }
        }
        resolved.push(active);
    }
    resolved
}

/// Evenly spread bonus contributions for one month. A bonus touches every
/// whole month of its window; partial months count in full.
fn monthly_bonus_total(month: NaiveDate, bonuses: &[&SalaryRecord]) -> f64 {
    let mut total = 0.0;
    for bonus in bonuses {
        let start = month_start(bonus.effective_date);
        let end = month_start(bonus.end_date.unwrap_or(bonus.effective_date));
        if start <= month && month <= end {
            total += bonus.amount / f64::from(month_span(start, end).max(1));
        }
    }
    total
}

/// Markers at every change of active employer, including transitions into a
/// coverage gap (null employer) and back out of one. The first covered month
/// always carries a marker.
fn detect_switches(
    months: &[NaiveDate],
    resolved: &[Option<&SalaryRecord>],
) -> Vec<EmployerSwitch> {
    let mut switches = Vec::new();
    let mut previous: Option<u64> = None;
    for (index, &month) in months.iter().enumerate() {
        let current = resolved[index].map(|record| record.employer_id);
        if index == 0 && current.is_none() {
            continue;
        }
        if index == 0 || current != previous {
            switches.push(EmployerSwitch {
                month: month_label(month),
                employer: resolved[index].map(|record| record.employer_name.clone()),
            });
        }
        previous = current;
    }
    switches
}

fn bonus_windows(bonuses: &[&SalaryRecord]) -> Vec<BonusWindow> {
    bonuses
        .iter()
        .map(|bonus| BonusWindow {
            start: bonus.effective_date,
            end: bonus.end_date.unwrap_or(bonus.effective_date),
            amount: bonus.amount,
            employer: bonus.employer_name.clone(),
        })
        .collect()
}

/// Assembles the dense monthly timeline: resolved base pay, amortized bonus
/// totals, employer switch markers, and (when a CPI series is supplied) the
/// inflation-adjusted expected-pay series.
pub fn build_timeline(
    records: &[SalaryRecord],
    policy: &BaselinePolicy,
    series: Option<&InflationSeries>,
    today: NaiveDate,
) -> MonthlyTimeline {
    let months = month_range(records, today);
    let sorted = sorted_records(records);
    let regulars: Vec<&SalaryRecord> = sorted
        .iter()
        .copied()
        .filter(|record| record.kind == RecordKind::Regular)
        .collect();
    let bonuses: Vec<&SalaryRecord> = sorted
        .iter()
        .copied()
        .filter(|record| record.kind == RecordKind::Bonus)
        .collect();

    let resolved = resolve_regulars(&months, &regulars);
    let base_series: Vec<Option<f64>> = resolved
        .iter()
        .map(|&record| record.map(|record| record.amount))
        .collect();
    let total_series: Vec<f64> = months
        .iter()
        .zip(&base_series)
        .map(|(&month, base)| base.unwrap_or(0.0) + monthly_bonus_total(month, &bonuses))
        .collect();
    let employer_ids: Vec<Option<u64>> = resolved
        .iter()
        .map(|&record| record.map(|record| record.employer_id))
        .collect();

    let employer_switches = detect_switches(&months, &resolved);
    let bonus_windows = bonus_windows(&bonuses);
    let labels: Vec<String> = months.iter().map(|&month| month_label(month)).collect();

    let (inflation_series, inflation_meta) =
        inflation::project_series(&months, &resolved, records, policy, series);

    MonthlyTimeline {
        labels,
        base_series,
        total_series,
        inflation_series,
        bonus_windows,
        employer_switches,
        inflation_meta,
        months,
        employer_ids,
    }
}
