use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::month::{month_label, month_start};
use super::timeline::sorted_records;
use super::types::{
    BaselinePolicy, EmployerSummary, FutureTargets, InflationMeta, InflationSeries, MonthlyTimeline,
    ProjectionIssue, RecordKind, SalaryRecord, SalaryTarget, SummaryStatus, TargetKind,
};

/// Relative tolerance for calling an employer's compensation even with the
/// inflation-adjusted target.
const STATUS_TOLERANCE: f64 = 0.005;

/// Anchor for inflation projection: the month the projection is indexed from
/// and the salary amount in force at that month.
type Anchor = (NaiveDate, f64);

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn rate_map(series: &InflationSeries) -> BTreeMap<NaiveDate, f64> {
    series
        .points
        .iter()
        .map(|point| (month_start(point.period), point.index_value))
        .collect()
}

/// Nearest index value at or before `month`. Documented fallback for months
/// the CPI series skips; never a silent zero-fill.
fn index_at_or_before(rates: &BTreeMap<NaiveDate, f64>, month: NaiveDate) -> Option<f64> {
    rates.range(..=month).next_back().map(|(_, &value)| value)
}

/// Resolves the per-month anchor spans for a baseline policy. The second
/// element is the single anchor for modes that have one (whole-history and
/// manual), used to surface a base label and salary in the meta block.
fn resolve_anchors(
    months: &[NaiveDate],
    resolved: &[Option<&SalaryRecord>],
    records: &[SalaryRecord],
    policy: &BaselinePolicy,
) -> Result<(Vec<Option<Anchor>>, Option<Anchor>), ProjectionIssue> {
    match policy {
        BaselinePolicy::WholeHistory => {
            let first = months
                .iter()
                .zip(resolved)
                .find_map(|(&month, &record)| {
                    record
                        .filter(|record| record.amount > 0.0)
                        .map(|record| (month, record.amount))
                })
                .ok_or(ProjectionIssue::NoRegularSalary)?;
            let anchors = months
                .iter()
                .map(|&month| (month >= first.0).then_some(first))
                .collect();
            Ok((anchors, Some(first)))
        }
        BaselinePolicy::PerEmployer => {
            let mut firsts: BTreeMap<u64, Anchor> = BTreeMap::new();
            for (&month, &record) in months.iter().zip(resolved) {
                if let Some(record) = record.filter(|record| record.amount > 0.0) {
                    firsts
                        .entry(record.employer_id)
                        .or_insert((month, record.amount));
                }
            }
            if firsts.is_empty() {
                return Err(ProjectionIssue::NoRegularSalary);
            }
            let anchors = resolved
                .iter()
                .map(|&record| {
                    record.and_then(|record| firsts.get(&record.employer_id).copied())
                })
                .collect();
            Ok((anchors, None))
        }
        BaselinePolicy::LastIncrease => {
            if resolved.iter().all(Option::is_none) {
                return Err(ProjectionIssue::NoRegularSalary);
            }
            let anchors = resolved
                .iter()
                .map(|&record| {
                    record.map(|record| (month_start(record.effective_date), record.amount))
                })
                .collect();
            Ok((anchors, None))
        }
        BaselinePolicy::Manual { record_id } => {
            let record_id = record_id.ok_or(ProjectionIssue::ManualBaselineUnset)?;
            let record = records
                .iter()
                .find(|record| record.id == record_id)
                .ok_or(ProjectionIssue::ManualBaselineInvalid)?;
            // A selection that is not a regular record counts as no usable
            // selection at all.
            if record.kind != RecordKind::Regular {
                return Err(ProjectionIssue::ManualBaselineUnset);
            }
            let anchor_month = month_start(record.effective_date);
            // The selection must still be covered by the timeline: the
            // resolved base at its month is what gets projected, so a
            // superseded amount never leaks in.
            let position = months
                .iter()
                .position(|&month| month == anchor_month)
                .ok_or(ProjectionIssue::ManualBaselineInvalid)?;
            let amount = resolved[position]
                .map(|active| active.amount)
                .filter(|amount| *amount > 0.0)
                .ok_or(ProjectionIssue::ManualBaselineInvalid)?;
            let anchor = (anchor_month, amount);
            let anchors = months
                .iter()
                .map(|&month| (month >= anchor_month).then_some(anchor))
                .collect();
            Ok((anchors, Some(anchor)))
        }
    }
}

/// Computes the inflation-adjusted expected-pay series for a timeline, along
/// with the meta block describing why (or how) the projection resolved.
///
/// Sparse data degrades to nulls: a month with no anchor, no index at the
/// anchor month, or no index at or before the month itself projects to null
/// without failing the rest of the series.
pub(crate) fn project_series(
    months: &[NaiveDate],
    resolved: &[Option<&SalaryRecord>],
    records: &[SalaryRecord],
    policy: &BaselinePolicy,
    series: Option<&InflationSeries>,
) -> (Vec<Option<f64>>, InflationMeta) {
    let mut meta = InflationMeta {
        ready: false,
        source: series.map(|series| series.source.clone()),
        reason: None,
        base_label: None,
        base_salary: None,
        mode: policy.mode_token(),
        manual_record_id: match policy {
            BaselinePolicy::Manual { record_id } => *record_id,
            _ => None,
        },
    };

    if months.is_empty() {
        meta.reason = Some(ProjectionIssue::MissingTimeline);
        return (Vec::new(), meta);
    }
    let nulls = vec![None; months.len()];
    let Some(series) = series else {
        meta.reason = Some(ProjectionIssue::NoSourceSelected);
        return (nulls, meta);
    };
    let rates = rate_map(series);
    if rates.is_empty() {
        meta.reason = Some(ProjectionIssue::NoInflationData);
        return (nulls, meta);
    }

    let (anchors, single) = match resolve_anchors(months, resolved, records, policy) {
        Ok(resolved_anchors) => resolved_anchors,
        Err(reason) => {
            meta.reason = Some(reason);
            return (nulls, meta);
        }
    };

    if let Some((anchor_month, anchor_amount)) = single {
        if !rates.contains_key(&anchor_month) {
            meta.reason = Some(ProjectionIssue::MissingBaselineIndex);
            return (nulls, meta);
        }
        meta.base_label = Some(month_label(anchor_month));
        meta.base_salary = Some(anchor_amount);
    }

    let values: Vec<Option<f64>> = months
        .iter()
        .zip(&anchors)
        .map(|(&month, anchor)| {
            let (anchor_month, anchor_amount) = (*anchor)?;
            let base_index = *rates.get(&anchor_month)?;
            let month_index = index_at_or_before(&rates, month)?;
            Some(round_cents(anchor_amount * month_index / base_index))
        })
        .collect();

    if values.iter().any(Option::is_some) {
        meta.ready = true;
    } else {
        meta.reason = Some(ProjectionIssue::MissingSeriesData);
    }
    (values, meta)
}

/// Per-employer gain/loss summary versus the inflation-adjusted target,
/// ordered by employer name. One employer's missing CPI coverage marks only
/// that employer unknown.
pub fn build_employer_summaries(
    timeline: &MonthlyTimeline,
    records: &[SalaryRecord],
) -> Vec<EmployerSummary> {
    let mut employers: Vec<(u64, &str)> = Vec::new();
    for record in records {
        if !employers.iter().any(|(id, _)| *id == record.employer_id) {
            employers.push((record.employer_id, record.employer_name.as_str()));
        }
    }
    employers.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)));

    employers
        .into_iter()
        .map(|(employer_id, employer_name)| {
            let month_indexes: Vec<usize> = timeline
                .employer_ids
                .iter()
                .enumerate()
                .filter(|(_, id)| **id == Some(employer_id))
                .map(|(index, _)| index)
                .collect();

            let actual_total = round_cents(
                month_indexes
                    .iter()
                    .map(|&index| timeline.total_series[index])
                    .sum(),
            );
            let projected: Option<f64> = month_indexes
                .iter()
                .map(|&index| timeline.inflation_series[index])
                .sum::<Option<f64>>();

            let (target, delta, status) = match projected {
                Some(target) if !month_indexes.is_empty() => {
                    let target = round_cents(target);
                    let delta = round_cents(actual_total - target);
                    let status = if actual_total > target * (1.0 + STATUS_TOLERANCE) {
                        SummaryStatus::Gain
                    } else if actual_total < target * (1.0 - STATUS_TOLERANCE) {
                        SummaryStatus::Loss
                    } else {
                        SummaryStatus::Even
                    };
                    (Some(target), Some(delta), status)
                }
                _ => (None, None, SummaryStatus::Unknown),
            };

            EmployerSummary {
                employer_id,
                employer_name: employer_name.to_string(),
                actual_total,
                inflation_adjusted_target: target,
                delta,
                status,
            }
        })
        .collect()
}

/// Projects selected anchors forward to the latest available CPI period and
/// compares each with the current salary: what the pay would need to be today
/// to have kept pace since the anchor.
pub fn build_future_targets(
    records: &[SalaryRecord],
    series: Option<&InflationSeries>,
    manual_record_id: Option<u64>,
) -> FutureTargets {
    let empty = |reason| FutureTargets {
        latest_period: None,
        current_salary: None,
        reason: Some(reason),
        targets: Vec::new(),
    };

    let sorted = sorted_records(records);
    let regulars: Vec<&SalaryRecord> = sorted
        .into_iter()
        .filter(|record| record.kind == RecordKind::Regular)
        .collect();
    let Some(&current) = regulars.last() else {
        return empty(ProjectionIssue::NoRegularSalary);
    };
    let Some(series) = series else {
        return empty(ProjectionIssue::NoSourceSelected);
    };
    let rates = rate_map(series);
    let Some((&latest_period, &latest_index)) = rates.iter().next_back() else {
        return empty(ProjectionIssue::NoInflationData);
    };

    let make = |kind, anchor: &SalaryRecord| {
        let base_period = month_start(anchor.effective_date);
        match rates.get(&base_period) {
            Some(&base_index) => {
                let target_salary = round_cents(anchor.amount * latest_index / base_index);
                SalaryTarget {
                    kind,
                    base_period,
                    base_amount: anchor.amount,
                    target_salary: Some(target_salary),
                    delta_amount: Some(round_cents(target_salary - current.amount)),
                    reason: None,
                }
            }
            None => SalaryTarget {
                kind,
                base_period,
                base_amount: anchor.amount,
                target_salary: None,
                delta_amount: None,
                reason: Some(ProjectionIssue::MissingBaselineIndex),
            },
        }
    };

    let mut targets = vec![make(TargetKind::LastRaise, current)];
    if let Some(employer_first) = regulars
        .iter()
        .find(|record| record.employer_id == current.employer_id)
    {
        targets.push(make(TargetKind::EmployerStart, employer_first));
    }
    if let Some(manual) = manual_record_id.and_then(|id| {
        records
            .iter()
            .find(|record| record.id == id && record.kind == RecordKind::Regular)
    }) {
        targets.push(make(TargetKind::ManualBaseline, manual));
    }

    FutureTargets {
        latest_period: Some(latest_period),
        current_salary: Some(current.amount),
        reason: None,
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::super::timeline::build_timeline;
    use super::*;
    use crate::core::types::InflationPoint;

    const EPS: f64 = 1e-9;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn record(
        id: u64,
        employer_id: u64,
        employer_name: &str,
        kind: RecordKind,
        effective: NaiveDate,
        end: Option<NaiveDate>,
        amount: f64,
    ) -> SalaryRecord {
        SalaryRecord {
            id,
            employer_id,
            employer_name: employer_name.to_string(),
            kind,
            effective_date: effective,
            end_date: end,
            amount,
            notes: String::new(),
            created_at: None,
        }
    }

    fn series(points: &[(i32, u32, f64)]) -> InflationSeries {
        InflationSeries {
            source: "ECB Germany".to_string(),
            points: points
                .iter()
                .map(|&(y, m, value)| InflationPoint {
                    period: day(y, m, 1),
                    index_value: value,
                })
                .collect(),
        }
    }

    #[test]
    fn whole_history_projection_scales_from_first_salary_month() {
        // Index 100 -> 110 lifts a 3000 anchor to 3300.
        let records = vec![record(
            1,
            1,
            "Globex",
            RecordKind::Regular,
            day(2023, 1, 1),
            None,
            3000.0,
        )];
        let cpi = series(&[(2023, 1, 100.0), (2024, 1, 110.0)]);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::WholeHistory,
            Some(&cpi),
            day(2024, 1, 15),
        );

        let jan_24 = timeline.labels.iter().position(|l| l == "Jan 2024").unwrap();
        assert_eq!(timeline.inflation_series[jan_24], Some(3300.0));
        // Months the series skips fall back to the nearest earlier index.
        let jun_23 = timeline.labels.iter().position(|l| l == "Jun 2023").unwrap();
        assert_eq!(timeline.inflation_series[jun_23], Some(3000.0));
        assert!(timeline.inflation_meta.ready);
        assert_eq!(timeline.inflation_meta.base_salary, Some(3000.0));
        assert_eq!(timeline.inflation_meta.base_label.as_deref(), Some("Jan 2023"));
    }

    #[test]
    fn missing_anchor_index_nullifies_whole_history_series() {
        let records = vec![record(
            1,
            1,
            "Globex",
            RecordKind::Regular,
            day(2023, 1, 1),
            None,
            3000.0,
        )];
        let cpi = series(&[(2023, 6, 104.0)]);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::WholeHistory,
            Some(&cpi),
            day(2023, 12, 1),
        );

        assert!(timeline.inflation_series.iter().all(Option::is_none));
        assert_eq!(
            timeline.inflation_meta.reason,
            Some(ProjectionIssue::MissingBaselineIndex)
        );
        assert!(!timeline.inflation_meta.ready);
    }

    #[test]
    fn skipped_months_fall_back_to_nearest_earlier_index() {
        let records = vec![record(
            1,
            1,
            "Globex",
            RecordKind::Regular,
            day(2023, 3, 1),
            None,
            2000.0,
        )];
        // Anchor month covered, nothing before it is needed; series then
        // continues so later months resolve via the fallback.
        let cpi = series(&[(2023, 3, 100.0), (2023, 5, 102.0)]);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::WholeHistory,
            Some(&cpi),
            day(2023, 6, 15),
        );
        assert_eq!(
            timeline.inflation_series,
            vec![Some(2000.0), Some(2000.0), Some(2040.0), Some(2040.0)]
        );
    }

    #[test]
    fn last_increase_mode_resets_anchor_at_every_pay_change() {
        let records = vec![
            record(
                1,
                1,
                "Globex",
                RecordKind::Regular,
                day(2023, 1, 1),
                None,
                800.0,
            ),
            record(
                2,
                1,
                "Globex",
                RecordKind::Regular,
                day(2023, 7, 1),
                None,
                1400.0,
            ),
        ];
        let points: Vec<(i32, u32, f64)> =
            (1..=12).map(|m| (2023, m, 100.0 + f64::from(m))).collect();
        let cpi = series(&points);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::LastIncrease,
            Some(&cpi),
            day(2023, 12, 15),
        );

        // Each raise month projects exactly its own amount.
        assert_eq!(timeline.inflation_series[0], Some(800.0));
        let jul = timeline.labels.iter().position(|l| l == "Jul 2023").unwrap();
        assert_eq!(timeline.inflation_series[jul], Some(1400.0));
        // Multi-anchor modes carry no single base in the meta block.
        assert_eq!(timeline.inflation_meta.base_salary, None);
        assert_eq!(timeline.inflation_meta.base_label, None);
        assert!(timeline.inflation_meta.ready);
    }

    #[test]
    fn manual_mode_anchors_uniformly_and_skips_prehistory() {
        let records = vec![
            record(
                1,
                1,
                "Globex",
                RecordKind::Regular,
                day(2024, 1, 1),
                Some(day(2024, 2, 29)),
                1250.0,
            ),
            record(
                2,
                1,
                "Globex",
                RecordKind::Regular,
                day(2024, 3, 1),
                None,
                1500.0,
            ),
        ];
        let points: Vec<(i32, u32, f64)> =
            (1..=6).map(|m| (2024, m, 100.0 + f64::from(m))).collect();
        let cpi = series(&points);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::Manual {
                record_id: Some(2),
            },
            Some(&cpi),
            day(2024, 6, 15),
        );

        assert_eq!(timeline.inflation_series[0], None);
        assert_eq!(timeline.inflation_series[1], None);
        let mar = timeline.labels.iter().position(|l| l == "Mar 2024").unwrap();
        assert_eq!(timeline.inflation_series[mar], Some(1500.0));
        assert_eq!(timeline.inflation_meta.manual_record_id, Some(2));
        assert_eq!(timeline.inflation_meta.base_label.as_deref(), Some("Mar 2024"));
    }

    #[test]
    fn manual_mode_without_selection_reports_unset() {
        let records = vec![record(
            1,
            1,
            "Globex",
            RecordKind::Regular,
            day(2024, 1, 1),
            None,
            1000.0,
        )];
        let cpi = series(&[(2024, 1, 100.0)]);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::Manual { record_id: None },
            Some(&cpi),
            day(2024, 3, 1),
        );
        assert_eq!(
            timeline.inflation_meta.reason,
            Some(ProjectionIssue::ManualBaselineUnset)
        );
        assert!(timeline.inflation_series.iter().all(Option::is_none));
    }

    #[test]
    fn manual_mode_with_bonus_selection_reports_unset() {
        let records = vec![
            record(
                1,
                1,
                "Globex",
                RecordKind::Regular,
                day(2024, 1, 1),
                None,
                1000.0,
            ),
            record(
                2,
                1,
                "Globex",
                RecordKind::Bonus,
                day(2024, 2, 1),
                Some(day(2024, 3, 31)),
                600.0,
            ),
        ];
        let cpi = series(&[(2024, 1, 100.0)]);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::Manual {
                record_id: Some(2),
            },
            Some(&cpi),
            day(2024, 4, 1),
        );
        assert_eq!(
            timeline.inflation_meta.reason,
            Some(ProjectionIssue::ManualBaselineUnset)
        );
        assert!(timeline.inflation_series.iter().all(Option::is_none));
    }

    #[test]
    fn manual_mode_with_unknown_selection_reports_invalid() {
        let records = vec![record(
            1,
            1,
            "Globex",
            RecordKind::Regular,
            day(2024, 1, 1),
            None,
            1000.0,
        )];
        let cpi = series(&[(2024, 1, 100.0)]);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::Manual {
                record_id: Some(99),
            },
            Some(&cpi),
            day(2024, 3, 1),
        );
        assert_eq!(
            timeline.inflation_meta.reason,
            Some(ProjectionIssue::ManualBaselineInvalid)
        );
    }

    #[test]
    fn no_source_marks_series_null_but_keeps_length() {
        let records = vec![record(
            1,
            1,
            "Globex",
            RecordKind::Regular,
            day(2024, 1, 1),
            None,
            1000.0,
        )];
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::WholeHistory,
            None,
            day(2024, 3, 15),
        );
        assert_eq!(timeline.inflation_series.len(), timeline.labels.len());
        assert!(timeline.inflation_series.iter().all(Option::is_none));
        assert_eq!(
            timeline.inflation_meta.reason,
            Some(ProjectionIssue::NoSourceSelected)
        );
    }

    #[test]
    fn per_employer_anchors_are_independent() {
        // Two employers, separate anchors, no cross-contamination.
        let records = vec![
            record(
                1,
                1,
                "Globex",
                RecordKind::Regular,
                day(2023, 1, 1),
                Some(day(2023, 6, 30)),
                3000.0,
            ),
            record(
                2,
                2,
                "Initech",
                RecordKind::Regular,
                day(2023, 7, 1),
                None,
                4000.0,
            ),
        ];
        let points: Vec<(i32, u32, f64)> = (1..=12).map(|m| (2023, m, 100.0)).collect();
        let cpi = series(&points);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::PerEmployer,
            Some(&cpi),
            day(2023, 12, 15),
        );

        assert!(
            timeline
                .inflation_series
                .iter()
                .take(6)
                .all(|v| *v == Some(3000.0))
        );
        assert!(
            timeline
                .inflation_series
                .iter()
                .skip(6)
                .all(|v| *v == Some(4000.0))
        );

        let summaries = build_employer_summaries(&timeline, &records);
        assert_eq!(summaries.len(), 2);
        let globex = summaries.iter().find(|s| s.employer_name == "Globex").unwrap();
        let initech = summaries
            .iter()
            .find(|s| s.employer_name == "Initech")
            .unwrap();
        assert!((globex.actual_total - 18_000.0).abs() < EPS);
        assert!((initech.actual_total - 24_000.0).abs() < EPS);
        assert_eq!(globex.status, SummaryStatus::Even);
        assert_eq!(initech.status, SummaryStatus::Even);
    }

    #[test]
    fn summary_flags_gain_and_loss_against_inflation_target() {
        let records = vec![
            record(
                1,
                1,
                "Globex",
                RecordKind::Regular,
                day(2023, 1, 1),
                Some(day(2023, 2, 28)),
                1000.0,
            ),
            record(
                2,
                2,
                "Initech",
                RecordKind::Regular,
                day(2023, 3, 1),
                Some(day(2023, 4, 30)),
                1000.0,
            ),
        ];
        // Flat pay under rising prices: both employers lose ground except the
        // one whose span predates the increases.
        let cpi = series(&[
            (2023, 1, 100.0),
            (2023, 2, 100.0),
            (2023, 3, 100.0),
            (2023, 4, 110.0),
        ]);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::PerEmployer,
            Some(&cpi),
            day(2023, 5, 15),
        );
        let summaries = build_employer_summaries(&timeline, &records);

        let globex = summaries.iter().find(|s| s.employer_name == "Globex").unwrap();
        assert_eq!(globex.status, SummaryStatus::Even);
        let initech = summaries
            .iter()
            .find(|s| s.employer_name == "Initech")
            .unwrap();
        // Target is 1000 + 1100; actual is flat 2000.
        assert_eq!(initech.inflation_adjusted_target, Some(2100.0));
        assert_eq!(initech.status, SummaryStatus::Loss);
        assert_eq!(initech.delta, Some(-100.0));
    }

    #[test]
    fn missing_cpi_for_one_employer_leaves_others_intact() {
        let records = vec![
            record(
                1,
                1,
                "Globex",
                RecordKind::Regular,
                day(2023, 1, 1),
                Some(day(2023, 2, 28)),
                1000.0,
            ),
            record(
                2,
                2,
                "Initech",
                RecordKind::Regular,
                day(2023, 3, 1),
                Some(day(2023, 4, 30)),
                2000.0,
            ),
        ];
        // No index at Initech's anchor month: its span is null, Globex's is not.
        let cpi = series(&[(2023, 1, 100.0), (2023, 2, 101.0)]);
        let timeline = build_timeline(
            &records,
            &BaselinePolicy::PerEmployer,
            Some(&cpi),
            day(2023, 5, 15),
        );
        assert!(timeline.inflation_series[0].is_some());
        assert!(timeline.inflation_series[2].is_none());

        let summaries = build_employer_summaries(&timeline, &records);
        let globex = summaries.iter().find(|s| s.employer_name == "Globex").unwrap();
        let initech = summaries
            .iter()
            .find(|s| s.employer_name == "Initech")
            .unwrap();
        assert_ne!(globex.status, SummaryStatus::Unknown);
        assert_eq!(initech.status, SummaryStatus::Unknown);
        assert_eq!(initech.inflation_adjusted_target, None);
        assert!((initech.actual_total - 4000.0).abs() < EPS);
    }

    #[test]
    fn future_targets_project_anchors_to_latest_period() {
        let records = vec![
            record(
                1,
                1,
                "Future Co",
                RecordKind::Regular,
                day(2023, 1, 1),
                None,
                1000.0,
            ),
            record(
                2,
                1,
                "Future Co",
                RecordKind::Regular,
                day(2024, 1, 1),
                None,
                1500.0,
            ),
        ];
        let cpi = series(&[(2023, 1, 100.0), (2024, 1, 108.0), (2024, 3, 110.0)]);

        let targets = build_future_targets(&records, Some(&cpi), None);
        assert_eq!(targets.latest_period, Some(day(2024, 3, 1)));
        assert_eq!(targets.current_salary, Some(1500.0));
        assert!(targets.reason.is_none());

        let by_kind = |kind| {
            targets
                .targets
                .iter()
                .find(|t| t.kind == kind)
                .expect("target present")
        };
        let last_raise = by_kind(TargetKind::LastRaise);
        // 1500 * 110 / 108
        assert_eq!(last_raise.target_salary, Some(1527.78));
        assert_eq!(last_raise.delta_amount, Some(27.78));
        let employer_start = by_kind(TargetKind::EmployerStart);
        // 1000 * 110 / 100, compared against the current 1500 salary.
        assert_eq!(employer_start.target_salary, Some(1100.0));
        assert_eq!(employer_start.delta_amount, Some(-400.0));
    }

    #[test]
    fn future_targets_include_manual_baseline_when_selected() {
        let records = vec![
            record(
                1,
                1,
                "Future Co",
                RecordKind::Regular,
                day(2023, 1, 1),
                None,
                1000.0,
            ),
            record(
                2,
                1,
                "Future Co",
                RecordKind::Regular,
                day(2024, 1, 1),
                None,
                1500.0,
            ),
        ];
        let cpi = series(&[(2023, 1, 100.0), (2024, 1, 108.0), (2024, 3, 110.0)]);

        let targets = build_future_targets(&records, Some(&cpi), Some(1));
        assert!(
            targets
                .targets
                .iter()
                .any(|t| t.kind == TargetKind::ManualBaseline && t.reason.is_none())
        );
    }

    #[test]
    fn future_targets_without_source_report_reason() {
        let records = vec![record(
            1,
            1,
            "Future Co",
            RecordKind::Regular,
            day(2023, 1, 1),
            None,
            1000.0,
        )];
        let targets = build_future_targets(&records, None, None);
        assert!(targets.targets.is_empty());
        assert_eq!(targets.reason, Some(ProjectionIssue::NoSourceSelected));
        assert_eq!(targets.latest_period, None);
    }

    #[test]
    fn future_target_with_uncovered_anchor_carries_reason() {
        let records = vec![
            record(
                1,
                1,
                "Future Co",
                RecordKind::Regular,
                day(2022, 6, 1),
                None,
                900.0,
            ),
            record(
                2,
                1,
                "Future Co",
                RecordKind::Regular,
                day(2024, 1, 1),
                None,
                1500.0,
            ),
        ];
        // Series starts after the employer-start anchor month.
        let cpi = series(&[(2024, 1, 108.0), (2024, 3, 110.0)]);

        let targets = build_future_targets(&records, Some(&cpi), None);
        let employer_start = targets
            .targets
            .iter()
            .find(|t| t.kind == TargetKind::EmployerStart)
            .unwrap();
        assert_eq!(
            employer_start.reason,
            Some(ProjectionIssue::MissingBaselineIndex)
        );
        assert_eq!(employer_start.target_salary, None);
    }
}
