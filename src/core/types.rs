use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    Regular,
    Bonus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    pub id: u64,
    pub employer_id: u64,
    pub employer_name: String,
    pub kind: RecordKind,
    pub effective_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationPoint {
    pub period: NaiveDate,
    pub index_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationSeries {
    pub source: String,
    pub points: Vec<InflationPoint>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BaselinePolicy {
    WholeHistory,
    PerEmployer,
    LastIncrease,
    Manual { record_id: Option<u64> },
}

impl BaselinePolicy {
    pub fn mode_token(&self) -> &'static str {
        match self {
            BaselinePolicy::WholeHistory => "whole-history",
            BaselinePolicy::PerEmployer => "per-employer",
            BaselinePolicy::LastIncrease => "last-increase",
            BaselinePolicy::Manual { .. } => "manual",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionIssue {
    MissingTimeline,
    NoSourceSelected,
    NoInflationData,
    NoRegularSalary,
    MissingBaselineIndex,
    MissingSeriesData,
    ManualBaselineUnset,
    ManualBaselineInvalid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationMeta {
    pub ready: bool,
    pub source: Option<String>,
    pub reason: Option<ProjectionIssue>,
    pub base_label: Option<String>,
    pub base_salary: Option<f64>,
    pub mode: &'static str,
    pub manual_record_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub amount: f64,
    pub employer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerSwitch {
    pub month: String,
    pub employer: Option<String>,
}

/// Dense monthly view of a salary history. The serialized field set is the
/// wire contract consumed by the chart frontend; `months` and `employer_ids`
/// stay internal so summaries can be derived without re-resolving records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTimeline {
    pub labels: Vec<String>,
    pub base_series: Vec<Option<f64>>,
    pub total_series: Vec<f64>,
    pub inflation_series: Vec<Option<f64>>,
    pub bonus_windows: Vec<BonusWindow>,
    pub employer_switches: Vec<EmployerSwitch>,
    pub inflation_meta: InflationMeta,
    #[serde(skip)]
    pub months: Vec<NaiveDate>,
    #[serde(skip)]
    pub employer_ids: Vec<Option<u64>>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    Gain,
    Loss,
    Even,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerSummary {
    pub employer_id: u64,
    pub employer_name: String,
    pub actual_total: f64,
    pub inflation_adjusted_target: Option<f64>,
    pub delta: Option<f64>,
    pub status: SummaryStatus,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub source: String,
    pub start_period: Option<NaiveDate>,
    pub end_period: Option<NaiveDate>,
    pub expected_months: u32,
    pub missing_months: u32,
    pub missing_periods: Vec<NaiveDate>,
    pub missing_ranges: Vec<GapRange>,
    pub is_complete: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    LastRaise,
    EmployerStart,
    ManualBaseline,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryTarget {
    pub kind: TargetKind,
    pub base_period: NaiveDate,
    pub base_amount: f64,
    pub target_salary: Option<f64>,
    pub delta_amount: Option<f64>,
    pub reason: Option<ProjectionIssue>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureTargets {
    pub latest_period: Option<NaiveDate>,
    pub current_salary: Option<f64>,
    pub reason: Option<ProjectionIssue>,
    pub targets: Vec<SalaryTarget>,
}
