mod gaps;
mod inflation;
mod month;
mod timeline;
mod types;

pub use gaps::build_gap_report;
pub use inflation::{build_employer_summaries, build_future_targets};
pub use month::{iter_months, month_label, month_span, month_start};
pub use timeline::{build_timeline, month_range};
pub use types::{
    BaselinePolicy, BonusWindow, EmployerSummary, EmployerSwitch, FutureTargets, GapRange,
    GapReport, InflationMeta, InflationPoint, InflationSeries, MonthlyTimeline, ProjectionIssue,
    RecordKind, SalaryRecord, SalaryTarget, SummaryStatus, TargetKind,
};
