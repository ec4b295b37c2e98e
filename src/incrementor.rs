use crate::strategy::{BuildContext, Strategy};
use chrono::{Datelike, NaiveDate, Timelike};

/// Computes a new value for one version field.
///
/// Implement this (together with [`Strategy`]) to provide a custom incrementor, then register it
/// through a [`StrategyProvider`](crate::StrategyProvider).
pub trait Incrementor: Strategy {
    /// Returns the new value of a field currently holding `value`.
    ///
    /// `value` is signed so that corrupt inputs can be clamped: implementations must treat
    /// negative values as 0. The result is never negative.
    fn increment(&self, value: i64, ctx: &BuildContext<'_>) -> u32;
}

/// The incrementors that ship with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInIncrementor {
    /// Keeps the value.
    None,
    /// Adds one.
    Increment,
    /// `HHMM` of the build time.
    TimeStamp,
    /// Four-digit build year.
    YearStamp,
    /// Months and days elapsed since the project start, as `months * 100 + days`.
    DeltaBaseDate,
    /// Two-digit build year followed by the zero-padded day of the year (`YYDDD`).
    YearDayOfYear,
    /// Years since the project start followed by the zero-padded day of the year.
    DeltaBaseYearDayOfYear,
    /// Years since the project start.
    DeltaBaseYear,
    /// Two-digit build year.
    YearDecadeStamp,
    /// Build month.
    MonthStamp,
    /// Build day of the month.
    DayStamp,
    /// Build month followed by the day of the month, without padding.
    MonthAndDayStamp,
}

impl BuiltInIncrementor {
    /// Every built-in incrementor.
    pub const ALL: [BuiltInIncrementor; 12] = [
        BuiltInIncrementor::None,
        BuiltInIncrementor::Increment,
        BuiltInIncrementor::TimeStamp,
        BuiltInIncrementor::YearStamp,
        BuiltInIncrementor::DeltaBaseDate,
        BuiltInIncrementor::YearDayOfYear,
        BuiltInIncrementor::DeltaBaseYearDayOfYear,
        BuiltInIncrementor::DeltaBaseYear,
        BuiltInIncrementor::YearDecadeStamp,
        BuiltInIncrementor::MonthStamp,
        BuiltInIncrementor::DayStamp,
        BuiltInIncrementor::MonthAndDayStamp,
    ];
}

impl Strategy for BuiltInIncrementor {
    fn name(&self) -> &str {
        match self {
            BuiltInIncrementor::None => "None",
            BuiltInIncrementor::Increment => "Increment",
            BuiltInIncrementor::TimeStamp => "TimeStamp",
            BuiltInIncrementor::YearStamp => "YearStamp",
            BuiltInIncrementor::DeltaBaseDate => "DeltaBaseDate",
            BuiltInIncrementor::YearDayOfYear => "YearDayOfYear",
            BuiltInIncrementor::DeltaBaseYearDayOfYear => "DeltaBaseYearDayOfYear",
            BuiltInIncrementor::DeltaBaseYear => "DeltaBaseYear",
            BuiltInIncrementor::YearDecadeStamp => "YearDecadeStamp",
            BuiltInIncrementor::MonthStamp => "MonthStamp",
            BuiltInIncrementor::DayStamp => "DayStamp",
            BuiltInIncrementor::MonthAndDayStamp => "MonthAndDayStamp",
        }
    }

    fn description(&self) -> &str {
        match self {
            BuiltInIncrementor::None => "No increment",
            BuiltInIncrementor::Increment => "Simple increment",
            BuiltInIncrementor::TimeStamp => "Time stamp (hh mm)",
            BuiltInIncrementor::YearStamp => "Year stamp (yyyy)",
            BuiltInIncrementor::DeltaBaseDate => {
                "Delta base date (y * 12 + month, dayOfMonth since start date)"
            }
            BuiltInIncrementor::YearDayOfYear => {
                "Year followed by the day of the year (yy, dayOfYear)"
            }
            BuiltInIncrementor::DeltaBaseYearDayOfYear => {
                "Delta base year including day of year (years since start date, dayOfYear)"
            }
            BuiltInIncrementor::DeltaBaseYear => "Delta base year (years since start date)",
            BuiltInIncrementor::YearDecadeStamp => "Year decade stamp (yy)",
            BuiltInIncrementor::MonthStamp => "Month stamp (mm)",
            BuiltInIncrementor::DayStamp => "Day stamp (dd)",
            BuiltInIncrementor::MonthAndDayStamp => "Month and Day stamp (mmdd)",
        }
    }
}

impl Incrementor for BuiltInIncrementor {
    fn increment(&self, value: i64, ctx: &BuildContext<'_>) -> u32 {
        let value = clamp(value.max(0));
        let build = ctx.build_start;
        let day_of_year = build.ordinal();
        let delta_years = i64::from(build.year()) - i64::from(ctx.project_start.year());

        match self {
            BuiltInIncrementor::None => value,
            BuiltInIncrementor::Increment => value.saturating_add(1),
            BuiltInIncrementor::TimeStamp => build.hour() * 100 + build.minute(),
            BuiltInIncrementor::YearStamp => clamp(build.year().into()),
            BuiltInIncrementor::DeltaBaseDate => {
                let span = DateSpan::between(build.date(), ctx.project_start.date());
                clamp(span.total_months() * 100 + i64::from(span.days))
            }
            BuiltInIncrementor::YearDayOfYear => year_decade(build.date()) * 1000 + day_of_year,
            BuiltInIncrementor::DeltaBaseYearDayOfYear => {
                clamp(delta_years * 1000 + i64::from(day_of_year))
            }
            BuiltInIncrementor::DeltaBaseYear => clamp(delta_years),
            BuiltInIncrementor::YearDecadeStamp => year_decade(build.date()),
            BuiltInIncrementor::MonthStamp => build.month(),
            BuiltInIncrementor::DayStamp => build.day(),
            BuiltInIncrementor::MonthAndDayStamp => {
                let day = build.day();
                let shift = if day < 10 { 10 } else { 100 };
                build.month() * shift + day
            }
        }
    }
}

/// Converts to a field value, saturating at both ends.
fn clamp(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// The last two digits of the year, as `yy` formatting would print them.
fn year_decade(date: NaiveDate) -> u32 {
    date.year().rem_euclid(100).unsigned_abs()
}

/// A calendar difference between two dates, expressed in whole years, months and days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateSpan {
    pub(crate) years: u32,
    pub(crate) months: u32,
    pub(crate) days: u32,
}

impl DateSpan {
    /// The span between two dates, regardless of their order.
    ///
    /// Days are borrowed from the month preceding the later date's month when the later
    /// day-of-month is smaller than the earlier one.
    pub(crate) fn between(a: NaiveDate, b: NaiveDate) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };

        let mut years = end.year() - start.year();
        let mut months = end.month() as i32 - start.month() as i32;
        let mut days = end.day() as i32 - start.day() as i32;

        if days < 0 {
            months -= 1;
            days += days_in_previous_month(end) as i32;
        }
        if months < 0 {
            years -= 1;
            months += 12;
        }

        DateSpan {
            years: years.unsigned_abs(),
            months: months.unsigned_abs(),
            days: days.unsigned_abs(),
        }
    }

    fn total_months(&self) -> i64 {
        i64::from(self.years) * 12 + i64::from(self.months)
    }
}

fn days_in_previous_month(date: NaiveDate) -> u32 {
    // the day before the first of `date`'s month is the last day of the previous month
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}
