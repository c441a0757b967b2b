//! Cron expression parsing and evaluation
//!
//! Provides utilities for parsing cron expressions and for finding the
//! nearest matching instant before or after a reference instant.
//!
//! Matching is performed on the wall-clock time of the reference instant's
//! timezone, at minute resolution. Every field must match (fields are AND-ed,
//! including day-of-month and day-of-week).

use std::collections::BTreeSet;
use std::fmt;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike,
};
use thiserror::Error;

/// Number of years searched in either direction before giving up.
pub const SEARCH_HORIZON_YEARS: i32 = 5;

const MONTH_NAMES: [&str; 12] =
    ["JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC"];
const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Error type for cron parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CronParseError {
    #[error("Invalid cron expression: {0}")]
    InvalidExpression(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Too many fields: expected 5 to 7, got {0}")]
    TooManyFields(usize),

    #[error("Too few fields: expected 5, got {0}")]
    TooFewFields(usize),

    #[error("Unknown macro: {0}")]
    UnknownMacro(String),
}

/// A parsed cron expression
///
/// Supports the standard format `minute hour day month weekday` with lists,
/// ranges, steps, month and weekday names, `L` (last day of month), `nL`
/// (last weekday `n` of month), `n#k` (k-th weekday `n` of month) and the
/// usual `@daily`-style macros.
///
/// A sixth field restricts the year. Seven fields put a seconds field in
/// front; evaluation is per minute, so it must allow second 0.
///
/// # Examples
///
/// ```
/// use timegate_common::time::cron::CronExpression;
///
/// // Every day at midnight
/// let cron = CronExpression::parse("0 0 * * *").unwrap();
///
/// // Weekdays at 22:45
/// let cron = CronExpression::parse("45 22 * * MON-FRI").unwrap();
///
/// // Last Friday of every month at 17:00
/// let cron = CronExpression::parse("0 17 * * 5L").unwrap();
///
/// // New Year's Day 2030 only
/// let cron = CronExpression::parse("0 0 1 1 * 2030").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression {
    source: String,
    minute: CronField,
    hour: CronField,
    day: DayOfMonth,
    month: CronField,
    weekday: DayOfWeek,
    year: CronField,
}

impl CronExpression {
    /// Parse a cron expression from a string
    pub fn parse(expr: &str) -> Result<Self, CronParseError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(CronParseError::InvalidExpression(expr.to_string()));
        }

        let expanded = if trimmed.starts_with('@') { expand_macro(trimmed)? } else { trimmed };
        let parts: Vec<&str> = expanded.split_whitespace().collect();

        let (fields, year) = match parts.as_slice() {
            [fields @ .., year] if parts.len() == 6 => (fields, Some(*year)),
            [seconds, fields @ .., year] if parts.len() == 7 => {
                if !CronField::parse(seconds, &SECOND)?.matches(0) {
                    return Err(CronParseError::InvalidField(format!(
                        "second field: '{seconds}' never fires at second 0"
                    )));
                }
                (fields, Some(*year))
            }
            fields if fields.len() == 5 => (fields, None),
            fields if fields.len() < 5 => return Err(CronParseError::TooFewFields(fields.len())),
            fields => return Err(CronParseError::TooManyFields(fields.len())),
        };

        Ok(Self {
            source: trimmed.split_whitespace().collect::<Vec<_>>().join(" "),
            minute: CronField::parse(fields[0], &MINUTE)?,
            hour: CronField::parse(fields[1], &HOUR)?,
            day: DayOfMonth::parse(fields[2])?,
            month: CronField::parse(fields[3], &MONTH)?,
            weekday: DayOfWeek::parse(fields[4])?,
            year: year.map_or(Ok(CronField::Any), |year| CronField::parse(year, &YEAR))?,
        })
    }

    /// Check whether `expr` parses, without keeping the result.
    pub fn is_valid(expr: &str) -> bool {
        Self::parse(expr).is_ok()
    }

    /// Check if a datetime matches this cron expression
    ///
    /// Seconds are ignored; any instant inside a matching minute matches.
    pub fn matches<Tz: TimeZone>(&self, dt: &DateTime<Tz>) -> bool {
        self.matches_local(&dt.naive_local())
    }

    /// Get the earliest matching instant after `dt`.
    ///
    /// With `inclusive`, `dt` itself is returned when it falls exactly on a
    /// matching minute. Returns `None` when nothing matches within
    /// [`SEARCH_HORIZON_YEARS`].
    ///
    /// Results are ordered by real time: inside a fall-back fold the second
    /// pass of an early wall-clock minute can come after the first pass of a
    /// later one.
    pub fn next_after<Tz: TimeZone>(
        &self,
        dt: &DateTime<Tz>,
        inclusive: bool,
    ) -> Option<DateTime<Tz>> {
        let tz = dt.timezone();
        let local = dt.naive_local();
        let limit = local.year().saturating_add(SEARCH_HORIZON_YEARS);
        // A reference inside a fold can be followed by second-pass instants of
        // earlier wall-clock minutes, so scan the fold from its first minute.
        let mut candidate = fold_edge(&tz, floor_to_minute(local)?, Duration::minutes(-1));

        while candidate.year() <= limit {
            let date = candidate.date();
            if !self.year.matches(year_value(date)) {
                candidate = NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)?.and_time(NaiveTime::MIN);
                continue;
            }
            if !self.month.matches(date.month()) {
                candidate = first_of_next_month(date)?.and_time(NaiveTime::MIN);
                continue;
            }
            if !self.matches_day(date) {
                candidate = date.succ_opt()?.and_time(NaiveTime::MIN);
                continue;
            }
            if !self.hour.matches(candidate.hour()) {
                candidate = floor_to_hour(candidate)?.checked_add_signed(Duration::hours(1))?;
                continue;
            }
            if self.minute.matches(candidate.minute()) {
                if let Some(found) = resolve_forward(&tz, &candidate, dt, inclusive) {
                    return Some(self.earliest_in_fold(&tz, candidate, found, dt, inclusive));
                }
            }
            candidate = candidate.checked_add_signed(Duration::minutes(1))?;
        }

        None
    }

    /// Get the latest matching instant before `dt`.
    ///
    /// With `inclusive`, any instant inside a matching minute resolves to the
    /// start of that minute (which is at or before `dt`). Returns `None` when
    /// nothing matches within [`SEARCH_HORIZON_YEARS`].
    pub fn prev_before<Tz: TimeZone>(
        &self,
        dt: &DateTime<Tz>,
        inclusive: bool,
    ) -> Option<DateTime<Tz>> {
        let tz = dt.timezone();
        let local = dt.naive_local();
        let limit = local.year().saturating_sub(SEARCH_HORIZON_YEARS);
        // Mirror of `next_after`: first-pass instants of later wall-clock
        // minutes can precede a second-pass reference.
        let mut candidate = fold_edge(&tz, floor_to_minute(local)?, Duration::minutes(1));

        while candidate.year() >= limit {
            let date = candidate.date();
            if !self.year.matches(year_value(date)) {
                candidate = NaiveDate::from_ymd_opt(date.year() - 1, 12, 31)?
                    .and_time(last_minute_of_day()?);
                continue;
            }
            if !self.month.matches(date.month()) {
                candidate = date.with_day(1)?.pred_opt()?.and_time(last_minute_of_day()?);
                continue;
            }
            if !self.matches_day(date) {
                candidate = date.pred_opt()?.and_time(last_minute_of_day()?);
                continue;
            }
            if !self.hour.matches(candidate.hour()) {
                candidate = floor_to_hour(candidate)?.checked_sub_signed(Duration::minutes(1))?;
                continue;
            }
            if self.minute.matches(candidate.minute()) {
                if let Some(found) = resolve_backward(&tz, &candidate, dt, inclusive) {
                    return Some(self.latest_in_fold(&tz, candidate, found, dt, inclusive));
                }
            }
            candidate = candidate.checked_sub_signed(Duration::minutes(1))?;
        }

        None
    }

    /// Finish scanning the fold `local` belongs to and keep the earliest
    /// admitted match. Minutes past the fold are later than anything in it.
    fn earliest_in_fold<Tz: TimeZone>(
        &self,
        tz: &Tz,
        mut local: NaiveDateTime,
        mut best: DateTime<Tz>,
        bound: &DateTime<Tz>,
        inclusive: bool,
    ) -> DateTime<Tz> {
        while is_repeated(tz, &local) {
            let Some(next) = local.checked_add_signed(Duration::minutes(1)) else { break };
            local = next;
            if !self.matches_local(&local) {
                continue;
            }
            if let Some(found) = resolve_forward(tz, &local, bound, inclusive) {
                if found < best {
                    best = found;
                }
            }
        }
        best
    }

    /// Backward counterpart of [`Self::earliest_in_fold`].
    fn latest_in_fold<Tz: TimeZone>(
        &self,
        tz: &Tz,
        mut local: NaiveDateTime,
        mut best: DateTime<Tz>,
        bound: &DateTime<Tz>,
        inclusive: bool,
    ) -> DateTime<Tz> {
        while is_repeated(tz, &local) {
            let Some(prev) = local.checked_sub_signed(Duration::minutes(1)) else { break };
            local = prev;
            if !self.matches_local(&local) {
                continue;
            }
            if let Some(found) = resolve_backward(tz, &local, bound, inclusive) {
                if found > best {
                    best = found;
                }
            }
        }
        best
    }

    fn matches_local(&self, local: &NaiveDateTime) -> bool {
        self.matches_date(local.date())
            && self.hour.matches(local.hour())
            && self.minute.matches(local.minute())
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        self.year.matches(year_value(date))
            && self.month.matches(date.month())
            && self.matches_day(date)
    }

    fn matches_day(&self, date: NaiveDate) -> bool {
        self.day.matches(date) && self.weekday.matches(date)
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for CronExpression {
    type Err = CronParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn expand_macro(expr: &str) -> Result<&'static str, CronParseError> {
    match expr.to_ascii_lowercase().as_str() {
        "@yearly" | "@annually" => Ok("0 0 1 1 *"),
        "@monthly" => Ok("0 0 1 * *"),
        "@weekly" => Ok("0 0 * * 0"),
        "@daily" | "@midnight" => Ok("0 0 * * *"),
        "@hourly" => Ok("0 * * * *"),
        "@30minutes" => Ok("0,30 * * * *"),
        "@15minutes" => Ok("*/15 * * * *"),
        "@10minutes" => Ok("*/10 * * * *"),
        "@5minutes" => Ok("*/5 * * * *"),
        "@always" | "@everyminute" => Ok("* * * * *"),
        _ => Err(CronParseError::UnknownMacro(expr.to_string())),
    }
}

/// Bounds and aliases for one cron field.
struct FieldSpec {
    name: &'static str,
    min: u32,
    max: u32,
    names: &'static [&'static str],
    names_start: u32,
}

const SECOND: FieldSpec = FieldSpec { name: "second", min: 0, max: 59, names: &[], names_start: 0 };
const MINUTE: FieldSpec = FieldSpec { name: "minute", min: 0, max: 59, names: &[], names_start: 0 };
const HOUR: FieldSpec = FieldSpec { name: "hour", min: 0, max: 23, names: &[], names_start: 0 };
const DAY: FieldSpec = FieldSpec { name: "day", min: 1, max: 31, names: &[], names_start: 0 };
const MONTH: FieldSpec =
    FieldSpec { name: "month", min: 1, max: 12, names: &MONTH_NAMES, names_start: 1 };
const YEAR: FieldSpec =
    FieldSpec { name: "year", min: 1970, max: 2099, names: &[], names_start: 0 };
// 7 is accepted as an alias for Sunday and folded to 0 after parsing.
const WEEKDAY: FieldSpec =
    FieldSpec { name: "weekday", min: 0, max: 7, names: &WEEKDAY_NAMES, names_start: 0 };

impl FieldSpec {
    fn value(&self, token: &str) -> Result<u32, CronParseError> {
        let upper = token.to_ascii_uppercase();
        let value = match self.names.iter().position(|name| *name == upper) {
            Some(index) => self.names_start + index as u32,
            None => token.parse().map_err(|_| {
                CronParseError::InvalidField(format!("{} field: '{}'", self.name, token))
            })?,
        };

        if value < self.min || value > self.max {
            return Err(CronParseError::InvalidRange(format!(
                "{} {} not in range {}-{}",
                self.name, value, self.min, self.max
            )));
        }
        Ok(value)
    }
}

/// A cron field (minute, hour, day, month, weekday)
#[derive(Debug, Clone, PartialEq, Eq)]
enum CronField {
    Any,
    Values(BTreeSet<u32>),
}

impl CronField {
    fn parse(s: &str, spec: &FieldSpec) -> Result<Self, CronParseError> {
        if s == "*" {
            return Ok(CronField::Any);
        }

        let mut values = BTreeSet::new();
        for part in s.split(',') {
            values.extend(parse_part(part, spec)?);
        }

        Ok(CronField::Values(values))
    }

    fn matches(&self, value: u32) -> bool {
        match self {
            CronField::Any => true,
            CronField::Values(values) => values.contains(&value),
        }
    }
}

/// Expand one comma-separated element (`a`, `a-b`, `*/s`, `a/s`, `a-b/s`).
fn parse_part(part: &str, spec: &FieldSpec) -> Result<Vec<u32>, CronParseError> {
    if part.is_empty() {
        return Err(CronParseError::InvalidField(format!("{} field: empty list element", spec.name)));
    }

    let (range, step) = match part.split_once('/') {
        Some((range, step)) => {
            let step: u32 = step.parse().map_err(|_| {
                CronParseError::InvalidField(format!("{} field: bad step in '{}'", spec.name, part))
            })?;
            if step == 0 {
                return Err(CronParseError::InvalidField(format!(
                    "{} field: step must be positive in '{}'",
                    spec.name, part
                )));
            }
            (range, Some(step))
        }
        None => (part, None),
    };

    let (start, end) = if range == "*" {
        (spec.min, spec.max)
    } else if let Some((start, end)) = range.split_once('-') {
        (spec.value(start)?, spec.value(end)?)
    } else {
        let value = spec.value(range)?;
        (value, if step.is_some() { spec.max } else { value })
    };

    if start > end {
        return Err(CronParseError::InvalidRange(format!(
            "{} {}-{} is reversed",
            spec.name, start, end
        )));
    }

    Ok((start..=end).step_by(step.unwrap_or(1) as usize).collect())
}

/// Day-of-month field with the optional `L` (last day) marker.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DayOfMonth {
    days: CronField,
    last: bool,
}

impl DayOfMonth {
    fn parse(s: &str) -> Result<Self, CronParseError> {
        if s == "*" || s == "?" {
            return Ok(Self { days: CronField::Any, last: false });
        }

        let mut last = false;
        let mut days = BTreeSet::new();
        for part in s.split(',') {
            if part.eq_ignore_ascii_case("L") {
                last = true;
            } else {
                days.extend(parse_part(part, &DAY)?);
            }
        }

        Ok(Self { days: CronField::Values(days), last })
    }

    fn matches(&self, date: NaiveDate) -> bool {
        self.days.matches(date.day()) || (self.last && date.day() == last_day_of_month(date))
    }
}

/// Day-of-week field with `nL` and `n#k` modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DayOfWeek {
    days: CronField,
    last: BTreeSet<u32>,
    nth: BTreeSet<(u32, u32)>,
}

impl DayOfWeek {
    fn parse(s: &str) -> Result<Self, CronParseError> {
        if s == "*" || s == "?" {
            return Ok(Self { days: CronField::Any, last: BTreeSet::new(), nth: BTreeSet::new() });
        }

        let mut days = BTreeSet::new();
        let mut last = BTreeSet::new();
        let mut nth = BTreeSet::new();
        for part in s.split(',') {
            if let Some((weekday, occurrence)) = part.split_once('#') {
                let occurrence: u32 = occurrence.parse().map_err(|_| {
                    CronParseError::InvalidField(format!("weekday field: bad '#' in '{part}'"))
                })?;
                if !(1..=5).contains(&occurrence) {
                    return Err(CronParseError::InvalidRange(format!(
                        "weekday occurrence {occurrence} not in range 1-5"
                    )));
                }
                nth.insert((WEEKDAY.value(weekday)? % 7, occurrence));
            } else if part.len() > 1 && (part.ends_with('L') || part.ends_with('l')) {
                last.insert(WEEKDAY.value(&part[..part.len() - 1])? % 7);
            } else {
                days.extend(parse_part(part, &WEEKDAY)?.into_iter().map(|day| day % 7));
            }
        }

        Ok(Self { days: CronField::Values(days), last, nth })
    }

    fn matches(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().num_days_from_sunday();
        self.days.matches(weekday)
            || (self.last.contains(&weekday) && date.day() + 7 > last_day_of_month(date))
            || self.nth.contains(&(weekday, (date.day() - 1) / 7 + 1))
    }
}

/// Year as a field value; years before the common era never match.
fn year_value(date: NaiveDate) -> u32 {
    u32::try_from(date.year()).unwrap_or(0)
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    first_of_next_month(date).and_then(|first| first.pred_opt()).map_or(31, |last| last.day())
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) =
        if date.month() == 12 { (date.year() + 1, 1) } else { (date.year(), date.month() + 1) };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn floor_to_minute(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    dt.date().and_hms_opt(dt.hour(), dt.minute(), 0)
}

fn floor_to_hour(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    dt.date().and_hms_opt(dt.hour(), 0, 0)
}

fn last_minute_of_day() -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(23, 59, 0)
}

/// Whether a wall-clock minute occurs twice (fall-back fold).
fn is_repeated<Tz: TimeZone>(tz: &Tz, local: &NaiveDateTime) -> bool {
    matches!(tz.from_local_datetime(local), LocalResult::Ambiguous(..))
}

/// Walk from `local` by `step` to the outermost repeated minute of its fold.
/// Minutes outside a fold are returned unchanged.
fn fold_edge<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime, step: Duration) -> NaiveDateTime {
    let mut edge = local;
    if !is_repeated(tz, &edge) {
        return edge;
    }
    while let Some(next) = edge.checked_add_signed(step).filter(|next| is_repeated(tz, next)) {
        edge = next;
    }
    edge
}

/// Map a matching wall-clock minute to the earliest instant satisfying the
/// lower bound. Minutes skipped by a DST gap resolve to nothing.
fn resolve_forward<Tz: TimeZone>(
    tz: &Tz,
    local: &NaiveDateTime,
    bound: &DateTime<Tz>,
    inclusive: bool,
) -> Option<DateTime<Tz>> {
    let admits = |candidate: &DateTime<Tz>| {
        if inclusive {
            candidate >= bound
        } else {
            candidate > bound
        }
    };

    match tz.from_local_datetime(local) {
        LocalResult::Single(candidate) => admits(&candidate).then_some(candidate),
        LocalResult::Ambiguous(first, second) => {
            let (early, late) = if first <= second { (first, second) } else { (second, first) };
            if admits(&early) {
                Some(early)
            } else if admits(&late) {
                Some(late)
            } else {
                None
            }
        }
        LocalResult::None => None,
    }
}

/// Map a matching wall-clock minute to the latest instant satisfying the
/// upper bound.
fn resolve_backward<Tz: TimeZone>(
    tz: &Tz,
    local: &NaiveDateTime,
    bound: &DateTime<Tz>,
    inclusive: bool,
) -> Option<DateTime<Tz>> {
    let admits = |candidate: &DateTime<Tz>| {
        if inclusive {
            candidate <= bound
        } else {
            candidate < bound
        }
    };

    match tz.from_local_datetime(local) {
        LocalResult::Single(candidate) => admits(&candidate).then_some(candidate),
        LocalResult::Ambiguous(first, second) => {
            let (early, late) = if first <= second { (first, second) } else { (second, first) };
            if admits(&late) {
                Some(late)
            } else if admits(&early) {
                Some(early)
            } else {
                None
            }
        }
        LocalResult::None => None,
    }
}
