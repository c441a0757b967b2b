use chrono::{Datelike, Days, NaiveTime, TimeZone, Weekday};
use timegate_core::RecurrenceEvaluator;
use timegate_domain::{EvaluationError, Instant, SearchDirection};

/// Rule that passes validation but always fails to evaluate.
pub const UNEVALUABLE: &str = "unevaluable";

/// How many days either side of the reference are searched.
const HORIZON_DAYS: u64 = 14;

/// Evaluator for phrase rules of the form `<days> at HH:MM`.
///
/// `<days>` is one of `daily`, `weekdays`, `weekends`, or a plural weekday
/// name such as `sundays`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhraseEvaluator;

#[derive(Debug, Clone, Copy)]
enum DaySet {
    Daily,
    Weekdays,
    Weekends,
    Only(Weekday),
}

impl DaySet {
    fn includes(self, weekday: Weekday) -> bool {
        match self {
            DaySet::Daily => true,
            DaySet::Weekdays => !matches!(weekday, Weekday::Sat | Weekday::Sun),
            DaySet::Weekends => matches!(weekday, Weekday::Sat | Weekday::Sun),
            DaySet::Only(day) => day == weekday,
        }
    }
}

fn parse(rule: &str) -> Option<(DaySet, NaiveTime)> {
    let (days, time) = rule.split_once(" at ")?;
    let days = match days {
        "daily" => DaySet::Daily,
        "weekdays" => DaySet::Weekdays,
        "weekends" => DaySet::Weekends,
        plural => DaySet::Only(plural.strip_suffix('s')?.parse().ok()?),
    };
    Some((days, NaiveTime::parse_from_str(time, "%H:%M").ok()?))
}

impl PhraseEvaluator {
    fn candidates(
        rule: &str,
        reference: &Instant,
        direction: SearchDirection,
    ) -> Result<Vec<Instant>, EvaluationError> {
        let (days, time) = parse(rule).ok_or_else(|| EvaluationError::InvalidRule {
            rule: rule.to_string(),
            reason: "not a phrase rule".to_string(),
        })?;

        let tz = reference.timezone();
        let today = reference.date_naive();
        let dates = (0..=HORIZON_DAYS).filter_map(|offset| match direction {
            SearchDirection::Previous => today.checked_sub_days(Days::new(offset)),
            SearchDirection::Next => today.checked_add_days(Days::new(offset)),
        });

        Ok(dates
            .filter(|date| days.includes(date.weekday()))
            .filter_map(|date| tz.from_local_datetime(&date.and_time(time)).earliest())
            .collect())
    }

    fn no_match(rule: &str, direction: SearchDirection) -> EvaluationError {
        EvaluationError::NoMatch { rule: rule.to_string(), direction, horizon_years: 0 }
    }
}

impl RecurrenceEvaluator for PhraseEvaluator {
    fn validate(&self, rule: &str) -> bool {
        rule == UNEVALUABLE || parse(rule).is_some()
    }

    fn previous_match_at_or_before(
        &self,
        rule: &str,
        reference: &Instant,
        inclusive: bool,
    ) -> Result<Instant, EvaluationError> {
        Self::candidates(rule, reference, SearchDirection::Previous)?
            .into_iter()
            .find(|t| if inclusive { t <= reference } else { t < reference })
            .ok_or_else(|| Self::no_match(rule, SearchDirection::Previous))
    }

    fn next_match_after(
        &self,
        rule: &str,
        reference: &Instant,
        inclusive: bool,
    ) -> Result<Instant, EvaluationError> {
        Self::candidates(rule, reference, SearchDirection::Next)?
            .into_iter()
            .find(|t| if inclusive { t >= reference } else { t > reference })
            .ok_or_else(|| Self::no_match(rule, SearchDirection::Next))
    }
}
