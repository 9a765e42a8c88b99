use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::domain::models::recurrence::{
    RecurrencePattern, RecurrenceRule, Termination, MAX_OCCURRENCES,
};
use crate::error::AppError;

/// Result of expanding a rule: the ordered occurrence dates plus a flag
/// telling the caller whether the safety cap shortened the series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub dates: Vec<NaiveDate>,
    pub truncated: bool,
}

/// Expands a recurrence rule into a bounded, ordered sequence of dates.
/// Pure and deterministic: the same rule and anchor always produce the same
/// sequence, so the preview and the authoritative booking path share it.
pub fn expand(rule: &RecurrenceRule, anchor: NaiveDate) -> Result<Expansion, AppError> {
    rule.validate(anchor)?;

    let interval = rule.interval;
    match rule.pattern {
        RecurrencePattern::Daily => {
            let candidates = std::iter::successors(Some(anchor), move |d| {
                d.checked_add_signed(Duration::days(interval as i64))
            });
            Ok(bounded(candidates, &rule.termination))
        }
        RecurrencePattern::Weekly => {
            Ok(bounded(weekly_candidates(rule, anchor), &rule.termination))
        }
        RecurrencePattern::Monthly => {
            let candidates = (0u32..).map_while(move |k| {
                // chrono clamps to the last day of a shorter target month,
                // and computing from the anchor each time keeps the original
                // day-of-month (Jan 31 -> Feb 28 -> Mar 31, not Mar 28).
                let months = k.checked_mul(interval)?;
                anchor.checked_add_months(Months::new(months))
            });
            Ok(bounded(candidates, &rule.termination))
        }
    }
}

/// Weekly expansion walks day-by-day from the anchor and emits dates whose
/// weekday is in the rule's set and whose Monday-based week offset from the
/// anchor's week is a multiple of `interval`.
///
/// Note: the per-week skip for `interval > 1` is the documented default
/// pending product confirmation; some clients historically booked every
/// qualifying week regardless of the interval.
fn weekly_candidates(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    let wanted: Vec<chrono::Weekday> = rule.days_of_week.iter().map(|d| d.to_chrono()).collect();
    let interval = rule.interval as i64;
    let anchor_week_start =
        anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64);

    std::iter::successors(Some(anchor), |d| d.checked_add_signed(Duration::days(1)))
        .filter(move |d| {
            if !wanted.contains(&d.weekday()) {
                return false;
            }
            let weeks = (*d - anchor_week_start).num_days() / 7;
            weeks % interval == 0
        })
}

/// Applies the termination bound and the hard safety cap to an increasing
/// candidate stream.
fn bounded(
    candidates: impl Iterator<Item = NaiveDate>,
    termination: &Termination,
) -> Expansion {
    match *termination {
        Termination::Count { max_occurrences } => {
            let requested = max_occurrences as usize;
            let cap = requested.min(MAX_OCCURRENCES);
            Expansion {
                dates: candidates.take(cap).collect(),
                truncated: requested > MAX_OCCURRENCES,
            }
        }
        Termination::Date { end_date } => {
            let mut dates = Vec::new();
            let mut truncated = false;
            for d in candidates {
                if d > end_date {
                    break;
                }
                if dates.len() == MAX_OCCURRENCES {
                    truncated = true;
                    break;
                }
                dates.push(d);
            }
            Expansion { dates, truncated }
        }
    }
}
