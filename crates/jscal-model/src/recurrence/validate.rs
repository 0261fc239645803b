//! Cross-field rules of a recurrence rule.

use super::{Frequency, NDay};
use crate::error::RecurrenceConstraint;

/// The by-lists whose validity depends on the frequency.
pub(crate) struct Constrained<'a> {
    pub frequency: Frequency,
    pub by_day: &'a [NDay],
    pub by_month_day: &'a [i8],
    pub by_year_day: &'a [i16],
    pub by_week_no: &'a [i8],
}

/// ## Summary
/// Checks the frequency-dependent rules in a fixed order and reports the
/// first one broken. The `count`/`until` exclusion holds by construction
/// and is checked where both can appear together (the wire form).
///
/// ## Errors
/// Returns the broken constraint.
pub(crate) fn check(rule: &Constrained<'_>) -> Result<(), RecurrenceConstraint> {
    use Frequency::{Daily, Monthly, Weekly, Yearly};

    let qualified_day = rule.by_day.iter().any(NDay::is_qualified);

    if !rule.by_week_no.is_empty() && rule.frequency != Yearly {
        return Err(RecurrenceConstraint::ByWeekNoRequiresYearly);
    }
    if qualified_day && !matches!(rule.frequency, Monthly | Yearly) {
        return Err(RecurrenceConstraint::NthDayRequiresMonthlyOrYearly);
    }
    if qualified_day && rule.frequency == Yearly && !rule.by_week_no.is_empty() {
        return Err(RecurrenceConstraint::NthDayWithByWeekNo);
    }
    if !rule.by_month_day.is_empty() && rule.frequency == Weekly {
        return Err(RecurrenceConstraint::ByMonthDayWithWeekly);
    }
    if !rule.by_year_day.is_empty() && matches!(rule.frequency, Daily | Weekly | Monthly) {
        return Err(RecurrenceConstraint::ByYearDayWithFrequency);
    }
    Ok(())
}
