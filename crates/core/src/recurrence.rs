use chrono::{DateTime, Duration, Months, Utc};

/// Repeat rules understood by the recurrence pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceRule {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceRule {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(RecurrenceRule::Daily),
            "weekly" => Some(RecurrenceRule::Weekly),
            "monthly" => Some(RecurrenceRule::Monthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceRule::Daily => "daily",
            RecurrenceRule::Weekly => "weekly",
            RecurrenceRule::Monthly => "monthly",
        }
    }
}

/// Computes the next occurrence start from a basis timestamp and a rule
/// string. Unknown rules yield `None`; the caller skips advancement.
///
/// The basis must be the most recent concrete occurrence's own start time,
/// never the original parent's, so manual reschedules carry forward and
/// drift does not accumulate. Monthly advancement uses calendar-month
/// arithmetic: Jan 31 + 1 month clamps to the last day of February.
pub fn next_occurrence(basis: DateTime<Utc>, rule: &str) -> Option<DateTime<Utc>> {
    match RecurrenceRule::parse(rule)? {
        RecurrenceRule::Daily => Some(basis + Duration::days(1)),
        RecurrenceRule::Weekly => Some(basis + Duration::days(7)),
        RecurrenceRule::Monthly => basis.checked_add_months(Months::new(1)),
    }
}
