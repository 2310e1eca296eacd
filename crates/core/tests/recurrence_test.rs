use chrono::{DateTime, Utc};
use muster_core::recurrence::{next_occurrence, RecurrenceRule};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid timestamp")
}

#[test]
fn test_daily_advances_one_day() {
    let basis = ts("2025-03-10T19:00:00Z");
    assert_eq!(
        next_occurrence(basis, "daily"),
        Some(ts("2025-03-11T19:00:00Z"))
    );
}

#[test]
fn test_weekly_advances_seven_days() {
    let basis = ts("2025-03-10T19:00:00Z");
    assert_eq!(
        next_occurrence(basis, "weekly"),
        Some(basis + chrono::Duration::days(7))
    );
}

#[rstest]
#[case("2025-01-31T18:00:00Z", "2025-02-28T18:00:00Z")] // clamps past Feb's end
#[case("2024-01-31T18:00:00Z", "2024-02-29T18:00:00Z")] // leap year keeps the 29th
#[case("2025-03-31T18:00:00Z", "2025-04-30T18:00:00Z")]
#[case("2025-04-15T18:00:00Z", "2025-05-15T18:00:00Z")]
fn test_monthly_calendar_arithmetic(#[case] basis: &str, #[case] expected: &str) {
    assert_eq!(next_occurrence(ts(basis), "monthly"), Some(ts(expected)));
}

#[test]
fn test_unknown_rule_yields_none() {
    let basis = ts("2025-03-10T19:00:00Z");
    assert_eq!(next_occurrence(basis, "fortnightly"), None);
    assert_eq!(next_occurrence(basis, ""), None);
}

#[test]
fn test_rule_parse_round_trip() {
    for rule in [
        RecurrenceRule::Daily,
        RecurrenceRule::Weekly,
        RecurrenceRule::Monthly,
    ] {
        assert_eq!(RecurrenceRule::parse(rule.as_str()), Some(rule));
    }
    assert_eq!(RecurrenceRule::parse("yearly"), None);
}
