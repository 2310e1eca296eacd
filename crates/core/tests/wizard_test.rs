use chrono::{Duration, Utc};
use muster_core::wizard::{EventWizard, StepOutcome, WizardState};
use pretty_assertions::assert_eq;

#[test]
fn test_happy_path_produces_event() {
    let now = Utc::now();
    let mut wizard = EventWizard::new(1, 2, 3, now);
    assert_eq!(wizard.state(), WizardState::AwaitingTitle);

    assert!(matches!(
        wizard.advance("Operation Cobra", now),
        StepOutcome::Prompt(_)
    ));
    assert!(matches!(
        wizard.advance("Europe/London", now),
        StepOutcome::Prompt(_)
    ));
    assert!(matches!(
        wizard.advance("2025-07-20 19:00", now),
        StepOutcome::Prompt(_)
    ));
    assert!(matches!(
        wizard.advance("2025-07-20 21:00", now),
        StepOutcome::Prompt(_)
    ));
    assert!(matches!(
        wizard.advance("Weekly training op.", now),
        StepOutcome::Prompt(_)
    ));

    match wizard.advance("weekly", now) {
        StepOutcome::Finished(event) => {
            assert_eq!(event.title, "Operation Cobra");
            assert_eq!(event.timezone, "Europe/London");
            assert!(event.is_recurring);
            assert_eq!(event.recurrence_rule.as_deref(), Some("weekly"));
            // 19:00 BST is 18:00 UTC in July.
            assert_eq!(
                event.start_time,
                "2025-07-20T18:00:00Z".parse::<chrono::DateTime<Utc>>().unwrap()
            );
            assert!(event.end_time.is_some());
        }
        other => panic!("expected Finished, got {other:?}"),
    }
    assert_eq!(wizard.state(), WizardState::Complete);
}

#[test]
fn test_invalid_input_stays_on_same_state() {
    let now = Utc::now();
    let mut wizard = EventWizard::new(1, 2, 3, now);
    wizard.advance("Title", now);

    assert!(matches!(
        wizard.advance("Atlantis/Nowhere", now),
        StepOutcome::Invalid(_)
    ));
    assert_eq!(wizard.state(), WizardState::AwaitingTimezone);

    wizard.advance("UTC", now);
    assert!(matches!(
        wizard.advance("not a date", now),
        StepOutcome::Invalid(_)
    ));
    assert_eq!(wizard.state(), WizardState::AwaitingStart);
}

#[test]
fn test_end_must_follow_start() {
    let now = Utc::now();
    let mut wizard = EventWizard::new(1, 2, 3, now);
    wizard.advance("Title", now);
    wizard.advance("UTC", now);
    wizard.advance("2025-07-20 19:00", now);

    assert!(matches!(
        wizard.advance("2025-07-20 18:00", now),
        StepOutcome::Invalid(_)
    ));
    assert!(matches!(
        wizard.advance("skip", now),
        StepOutcome::Prompt(_)
    ));
    assert_eq!(wizard.state(), WizardState::AwaitingDescription);
}

#[test]
fn test_cancel_is_terminal_from_any_state() {
    let now = Utc::now();
    let mut wizard = EventWizard::new(1, 2, 3, now);
    wizard.advance("Title", now);
    assert!(matches!(wizard.advance("cancel", now), StepOutcome::Cancelled));
    assert_eq!(wizard.state(), WizardState::Cancelled);
}

#[test]
fn test_non_recurring_event() {
    let now = Utc::now();
    let mut wizard = EventWizard::new(1, 2, 3, now);
    wizard.advance("Title", now);
    wizard.advance("UTC", now);
    wizard.advance("2025-07-20 19:00", now);
    wizard.advance("skip", now);
    wizard.advance("A one-off.", now);

    match wizard.advance("none", now) {
        StepOutcome::Finished(event) => {
            assert!(!event.is_recurring);
            assert_eq!(event.recurrence_rule, None);
            assert_eq!(event.end_time, None);
        }
        other => panic!("expected Finished, got {other:?}"),
    }
}

#[test]
fn test_timeout_detection() {
    let now = Utc::now();
    let wizard = EventWizard::new(1, 2, 3, now);
    assert!(!wizard.is_expired(now + Duration::minutes(5)));
    assert!(wizard.is_expired(now + Duration::minutes(11)));
}
