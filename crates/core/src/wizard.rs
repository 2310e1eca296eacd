//! Conversational event-creation flow, modelled as an explicit finite-state
//! machine rather than scattered callbacks: one state per awaited field,
//! transitions only on valid input, with cancel and timeout as terminal
//! states. The Discord layer feeds user messages in and relays the prompts
//! back out; this module owns all validation.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::event::NewEvent;
use crate::recurrence::RecurrenceRule;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Lead window applied to recurring events created through the wizard.
pub const DEFAULT_RECREATION_HOURS: i64 = 168;

/// How long a wizard may sit idle before the driver discards it.
pub const WIZARD_TIMEOUT_MINUTES: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    AwaitingTitle,
    AwaitingTimezone,
    AwaitingStart,
    AwaitingEnd,
    AwaitingDescription,
    AwaitingRecurrence,
    Complete,
    Cancelled,
}

/// What the driver should do after feeding one input to the wizard.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// Input accepted; show this prompt for the next field.
    Prompt(String),
    /// Input rejected; show the problem and re-prompt the same field.
    Invalid(String),
    /// All fields collected; create the event.
    Finished(Box<NewEvent>),
    /// The user cancelled; discard the wizard.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct EventWizard {
    pub guild_id: i64,
    pub channel_id: i64,
    pub user_id: i64,
    state: WizardState,
    last_input_at: DateTime<Utc>,
    title: Option<String>,
    timezone: Option<Tz>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    description: Option<String>,
}

impl EventWizard {
    pub fn new(guild_id: i64, channel_id: i64, user_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            guild_id,
            channel_id,
            user_id,
            state: WizardState::AwaitingTitle,
            last_input_at: now,
            title: None,
            timezone: None,
            start_time: None,
            end_time: None,
            description: None,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.last_input_at > Duration::minutes(WIZARD_TIMEOUT_MINUTES)
    }

    /// The prompt for the field the wizard is currently waiting on.
    pub fn prompt(&self) -> String {
        match self.state {
            WizardState::AwaitingTitle => {
                "What is the event title? (type `cancel` at any point to stop)".to_string()
            }
            WizardState::AwaitingTimezone => {
                "Which timezone is the event scheduled in? (e.g. `Europe/London`, `UTC`)"
                    .to_string()
            }
            WizardState::AwaitingStart => format!(
                "When does the event start? Use `{}` in the event timezone.",
                "YYYY-MM-DD HH:MM"
            ),
            WizardState::AwaitingEnd => {
                "When does the event end? Same format, or `skip` for no end time.".to_string()
            }
            WizardState::AwaitingDescription => "Describe the event.".to_string(),
            WizardState::AwaitingRecurrence => {
                "Does the event repeat? Reply `none`, `daily`, `weekly` or `monthly`.".to_string()
            }
            WizardState::Complete | WizardState::Cancelled => String::new(),
        }
    }

    /// Feeds one line of user input into the machine.
    pub fn advance(&mut self, input: &str, now: DateTime<Utc>) -> StepOutcome {
        let input = input.trim();
        self.last_input_at = now;

        if input.eq_ignore_ascii_case("cancel") {
            self.state = WizardState::Cancelled;
            return StepOutcome::Cancelled;
        }

        match self.state {
            WizardState::AwaitingTitle => {
                if input.is_empty() || input.len() > 100 {
                    return StepOutcome::Invalid(
                        "The title must be between 1 and 100 characters.".to_string(),
                    );
                }
                self.title = Some(input.to_string());
                self.state = WizardState::AwaitingTimezone;
                StepOutcome::Prompt(self.prompt())
            }
            WizardState::AwaitingTimezone => match input.parse::<Tz>() {
                Ok(tz) => {
                    self.timezone = Some(tz);
                    self.state = WizardState::AwaitingStart;
                    StepOutcome::Prompt(self.prompt())
                }
                Err(_) => StepOutcome::Invalid(format!("`{input}` is not a known timezone.")),
            },
            WizardState::AwaitingStart => match self.parse_local(input) {
                Some(start) => {
                    self.start_time = Some(start);
                    self.state = WizardState::AwaitingEnd;
                    StepOutcome::Prompt(self.prompt())
                }
                None => StepOutcome::Invalid(
                    "Could not read that as `YYYY-MM-DD HH:MM`.".to_string(),
                ),
            },
            WizardState::AwaitingEnd => {
                if input.eq_ignore_ascii_case("skip") {
                    self.end_time = None;
                    self.state = WizardState::AwaitingDescription;
                    return StepOutcome::Prompt(self.prompt());
                }
                match self.parse_local(input) {
                    Some(end) => {
                        if let Some(start) = self.start_time {
                            if end <= start {
                                return StepOutcome::Invalid(
                                    "The end time must be after the start time.".to_string(),
                                );
                            }
                        }
                        self.end_time = Some(end);
                        self.state = WizardState::AwaitingDescription;
                        StepOutcome::Prompt(self.prompt())
                    }
                    None => StepOutcome::Invalid(
                        "Could not read that as `YYYY-MM-DD HH:MM`, and it wasn't `skip`."
                            .to_string(),
                    ),
                }
            }
            WizardState::AwaitingDescription => {
                if input.is_empty() {
                    return StepOutcome::Invalid("The description cannot be empty.".to_string());
                }
                self.description = Some(input.to_string());
                self.state = WizardState::AwaitingRecurrence;
                StepOutcome::Prompt(self.prompt())
            }
            WizardState::AwaitingRecurrence => {
                let rule = if input.eq_ignore_ascii_case("none") {
                    None
                } else {
                    match RecurrenceRule::parse(&input.to_lowercase()) {
                        Some(rule) => Some(rule),
                        None => {
                            return StepOutcome::Invalid(
                                "Reply `none`, `daily`, `weekly` or `monthly`.".to_string(),
                            )
                        }
                    }
                };
                self.state = WizardState::Complete;
                StepOutcome::Finished(Box::new(self.build_new_event(rule)))
            }
            WizardState::Complete | WizardState::Cancelled => StepOutcome::Cancelled,
        }
    }

    fn parse_local(&self, input: &str) -> Option<DateTime<Utc>> {
        let tz = self.timezone?;
        let naive = NaiveDateTime::parse_from_str(input, DATETIME_FORMAT).ok()?;
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn build_new_event(&self, rule: Option<RecurrenceRule>) -> NewEvent {
        NewEvent {
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            start_time: self.start_time.unwrap_or_else(Utc::now),
            end_time: self.end_time,
            timezone: self
                .timezone
                .map(|tz| tz.name().to_string())
                .unwrap_or_else(|| "UTC".to_string()),
            is_recurring: rule.is_some(),
            recurrence_rule: rule.map(|r| r.as_str().to_string()),
            recreation_hours: DEFAULT_RECREATION_HOURS,
            parent_event_id: None,
        }
    }
}
