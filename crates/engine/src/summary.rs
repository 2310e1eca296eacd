use eyre::Result;
use muster_core::models::event::{Event, EventSummary, SummaryEntry};
use muster_core::models::signup::RsvpStatus;
use muster_core::presence::Presence;
use muster_core::store::Store;
use tracing::warn;

/// Builds a render-ready snapshot of an event from its signups. Display
/// names come from the platform; a lookup failure falls back to a mention
/// so one missing member never blocks a summary.
pub async fn build_event_summary(
    store: &dyn Store,
    presence: &dyn Presence,
    event: &Event,
) -> Result<EventSummary> {
    let signups = store.get_signups_for_event(event.event_id).await?;

    let mut accepted = Vec::new();
    let mut tentative = Vec::new();
    let mut declined = Vec::new();

    for signup in signups {
        let display_name = match presence
            .fetch_member_display_name(event.guild_id, signup.user_id)
            .await
        {
            Ok(name) => name,
            Err(e) => {
                warn!(
                    "Display name lookup failed for user {} in guild {}: {}",
                    signup.user_id, event.guild_id, e
                );
                format!("<@{}>", signup.user_id)
            }
        };

        match signup.rsvp_status {
            RsvpStatus::Accepted => accepted.push(SummaryEntry {
                user_id: signup.user_id,
                display_name,
                role_name: signup.role_name,
                subclass_name: signup.subclass_name,
            }),
            RsvpStatus::Tentative => tentative.push(display_name),
            RsvpStatus::Declined => declined.push(display_name),
        }
    }

    Ok(EventSummary {
        event: event.clone(),
        accepted,
        tentative,
        declined,
    })
}
