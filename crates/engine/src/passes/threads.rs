use std::sync::Arc;

use chrono::{DateTime, Utc};
use eyre::Result;
use muster_core::models::event::Event;
use muster_core::models::signup::RsvpStatus;
use muster_core::presence::Presence;
use muster_core::store::Store;
use tracing::{info, warn};

use crate::summary::build_event_summary;

// Platform channel names are capped at 100 characters.
const MAX_SPACE_NAME: usize = 100;

/// Opens discussion spaces for events whose thread window has started.
///
/// The created flag is set only after the space exists, so a failed creation
/// is retried on the next cycle rather than lost.
pub async fn run(
    store: Arc<dyn Store>,
    presence: Arc<dyn Presence>,
    now: DateTime<Utc>,
) -> Result<()> {
    let events = store.get_events_for_thread_creation(now).await?;

    for event in events {
        if let Err(e) = open_one(store.as_ref(), presence.as_ref(), &event).await {
            warn!("Thread opening failed for event {}: {:?}", event.event_id, e);
        }
    }

    Ok(())
}

async fn open_one(store: &dyn Store, presence: &dyn Presence, event: &Event) -> Result<()> {
    let name: String = event.title.chars().take(MAX_SPACE_NAME).collect();

    let space_id = match presence.create_discussion_space(event.channel_id, &name).await {
        Ok(space_id) => space_id,
        Err(e) => {
            warn!(
                "Discussion space creation failed for event {}: {}",
                event.event_id, e
            );
            return Ok(());
        }
    };

    info!("Created discussion space {} for event {}", space_id, event.event_id);

    store.set_event_thread(event.event_id, space_id).await?;
    store.mark_thread_created(event.event_id).await?;

    let signups = store.get_signups_for_event(event.event_id).await?;
    for signup in signups {
        if signup.rsvp_status != RsvpStatus::Accepted {
            continue;
        }
        if let Err(e) = presence.add_space_member(space_id, signup.user_id).await {
            warn!(
                "Failed to add user {} to space {}: {}",
                signup.user_id, space_id, e
            );
        }
    }

    match build_event_summary(store, presence, event).await {
        Ok(summary) => {
            if let Err(e) = presence.post_summary(space_id, &summary).await {
                warn!("Welcome post failed in space {}: {}", space_id, e);
            }
        }
        Err(e) => warn!("Summary build failed for event {}: {:?}", event.event_id, e),
    }

    Ok(())
}
