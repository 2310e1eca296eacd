use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use eyre::Result;
use muster_core::models::event::Event;
use muster_core::presence::{Presence, PresenceError};
use muster_core::store::Store;
use tracing::{info, warn};

/// Cleans up finished events and purges soft-deleted ones.
///
/// External teardown is best-effort: a summary or space that is already gone
/// counts as cleaned. The soft-delete marker is written only afterwards, so
/// a failed teardown is retried next cycle. Live recurring origins are never
/// soft-deleted here; the recurrence pass needs them to spawn the next child.
pub async fn run(
    store: Arc<dyn Store>,
    presence: Arc<dyn Presence>,
    now: DateTime<Utc>,
    grace: Duration,
    retention: Duration,
) -> Result<()> {
    let finished = store.get_finished_events_for_cleanup(now, grace).await?;

    for event in finished {
        if event.is_recurring && event.parent_event_id.is_none() {
            continue;
        }
        if let Err(e) = clean_one(store.as_ref(), presence.as_ref(), &event, now).await {
            warn!("Cleanup failed for event {}: {:?}", event.event_id, e);
        }
    }

    let expired = store.get_events_for_purging(now, retention).await?;
    for event in expired {
        info!("Purging event {}", event.event_id);
        if let Err(e) = store.delete_event(event.event_id).await {
            warn!("Purge failed for event {}: {:?}", event.event_id, e);
        }
    }

    Ok(())
}

async fn clean_one(
    store: &dyn Store,
    presence: &dyn Presence,
    event: &Event,
    now: DateTime<Utc>,
) -> Result<()> {
    if let Some(message_id) = event.message_id {
        match presence.delete_summary(event.channel_id, message_id).await {
            Ok(()) | Err(PresenceError::NotFound) => {}
            Err(e) => {
                warn!(
                    "Summary removal failed for event {}: {}",
                    event.event_id, e
                );
                return Ok(());
            }
        }
    }

    if let Some(space_id) = event.thread_id {
        match presence.delete_discussion_space(space_id).await {
            Ok(()) | Err(PresenceError::NotFound) => {}
            Err(e) => {
                warn!("Space removal failed for event {}: {}", event.event_id, e);
                return Ok(());
            }
        }
    }

    info!("Marking event {} finished", event.event_id);
    store.mark_event_finished(event.event_id, now).await?;

    Ok(())
}
