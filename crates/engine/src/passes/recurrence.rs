use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use eyre::Result;
use muster_core::models::event::{Event, NewEvent};
use muster_core::presence::Presence;
use muster_core::recurrence::next_occurrence;
use muster_core::store::Store;
use tracing::{info, warn};

use crate::summary::build_event_summary;

/// Creates the next occurrence of each recurring event once it is due.
///
/// The first occurrence opens `recreation_hours` before the origin's start;
/// every later occurrence waits for the latest child's end. The next start
/// is always computed from the most recent concrete occurrence's own start,
/// stepped forward past `now` if the chain has fallen behind.
pub async fn run(
    store: Arc<dyn Store>,
    presence: Arc<dyn Presence>,
    now: DateTime<Utc>,
    recheck_interval: Duration,
) -> Result<()> {
    let origins = store.get_events_for_recreation(now, recheck_interval).await?;

    for origin in origins {
        if let Err(e) = recreate_one(store.as_ref(), presence.as_ref(), &origin, now).await {
            warn!("Recreation failed for event {}: {:?}", origin.event_id, e);
        }
    }

    Ok(())
}

async fn recreate_one(
    store: &dyn Store,
    presence: &dyn Presence,
    origin: &Event,
    now: DateTime<Utc>,
) -> Result<()> {
    let Some(rule) = origin.recurrence_rule.as_deref() else {
        return Ok(());
    };

    let latest = store.get_latest_child_event(origin.event_id).await?;

    let basis = match &latest {
        None => {
            let window_opens = origin.start_time - Duration::hours(origin.recreation_hours);
            if now < window_opens {
                return Ok(());
            }
            origin.start_time
        }
        Some(child) => {
            if now < child.effective_end() {
                return Ok(());
            }
            child.start_time
        }
    };

    let Some(mut next_start) = next_occurrence(basis, rule) else {
        warn!(
            "Event {} has unknown recurrence rule {:?}, skipping",
            origin.event_id, rule
        );
        return Ok(());
    };

    // Catch up a chain that went unserved for several periods.
    while next_start <= now {
        match next_occurrence(next_start, rule) {
            Some(stepped) => next_start = stepped,
            None => return Ok(()),
        }
    }

    let duration = origin.end_time.map(|end| end - origin.start_time);

    let child_id = store
        .create_event(
            origin.guild_id,
            origin.channel_id,
            origin.creator_id,
            NewEvent {
                title: origin.title.clone(),
                description: origin.description.clone(),
                start_time: next_start,
                end_time: duration.map(|d| next_start + d),
                timezone: origin.timezone.clone(),
                is_recurring: false,
                recurrence_rule: None,
                recreation_hours: origin.recreation_hours,
                parent_event_id: Some(origin.event_id),
            },
        )
        .await?;

    info!(
        "Recreated event {} as {} starting {}",
        origin.event_id, child_id, next_start
    );

    if let Some(child) = store.get_event(child_id).await? {
        match build_event_summary(store, presence, &child).await {
            Ok(summary) => match presence.post_summary(child.channel_id, &summary).await {
                Ok(message_id) => {
                    store.update_event_message_id(child_id, message_id).await?;
                }
                Err(e) => warn!("Summary post failed for new event {}: {}", child_id, e),
            },
            Err(e) => warn!("Summary build failed for new event {}: {:?}", child_id, e),
        }
    }

    store.update_last_recreated_at(origin.event_id, now).await?;

    Ok(())
}
