use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use eyre::Result;
use muster_core::models::event::Event;
use muster_core::models::signup::RsvpStatus;
use muster_core::presence::Presence;
use muster_core::store::Store;
use tracing::{debug, warn};

/// Converges each discussion space's roster onto the accepted signups.
///
/// The set difference is recomputed from fresh state every cycle; when the
/// space already matches, no platform mutation is issued. The service's own
/// identity is never removed.
pub async fn run(
    store: Arc<dyn Store>,
    presence: Arc<dyn Presence>,
    now: DateTime<Utc>,
) -> Result<()> {
    let events = store.get_active_events_with_threads(now).await?;

    for event in events {
        if let Err(e) = sync_one(store.as_ref(), presence.as_ref(), &event).await {
            warn!("Membership sync failed for event {}: {:?}", event.event_id, e);
        }
    }

    Ok(())
}

async fn sync_one(store: &dyn Store, presence: &dyn Presence, event: &Event) -> Result<()> {
    let Some(space_id) = event.thread_id else {
        return Ok(());
    };

    let observed: HashSet<i64> = match presence.list_space_members(space_id).await {
        Ok(members) => members.into_iter().collect(),
        Err(e) => {
            warn!(
                "Member listing failed for space {} (event {}): {}",
                space_id, event.event_id, e
            );
            return Ok(());
        }
    };

    let signups = store.get_signups_for_event(event.event_id).await?;
    let desired: HashSet<i64> = signups
        .iter()
        .filter(|s| s.rsvp_status == RsvpStatus::Accepted)
        .map(|s| s.user_id)
        .collect();

    for &user_id in desired.difference(&observed) {
        debug!("Adding user {} to space {}", user_id, space_id);
        if let Err(e) = presence.add_space_member(space_id, user_id).await {
            warn!("Failed to add user {} to space {}: {}", user_id, space_id, e);
        }
    }

    let self_id = presence.self_user_id();
    for &user_id in observed.difference(&desired) {
        if user_id == self_id {
            continue;
        }
        debug!("Removing user {} from space {}", user_id, space_id);
        if let Err(e) = presence.remove_space_member(space_id, user_id).await {
            warn!(
                "Failed to remove user {} from space {}: {}",
                user_id, space_id, e
            );
        }
    }

    Ok(())
}
