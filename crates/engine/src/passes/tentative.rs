use std::sync::Arc;

use chrono::{DateTime, Utc};
use eyre::Result;
use muster_core::models::event::Event;
use muster_core::models::signup::RsvpStatus;
use muster_core::store::Store;
use tracing::{info, warn};

/// Ages out Tentative responses once an event has started. The transition
/// is one-way: the query only surfaces events that still carry Tentative
/// rows, so a repeat run finds nothing to do.
pub async fn run(store: Arc<dyn Store>, now: DateTime<Utc>) -> Result<()> {
    let events = store.get_past_events_with_tentatives(now).await?;

    for event in events {
        if let Err(e) = age_one(store.as_ref(), &event).await {
            warn!("Tentative aging failed for event {}: {:?}", event.event_id, e);
        }
    }

    Ok(())
}

async fn age_one(store: &dyn Store, event: &Event) -> Result<()> {
    let signups = store.get_signups_for_event(event.event_id).await?;

    for signup in signups {
        if signup.rsvp_status != RsvpStatus::Tentative {
            continue;
        }
        info!(
            "Aging tentative signup to declined: event={}, user={}",
            event.event_id, signup.user_id
        );
        store
            .set_rsvp(event.event_id, signup.user_id, RsvpStatus::Declined)
            .await?;
    }

    Ok(())
}
