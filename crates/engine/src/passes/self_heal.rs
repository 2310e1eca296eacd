use std::sync::Arc;

use chrono::{DateTime, Utc};
use eyre::Result;
use muster_core::presence::{Presence, SummaryStatus};
use muster_core::store::Store;
use tracing::{info, warn};

use crate::summary::build_event_summary;

/// Re-posts summary messages that have gone missing. Events whose summary
/// still exists are left untouched; a second run right after a heal finds
/// everything present and does nothing.
pub async fn run(
    store: Arc<dyn Store>,
    presence: Arc<dyn Presence>,
    now: DateTime<Utc>,
) -> Result<()> {
    let events = store.get_active_events_with_message_id(now).await?;

    for event in events {
        let Some(message_id) = event.message_id else {
            continue;
        };

        let status = match presence.fetch_summary(event.channel_id, message_id).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Summary lookup failed for event {}: {}", event.event_id, e);
                continue;
            }
        };

        if status == SummaryStatus::Found {
            continue;
        }

        info!(
            "Summary for event {} is missing, re-posting",
            event.event_id
        );

        let summary = match build_event_summary(store.as_ref(), presence.as_ref(), &event).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Summary build failed for event {}: {:?}", event.event_id, e);
                continue;
            }
        };

        match presence.post_summary(event.channel_id, &summary).await {
            Ok(new_message_id) => {
                if let Err(e) = store
                    .update_event_message_id(event.event_id, new_message_id)
                    .await
                {
                    warn!(
                        "Failed to record healed message id for event {}: {:?}",
                        event.event_id, e
                    );
                }
            }
            Err(e) => warn!("Summary re-post failed for event {}: {}", event.event_id, e),
        }
    }

    Ok(())
}
