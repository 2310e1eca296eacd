use chrono::TimeZone;
use chrono_tz::Tz;
use muster_core::models::event::{Event, EventSummary};
use muster_core::models::squad::SquadWithMembers;
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use serenity::utils::Color;

pub const RSVP_ACCEPT_ID: &str = "muster_rsvp_accept";
pub const RSVP_TENTATIVE_ID: &str = "muster_rsvp_tentative";
pub const RSVP_DECLINE_ID: &str = "muster_rsvp_decline";

/// Formats a start/end time in the event's own timezone, falling back to UTC
/// when the stored zone name no longer parses.
fn format_time(event: &Event, time: chrono::DateTime<chrono::Utc>) -> String {
    match event.timezone.parse::<Tz>() {
        Ok(tz) => tz
            .from_utc_datetime(&time.naive_utc())
            .format("%Y-%m-%d %H:%M %Z")
            .to_string(),
        Err(_) => time.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

/// The posted event summary: schedule block, accepted volunteers grouped by
/// role with per-role counts, then tentative and declined lines.
pub fn event_summary_embed<'a>(
    embed: &'a mut CreateEmbed,
    summary: &EventSummary,
) -> &'a mut CreateEmbed {
    let event = &summary.event;

    embed
        .title(&event.title)
        .description(&event.description)
        .color(Color::DARK_GREEN);

    let mut when = format!("Starts: {}", format_time(event, event.start_time));
    if let Some(end) = event.end_time {
        when.push_str(&format!("\nEnds: {}", format_time(event, end)));
    }
    if let Some(rule) = &event.recurrence_rule {
        when.push_str(&format!("\nRepeats: {rule}"));
    }
    embed.field("When", when, false);

    // Group accepted volunteers by primary role, keeping arrival order
    // within each group.
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for entry in &summary.accepted {
        let role = entry.role_name.clone().unwrap_or_else(|| "Unassigned".to_string());
        let label = match &entry.subclass_name {
            Some(subclass) => format!("{} ({})", entry.display_name, subclass),
            None => entry.display_name.clone(),
        };
        match groups.iter_mut().find(|(name, _)| *name == role) {
            Some((_, members)) => members.push(label),
            None => groups.push((role, vec![label])),
        }
    }

    if groups.is_empty() {
        embed.field("Accepted (0)", "Nobody yet", false);
    } else {
        for (role, members) in &groups {
            embed.field(
                format!("{} ({})", role, members.len()),
                members.join("\n"),
                true,
            );
        }
    }

    if !summary.tentative.is_empty() {
        embed.field(
            format!("Tentative ({})", summary.tentative.len()),
            summary.tentative.join(", "),
            false,
        );
    }
    if !summary.declined.is_empty() {
        embed.field(
            format!("Declined ({})", summary.declined.len()),
            summary.declined.join(", "),
            false,
        );
    }

    embed.footer(|f| {
        f.text(format!(
            "Event #{} • created by <@{}>",
            event.event_id, event.creator_id
        ))
    });

    embed
}

/// RSVP buttons attached below a posted summary.
pub fn rsvp_buttons(components: &mut CreateComponents) -> &mut CreateComponents {
    components.create_action_row(|row| {
        row.create_button(|b| {
            b.custom_id(RSVP_ACCEPT_ID)
                .label("Accept")
                .style(ButtonStyle::Success)
        })
        .create_button(|b| {
            b.custom_id(RSVP_TENTATIVE_ID)
                .label("Tentative")
                .style(ButtonStyle::Secondary)
        })
        .create_button(|b| {
            b.custom_id(RSVP_DECLINE_ID)
                .label("Decline")
                .style(ButtonStyle::Danger)
        })
    })
}

/// The team sheet posted after a draft: one field per squad, members in
/// seat order with their assigned role.
pub fn team_sheet_embed<'a>(
    embed: &'a mut CreateEmbed,
    event: &Event,
    squads: &[SquadWithMembers],
) -> &'a mut CreateEmbed {
    embed
        .title(format!("Team sheet — {}", event.title))
        .color(Color::BLUE);

    for squad in squads {
        let body = if squad.members.is_empty() {
            "Empty".to_string()
        } else {
            squad
                .members
                .iter()
                .map(|m| format!("<@{}> — {}", m.user_id, m.assigned_role_name))
                .collect::<Vec<_>>()
                .join("\n")
        };
        embed.field(&squad.squad.name, body, true);
    }

    let total: usize = squads.iter().map(|s| s.members.len()).sum();
    embed.footer(|f| f.text(format!("{} squads • {} members", squads.len(), total)));

    embed
}
