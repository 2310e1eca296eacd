pub mod events;
pub mod guilds;
pub mod signups;
pub mod squads;
pub mod users;
