pub mod events;
pub mod signups;
pub mod squads;
pub mod users;
