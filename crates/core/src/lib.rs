//! # Muster Core
//!
//! Domain types and pure logic for the muster event-coordination service:
//! the error taxonomy, the Store and Presence interface traits consumed by
//! the reconciliation engine, the recurrence calculator, the squad draft
//! planner, and the event-creation conversation state machine.
//!
//! Nothing in this crate performs I/O; implementations of the traits live in
//! `muster-db` (Postgres) and `muster-discord-bot` (serenity).

pub mod draft;
pub mod errors;
pub mod models;
pub mod presence;
pub mod recurrence;
pub mod store;
pub mod wizard;
