pub mod membership;
pub mod recurrence;
pub mod retention;
pub mod self_heal;
pub mod tentative;
pub mod threads;
