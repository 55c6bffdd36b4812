//! Service layer: the pure recurrence/expansion/conflict engine plus the
//! SQLite-backed store and the booking orchestrator that ties them together.

pub mod booking;
pub mod conflict;
pub mod database;
pub mod event;
pub mod expansion;
pub mod recurrence;
