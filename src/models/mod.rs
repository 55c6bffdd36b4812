// Domain models for the booking engine

pub mod conflict;
pub mod event;
pub mod exception;
pub mod occurrence;
pub mod recurrence;
pub mod resource;
