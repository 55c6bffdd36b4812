//! Booking store service entry point.
//! Provides database-backed reads and writes for events, recurrence
//! patterns and per-occurrence exceptions, organized across focused
//! submodules. The pure expansion/conflict engine consumes snapshots read
//! through this service and never touches the connection itself.

use rusqlite::Connection;

pub mod crud;
pub mod queries;
mod shared;

/// Service for managing bookings stored in SQLite.
pub struct EventService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> EventService<'a> {
    /// Create a new EventService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}
