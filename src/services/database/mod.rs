// Database service module
// SQLite database connection and schema management

use anyhow::{Context, Result};
use rusqlite::Connection;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file (or ":memory:" for in-memory)
    ///
    /// # Examples
    /// ```
    /// use amenity_booking::services::database::Database;
    /// let db = Database::new(":memory:").unwrap();
    /// ```
    pub fn new(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).context(format!("Failed to open database at {}", path))?;

        // Enable foreign keys
        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("Failed to enable foreign keys")?;

        Ok(Self { conn })
    }

    /// Initialize the database schema
    /// Creates all required tables if they don't exist
    pub fn initialize_schema(&self) -> Result<()> {
        // Events table: one-time bookings and recurring series definitions
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS events (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    building_id INTEGER NOT NULL,
                    amenity_id INTEGER NOT NULL,
                    start_time TEXT NOT NULL,
                    end_time TEXT NOT NULL,
                    is_recurring INTEGER NOT NULL DEFAULT 0,
                    one_time_date TEXT,
                    range_start TEXT,
                    range_end TEXT,
                    notes TEXT,
                    cost REAL,
                    contact_name TEXT,
                    contact_phone TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                [],
            )
            .context("Failed to create events table")?;

        // One pattern row per recurring series
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS recurring_patterns (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    event_id INTEGER NOT NULL UNIQUE
                        REFERENCES events(id) ON DELETE CASCADE,
                    frequency TEXT NOT NULL,
                    weekdays TEXT NOT NULL
                )",
                [],
            )
            .context("Failed to create recurring_patterns table")?;

        // Per-date exceptions: cancelled-date rows and modified-occurrence
        // rows, at most one of each kind per (event_id, occurrence_date)
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS event_exceptions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    event_id INTEGER NOT NULL
                        REFERENCES events(id) ON DELETE CASCADE,
                    occurrence_date TEXT NOT NULL,
                    kind TEXT NOT NULL CHECK (kind IN ('cancelled', 'modified')),
                    title TEXT,
                    building_id INTEGER,
                    amenity_id INTEGER,
                    start_time TEXT,
                    end_time TEXT,
                    notes TEXT,
                    cost REAL,
                    contact_name TEXT,
                    contact_phone TEXT,
                    created_at TEXT NOT NULL,
                    UNIQUE (event_id, occurrence_date, kind)
                )",
                [],
            )
            .context("Failed to create event_exceptions table")?;

        Ok(())
    }

    /// Get a reference to the database connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
