// Amenity Booking Library
// Recurrence expansion and booking-conflict engine for facility bookings

pub mod models;
pub mod services;
pub mod utils;
