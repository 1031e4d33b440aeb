//! API handlers

pub mod workers;
pub mod fields;
pub mod schedules;
pub mod operations;
pub mod reports;
