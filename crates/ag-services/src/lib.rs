//! # ag-services
//!
//! Business logic services for Agroport.
//!
//! Services sit between the HTTP handlers and the repositories: they
//! normalize and validate write models through contracts, drive the
//! operation lifecycle, and aggregate activity reports.

pub mod base;
pub mod operations;
pub mod reports;

pub use base::{EntityService, WriteModel};
pub use operations::{OperationService, OperationStore};
pub use reports::{aggregate, ReportService, ReportSource};
