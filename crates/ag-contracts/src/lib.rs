//! # ag-contracts
//!
//! Contract validation for Agroport.
//!
//! Contracts validate write models before they reach the store, and guard the
//! operation status machine.

pub mod base;
pub mod workers;
pub mod fields;
pub mod schedules;
pub mod operations;

pub use base::*;
pub use workers::WorkerContract;
pub use fields::FieldContract;
pub use schedules::ScheduleContract;
pub use operations::{LifecycleAction, OperationContract, TransitionContract};
