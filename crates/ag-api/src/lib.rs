//! # ag-api
//!
//! REST API handlers for Agroport.
//!
//! JSON over HTTP: successes are wrapped in `{message, data}` envelopes and
//! failures in `{error, message}`.

pub mod error;
pub mod export;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;
