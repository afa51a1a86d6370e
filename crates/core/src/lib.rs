//! Pure list-query, activity and trending logic for PREreview list views.
//!
//! Nothing in this crate performs I/O. Callers fetch records from the REST
//! API and pass them in; every function here is deterministic given its
//! inputs (including an explicit `now` where time matters).

pub mod activity;
pub mod error;
pub mod models;
pub mod query;
pub mod trending;
pub mod types;
