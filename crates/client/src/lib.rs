//! Client side of the PREreview REST API.
//!
//! - [`api`]: reqwest client for the list endpoints.
//! - [`backend`]: object-safe trait over those endpoints.
//! - [`scope`]: per-navigation cancellation of in-flight requests.
//! - [`pages`]: loaders that fetch a view's data and shape it with
//!   `prereview_core`.

pub mod api;
pub mod backend;
pub mod error;
pub mod pages;
pub mod scope;

pub use api::PrereviewApi;
pub use backend::PrereviewBackend;
pub use error::ClientError;
pub use scope::{Navigation, RequestScope};
