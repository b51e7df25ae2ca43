//! HTTP packaging service
//!
//! Thin axum layer over the packaging engine: request bodies in, artifacts
//! out. The name registry and content delivery collaborators are trait
//! seams; in-memory implementations back local serving and tests.

pub mod server;
pub mod store;

pub use server::{router, serve, AppState};
pub use store::{ContentDelivery, EphemeralStore, InMemoryDelivery, InMemoryRegistry, NameRegistry};
