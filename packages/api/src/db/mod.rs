//! # Database — pool and the PostgreSQL store
//!
//! Everything here is gated behind `#[cfg(feature = "server")]` so client
//! (WASM) builds never pull in SQLx.
//!
//! - [`get_pool`] is a lazy process-wide pool read from `DATABASE_URL`.
//! - [`get_store`] is the process-wide [`PgStore`]. It must be shared so that
//!   writers and long-poll watchers see the same observer registry.

#[cfg(feature = "server")]
mod pool;
#[cfg(feature = "server")]
mod store;

#[cfg(feature = "server")]
pub use pool::get_pool;
#[cfg(feature = "server")]
pub use store::{get_store, PgStore};
