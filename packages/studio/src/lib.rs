//! # Studio — domain core of the Victims of Ink dashboard
//!
//! Everything in this crate is framework-free so the same rules run in the
//! browser (WASM), on the server, and under `cargo test`.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`session`] | Signed-in identity and the session loading flag. |
//! | [`role`] | The closed set of staff roles and persisted role records. |
//! | [`resolver`] | Look up or bootstrap a role record for the signed-in user. |
//! | [`gate`] | Render / redirect decisions for protected views. |
//! | [`nav`] | Static navigation entries filtered by role. |
//! | [`artist`] | Artist profiles, raw form input and validation. |
//! | [`directory`] | Create / edit / delete flows and the live active-artist view. |
//! | [`watch`] | Observer registry with drop-to-unsubscribe guards. |
//! | [`config`] | `studio.toml` configuration. |

pub mod artist;
pub mod config;
pub mod directory;
pub mod gate;
pub mod nav;
pub mod resolver;
pub mod role;
pub mod session;
pub mod watch;

mod error;
pub use error::StoreError;

mod memory;
pub use memory::MemoryStore;

pub use artist::{ArtistDraft, ArtistInput, ArtistPatch, ArtistProfile, ArtistStatus, Service};
pub use config::StudioConfig;
pub use directory::{ArtistDirectory, ArtistStore, DirectoryError};
pub use gate::{Fallback, GateDecision};
pub use nav::{NavEntry, NavIcon, NAV_ENTRIES};
pub use resolver::{RoleRecordStore, RoleResolver};
pub use role::{RoleName, RoleState, UserRoleRecord};
pub use session::{SessionState, SessionUser};
pub use watch::{Subscription, Watchers};
