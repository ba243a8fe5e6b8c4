//! Authentication: Google OAuth, local passwords and the session key.

#[cfg(feature = "server")]
mod config;
#[cfg(feature = "server")]
mod google;
#[cfg(feature = "server")]
mod password;
#[cfg(feature = "server")]
mod session;

#[cfg(feature = "server")]
pub use config::OAuthConfig;
#[cfg(feature = "server")]
pub use google::GoogleOAuth;
#[cfg(feature = "server")]
pub use password::{hash_password, verify_password, MIN_PASSWORD_LEN};
#[cfg(feature = "server")]
pub use session::{session_user_id, SESSION_USER_ID_KEY};
