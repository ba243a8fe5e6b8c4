//! # Google sign-in (authorization code + PKCE)
//!
//! 1. [`GoogleOAuth::authorize_url`] builds the consent URL (`openid email
//!    profile`) and records the CSRF state with its PKCE verifier in
//!    `oauth_states`, valid for ten minutes.
//! 2. `/auth/google/callback` calls [`GoogleOAuth::complete`], which consumes
//!    the state row (one use only), exchanges the code, reads the Google
//!    profile and upserts the matching `users` row.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthorizationCode, CsrfToken, EndpointNotSet, EndpointSet, PkceCodeChallenge,
    PkceCodeVerifier, Scope, TokenResponse,
};
use serde::Deserialize;
use sqlx::PgPool;

use super::config::OAuthConfig;
use crate::db::get_pool;
use crate::models::User;

const PROVIDER: &str = "google";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Deserialize)]
struct GoogleProfile {
    id: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

pub struct GoogleOAuth {
    config: OAuthConfig,
}

impl GoogleOAuth {
    pub fn new() -> Result<Self, String> {
        Ok(Self {
            config: OAuthConfig::google()?,
        })
    }

    fn client(&self) -> ConfiguredClient {
        BasicClient::new(self.config.client_id.clone())
            .set_client_secret(self.config.client_secret.clone())
            .set_auth_uri(self.config.auth_url.clone())
            .set_token_uri(self.config.token_url.clone())
            .set_redirect_uri(self.config.redirect_url.clone())
    }

    /// Consent URL for a fresh sign-in attempt.
    pub async fn authorize_url(&self) -> Result<String, String> {
        let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        let (url, state) = self
            .client()
            .authorize_url(CsrfToken::new_random)
            .add_scopes(
                ["openid", "email", "profile"]
                    .into_iter()
                    .map(|s| Scope::new(s.to_string())),
            )
            .set_pkce_challenge(challenge)
            .url();

        let pool = get_pool().await.map_err(|e| e.to_string())?;
        sqlx::query(
            "INSERT INTO oauth_states (state, provider, pkce_verifier, expires_at)
             VALUES ($1, $2, $3, NOW() + INTERVAL '10 minutes')",
        )
        .bind(state.secret())
        .bind(PROVIDER)
        .bind(verifier.secret())
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;

        Ok(url.to_string())
    }

    /// Finish the flow started by [`Self::authorize_url`] and return the
    /// signed-in account.
    pub async fn complete(&self, code: &str, state: &str) -> Result<User, String> {
        let pool = get_pool().await.map_err(|e| e.to_string())?;
        let verifier = take_verifier(pool, state).await?;

        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| e.to_string())?;

        let token = self
            .client()
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(verifier))
            .request_async(&http)
            .await
            .map_err(|e| format!("Token exchange failed: {e}"))?;

        let profile: GoogleProfile = http
            .get(USERINFO_URL)
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?
            .json()
            .await
            .map_err(|e| e.to_string())?;

        upsert_user(pool, &profile).await
    }
}

/// Delete the state row and return its verifier. Unknown or expired states
/// are rejected.
async fn take_verifier(pool: &PgPool, state: &str) -> Result<String, String> {
    let row: Option<(String,)> = sqlx::query_as(
        "DELETE FROM oauth_states
         WHERE state = $1 AND provider = $2 AND expires_at > NOW()
         RETURNING pkce_verifier",
    )
    .bind(state)
    .bind(PROVIDER)
    .fetch_optional(pool)
    .await
    .map_err(|e| e.to_string())?;

    row.map(|(verifier,)| verifier)
        .ok_or_else(|| "Invalid or expired OAuth state".to_string())
}

async fn upsert_user(pool: &PgPool, profile: &GoogleProfile) -> Result<User, String> {
    sqlx::query_as(
        "INSERT INTO users (email, name, avatar_url, provider, provider_id)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (provider, provider_id)
         DO UPDATE SET
             email = EXCLUDED.email,
             name = EXCLUDED.name,
             avatar_url = EXCLUDED.avatar_url,
             updated_at = NOW()
         RETURNING *",
    )
    .bind(&profile.email)
    .bind(&profile.name)
    .bind(&profile.picture)
    .bind(PROVIDER)
    .bind(&profile.id)
    .fetch_one(pool)
    .await
    .map_err(|e| e.to_string())
}
