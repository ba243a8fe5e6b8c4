use dioxus::prelude::*;

use ui::{BrandingProvider, RoleProvider, SessionProvider};
use views::{
    AppShell, Artists, Clients, Dashboard, Emails, Leads, Login, Messages, NotFound, Register,
    Sales, Settings,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[layout(AppShell)]
        #[route("/dashboard")]
        Dashboard {},
        #[route("/leads")]
        Leads {},
        #[route("/clients")]
        Clients {},
        #[route("/artists")]
        Artists {},
        #[route("/sales")]
        Sales {},
        #[route("/messages")]
        Messages {},
        #[route("/emails")]
        Emails {},
        #[route("/settings")]
        Settings {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tracing_subscriber::fmt().init();

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!(error = %e, "Failed to start the tokio runtime");
                std::process::exit(1);
            }
        };
        if let Err(e) = runtime.block_on(launch_server()) {
            tracing::error!(error = %e, "Server stopped");
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() -> Result<(), Box<dyn std::error::Error>> {
    use axum::routing::get;
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use tower_sessions::cookie::time::Duration;
    use tower_sessions::cookie::SameSite;
    use tower_sessions::{Expiry, SessionManagerLayer};
    use tower_sessions_sqlx_store::PostgresStore;

    dotenvy::dotenv().ok();
    let config = api::config::studio_config();

    let pool = api::db::get_pool().await?;
    sqlx::migrate!("../api/migrations").run(pool).await?;

    let session_store = PostgresStore::new(pool.clone());
    session_store.migrate().await?;

    // Cookies are not marked secure so `dx serve` works over plain HTTP.
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(i64::from(
            config.session.expiry_days,
        ))));

    let router = axum::Router::new()
        .route("/auth/google/callback", get(google_callback))
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(session_layer);

    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(studio = %config.studio.name, "Server listening on {addr}");

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}

#[cfg(feature = "server")]
async fn google_callback(
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
    session: tower_sessions::Session,
) -> axum::response::Redirect {
    use axum::response::Redirect;

    let (Some(code), Some(state)) = (params.get("code"), params.get("state")) else {
        tracing::error!("Google callback missing code or state");
        return Redirect::to("/login?error=missing_code");
    };

    let oauth = match api::auth::GoogleOAuth::new() {
        Ok(oauth) => oauth,
        Err(e) => {
            tracing::error!("Google OAuth is not configured: {e}");
            return Redirect::to("/login?error=config_error");
        }
    };

    let user = match oauth.complete(code, state).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Google sign-in failed: {e}");
            return Redirect::to("/login?error=oauth_error");
        }
    };

    if let Err(e) = session
        .insert(api::auth::SESSION_USER_ID_KEY, user.id.to_string())
        .await
    {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/login?error=session_error");
    }
    if let Err(e) = session.save().await {
        tracing::error!("Failed to save session: {e}");
        return Redirect::to("/login?error=session_error");
    }

    tracing::info!(user = %user.id, "Signed in with Google");
    Redirect::to(studio::gate::DASHBOARD_PATH)
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        BrandingProvider {
            SessionProvider {
                RoleProvider {
                    Router::<Route> {}
                }
            }
        }
    }
}

/// `/` goes straight to the dashboard; the shell sends signed-out visitors
/// on to the login page.
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Dashboard {});
    rsx! {}
}
