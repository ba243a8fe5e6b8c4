//! Studio name shown in the top bar and on the sign-in page.

use dioxus::prelude::*;
use studio::StudioConfig;

/// The configured studio name. Holds the default until the server answers.
pub fn use_studio_name() -> Signal<String> {
    use_context::<Signal<String>>()
}

/// Fetches the studio name once and provides it to every descendant.
#[component]
pub fn BrandingProvider(children: Element) -> Element {
    let mut name = use_signal(|| StudioConfig::default().studio.name);

    let _ = use_resource(move || async move {
        match api::get_studio_name().await {
            Ok(configured) => name.set(configured),
            Err(e) => tracing::warn!("Failed to load studio name: {e}"),
        }
    });

    use_context_provider(|| name);

    rsx! {
        {children}
    }
}
