use dioxus::prelude::*;

const VIEWS_CSS: Asset = asset!("/assets/styling/views.css");

/// Stand-in page for a section that has a navigation entry but no screen yet.
#[component]
pub fn SectionPlaceholder(title: String, description: String) -> Element {
    rsx! {
        document::Stylesheet { href: VIEWS_CSS }
        div {
            class: "view-page",
            h1 { class: "view-title", "{title}" }
            div {
                class: "card placeholder-card",
                p { "{description}" }
                p { class: "view-muted", "This section is coming soon." }
            }
        }
    }
}
