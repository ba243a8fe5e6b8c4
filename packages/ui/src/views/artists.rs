//! Artist directory screen.
//!
//! The table follows the server's active-artist feed: a long-poll loop keeps
//! one request open and re-renders on every answer. When the feed fails the
//! loop stops and the page shows the error with a reconnect button; it does
//! not retry on its own.

use dioxus::prelude::*;
use studio::{ArtistInput, ArtistProfile};

use super::{ArtistForm, ModalOverlay};
use crate::icons::{FaPen, FaPlus, FaTrashCan};
use crate::Icon;

const VIEWS_CSS: Asset = asset!("/assets/styling/views.css");

#[derive(Debug, Clone, PartialEq)]
enum Editor {
    Create,
    Edit { id: String, input: ArtistInput },
}

#[derive(Debug, Clone, PartialEq)]
struct PendingDelete {
    id: String,
    name: String,
}

#[component]
pub fn ArtistsView() -> Element {
    let mut rows = use_signal(|| Option::<Vec<ArtistProfile>>::None);
    let mut feed_error = use_signal(|| Option::<String>::None);
    let mut connection = use_signal(|| 0u32);

    let mut editor = use_signal(|| Option::<Editor>::None);
    let mut saving = use_signal(|| false);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut page_error = use_signal(|| Option::<String>::None);
    let mut pending_delete = use_signal(|| Option::<PendingDelete>::None);
    let mut delete_error = use_signal(|| Option::<String>::None);

    let _feed = use_resource(move || async move {
        // Bumping `connection` restarts the loop.
        let _ = connection();
        feed_error.set(None);

        let mut seen = None;
        loop {
            match api::watch_active_artists(seen).await {
                Ok(update) => {
                    seen = Some(update.revision);
                    rows.set(Some(update.artists));
                }
                Err(e) => {
                    tracing::error!("Artist feed stopped: {e}");
                    feed_error.set(Some(e.to_string()));
                    break;
                }
            }
        }
    });

    let open_create = move |_| {
        form_error.set(None);
        editor.set(Some(Editor::Create));
    };

    let open_edit = move |id: String| {
        spawn(async move {
            page_error.set(None);
            form_error.set(None);
            match api::get_artist_for_edit(id.clone()).await {
                Ok(input) => editor.set(Some(Editor::Edit { id, input })),
                Err(e) => page_error.set(Some(e.to_string())),
            }
        });
    };

    let handle_submit = move |input: ArtistInput| {
        let Some(current) = editor() else {
            return;
        };
        spawn(async move {
            saving.set(true);
            form_error.set(None);
            let result = match current {
                Editor::Create => api::create_artist(input).await.map(|_| ()),
                Editor::Edit { id, .. } => api::update_artist(id, input).await,
            };
            saving.set(false);
            match result {
                Ok(()) => editor.set(None),
                Err(e) => form_error.set(Some(e.to_string())),
            }
        });
    };

    let confirm_delete = move |_| {
        let Some(target) = pending_delete() else {
            return;
        };
        spawn(async move {
            delete_error.set(None);
            match api::delete_artist(target.id).await {
                Ok(()) => pending_delete.set(None),
                Err(e) => delete_error.set(Some(e.to_string())),
            }
        });
    };

    rsx! {
        document::Stylesheet { href: VIEWS_CSS }
        div {
            class: "view-page",
            div {
                class: "view-header",
                h1 { class: "view-title", "Artists" }
                button {
                    class: "btn btn-primary",
                    onclick: open_create,
                    Icon { icon: FaPlus, width: 12, height: 12 }
                    span { "Add artist" }
                }
            }

            if let Some(err) = page_error() {
                div { class: "form-error", "{err}" }
            }
            if let Some(err) = feed_error() {
                div {
                    class: "form-error feed-error",
                    span { "Live updates stopped: {err}" }
                    button {
                        class: "btn btn-outline",
                        onclick: move |_| connection += 1,
                        "Reconnect"
                    }
                }
            }

            match rows() {
                None => rsx! { p { class: "view-muted", "Loading artists…" } },
                Some(list) if list.is_empty() => rsx! {
                    div { class: "card empty-state", "No active artists yet." }
                },
                Some(list) => rsx! {
                    div {
                        class: "card table-card",
                        table {
                            class: "table",
                            thead {
                                tr {
                                    th { "Name" }
                                    th { "Specialty" }
                                    th { "Instagram" }
                                    th { "Phone" }
                                    th { "Commission" }
                                    th { "Services" }
                                    th { class: "table-actions", "" }
                                }
                            }
                            tbody {
                                for artist in list {
                                    ArtistRow {
                                        key: "{artist.id}",
                                        artist: artist.clone(),
                                        on_edit: open_edit,
                                        on_delete: move |target: PendingDelete| {
                                            delete_error.set(None);
                                            pending_delete.set(Some(target));
                                        },
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }

        if let Some(current) = editor() {
            ModalOverlay {
                wide: true,
                on_close: move |_| editor.set(None),
                match current {
                    Editor::Create => rsx! {
                        ArtistForm {
                            title: "Add artist",
                            submit_label: "Create",
                            initial: ArtistInput::default(),
                            saving: saving(),
                            error: form_error(),
                            on_submit: handle_submit,
                            on_cancel: move |_| editor.set(None),
                        }
                    },
                    Editor::Edit { id, input } => rsx! {
                        ArtistForm {
                            key: "{id}",
                            title: "Edit artist",
                            submit_label: "Save changes",
                            initial: input,
                            saving: saving(),
                            error: form_error(),
                            on_submit: handle_submit,
                            on_cancel: move |_| editor.set(None),
                        }
                    },
                }
            }
        }

        if let Some(target) = pending_delete() {
            ModalOverlay {
                on_close: move |_| pending_delete.set(None),
                div {
                    class: "modal-body",
                    h2 { class: "modal-title", "Delete artist" }
                    p {
                        class: "modal-text",
                        "Permanently delete "
                        strong { "{target.name}" }
                        "? This cannot be undone."
                    }
                    if let Some(err) = delete_error() {
                        div { class: "form-error", "{err}" }
                    }
                    div {
                        class: "modal-actions",
                        button {
                            class: "btn btn-danger",
                            onclick: confirm_delete,
                            "Delete"
                        }
                        button {
                            class: "btn btn-outline",
                            onclick: move |_| pending_delete.set(None),
                            "Cancel"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ArtistRow(
    artist: ArtistProfile,
    on_edit: EventHandler<String>,
    on_delete: EventHandler<PendingDelete>,
) -> Element {
    let commission = artist
        .commission_percent
        .map(|c| format!("{c}%"))
        .unwrap_or_else(|| "-".to_string());
    let services = artist
        .services
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let edit_id = artist.id.clone();
    let target = PendingDelete {
        id: artist.id.clone(),
        name: artist.name.clone(),
    };

    rsx! {
        tr {
            td { class: "table-strong", "{artist.name}" }
            td { {artist.specialty.clone().unwrap_or_default()} }
            td {
                if let (Some(handle), Some(url)) = (artist.instagram.clone(), artist.instagram_url()) {
                    a { href: "{url}", target: "_blank", rel: "noopener", "{handle}" }
                }
            }
            td { {artist.phone.clone().unwrap_or_default()} }
            td { "{commission}" }
            td { "{services}" }
            td {
                class: "table-actions",
                button {
                    class: "icon-button",
                    title: "Edit",
                    onclick: move |_| on_edit.call(edit_id.clone()),
                    Icon { icon: FaPen, width: 12, height: 12 }
                }
                button {
                    class: "icon-button icon-button-danger",
                    title: "Delete",
                    onclick: move |_| on_delete.call(target.clone()),
                    Icon { icon: FaTrashCan, width: 12, height: 12 }
                }
            }
        }
    }
}
