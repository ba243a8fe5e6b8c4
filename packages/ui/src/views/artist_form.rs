//! Create / edit form for an artist profile.
//!
//! The form edits a local copy of [`ArtistInput`] and validates it before
//! calling `on_submit`, so invalid input never leaves the browser. Server
//! errors come back through `error` and keep the form open.

use dioxus::prelude::*;
use studio::{ArtistInput, ArtistStatus, Service};

#[component]
fn TextField(
    label: &'static str,
    value: String,
    oninput: EventHandler<String>,
    #[props(default = "text")] kind: &'static str,
    #[props(default)] placeholder: &'static str,
) -> Element {
    rsx! {
        label {
            class: "form-field",
            span { class: "form-label", "{label}" }
            input {
                class: "input",
                r#type: kind,
                placeholder: placeholder,
                value: value,
                oninput: move |evt| oninput.call(evt.value()),
            }
        }
    }
}

#[component]
pub fn ArtistForm(
    title: String,
    initial: ArtistInput,
    submit_label: String,
    #[props(default)] saving: bool,
    #[props(default)] error: Option<String>,
    on_submit: EventHandler<ArtistInput>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut form = use_signal(|| initial.clone());
    let mut invalid = use_signal(|| Option::<String>::None);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let input = form();
        match input.validate() {
            Ok(_) => {
                invalid.set(None);
                on_submit.call(input);
            }
            Err(e) => invalid.set(Some(e.to_string())),
        }
    };

    let shown_error = invalid().or(error);
    let current = form();

    rsx! {
        form {
            class: "modal-body artist-form",
            onsubmit: handle_submit,

            h2 { class: "modal-title", "{title}" }

            if let Some(err) = shown_error {
                div { class: "form-error", "{err}" }
            }

            div {
                class: "form-grid",
                TextField {
                    label: "Name *",
                    value: current.name.clone(),
                    oninput: move |v| form.write().name = v,
                }
                TextField {
                    label: "Email",
                    kind: "email",
                    value: current.email.clone(),
                    oninput: move |v| form.write().email = v,
                }
                TextField {
                    label: "Phone",
                    kind: "tel",
                    value: current.phone.clone(),
                    oninput: move |v| form.write().phone = v,
                }
                TextField {
                    label: "Instagram",
                    placeholder: "@handle",
                    value: current.instagram.clone(),
                    oninput: move |v| form.write().instagram = v,
                }
                TextField {
                    label: "Specialty",
                    placeholder: "Fine line, blackwork…",
                    value: current.specialty.clone(),
                    oninput: move |v| form.write().specialty = v,
                }
                label {
                    class: "form-field",
                    span { class: "form-label", "Status" }
                    select {
                        class: "input",
                        value: current.status.as_str(),
                        onchange: move |evt| {
                            if let Ok(status) = evt.value().parse::<ArtistStatus>() {
                                form.write().status = status;
                            }
                        },
                        for status in [ArtistStatus::Active, ArtistStatus::Inactive] {
                            option {
                                value: status.as_str(),
                                selected: current.status == status,
                                "{status.label()}"
                            }
                        }
                    }
                }
                TextField {
                    label: "ABN",
                    placeholder: "11 digits",
                    value: current.tax_id.clone(),
                    oninput: move |v| form.write().tax_id = v,
                }
                TextField {
                    label: "Commission %",
                    kind: "number",
                    placeholder: "0 to 100",
                    value: current.commission.clone(),
                    oninput: move |v| form.write().commission = v,
                }
                TextField {
                    label: "Start date",
                    kind: "date",
                    value: current.start_date.clone(),
                    oninput: move |v| form.write().start_date = v,
                }
                TextField {
                    label: "End date",
                    kind: "date",
                    value: current.end_date.clone(),
                    oninput: move |v| form.write().end_date = v,
                }
            }

            label {
                class: "form-check",
                input {
                    r#type: "checkbox",
                    checked: current.gst_registered,
                    onchange: move |evt| form.write().gst_registered = evt.checked(),
                }
                span { "Registered for GST" }
            }

            fieldset {
                class: "form-services",
                legend { class: "form-label", "Services" }
                for service in Service::OPTIONS {
                    label {
                        key: "{service}",
                        class: "form-check",
                        input {
                            r#type: "checkbox",
                            checked: current.services.contains(&service),
                            onchange: move |_| form.write().toggle_service(service),
                        }
                        span { "{service}" }
                    }
                }
            }

            label {
                class: "form-field",
                span { class: "form-label", "Bio" }
                textarea {
                    class: "input",
                    rows: 3,
                    value: current.bio.clone(),
                    oninput: move |evt| form.write().bio = evt.value(),
                }
            }

            div {
                class: "modal-actions",
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: saving,
                    if saving { "Saving…" } else { "{submit_label}" }
                }
                button {
                    class: "btn btn-outline",
                    r#type: "button",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}
