//! Client self-registration.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;

use crate::net::api;
use crate::net::client::ApiClient;
use crate::net::types::RegistrationPayload;

pub(crate) fn build_registration(
    username: &str,
    email: &str,
    password: &str,
    company: &str,
) -> Result<RegistrationPayload, &'static str> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err("Username, email and password are required.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    let company = company.trim();
    Ok(RegistrationPayload {
        username: username.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        company_name: (!company.is_empty()).then(|| company.to_owned()),
    })
}

#[component]
pub fn RegisterPage(client: ApiClient) -> impl IntoView {
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let company = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let done = RwSignal::new(false);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let payload = match build_registration(&username.get(), &email.get(), &password.get(), &company.get()) {
            Ok(payload) => payload,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set(String::new());
        let pending = api::register(&client, &payload);
        super::spawn(async move {
            match pending.await {
                Ok(()) => done.set(true),
                Err(e) => info.set(e.user_message()),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create account"</h1>
                <Show
                    when=move || done.get()
                    fallback=move || view! {
                        <form class="login-form" on:submit=on_submit.clone()>
                            <input class="login-input" type="text" placeholder="Username"
                                prop:value=move || username.get()
                                on:input=move |ev| username.set(event_target_value(&ev)) />
                            <input class="login-input" type="email" placeholder="Email"
                                prop:value=move || email.get()
                                on:input=move |ev| email.set(event_target_value(&ev)) />
                            <input class="login-input" type="password" placeholder="Password"
                                prop:value=move || password.get()
                                on:input=move |ev| password.set(event_target_value(&ev)) />
                            <input class="login-input" type="text" placeholder="Company (optional)"
                                prop:value=move || company.get()
                                on:input=move |ev| company.set(event_target_value(&ev)) />
                            <button class="login-button" type="submit" disabled=move || busy.get()>
                                "Register"
                            </button>
                        </form>
                    }
                >
                    <p class="login-message">"Registration complete. You can now sign in."</p>
                    <a class="login-button" href="/login">"Go to sign in"</a>
                </Show>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
