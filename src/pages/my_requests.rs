//! Client request portal: submit a freight request and follow its status.

#[cfg(test)]
#[path = "my_requests_test.rs"]
mod my_requests_test;

use leptos::prelude::*;

use super::{Loadable, screen_cancel_token, spawn};
use crate::net::api;
use crate::net::client::ApiClient;
use crate::net::types::{Branch, ClientRequest, NewClientRequest};

const DEFAULT_CARGO_TYPE: &str = "General";

/// Raw form fields as typed by the client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RequestForm {
    pub origin_branch_id: Option<i64>,
    pub destination: String,
    pub cargo_type: String,
    pub cargo_details: String,
    pub desired_date: String,
}

impl RequestForm {
    fn blank(first_branch: Option<i64>) -> Self {
        Self {
            origin_branch_id: first_branch,
            cargo_type: DEFAULT_CARGO_TYPE.to_owned(),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<NewClientRequest, &'static str> {
        let Some(origin_branch_id) = self.origin_branch_id else {
            return Err("Select an origin branch.");
        };
        let destination = self.destination.trim();
        let cargo_type = self.cargo_type.trim();
        if destination.is_empty() || cargo_type.is_empty() || self.desired_date.trim().is_empty() {
            return Err("Destination, date and cargo type are required.");
        }
        Ok(NewClientRequest {
            origin_branch_id,
            destination: destination.to_owned(),
            cargo_type: cargo_type.to_owned(),
            cargo_details: self.cargo_details.trim().to_owned(),
            desired_date: self.desired_date.trim().to_owned(),
        })
    }
}

/// Branch name for a request, falling back to a generic label.
pub(crate) fn origin_name(branches: &[Branch], branch_id: i64) -> &str {
    branches
        .iter()
        .find(|branch| branch.id == branch_id)
        .map_or("Branch", |branch| branch.name.as_str())
}

#[component]
pub fn MyRequestsPage(client: ApiClient) -> impl IntoView {
    let cancel = screen_cancel_token();
    let branches = RwSignal::new(Vec::<Branch>::new());
    let requests = RwSignal::new(Loadable::<Vec<ClientRequest>>::Loading);
    let form = RwSignal::new(RequestForm::blank(None));
    let info = RwSignal::new(String::new());

    {
        let pending = api::list_branches(&client, &cancel);
        spawn(async move {
            match pending.await {
                Ok(list) => {
                    let first = list.first().map(|branch| branch.id);
                    form.update(|f| f.origin_branch_id = f.origin_branch_id.or(first));
                    branches.set(list);
                }
                Err(e) => log::warn!("my requests: branch list unavailable: {e}"),
            }
        });
    }

    let reload = {
        let client = client.clone();
        let cancel = cancel.clone();
        move || {
            let pending = api::list_my_requests(&client, &cancel);
            spawn(async move {
                let result = pending.await;
                if let Some(next) = Loadable::from_result(result, |e| api::my_requests_error_message(e).to_owned()) {
                    requests.set(next);
                }
            });
        }
    };
    reload();

    let on_submit = {
        let reload = reload.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let payload = match form.with(RequestForm::validate) {
                Ok(payload) => payload,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };
            info.set(String::new());
            let pending = api::create_my_request(&client, &payload, &cancel);
            let reload = reload.clone();
            spawn(async move {
                match pending.await {
                    Ok(()) => {
                        let first = branches.with_untracked(|list| list.first().map(|branch| branch.id));
                        form.set(RequestForm::blank(first));
                        reload();
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => {
                        log::warn!("my requests: submit failed: {e}");
                        info.set("Could not send the request.".to_owned());
                    }
                }
            });
        }
    };

    view! {
        <div class="portal">
            <form class="portal__form" on:submit=on_submit>
                <h2>"Request a quote"</h2>
                <label>"Origin branch"</label>
                <select on:change=move |ev| {
                    let value = event_target_value(&ev).parse::<i64>().ok();
                    form.update(|f| f.origin_branch_id = value);
                }>
                    {move || branches.get().into_iter().map(|branch| {
                        let selected = form.with(|f| f.origin_branch_id == Some(branch.id));
                        view! {
                            <option value=branch.id.to_string() selected=selected>
                                {format!("{} ({})", branch.name, branch.city)}
                            </option>
                        }
                    }).collect_view()}
                </select>
                <label>"Destination"</label>
                <input type="text"
                    prop:value=move || form.with(|f| f.destination.clone())
                    on:input=move |ev| form.update(|f| f.destination = event_target_value(&ev)) />
                <label>"Desired date"</label>
                <input type="date"
                    prop:value=move || form.with(|f| f.desired_date.clone())
                    on:input=move |ev| form.update(|f| f.desired_date = event_target_value(&ev)) />
                <label>"Cargo type"</label>
                <input type="text"
                    prop:value=move || form.with(|f| f.cargo_type.clone())
                    on:input=move |ev| form.update(|f| f.cargo_type = event_target_value(&ev)) />
                <label>"Details (weight, dimensions, etc.)"</label>
                <textarea
                    prop:value=move || form.with(|f| f.cargo_details.clone())
                    on:input=move |ev| form.update(|f| f.cargo_details = event_target_value(&ev))
                ></textarea>
                <button class="button" type="submit">"Send request"</button>
                <Show when=move || !info.get().is_empty()>
                    <p class="portal__error">{move || info.get()}</p>
                </Show>
            </form>
            <section class="portal__list">
                <h2>"My requests"</h2>
                {move || match requests.get() {
                    Loadable::Loading => view! { <p>"Loading..."</p> }.into_any(),
                    Loadable::Failed(message) => view! { <p class="portal__error">{message}</p> }.into_any(),
                    Loadable::Ready(list) if list.is_empty() => view! { <p>"You have no active requests."</p> }.into_any(),
                    Loadable::Ready(list) => {
                        let names = branches.get();
                        list.into_iter().map(|request| {
                            let route = format!("{} → {}", origin_name(&names, request.origin_branch_id), request.destination);
                            view! {
                                <div class="portal__item">
                                    <span class="portal__route">{route}</span>
                                    <span class="badge">{request.status.label()}</span>
                                    <p>"Cargo: " {request.cargo_type}</p>
                                    <p>"Requested: " {request.requested_at.chars().take(10).collect::<String>()}</p>
                                </div>
                            }
                        }).collect_view().into_any()
                    }
                }}
            </section>
        </div>
    }
}
