//! Freight request desk: filter by status, quote, assign a truck.

use leptos::prelude::*;

use super::forms::{RequestEditForm, parse_optional_id};
use crate::net::api;
use crate::net::client::ApiClient;
use crate::net::types::{AdminRequest, RequestStatus, TruckOption};
use crate::pages::{Loadable, screen_cancel_token, settle, spawn};
use crate::util::filter::filter_requests;

#[component]
pub fn RequestsPage(client: ApiClient, #[prop(optional)] branch_id: Option<i64>) -> impl IntoView {
    let cancel = screen_cancel_token();
    let requests = RwSignal::new(Loadable::<Vec<AdminRequest>>::Loading);
    let trucks = RwSignal::new(Vec::<TruckOption>::new());
    let query = RwSignal::new(String::new());
    let status_filter = RwSignal::new(None::<RequestStatus>);
    let form = RwSignal::new(None::<RequestEditForm>);
    let info = RwSignal::new(String::new());

    let reload = {
        let client = client.clone();
        let cancel = cancel.clone();
        move || {
            let pending = api::list_admin_requests(&client, branch_id, &cancel);
            spawn(async move { settle(requests, pending.await) });
        }
    };
    reload();

    {
        let pending = api::list_truck_options(&client, &cancel);
        spawn(async move {
            match pending.await {
                Ok(list) => trucks.set(list),
                Err(e) if e.is_cancelled() => {}
                Err(e) => info.set(format!("Could not load trucks: {e}")),
            }
        });
    }

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = form.get() else {
            return;
        };
        let update = match current.validate() {
            Ok(update) => update,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        let pending = api::update_admin_request(&client, current.request_id, &update, &cancel);
        let reload = reload.clone();
        spawn(async move {
            match pending.await {
                Ok(()) => {
                    form.set(None);
                    info.set(String::new());
                    reload();
                }
                Err(e) => info.set(api::admin_error_message(&e)),
            }
        });
    };

    view! {
        <section class="admin">
            <div class="admin__toolbar">
                <h2>"Requests"</h2>
                <input class="admin__search" type="search" placeholder="Search client, origin, destination or cargo"
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev)) />
                <select on:change=move |ev| status_filter.set(RequestStatus::from_code(&event_target_value(&ev)))>
                    <option value="">"All statuses"</option>
                    {RequestStatus::ALL.iter().map(|status| view! {
                        <option value=status.code()>{status.label()}</option>
                    }).collect_view()}
                </select>
            </div>
            <Show when=move || !info.get().is_empty()>
                <p class="admin__error">{move || info.get()}</p>
            </Show>
            {move || form.get().map(|current| view! {
                <form class="admin__form" on:submit=on_save.clone()>
                    <h3>{format!("Manage request #{}", current.request_id)}</h3>
                    <select on:change=move |ev| {
                        let code = event_target_value(&ev);
                        form.update(|f| if let (Some(f), Some(status)) = (f, RequestStatus::from_code(&code)) { f.status = status });
                    }>
                        {RequestStatus::ALL.iter().map(|status| view! {
                            <option value=status.code() selected={*status == current.status}>{status.label()}</option>
                        }).collect_view()}
                    </select>
                    <input type="number" step="0.01" placeholder="Quoted price, e.g. 1500.00"
                        prop:value=current.quoted_price.clone()
                        on:input=move |ev| form.update(|f| if let Some(f) = f { f.quoted_price = event_target_value(&ev) }) />
                    <input type="number" step="0.01" placeholder="Estimated cost, e.g. 1000.00"
                        prop:value=current.estimated_cost.clone()
                        on:input=move |ev| form.update(|f| if let Some(f) = f { f.estimated_cost = event_target_value(&ev) }) />
                    <select on:change=move |ev| {
                        let id = parse_optional_id(&event_target_value(&ev));
                        form.update(|f| if let Some(f) = f { f.truck_id = id });
                    }>
                        <option value="">"(No truck)"</option>
                        {trucks.get().into_iter().map(|truck| view! {
                            <option value=truck.id.to_string() selected={current.truck_id == Some(truck.id)}>{truck.display_name}</option>
                        }).collect_view()}
                    </select>
                    <div class="admin__form-actions">
                        <button type="button" on:click=move |_| form.set(None)>"Cancel"</button>
                        <button class="button" type="submit">"Save"</button>
                    </div>
                </form>
            })}
            {move || match requests.get() {
                Loadable::Loading => view! { <p>"Loading requests..."</p> }.into_any(),
                Loadable::Failed(message) => view! { <p class="admin__error">{message}</p> }.into_any(),
                Loadable::Ready(list) => {
                    let needle = query.get();
                    let rows: Vec<AdminRequest> = filter_requests(&list, &needle, status_filter.get())
                        .into_iter()
                        .cloned()
                        .collect();
                    view! {
                        <table class="admin__table">
                            <thead>
                                <tr>
                                    <th>"#"</th><th>"Client"</th><th>"Route"</th><th>"Cargo"</th>
                                    <th>"Date"</th><th>"Status"</th><th>"Price"</th><th>"Truck"</th><th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows.into_iter().map(|row| {
                                    let edit_row = row.clone();
                                    view! {
                                        <tr>
                                            <td>{row.id}</td>
                                            <td>{row.client_username}</td>
                                            <td>{format!("{} → {}", row.origin, row.destination)}</td>
                                            <td>{row.cargo_type}</td>
                                            <td>{row.desired_date}</td>
                                            <td><span class="badge">{row.status.label()}</span></td>
                                            <td>{row.quoted_price.unwrap_or_else(|| "-".to_owned())}</td>
                                            <td>{row.truck.unwrap_or_else(|| "-".to_owned())}</td>
                                            <td>
                                                <button on:click=move |_| {
                                                    form.set(Some(RequestEditForm::edit(&edit_row, &trucks.get_untracked())));
                                                }>"Manage"</button>
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_any()
                }
            }}
        </section>
    }
}
