//! Truck fleet screen: search, create, edit, delete.

use leptos::prelude::*;

use super::forms::{TruckForm, parse_optional_id};
use crate::net::api;
use crate::net::client::ApiClient;
use crate::net::types::{Branch, DriverOption, TruckCapacity, TruckRead};
use crate::pages::{Loadable, screen_cancel_token, settle, spawn};
use crate::util::filter::filter_rows;

#[component]
pub fn TrucksPage(client: ApiClient, #[prop(optional)] branch_id: Option<i64>) -> impl IntoView {
    let cancel = screen_cancel_token();
    let trucks = RwSignal::new(Loadable::<Vec<TruckRead>>::Loading);
    let branches = RwSignal::new(Vec::<Branch>::new());
    let drivers = RwSignal::new(Vec::<DriverOption>::new());
    let query = RwSignal::new(String::new());
    let form = RwSignal::new(None::<TruckForm>);
    let info = RwSignal::new(String::new());

    let reload = {
        let client = client.clone();
        let cancel = cancel.clone();
        move || {
            let pending = api::list_trucks(&client, branch_id, &cancel);
            spawn(async move { settle(trucks, pending.await) });
        }
    };
    reload();

    {
        let branch_list = api::list_branches(&client, &cancel);
        let driver_list = api::list_drivers(&client, &cancel);
        spawn(async move {
            match futures::future::try_join(branch_list, driver_list).await {
                Ok((b, d)) => {
                    branches.set(b);
                    drivers.set(d);
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => info.set(format!("Could not load form data: {e}")),
            }
        });
    }

    let on_save = {
        let client = client.clone();
        let cancel = cancel.clone();
        let reload = reload.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let Some(current) = form.get() else {
                return;
            };
            let truck = match current.validate() {
                Ok(truck) => truck,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };
            let pending = match current.editing {
                Some(id) => api::update_truck(&client, id, &truck, &cancel),
                None => api::create_truck(&client, &truck, &cancel),
            };
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
        }
    };

    let on_delete = {
        let reload = reload.clone();
        move |truck_id: i64| {
            let pending = api::delete_truck(&client, truck_id, &cancel);
            let reload = reload.clone();
            spawn(async move {
                match pending.await {
                    Ok(()) => reload(),
                    Err(e) => info.set(api::admin_error_message(&e)),
                }
            });
        }
    };

    view! {
        <section class="admin">
            <div class="admin__toolbar">
                <h2>"Trucks"</h2>
                <input class="admin__search" type="search" placeholder="Search plate, branch or driver"
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev)) />
                <button class="button" on:click=move |_| form.set(Some(TruckForm::new(branch_id)))>
                    "New truck"
                </button>
            </div>
            <Show when=move || !info.get().is_empty()>
                <p class="admin__error">{move || info.get()}</p>
            </Show>
            {move || form.get().map(|current| view! {
                <form class="admin__form" on:submit=on_save.clone()>
                    <h3>{if current.editing.is_some() { "Edit truck" } else { "New truck" }}</h3>
                    <input type="text" placeholder="Plate"
                        prop:value=current.plate.clone()
                        on:input=move |ev| form.update(|f| if let Some(f) = f { f.plate = event_target_value(&ev) }) />
                    <select on:change=move |ev| {
                        let code = event_target_value(&ev);
                        form.update(|f| if let (Some(f), Some(capacity)) = (f, TruckCapacity::from_code(&code)) { f.capacity = capacity });
                    }>
                        {TruckCapacity::ALL.iter().map(|capacity| view! {
                            <option value=capacity.code() selected={*capacity == current.capacity}>{capacity.label()}</option>
                        }).collect_view()}
                    </select>
                    <select on:change=move |ev| {
                        let id = parse_optional_id(&event_target_value(&ev));
                        form.update(|f| if let Some(f) = f { f.branch_id = id });
                    }>
                        <option value="">"Select branch"</option>
                        {branches.get().into_iter().map(|branch| view! {
                            <option value=branch.id.to_string() selected={current.branch_id == Some(branch.id)}>{branch.name}</option>
                        }).collect_view()}
                    </select>
                    <select on:change=move |ev| {
                        let id = parse_optional_id(&event_target_value(&ev));
                        form.update(|f| if let Some(f) = f { f.driver_id = id });
                    }>
                        <option value="">"(Unassigned)"</option>
                        {drivers.get().into_iter().map(|driver| view! {
                            <option value=driver.id.to_string() selected={current.driver_id == Some(driver.id)}>{driver.username}</option>
                        }).collect_view()}
                    </select>
                    <div class="admin__form-actions">
                        <button type="button" on:click=move |_| form.set(None)>"Cancel"</button>
                        <button class="button" type="submit">
                            {if current.editing.is_some() { "Update" } else { "Create" }}
                        </button>
                    </div>
                </form>
            })}
            {move || match trucks.get() {
                Loadable::Loading => view! { <p>"Loading trucks..."</p> }.into_any(),
                Loadable::Failed(message) => view! { <p class="admin__error">{message}</p> }.into_any(),
                Loadable::Ready(list) => {
                    let needle = query.get();
                    let rows: Vec<TruckRead> = filter_rows(&list, &needle).into_iter().cloned().collect();
                    view! {
                        <table class="admin__table">
                            <thead>
                                <tr><th>"Plate"</th><th>"Capacity"</th><th>"Branch"</th><th>"Driver"</th><th></th></tr>
                            </thead>
                            <tbody>
                                {rows.into_iter().map(|row| {
                                    let id = row.id;
                                    let edit_row = row.clone();
                                    let on_delete = on_delete.clone();
                                    view! {
                                        <tr>
                                            <td>{row.plate}</td>
                                            <td>{row.capacity.label()}</td>
                                            <td>{row.branch}</td>
                                            <td>{row.driver.unwrap_or_else(|| "Unassigned".to_owned())}</td>
                                            <td>
                                                <button on:click=move |_| {
                                                    let next = TruckForm::edit(&edit_row, &branches.get_untracked(), &drivers.get_untracked());
                                                    form.set(Some(next));
                                                }>"Edit"</button>
                                                <button on:click=move |_| on_delete(id)>"Delete"</button>
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
