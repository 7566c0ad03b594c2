//! Staff screen: search, hire, reassign, remove.

use leptos::prelude::*;

use super::forms::{EmployeeForm, EmployeeSubmission, parse_optional_id};
use crate::net::api;
use crate::net::client::ApiClient;
use crate::net::types::{Branch, EmployeeRead, EmployeeRole};
use crate::pages::{Loadable, screen_cancel_token, settle, spawn};
use crate::util::filter::filter_rows;

#[component]
pub fn EmployeesPage(client: ApiClient, #[prop(optional)] branch_id: Option<i64>) -> impl IntoView {
    let cancel = screen_cancel_token();
    let employees = RwSignal::new(Loadable::<Vec<EmployeeRead>>::Loading);
    let branches = RwSignal::new(Vec::<Branch>::new());
    let query = RwSignal::new(String::new());
    let form = RwSignal::new(None::<EmployeeForm>);
    let info = RwSignal::new(String::new());

    let reload = {
        let client = client.clone();
        let cancel = cancel.clone();
        move || {
            let pending = api::list_employees(&client, branch_id, &cancel);
            spawn(async move { settle(employees, pending.await) });
        }
    };
    reload();

    {
        let pending = api::list_branches(&client, &cancel);
        spawn(async move {
            match pending.await {
                Ok(list) => branches.set(list),
                Err(e) if e.is_cancelled() => {}
                Err(e) => info.set(format!("Could not load branches: {e}")),
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
            let pending = match current.validate() {
                Ok(EmployeeSubmission::Create(employee)) => api::create_employee(&client, &employee, &cancel),
                Ok(EmployeeSubmission::Update(id, update)) => api::update_employee(&client, id, &update, &cancel),
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
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
        move |employee_id: i64| {
            let pending = api::delete_employee(&client, employee_id, &cancel);
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
                <h2>"Employees"</h2>
                <input class="admin__search" type="search" placeholder="Search name, email, role or branch"
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev)) />
                <button class="button" on:click=move |_| form.set(Some(EmployeeForm::new(branch_id)))>
                    "New employee"
                </button>
            </div>
            <Show when=move || !info.get().is_empty()>
                <p class="admin__error">{move || info.get()}</p>
            </Show>
            {move || form.get().map(|current| {
                let creating = current.editing.is_none();
                view! {
                    <form class="admin__form" on:submit=on_save.clone()>
                        <h3>{if creating { "New employee".to_owned() } else { format!("Edit {}", current.username) }}</h3>
                        <Show when=move || creating>
                            <input type="text" placeholder="Username"
                                on:input=move |ev| form.update(|f| if let Some(f) = f { f.username = event_target_value(&ev) }) />
                            <input type="email" placeholder="Email"
                                on:input=move |ev| form.update(|f| if let Some(f) = f { f.email = event_target_value(&ev) }) />
                            <input type="password" placeholder="Password"
                                on:input=move |ev| form.update(|f| if let Some(f) = f { f.password = event_target_value(&ev) }) />
                        </Show>
                        <select on:change=move |ev| {
                            let code = event_target_value(&ev);
                            form.update(|f| if let (Some(f), Some(role)) = (f, EmployeeRole::from_code(&code)) { f.role = role });
                        }>
                            {EmployeeRole::ALL.iter().map(|role| view! {
                                <option value=role.code() selected={*role == current.role}>{role.label()}</option>
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
                        <div class="admin__form-actions">
                            <button type="button" on:click=move |_| form.set(None)>"Cancel"</button>
                            <button class="button" type="submit">{if creating { "Create" } else { "Update" }}</button>
                        </div>
                    </form>
                }
            })}
            {move || match employees.get() {
                Loadable::Loading => view! { <p>"Loading employees..."</p> }.into_any(),
                Loadable::Failed(message) => view! { <p class="admin__error">{message}</p> }.into_any(),
                Loadable::Ready(list) => {
                    let needle = query.get();
                    let rows: Vec<EmployeeRead> = filter_rows(&list, &needle).into_iter().cloned().collect();
                    view! {
                        <table class="admin__table">
                            <thead>
                                <tr><th>"Username"</th><th>"Email"</th><th>"Role"</th><th>"Branch"</th><th></th></tr>
                            </thead>
                            <tbody>
                                {rows.into_iter().map(|row| {
                                    let id = row.id;
                                    let edit_row = row.clone();
                                    let on_delete = on_delete.clone();
                                    view! {
                                        <tr>
                                            <td>{row.user.username}</td>
                                            <td>{row.user.email}</td>
                                            <td>{row.role.label()}</td>
                                            <td>{row.branch}</td>
                                            <td>
                                                <button on:click=move |_| {
                                                    form.set(Some(EmployeeForm::edit(&edit_row, &branches.get_untracked())));
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
