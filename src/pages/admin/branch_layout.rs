//! Branch layout shell.
//!
//! The shell loads the branch header and tab bar once; the `tab` decides
//! which child screen fills its slot. Child screens are the same resource
//! screens used unfiltered elsewhere, scoped to this branch.

use leptos::prelude::*;

use super::employees::EmployeesPage;
use super::requests::RequestsPage;
use super::trucks::TrucksPage;
use crate::net::api::{self, BranchDashboard};
use crate::net::client::ApiClient;
use crate::net::types::Branch;
use crate::pages::{Loadable, screen_cancel_token, settle, spawn};
use crate::routes::BranchTab;

#[component]
pub fn BranchLayout(client: ApiClient, branch_id: i64, tab: BranchTab) -> impl IntoView {
    let cancel = screen_cancel_token();
    let branch = RwSignal::new(Loadable::<Branch>::Loading);

    let pending = api::fetch_branch(&client, branch_id, &cancel);
    spawn(async move { settle(branch, pending.await) });

    let slot = match tab {
        BranchTab::Dashboard => view! { <BranchDashboardPage client=client branch_id=branch_id/> }.into_any(),
        BranchTab::Trucks => view! { <TrucksPage client=client branch_id=branch_id/> }.into_any(),
        BranchTab::Employees => view! { <EmployeesPage client=client branch_id=branch_id/> }.into_any(),
        BranchTab::Requests => view! { <RequestsPage client=client branch_id=branch_id/> }.into_any(),
    };

    view! {
        <section class="branch-layout">
            <header class="branch-layout__header">
                <a href="/admin/sucursales">"← Branches"</a>
                <h1>{move || match branch.get() {
                    Loadable::Ready(branch) => format!("{} ({})", branch.name, branch.city),
                    Loadable::Loading => "Loading branch...".to_owned(),
                    Loadable::Failed(message) => message,
                }}</h1>
            </header>
            <nav class="branch-layout__tabs">
                {BranchTab::ALL.into_iter().map(|item| view! {
                    <a
                        class="branch-layout__tab"
                        class:branch-layout__tab--active={item == tab}
                        href=item.href(branch_id)
                    >
                        {item.label()}
                    </a>
                }).collect_view()}
            </nav>
            <div class="branch-layout__slot">{slot}</div>
        </section>
    }
}

/// Summary cards for one branch.
#[component]
pub fn BranchDashboardPage(client: ApiClient, branch_id: i64) -> impl IntoView {
    let cancel = screen_cancel_token();
    let dashboard = RwSignal::new(Loadable::<BranchDashboard>::Loading);

    let pending = api::fetch_branch_dashboard(&client, branch_id, &cancel);
    spawn(async move { settle(dashboard, pending.await) });

    move || match dashboard.get() {
        Loadable::Loading => view! { <p>"Loading branch data..."</p> }.into_any(),
        Loadable::Failed(_) => view! { <p class="admin__error">"Branch not found."</p> }.into_any(),
        Loadable::Ready(data) => {
            let summary = data.summary();
            view! {
                <div class="dashboard-grid">
                    <div class="dashboard-card">
                        <h2>{format!("Trucks ({})", summary.trucks)}</h2>
                        <p>{format!("{} available", summary.available_trucks)}</p>
                        <ul>
                            {data.trucks.into_iter().map(|truck| view! {
                                <li>{format!("{} · {}", truck.plate, truck.capacity.label())}</li>
                            }).collect_view()}
                        </ul>
                    </div>
                    <div class="dashboard-card">
                        <h2>{format!("Employees ({})", summary.employees)}</h2>
                        <p>{format!("{} drivers", summary.drivers)}</p>
                        <ul>
                            {data.employees.into_iter().map(|employee| view! {
                                <li>{format!("{} · {}", employee.user.username, employee.role.label())}</li>
                            }).collect_view()}
                        </ul>
                    </div>
                    <div class="dashboard-card">
                        <h2>{format!("Requests ({})", summary.requests)}</h2>
                        <p>{format!("{} open", summary.open_requests)}</p>
                        <ul>
                            {data.requests.into_iter().map(|request| view! {
                                <li>{format!("{} → {} · {}", request.origin, request.destination, request.status.label())}</li>
                            }).collect_view()}
                        </ul>
                    </div>
                </div>
            }
            .into_any()
        }
    }
}
