//! Branch picker: entry point of the admin console.

use leptos::prelude::*;

use crate::net::api;
use crate::net::client::ApiClient;
use crate::net::types::Branch;
use crate::pages::{Loadable, screen_cancel_token, settle, spawn};
use crate::routes::BranchTab;

#[component]
pub fn BranchesPage(client: ApiClient) -> impl IntoView {
    let cancel = screen_cancel_token();
    let branches = RwSignal::new(Loadable::<Vec<Branch>>::Loading);

    let pending = api::list_branches(&client, &cancel);
    spawn(async move { settle(branches, pending.await) });

    view! {
        <section class="admin">
            <h1>"Branches"</h1>
            {move || match branches.get() {
                Loadable::Loading => view! { <p>"Loading branches..."</p> }.into_any(),
                Loadable::Failed(message) => view! { <p class="admin__error">{message}</p> }.into_any(),
                Loadable::Ready(list) => view! {
                    <div class="admin__cards">
                        {list.into_iter().map(|branch| view! {
                            <a class="branch-card" href=BranchTab::Dashboard.href(branch.id)>
                                <span class="branch-card__name">{branch.name}</span>
                                <span class="branch-card__city">{branch.city}</span>
                            </a>
                        }).collect_view()}
                    </div>
                }.into_any(),
            }}
        </section>
    }
}
