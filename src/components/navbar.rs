//! Top navigation bars.
//!
//! DESIGN
//! ======
//! Links are derived from the session signal so they follow login and
//! logout without a reload. Hidden links are convenience only; the route
//! guards and the API still decide access.

#[cfg(test)]
#[path = "navbar_test.rs"]
mod navbar_test;

use leptos::prelude::*;

use crate::state::session::{Session, SessionState};

/// A navigation link as rendered in the bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

const fn link(href: &'static str, label: &'static str) -> NavLink {
    NavLink { href, label }
}

pub(crate) fn public_links(state: &SessionState) -> Vec<NavLink> {
    let mut links = vec![link("/", "Home"), link("/informacion", "Services"), link("/contacto", "Contact")];
    if state.is_authenticated() {
        links.push(link("/mis-pedidos", "My requests"));
    }
    if state.is_elevated() {
        links.push(link("/admin/sucursales", "Admin"));
    }
    links
}

/// Hint shown next to the username once the token's embedded expiry has
/// passed. The session itself stays signed in until an API call fails.
pub(crate) fn expiry_hint(state: &SessionState, now_secs: Option<i64>) -> Option<&'static str> {
    let now = now_secs?;
    state
        .identity()
        .filter(|identity| identity.is_expired_at(now))
        .map(|_| "Session expired, sign in again")
}

#[cfg(feature = "csr")]
#[allow(clippy::cast_possible_truncation)]
fn now_secs() -> Option<i64> {
    Some((js_sys::Date::now() / 1000.0) as i64)
}

#[cfg(not(feature = "csr"))]
fn now_secs() -> Option<i64> {
    let elapsed = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).ok()?;
    i64::try_from(elapsed.as_secs()).ok()
}

pub(crate) fn admin_links() -> Vec<NavLink> {
    vec![
        link("/admin/sucursales", "Branches"),
        link("/admin/camiones", "Trucks"),
        link("/admin/empleados", "Employees"),
        link("/admin/pedidos", "Requests"),
        link("/", "Public site"),
    ]
}

#[component]
pub fn Navbar(session: Session, #[prop(optional)] admin: bool) -> impl IntoView {
    let state = session.signal();
    let on_logout = move |_: leptos::ev::MouseEvent| session.logout();

    view! {
        <nav class="navbar" class:navbar--admin=admin>
            <a class="navbar__brand" href={if admin { "/admin/sucursales" } else { "/" }}>
                {if admin { "ACME TRANS · Admin" } else { "ACME TRANS" }}
            </a>
            <div class="navbar__links">
                {move || {
                    let links = if admin { admin_links() } else { state.with(public_links) };
                    links
                        .into_iter()
                        .map(|item| view! { <a class="navbar__link" href=item.href>{item.label}</a> })
                        .collect_view()
                }}
            </div>
            <div class="navbar__session">
                <Show
                    when=move || state.with(SessionState::is_authenticated)
                    fallback=|| view! {
                        <a class="navbar__link" href="/login">"Sign in"</a>
                        <a class="button" href="/registro">"Register"</a>
                    }
                >
                    <span class="navbar__user">
                        {move || state.with(|s| s.identity().map(|identity| identity.username.clone()).unwrap_or_default())}
                    </span>
                    {move || {
                        state
                            .with(|s| expiry_hint(s, now_secs()))
                            .map(|hint| view! { <span class="navbar__hint">{hint}</span> })
                    }}
                    <button class="button button--secondary" on:click=on_logout.clone()>"Sign out"</button>
                </Show>
            </div>
        </nav>
    }
}
