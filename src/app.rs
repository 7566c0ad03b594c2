//! Root application component: builds the session and the shared request
//! client, then routes through the explicit table in `routes`.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` is the only place that constructs a `Session` or an `ApiClient`.
//! Both are handed down as props. The router shell watches the session's
//! navigation signal and turns each request into a route change.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::NavigateOptions;
use leptos_router::components::{Redirect, Router};
use leptos_router::hooks::{use_location, use_navigate};

use crate::components::navbar::Navbar;
use crate::config::ClientConfig;
use crate::net::client::ApiClient;
use crate::net::transport::platform_transport;
use crate::pages::admin::branch_layout::BranchLayout;
use crate::pages::admin::branches::BranchesPage;
use crate::pages::admin::employees::EmployeesPage;
use crate::pages::admin::requests::RequestsPage;
use crate::pages::admin::trucks::TrucksPage;
use crate::pages::login::LoginPage;
use crate::pages::my_requests::MyRequestsPage;
use crate::pages::public::{ContactPage, HomePage, InformationPage, NotFoundPage};
use crate::pages::register::RegisterPage;
use crate::routes::{Resolution, Screen, resolve};
use crate::state::session::Session;
use crate::util::token_store::platform_store;

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env();
    let transport = platform_transport();
    let session = Session::restore(&config, platform_store(config.storage_key()), transport.clone());
    let client = ApiClient::new(&config, transport);
    client.attach_session(&session);
    log::info!("app: api base {}", config.api_base_url());

    view! {
        <Title text="ACME TRANS"/>
        <Router>
            <AppShell session=session client=client/>
        </Router>
    }
}

/// Navbar plus the routed screen. Must sit inside `<Router>`.
#[component]
fn AppShell(session: Session, client: ApiClient) -> impl IntoView {
    let navigate = use_navigate();
    let navigation = session.navigation();
    Effect::new(move || {
        if let Some(request) = navigation.get() {
            navigate(request.to, NavigateOptions::default());
        }
    });

    let location = use_location();
    let state = session.signal();
    let resolution = Memo::new(move |_| {
        let path = location.pathname.get();
        state.with(|current| resolve(&path, current))
    });

    move || {
        let session = session.clone();
        let client = client.clone();
        match resolution.get() {
            Resolution::Render(screen) => {
                let admin = screen.is_admin();
                view! {
                    <Navbar session=session.clone() admin=admin/>
                    <main class="app-main">{render_screen(screen, session, client)}</main>
                }
                .into_any()
            }
            Resolution::Redirect(to) => view! {
                <Redirect
                    path=to
                    options=NavigateOptions {
                        replace: true,
                        ..NavigateOptions::default()
                    }
                />
            }
            .into_any(),
            Resolution::NotFound => view! {
                <Navbar session=session/>
                <main class="app-main"><NotFoundPage/></main>
            }
            .into_any(),
        }
    }
}

fn render_screen(screen: Screen, session: Session, client: ApiClient) -> AnyView {
    match screen {
        Screen::Home => view! { <HomePage/> }.into_any(),
        Screen::Information => view! { <InformationPage/> }.into_any(),
        Screen::Contact => view! { <ContactPage/> }.into_any(),
        Screen::Register => view! { <RegisterPage client=client/> }.into_any(),
        Screen::Login => view! { <LoginPage session=session/> }.into_any(),
        Screen::MyRequests => view! { <MyRequestsPage client=client/> }.into_any(),
        Screen::Branches => view! { <BranchesPage client=client/> }.into_any(),
        Screen::Branch { branch_id, tab } => {
            view! { <BranchLayout client=client branch_id=branch_id tab=tab/> }.into_any()
        }
        Screen::Trucks => view! { <TrucksPage client=client/> }.into_any(),
        Screen::Employees => view! { <EmployeesPage client=client/> }.into_any(),
        Screen::Requests => view! { <RequestsPage client=client/> }.into_any(),
    }
}
