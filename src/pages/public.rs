//! Public marketing screens.

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <section class="hero">
            <h1>"ACME TRANS"</h1>
            <p class="hero__lead">"Freight transport across southern Chile, from our branches to your door."</p>
            <div class="hero__actions">
                <a class="button" href="/registro">"Create an account"</a>
                <a class="button button--secondary" href="/informacion">"Our services"</a>
            </div>
        </section>
    }
}

#[component]
pub fn InformationPage() -> impl IntoView {
    view! {
        <section class="content">
            <h1>"Services"</h1>
            <ul class="content__list">
                <li>"Medium and large capacity trucks based at every branch."</li>
                <li>"Quotes on request: submit a freight request and we answer with a price."</li>
                <li>"Track the status of each request from your account."</li>
            </ul>
        </section>
    }
}

#[component]
pub fn ContactPage() -> impl IntoView {
    view! {
        <section class="content">
            <h1>"Contact"</h1>
            <p>"Write to contacto@acmetrans.cl or visit your nearest branch."</p>
        </section>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="content">
            <h1>"Page not found."</h1>
            <a href="/">"Back to home"</a>
        </section>
    }
}
