use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    // Let the server answer with a real 404
    #[cfg(feature = "ssr")]
    {
        if let Some(response) = use_context::<leptos_axum::ResponseOptions>() {
            response.set_status(axum::http::StatusCode::NOT_FOUND);
        }
    }

    view! {
        <div class="notfound">
            <div class="notfound-card">
                <div class="status-chip status-chip--default">"404"</div>
                <h1>"Page not found"</h1>
                <p>
                    "Looks like you ventured beyond RechargeX's grid. Return to the dashboard or explore curated plans crafted for you."
                </p>
                <div class="notfound-card__actions">
                    <A href="/dashboard" attr:class="cta-button primary">"Go to dashboard"</A>
                    <A href="/recharge" attr:class="plan-card-dark__cta">"Browse plans →"</A>
                </div>
            </div>
        </div>
    }
}
