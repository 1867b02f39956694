use leptos::prelude::*;
use leptos_router::components::{Outlet, Redirect, A};
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;

use crate::app::AppContext;
use crate::components::functions::login_path;
use crate::format::initials;

const NAV_ITEMS: [(&str, &str); 4] = [
    ("/dashboard", "Dashboard"),
    ("/recharge", "Recharge"),
    ("/history", "History"),
    ("/profile", "Profile"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Verifying,
    Denied,
    Allowed,
}

/// Wraps every signed-in page. Holds the visitor at a spinner while the
/// session resolves and sends them to login if it does not.
#[component]
pub fn ProtectedLayout() -> impl IntoView {
    let session_state = expect_context::<AppContext>().session_state;
    let location = use_location();

    let gate = Memo::new(move |_| {
        session_state.with(|state| {
            if state.loading {
                Gate::Verifying
            } else if state.is_authenticated() {
                Gate::Allowed
            } else {
                Gate::Denied
            }
        })
    });

    move || match gate.get() {
        Gate::Verifying => view! {
            <div class="auth-page">
                <div class="auth-card auth-card--center">
                    <div class="spinner" aria-hidden="true"></div>
                    <p class="muted">"Verifying session…"</p>
                </div>
            </div>
        }
        .into_any(),
        Gate::Denied => {
            let target = login_path(&location.pathname.get_untracked());
            view! { <Redirect path=target/> }.into_any()
        }
        Gate::Allowed => view! { <DashboardShell/> }.into_any(),
    }
}

#[component]
fn DashboardShell() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let session_state = ctx.session_state;
    let navigate = use_navigate();

    let user_name = move || {
        session_state
            .with(|state| state.user.as_ref().map(|user| user.name.clone()))
            .filter(|name| !name.trim().is_empty())
    };
    let avatar = move || {
        user_name()
            .and_then(|name| initials(&name))
            .unwrap_or_else(|| "RX".to_string())
    };
    let email = move || {
        session_state
            .with(|state| state.user.as_ref().map(|user| user.email.clone()))
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        ctx.session.logout(false);
        navigate(
            "/login",
            NavigateOptions {
                replace: true,
                ..Default::default()
            },
        );
    };

    view! {
        <div class="dashboard-shell">
            <header class="dashboard-shell__nav">
                <span class="dashboard-shell__brand">"⚡ RechargeX"</span>

                <nav class="dashboard-shell__links" aria-label="Primary navigation">
                    {NAV_ITEMS
                        .into_iter()
                        .map(|(href, label)| {
                            view! { <A href=href attr:class="dashboard-shell__link">{label}</A> }
                        })
                        .collect_view()}
                </nav>

                <div class="dashboard-shell__user">
                    <div class="dashboard-shell__avatar" aria-hidden="true">{avatar}</div>
                    <div>
                        <div class="dashboard-shell__name">
                            {move || user_name().unwrap_or_else(|| "RechargeX User".to_string())}
                        </div>
                        <div class="dashboard-shell__email">{email}</div>
                    </div>
                    <button
                        type="button"
                        class="dashboard-shell__logout"
                        aria-label="Log out"
                        on:click=on_logout
                    >
                        "⎋"
                    </button>
                </div>
            </header>

            <main class="dashboard-shell__content">
                <Outlet/>
            </main>
        </div>
    }
}
