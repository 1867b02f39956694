use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::{ParentRoute, Route, Router, Routes};
use leptos_router::hooks::use_navigate;
use leptos_router::{path, NavigateOptions};

use crate::api::{ApiClient, ClientConfig, Credential};
use crate::components::ProtectedLayout;
use crate::pages::*;
use crate::recharge::RechargeSummary;
use crate::session::{CredentialStore, Session, SessionEvent, SessionState};
use crate::tasks::spawn_local;

/// SSR shell: provides the full HTML document structure for server-side rendering.
/// The backend URL is rendered into a meta tag for the hydrating client.
#[cfg(feature = "ssr")]
pub fn shell(options: LeptosOptions) -> impl IntoView {
    use crate::components::functions::API_URL_META;

    let api_url = use_context::<ClientConfig>()
        .unwrap_or_default()
        .api_base_url;

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <meta name=API_URL_META content=api_url/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Everything the views share for one visitor.
#[derive(Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub session: Session,
    /// Mirror of the session for reactive reads.
    pub session_state: RwSignal<SessionState>,
    /// Bumped whenever a logout asks for the login page.
    pub login_nonce: RwSignal<u64>,
    /// Summary carried from a submission or retry to the status view.
    pub handoff: RwSignal<Option<(String, RechargeSummary)>>,
}

fn credential_store() -> impl CredentialStore + 'static {
    #[cfg(feature = "ssr")]
    {
        crate::session::MemoryStore::default()
    }
    #[cfg(not(feature = "ssr"))]
    {
        crate::session::BrowserStore
    }
}

impl AppContext {
    fn new(base: &ApiClient) -> Self {
        let credential = Credential::default();
        let session = Session::new(credential_store(), credential.clone());
        let api = base
            .with_credential(credential)
            .with_unauthorized_hook(session.unauthorized_hook());

        let session_state = RwSignal::new(session.state());
        let login_nonce = RwSignal::new(0u64);
        session.subscribe(Arc::new(move |state, event| {
            let _ = session_state.try_set(state.clone());
            if event == (SessionEvent::LoggedOut { redirect: true }) {
                let _ = login_nonce.try_update(|value| *value += 1);
            }
        }));

        Self {
            api,
            session,
            session_state,
            login_nonce,
            handoff: RwSignal::new(None),
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let base = match use_context::<ApiClient>() {
        Some(api) => Ok(api),
        None => ApiClient::new(&use_context::<ClientConfig>().unwrap_or_default(), Credential::default()),
    };
    let base = match base {
        Ok(base) => base,
        Err(e) => {
            tracing::error!("Cannot build backend client: {e}");
            return view! {
                <Title text="RechargeX"/>
                <p class="alert alert--danger">"RechargeX is misconfigured: "{e.to_string()}</p>
            }
            .into_any();
        }
    };

    let ctx = AppContext::new(&base);
    provide_context(ctx.clone());

    // Effects only run in the browser, where the persisted token lives.
    Effect::new(move |_| {
        let ctx = ctx.clone();
        spawn_local(async move {
            ctx.session.restore(&ctx.api).await;
        });
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/rechargex.css"/>
        <Title text="RechargeX"/>
        <Router>
            <LoginRedirect/>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route path=path!("/") view=LandingPage/>
                <Route path=path!("/login") view=LoginPage/>
                <Route path=path!("/signup") view=SignupPage/>
                <ParentRoute path=path!("") view=ProtectedLayout>
                    <Route path=path!("/dashboard") view=DashboardPage/>
                    <Route path=path!("/recharge") view=RechargePage/>
                    <Route path=path!("/history") view=HistoryPage/>
                    <Route path=path!("/profile") view=ProfilePage/>
                    <Route path=path!("/status/:transaction_id") view=StatusPage/>
                </ParentRoute>
            </Routes>
        </Router>
    }
    .into_any()
}

/// Navigate to the login page whenever the session asks for it.
#[component]
fn LoginRedirect() -> impl IntoView {
    let login_nonce = expect_context::<AppContext>().login_nonce;
    let navigate = use_navigate();

    let last_login_nonce = RwSignal::new(login_nonce.get_untracked());
    Effect::new(move |_| {
        let current = login_nonce.get();
        if current != last_login_nonce.get_untracked() {
            last_login_nonce.set(current);
            navigate(
                "/login",
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });
}
