use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_query_map};
use leptos_router::NavigateOptions;
use leptos_use::{use_timeout_fn, UseTimeoutFnReturn};

use crate::api::AuthApi;
use crate::app::AppContext;
use crate::components::functions::post_login_target;
use crate::dto::{LoginRequest, SignupRequest};
use crate::tasks::ScopedTask;

/// Delay between a successful signup and the hop to the login page, in ms.
const SIGNUP_REDIRECT_DELAY: f64 = 900.0;

#[component]
fn AuthHeader(title: &'static str, subtitle: &'static str) -> impl IntoView {
    view! {
        <header class="auth-card__header">
            <span class="landing__logo">"⚡ RechargeX"</span>
            <h1 class="auth-card__title">{title}</h1>
            <p class="auth-card__subtitle">{subtitle}</p>
        </header>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let query = use_query_map();
    let navigate = use_navigate();

    let identifier = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);
    let pending = StoredValue::new(None::<ScopedTask>);

    on_cleanup(move || {
        let _ = pending.try_update_value(|task| *task = None);
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        error.set(None);

        let login = LoginRequest {
            identifier: identifier.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        if login.identifier.is_empty() || login.password.trim().is_empty() {
            error.set(Some("Please enter your registered email/mobile and password.".to_string()));
            return;
        }

        let target = post_login_target(query.with_untracked(|query| query.get("redirect")).as_deref());
        let ctx = ctx.clone();
        let navigate = navigate.clone();
        loading.set(true);

        pending.set_value(Some(ScopedTask::spawn(async move {
            match ctx.api.login(&login).await {
                Ok(auth) => {
                    ctx.session.start(auth.token, auth.user, &ctx.api).await;
                    loading.set(false);
                    navigate(
                        &target,
                        NavigateOptions {
                            replace: true,
                            ..Default::default()
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!("Login failed: {e}");
                    error.set(Some(e.to_string()));
                    loading.set(false);
                }
            }
        })));
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <AuthHeader
                    title="Welcome back"
                    subtitle="Fast, secure access to your premium recharge dashboard."
                />

                <form class="auth-form" on:submit=on_submit>
                    <div>
                        <label for="login-identifier">"Mobile Number / Email"</label>
                        <input
                            id="login-identifier"
                            type="text"
                            placeholder="Enter registered mobile or email"
                            autocomplete="username"
                            prop:value=move || identifier.get()
                            on:input=move |ev| identifier.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div>
                        <label for="login-password">"Password"</label>
                        <input
                            id="login-password"
                            type="password"
                            placeholder="Enter password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                            required
                        />
                    </div>

                    {move || error.get().map(|e| view! {
                        <div class="alert alert--danger" role="alert">{e}</div>
                    })}

                    <button type="submit" class="auth-submit" disabled=move || loading.get()>
                        {move || if loading.get() { "Signing in…" } else { "Login" }}
                    </button>
                </form>

                <footer class="auth-card__footer">
                    "New user? "
                    <A href="/signup" attr:aria-label="Create a RechargeX account">"Sign up"</A>
                </footer>
            </div>
        </div>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let navigate = use_navigate();

    let name = RwSignal::new(String::new());
    let mobile_number = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let success = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);
    let pending = StoredValue::new(None::<ScopedTask>);

    // The timer only flips a flag; navigation stays on the view's own owner.
    let redirect_due = RwSignal::new(false);
    let UseTimeoutFnReturn { start, stop, .. } = use_timeout_fn(
        move |_: ()| {
            let _ = redirect_due.try_set(true);
        },
        SIGNUP_REDIRECT_DELAY,
    );
    Effect::new(move |_| {
        if redirect_due.get() {
            navigate(
                "/login",
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    on_cleanup(move || {
        stop();
        let _ = pending.try_update_value(|task| *task = None);
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        error.set(None);
        success.set(None);

        let signup = SignupRequest {
            name: name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            mobile_number: mobile_number.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        if signup.name.is_empty()
            || signup.email.is_empty()
            || signup.mobile_number.is_empty()
            || signup.password.trim().is_empty()
        {
            error.set(Some("Please fill in all fields.".to_string()));
            return;
        }

        let api = ctx.api.clone();
        let start = start.clone();
        loading.set(true);

        pending.set_value(Some(ScopedTask::spawn(async move {
            match api.signup(&signup).await {
                Ok(()) => {
                    tracing::info!("Account created");
                    success.set(Some(
                        "Account created successfully. Please log in to continue.".to_string(),
                    ));
                    start(());
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        })));
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <AuthHeader
                    title="Create your account"
                    subtitle="Unlock personalized recharges, curated plans, and lightning-fast checkouts."
                />

                <form class="auth-form" on:submit=on_submit>
                    <div>
                        <label for="signup-name">"Full Name"</label>
                        <input
                            id="signup-name"
                            name="name"
                            type="text"
                            placeholder="e.g. Tarun Verma"
                            autocomplete="name"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div>
                        <label for="signup-mobile">"Mobile Number"</label>
                        <input
                            id="signup-mobile"
                            name="mobileNumber"
                            type="tel"
                            placeholder="Enter mobile number"
                            autocomplete="tel"
                            pattern="[6-9]\\d{9}"
                            prop:value=move || mobile_number.get()
                            on:input=move |ev| mobile_number.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div>
                        <label for="signup-email">"Email"</label>
                        <input
                            id="signup-email"
                            name="email"
                            type="email"
                            placeholder="Enter email"
                            autocomplete="email"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div>
                        <label for="signup-password">"Password"</label>
                        <input
                            id="signup-password"
                            name="password"
                            type="password"
                            placeholder="Create password"
                            autocomplete="new-password"
                            minlength="6"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                            required
                        />
                    </div>

                    {move || error.get().map(|e| view! {
                        <div class="alert alert--danger" role="alert">{e}</div>
                    })}
                    {move || success.get().map(|message| view! {
                        <div class="alert alert--success" role="status">{message}</div>
                    })}

                    <button type="submit" class="auth-submit" disabled=move || loading.get()>
                        {move || if loading.get() { "Creating account…" } else { "Create Account" }}
                    </button>
                </form>

                <footer class="auth-card__footer">
                    "Already have an account? "
                    <A href="/login" attr:aria-label="Sign in to RechargeX">"Login"</A>
                </footer>
            </div>
        </div>
    }
}
