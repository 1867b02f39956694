use leptos::prelude::*;

use crate::app::AppContext;
use crate::format::{initials, mask_mobile_number, EMPTY};

const PREFERENCES: [(&str, &str); 3] = [
    (
        "Plan Alerts",
        "Get notified when your favourite plans drop price or data boosts are available.",
    ),
    (
        "Payment Safety Lock",
        "Two-step verification for new payment methods and high-value recharges.",
    ),
    (
        "Smart Recommendations",
        "Curation of best-fit plans based on usage trends.",
    ),
];

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session_state = expect_context::<AppContext>().session_state;
    let user = move || session_state.with(|state| state.user.clone().unwrap_or_default());

    view! {
        <div class="profile-page">
            <section class="dashboard-hero">
                <div>
                    <h1 class="dashboard-hero__title">"Profile overview"</h1>
                    <p class="dashboard-hero__subtitle">
                        "Manage your RechargeX identity, security preferences, and personalization controls."
                    </p>
                </div>
            </section>

            <section class="section">
                {move || {
                    let user = user();
                    let avatar = initials(&user.name).unwrap_or_else(|| "RX".to_string());
                    let name = if user.name.trim().is_empty() { EMPTY.to_string() } else { user.name };
                    let email = if user.email.is_empty() { EMPTY.to_string() } else { user.email };
                    view! {
                        <div class="profile-card">
                            <div class="dashboard-shell__avatar profile-card__avatar" aria-hidden="true">{avatar}</div>
                            <div>
                                <div class="profile-card__name">{name}</div>
                                <div class="muted">{email}</div>
                                <div class="muted">{mask_mobile_number(user.mobile_number.as_deref())}</div>
                            </div>
                        </div>
                    }
                }}
            </section>

            <section class="section">
                <header>
                    <h2 class="section__title">"Personalization"</h2>
                    <p class="muted">"Tailor your RechargeX experience with intelligent preferences and insights."</p>
                </header>
                <div class="quick-actions">
                    {PREFERENCES
                        .into_iter()
                        .map(|(title, description)| view! {
                            <div class="quick-card">
                                <div class="quick-card__title">{title}</div>
                                <p class="muted">{description}</p>
                                <span class="status-chip status-chip--default">"Enabled"</span>
                            </div>
                        })
                        .collect_view()}
                </div>
            </section>
        </div>
    }
}
