use leptos::prelude::*;

use crate::components::RechargePanel;

#[component]
pub fn RechargePage() -> impl IntoView {
    view! {
        <div class="recharge-page">
            <header class="section__header">
                <div>
                    <h1 class="dashboard-hero__title">"Start a recharge"</h1>
                    <p class="dashboard-hero__subtitle">
                        "Choose your service, select an operator, and complete your recharge in seconds with our streamlined flow."
                    </p>
                </div>
            </header>

            <RechargePanel/>
        </div>
    }
}
