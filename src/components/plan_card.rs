use leptos::prelude::*;

use crate::format::format_inr;
use crate::models::Plan;

#[component]
pub fn PlanCard(
    plan: Plan,
    #[prop(into)] active: Signal<bool>,
    on_select: Callback<Plan>,
) -> impl IntoView {
    let price = format_inr(plan.amount);
    let validity = plan.validity.clone().unwrap_or_default();
    let data = plan.data.clone().unwrap_or_default();
    let plan_type = plan.plan_type.clone().unwrap_or_default();
    let description = plan.description.clone().unwrap_or_default();
    let benefits = (!plan.benefits.is_empty()).then(|| {
        let chips = plan
            .benefits
            .iter()
            .map(|benefit| view! { <span class="chip">{benefit.clone()}</span> })
            .collect_view();
        view! { <div class="chips">{chips}</div> }
    });

    view! {
        <button
            type="button"
            class=move || if active.get() { "plan-card is-active" } else { "plan-card" }
            aria-pressed=move || active.get().to_string()
            on:click=move |_| on_select.run(plan.clone())
        >
            <div class="plan-card__price">{price}</div>
            <div class="plan-card__meta">
                <span>{validity}</span>
                <span>{data}</span>
                <span>{plan_type}</span>
            </div>
            <p class="plan-card__description">{description}</p>
            {benefits}
        </button>
    }
}
