use leptos::prelude::*;

use crate::catalog::operator_logo;
use crate::models::{Operator, ServiceType};

/// Selectable operator tile for the recharge form
#[component]
pub fn OperatorCard(
    operator: Operator,
    service_type: ServiceType,
    #[prop(into)] active: Signal<bool>,
    on_select: Callback<Operator>,
) -> impl IntoView {
    let logo = operator_logo(&operator, Some(service_type));
    let alt = format!("{} logo", operator.name);
    let name = operator.name.clone();
    let code = operator.code.clone();

    view! {
        <button
            type="button"
            class=move || if active.get() { "operator-card is-active" } else { "operator-card" }
            aria-pressed=move || active.get().to_string()
            on:click=move |_| on_select.run(operator.clone())
        >
            <div class="operator-card__logo" aria-hidden="true">
                <img src=logo alt=alt loading="lazy"/>
            </div>
            <div>
                <div class="operator-card__name">{name}</div>
                <div class="muted">"Code: "{code}</div>
            </div>
        </button>
    }
}
