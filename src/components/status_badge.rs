use leptos::prelude::*;

use crate::format::status_meta;
use crate::models::TxStatus;

#[component]
pub fn StatusBadge(#[prop(into)] status: Signal<Option<TxStatus>>) -> impl IntoView {
    let meta = move || status_meta(status.get());

    view! {
        <span class=move || format!("badge status-badge--{}", meta().tone)>
            {move || meta().label}
        </span>
    }
}
