use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::api::RechargeApi;
use crate::app::AppContext;
use crate::components::functions::status_path;
use crate::components::{OperatorCard, PlanCard};
use crate::format::{format_inr, EMPTY};
use crate::models::{Operator, PaymentMethod, Plan, ServiceType};
use crate::recharge::{OperatorQuery, PlanQuery, RechargeForm};
use crate::tasks::{KeyedTask, ScopedTask};

/// The multi-step recharge form. Each dependent fetch runs as a keyed task;
/// changing a selection aborts the fetch issued for the old one.
#[component]
pub fn RechargePanel() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let handoff = ctx.handoff;
    let api = StoredValue::new(ctx.api.clone());
    let navigate = use_navigate();

    let form = RwSignal::new(RechargeForm::new());
    let services_task = StoredValue::new(None::<ScopedTask>);
    let operator_tasks = StoredValue::new(KeyedTask::<OperatorQuery>::new());
    let plan_tasks = StoredValue::new(KeyedTask::<PlanQuery>::new());
    let submit_task = StoredValue::new(None::<ScopedTask>);

    on_cleanup(move || {
        let _ = services_task.try_update_value(|task| *task = None);
        let _ = operator_tasks.try_update_value(KeyedTask::cancel);
        let _ = plan_tasks.try_update_value(KeyedTask::cancel);
        let _ = submit_task.try_update_value(|task| *task = None);
    });

    let load_operators = move |query: OperatorQuery| {
        operator_tasks.update_value(|tasks| {
            tasks.spawn(query, async move {
                let client = api.get_value();
                let result = client.operators(query.service_type).await;
                form.update(|form| {
                    form.apply_operators(query, result);
                });
            })
        });
    };

    // Initial catalog and operator list
    Effect::new(move |_| {
        services_task.set_value(Some(ScopedTask::spawn(async move {
            let client = api.get_value();
            let result = client.services().await;
            form.update(|form| form.apply_services(result));
        })));
        load_operators(form.with_untracked(RechargeForm::operator_query));
    });

    // Plans follow (operator, service, identifier); other edits do not refetch.
    let plan_key = Memo::new(move |_| form.with(RechargeForm::plan_query));
    Effect::new(move |_| {
        plan_key.track();
        match form.try_update(RechargeForm::refresh_plans).flatten() {
            Some(query) => plan_tasks.update_value(|tasks| {
                let key = query.clone();
                tasks.spawn(key, async move {
                    let client = api.get_value();
                    let result = client.plans(&query.operator_code, &query.identifier).await;
                    form.update(|form| {
                        form.apply_plans(&query, result);
                    });
                })
            }),
            None => plan_tasks.update_value(KeyedTask::cancel),
        }
    });

    let select_service = move |service: ServiceType| {
        if let Some(query) = form.try_update(|form| form.select_service(service)) {
            load_operators(query);
        }
    };

    let on_reset = move |_| {
        if let Some(query) = form.try_update(RechargeForm::reset) {
            load_operators(query);
        }
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(request) = form.try_update(RechargeForm::begin_submit).flatten() else {
            return;
        };
        let navigate = navigate.clone();
        submit_task.set_value(Some(ScopedTask::spawn(async move {
            let client = api.get_value();
            let result = client.initiate_recharge(&request).await;
            let submitted = form
                .try_update(|form| form.finish_submit(&request, result))
                .flatten();
            if let Some(submitted) = submitted {
                let path = status_path(&submitted.transaction_id);
                handoff.set(Some((submitted.transaction_id, submitted.summary)));
                navigate(&path, Default::default());
            }
        })));
    };

    let on_select_operator = Callback::new(move |operator: Operator| {
        form.update(|form| form.select_operator(operator));
    });
    let on_select_plan = Callback::new(move |plan: Plan| {
        form.update(|form| form.select_plan(plan));
    });

    let definition = move || form.with(RechargeForm::definition);
    let service = move || form.with(RechargeForm::service);
    let identifier_invalid = move || {
        form.with(|form| !form.identifier().is_empty() && !form.identifier_valid())
    };
    let summary_amount = move || form.with(RechargeForm::summary_amount);

    view! {
        <form class="card" on:submit=on_submit aria-label="Recharge form">
            <div class="card-header">
                <div>
                    <h2 class="card-title">"Recharge details"</h2>
                    <p class="muted">
                        "Pick a service, add account details, and confirm your recharge in seconds."
                    </p>
                </div>
            </div>

            <div class="grid grid--gap">
                <div class="form-group">
                    <label>"Service type"</label>
                    <div class="pill-group" role="radiogroup" aria-label="Select recharge service">
                        <For
                            each=move || form.with(|form| form.services().to_vec())
                            key=|definition| definition.id
                            children=move |definition| {
                                let id = definition.id;
                                let active = move || service() == id;
                                view! {
                                    <button
                                        type="button"
                                        class=move || if active() { "pill-button is-active" } else { "pill-button" }
                                        role="radio"
                                        aria-checked=move || active().to_string()
                                        on:click=move |_| select_service(id)
                                    >
                                        <span aria-hidden="true">{definition.icon}</span>
                                        {definition.name}
                                    </button>
                                }
                            }
                        />
                    </div>
                </div>

                <div class="form-group">
                    <label for="identifier">{move || definition().identifier_label}</label>
                    <input
                        id="identifier"
                        name="identifier"
                        type="text"
                        class="text-input"
                        placeholder=move || definition().identifier_placeholder
                        prop:value=move || form.with(|form| form.identifier().to_string())
                        on:input=move |ev| form.update(|form| form.set_identifier(event_target_value(&ev)))
                        aria-invalid=move || identifier_invalid().to_string()
                        required
                    />
                    <p class="helper-text">{move || definition().identifier_hint}</p>
                    <Show when=identifier_invalid>
                        <p class="error-text">
                            {move || format!("Enter a valid {}.", definition().identifier_label.to_lowercase())}
                        </p>
                    </Show>
                </div>

                <div class="form-group">
                    <label>"Payment method"</label>
                    <div class="pill-group" role="group" aria-label="Select payment method">
                        {PaymentMethod::ALL
                            .into_iter()
                            .map(|method| {
                                let active = move || form.with(|form| form.payment_method() == method);
                                view! {
                                    <button
                                        type="button"
                                        class=move || if active() { "pill-button is-active" } else { "pill-button" }
                                        on:click=move |_| form.update(|form| form.set_payment_method(method))
                                    >
                                        {method.as_str()}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>

                <div>
                    <label class="muted section-label">"Select operator"</label>
                    <Show
                        when=move || !form.with(RechargeForm::loading_operators)
                        fallback=|| view! {
                            <div class="grid grid--3col">
                                {(0..4)
                                    .map(|_| view! { <div class="operator-card skeleton" aria-hidden="true"></div> })
                                    .collect_view()}
                            </div>
                        }
                    >
                        <div class="operator-grid">
                            <For
                                each=move || form.with(|form| form.operators().to_vec())
                                key=|operator| operator.code.clone()
                                children=move |operator| {
                                    let code = operator.code.clone();
                                    let active = Signal::derive(move || {
                                        form.with(|form| form.selected_operator().is_some_and(|o| o.code == code))
                                    });
                                    view! {
                                        <OperatorCard
                                            operator=operator
                                            service_type=service()
                                            active=active
                                            on_select=on_select_operator
                                        />
                                    }
                                }
                            />
                        </div>
                    </Show>
                    {move || {
                        form.with(|form| {
                            if form.loading_operators() {
                                None
                            } else if let Some(operator) = form.selected_operator() {
                                (form.definition().plan_required && !form.identifier_valid()).then(|| {
                                    let message = format!(
                                        "Enter valid account details to fetch plans for {}.",
                                        operator.name
                                    );
                                    view! { <p class="error-text">{message}</p> }.into_any()
                                })
                            } else {
                                Some(view! {
                                    <p class="helper-text">
                                        "Choose your operator to unlock curated plans and offers."
                                    </p>
                                }.into_any())
                            }
                        })
                    }}
                </div>

                <Show
                    when=move || definition().plan_required
                    fallback=move || view! {
                        <div class="form-group">
                            <label for="amount">{move || definition().amount_label}</label>
                            <input
                                id="amount"
                                type="number"
                                min="1"
                                step="1"
                                class="text-input"
                                placeholder="Enter amount"
                                prop:value=move || form.with(|form| form.amount().to_string())
                                on:input=move |ev| form.update(|form| form.set_amount(event_target_value(&ev)))
                                required
                            />
                            <p class="helper-text">"Enter the amount you wish to pay for this service."</p>
                        </div>
                    }
                >
                    <div>
                        <label class="muted section-label">"Select plan"</label>
                        <PlanList form=form on_select=on_select_plan/>
                    </div>
                </Show>
            </div>

            <Show when=move || { summary_amount() > 0.0 }>
                <div class="card card--flat">
                    <div class="card-title">"Recharge summary"</div>
                    <div class="details-list">
                        <SummaryRow
                            label="Operator"
                            value=Signal::derive(move || form.with(|form| {
                                form.selected_operator()
                                    .map(|operator| operator.name.clone())
                                    .unwrap_or_else(|| EMPTY.to_string())
                            }))
                        />
                        <SummaryRow
                            label="Plan"
                            value=Signal::derive(move || form.with(|form| {
                                if form.definition().plan_required {
                                    form.selected_plan().map(|plan| plan.name.clone()).unwrap_or_default()
                                } else {
                                    format!("{} payment", form.definition().name)
                                }
                            }))
                        />
                        <SummaryRow
                            label="Benefits"
                            value=Signal::derive(move || form.with(|form| {
                                form.selected_plan()
                                    .filter(|_| form.definition().plan_required)
                                    .and_then(|plan| plan.description.clone())
                                    .unwrap_or_else(|| {
                                        "Recharge details will be shared after confirmation.".to_string()
                                    })
                            }))
                        />
                        <SummaryRow
                            label="Amount"
                            value=Signal::derive(move || format_inr(summary_amount()))
                        />
                    </div>
                </div>
            </Show>

            <Show when=move || form.with(|form| form.error().is_some())>
                <div class="alert alert--danger" role="alert">
                    {move || form.with(|form| form.error().unwrap_or_default().to_string())}
                </div>
            </Show>

            <p class="helper-text" aria-live="polite">
                {move || form.with(RechargeForm::stage).hint()}
            </p>

            <div class="form-actions">
                <button
                    type="submit"
                    class="primary-button"
                    disabled=move || !form.with(RechargeForm::can_submit)
                >
                    {move || if form.with(RechargeForm::submitting) { "Processing…" } else { "Recharge Now" }}
                </button>
                <button type="button" class="ghost-button" on:click=on_reset>
                    "Reset"
                </button>
            </div>
        </form>
    }
}

#[component]
fn PlanList(form: RwSignal<RechargeForm>, on_select: Callback<Plan>) -> impl IntoView {
    move || {
        let (loading, plans, has_operator) = form.with(|form| {
            (
                form.loading_plans(),
                form.plans().to_vec(),
                form.selected_operator().is_some(),
            )
        });

        if loading {
            view! {
                <div class="grid grid--2col">
                    {(0..4)
                        .map(|_| view! { <div class="plan-card skeleton" aria-hidden="true"></div> })
                        .collect_view()}
                </div>
                <div class="loading-overlay" aria-hidden="true">
                    <div class="spinner"></div>
                </div>
            }
            .into_any()
        } else if plans.is_empty() {
            let message = if has_operator {
                "No plans available for this operator at the moment."
            } else {
                "Select an operator to view available plans."
            };
            view! { <div class="alert alert--info">{message}</div> }.into_any()
        } else {
            view! {
                <div class="grid grid--2col">
                    {plans
                        .into_iter()
                        .map(|plan| {
                            let id = plan.id.clone();
                            let active = Signal::derive(move || {
                                form.with(|form| form.selected_plan().is_some_and(|p| p.id == id))
                            });
                            view! { <PlanCard plan=plan active=active on_select=on_select/> }
                        })
                        .collect_view()}
                </div>
            }
            .into_any()
        }
    }
}

#[component]
fn SummaryRow(label: &'static str, value: Signal<String>) -> impl IntoView {
    view! {
        <div class="details-item">
            <div class="details-item__label">{label}</div>
            <div class="details-item__value">{value}</div>
        </div>
    }
}
