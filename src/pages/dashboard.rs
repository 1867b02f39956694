use leptos::prelude::*;
use leptos_router::components::A;

use crate::api::RechargeApi;
use crate::app::AppContext;
use crate::components::functions::status_path;
use crate::components::StatusBadge;
use crate::dashboard::{greeting_name, service_cards, stat_cards, status_chips, QUICK_ACTIONS};
use crate::format::{format_date_time, format_inr, mask_identifier, service_display};
use crate::models::{Recharge, ServiceType, Summary};
use crate::tasks::ScopedTask;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let session_state = ctx.session_state;
    let api = StoredValue::new(ctx.api.clone());

    let summary = RwSignal::new(None::<Summary>);
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let refresh_nonce = RwSignal::new(0u64);
    let task = StoredValue::new(None::<ScopedTask>);

    on_cleanup(move || {
        let _ = task.try_update_value(|task| *task = None);
    });

    // Load on mount and again on every manual refresh
    Effect::new(move |_| {
        refresh_nonce.track();
        loading.set(true);
        error.set(None);
        task.set_value(Some(ScopedTask::spawn(async move {
            let client = api.get_value();
            match client.summary().await {
                Ok(data) => summary.set(Some(data)),
                Err(e) => {
                    tracing::warn!("Failed to load summary: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        })));
    });

    let greeting = move || {
        session_state.with(|state| {
            let name = state.user.as_ref().map(|user| user.name.as_str());
            format!("Welcome back, {}!", greeting_name(name))
        })
    };

    view! {
        <div class="dashboard">
            <section class="dashboard-hero">
                <div>
                    <h1 class="dashboard-hero__title">{greeting}</h1>
                    <p class="dashboard-hero__subtitle">
                        "Monitor your recharge performance, explore intelligent plan recommendations, and stay in control of every transaction."
                    </p>
                </div>
                <div class="dashboard-hero__actions">
                    <button
                        type="button"
                        class="cta-button outline"
                        disabled=move || loading.get()
                        on:click=move |_| refresh_nonce.update(|n| *n += 1)
                    >
                        {move || if loading.get() { "Refreshing…" } else { "Refresh insights" }}
                    </button>
                    <A href="/recharge" attr:class="cta-button primary">"Start a recharge"</A>
                </div>
            </section>

            {move || error.get().map(|e| view! {
                <div class="alert alert--danger" role="alert">{e}</div>
            })}

            <section class="section" aria-label="Recharge performance metrics">
                <header class="section__header">
                    <div>
                        <h2 class="section__title">"Performance at a glance"</h2>
                        <p class="muted">"Real-time metrics from your recent recharges."</p>
                    </div>
                </header>
                <div class="stats-grid">
                    {move || {
                        if loading.get() {
                            (0..3)
                                .map(|_| view! { <div class="stat-card skeleton" aria-hidden="true"></div> })
                                .collect_view()
                                .into_any()
                        } else {
                            summary
                                .with(|summary| stat_cards(summary.as_ref()))
                                .into_iter()
                                .map(|card| view! {
                                    <div class="stat-card">
                                        <span class="stat-card__label">{card.label}</span>
                                        <span class="stat-card__value">{card.value}</span>
                                        <span class="stat-card__meta">{card.meta}</span>
                                    </div>
                                })
                                .collect_view()
                                .into_any()
                        }
                    }}
                </div>
            </section>

            {move || summary.get().map(|summary| view! {
                <StatusOverview summary=summary.clone()/>
                <ServicesPerformance summary=summary/>
            })}

            <section class="section" aria-label="Quick recharge actions">
                <header class="section__header">
                    <div>
                        <h2 class="section__title">"Quick Actions"</h2>
                        <p class="muted">"Jump straight into the flows you use most often."</p>
                    </div>
                </header>
                <div class="quick-actions">
                    {QUICK_ACTIONS
                        .iter()
                        .map(|action| view! {
                            <A href=action.href attr:class="quick-card">
                                <div class="quick-card__icon" aria-hidden="true">{action.icon}</div>
                                <div class="quick-card__title">{action.title}</div>
                                <p class="muted">{action.description}</p>
                                <span class="plan-card-dark__cta">{action.cta}</span>
                            </A>
                        })
                        .collect_view()}
                </div>
            </section>

            <section class="section" aria-label="Recent transactions">
                <header class="section__header">
                    <div>
                        <h2 class="section__title">"Recent Transactions"</h2>
                        <p class="muted">"Track the latest transactions and jump into detailed status in a click."</p>
                    </div>
                    <A href="/history" attr:class="plan-card-dark__cta">"View full history →"</A>
                </header>
                {move || {
                    if loading.get() {
                        view! {
                            <div class="empty-state" aria-hidden="true">
                                <div class="empty-state__title">"Loading transactions…"</div>
                                <p>"Your latest recharges will appear here in seconds."</p>
                            </div>
                        }
                        .into_any()
                    } else {
                        let recent = summary.with(|summary| {
                            summary.as_ref().map(|s| s.recent_recharges.clone()).unwrap_or_default()
                        });
                        view! { <RecentRecharges recharges=recent/> }.into_any()
                    }
                }}
            </section>
        </div>
    }
}

#[component]
fn StatusOverview(summary: Summary) -> impl IntoView {
    view! {
        <section class="section">
            <header class="section__header">
                <div>
                    <h2 class="section__title">"Status overview"</h2>
                    <p class="muted">
                        "Instant visibility into how your transactions are performing across operators."
                    </p>
                </div>
            </header>
            <div class="status-distribution">
                {status_chips(&summary)
                    .into_iter()
                    .map(|chip| view! {
                        <div class=format!("status-chip status-chip--{}", chip.tone)>{chip.label}</div>
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn ServicesPerformance(summary: Summary) -> impl IntoView {
    let cards = service_cards(&summary);
    (!cards.is_empty()).then(|| {
        view! {
            <section class="section" aria-label="Service distribution">
                <header class="section__header">
                    <div>
                        <h2 class="section__title">"Services performance"</h2>
                        <p class="muted">"Compare uptake and outcomes across recharge services."</p>
                    </div>
                </header>
                <div class="stats-grid">
                    {cards
                        .into_iter()
                        .map(|card| view! {
                            <div class="stat-card">
                                <div class="stat-card__top">
                                    <span class="stat-card__icon" aria-hidden="true">{card.icon}</span>
                                    <span class="status-chip status-chip--default">
                                        {format!("{} txns", card.transactions)}
                                    </span>
                                </div>
                                <span class="stat-card__label">{card.name}</span>
                                <span class="stat-card__value">{card.amount}</span>
                                <span class="stat-card__meta">{card.meta}</span>
                            </div>
                        })
                        .collect_view()}
                </div>
            </section>
        }
    })
}

#[component]
fn RecentRecharges(recharges: Vec<Recharge>) -> impl IntoView {
    if recharges.is_empty() {
        return view! {
            <div class="empty-state">
                <div class="empty-state__title">"No transactions yet"</div>
                <p>
                    "Kickstart your RechargeX journey with your first recharge. Your transaction timeline will appear here instantly."
                </p>
                <A href="/recharge" attr:class="empty-state__cta">"Make your first recharge"</A>
            </div>
        }
        .into_any();
    }

    view! {
        <div class="table-scroll">
            <table class="table-modern" aria-label="Recent recharges">
                <thead>
                    <tr>
                        <th scope="col">"Transaction"</th>
                        <th scope="col">"Service"</th>
                        <th scope="col">"Identifier"</th>
                        <th scope="col">"Mobile"</th>
                        <th scope="col">"Operator"</th>
                        <th scope="col">"Plan"</th>
                        <th scope="col">"Amount"</th>
                        <th scope="col">"Status"</th>
                        <th scope="col">"Created"</th>
                        <th scope="col">"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    {recharges
                        .into_iter()
                        .map(|item| {
                            let status = Some(item.status);
                            view! {
                                <tr>
                                    <td>{item.transaction_id.clone()}</td>
                                    <td>{service_display(Some(item.service_type)).0}</td>
                                    <td>{mask_identifier(item.identifier.as_deref(), Some(item.service_type))}</td>
                                    <td>{mask_identifier(item.mobile_number.as_deref(), Some(ServiceType::Mobile))}</td>
                                    <td>{item.operator.map(|operator| operator.name)}</td>
                                    <td>{item.plan.map(|plan| plan.name)}</td>
                                    <td>{format_inr(item.amount)}</td>
                                    <td><StatusBadge status=status/></td>
                                    <td>{format_date_time(item.created_at)}</td>
                                    <td>
                                        <A href=status_path(&item.transaction_id) attr:class="plan-card-dark__cta">
                                            "View status"
                                        </A>
                                    </td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}
