use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::app::AppContext;
use crate::components::functions::status_path;
use crate::components::StatusBadge;
use crate::format::{format_date_time, format_inr, mask_identifier, service_display};
use crate::models::{Recharge, ServiceType, TxStatus};
use crate::status::{retry, watch_status, StatusView, POLL_INTERVAL};
use crate::tasks::{KeyedTask, ScopedTask};

struct StatusUi {
    icon: &'static str,
    tone: &'static str,
    title: &'static str,
    description: &'static str,
}

fn status_ui(status: TxStatus) -> StatusUi {
    match status {
        TxStatus::Success => StatusUi {
            icon: "✅",
            tone: "success",
            title: "Recharge Successful",
            description: "Your recharge was processed successfully.",
        },
        TxStatus::Failed => StatusUi {
            icon: "❌",
            tone: "failed",
            title: "Recharge Failed",
            description: "Something went wrong during processing. You can retry the recharge.",
        },
        TxStatus::Pending => StatusUi {
            icon: "⏳",
            tone: "pending",
            title: "Processing your recharge…",
            description: "Hang tight! We are checking with the operator. This usually resolves within 30 seconds.",
        },
    }
}

/// Live status of one transaction. Polls while pending and stops on
/// navigation away.
#[component]
pub fn StatusPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let handoff = ctx.handoff;
    let api = StoredValue::new(ctx.api.clone());
    let params = use_params_map();
    let navigate = use_navigate();

    let transaction_id = Memo::new(move |_| {
        params.with(|params| params.get("transaction_id").unwrap_or_default())
    });
    let status_view = RwSignal::new(StatusView::new(None));
    // Bumped by the manual reload after a failed first fetch
    let attempt = RwSignal::new(0u64);
    let retrying = RwSignal::new(false);
    let retry_error = RwSignal::new(None::<String>);

    let poller = StoredValue::new(KeyedTask::<(String, u64)>::new());
    let retry_task = StoredValue::new(None::<ScopedTask>);

    on_cleanup(move || {
        let _ = poller.try_update_value(KeyedTask::cancel);
        let _ = retry_task.try_update_value(|task| *task = None);
    });

    Effect::new(move |previous: Option<String>| {
        let id = transaction_id.get();
        let attempt = attempt.get();
        if id.is_empty() {
            return id;
        }

        let fallback = handoff
            .with_untracked(|handoff| {
                handoff
                    .as_ref()
                    .filter(|(handed_id, _)| *handed_id == id)
                    .map(|(_, summary)| summary.clone())
            })
            .or_else(|| {
                (previous.as_deref() == Some(id.as_str()))
                    .then(|| status_view.with_untracked(|view| view.fallback.clone()))
                    .flatten()
            });

        status_view.set(StatusView::new(fallback.clone()));
        retry_error.set(None);

        let poll_id = id.clone();
        poller.update_value(|tasks| {
            tasks.spawn((id.clone(), attempt), async move {
                let client = api.get_value();
                watch_status(&client, &poll_id, fallback, POLL_INTERVAL, |snapshot| {
                    let _ = status_view.try_set(snapshot.clone());
                })
                .await;
            })
        });
        id
    });

    let display = Memo::new(move |_| {
        let id = transaction_id.get();
        status_view.with(|view| view.display(&id))
    });
    let status = Memo::new(move |_| status_view.with(StatusView::status));
    let can_retry = Memo::new(move |_| status_view.with(StatusView::can_retry));

    let on_retry = move |_| {
        let Some(failed) = status_view.with_untracked(|view| {
            view.can_retry().then(|| view.recharge.clone()).flatten()
        }) else {
            return;
        };
        retrying.set(true);
        retry_error.set(None);
        let navigate = navigate.clone();

        retry_task.set_value(Some(ScopedTask::spawn(async move {
            let client = api.get_value();
            match retry(&client, &failed).await {
                Ok(submitted) => {
                    retrying.set(false);
                    let path = status_path(&submitted.transaction_id);
                    handoff.set(Some((submitted.transaction_id, submitted.summary)));
                    navigate(&path, Default::default());
                }
                Err(e) => {
                    tracing::warn!(transaction_id = %failed.transaction_id, "Retry failed: {e}");
                    retry_error.set(Some(e.to_string()));
                    retrying.set(false);
                }
            }
        })));
    };

    move || {
        let (loading, hard_error) =
            status_view.with(|view| (view.loading, view.hard_error().map(str::to_string)));
        let Some(record) = display.get() else {
            return match hard_error {
                Some(message) => view! {
                    <StatusUnavailable message=message on_reload=Callback::new(move |_| attempt.update(|n| *n += 1))/>
                }
                .into_any(),
                None if loading => view! {
                    <div class="container">
                        <div class="status-layout">
                            <div class="status-card skeleton" aria-hidden="true"></div>
                            <div class="details-card skeleton" aria-hidden="true"></div>
                        </div>
                    </div>
                }
                .into_any(),
                None => ().into_any(),
            };
        };

        let ui = status_ui(status.get());
        let record_status = record.status;
        let failure_reason = (record_status == TxStatus::Failed)
            .then(|| record.failure_reason.clone())
            .flatten();
        let on_retry = on_retry.clone();

        view! {
            <div class="container">
                <div class="page-header">
                    <div>
                        <h1 class="page-title">"Recharge status"</h1>
                        <p class="page-subtitle">"Track the latest update for your transaction in real time."</p>
                    </div>
                </div>

                <div class="status-layout">
                    <div class="status-card" role="status" aria-live="polite">
                        <div class=format!("status-icon status-icon--{}", ui.tone) aria-hidden="true">
                            {ui.icon}
                        </div>
                        <h2 class="status-title">{ui.title}</h2>
                        <p class="status-description">{ui.description}</p>

                        <div class="status-card__badge">
                            <StatusBadge status=Some(record_status)/>
                        </div>

                        {failure_reason.map(|reason| view! {
                            <div class="alert alert--danger" role="alert">{reason}</div>
                        })}

                        {(record_status == TxStatus::Pending).then(|| view! {
                            <p class="helper-text">
                                "We will auto-refresh every 5 seconds. Feel free to check back or navigate away. Your recharge will continue processing."
                            </p>
                        })}

                        <div class="status-actions">
                            <A href="/recharge" attr:class="ghost-button">"New Recharge"</A>
                            <A href="/history" attr:class="ghost-button">"View History"</A>
                            {can_retry.get().then(|| view! {
                                <button
                                    type="button"
                                    class="primary-button"
                                    disabled=move || retrying.get()
                                    on:click=on_retry
                                >
                                    {move || if retrying.get() { "Retrying…" } else { "Retry Recharge" }}
                                </button>
                            })}
                        </div>
                    </div>

                    <TransactionDetails record=record/>
                </div>

                {move || {
                    retry_error
                        .get()
                        .or_else(|| status_view.with(|view| view.error.clone()))
                        .map(|e| view! { <div class="alert alert--danger" role="alert">{e}</div> })
                }}
            </div>
        }
        .into_any()
    }
}

#[component]
fn StatusUnavailable(message: String, on_reload: Callback<()>) -> impl IntoView {
    view! {
        <div class="container">
            <div class="status-layout">
                <div class="status-card">
                    <div class="status-icon status-icon--pending" aria-hidden="true">"⚠️"</div>
                    <h2 class="status-title">"Unable to fetch status"</h2>
                    <p class="status-description">{message}</p>
                    <div class="status-actions">
                        <button type="button" class="primary-button" on:click=move |_| on_reload.run(())>
                            "Retry"
                        </button>
                        <A href="/" attr:class="ghost-button">"Go Home"</A>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn TransactionDetails(record: Recharge) -> impl IntoView {
    let (service_name, service_icon) = service_display(Some(record.service_type));
    let amount = if record.amount > 0.0 {
        record.amount
    } else {
        record.plan.as_ref().map(|plan| plan.amount).unwrap_or_default()
    };
    let rows = [
        ("Identifier", mask_identifier(record.identifier.as_deref(), Some(record.service_type))),
        (
            "Linked mobile",
            mask_identifier(record.mobile_number.as_deref(), Some(ServiceType::Mobile)),
        ),
        ("Operator", record.operator.map(|operator| operator.name).unwrap_or_default()),
        ("Plan", record.plan.map(|plan| plan.name).unwrap_or_default()),
        ("Amount", format_inr(amount)),
        ("Payment method", record.payment_method.unwrap_or_default()),
        ("Created at", format_date_time(record.created_at)),
        ("Resolved at", format_date_time(record.resolved_at)),
    ];

    view! {
        <div class="details-card">
            <div class="card-title">"Transaction details"</div>
            <div class="details-list">
                <div class="details-item">
                    <div class="details-item__label">"Transaction ID"</div>
                    <div class="details-item__value">{record.transaction_id}</div>
                </div>
                <div class="details-item">
                    <div class="details-item__label">"Service"</div>
                    <div class="details-item__value">
                        <span aria-hidden="true">{service_icon}</span>
                        " "
                        {service_name}
                    </div>
                </div>
                {rows
                    .into_iter()
                    .map(|(label, value)| view! {
                        <div class="details-item">
                            <div class="details-item__label">{label}</div>
                            <div class="details-item__value">{value}</div>
                        </div>
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
