use chrono::NaiveDate;
use leptos::prelude::*;
use leptos_router::components::A;

use crate::api::RechargeApi;
use crate::app::AppContext;
use crate::catalog::SERVICE_CATALOG;
use crate::components::functions::status_path;
use crate::components::StatusBadge;
use crate::dto::HistoryPage as HistoryData;
use crate::format::{format_date_time, format_inr, mask_identifier, service_display};
use crate::history::{
    export_csv, export_file_name, parse_date_filter, parse_service_filter, parse_status_filter,
    FilterChange, HistoryFilters,
};
use crate::models::{Recharge, TxStatus};
use crate::tasks::KeyedTask;

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[component]
pub fn HistoryPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let api = StoredValue::new(ctx.api.clone());

    let filters = RwSignal::new(HistoryFilters::default());
    let page = RwSignal::new(HistoryData::default());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let fetches = StoredValue::new(KeyedTask::<HistoryFilters>::new());

    on_cleanup(move || {
        let _ = fetches.try_update_value(KeyedTask::cancel);
    });

    // Refetch on every filter change; a newer query aborts the older one
    Effect::new(move |_| {
        let query = filters.get();
        loading.set(true);
        error.set(None);
        fetches.update_value(|tasks| {
            let key = query.clone();
            tasks.spawn(key, async move {
                let client = api.get_value();
                match client.history(&query).await {
                    Ok(data) => page.set(data),
                    Err(e) => {
                        tracing::warn!(page = query.page, "Failed to load history: {e}");
                        error.set(Some(e.to_string()));
                    }
                }
                loading.set(false);
            })
        });
    });

    let change = move |change: FilterChange| filters.update(|filters| filters.apply(change));

    let on_export = move |_| {
        let Some(csv) = page.with_untracked(|page| export_csv(&page.recharges)) else {
            return;
        };
        let file_name = export_file_name(chrono::Utc::now().timestamp_millis());
        #[cfg(not(feature = "ssr"))]
        {
            if let Err(e) = crate::components::functions::download_csv(&file_name, &csv) {
                tracing::error!("CSV export failed: {e:?}");
            }
        }
        #[cfg(feature = "ssr")]
        {
            let _ = (file_name, csv);
        }
    };

    view! {
        <div class="history-page">
            <section class="dashboard-hero">
                <div>
                    <h1 class="dashboard-hero__title">"Recharge history"</h1>
                    <p class="dashboard-hero__subtitle">
                        "Review transactions, export detailed reports, and keep your recharge journey audit-ready."
                    </p>
                </div>
                <button
                    type="button"
                    class="cta-button outline"
                    disabled=move || page.with(|page| page.recharges.is_empty())
                    on:click=on_export
                >
                    "Export CSV"
                </button>
            </section>

            <section class="section">
                <div class="history-filters">
                    <div class="form-group">
                        <label for="status">"Status"</label>
                        <select
                            id="status"
                            prop:value=move || {
                                filters.with(|f| f.status.map(|s| s.as_str()).unwrap_or("ALL"))
                            }
                            on:change=move |ev| {
                                change(FilterChange::Status(parse_status_filter(&event_target_value(&ev))))
                            }
                        >
                            <option value="ALL">"All"</option>
                            {[TxStatus::Success, TxStatus::Failed, TxStatus::Pending]
                                .into_iter()
                                .map(|status| view! {
                                    <option value=status.as_str()>{crate::format::status_meta(Some(status)).label}</option>
                                })
                                .collect_view()}
                        </select>
                    </div>
                    <div class="form-group">
                        <label for="service-type">"Service"</label>
                        <select
                            id="service-type"
                            prop:value=move || {
                                filters.with(|f| f.service_type.map(|s| s.as_str()).unwrap_or("ALL"))
                            }
                            on:change=move |ev| {
                                change(FilterChange::ServiceType(parse_service_filter(&event_target_value(&ev))))
                            }
                        >
                            <option value="ALL">"All services"</option>
                            {SERVICE_CATALOG
                                .iter()
                                .map(|service| view! {
                                    <option value=service.id.as_str()>{service.name}</option>
                                })
                                .collect_view()}
                        </select>
                    </div>
                    <div class="form-group">
                        <label for="identifier-filter">"Identifier"</label>
                        <input
                            id="identifier-filter"
                            type="text"
                            placeholder="Search identifier"
                            prop:value=move || filters.with(|f| f.identifier.clone())
                            on:input=move |ev| change(FilterChange::Identifier(event_target_value(&ev)))
                        />
                    </div>
                    <div class="form-group">
                        <label for="mobile-filter">"Mobile number"</label>
                        <input
                            id="mobile-filter"
                            type="tel"
                            placeholder="Search number"
                            maxlength="10"
                            prop:value=move || filters.with(|f| f.mobile_number.clone())
                            on:input=move |ev| change(FilterChange::MobileNumber(event_target_value(&ev)))
                        />
                    </div>
                    <div class="form-group">
                        <label for="transaction-filter">"Transaction ID"</label>
                        <input
                            id="transaction-filter"
                            type="text"
                            placeholder="Search transaction"
                            prop:value=move || filters.with(|f| f.transaction_id.clone())
                            on:input=move |ev| change(FilterChange::TransactionId(event_target_value(&ev)))
                        />
                    </div>
                    <div class="form-group">
                        <label for="start-date">"Start date"</label>
                        <input
                            id="start-date"
                            type="date"
                            prop:value=move || filters.with(|f| date_value(f.start_date))
                            on:change=move |ev| change(FilterChange::StartDate(parse_date_filter(&event_target_value(&ev))))
                        />
                    </div>
                    <div class="form-group">
                        <label for="end-date">"End date"</label>
                        <input
                            id="end-date"
                            type="date"
                            prop:value=move || filters.with(|f| date_value(f.end_date))
                            on:change=move |ev| change(FilterChange::EndDate(parse_date_filter(&event_target_value(&ev))))
                        />
                    </div>
                    <div>
                        <button
                            type="button"
                            class="cta-button outline"
                            on:click=move |_| filters.set(HistoryFilters::default())
                        >
                            "Clear filters"
                        </button>
                    </div>
                </div>
            </section>

            {move || error.get().map(|e| view! {
                <div class="alert alert--danger" role="alert">{e}</div>
            })}

            <section class="section">
                {move || {
                    if loading.get() {
                        view! { <div class="empty-state">"Loading history…"</div> }.into_any()
                    } else {
                        let rows = page.with(|page| page.recharges.clone());
                        view! { <HistoryTable rows=rows/> }.into_any()
                    }
                }}
            </section>

            {move || {
                let pagination = page.with(|page| (!page.recharges.is_empty()).then_some(page.pagination));
                pagination.map(|pagination| {
                    let current = filters.with_untracked(|f| f.page);
                    view! {
                        <div class="section pagination">
                            <div>
                                {format!(
                                    "Page {} of {} • {} records",
                                    pagination.current_page,
                                    pagination.total_pages,
                                    pagination.total_records,
                                )}
                            </div>
                            <div class="pagination-controls">
                                <button
                                    type="button"
                                    class="cta-button outline"
                                    disabled=!pagination.has_prev
                                    on:click=move |_| change(FilterChange::Page(current.saturating_sub(1)))
                                >
                                    "Previous"
                                </button>
                                <button
                                    type="button"
                                    class="cta-button outline"
                                    disabled=!pagination.has_next
                                    on:click=move |_| change(FilterChange::Page(current + 1))
                                >
                                    "Next"
                                </button>
                            </div>
                        </div>
                    }
                })
            }}
        </div>
    }
}

#[component]
fn HistoryTable(rows: Vec<Recharge>) -> impl IntoView {
    if rows.is_empty() {
        return view! {
            <div class="empty-state">
                <div class="empty-state__title">"No transactions found"</div>
                <p>"Try adjusting your filters or initiate a new recharge to see it appear here."</p>
                <A href="/recharge" attr:class="plan-card-dark__cta">"Make Your First Recharge →"</A>
            </div>
        }
        .into_any();
    }

    view! {
        <div class="table-scroll">
            <table class="table-modern" aria-label="Recharge history">
                <thead>
                    <tr>
                        <th scope="col">"Transaction ID"</th>
                        <th scope="col">"Date"</th>
                        <th scope="col">"Service"</th>
                        <th scope="col">"Identifier"</th>
                        <th scope="col">"Mobile"</th>
                        <th scope="col">"Operator"</th>
                        <th scope="col">"Plan"</th>
                        <th scope="col">"Amount"</th>
                        <th scope="col">"Status"</th>
                        <th scope="col">"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|item| {
                            let href = status_path(&item.transaction_id);
                            let failed = item.status == TxStatus::Failed;
                            let retry_href = href.clone();
                            view! {
                                <tr>
                                    <td>{item.transaction_id}</td>
                                    <td>{format_date_time(item.created_at)}</td>
                                    <td>{service_display(Some(item.service_type)).0}</td>
                                    <td>{mask_identifier(item.identifier.as_deref(), Some(item.service_type))}</td>
                                    <td>{mask_identifier(item.mobile_number.as_deref(), None)}</td>
                                    <td>{item.operator.map(|operator| operator.name)}</td>
                                    <td>{item.plan.map(|plan| plan.name)}</td>
                                    <td>{format_inr(item.amount)}</td>
                                    <td><StatusBadge status=Some(item.status)/></td>
                                    <td>
                                        <div class="table-actions">
                                            <A href=href attr:class="plan-card-dark__cta">"View"</A>
                                            {failed.then(|| view! {
                                                <A href=retry_href attr:class="cta-button primary">"Retry"</A>
                                            })}
                                        </div>
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
