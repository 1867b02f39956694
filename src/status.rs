//! Recharge status poller.
//!
//! [`watch_status`] fetches a transaction once, then keeps re-fetching every
//! [`POLL_INTERVAL`] while it is pending. It returns as soon as the status is
//! terminal. The view runs it inside a [`crate::tasks::ScopedTask`], so
//! tearing the view down ends the loop at its next suspension point.

use std::time::Duration;

use crate::api::{ApiError, ApiResult, RechargeApi};
use crate::models::{Recharge, TxStatus};
use crate::recharge::{RechargeSummary, Submitted};
use crate::tasks::sleep;

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Snapshot of what the status page knows about one transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusView {
    pub recharge: Option<Recharge>,
    pub fallback: Option<RechargeSummary>,
    pub loading: bool,
    pub polling: bool,
    pub error: Option<String>,
}

impl StatusView {
    pub fn new(fallback: Option<RechargeSummary>) -> Self {
        Self {
            fallback,
            loading: true,
            ..Self::default()
        }
    }

    /// Authoritative record, else the provisional one built from the fallback.
    pub fn display(&self, transaction_id: &str) -> Option<Recharge> {
        self.recharge
            .clone()
            .or_else(|| self.fallback.as_ref().map(|summary| summary.provisional(transaction_id)))
    }

    pub fn status(&self) -> TxStatus {
        self.recharge
            .as_ref()
            .map(|recharge| recharge.status)
            .or(self.fallback.as_ref().map(|summary| summary.status))
            .unwrap_or(TxStatus::Pending)
    }

    fn has_data(&self) -> bool {
        self.recharge.is_some() || self.fallback.is_some()
    }

    /// Error with nothing to show alongside it.
    pub fn hard_error(&self) -> Option<&str> {
        if self.has_data() {
            None
        } else {
            self.error.as_deref()
        }
    }

    /// Retry needs the backend's own record of a failure; a provisional
    /// fallback is not enough.
    pub fn can_retry(&self) -> bool {
        self.recharge
            .as_ref()
            .is_some_and(|recharge| recharge.status == TxStatus::Failed)
    }

    /// Land one fetch. Returns whether polling should continue.
    fn apply(&mut self, result: ApiResult<Recharge>) -> bool {
        self.loading = false;
        let keep_polling = match result {
            Ok(recharge) => {
                self.error = None;
                let pending = !recharge.status.is_terminal();
                self.recharge = Some(recharge);
                pending
            }
            Err(e) => {
                let keep = self.has_data() && !matches!(e, ApiError::Unauthorized(_));
                self.error = Some(e.to_string());
                keep
            }
        };
        self.polling = keep_polling;
        keep_polling
    }
}

/// Poll `transaction_id` until it is terminal, reporting every change.
pub async fn watch_status<A, F>(
    api: &A,
    transaction_id: &str,
    fallback: Option<RechargeSummary>,
    interval: Duration,
    mut on_update: F,
) -> StatusView
where
    A: RechargeApi,
    F: FnMut(&StatusView),
{
    let mut view = StatusView::new(fallback);
    on_update(&view);

    loop {
        let result = api.recharge_status(transaction_id).await;
        let keep_polling = view.apply(result);
        on_update(&view);

        if !keep_polling {
            tracing::debug!(transaction_id, status = view.status().as_str(), "Stopped polling");
            return view;
        }
        tracing::debug!(transaction_id, "Recharge pending, polling again");
        sleep(interval).await;
    }
}

/// Ask the backend to retry a failed transaction. The new attempt starts
/// pending and carries the old transaction's details.
pub async fn retry<A: RechargeApi>(api: &A, failed: &Recharge) -> ApiResult<Submitted> {
    let accepted = api.retry_recharge(&failed.transaction_id).await?;
    tracing::info!(
        from = %failed.transaction_id,
        to = %accepted.new_transaction_id,
        "Recharge retried"
    );
    Ok(Submitted {
        transaction_id: accepted.new_transaction_id,
        summary: RechargeSummary::pending_retry_of(failed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{HistoryPage, RechargeAccepted, RechargeRequest, RetryAccepted, ServiceDto};
    use crate::history::HistoryFilters;
    use crate::models::{Operator, Plan, ServiceType, Summary};
    use crate::tasks::scoped;
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn recharge(id: &str, status: TxStatus) -> Recharge {
        Recharge {
            transaction_id: id.into(),
            service_type: ServiceType::Mobile,
            identifier: Some("9876543210".into()),
            mobile_number: None,
            operator: None,
            plan: None,
            amount: 199.0,
            payment_method: Some("UPI".into()),
            status,
            failure_reason: None,
            created_at: None,
            resolved_at: None,
        }
    }

    /// Answers status fetches from a script, repeating the last entry.
    struct ScriptedApi {
        script: Vec<ApiResult<Recharge>>,
        fetched_at: Mutex<Vec<Instant>>,
    }

    impl ScriptedApi {
        fn new(script: Vec<ApiResult<Recharge>>) -> Self {
            Self {
                script,
                fetched_at: Mutex::new(Vec::new()),
            }
        }

        fn fetches(&self) -> Vec<Instant> {
            self.fetched_at.lock().unwrap().clone()
        }
    }

    impl RechargeApi for ScriptedApi {
        async fn services(&self) -> ApiResult<Vec<ServiceDto>> {
            Ok(Vec::new())
        }

        async fn operators(&self, _: ServiceType) -> ApiResult<Vec<Operator>> {
            Ok(Vec::new())
        }

        async fn plans(&self, _: &str, _: &str) -> ApiResult<Vec<Plan>> {
            Ok(Vec::new())
        }

        async fn initiate_recharge(&self, _: &RechargeRequest) -> ApiResult<RechargeAccepted> {
            Err(ApiError::Network("unused".into()))
        }

        async fn recharge_status(&self, _: &str) -> ApiResult<Recharge> {
            let mut fetched = self.fetched_at.lock().unwrap();
            fetched.push(Instant::now());
            let index = (fetched.len() - 1).min(self.script.len() - 1);
            self.script[index].clone()
        }

        async fn retry_recharge(&self, id: &str) -> ApiResult<RetryAccepted> {
            Ok(RetryAccepted {
                new_transaction_id: format!("{id}-R1"),
            })
        }

        async fn history(&self, _: &HistoryFilters) -> ApiResult<HistoryPage> {
            Ok(HistoryPage::default())
        }

        async fn summary(&self) -> ApiResult<Summary> {
            Err(ApiError::Network("unused".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pending_is_fetched_again_after_interval() {
        let api = ScriptedApi::new(vec![
            Ok(recharge("TX1", TxStatus::Pending)),
            Ok(recharge("TX1", TxStatus::Success)),
        ]);

        let view = watch_status(&api, "TX1", None, POLL_INTERVAL, |_| {}).await;

        let fetches = api.fetches();
        assert_eq!(fetches.len(), 2);
        let gap = fetches[1] - fetches[0];
        assert!(gap >= POLL_INTERVAL && gap < POLL_INTERVAL + Duration::from_secs(1), "{gap:?}");
        assert_eq!(view.status(), TxStatus::Success);
        assert!(!view.polling);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_status_is_fetched_once() {
        for status in [TxStatus::Success, TxStatus::Failed] {
            let api = ScriptedApi::new(vec![Ok(recharge("TX1", status))]);
            let view = watch_status(&api, "TX1", None, POLL_INTERVAL, |_| {}).await;

            tokio::time::sleep(POLL_INTERVAL * 4).await;
            assert_eq!(api.fetches().len(), 1);
            assert_eq!(view.status(), status);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_task_stops_polling() {
        let api = ScriptedApi::new(vec![Ok(recharge("TX1", TxStatus::Pending))]);
        let (task, watch) = scoped(watch_status(&api, "TX1", None, POLL_INTERVAL, |_| {}));

        let teardown = async move {
            tokio::time::sleep(Duration::from_secs(12)).await;
            drop(task);
        };
        let (outcome, ()) = tokio::join!(watch, teardown);

        assert!(outcome.is_none());
        assert_eq!(api.fetches().len(), 3);
        tokio::time::sleep(POLL_INTERVAL * 3).await;
        assert_eq!(api.fetches().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_shows_only_for_first_fetch() {
        let api = ScriptedApi::new(vec![
            Ok(recharge("TX1", TxStatus::Pending)),
            Ok(recharge("TX1", TxStatus::Pending)),
            Ok(recharge("TX1", TxStatus::Failed)),
        ]);
        let mut loading = Vec::new();
        watch_status(&api, "TX1", None, POLL_INTERVAL, |view| loading.push(view.loading)).await;
        assert_eq!(loading, vec![true, false, false, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_error_without_fallback_stops() {
        let api = ScriptedApi::new(vec![Err(ApiError::Network("connection refused".into()))]);
        let view = watch_status(&api, "TX1", None, POLL_INTERVAL, |_| {}).await;

        assert_eq!(api.fetches().len(), 1);
        assert_eq!(view.hard_error(), Some("connection refused"));
        assert_eq!(view.display("TX1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_error_with_fallback_keeps_polling() {
        let api = ScriptedApi::new(vec![
            Err(ApiError::Network("timeout".into())),
            Ok(recharge("TX1", TxStatus::Success)),
        ]);
        let fallback = RechargeSummary::pending_retry_of(&recharge("TX0", TxStatus::Failed));

        let mut provisional = None;
        let view = watch_status(&api, "TX1", Some(fallback), POLL_INTERVAL, |view| {
            if provisional.is_none() && view.error.is_some() {
                provisional = view.display("TX1");
            }
        })
        .await;

        let provisional = provisional.unwrap();
        assert_eq!(provisional.transaction_id, "TX1");
        assert_eq!(provisional.status, TxStatus::Pending);
        assert_eq!(api.fetches().len(), 2);
        assert_eq!(view.hard_error(), None);
        assert_eq!(view.error, None);
        assert_eq!(view.status(), TxStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_stops_even_with_data() {
        let api = ScriptedApi::new(vec![
            Ok(recharge("TX1", TxStatus::Pending)),
            Err(ApiError::Unauthorized("expired".into())),
        ]);
        let view = watch_status(&api, "TX1", None, POLL_INTERVAL, |_| {}).await;
        assert_eq!(api.fetches().len(), 2);
        assert!(!view.polling);
    }

    #[tokio::test]
    async fn retry_moves_to_a_new_transaction() {
        let api = ScriptedApi::new(vec![Ok(recharge("TX1", TxStatus::Failed))]);
        let failed = recharge("TX1", TxStatus::Failed);

        let submitted = retry(&api, &failed).await.unwrap();

        assert_ne!(submitted.transaction_id, failed.transaction_id);
        assert_eq!(submitted.summary.status, TxStatus::Pending);
        assert_eq!(submitted.summary.amount, 199.0);
    }

    #[test]
    fn only_failed_transactions_offer_retry() {
        let mut view = StatusView::new(None);
        view.recharge = Some(recharge("TX1", TxStatus::Pending));
        assert!(!view.can_retry());
        view.recharge = Some(recharge("TX1", TxStatus::Failed));
        assert!(view.can_retry());
    }

    #[test]
    fn failed_fallback_alone_does_not_offer_retry() {
        let mut fallback = RechargeSummary::pending_retry_of(&recharge("TX1", TxStatus::Failed));
        fallback.status = TxStatus::Failed;
        let view = StatusView::new(Some(fallback));

        assert_eq!(view.status(), TxStatus::Failed);
        assert!(!view.can_retry());
    }
}
