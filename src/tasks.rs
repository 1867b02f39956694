//! Background work owned by a view.
//!
//! A [`ScopedTask`] is aborted when its handle is dropped, so tying the handle
//! to a component's cleanup guarantees no fetch or poll loop outlives the
//! component. [`KeyedTask`] runs at most one task per key and aborts the
//! previous one when the key changes.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};

/// Handle to an abortable future. Dropping it aborts the future.
#[derive(Debug)]
pub struct ScopedTask {
    handle: AbortHandle,
    finished: Arc<AtomicBool>,
}

impl ScopedTask {
    /// Spawn on the local executor and return the owning handle.
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = ()> + 'static,
    {
        let (task, fut) = scoped(fut);
        spawn_local(async move {
            let _ = fut.await;
        });
        task
    }

    fn is_aborted(&self) -> bool {
        self.handle.is_aborted()
    }

    /// Neither aborted nor run to completion.
    pub fn is_live(&self) -> bool {
        !self.is_aborted() && !self.finished.load(Ordering::Acquire)
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Pair a future with a [`ScopedTask`] handle. The returned future resolves to
/// `None` once aborted.
pub fn scoped<F>(fut: F) -> (ScopedTask, impl Future<Output = Option<F::Output>>)
where
    F: Future,
{
    let (handle, registration) = AbortHandle::new_pair();
    let fut = Abortable::new(fut, registration);
    let finished = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&finished);
    let fut = async move {
        let output = fut.await.ok();
        flag.store(true, Ordering::Release);
        output
    };
    (ScopedTask { handle, finished }, fut)
}

/// At most one live task, identified by the inputs it was started for.
#[derive(Debug)]
pub struct KeyedTask<K> {
    current: Option<(K, ScopedTask)>,
}

impl<K> Default for KeyedTask<K> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<K: PartialEq + std::fmt::Debug + 'static> KeyedTask<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `fut` for `key`, aborting whatever ran before. Returns `None`
    /// when a task for the same key is still running.
    pub fn start<F>(&mut self, key: K, fut: F) -> Option<impl Future<Output = Option<F::Output>>>
    where
        F: Future,
    {
        if let Some((current, task)) = &self.current {
            if *current == key && task.is_live() {
                return None;
            }
            tracing::debug!(stale = ?current, next = ?key, "Superseding keyed task");
        }
        let (task, fut) = scoped(fut);
        self.current = Some((key, task));
        Some(fut)
    }

    /// Like [`KeyedTask::start`], spawning the future locally.
    pub fn spawn<F>(&mut self, key: K, fut: F)
    where
        F: Future<Output = ()> + 'static,
    {
        if let Some(fut) = self.start(key, fut) {
            spawn_local(async move {
                let _ = fut.await;
            });
        }
    }

    pub fn cancel(&mut self) {
        self.current = None;
    }

    pub fn current_key(&self) -> Option<&K> {
        self.current.as_ref().map(|(key, _)| key)
    }
}

pub fn spawn_local<F>(fut: F)
where
    F: Future<Output = ()> + 'static,
{
    leptos::task::spawn_local(fut);
}

#[cfg(feature = "ssr")]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Runs its action when dropped. The browser `sleep` keeps one across its
/// await so an aborted sleep clears its timeout.
#[cfg(any(test, not(feature = "ssr")))]
struct OnDrop<F: FnOnce()>(Option<F>);

#[cfg(any(test, not(feature = "ssr")))]
impl<F: FnOnce()> OnDrop<F> {
    fn new(action: F) -> Self {
        Self(Some(action))
    }
}

#[cfg(any(test, not(feature = "ssr")))]
impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(action) = self.0.take() {
            action();
        }
    }
}

#[cfg(not(feature = "ssr"))]
pub async fn sleep(duration: Duration) {
    let (tx, rx) = futures::channel::oneshot::channel::<()>();
    let handle = match leptos::prelude::set_timeout_with_handle(
        move || {
            let _ = tx.send(());
        },
        duration,
    ) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("Cannot schedule timeout: {e:?}");
            return;
        }
    };
    let _clear = OnDrop::new(move || handle.clear());
    let _ = rx.await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;

    #[tokio::test]
    async fn dropping_scoped_task_aborts_future() {
        let (_tx, rx) = oneshot::channel::<u32>();
        let (task, fut) = scoped(rx);
        drop(task);
        assert_eq!(fut.await, None);
    }

    #[tokio::test]
    async fn scoped_future_completes_while_handle_lives() {
        let (task, fut) = scoped(async { 7 });
        assert_eq!(fut.await, Some(7));
        assert!(!task.is_aborted());
    }

    #[tokio::test]
    async fn new_key_aborts_previous_task() {
        let mut keyed = KeyedTask::new();
        let (_tx_a, rx_a) = oneshot::channel::<&str>();
        let (tx_b, rx_b) = oneshot::channel::<&str>();

        let first = keyed.start("a", rx_a).expect("first start");
        let second = keyed.start("b", rx_b).expect("second start");
        tx_b.send("plans for b").unwrap();

        assert_eq!(first.await, None);
        assert_eq!(second.await.map(Result::unwrap), Some("plans for b"));
        assert_eq!(keyed.current_key(), Some(&"b"));
    }

    #[tokio::test]
    async fn same_key_does_not_restart() {
        let mut keyed = KeyedTask::new();
        let first = keyed.start(1, async { "first" });
        assert!(keyed.start(1, async { "again" }).is_none());
        assert_eq!(first.unwrap().await, Some("first"));
    }

    #[tokio::test]
    async fn same_key_restarts_once_finished() {
        let mut keyed = KeyedTask::new();
        let first = keyed.start("MOBILE", async { 1 }).unwrap();
        assert_eq!(first.await, Some(1));
        let again = keyed.start("MOBILE", async { 2 }).expect("finished task is replaced");
        assert_eq!(again.await, Some(2));
    }

    #[tokio::test]
    async fn cancel_aborts_and_allows_restart() {
        let mut keyed = KeyedTask::new();
        let (_tx, rx) = oneshot::channel::<()>();
        let pending = keyed.start(1, rx).unwrap();
        keyed.cancel();
        assert_eq!(pending.await, None);
        assert!(keyed.current_key().is_none());
        assert!(keyed.start(1, async {}).is_some());
    }

    fn detached<K: PartialEq + std::fmt::Debug + 'static>(
        keyed: &mut KeyedTask<K>,
        key: K,
        value: u32,
    ) -> Option<std::pin::Pin<Box<dyn Future<Output = Option<u32>>>>> {
        keyed
            .start(key, async move { value })
            .map(|fut| Box::pin(fut) as std::pin::Pin<Box<dyn Future<Output = Option<u32>>>>)
    }

    #[tokio::test]
    async fn keyed_future_is_detachable_for_any_key_type() {
        let mut keyed = KeyedTask::new();
        let fut = detached(&mut keyed, ("TXN-1".to_string(), 0u64), 5).expect("started");
        assert_eq!(fut.await, Some(5));
    }

    #[tokio::test]
    async fn aborting_a_task_runs_its_drop_guards() {
        let cleared = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cleared);
        let (task, fut) = scoped(async move {
            let _clear = OnDrop::new(move || flag.store(true, Ordering::SeqCst));
            futures::future::pending::<()>().await;
        });

        drop(task);

        assert_eq!(fut.await, None);
        assert!(cleared.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_waits_for_duration() {
        let started = tokio::time::Instant::now();
        sleep(Duration::from_secs(5)).await;
        assert!(started.elapsed() >= Duration::from_secs(5));
    }
}
