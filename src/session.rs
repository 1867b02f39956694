//! Authentication session: the persisted credential plus the signed-in profile.
//!
//! One [`Session`] is built at startup and shared by handle. It is the only
//! writer of the [`Credential`] used by the API client, and it hands the client
//! an [`UnauthorizedHook`] so a rejected credential logs out uniformly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::api::{AuthApi, Credential, UnauthorizedHook};
use crate::models::User;

/// localStorage key holding the bearer token.
pub const STORAGE_KEY: &str = "rechargex_token";

/// Persistence for exactly one credential value.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// In-process store, used on the server and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore(RwLock<Option<String>>);

impl MemoryStore {
    pub fn with_token(token: &str) -> Self {
        Self(RwLock::new(Some(token.to_string())))
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn save(&self, token: &str) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn save(&self, token: &str) {
        (**self).save(token);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

/// Browser `localStorage`. Storage being unavailable (private mode, quota)
/// degrades to a session that does not survive reloads.
#[cfg(not(feature = "ssr"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStore;

#[cfg(not(feature = "ssr"))]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(not(feature = "ssr"))]
impl CredentialStore for BrowserStore {
    fn load(&self) -> Option<String> {
        local_storage()?
            .get_item(STORAGE_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) {
        if let Some(storage) = local_storage() {
            if let Err(e) = storage.set_item(STORAGE_KEY, token) {
                tracing::warn!(?e, "Could not persist credential");
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(STORAGE_KEY);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Changed,
    LoggedOut { redirect: bool },
}

pub type SessionListener = Arc<dyn Fn(&SessionState, SessionEvent) + Send + Sync>;

struct Inner {
    store: Box<dyn CredentialStore>,
    credential: Credential,
    state: RwLock<SessionState>,
    listeners: RwLock<Vec<SessionListener>>,
    // Bumped by start/logout; a profile fetch only lands if it is unchanged.
    generation: AtomicU64,
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// Adopt any persisted token. The session reports `loading` until
    /// [`Session::restore`] resolves.
    pub fn new(store: impl CredentialStore + 'static, credential: Credential) -> Self {
        let token = store.load();
        credential.set(token.clone());

        Self {
            inner: Arc::new(Inner {
                store: Box::new(store),
                credential,
                state: RwLock::new(SessionState {
                    token,
                    user: None,
                    loading: true,
                }),
                listeners: RwLock::new(Vec::new()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn credential(&self) -> &Credential {
        &self.inner.credential
    }

    pub fn subscribe(&self, listener: SessionListener) {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Hook for the API client: any 401 logs out and redirects to login.
    pub fn unauthorized_hook(&self) -> UnauthorizedHook {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                Session { inner }.logout(true);
            }
        })
    }

    /// Resolve the startup state: fetch the profile for a persisted token,
    /// or settle as signed out.
    pub async fn restore<A: AuthApi>(&self, api: &A) {
        if self.state().token.is_none() {
            self.update(SessionEvent::Changed, |state| {
                state.user = None;
                state.loading = false;
            });
            return;
        }
        tracing::info!("Restoring persisted session");
        self.hydrate_profile(api).await;
    }

    /// Begin a session with a fresh token, adopting `profile` or fetching it.
    pub async fn start<A: AuthApi>(&self, token: String, profile: Option<User>, api: &A) {
        if token.is_empty() {
            return;
        }
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.store.save(&token);
        self.inner.credential.set(Some(token.clone()));

        let needs_profile = profile.is_none();
        self.update(SessionEvent::Changed, |state| {
            state.token = Some(token);
            state.loading = needs_profile;
            state.user = profile;
        });
        tracing::info!("Session started");

        if needs_profile {
            self.hydrate_profile(api).await;
        }
    }

    /// Fetch the current profile; a failure ends the session.
    pub async fn hydrate_profile<A: AuthApi>(&self, api: &A) {
        let generation = self.inner.generation.load(Ordering::SeqCst);
        let result = api.current_user().await;

        if self.inner.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding profile for a superseded session");
            return;
        }

        match result {
            Ok(user) => self.update(SessionEvent::Changed, |state| {
                state.user = Some(user);
                state.loading = false;
            }),
            Err(e) => {
                tracing::warn!("Profile fetch failed, logging out: {e}");
                self.logout(true);
            }
        }
    }

    /// Clear token and profile. `redirect` asks the UI to show the login page.
    pub fn logout(&self, redirect: bool) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.store.clear();
        self.inner.credential.set(None);
        self.update(SessionEvent::LoggedOut { redirect }, |state| {
            *state = SessionState::default();
        });
        tracing::info!(redirect, "Logged out");
    }

    fn update(&self, event: SessionEvent, apply: impl FnOnce(&mut SessionState)) {
        let snapshot = {
            let mut state = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            apply(&mut state);
            state.clone()
        };
        let listeners = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(&snapshot, event);
        }
    }
}
