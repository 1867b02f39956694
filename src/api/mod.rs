pub mod client;
pub mod error;

use std::sync::{Arc, PoisonError, RwLock};

use crate::dto::*;
use crate::history::HistoryFilters;
use crate::models::{Operator, Plan, Recharge, ServiceType, Summary, User};

pub use client::{ApiClient, ClientConfig, DEFAULT_API_URL};
pub use error::{ApiError, ApiResult};

/// Called once for every backend response rejected as unauthorized.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// The bearer token attached to backend calls. Cloned handles share one slot;
/// the session store is its only writer.
#[derive(Clone, Default)]
pub struct Credential(Arc<RwLock<Option<String>>>);

impl Credential {
    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, token: Option<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) =
            token.filter(|token| !token.is_empty());
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.get().is_some() { "set" } else { "unset" };
        f.debug_tuple("Credential").field(&state).finish()
    }
}

#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;
    async fn signup(&self, request: &SignupRequest) -> ApiResult<()>;
    async fn current_user(&self) -> ApiResult<User>;
}

#[allow(async_fn_in_trait)]
pub trait RechargeApi {
    async fn services(&self) -> ApiResult<Vec<ServiceDto>>;
    async fn operators(&self, service_type: ServiceType) -> ApiResult<Vec<Operator>>;
    async fn plans(&self, operator_code: &str, identifier: &str) -> ApiResult<Vec<Plan>>;
    async fn initiate_recharge(&self, request: &RechargeRequest) -> ApiResult<RechargeAccepted>;
    async fn recharge_status(&self, transaction_id: &str) -> ApiResult<Recharge>;
    async fn retry_recharge(&self, transaction_id: &str) -> ApiResult<RetryAccepted>;
    async fn history(&self, filters: &HistoryFilters) -> ApiResult<HistoryPage>;
    async fn summary(&self) -> ApiResult<Summary>;
}
