//! Recharge flow controller.
//!
//! [`RechargeForm`] owns every selection of the multi-step form and decides
//! which dependent fetch should run next. It never performs I/O itself: the
//! view asks for an [`OperatorQuery`] or [`PlanQuery`], runs it, and hands the
//! result back together with the key it was issued for. Results whose key is
//! no longer current are dropped.

use crate::api::{ApiResult, RechargeApi};
use crate::catalog::{default_service, merge_server_services, service_definition, ServiceDefinition, SERVICE_CATALOG};
use crate::dto::{PlanRef, RechargeAccepted, RechargeRequest, ServiceDto};
use crate::models::{Operator, OperatorRef, PaymentMethod, Plan, Recharge, ServiceType, TxStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please complete all fields with valid data.")]
    InvalidIdentifier,
    #[error("Please complete all fields with valid data.")]
    MissingOperator,
    #[error("Please complete all fields with valid data.")]
    MissingPlan,
    #[error("Please enter a valid amount.")]
    InvalidAmount,
}

/// Key of the operator list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorQuery {
    pub service_type: ServiceType,
}

/// Key of the plan list fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanQuery {
    pub operator_code: String,
    pub service_type: ServiceType,
    pub identifier: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    ServiceSelected,
    IdentifierEntered,
    OperatorListed,
    OperatorSelected,
    PlanListed,
    PlanSelected,
    AmountEntered,
    Submitting,
}

impl FlowStage {
    /// Prompt shown next to the submit button.
    pub fn hint(self) -> &'static str {
        match self {
            FlowStage::ServiceSelected => "Enter the number or account you want to recharge.",
            FlowStage::IdentifierEntered | FlowStage::OperatorListed => "Pick your operator.",
            FlowStage::OperatorSelected => "Choose a plan or enter an amount to continue.",
            FlowStage::PlanListed => "Choose a plan to continue.",
            FlowStage::PlanSelected | FlowStage::AmountEntered => {
                "Review the summary and confirm your recharge."
            }
            FlowStage::Submitting => "Processing your recharge…",
        }
    }
}

/// What the status view shows before the authoritative fetch lands.
#[derive(Debug, Clone, PartialEq)]
pub struct RechargeSummary {
    pub service_type: ServiceType,
    pub identifier: Option<String>,
    pub mobile_number: Option<String>,
    pub operator: Option<OperatorRef>,
    pub plan: Option<Plan>,
    pub payment_method: Option<String>,
    pub amount: f64,
    pub status: TxStatus,
}

impl RechargeSummary {
    /// Carry a known transaction over to a new attempt, marked pending.
    pub fn pending_retry_of(recharge: &Recharge) -> Self {
        Self {
            service_type: recharge.service_type,
            identifier: recharge.identifier.clone(),
            mobile_number: recharge.mobile_number.clone(),
            operator: recharge.operator.clone(),
            plan: recharge.plan.clone(),
            payment_method: recharge.payment_method.clone(),
            amount: recharge.amount,
            status: TxStatus::Pending,
        }
    }

    /// A transaction record built from this summary for provisional display.
    pub fn provisional(&self, transaction_id: &str) -> Recharge {
        Recharge {
            transaction_id: transaction_id.to_string(),
            service_type: self.service_type,
            identifier: self.identifier.clone(),
            mobile_number: self.mobile_number.clone(),
            operator: self.operator.clone(),
            plan: self.plan.clone(),
            amount: self.amount,
            payment_method: self.payment_method.clone(),
            status: self.status,
            failure_reason: None,
            created_at: None,
            resolved_at: None,
        }
    }
}

/// An accepted submission, ready for the status view.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub transaction_id: String,
    pub summary: RechargeSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RechargeForm {
    services: Vec<ServiceDefinition>,
    service: ServiceType,
    identifier: String,
    operators: Vec<Operator>,
    operator: Option<Operator>,
    plans: Vec<Plan>,
    plan: Option<Plan>,
    amount: String,
    payment_method: PaymentMethod,
    loading_operators: bool,
    loading_plans: bool,
    // Plan key whose result the form is waiting for.
    pending_plans: Option<PlanQuery>,
    error: Option<String>,
    submitting: bool,
}

impl Default for RechargeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RechargeForm {
    pub fn new() -> Self {
        Self {
            services: SERVICE_CATALOG.to_vec(),
            service: default_service().id,
            identifier: String::new(),
            operators: Vec::new(),
            operator: None,
            plans: Vec::new(),
            plan: None,
            amount: String::new(),
            payment_method: PaymentMethod::default(),
            loading_operators: true,
            loading_plans: false,
            pending_plans: None,
            error: None,
            submitting: false,
        }
    }

    pub fn services(&self) -> &[ServiceDefinition] {
        &self.services
    }

    pub fn service(&self) -> ServiceType {
        self.service
    }

    pub fn definition(&self) -> &'static ServiceDefinition {
        service_definition(self.service)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn selected_operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn selected_plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn loading_operators(&self) -> bool {
        self.loading_operators
    }

    pub fn loading_plans(&self) -> bool {
        self.loading_plans
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn operator_query(&self) -> OperatorQuery {
        OperatorQuery {
            service_type: self.service,
        }
    }

    /// Adopt the backend's service list. A failed fetch keeps the local catalog.
    pub fn apply_services(&mut self, result: ApiResult<Vec<ServiceDto>>) {
        match result {
            Ok(services) if !services.is_empty() => self.services = merge_server_services(&services),
            Ok(_) => {}
            Err(e) => tracing::debug!("Service catalog unavailable, using local catalog: {e}"),
        }
    }

    /// Switch service and clear everything downstream of it. Returns the
    /// operator fetch to run for the new service.
    pub fn select_service(&mut self, service: ServiceType) -> OperatorQuery {
        self.service = service;
        self.identifier.clear();
        self.operators.clear();
        self.operator = None;
        self.plans.clear();
        self.plan = None;
        self.amount.clear();
        self.loading_operators = true;
        self.loading_plans = false;
        self.pending_plans = None;
        tracing::debug!(service = service.as_str(), "Service selected");
        self.operator_query()
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
    }

    pub fn select_operator(&mut self, operator: Operator) {
        self.operator = Some(operator);
        self.plan = None;
    }

    pub fn select_plan(&mut self, plan: Plan) {
        self.plan = Some(plan);
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn identifier_valid(&self) -> bool {
        self.definition().validates(&self.identifier)
    }

    /// The plan fetch the current selections call for, if any.
    pub fn plan_query(&self) -> Option<PlanQuery> {
        let definition = self.definition();
        if !definition.plan_required || !self.identifier_valid() {
            return None;
        }
        let operator = self.operator.as_ref()?;
        Some(PlanQuery {
            operator_code: operator.code.clone(),
            service_type: self.service,
            identifier: self.identifier.trim().to_string(),
        })
    }

    /// Reconcile the plan list with the current selections. Returns the query
    /// to fetch, or clears the plans when no fetch applies.
    pub fn refresh_plans(&mut self) -> Option<PlanQuery> {
        let Some(query) = self.plan_query() else {
            self.plans.clear();
            if self.definition().plan_required {
                self.plan = None;
            }
            self.loading_plans = false;
            self.pending_plans = None;
            return None;
        };

        if self.pending_plans.as_ref() != Some(&query) {
            tracing::debug!(operator = %query.operator_code, identifier = %query.identifier, "Plan fetch keyed");
            self.pending_plans = Some(query.clone());
            self.loading_plans = true;
        }
        Some(query)
    }

    /// Land an operator list. Returns false when `query` is stale.
    pub fn apply_operators(&mut self, query: OperatorQuery, result: ApiResult<Vec<Operator>>) -> bool {
        if query != self.operator_query() {
            tracing::debug!(stale = query.service_type.as_str(), "Discarding operator list");
            return false;
        }
        match result {
            Ok(operators) => self.operators = operators,
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading_operators = false;
        true
    }

    /// Land a plan list. Returns false when `query` is stale.
    pub fn apply_plans(&mut self, query: &PlanQuery, result: ApiResult<Vec<Plan>>) -> bool {
        if self.pending_plans.as_ref() != Some(query) || self.plan_query().as_ref() != Some(query) {
            tracing::debug!(operator = %query.operator_code, identifier = %query.identifier, "Discarding plan list");
            return false;
        }
        match result {
            Ok(plans) => {
                if let Some(selected) = &self.plan {
                    if !plans.iter().any(|plan| plan.id == selected.id) {
                        self.plan = None;
                    }
                }
                self.plans = plans;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading_plans = false;
        true
    }

    /// The typed amount when it is a positive finite number.
    fn typed_amount(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
    }

    /// Amount shown in the summary card; zero while incomplete.
    pub fn summary_amount(&self) -> f64 {
        if self.definition().plan_required {
            self.plan.as_ref().map_or(0.0, |plan| plan.amount)
        } else {
            self.typed_amount().unwrap_or(0.0)
        }
    }

    pub fn stage(&self) -> FlowStage {
        let plan_required = self.definition().plan_required;
        if self.submitting {
            FlowStage::Submitting
        } else if plan_required && self.plan.is_some() {
            FlowStage::PlanSelected
        } else if !plan_required && self.operator.is_some() && self.typed_amount().is_some() {
            FlowStage::AmountEntered
        } else if plan_required && self.operator.is_some() && !self.plans.is_empty() {
            FlowStage::PlanListed
        } else if self.operator.is_some() {
            FlowStage::OperatorSelected
        } else if !self.operators.is_empty() {
            FlowStage::OperatorListed
        } else if !self.identifier.trim().is_empty() {
            FlowStage::IdentifierEntered
        } else {
            FlowStage::ServiceSelected
        }
    }

    /// Build the submission payload, or say why it cannot be sent.
    pub fn validate(&self) -> Result<RechargeRequest, ValidationError> {
        let definition = self.definition();
        if !self.identifier_valid() {
            return Err(ValidationError::InvalidIdentifier);
        }
        let operator = self.operator.as_ref().ok_or(ValidationError::MissingOperator)?;

        let (plan, amount) = if definition.plan_required {
            let plan = self.plan.as_ref().ok_or(ValidationError::MissingPlan)?;
            (Some(PlanRef { id: plan.id.clone() }), plan.amount)
        } else {
            (None, self.typed_amount().ok_or(ValidationError::InvalidAmount)?)
        };
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::InvalidAmount);
        }

        Ok(RechargeRequest {
            service_type: definition.id,
            identifier: self.identifier.trim().to_string(),
            operator: OperatorRef::from(operator),
            plan,
            amount,
            payment_method: self.payment_method,
        })
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && self.validate().is_ok()
    }

    /// Start submitting. An invalid form records the error and returns `None`,
    /// in which case nothing may be sent.
    pub fn begin_submit(&mut self) -> Option<RechargeRequest> {
        self.error = None;
        match self.validate() {
            Ok(request) => {
                self.submitting = true;
                Some(request)
            }
            Err(e) => {
                tracing::debug!("Recharge rejected locally: {e:?}");
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Land the backend's answer to `request`.
    pub fn finish_submit(
        &mut self,
        request: &RechargeRequest,
        result: ApiResult<RechargeAccepted>,
    ) -> Option<Submitted> {
        self.submitting = false;
        match result {
            Ok(accepted) => {
                tracing::info!(transaction_id = %accepted.transaction_id, "Recharge submitted");
                Some(Submitted {
                    transaction_id: accepted.transaction_id,
                    summary: RechargeSummary {
                        service_type: request.service_type,
                        identifier: Some(request.identifier.clone()),
                        mobile_number: None,
                        operator: Some(request.operator.clone()),
                        plan: request.plan.as_ref().and(self.plan.clone()),
                        payment_method: Some(request.payment_method.as_str().to_string()),
                        amount: request.amount,
                        status: accepted.status,
                    },
                })
            }
            Err(e) => {
                tracing::warn!("Recharge submission failed: {e}");
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Back to the first service with every field cleared.
    pub fn reset(&mut self) -> OperatorQuery {
        self.payment_method = PaymentMethod::default();
        self.error = None;
        self.select_service(default_service().id)
    }
}

/// Validate, send and land one submission.
pub async fn submit<A: RechargeApi>(form: &mut RechargeForm, api: &A) -> Option<Submitted> {
    let request = form.begin_submit()?;
    let result = api.initiate_recharge(&request).await;
    form.finish_submit(&request, result)
}
