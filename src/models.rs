use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceType {
    Mobile,
    Dth,
    Bill,
    Data,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Mobile,
        ServiceType::Dth,
        ServiceType::Bill,
        ServiceType::Data,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Mobile => "MOBILE",
            ServiceType::Dth => "DTH",
            ServiceType::Bill => "BILL",
            ServiceType::Data => "DATA",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MOBILE" => Some(ServiceType::Mobile),
            "DTH" => Some(ServiceType::Dth),
            "BILL" => Some(ServiceType::Bill),
            "DATA" => Some(ServiceType::Data),
            _ => None,
        }
    }

    /// Mobile-number based services share the mobile masking rule.
    pub fn is_mobile_number(&self) -> bool {
        matches!(self, ServiceType::Mobile | ServiceType::Data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxStatus {
    Pending,
    Success,
    Failed,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "PENDING",
            TxStatus::Success => "SUCCESS",
            TxStatus::Failed => "FAILED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(TxStatus::Pending),
            "SUCCESS" => Some(TxStatus::Success),
            "FAILED" => Some(TxStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TxStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "UPI")]
    Upi,
    Card,
    Wallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Upi, PaymentMethod::Card, PaymentMethod::Wallet];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
            PaymentMethod::Wallet => "Wallet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
}

/// Operator as embedded in a transaction (`{ name, code }`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatorRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}

impl From<&Operator> for OperatorRef {
    fn from(operator: &Operator) -> Self {
        Self {
            name: operator.name.clone(),
            code: operator.code.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub validity: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, rename = "type")]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// A recharge transaction as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recharge {
    pub transaction_id: String,
    pub service_type: ServiceType,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub operator: Option<OperatorRef>,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub status: TxStatus,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
}

// ===== Dashboard summary =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    #[serde(default)]
    pub success: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub failed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBreakdown {
    pub id: ServiceType,
    #[serde(default)]
    pub total_transactions: u64,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub status: StatusBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub total_recharges: u64,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub status: StatusBreakdown,
    #[serde(default)]
    pub last_recharge: Option<Recharge>,
    #[serde(default)]
    pub services: Vec<ServiceBreakdown>,
    #[serde(default)]
    pub recent_recharges: Vec<Recharge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recharge_deserializes_backend_shape() {
        let raw = serde_json::json!({
            "transactionId": "TXN123",
            "serviceType": "MOBILE",
            "identifier": "9876543210",
            "operator": { "name": "Jio", "code": "JIO" },
            "plan": { "id": "p1", "name": "Unlimited 28d", "amount": 199, "type": "Unlimited" },
            "amount": 199,
            "paymentMethod": "UPI",
            "status": "PENDING",
            "createdAt": "2026-10-19T10:30:00Z"
        });

        let recharge: Recharge = serde_json::from_value(raw).expect("recharge");
        assert_eq!(recharge.status, TxStatus::Pending);
        assert_eq!(recharge.service_type, ServiceType::Mobile);
        assert_eq!(recharge.plan.as_ref().map(|p| p.amount), Some(199.0));
        assert_eq!(
            recharge.plan.and_then(|p| p.plan_type).as_deref(),
            Some("Unlimited")
        );
        assert!(recharge.resolved_at.is_none());
    }

    #[test]
    fn user_accepts_mongo_style_id() {
        let user: User =
            serde_json::from_value(serde_json::json!({ "_id": "u1", "name": "Asha Rao", "email": "asha@example.com" }))
                .expect("user");
        assert_eq!(user.id.as_deref(), Some("u1"));
    }

    #[test]
    fn payment_method_wire_names() {
        assert_eq!(serde_json::to_value(PaymentMethod::Upi).unwrap(), "UPI");
        assert_eq!(serde_json::to_value(PaymentMethod::Wallet).unwrap(), "Wallet");
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!TxStatus::Pending.is_terminal());
        assert!(TxStatus::Success.is_terminal());
        assert!(TxStatus::Failed.is_terminal());
    }
}
