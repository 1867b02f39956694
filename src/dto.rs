use crate::models::{OperatorRef, PaymentMethod, Recharge, ServiceType, TxStatus, User};
use serde::{Deserialize, Serialize};

// ===== Envelopes =====

/// Every backend response carries its payload under `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ===== Auth DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// `/auth/me` has shipped the profile under `data`, under `user`, and bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProfileBody {
    Data { data: User },
    User { user: User },
    Bare(User),
}

impl ProfileBody {
    pub fn into_user(self) -> User {
        match self {
            ProfileBody::Data { data } => data,
            ProfileBody::User { user } => user,
            ProfileBody::Bare(user) => user,
        }
    }
}

// ===== Catalog DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

// ===== Recharge DTOs =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeRequest {
    pub service_type: ServiceType,
    pub identifier: String,
    pub operator: OperatorRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanRef>,
    pub amount: f64,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeAccepted {
    pub transaction_id: String,
    pub status: TxStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryAccepted {
    pub new_transaction_id: String,
}

// ===== History DTOs =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub recharges: Vec<Recharge>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_body_accepts_every_known_shape() {
        let wrapped: ProfileBody =
            serde_json::from_str(r#"{"data":{"name":"Asha","email":"a@x.io"}}"#).unwrap();
        let keyed: ProfileBody =
            serde_json::from_str(r#"{"user":{"name":"Asha","email":"a@x.io"}}"#).unwrap();
        let bare: ProfileBody = serde_json::from_str(r#"{"name":"Asha","email":"a@x.io"}"#).unwrap();

        for body in [wrapped, keyed, bare] {
            assert_eq!(body.into_user().name, "Asha");
        }
    }

    #[test]
    fn recharge_request_omits_missing_plan() {
        let request = RechargeRequest {
            service_type: ServiceType::Dth,
            identifier: "123456".into(),
            operator: OperatorRef {
                name: "Tata Play".into(),
                code: "TPD".into(),
            },
            plan: None,
            amount: 350.0,
            payment_method: PaymentMethod::Card,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["serviceType"], "DTH");
        assert_eq!(value["paymentMethod"], "Card");
        assert!(value.get("plan").is_none());
    }
}
