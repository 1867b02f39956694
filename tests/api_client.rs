use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{
    body_json, body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rechargex::api::{ApiClient, ApiError, AuthApi, ClientConfig, Credential, RechargeApi};
use rechargex::dto::LoginRequest;
use rechargex::history::{FilterChange, HistoryFilters};
use rechargex::models::{Operator, Plan, ServiceType, TxStatus};
use rechargex::recharge::{self, RechargeForm};
use rechargex::session::{MemoryStore, Session, SessionEvent};
use rechargex::status::{self, watch_status};

fn client(server: &MockServer, credential: Credential) -> ApiClient {
    let config = ClientConfig {
        api_base_url: format!("{}/api", server.uri()),
        timeout: Duration::from_secs(5),
    };
    ApiClient::new(&config, credential).expect("client")
}

fn recharge_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "transactionId": id,
        "serviceType": "MOBILE",
        "identifier": "9876543210",
        "operator": { "name": "Jio", "code": "JIO" },
        "plan": { "id": "jio-239", "name": "Unlimited 28 days", "amount": 239 },
        "amount": 239,
        "paymentMethod": "UPI",
        "status": status,
        "failureReason": if status == "FAILED" { json!("Operator timeout") } else { json!(null) },
        "createdAt": "2026-10-19T10:30:00Z"
    })
}

#[tokio::test]
async fn login_posts_credentials_and_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "identifier": "9876543210", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "token": "tok-1",
                "user": { "_id": "u1", "name": "Asha Rao", "email": "asha@rechargex.io" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, Credential::default());
    let auth = api
        .login(&LoginRequest {
            identifier: "9876543210".into(),
            password: "hunter22".into(),
        })
        .await
        .expect("login");

    assert_eq!(auth.token, "tok-1");
    let user = auth.user.expect("user");
    assert_eq!(user.id.as_deref(), Some("u1"));
    assert_eq!(user.name, "Asha Rao");
}

#[tokio::test]
async fn credential_is_sent_as_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .and(header("authorization", "Bearer tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "MOBILE", "name": "Mobile" }, { "id": "DTH" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = Credential::default();
    credential.set(Some("tok-2".into()));
    let services = client(&server, credential).services().await.expect("services");

    let ids: Vec<_> = services.iter().map(|service| service.id.as_str()).collect();
    assert_eq!(ids, ["MOBILE", "DTH"]);
}

#[tokio::test]
async fn backend_message_becomes_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Email already registered" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recharge/summary/metrics"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let api = client(&server, Credential::default());

    let err = api
        .signup(&rechargex::dto::SignupRequest {
            name: "Asha".into(),
            email: "asha@rechargex.io".into(),
            mobile_number: "9876543210".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");
    assert!(matches!(err, ApiError::Backend { status: 409, .. }));

    let err = api.summary().await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status code 500");
}

#[tokio::test]
async fn unauthorized_response_ends_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recharge/summary/metrics"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_token("stale"));
    let credential = Credential::default();
    let session = Session::new(Arc::clone(&store), credential.clone());
    let events = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&events);
    session.subscribe(Arc::new(move |_, event| seen.lock().unwrap().push(event)));

    let api = client(&server, credential.clone()).with_unauthorized_hook(session.unauthorized_hook());
    let err = api.summary().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Token expired");
    assert_eq!(session.state().token, None);
    assert_eq!(credential.get(), None);
    assert_eq!(rechargex::session::CredentialStore::load(&store), None);
    assert_eq!(
        events.lock().unwrap().as_slice(),
        [SessionEvent::LoggedOut { redirect: true }]
    );
}

#[tokio::test]
async fn restore_accepts_profile_under_user_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer persisted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "name": "Asha Rao", "email": "asha@rechargex.io", "mobileNumber": "9876543210" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = Credential::default();
    let session = Session::new(MemoryStore::with_token("persisted"), credential.clone());
    let api = client(&server, credential);

    assert!(session.state().loading);
    session.restore(&api).await;

    let state = session.state();
    assert!(!state.loading);
    assert!(state.is_authenticated());
    assert_eq!(state.user.unwrap().mobile_number.as_deref(), Some("9876543210"));
}

#[tokio::test]
async fn operators_and_plans_use_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/operators"))
        .and(query_param("serviceType", "DTH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "code": "TPD", "name": "Tata Play", "serviceType": "DTH" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/operators/JIO/plans"))
        .and(query_param("identifier", "9876543210"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, Credential::default());

    let operators = api.operators(ServiceType::Dth).await.expect("operators");
    assert_eq!(operators[0].code, "TPD");
    assert_eq!(operators[0].service_type, Some(ServiceType::Dth));

    let plans = api.plans("JIO", "9876543210").await.expect("plans");
    assert!(plans.is_empty());
}

#[tokio::test]
async fn history_sends_only_active_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recharge/history"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("status", "FAILED"))
        .and(query_param_is_missing("serviceType"))
        .and(query_param_is_missing("identifier"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "recharges": [recharge_json("TX-1", "FAILED")],
                "pagination": {
                    "currentPage": 2, "totalPages": 3, "totalRecords": 21,
                    "hasNext": true, "hasPrev": true
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = HistoryFilters::default()
        .with(FilterChange::Status(Some(TxStatus::Failed)))
        .with(FilterChange::Page(2));
    let page = client(&server, Credential::default())
        .history(&filters)
        .await
        .expect("history");

    assert_eq!(page.recharges.len(), 1);
    assert_eq!(page.pagination.total_records, 21);
    assert!(page.pagination.has_next);
}

#[tokio::test]
async fn submitted_form_posts_recharge_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recharge"))
        .and(body_partial_json(json!({
            "serviceType": "MOBILE",
            "identifier": "9876543210",
            "operator": { "name": "Jio", "code": "JIO" },
            "plan": { "id": "jio-239" },
            "amount": 239.0,
            "paymentMethod": "UPI"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "transactionId": "TX-42", "status": "PENDING" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = RechargeForm::new();
    let query = form.operator_query();
    form.apply_operators(
        query,
        Ok(vec![Operator {
            code: "JIO".into(),
            name: "Jio".into(),
            logo: None,
            service_type: Some(ServiceType::Mobile),
        }]),
    );
    form.set_identifier(" 9876543210 ");
    form.select_operator(form.operators()[0].clone());
    let plan_query = form.refresh_plans().expect("plan query");
    let plan = Plan {
        id: "jio-239".into(),
        name: "Unlimited 28 days".into(),
        amount: 239.0,
        ..Plan::default()
    };
    assert!(form.apply_plans(&plan_query, Ok(vec![plan.clone()])));
    form.select_plan(plan);

    let api = client(&server, Credential::default());
    let submitted = recharge::submit(&mut form, &api).await.expect("submitted");

    assert_eq!(submitted.transaction_id, "TX-42");
    assert_eq!(submitted.summary.status, TxStatus::Pending);
    assert_eq!(submitted.summary.amount, 239.0);
    assert!(!form.submitting());
}

#[tokio::test]
async fn terminal_status_stops_after_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recharge/TX-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": recharge_json("TX-7", "SUCCESS")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, Credential::default());
    let mut updates = 0;
    let view = watch_status(&api, "TX-7", None, status::POLL_INTERVAL, |_| updates += 1).await;

    assert_eq!(view.status(), TxStatus::Success);
    assert!(!view.polling);
    assert_eq!(updates, 2);
}

#[tokio::test]
async fn retry_hands_off_pending_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recharge/retry/TX-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "newTransactionId": "TX-10" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let failed: rechargex::models::Recharge =
        serde_json::from_value(recharge_json("TX-9", "FAILED")).expect("recharge");
    let api = client(&server, Credential::default());
    let submitted = status::retry(&api, &failed).await.expect("retry");

    assert_eq!(submitted.transaction_id, "TX-10");
    assert_eq!(submitted.summary.status, TxStatus::Pending);
    assert_eq!(submitted.summary.operator, failed.operator);
    assert_eq!(submitted.summary.amount, 239.0);
}
