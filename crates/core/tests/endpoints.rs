mod common;

use common::{api, FakeClient, Reply};
use hr_admin_core::inventory::{AddAsset, RemoveAsset, StockAction, StockChange, ToolRequest};
use hr_admin_core::session::is_admin_identity;
use hr_admin_core::{ApiError, MeetingKind, Method, Month, Period};
use serde_json::json;

#[tokio::test]
async fn login_returns_the_user_blob() {
    let fake = FakeClient::new();
    fake.json(
        Method::Post,
        "/api/login",
        json!({"user": {"email": "admin", "name": "Administrator", "id": 1}}),
    );

    let user = api(&fake).login("admin", "secret").await.unwrap();

    assert_eq!(user.email.as_deref(), Some("admin"));
    assert!(is_admin_identity(&user));
    let sent = &fake.requests()[0];
    assert_eq!(sent.body, Some(json!({"email": "admin", "password": "secret"})));
}

#[tokio::test]
async fn login_failure_carries_server_message() {
    let fake = FakeClient::new();
    fake.reply(Method::Post, "/api/login", Reply::Status(401, "Invalid credentials"));

    let err = api(&fake).login("dan", "nope").await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 401: Invalid credentials");
}

#[tokio::test]
async fn login_without_user_is_rejected() {
    let fake = FakeClient::new();
    fake.json(Method::Post, "/api/login", json!({"success": true}));

    let err = api(&fake).login("dan", "pw").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected(_)));
}

#[tokio::test]
async fn status_path_segments_are_encoded() {
    let fake = FakeClient::new();
    fake.json(
        Method::Get,
        "/api/performance_status/Ann%20Lee/October/2025",
        json!({"success": true, "employees": [{"name": "Raj", "designation": "Ops", "status": "completed"}]}),
    );

    let period = Period::new(MeetingKind::Performance, Month::October, "2025").unwrap();
    let statuses = api(&fake)
        .employee_status(MeetingKind::Performance, "Ann Lee", &period)
        .await
        .unwrap();

    assert_eq!(statuses.len(), 1);
    assert!(statuses[0].is_completed());
}

#[tokio::test]
async fn my_assets_sends_name_query() {
    let fake = FakeClient::new();
    fake.json(
        Method::Get,
        "/api/inventory_details",
        json!({"success": true, "inventory": {"name": "Dan", "inventory_details": {"Laptop": 1}}}),
    );

    let assets = api(&fake).my_assets("Dan").await.unwrap();

    assert_eq!(assets.len(), 1);
    assert_eq!(
        fake.requests()[0].query,
        vec![("name".to_string(), "Dan".to_string())]
    );
}

#[tokio::test]
async fn inventory_writes_hit_their_endpoints() {
    let fake = FakeClient::new();
    let ok = json!({"success": true});
    fake.json(Method::Post, "/api/inventory_request", ok.clone());
    fake.json(Method::Post, "/api/inventory_management", ok.clone());
    fake.json(Method::Delete, "/api/inventory_details", ok.clone());
    fake.json(Method::Post, "/api/inventory_available", ok);
    let hr = api(&fake);

    hr.request_tool(&ToolRequest {
        name: "Dan".into(),
        tool_needed: "Multimeter".into(),
        reason: "field visit".into(),
    })
    .await
    .unwrap();
    hr.add_stock(&AddAsset::new("General Inventory", "Laptop", 3))
        .await
        .unwrap();
    hr.remove_my_asset(&RemoveAsset::new("Dan", "Mouse", 2))
        .await
        .unwrap();
    hr.change_stock(&StockChange {
        action: StockAction::Edit,
        asset: "Laptop".into(),
        quantity: 7,
    })
    .await
    .unwrap();

    let requests = fake.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].body.as_ref().unwrap()["tool_needed"], "Multimeter");
    assert_eq!(requests[1].body.as_ref().unwrap()["action"], "add");
    assert_eq!(
        requests[2].body,
        Some(json!({"inventory_details": {"Mouse": 2}, "name": "Dan"}))
    );
    assert_eq!(requests[3].body.as_ref().unwrap()["action"], "edit");
}

#[tokio::test]
async fn ledger_reads_normalize_payloads() {
    let fake = FakeClient::new();
    fake.json(
        Method::Get,
        "/api/inventory_management",
        json!({"inventories": [
            {"inventory": {"name": "Dan", "inventory_details": {"Laptop": 1}}},
            {"inventory": {"name": "Eve", "inventory_details": {"Mouse": "2"}}}
        ]}),
    );
    fake.json(
        Method::Get,
        "/api/inventory_available",
        json!({"success": true, "inventory": {"Laptop": 5}}),
    );
    let hr = api(&fake);

    let all = hr.all_inventories().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].total_quantity(), 2);

    let available = hr.available_stock().await.unwrap();
    assert_eq!(available[0].asset, "Laptop");
    assert_eq!(available[0].quantity, 5);
}
