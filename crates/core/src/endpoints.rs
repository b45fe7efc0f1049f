// crates/core/src/endpoints.rs

//! Typed calls for every backend endpoint the client uses.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::api_client::{ApiClient, ApiRequest};
use crate::completion::parse_status_list;
use crate::error::{ApiError, ApiResult};
use crate::inventory::{
    self, AddAsset, Asset, AvailableItem, EditAsset, EmployeeInventory, RemoveAsset, StockChange,
    ToolRequest,
};
use crate::session::SessionUser;
use crate::types::{EmployeeStatus, MeetingKind, Period};

/// Body of a "meeting held" POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkCompletedRequest {
    pub manager_name: String,
    pub employee_name: String,
    pub designation: String,
    /// YYYY-MM-DD
    pub date: String,
    pub month: String,
    pub year: String,
}

/// Cheap to clone; all clones share one transport.
#[derive(Clone)]
pub struct HrApi {
    client: Arc<dyn ApiClient>,
}

impl HrApi {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<SessionUser> {
        let body = self
            .client
            .send(
                ApiRequest::post("/api/login")
                    .with_body(json!({ "email": email, "password": password })),
            )
            .await?;
        let user = body
            .get("user")
            .filter(|u| u.is_object())
            .cloned()
            .ok_or_else(|| ApiError::Rejected("login response without user".into()))?;
        serde_json::from_value(user).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Raw roster listing; see [`crate::roster::normalize_roster`].
    pub async fn list_meetings(&self, kind: MeetingKind) -> ApiResult<Value> {
        self.client.send(ApiRequest::get(kind.meetings_path())).await
    }

    pub async fn employee_status(
        &self,
        kind: MeetingKind,
        manager: &str,
        period: &Period,
    ) -> ApiResult<Vec<EmployeeStatus>> {
        let path = format!(
            "{}/{}/{}/{}",
            kind.status_path(),
            urlencoding::encode(manager),
            urlencoding::encode(period.month().name()),
            urlencoding::encode(period.year()),
        );
        let body = self.client.send(ApiRequest::get(path)).await?;
        parse_status_list(&body)
    }

    pub async fn mark_completed(
        &self,
        kind: MeetingKind,
        request: &MarkCompletedRequest,
    ) -> ApiResult<Value> {
        self.send_json(ApiRequest::post(kind.meetings_path()), request)
            .await
    }

    // ── employee-facing inventory ───────────────────────────────────────────

    pub async fn my_assets(&self, employee: &str) -> ApiResult<Vec<Asset>> {
        let body = self
            .client
            .send(ApiRequest::get("/api/inventory_details").with_query("name", employee))
            .await?;
        Ok(inventory::normalize_employee_assets(&body, employee))
    }

    pub async fn request_tool(&self, request: &ToolRequest) -> ApiResult<Value> {
        self.send_json(ApiRequest::post("/api/inventory_request"), request)
            .await
    }

    pub async fn add_my_asset(&self, request: &AddAsset) -> ApiResult<Value> {
        self.send_json(ApiRequest::post("/api/inventory_details"), request)
            .await
    }

    pub async fn remove_my_asset(&self, request: &RemoveAsset) -> ApiResult<Value> {
        self.send_json(ApiRequest::delete("/api/inventory_details"), request)
            .await
    }

    // ── administrator ledger ────────────────────────────────────────────────

    pub async fn all_inventories(&self) -> ApiResult<Vec<EmployeeInventory>> {
        let body = self
            .client
            .send(ApiRequest::get("/api/inventory_management"))
            .await?;
        Ok(inventory::normalize_inventories(&body))
    }

    pub async fn employee_inventory(&self, employee: &str) -> ApiResult<Vec<Asset>> {
        let body = self
            .client
            .send(ApiRequest::get("/api/inventory_management").with_query("name", employee))
            .await?;
        Ok(inventory::normalize_admin_employee_assets(&body))
    }

    pub async fn add_stock(&self, request: &AddAsset) -> ApiResult<Value> {
        self.send_json(ApiRequest::post("/api/inventory_management"), request)
            .await
    }

    pub async fn edit_ledger_asset(&self, request: &EditAsset) -> ApiResult<Value> {
        self.send_json(ApiRequest::put("/api/inventory_management"), request)
            .await
    }

    pub async fn remove_ledger_asset(&self, request: &RemoveAsset) -> ApiResult<Value> {
        self.send_json(ApiRequest::delete("/api/inventory_management"), request)
            .await
    }

    pub async fn available_stock(&self) -> ApiResult<Vec<AvailableItem>> {
        let body = self
            .client
            .send(ApiRequest::get("/api/inventory_available"))
            .await?;
        Ok(inventory::normalize_available(&body))
    }

    pub async fn change_stock(&self, request: &StockChange) -> ApiResult<Value> {
        self.send_json(ApiRequest::post("/api/inventory_available"), request)
            .await
    }

    async fn send_json<T: Serialize>(&self, request: ApiRequest, body: &T) -> ApiResult<Value> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.client.send(request.with_body(body)).await
    }
}
