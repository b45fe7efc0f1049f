// crates/core/src/inventory.rs

//! Inventory ledger payloads.
//!
//! Like the meetings listing, the inventory endpoints are inconsistent about
//! response shape. The normalizers here are total: an unrecognized body is an
//! empty list.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::roster::is_truthy;

/// Holder name the backend uses for unassigned company stock.
pub const GENERAL_INVENTORY: &str = "General Inventory";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub name: String,
    pub quantity: i64,
}

/// Assets held by one employee, in the order the backend listed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeInventory {
    pub name: String,
    pub assets: Vec<Asset>,
}

impl EmployeeInventory {
    pub fn total_quantity(&self) -> i64 {
        self.assets.iter().map(|a| a.quantity).sum()
    }
}

/// Unassigned stock for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableItem {
    pub asset: String,
    pub quantity: i64,
}

/// `GET /api/inventory_details?name=` for the logged-in employee.
///
/// Only returns assets when the response names the requested employee.
pub fn normalize_employee_assets(payload: &Value, employee: &str) -> Vec<Asset> {
    if !is_truthy(payload.get("success")) {
        return Vec::new();
    }
    match payload.get("inventory").and_then(parse_inventory) {
        Some(inventory) if inventory.name == employee => inventory.assets,
        _ => Vec::new(),
    }
}

/// `GET /api/inventory_management?name=` as seen by an administrator.
pub fn normalize_admin_employee_assets(payload: &Value) -> Vec<Asset> {
    if !is_truthy(payload.get("success")) {
        return Vec::new();
    }
    payload
        .get("inventory")
        .and_then(|inv| inv.get("inventory_details"))
        .and_then(Value::as_object)
        .map(assets_from)
        .unwrap_or_default()
}

/// `GET /api/inventory_management`: every employee's holdings.
///
/// Accepts an array of `{inventory: {...}}`, a single such object, or
/// `{inventories: [...]}`.
pub fn normalize_inventories(payload: &Value) -> Vec<EmployeeInventory> {
    if let Some(items) = payload.as_array() {
        return items_from(items);
    }
    if let Some(inventory) = payload.get("inventory").and_then(parse_inventory) {
        return vec![inventory];
    }
    if let Some(items) = payload.get("inventories").and_then(Value::as_array) {
        return items_from(items);
    }
    Vec::new()
}

/// `GET /api/inventory_available`: `{success, inventory: {asset: qty}}`.
pub fn normalize_available(payload: &Value) -> Vec<AvailableItem> {
    if !is_truthy(payload.get("success")) {
        return Vec::new();
    }
    payload
        .get("inventory")
        .and_then(Value::as_object)
        .map(|details| {
            details
                .iter()
                .map(|(asset, qty)| AvailableItem {
                    asset: asset.clone(),
                    quantity: quantity(qty),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn items_from(items: &[Value]) -> Vec<EmployeeInventory> {
    items
        .iter()
        .filter_map(|item| item.get("inventory").and_then(parse_inventory))
        .collect()
}

/// `{name, inventory_details: {asset: qty}}` with a non-empty name.
fn parse_inventory(inventory: &Value) -> Option<EmployeeInventory> {
    let name = inventory
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())?;
    let details = inventory.get("inventory_details")?.as_object()?;
    Some(EmployeeInventory {
        name: name.to_string(),
        assets: assets_from(details),
    })
}

fn assets_from(details: &Map<String, Value>) -> Vec<Asset> {
    details
        .iter()
        .map(|(name, qty)| Asset {
            name: name.clone(),
            quantity: quantity(qty),
        })
        .collect()
}

/// Numbers and numeric strings count; anything else is 0.
fn quantity(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Write requests
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/inventory_request`
#[derive(Debug, Clone, Serialize)]
pub struct ToolRequest {
    pub name: String,
    pub tool_needed: String,
    pub reason: String,
}

/// `POST /api/inventory_details` and `POST /api/inventory_management`
#[derive(Debug, Clone, Serialize)]
pub struct AddAsset {
    pub action: &'static str,
    pub name: String,
    pub item: String,
    pub quantity: i64,
}

impl AddAsset {
    pub fn new(holder: &str, item: &str, quantity: i64) -> Self {
        Self {
            action: "add",
            name: holder.to_string(),
            item: item.to_string(),
            quantity,
        }
    }
}

/// `PUT /api/inventory_management`
#[derive(Debug, Clone, Serialize)]
pub struct EditAsset {
    pub action: &'static str,
    pub name: String,
    pub original_item: String,
    pub item: String,
    pub quantity: i64,
}

impl EditAsset {
    pub fn new(holder: &str, original_item: &str, item: &str, quantity: i64) -> Self {
        Self {
            action: "edit",
            name: holder.to_string(),
            original_item: original_item.to_string(),
            item: item.to_string(),
            quantity,
        }
    }
}

/// `DELETE /api/inventory_details` and `DELETE /api/inventory_management`
#[derive(Debug, Clone, Serialize)]
pub struct RemoveAsset {
    pub inventory_details: Map<String, Value>,
    pub name: String,
}

impl RemoveAsset {
    pub fn new(holder: &str, item: &str, quantity: i64) -> Self {
        let mut inventory_details = Map::new();
        inventory_details.insert(item.to_string(), Value::from(quantity));
        Self {
            inventory_details,
            name: holder.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    Edit,
    Delete,
}

/// `POST /api/inventory_available`
#[derive(Debug, Clone, Serialize)]
pub struct StockChange {
    pub action: StockAction,
    pub asset: String,
    pub quantity: i64,
}
