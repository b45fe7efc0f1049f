// crates/host/src/app.rs

//! The interactive console: who is logged in, one tracker per meeting kind,
//! and the dispatch from parsed commands to backend calls.

use anyhow::{bail, Context, Result};
use tracing::info;

use hr_admin_core::inventory::{
    AddAsset, EditAsset, RemoveAsset, StockAction, StockChange, ToolRequest, GENERAL_INVENTORY,
};
use hr_admin_core::session::{is_admin_identity, SessionStore, SessionUser};
use hr_admin_core::types::available_years;
use hr_admin_core::{CompletionTracker, HrApi, MeetingKind, Period};

use crate::commands::{Command, HELP};
use crate::log::{self, Section};

/// What the prompt loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    api: HrApi,
    store: Box<dyn SessionStore>,
    user: Option<SessionUser>,
    one_on_one: CompletionTracker,
    performance: CompletionTracker,
}

impl Console {
    /// Build the console and pick up any session left from a previous run.
    pub fn new(api: HrApi, store: Box<dyn SessionStore>) -> Result<Self> {
        let user = store.load().context("loading stored session")?;
        if let Some(u) = &user {
            info!(user = u.display_name(), "restored session");
        }
        Ok(Self {
            one_on_one: CompletionTracker::new(api.clone(), MeetingKind::OneOnOne),
            performance: CompletionTracker::new(api.clone(), MeetingKind::Performance),
            api,
            store,
            user,
        })
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub async fn run(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(Flow::Quit),
            Command::Login { email, password } => self.login(&email, &password).await?,
            Command::Logout => self.logout()?,
            Command::WhoAmI => self.whoami(),

            Command::Managers(kind) => {
                self.require_admin()?;
                self.show_managers(kind).await;
            }
            Command::Manager { kind, name } => {
                self.require_admin()?;
                self.show_manager(kind, &name).await;
            }
            Command::Complete {
                kind,
                manager,
                employee,
            } => {
                self.require_admin()?;
                self.complete(kind, &manager, &employee).await?;
            }
            Command::Period { kind, change } => {
                self.require_admin()?;
                match change {
                    Some((month, year)) => self.change_period(kind, &month, &year).await?,
                    None => log::heading(
                        Section::Meetings(kind),
                        format!("Period: {}", self.tracker(kind).period()),
                    ),
                }
            }
            Command::Months(kind) => {
                self.require_admin()?;
                show_months(kind);
            }

            Command::Assets => {
                let user = self.require_user()?.display_name().to_string();
                self.show_my_assets(&user).await?;
            }
            Command::Request { tool, reason } => {
                let user = self.require_user()?.display_name().to_string();
                self.api
                    .request_tool(&ToolRequest {
                        name: user,
                        tool_needed: tool.clone(),
                        reason,
                    })
                    .await?;
                log::success(format!("Requested {tool}"));
            }
            Command::AddAsset { item, quantity } => {
                let user = self.require_user()?.display_name().to_string();
                self.api
                    .add_my_asset(&AddAsset::new(&user, &item, quantity))
                    .await?;
                log::success(format!("Added {quantity} x {item}"));
            }
            Command::RemoveAsset { item } => {
                let user = self.require_user()?.display_name().to_string();
                let held = self.api.my_assets(&user).await?;
                let Some(asset) = held.iter().find(|a| a.name == item) else {
                    bail!("you do not hold any {item}");
                };
                self.api
                    .remove_my_asset(&RemoveAsset::new(&user, &asset.name, asset.quantity))
                    .await?;
                log::success(format!("Removed {item}"));
            }

            Command::Ledger => {
                self.require_admin()?;
                self.show_ledger().await?;
            }
            Command::Holdings { employee } => {
                self.require_admin()?;
                let assets = self.api.employee_inventory(&employee).await?;
                log::heading(Section::Inventory, &employee);
                if assets.is_empty() {
                    log::row("No assets");
                }
                for asset in &assets {
                    log::row(format!("{:<24} {}", asset.name, asset.quantity));
                }
            }
            Command::Available => {
                self.require_admin()?;
                let stock = self.api.available_stock().await?;
                log::heading(Section::Inventory, "Available stock");
                if stock.is_empty() {
                    log::row("Nothing in stock");
                }
                for item in &stock {
                    log::row(format!("{:<24} {}", item.asset, item.quantity));
                }
            }
            Command::StockAdd { item, quantity } => {
                self.require_admin()?;
                self.api
                    .add_stock(&AddAsset::new(GENERAL_INVENTORY, &item, quantity))
                    .await?;
                log::success(format!("Added {quantity} x {item} to {GENERAL_INVENTORY}"));
            }
            Command::StockEdit { asset, quantity } => {
                self.require_admin()?;
                self.change_stock(StockAction::Edit, asset, quantity).await?;
            }
            Command::StockRemove { asset, quantity } => {
                self.require_admin()?;
                self.change_stock(StockAction::Delete, asset, quantity)
                    .await?;
            }
            Command::LedgerEdit {
                employee,
                item,
                new_item,
                quantity,
            } => {
                self.require_admin()?;
                self.api
                    .edit_ledger_asset(&EditAsset::new(&employee, &item, &new_item, quantity))
                    .await?;
                log::success(format!("Updated {employee}: {new_item} x {quantity}"));
            }
            Command::LedgerRemove { employee, item } => {
                self.require_admin()?;
                let held = self.api.employee_inventory(&employee).await?;
                let Some(asset) = held.iter().find(|a| a.name == item) else {
                    bail!("{employee} does not hold any {item}");
                };
                self.api
                    .remove_ledger_asset(&RemoveAsset::new(&employee, &asset.name, asset.quantity))
                    .await?;
                log::success(format!("Removed {item} from {employee}"));
            }
        }
        Ok(Flow::Continue)
    }

    async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let user = self.api.login(email, password).await?;
        self.store.save(&user).context("saving session")?;
        let role = if is_admin_identity(&user) {
            "admin"
        } else {
            "employee"
        };
        log::success(format!("Welcome, {} ({role})", user.display_name()));
        self.user = Some(user);
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.store.clear().context("clearing session")?;
        self.user = None;
        log::info("Logged out");
        Ok(())
    }

    fn whoami(&self) {
        match &self.user {
            Some(user) if is_admin_identity(user) => {
                log::info(format!("{} (admin)", user.display_name()))
            }
            Some(user) => log::info(user.display_name()),
            None => log::info("Not logged in"),
        }
    }

    fn require_user(&self) -> Result<&SessionUser> {
        self.user
            .as_ref()
            .context("not logged in (use 'login <email> <password>')")
    }

    fn require_admin(&self) -> Result<&SessionUser> {
        let user = self.require_user()?;
        if !is_admin_identity(user) {
            bail!("this command is for the administrator only");
        }
        Ok(user)
    }

    fn tracker(&self, kind: MeetingKind) -> &CompletionTracker {
        match kind {
            MeetingKind::OneOnOne => &self.one_on_one,
            MeetingKind::Performance => &self.performance,
        }
    }

    fn tracker_mut(&mut self, kind: MeetingKind) -> &mut CompletionTracker {
        match kind {
            MeetingKind::OneOnOne => &mut self.one_on_one,
            MeetingKind::Performance => &mut self.performance,
        }
    }

    /// Reload roster and every manager's status, then print the list.
    async fn show_managers(&mut self, kind: MeetingKind) {
        let tracker = self.tracker_mut(kind);
        tracker.refresh_roster().await;
        if let Some(e) = tracker.last_error() {
            log::error(format!("Could not load {} meetings: {e}", kind.label()));
            return;
        }
        tracker.refresh_all_status().await;
        print_managers(tracker);
    }

    async fn show_manager(&mut self, kind: MeetingKind, name: &str) {
        let tracker = self.tracker_mut(kind);
        if tracker.roster().is_empty() {
            tracker.refresh_roster().await;
        }
        if let Err(e) = tracker.fetch_single_manager_status(name).await {
            log::warn(format!("Could not load status for {name}: {e}"));
        }
        print_detail(tracker);
    }

    async fn complete(&mut self, kind: MeetingKind, manager: &str, employee: &str) -> Result<()> {
        let tracker = self.tracker_mut(kind);
        if tracker.roster().is_empty() {
            tracker.refresh_roster().await;
        }
        if tracker.detail().map(|d| d.manager.as_str()) != Some(manager) {
            // Best effort; completion state also comes from the roster.
            let _ = tracker.fetch_single_manager_status(manager).await;
        }
        tracker
            .mark_completed(manager, employee)
            .await
            .context("failed to update meeting")?;
        log::success("Meeting marked as completed!");
        print_detail(tracker);
        Ok(())
    }

    async fn change_period(&mut self, kind: MeetingKind, month: &str, year: &str) -> Result<()> {
        let period = Period::parse(kind, month, year)?;
        let tracker = self.tracker_mut(kind);
        tracker.set_period(period)?;
        log::heading(
            Section::Meetings(kind),
            format!("Period: {}", tracker.period()),
        );

        // Views already on screen are reloaded for the new period.
        let viewed = tracker.detail().map(|d| d.manager.clone());
        if !tracker.roster().is_empty() {
            tracker.refresh_roster().await;
            tracker.refresh_all_status().await;
            print_managers(tracker);
        }
        if let Some(manager) = viewed {
            if let Err(e) = tracker.fetch_single_manager_status(&manager).await {
                log::warn(format!("Could not load status for {manager}: {e}"));
            }
        }
        Ok(())
    }

    async fn show_my_assets(&self, user: &str) -> Result<()> {
        let assets = self.api.my_assets(user).await?;
        log::heading(Section::Inventory, format!("Assets held by {user}"));
        if assets.is_empty() {
            log::row("No assets");
        }
        for asset in &assets {
            log::row(format!("{:<24} {}", asset.name, asset.quantity));
        }
        Ok(())
    }

    async fn show_ledger(&self) -> Result<()> {
        let inventories = self.api.all_inventories().await?;
        log::heading(Section::Inventory, "Holdings by employee");
        if inventories.is_empty() {
            log::row("No inventory records");
        }
        for inventory in &inventories {
            log::row(format!(
                "{} ({} items)",
                inventory.name,
                inventory.total_quantity()
            ));
            for asset in &inventory.assets {
                log::row(format!("  {:<22} {}", asset.name, asset.quantity));
            }
        }
        Ok(())
    }

    async fn change_stock(&self, action: StockAction, asset: String, quantity: i64) -> Result<()> {
        self.api
            .change_stock(&StockChange {
                action,
                asset: asset.clone(),
                quantity,
            })
            .await?;
        log::success(format!("Stock updated for {asset}"));
        Ok(())
    }
}

fn print_managers(tracker: &CompletionTracker) {
    let kind = tracker.kind();
    log::heading(
        Section::Meetings(kind),
        format!("{} meetings, {}", kind.label(), tracker.period()),
    );
    if tracker.roster().is_empty() {
        log::row("No managers found");
    }
    for manager in tracker.roster() {
        log::manager_line(&manager.name, tracker.stats(&manager.name));
    }
}

fn print_detail(tracker: &CompletionTracker) {
    let Some(detail) = tracker.detail() else {
        return;
    };
    let kind = tracker.kind();
    log::heading(
        Section::Meetings(kind),
        format!("{}, {}", detail.manager, tracker.period()),
    );
    if detail.statuses.is_empty() {
        log::row("No employees");
    }
    for status in &detail.statuses {
        log::employee_line(&status.name, &status.designation, status.is_completed());
    }
    if let Some(stats) = tracker.detail_stats() {
        log::manager_line(&detail.manager, stats);
    }
}

fn show_months(kind: MeetingKind) {
    let months: Vec<&str> = kind.eligible_months().iter().map(|m| m.name()).collect();
    let years = available_years();
    log::heading(Section::Meetings(kind), format!("{} periods", kind.label()));
    log::row(format!("Months: {}", months.join(", ")));
    if let (Some(first), Some(last)) = (years.first(), years.last()) {
        log::row(format!("Years:  {first} to {last}"));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use hr_admin_core::session::MemorySessionStore;
    use hr_admin_core::{ApiClient, ApiError, ApiRequest, ApiResult};
    use serde_json::{json, Value};

    use super::*;

    /// Answers login with whatever user it was built with; nothing else.
    struct LoginOnly(Value);

    #[async_trait]
    impl ApiClient for LoginOnly {
        async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
            if request.path == "/api/login" {
                Ok(json!({ "user": self.0.clone() }))
            } else {
                Err(ApiError::Status {
                    status: 404,
                    message: "Not Found".into(),
                })
            }
        }
    }

    fn console(user: Value) -> Console {
        let api = HrApi::new(Arc::new(LoginOnly(user)));
        Console::new(api, Box::new(MemorySessionStore::default())).unwrap()
    }

    #[tokio::test]
    async fn meetings_need_a_login() {
        let mut c = console(json!({"email": "admin"}));
        let err = c
            .run(Command::Managers(MeetingKind::OneOnOne))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not logged in"));
    }

    #[tokio::test]
    async fn employees_cannot_reach_admin_commands() {
        let mut c = console(json!({"email": "dan@corp.test", "name": "Dan"}));
        c.run(Command::Login {
            email: "dan@corp.test".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();

        assert_eq!(c.user().map(|u| u.display_name()), Some("Dan"));
        assert!(c.run(Command::Ledger).await.is_err());
        assert!(c
            .run(Command::Months(MeetingKind::Performance))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn logout_forgets_the_user() {
        let mut c = console(json!({"email": "admin"}));
        c.run(Command::Login {
            email: "admin".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();
        c.run(Command::Months(MeetingKind::Performance))
            .await
            .unwrap();

        c.run(Command::Logout).await.unwrap();
        assert!(c.user().is_none());
    }

    #[tokio::test]
    async fn quit_ends_the_loop() {
        let mut c = console(json!({}));
        assert_eq!(c.run(Command::Quit).await.unwrap(), Flow::Quit);
    }
}
