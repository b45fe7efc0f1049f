// crates/core/src/tracker.rs

//! Per-meeting-kind completion tracking.
//!
//! A [`CompletionTracker`] owns everything one meetings tab shows: the selected
//! period, the normalized roster, the per-manager status map and the status
//! list of the manager being viewed. One-on-one and performance tracking use
//! separate trackers and never share state.
//!
//! Fetches are split into `begin_*` (captures a generation), `run` (the network
//! part, safe to spawn) and `apply_*` (drops results whose generation is no
//! longer current). Changing the period bumps the generations, so a slow
//! response for the old period cannot overwrite data for the new one.

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::completion::{completion_stats, stats_for_statuses};
use crate::endpoints::{HrApi, MarkCompletedRequest};
use crate::error::{ApiError, ApiResult};
use crate::roster::normalize_roster;
use crate::types::{
    CompletionStats, EmployeeStatus, Manager, ManagerStatusMap, MeetingKind, Period,
};

/// Fetch every manager's status list concurrently and wait for all of them.
///
/// Managers whose request fails in any way are left out of the map.
pub async fn fetch_all_managers_status(
    api: &HrApi,
    kind: MeetingKind,
    managers: &[String],
    period: &Period,
) -> ManagerStatusMap {
    let mut tasks = JoinSet::new();
    for manager in managers {
        let api = api.clone();
        let manager = manager.clone();
        let period = period.clone();
        tasks.spawn(async move {
            let result = api.employee_status(kind, &manager, &period).await;
            (manager, result)
        });
    }

    let mut map = ManagerStatusMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((manager, Ok(statuses))) => {
                debug!(%kind, manager = %manager, employees = statuses.len(), "status loaded");
                map.insert(manager, statuses);
            }
            Ok((manager, Err(e))) => {
                warn!(%kind, manager = %manager, error = %e, "status fetch failed");
            }
            Err(e) => {
                warn!(%kind, error = %e, "status task did not finish");
            }
        }
    }

    info!(%kind, period = %period, loaded = map.len(), requested = managers.len(), "manager statuses gathered");
    map
}

/// Pending bulk status fetch.
pub struct StatusFetch {
    generation: u64,
    kind: MeetingKind,
    period: Period,
    managers: Vec<String>,
    api: HrApi,
}

impl StatusFetch {
    pub async fn run(self) -> StatusFetchResult {
        let map = fetch_all_managers_status(&self.api, self.kind, &self.managers, &self.period).await;
        StatusFetchResult {
            generation: self.generation,
            period: self.period,
            map,
        }
    }
}

pub struct StatusFetchResult {
    generation: u64,
    period: Period,
    map: ManagerStatusMap,
}

/// Pending single-manager status fetch.
pub struct DetailFetch {
    generation: u64,
    kind: MeetingKind,
    period: Period,
    manager: String,
    api: HrApi,
}

impl DetailFetch {
    pub async fn run(self) -> DetailFetchResult {
        let result = self
            .api
            .employee_status(self.kind, &self.manager, &self.period)
            .await;
        DetailFetchResult {
            generation: self.generation,
            manager: self.manager,
            result,
        }
    }
}

pub struct DetailFetchResult {
    generation: u64,
    manager: String,
    result: ApiResult<Vec<EmployeeStatus>>,
}

/// Status list of the manager currently being viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerDetail {
    pub manager: String,
    pub statuses: Vec<EmployeeStatus>,
}

pub struct CompletionTracker {
    kind: MeetingKind,
    api: HrApi,
    period: Period,
    roster: Vec<Manager>,
    status_map: ManagerStatusMap,
    detail: Option<ManagerDetail>,
    last_error: Option<String>,
    map_generation: u64,
    detail_generation: u64,
}

impl CompletionTracker {
    /// Tracker for the period containing today.
    pub fn new(api: HrApi, kind: MeetingKind) -> Self {
        let period = Period::current(kind);
        Self {
            kind,
            api,
            period,
            roster: Vec::new(),
            status_map: ManagerStatusMap::new(),
            detail: None,
            last_error: None,
            map_generation: 0,
            detail_generation: 0,
        }
    }

    pub fn with_period(api: HrApi, kind: MeetingKind, period: Period) -> ApiResult<Self> {
        let mut tracker = Self::new(api, kind);
        tracker.set_period(period)?;
        Ok(tracker)
    }

    pub fn kind(&self) -> MeetingKind {
        self.kind
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn roster(&self) -> &[Manager] {
        &self.roster
    }

    pub fn manager(&self, name: &str) -> Option<&Manager> {
        self.roster.iter().find(|m| m.name == name)
    }

    pub fn status_map(&self) -> &ManagerStatusMap {
        &self.status_map
    }

    pub fn detail(&self) -> Option<&ManagerDetail> {
        self.detail.as_ref()
    }

    /// Error text from the last failed roster listing, if the last one failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Switch reporting period. Status data for the old period is dropped and
    /// any fetch still in flight for it will be discarded on arrival.
    pub fn set_period(&mut self, period: Period) -> ApiResult<()> {
        if !self.kind.allows(period.month()) {
            return Err(ApiError::InvalidPeriod(format!(
                "{} is not a {} month",
                period.month(),
                self.kind
            )));
        }
        if period != self.period {
            debug!(kind = %self.kind, from = %self.period, to = %period, "period changed");
        }
        self.period = period;
        self.status_map.clear();
        if let Some(detail) = self.detail.as_mut() {
            detail.statuses.clear();
        }
        self.map_generation += 1;
        self.detail_generation += 1;
        Ok(())
    }

    /// Reload the roster listing. On failure the roster is emptied and the
    /// error text kept in [`Self::last_error`].
    pub async fn refresh_roster(&mut self) -> &[Manager] {
        match self.api.list_meetings(self.kind).await {
            Ok(payload) => {
                self.roster = normalize_roster(&payload, &self.period);
                self.last_error = None;
                info!(kind = %self.kind, managers = self.roster.len(), "roster loaded");
            }
            Err(e) => {
                warn!(kind = %self.kind, error = %e, "roster listing failed");
                self.roster.clear();
                self.last_error = Some(e.to_string());
            }
        }
        &self.roster
    }

    pub fn begin_status_fetch(&mut self) -> StatusFetch {
        self.map_generation += 1;
        StatusFetch {
            generation: self.map_generation,
            kind: self.kind,
            period: self.period.clone(),
            managers: self.roster.iter().map(|m| m.name.clone()).collect(),
            api: self.api.clone(),
        }
    }

    /// Install a bulk result. Returns false if it was stale and dropped.
    pub fn apply_status(&mut self, result: StatusFetchResult) -> bool {
        if result.generation != self.map_generation || result.period != self.period {
            debug!(kind = %self.kind, period = %result.period, "dropping stale status map");
            return false;
        }
        self.status_map = result.map;
        true
    }

    /// Rebuild the status map for every manager in the roster.
    pub async fn refresh_all_status(&mut self) -> &ManagerStatusMap {
        let fetch = self.begin_status_fetch();
        let result = fetch.run().await;
        self.apply_status(result);
        &self.status_map
    }

    /// Select `manager` for the detail view and start fetching its statuses.
    pub fn begin_detail_fetch(&mut self, manager: &str) -> DetailFetch {
        self.detail_generation += 1;
        if self.detail.as_ref().map(|d| d.manager.as_str()) != Some(manager) {
            self.detail = Some(ManagerDetail {
                manager: manager.to_string(),
                statuses: Vec::new(),
            });
        }
        DetailFetch {
            generation: self.detail_generation,
            kind: self.kind,
            period: self.period.clone(),
            manager: manager.to_string(),
            api: self.api.clone(),
        }
    }

    /// Install a detail result.
    ///
    /// `Ok(false)` means it was stale and dropped. A failed fetch leaves the
    /// viewed manager with an empty list and hands the error back.
    pub fn apply_detail(&mut self, fetched: DetailFetchResult) -> ApiResult<bool> {
        if fetched.generation != self.detail_generation {
            debug!(kind = %self.kind, manager = %fetched.manager, "dropping stale manager status");
            return Ok(false);
        }
        let (statuses, outcome) = match fetched.result {
            Ok(statuses) => (statuses, Ok(true)),
            Err(e) => {
                warn!(kind = %self.kind, manager = %fetched.manager, error = %e, "manager status fetch failed");
                (Vec::new(), Err(e))
            }
        };
        self.detail = Some(ManagerDetail {
            manager: fetched.manager,
            statuses,
        });
        outcome
    }

    /// Load the status list for one manager's detail view.
    pub async fn fetch_single_manager_status(&mut self, manager: &str) -> ApiResult<()> {
        let fetch = self.begin_detail_fetch(manager);
        let result = fetch.run().await;
        self.apply_detail(result).map(|_| ())
    }

    /// Stats for the manager list, from the status map or the roster.
    pub fn stats(&self, manager: &str) -> CompletionStats {
        completion_stats(manager, &self.status_map, &self.roster)
    }

    /// Stats for the manager in the detail view, from its fetched list only.
    pub fn detail_stats(&self) -> Option<CompletionStats> {
        self.detail.as_ref().map(|d| stats_for_statuses(&d.statuses))
    }

    /// Whether any source of truth already shows this meeting as held.
    pub fn is_completed(&self, manager: &str, employee: &str) -> bool {
        let in_detail = self
            .detail
            .as_ref()
            .filter(|d| d.manager == manager)
            .and_then(|d| d.statuses.iter().find(|s| s.name == employee))
            .is_some_and(EmployeeStatus::is_completed);
        let in_map = self
            .status_map
            .get(manager)
            .and_then(|list| list.iter().find(|s| s.name == employee))
            .is_some_and(EmployeeStatus::is_completed);
        let in_roster = self
            .manager(manager)
            .and_then(|m| m.find_employee(employee))
            .is_some_and(|e| e.is_completed);
        in_detail || in_map || in_roster
    }

    /// Record a held meeting for `employee`, then reload that manager's status.
    ///
    /// The refresh is issued only after the POST has finished. Failure of the
    /// POST is returned and leaves all local state untouched.
    pub async fn mark_completed(&mut self, manager: &str, employee: &str) -> ApiResult<()> {
        if self.is_completed(manager, employee) {
            return Err(ApiError::AlreadyCompleted {
                employee: employee.to_string(),
                kind: self.kind.label(),
            });
        }

        let request = MarkCompletedRequest {
            manager_name: manager.to_string(),
            employee_name: employee.to_string(),
            designation: self.designation_of(manager, employee),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            month: self.period.month().name().to_string(),
            year: self.period.year().to_string(),
        };

        self.api.mark_completed(self.kind, &request).await?;
        info!(kind = %self.kind, manager, employee, period = %self.period, "meeting marked completed");

        match self.fetch_single_manager_status(manager).await {
            Ok(()) => {
                if let Some(detail) = self.detail.as_ref().filter(|d| d.manager == manager) {
                    self.status_map
                        .insert(manager.to_string(), detail.statuses.clone());
                }
            }
            Err(e) => {
                warn!(kind = %self.kind, manager, error = %e, "refresh after completion failed");
            }
        }
        Ok(())
    }

    fn designation_of(&self, manager: &str, employee: &str) -> String {
        if let Some(e) = self.manager(manager).and_then(|m| m.find_employee(employee)) {
            return e.designation.clone();
        }
        self.detail
            .as_ref()
            .filter(|d| d.manager == manager)
            .and_then(|d| d.statuses.iter().find(|s| s.name == employee))
            .map(|s| s.designation.clone())
            .unwrap_or_default()
    }
}
