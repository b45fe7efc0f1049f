// crates/core/src/lib.rs

//! Client-side core of the HR administration tool.
//!
//! Everything here talks to a remote REST backend through [`api_client::ApiClient`].
//! The interesting parts are [`roster`] (turning the backend's several listing
//! shapes into one roster) and [`tracker`] (per-manager status fan-out and
//! completion statistics). [`session`] and [`inventory`] cover the rest of the
//! backend surface.

pub mod api_client;
pub mod completion;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http_client;
pub mod inventory;
pub mod roster;
pub mod session;
pub mod tracker;
pub mod types;

pub use api_client::{ApiClient, ApiRequest, Method};
pub use config::ApiConfig;
pub use endpoints::HrApi;
pub use error::{ApiError, ApiResult};
pub use http_client::HttpApiClient;
pub use tracker::CompletionTracker;
pub use types::{
    CompletionStats, Employee, EmployeeStatus, Manager, ManagerStatusMap, MeetingKind, Month,
    Period,
};
