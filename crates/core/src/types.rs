// crates/core/src/types.rs

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Status string the backend uses for a meeting that was held.
pub const STATUS_COMPLETED: &str = "completed";

/// Years offered when picking a reporting period.
pub const YEAR_RANGE: RangeInclusive<i32> = 2020..=2040;

/// Performance reviews only run in these months.
pub const EVEN_MONTHS: [Month; 6] = [
    Month::February,
    Month::April,
    Month::June,
    Month::August,
    Month::October,
    Month::December,
];

/// The two recurring meeting types tracked per manager.
///
/// They share one algorithm and differ only in endpoints and eligible months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingKind {
    OneOnOne,
    Performance,
}

impl MeetingKind {
    /// GET returns the roster listing, POST marks one meeting completed.
    pub fn meetings_path(&self) -> &'static str {
        match self {
            MeetingKind::OneOnOne => "/api/one_on_one_meetings",
            MeetingKind::Performance => "/api/performance_meetings",
        }
    }

    /// Prefix of `/{manager}/{month}/{year}` status lookups.
    pub fn status_path(&self) -> &'static str {
        match self {
            MeetingKind::OneOnOne => "/api/employee_status",
            MeetingKind::Performance => "/api/performance_status",
        }
    }

    pub fn eligible_months(&self) -> &'static [Month] {
        match self {
            MeetingKind::OneOnOne => &Month::ALL,
            MeetingKind::Performance => &EVEN_MONTHS,
        }
    }

    pub fn allows(&self, month: Month) -> bool {
        self.eligible_months().contains(&month)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeetingKind::OneOnOne => "one-on-one",
            MeetingKind::Performance => "performance",
        }
    }
}

impl fmt::Display for MeetingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// English month name, as the backend expects it in paths and bodies.
    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Month> {
        Month::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    /// Case-insensitive match on the full English name.
    pub fn from_name(name: &str) -> Option<Month> {
        let name = name.trim();
        Month::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::from_name(s).ok_or_else(|| ApiError::InvalidPeriod(format!("unknown month '{s}'")))
    }
}

/// A reporting cycle: month name plus four-digit year.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period {
    month: Month,
    year: String,
}

impl Period {
    /// Build a period for `kind`, rejecting months that kind does not run in.
    pub fn new(kind: MeetingKind, month: Month, year: impl Into<String>) -> Result<Self, ApiError> {
        let year = year.into();
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ApiError::InvalidPeriod(format!(
                "year must be four digits, got '{year}'"
            )));
        }
        if !kind.allows(month) {
            return Err(ApiError::InvalidPeriod(format!(
                "{month} is not a {kind} month"
            )));
        }
        Ok(Self { month, year })
    }

    pub fn parse(kind: MeetingKind, month: &str, year: &str) -> Result<Self, ApiError> {
        Self::new(kind, month.parse()?, year.trim())
    }

    /// Period containing `date`. Performance periods snap back to the latest
    /// even month, so January maps to December of the previous year.
    pub fn containing(kind: MeetingKind, date: NaiveDate) -> Self {
        let mut year = date.year();
        let mut number = date.month();
        while Month::from_number(number).map_or(true, |m| !kind.allows(m)) {
            if number <= 1 {
                number = 12;
                year -= 1;
            } else {
                number -= 1;
            }
        }
        let month = Month::from_number(number).unwrap_or(Month::December);
        Self {
            month,
            year: format!("{year:04}"),
        }
    }

    /// Period containing today's local date.
    pub fn current(kind: MeetingKind) -> Self {
        Self::containing(kind, chrono::Local::now().date_naive())
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> &str {
        &self.year
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

/// Years a period picker offers, oldest first.
pub fn available_years() -> Vec<String> {
    YEAR_RANGE.map(|y| y.to_string()).collect()
}

/// One person under a manager for a reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub designation: String,
    pub is_completed: bool,
    pub month: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub name: String,
    pub employees: Vec<Employee>,
}

impl Manager {
    pub fn find_employee(&self, name: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.name == name)
    }
}

/// Authoritative completion record from a status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub status: String,
}

impl EmployeeStatus {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

/// Manager name to that manager's status list, for one kind and period.
pub type ManagerStatusMap = HashMap<String, Vec<EmployeeStatus>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}
