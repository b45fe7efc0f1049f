// crates/core/src/completion.rs

//! Status-list decoding and completion statistics.

use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::roster::{is_truthy, str_field};
use crate::types::{CompletionStats, EmployeeStatus, Manager, ManagerStatusMap};

/// `round(100 * completed / total)`, rounding halves up; 0 when `total` is 0.
pub fn percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * completed + total) / (2 * total)) as u32
}

/// Stats over an authoritative status list.
pub fn stats_for_statuses(statuses: &[EmployeeStatus]) -> CompletionStats {
    let completed = statuses.iter().filter(|s| s.is_completed()).count();
    let total = statuses.len();
    CompletionStats {
        completed,
        total,
        percentage: percentage(completed, total),
    }
}

/// Completion stats for one manager.
///
/// Prefers the status map; without a non-empty entry the roster's employee
/// count is the total and nothing is counted as completed.
pub fn completion_stats(
    manager: &str,
    status_map: &ManagerStatusMap,
    roster: &[Manager],
) -> CompletionStats {
    match status_map.get(manager) {
        Some(statuses) if !statuses.is_empty() => stats_for_statuses(statuses),
        _ => CompletionStats {
            completed: 0,
            total: roster
                .iter()
                .find(|m| m.name == manager)
                .map_or(0, |m| m.employees.len()),
            percentage: 0,
        },
    }
}

/// Decode a status endpoint body.
///
/// Only `{success: <truthy>, employees: [...]}` is accepted; entries that are
/// not objects are dropped.
pub fn parse_status_list(body: &Value) -> ApiResult<Vec<EmployeeStatus>> {
    if !is_truthy(body.get("success")) {
        return Err(ApiError::Rejected("status response without success".into()));
    }
    let employees = body
        .get("employees")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::Rejected("status response without employees".into()))?;

    Ok(employees
        .iter()
        .filter(|e| e.is_object())
        .map(|e| EmployeeStatus {
            name: str_field(e, "name"),
            designation: str_field(e, "designation"),
            status: str_field(e, "status"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Employee;
    use serde_json::json;

    fn status(name: &str, status: &str) -> EmployeeStatus {
        EmployeeStatus {
            name: name.into(),
            designation: "Eng".into(),
            status: status.into(),
        }
    }

    fn employee(name: &str) -> Employee {
        Employee {
            name: name.into(),
            designation: "Eng".into(),
            is_completed: true,
            month: "March".into(),
            year: "2024".into(),
        }
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn stats_prefer_status_map() {
        let mut map = ManagerStatusMap::new();
        map.insert(
            "B".into(),
            vec![
                status("x", "completed"),
                status("y", "completed"),
                status("z", "pending"),
            ],
        );
        let roster = vec![Manager {
            name: "B".into(),
            employees: vec![employee("only-one")],
        }];

        let stats = completion_stats("B", &map, &roster);
        assert_eq!(
            stats,
            CompletionStats {
                completed: 2,
                total: 3,
                percentage: 67
            }
        );
    }

    #[test]
    fn stats_fall_back_to_roster_count_without_completions() {
        let mut map = ManagerStatusMap::new();
        map.insert("A".into(), Vec::new());
        let roster = vec![Manager {
            name: "A".into(),
            employees: vec![employee("p"), employee("q")],
        }];

        let stats = completion_stats("A", &map, &roster);
        assert_eq!(
            stats,
            CompletionStats {
                completed: 0,
                total: 2,
                percentage: 0
            }
        );
        assert_eq!(completion_stats("nobody", &map, &roster).total, 0);
    }

    #[test]
    fn parse_status_list_requires_success_and_employees() {
        let ok = json!({"success": true, "manager": "C", "employees": [
            {"name": "Dan", "designation": "QA", "status": "completed"},
            "junk"
        ]});
        let list = parse_status_list(&ok).unwrap();
        assert_eq!(list, vec![status_with("Dan", "QA", "completed")]);

        assert!(parse_status_list(&json!({"success": false, "employees": []})).is_err());
        assert!(parse_status_list(&json!({"success": true})).is_err());
        assert!(parse_status_list(&json!(null)).is_err());
    }

    fn status_with(name: &str, designation: &str, s: &str) -> EmployeeStatus {
        EmployeeStatus {
            name: name.into(),
            designation: designation.into(),
            status: s.into(),
        }
    }
}
