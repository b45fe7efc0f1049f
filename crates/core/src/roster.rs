// crates/core/src/roster.rs

//! Roster normalization for the meetings listing endpoints.
//!
//! Deployments answer `GET /api/one_on_one_meetings` (and the performance
//! variant) in one of three shapes:
//!
//! 1. an array of per-manager records `{success, manager, employees, month, year}`
//! 2. a single such record, unwrapped
//! 3. the legacy `{success, manager_employee_map: {manager: [{name, designation}]}}`
//!
//! Each shape has its own `try_*` parser; the first one that recognizes the
//! payload wins. Anything unrecognized is an empty roster, never an error.

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{Employee, Manager, Period, STATUS_COMPLETED};

/// Normalize a listing payload into managers in first-seen order.
///
/// `fallback` supplies month/year for records that omit them.
pub fn normalize_roster(payload: &Value, fallback: &Period) -> Vec<Manager> {
    if let Some(roster) = try_record_array(payload, fallback) {
        return roster;
    }
    if let Some(roster) = try_single_record(payload, fallback) {
        return roster;
    }
    if let Some(roster) = try_legacy_map(payload, fallback) {
        return roster;
    }

    debug!("unrecognized roster payload, treating as empty");
    Vec::new()
}

fn try_record_array(payload: &Value, fallback: &Period) -> Option<Vec<Manager>> {
    let records = payload.as_array()?;
    let mut roster: Vec<Manager> = Vec::new();

    for record in records {
        let Some((manager, employees)) = parse_record(record, fallback) else {
            continue;
        };
        match roster.iter_mut().find(|m| m.name == manager) {
            Some(existing) => existing.employees.extend(employees),
            None => roster.push(Manager {
                name: manager,
                employees,
            }),
        }
    }

    Some(roster)
}

fn try_single_record(payload: &Value, fallback: &Period) -> Option<Vec<Manager>> {
    let (name, employees) = parse_record(payload, fallback)?;
    Some(vec![Manager { name, employees }])
}

fn try_legacy_map(payload: &Value, fallback: &Period) -> Option<Vec<Manager>> {
    let object = payload.as_object()?;
    if !is_truthy(object.get("success")) {
        return None;
    }
    let map = object.get("manager_employee_map")?.as_object()?;

    let month = fallback.month().name();
    let year = fallback.year();

    let roster = map
        .iter()
        .map(|(manager, employees)| Manager {
            name: manager.clone(),
            employees: employees
                .as_array()
                .map(|list| {
                    list.iter()
                        .map(|e| employee_from(e, false, month, year))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    Some(roster)
}

/// A usable record has truthy `success`, a non-empty `manager` and an `employees` array.
fn parse_record(record: &Value, fallback: &Period) -> Option<(String, Vec<Employee>)> {
    let object = record.as_object()?;
    if !is_truthy(object.get("success")) {
        return None;
    }
    let manager = object
        .get("manager")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())?;
    let employees = object.get("employees")?.as_array()?;

    let month = object
        .get("month")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(fallback.month().name());
    let year = record_year(object).unwrap_or_else(|| fallback.year().to_string());

    let employees = employees
        .iter()
        .map(|e| {
            let completed = e.get("status").and_then(Value::as_str) == Some(STATUS_COMPLETED);
            employee_from(e, completed, month, &year)
        })
        .collect();

    Some((manager.to_string(), employees))
}

fn employee_from(value: &Value, is_completed: bool, month: &str, year: &str) -> Employee {
    Employee {
        name: str_field(value, "name"),
        designation: str_field(value, "designation"),
        is_completed,
        month: month.to_string(),
        year: year.to_string(),
    }
}

/// `year` arrives as either a string or a number.
fn record_year(object: &Map<String, Value>) -> Option<String> {
    match object.get("year")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// JSON truthiness: absent, `null`, `false`, `0` and `""` are false.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MeetingKind, Month};
    use serde_json::json;

    fn march_2024() -> Period {
        Period::new(MeetingKind::OneOnOne, Month::March, "2024").unwrap()
    }

    #[test]
    fn merges_records_for_the_same_manager() {
        let payload = json!([
            {"success": true, "manager": "Alice", "employees": [{"name": "E1", "designation": "Eng", "status": "pending"}]},
            {"success": true, "manager": "Zed", "employees": []},
            {"success": true, "manager": "Alice", "employees": [{"name": "E2", "designation": "QA", "status": "completed"}]}
        ]);

        let roster = normalize_roster(&payload, &march_2024());

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name, "Alice");
        assert_eq!(roster[1].name, "Zed");
        let names: Vec<_> = roster[0].employees.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["E1", "E2"]);
        assert!(!roster[0].employees[0].is_completed);
        assert!(roster[0].employees[1].is_completed);
    }

    #[test]
    fn skips_unsuccessful_and_incomplete_records() {
        let payload = json!([
            {"success": false, "manager": "A", "employees": []},
            {"success": true, "employees": []},
            {"success": true, "manager": "B"},
            {"manager": "C", "employees": []},
            "garbage",
            {"success": true, "manager": "D", "employees": [{"name": "X"}]}
        ]);

        let roster = normalize_roster(&payload, &march_2024());

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "D");
        assert_eq!(roster[0].employees[0].designation, "");
    }

    #[test]
    fn single_record_is_one_manager() {
        let payload = json!({
            "success": true,
            "manager": "Carol",
            "employees": [{"name": "Dan", "designation": "QA", "status": "completed"}],
            "month": "June",
            "year": 2023
        });

        let roster = normalize_roster(&payload, &march_2024());

        assert_eq!(roster.len(), 1);
        let dan = &roster[0].employees[0];
        assert!(dan.is_completed);
        assert_eq!(dan.month, "June");
        assert_eq!(dan.year, "2023");
    }

    #[test]
    fn missing_month_and_year_fall_back_to_period() {
        let payload = json!([{"success": 1, "manager": "A", "employees": [{"name": "X", "designation": "Eng"}]}]);

        let roster = normalize_roster(&payload, &march_2024());

        let x = &roster[0].employees[0];
        assert_eq!(x.month, "March");
        assert_eq!(x.year, "2024");
        assert!(!x.is_completed);
    }

    #[test]
    fn legacy_map_defaults_to_not_completed() {
        let payload = json!({
            "success": true,
            "manager_employee_map": {"Bob": [{"name": "X", "designation": "Eng", "status": "completed"}]}
        });

        let roster = normalize_roster(&payload, &march_2024());

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Bob");
        assert_eq!(roster[0].employees[0].name, "X");
        assert!(!roster[0].employees[0].is_completed);
    }

    #[test]
    fn legacy_map_requires_success() {
        let payload = json!({"manager_employee_map": {"Bob": []}});
        assert!(normalize_roster(&payload, &march_2024()).is_empty());
    }

    #[test]
    fn single_record_takes_priority_over_legacy_map() {
        let payload = json!({
            "success": true,
            "manager": "Carol",
            "employees": [],
            "manager_employee_map": {"Bob": []}
        });

        let roster = normalize_roster(&payload, &march_2024());
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Carol");
    }

    #[test]
    fn never_panics_on_odd_input() {
        let inputs = [
            Value::Null,
            json!("a string"),
            json!(42),
            json!(true),
            json!([]),
            json!([null, 1, [], {}]),
            json!({}),
            json!({"success": true, "manager": 7, "employees": "no"}),
            json!({"success": true, "manager_employee_map": []}),
            json!({"success": true, "manager_employee_map": {"A": "not a list", "B": [1, null]}}),
            json!([{"success": true, "manager": "A", "employees": [null, 3, "x"], "year": [2024]}]),
        ];
        for input in &inputs {
            let _ = normalize_roster(input, &march_2024());
        }
    }

    #[test]
    fn truthiness_matches_json_semantics() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(is_truthy(Some(&json!({}))));
    }
}
