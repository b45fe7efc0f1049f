// crates/host/src/commands.rs

//! Prompt line parsing.

use anyhow::{bail, Context, Result};

use hr_admin_core::MeetingKind;

pub const HELP: &str = "\
Session
  login <email> <password>            log in
  logout                              forget the stored session
  whoami                              show the logged-in user
Meetings (admin)
  managers <1on1|perf>                list managers with completion
  manager <1on1|perf> <name>          show one manager's employees
  complete <1on1|perf> <manager> <employee>
                                      mark a meeting as held
  period <1on1|perf> [<month> <year>] show or change the reporting period
  months <1on1|perf>                  list selectable months and years
Inventory (employee)
  assets                              list your assets
  request <tool> <reason>             request a tool
  add-asset <item> <quantity>         record an asset you hold
  remove-asset <item>                 remove an asset you hold
Inventory ledger (admin)
  ledger                              every employee's holdings
  holdings <employee>                 one employee's holdings
  available                           unassigned stock
  stock-add <item> <quantity>         add to general inventory
  stock-edit <asset> <quantity>       set unassigned stock
  stock-remove <asset> <quantity>     remove unassigned stock
  ledger-edit <employee> <item> <new-item> <quantity>
  ledger-remove <employee> <item>
Other
  help, quit

Quote names with spaces: manager 1on1 \"Ann Lee\"";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Login { email: String, password: String },
    Logout,
    WhoAmI,
    Managers(MeetingKind),
    Manager { kind: MeetingKind, name: String },
    Complete { kind: MeetingKind, manager: String, employee: String },
    Period { kind: MeetingKind, change: Option<(String, String)> },
    Months(MeetingKind),
    Assets,
    Request { tool: String, reason: String },
    AddAsset { item: String, quantity: i64 },
    RemoveAsset { item: String },
    Ledger,
    Holdings { employee: String },
    Available,
    StockAdd { item: String, quantity: i64 },
    StockEdit { asset: String, quantity: i64 },
    StockRemove { asset: String, quantity: i64 },
    LedgerEdit { employee: String, item: String, new_item: String, quantity: i64 },
    LedgerRemove { employee: String, item: String },
}

/// Parse one prompt line. Blank lines are `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let args = split_args(line)?;
    let Some((name, rest)) = args.split_first() else {
        return Ok(None);
    };

    let command = match (name.to_ascii_lowercase().as_str(), rest) {
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        ("login", [email, password]) => Command::Login {
            email: email.clone(),
            password: password.clone(),
        },
        ("logout", []) => Command::Logout,
        ("whoami", []) => Command::WhoAmI,
        ("managers", [kind]) => Command::Managers(parse_kind(kind)?),
        ("manager", [kind, name]) => Command::Manager {
            kind: parse_kind(kind)?,
            name: name.clone(),
        },
        ("complete", [kind, manager, employee]) => Command::Complete {
            kind: parse_kind(kind)?,
            manager: manager.clone(),
            employee: employee.clone(),
        },
        ("period", [kind]) => Command::Period {
            kind: parse_kind(kind)?,
            change: None,
        },
        ("period", [kind, month, year]) => Command::Period {
            kind: parse_kind(kind)?,
            change: Some((month.clone(), year.clone())),
        },
        ("months", [kind]) => Command::Months(parse_kind(kind)?),
        ("assets", []) => Command::Assets,
        ("request", [tool, reason @ ..]) if !reason.is_empty() => Command::Request {
            tool: tool.clone(),
            reason: reason.join(" "),
        },
        ("add-asset", [item, quantity]) => Command::AddAsset {
            item: item.clone(),
            quantity: parse_quantity(quantity)?,
        },
        ("remove-asset", [item]) => Command::RemoveAsset { item: item.clone() },
        ("ledger", []) => Command::Ledger,
        ("holdings", [employee]) => Command::Holdings {
            employee: employee.clone(),
        },
        ("available", []) => Command::Available,
        ("stock-add", [item, quantity]) => Command::StockAdd {
            item: item.clone(),
            quantity: parse_quantity(quantity)?,
        },
        ("stock-edit", [asset, quantity]) => Command::StockEdit {
            asset: asset.clone(),
            quantity: parse_quantity(quantity)?,
        },
        ("stock-remove", [asset, quantity]) => Command::StockRemove {
            asset: asset.clone(),
            quantity: parse_quantity(quantity)?,
        },
        ("ledger-edit", [employee, item, new_item, quantity]) => Command::LedgerEdit {
            employee: employee.clone(),
            item: item.clone(),
            new_item: new_item.clone(),
            quantity: parse_quantity(quantity)?,
        },
        ("ledger-remove", [employee, item]) => Command::LedgerRemove {
            employee: employee.clone(),
            item: item.clone(),
        },
        (other, _) => bail!("unknown command or wrong arguments: '{other}' (try 'help')"),
    };

    Ok(Some(command))
}

fn parse_kind(token: &str) -> Result<MeetingKind> {
    match token.to_ascii_lowercase().as_str() {
        "1on1" | "1:1" | "one-on-one" | "oneonone" => Ok(MeetingKind::OneOnOne),
        "perf" | "performance" => Ok(MeetingKind::Performance),
        other => bail!("unknown meeting type '{other}', use 1on1 or perf"),
    }
}

fn parse_quantity(token: &str) -> Result<i64> {
    let quantity: i64 = token
        .parse()
        .with_context(|| format!("'{token}' is not a quantity"))?;
    if quantity < 0 {
        bail!("quantity cannot be negative");
    }
    Ok(quantity)
}

/// Whitespace-separated words; double quotes group words containing spaces.
fn split_args(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        bail!("unterminated quote");
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}
