// crates/host/src/log.rs

//! Colored console output for the interactive session.
//!
//! Diagnostics go through `tracing`; this module is only for what the person
//! at the prompt is meant to read.

use std::fmt::Display;

use hr_admin_core::{CompletionStats, MeetingKind};

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";

/// Which part of the tool a line belongs to.
#[derive(Clone, Copy)]
pub enum Section {
    Meetings(MeetingKind),
    Inventory,
}

impl Section {
    fn color(&self) -> &'static str {
        match self {
            Section::Meetings(MeetingKind::OneOnOne) => BLUE,
            Section::Meetings(MeetingKind::Performance) => MAGENTA,
            Section::Inventory => CYAN,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Section::Meetings(MeetingKind::OneOnOne) => "1:1",
            Section::Meetings(MeetingKind::Performance) => "Perf",
            Section::Inventory => "Inventory",
        }
    }
}

/// Section heading.
pub fn heading(section: Section, text: impl Display) {
    println!("{}{BOLD}[{}]{RESET} {}", section.color(), section.name(), text);
}

/// One manager line with a completion bar.
pub fn manager_line(name: &str, stats: CompletionStats) {
    let filled = (stats.percentage as usize).min(100) / 10;
    let bar = format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled));
    let color = match stats.percentage {
        100 => GREEN,
        0 => RED,
        _ => YELLOW,
    };
    println!(
        "  {name:<24} {color}[{bar}] {:>3}%{RESET} {DIM}({}/{}){RESET}",
        stats.percentage, stats.completed, stats.total
    );
}

/// One employee line with a done/pending marker.
pub fn employee_line(name: &str, designation: &str, done: bool) {
    let (symbol, color) = if done { ("✓", GREEN) } else { ("·", YELLOW) };
    println!("  {color}{symbol}{RESET} {name:<24} {DIM}{designation}{RESET}");
}

/// Plain indented row.
pub fn row(text: impl Display) {
    println!("  {}", text);
}

pub fn info(message: impl Display) {
    eprintln!("{DIM}[info]{RESET} {}", message);
}

pub fn warn(message: impl Display) {
    eprintln!("{YELLOW}[warn]{RESET} {}", message);
}

pub fn success(message: impl Display) {
    eprintln!("{GREEN}[ok]{RESET} {}", message);
}

pub fn error(message: impl Display) {
    eprintln!("{RED}[error]{RESET} {}", message);
}
