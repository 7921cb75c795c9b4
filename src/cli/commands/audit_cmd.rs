//! `mpm audit`: display the audit log.
//!
//! Usage:
//!   mpm audit               # show last 50 entries
//!   mpm audit --last 20     # show last 20
//!   mpm audit --since 7d    # entries from last 7 days

use crate::cli::Cli;
use crate::errors::{MpmError, Result};

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    use crate::audit::AuditLog;
    use crate::cli::{load_settings, output, vault_path};

    let settings = load_settings(cli)?;
    let path = vault_path(cli, &settings)?;

    let audit = AuditLog::open(&path)
        .ok_or_else(|| MpmError::AuditError("failed to open audit database".into()))?;

    let since_dt = since.map(parse_duration).transpose()?;
    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Execute the `audit` command (audit support compiled out).
#[cfg(not(feature = "audit-log"))]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let _ = (cli, last, since);
    Err(MpmError::AuditError(
        "audit log support not compiled; rebuild with `--features audit-log`".into(),
    ))
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
#[cfg(feature = "audit-log")]
fn parse_duration(input: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    let input = input.trim();

    let (num_str, duration_of): (&str, fn(i64) -> chrono::Duration) =
        if let Some(s) = input.strip_suffix('d') {
            (s, chrono::Duration::days)
        } else if let Some(s) = input.strip_suffix('h') {
            (s, chrono::Duration::hours)
        } else if let Some(s) = input.strip_suffix('m') {
            (s, chrono::Duration::minutes)
        } else {
            return Err(MpmError::CommandFailed(format!(
                "invalid duration '{input}'; use format like 7d, 24h, or 30m"
            )));
        };

    let num: i64 = num_str.parse().map_err(|_| {
        MpmError::CommandFailed(format!(
            "invalid duration '{input}'; number part is not valid"
        ))
    })?;

    Ok(chrono::Utc::now() - duration_of(num))
}

/// Print audit entries in a formatted table.
#[cfg(feature = "audit-log")]
fn print_audit_table(entries: &[crate::audit::AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Section", "Password", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.section.clone().unwrap_or_else(|| "-".into()),
            entry.entry.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
#[cfg(feature = "audit-log")]
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "init" | "section" => style(op).green().to_string(),
        "add" | "import" => style(op).blue().to_string(),
        "change" => style(op).yellow().to_string(),
        "get" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}
