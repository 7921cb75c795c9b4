//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use std::collections::{BTreeMap, BTreeSet};

use comfy_table::{ContentArrangement, Table};
use console::style;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print every section with its passwords as a two-column table.
pub fn print_entries_table(all: &BTreeMap<&str, BTreeSet<&str>>) {
    if all.is_empty() {
        info("No passwords stored yet.");
        tip("Run `mpm add --section <S> --name <N>` to generate your first password.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Section", "Password"]);

    for (section, names) in all {
        if names.is_empty() {
            table.add_row(vec![section.to_string(), style("(empty)").dim().to_string()]);
            continue;
        }
        for name in names {
            table.add_row(vec![section.to_string(), name.to_string()]);
        }
    }

    println!("{table}");
}

/// Print a bulleted list of names.
pub fn print_names(names: &BTreeSet<&str>) {
    for name in names {
        println!("    - {name}");
    }
}
