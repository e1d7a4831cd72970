//! Terminal styling for reports.

use console::Style;

fn marked(mark: &str, style: Style, msg: &str) -> String {
    format!("{} {}", style.apply_to(mark), msg)
}

/// Green checkmark prefix: clean merges, auto-resolvable plans.
pub fn success(msg: &str) -> String {
    marked("✓", Style::new().green(), msg)
}

/// Yellow warning prefix: plans that need a human.
pub fn warn(msg: &str) -> String {
    marked("⚠", Style::new().yellow(), msg)
}

pub fn header(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}
