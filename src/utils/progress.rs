// src/utils/progress.rs

//! Pipeline progress formatting on top of the `log` facade.
//!
//! Timestamps and level filtering come from whichever logger the binary
//! installs; these helpers only shape the messages.

const RULE_WIDTH: usize = 60;

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(RULE_WIDTH);
    log::info!("{}", border);
    log::info!("  {}", title);
    log::info!("{}", border);
}

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    log::info!("{}", format_step(step_num, total, message));
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    log::info!("    {}", message);
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    for line in format_summary(title, items) {
        log::info!("{}", line);
    }
}

fn format_step(step_num: usize, total: usize, message: &str) -> String {
    format!("[STEP {}/{}] {}", step_num, total, message)
}

fn format_summary(title: &str, items: &[(&str, String)]) -> Vec<String> {
    let mut lines = vec![format!("[SUMMARY] {}", title)];
    lines.extend(
        items
            .iter()
            .map(|(key, value)| format!("    {}: {}", key, value)),
    );
    lines
}
