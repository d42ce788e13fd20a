use colored::{ColoredString, Colorize};

/// Colour a Coolify status string (`running:healthy`, `exited`, ...)
pub fn colored_status(status: &str) -> ColoredString {
    let lower = status.to_ascii_lowercase();
    if lower.starts_with("running") || lower == "finished" || lower == "healthy" {
        status.green()
    } else if lower.starts_with("exited") || lower.contains("failed") || lower.contains("unhealthy")
    {
        status.red()
    } else {
        status.yellow()
    }
}

pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
