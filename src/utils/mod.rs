//! Common utilities and helpers

pub mod console;
pub mod logging;
pub mod path;

/// Whole kilobytes, the way the image summaries report sizes
pub fn format_kb(size: u64) -> String {
    format!("{}KB", size / 1024)
}

/// Last `n` characters of `text`
pub fn tail_chars(text: &str, n: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(n)).collect()
}

/// Whole megabytes
pub fn format_mb(size: u64) -> String {
    format!("{}MB", size / (1024 * 1024))
}
