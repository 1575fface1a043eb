//! Shared formatting utilities for size display and console output

use console::Emoji;

/// Chart emoji for size summaries
pub const CHART: Emoji = Emoji("📊", "~");

/// Microscope emoji for analysis/inspection
pub const MICROSCOPE: Emoji = Emoji("🔍", ">>");

/// Package emoji for per-function totals
pub const PACKAGE: Emoji = Emoji("📦", "*");

/// Crossmark emoji for failure
pub const CROSSMARK: Emoji = Emoji("❌", "[FAIL]");

/// Format bytes as human-readable size string
///
/// # Examples
///
/// ```
/// use fn_footprint::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format number with thousand separators
///
/// # Examples
///
/// ```
/// use fn_footprint::fmt::format_number;
///
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(12), "12");
/// ```
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Truncate string with ellipsis if it exceeds max length
///
/// Operates on characters so multi-byte symbol names never split mid-codepoint.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
