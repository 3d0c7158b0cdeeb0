//! Human-readable labels for the folder view.

use chrono::{DateTime, Local};
use std::time::SystemTime;

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Base-1024 size label rounded to two decimals, ties to even: `0 Bytes`,
/// `1.5 KB`, `1.12 KB` (1152 bytes), `1.0 MB`.
///
/// Whole values keep one decimal place so labels read the same as the
/// desktop front-end expects (`512.0 Bytes`).
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit < SIZE_UNITS.len() - 1 && bytes / divisor >= 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let value = bytes as f64 / divisor as f64;
    let rounded = (value * 100.0).round_ties_even() / 100.0;
    let mut label = rounded.to_string();
    if !label.contains('.') {
        label.push_str(".0");
    }
    format!("{label} {}", SIZE_UNITS[unit])
}

/// Local-time `YYYY-MM-DD HH:MM:SS`.
pub fn format_mtime(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M:%S").to_string()
}
