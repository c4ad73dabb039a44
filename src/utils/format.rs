use chrono::NaiveDate;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Left-align `text` in `width` terminal columns, truncating with '…'.
/// Task text is user input and may contain wide characters.
pub fn pad_display(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    format!("{}{}", out, " ".repeat(width.saturating_sub(used)))
}

/// "Wed 18 Feb"
pub fn short_date(date: NaiveDate) -> String {
    date.format("%a %d %b").to_string()
}

pub fn format_juz(juz: f64) -> String {
    format!("{:.1} juz", juz)
}
