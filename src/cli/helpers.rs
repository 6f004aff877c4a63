//! Shared helper functions for CLI commands

/// Truncate a string to max_len bytes, adding "..." if truncated.
/// Names here are arbitrary user text, so the cut must land on a char
/// boundary, never inside a multi-byte character.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    let budget = max_len.saturating_sub(3);
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= budget)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..cut])
}

/// Escape a string for CSV output (RFC 4180)
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Format a price in Indian market convention: crores and lakhs
pub fn format_price(amount: f64) -> String {
    if amount >= 1.0e7 {
        format!("{:.2} Cr", amount / 1.0e7)
    } else if amount >= 1.0e5 {
        format!("{:.2} L", amount / 1.0e5)
    } else {
        format!("{:.0}", amount)
    }
}

/// Format an area in square feet
pub fn format_area(sqft: f64) -> String {
    if sqft <= 0.0 {
        "-".to_string()
    } else {
        format!("{:.0} sqft", sqft)
    }
}

pub fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}
