/// Formats `value` with `decimals` fraction digits and comma-grouped thousands,
/// e.g. `1234567.891` with 2 decimals gives `1,234,567.89`.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Grouped number with up to three fraction digits and no trailing zeros,
/// e.g. `44738.25` gives `44,738.25` and `1500.0` gives `1,500`.
pub fn format_locale(value: f64) -> String {
    let text = group_thousands(value, 3);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
