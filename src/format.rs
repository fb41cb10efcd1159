// Display strings for metric values.

/// `452` -> `"7h 32m"`, `45` -> `"45m"`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours == 0 {
        format!("{rest}m")
    } else {
        format!("{hours}h {rest}m")
    }
}

pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

/// Fraction in `[0, 1]` as a whole percentage. NaN renders as `"--"`.
pub fn format_percent(fraction: f64) -> String {
    if fraction.is_nan() {
        return "--".to_string();
    }
    format!("{}%", (fraction.clamp(0.0, 1.0) * 100.0).round() as u32)
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
