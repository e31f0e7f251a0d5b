//! Display formatting helpers. Pure functions, no state; every absent
//! optional renders as "N/A" or "0" instead of failing.

/// "65000" -> "65,000.00". Negative values keep the sign in front of the
/// grouped digits.
pub fn fmt_price(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let neg = value < 0.0;
    let s = format!("{:.2}", value.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if neg { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn fmt_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", fmt_price(-value))
    } else {
        format!("${}", fmt_price(value))
    }
}

/// Signed percent for 24h change readouts: "+1.23%" / "-0.45%".
pub fn fmt_signed_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

pub fn fmt_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.2}%")
}

/// RSI is optional on the wire; absent renders as "N/A".
pub fn fmt_rsi(rsi: Option<f64>) -> String {
    match rsi {
        Some(v) if v.is_finite() => format!("{v:.1}"),
        _ => "N/A".to_string(),
    }
}

pub fn fmt_spike(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.1}x")
}

/// Compact market-cap / volume figures: "1.23B", "456.78M".
pub fn fmt_compact(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{value:.2}")
    }
}
