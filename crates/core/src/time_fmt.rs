// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! C-style `%g` float formatting, used to render submission timestamps the
//! same way on every host regardless of locale or platform `Display` quirks.

/// Formats `value` the way `printf("%.<precision>g", value)` would: fixed or
/// scientific notation chosen by decimal exponent, `precision` significant
/// digits, trailing zeros trimmed.
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let exp = decimal_exponent(value, precision);

    if exp < -4 || exp >= precision as i32 {
        format_scientific(value, precision, exp)
    } else {
        let frac_digits = (precision as i32 - 1 - exp).max(0) as usize;
        trim_trailing(&format!("{:.*}", frac_digits, value))
    }
}

/// Formats a Unix timestamp (seconds since epoch) with `%.14g`, the
/// precision the task instance filename grammar requires.
pub fn format_submission_time(seconds: f64) -> String {
    format_g(seconds, 14)
}

fn decimal_exponent(value: f64, precision: usize) -> i32 {
    let rendered = format!("{:.*e}", precision - 1, value.abs());
    rendered
        .split('e')
        .nth(1)
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(0)
}

fn format_scientific(value: f64, precision: usize, exp: i32) -> String {
    let mantissa = value / 10f64.powi(exp);
    let mantissa_str = trim_trailing(&format!("{:.*}", precision - 1, mantissa));
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa_str}e{sign}{:02}", exp.abs())
}

fn trim_trailing(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
