//! Numeric coercion and rupee formatting
//!
//! Every monetary figure the widgets show is a whole rupee amount. Raw form
//! values go through [`parse_number`], which never fails: anything that does
//! not start with a number reads as zero.

/// Whole-rupee amount
pub type Rupees = i64;

/// Parse the leading decimal number of a raw field value
///
/// Mirrors the lenient parsing browsers apply to form inputs: leading
/// whitespace is skipped, an optional sign and a run of digits with at most
/// one decimal point are consumed, then an exponent if at least one digit
/// follows its `e`. The rest is ignored. No number → `0.0`.
pub fn parse_number(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Round to the nearest rupee, half away from zero. Non-finite input is zero.
pub fn round_rupees(value: f64) -> Rupees {
    if value.is_finite() {
        value.round() as Rupees
    } else {
        0
    }
}

/// Parse a raw field value straight to whole rupees
pub fn parse_amount(raw: &str) -> Rupees {
    round_rupees(parse_number(raw))
}

/// Round a rate to two decimal places for display
pub(crate) fn round_rate(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Format rupees with Indian digit grouping, e.g. `₹1,23,456`
pub fn format_inr(amount: Rupees) -> String {
    let digits = amount.unsigned_abs().to_string();

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups = Vec::with_capacity(head.len() / 2 + 1);
        let mut i = head.len();
        while i > 2 {
            groups.push(&head[i - 2..i]);
            i -= 2;
        }
        groups.push(&head[..i]);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    if amount < 0 {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

/// Format a percentage without trailing zeros, e.g. `12%`, `1.25%`
pub fn format_percent(rate: f64) -> String {
    let fixed = format!("{:.2}", round_rate(rate));
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", trimmed)
}
