/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use review_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        // `frac_str` starts with "0.", e.g. "0.50".
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an integer count with thousands separators.
///
/// ```
/// use review_core::formatting::format_count;
///
/// assert_eq!(format_count(2514), "2,514");
/// assert_eq!(format_count(7), "7");
/// ```
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Format an average star rating with two decimals, or `"n/a"` when the
/// average is undefined (no matching reviews).
///
/// ```
/// use review_core::formatting::format_rating;
///
/// assert_eq!(format_rating(2.75), "2.75");
/// assert_eq!(format_rating(f64::NAN), "n/a");
/// ```
pub fn format_rating(rating: f64) -> String {
    if rating.is_finite() {
        format_number(rating, 2)
    } else {
        "n/a".to_string()
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// ```
/// use review_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────
