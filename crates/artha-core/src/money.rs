//! Numeric input hygiene and rupee formatting

/// Clamp a numeric input to a usable non-negative value.
///
/// Negative, NaN and infinite values become 0 so every calculator stays total.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Format an amount in rupees with Indian digit grouping (e.g. ₹12,34,567)
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0".to_string();
    }

    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    if digits.len() <= 3 {
        return format!("{}₹{}", sign, digits);
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{}₹{},{}", sign, groups.join(","), last_three)
}
