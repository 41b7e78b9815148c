//! Rupee formatting with Indian digit grouping (`₹12,34,567`).

/// Formats an amount as whole rupees.
///
/// The last three digits form one group and every group above it has two
/// digits, matching the `en-IN` locale.
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    if negative {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_amounts_are_ungrouped() {
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(999.0), "₹999");
    }

    #[test]
    fn thousands_and_lakhs_use_indian_grouping() {
        assert_eq!(format_inr(1000.0), "₹1,000");
        assert_eq!(format_inr(12_345.0), "₹12,345");
        assert_eq!(format_inr(100_000.0), "₹1,00,000");
        assert_eq!(format_inr(1_234_567.0), "₹12,34,567");
        assert_eq!(format_inr(10_000_000.0), "₹1,00,00,000");
    }

    #[test]
    fn fractions_round_to_whole_rupees() {
        assert_eq!(format_inr(8499.6), "₹8,500");
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(format_inr(-2500.0), "-₹2,500");
    }
}
