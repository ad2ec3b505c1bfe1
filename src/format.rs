//! Quantity/label formatter.
//!
//! Renders the user-facing quantity string for a logged item. Serving-style
//! unit labels encode their base amount in parentheses ("1 serving (100 g)")
//! and are parsed back apart here; simple unit labels ("g", "oz") are used
//! verbatim. This label-parsing path is the display-side counterpart of the
//! structured `conversion_factor` used by the scaling engine — the two are
//! independent sources for "how much is one unit" and the data does not
//! force them to agree.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PARENTHESIZED: Regex = Regex::new(r"\(([^)]+)\)").unwrap();
    static ref LEADING_NUMBER: Regex = Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*(.*)$").unwrap();
}

/// Human-readable quantity string for a logged item.
///
/// Simple unit: `"1.5 g"`. Serving-style unit: `"2 servings, 200 g"` —
/// the unit code naively pluralized and the parenthesized base amount
/// scaled by the quantity. Falls back to `"<quantity> <unit>"` when the
/// label cannot be parsed.
pub fn format_quantity(quantity: f64, unit: &str, unit_label: &str, conversion_factor: f64) -> String {
    if !unit_label.contains('(') {
        return format!("{quantity} {unit_label}");
    }

    let Some(caps) = PARENTHESIZED.captures(unit_label) else {
        return format!("{quantity} {unit}");
    };
    let inner = &caps[1];

    let (base_number, suffix) = match LEADING_NUMBER.captures(inner) {
        Some(caps) => {
            let number = caps[1].parse::<f64>().unwrap_or(conversion_factor);
            (number, caps[2].trim().to_string())
        }
        // No numeric prefix; the structured factor is the best guess left.
        None => (conversion_factor, inner.trim().to_string()),
    };

    let scaled = quantity * base_number;
    let plural = if quantity != 1.0 {
        format!("{unit}s")
    } else {
        unit.to_string()
    };

    if suffix.is_empty() {
        format!("{quantity} {plural}, {scaled}")
    } else {
        format!("{quantity} {plural}, {scaled} {suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_unit_is_rendered_verbatim() {
        assert_eq!(format_quantity(1.5, "g", "g", 1.0), "1.5 g");
    }

    #[test]
    fn serving_label_at_quantity_one() {
        assert_eq!(
            format_quantity(1.0, "serving", "1 serving (100 g)", 100.0),
            "1 serving, 100 g"
        );
    }

    #[test]
    fn serving_label_pluralizes_and_scales() {
        assert_eq!(
            format_quantity(2.0, "serving", "1 serving (100 g)", 100.0),
            "2 servings, 200 g"
        );
    }

    #[test]
    fn fractional_quantity_pluralizes() {
        assert_eq!(
            format_quantity(0.5, "serving", "1 serving (100 g)", 100.0),
            "0.5 servings, 50 g"
        );
    }

    #[test]
    fn unparsable_label_falls_back_to_unit_code() {
        assert_eq!(
            format_quantity(2.0, "scoop", "1 scoop (broken", 30.0),
            "2 scoop"
        );
    }

    #[test]
    fn missing_numeric_prefix_falls_back_to_conversion_factor() {
        assert_eq!(
            format_quantity(2.0, "cup", "1 cup (about a handful)", 120.0),
            "2 cups, 240 about a handful"
        );
    }

    #[test]
    fn multi_word_suffix_survives() {
        assert_eq!(
            format_quantity(3.0, "bar", "1 bar (35 g net)", 35.0),
            "3 bars, 105 g net"
        );
    }

    #[test]
    fn label_disagreeing_with_conversion_factor_wins_for_display() {
        // Denormalized-data hazard: the label says 90 g while the
        // structured factor says 100. Display follows the label; macro
        // math elsewhere follows the factor.
        assert_eq!(
            format_quantity(2.0, "serving", "1 serving (90 g)", 100.0),
            "2 servings, 180 g"
        );
    }
}
