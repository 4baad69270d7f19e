//! Display formatting for numbers, areas, dates and percentages
//!
//! Rounding is half away from zero everywhere (`f64::round`), so
//! 2,500 sq ft displays as "3K sq ft".

use chrono::NaiveDate;

/// Round to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Whole number with thousands separators, e.g. "1,234,567"
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Compact area label: "1.5M sq ft", "3K sq ft" or "950 sq ft"
pub fn format_square_footage(square_feet: f64) -> String {
    if !square_feet.is_finite() {
        return "N/A".to_string();
    }
    let magnitude = square_feet.abs();

    if magnitude >= 1_000_000.0 {
        return format!("{:.1}M sq ft", round_to_tenth(square_feet / 1_000_000.0));
    }
    if magnitude >= 1_000.0 {
        let thousands = (square_feet / 1_000.0).round();
        if thousands.abs() >= 1_000.0 {
            return format!("{:.1}M sq ft", round_to_tenth(thousands / 1_000.0));
        }
        return format!("{}K sq ft", thousands as i64);
    }
    format!("{} sq ft", format_number(square_feet))
}

/// "Jan 5, 2024", or "N/A" when the date is unknown
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// "42.5%"
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", round_to_tenth(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_000.0), "1,000");
        assert_eq!(format_number(1_234_567.4), "1,234,567");
        assert_eq!(format_number(-45_000.0), "-45,000");
        assert_eq!(format_number(f64::NAN), "N/A");
    }

    #[test]
    fn test_format_square_footage() {
        assert_eq!(format_square_footage(1_500_000.0), "1.5M sq ft");
        assert_eq!(format_square_footage(2_500.0), "3K sq ft");
        assert_eq!(format_square_footage(2_499.0), "2K sq ft");
        assert_eq!(format_square_footage(999_600.0), "1.0M sq ft");
        assert_eq!(format_square_footage(950.0), "950 sq ft");
        assert_eq!(format_square_footage(12_345_678.0), "12.3M sq ft");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(Some(date)), "Jan 5, 2024");
        assert_eq!(format_date(None), "N/A");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(42.46), "42.5%");
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage(100.0), "100.0%");
    }
}
