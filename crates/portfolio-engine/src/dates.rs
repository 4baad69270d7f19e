use chrono::{DateTime, Months, NaiveDate};
use serde::{Deserialize, Serialize};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m-%d-%Y"];

/// Parse a lease date as found in the datasets.
///
/// Accepts ISO dates, US `M/D/YYYY` dates and either of those followed by a
/// time part, plus RFC 3339 timestamps. Anything else yields `None`.
pub fn parse_lease_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }

    let date_part = raw
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or(raw);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Look-ahead window for counting leases that expire soon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryWindow {
    months: u32,
}

impl ExpiryWindow {
    pub const fn months(months: u32) -> Self {
        Self { months }
    }

    pub fn len_months(&self) -> u32 {
        self.months
    }

    /// Last day inside the window
    pub fn horizon(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_months(Months::new(self.months))
            .unwrap_or(NaiveDate::MAX)
    }

    /// True when `date` falls between `today` and the horizon, inclusive
    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        date >= today && date <= self.horizon(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parses_dataset_date_formats() {
        assert_eq!(parse_lease_date("2015-06-01"), Some(ymd(2015, 6, 1)));
        assert_eq!(parse_lease_date("06/01/2015"), Some(ymd(2015, 6, 1)));
        assert_eq!(parse_lease_date("6/1/2015"), Some(ymd(2015, 6, 1)));
        assert_eq!(parse_lease_date("2015/06/01"), Some(ymd(2015, 6, 1)));
        assert_eq!(parse_lease_date("6/1/2015 0:00"), Some(ymd(2015, 6, 1)));
        assert_eq!(parse_lease_date("2015-06-01T00:00:00"), Some(ymd(2015, 6, 1)));
        assert_eq!(
            parse_lease_date("2015-06-01T12:30:00+00:00"),
            Some(ymd(2015, 6, 1))
        );
    }

    #[test]
    fn test_invalid_dates_are_none() {
        assert_eq!(parse_lease_date(""), None);
        assert_eq!(parse_lease_date("   "), None);
        assert_eq!(parse_lease_date("NA"), None);
        assert_eq!(parse_lease_date("2015-13-01"), None);
        assert_eq!(parse_lease_date("02/30/2020"), None);
        assert_eq!(parse_lease_date("soon"), None);
    }

    #[test]
    fn test_expiry_window_bounds() {
        let today = ymd(2025, 1, 31);
        let window = ExpiryWindow::months(6);
        assert_eq!(window.horizon(today), ymd(2025, 7, 31));
        assert!(window.contains(today, today));
        assert!(window.contains(today, ymd(2025, 7, 31)));
        assert!(!window.contains(today, ymd(2025, 8, 1)));
        assert!(!window.contains(today, ymd(2025, 1, 30)));
    }

    #[test]
    fn test_expiry_window_clamps_month_end() {
        let window = ExpiryWindow::months(1);
        assert_eq!(window.horizon(ymd(2024, 1, 31)), ymd(2024, 2, 29));
    }
}
