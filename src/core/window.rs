//! Report date windows.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CommdashError, Result};

/// Wire format for gateway date parameters.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportWindow {
    /// Create a window, rejecting ranges that end before they start.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `to` precedes `from`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if to < from {
            return Err(CommdashError::InvalidArgument(format!(
                "window end {to} is before its start {from}"
            )));
        }
        Ok(Self { from, to })
    }

    /// The last `days` days, ending on (and including) `today`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `days` is zero or reaches before the
    /// supported calendar.
    pub fn last_days(today: NaiveDate, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(CommdashError::InvalidArgument(
                "window must cover at least one day".to_string(),
            ));
        }
        let from = today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| CommdashError::InvalidArgument(format!("{days} days is too long")))?;
        Ok(Self { from, to: today })
    }

    /// Number of days covered, inclusive.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn len_days(&self) -> u64 {
        (self.to - self.from).num_days() as u64 + 1
    }

    /// The equally long window ending the day before this one starts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the window would fall off the calendar.
    pub fn previous(&self) -> Result<Self> {
        let overflow = || CommdashError::InvalidArgument("window out of range".to_string());
        let to = self.from.checked_sub_days(Days::new(1)).ok_or_else(overflow)?;
        let from = to
            .checked_sub_days(Days::new(self.len_days() - 1))
            .ok_or_else(overflow)?;
        Ok(Self { from, to })
    }

    /// `from` in wire format.
    #[must_use]
    pub fn from_param(&self) -> String {
        self.from.format(WIRE_DATE_FORMAT).to_string()
    }

    /// `to` in wire format.
    #[must_use]
    pub fn to_param(&self) -> String {
        self.to.format(WIRE_DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.from_param(), self.to_param())
    }
}

/// Parse a `YYYY-MM-DD` command-line date.
///
/// # Errors
///
/// Returns `InvalidArgument` naming the offending value.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), WIRE_DATE_FORMAT).map_err(|_| {
        CommdashError::InvalidArgument(format!("'{value}' is not a YYYY-MM-DD date"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_seven_days_includes_today() {
        let window = ReportWindow::last_days(day(2024, 3, 20), 7).unwrap();
        assert_eq!(window.from, day(2024, 3, 14));
        assert_eq!(window.to, day(2024, 3, 20));
        assert_eq!(window.len_days(), 7);
    }

    #[test]
    fn previous_window_is_adjacent_and_equal_length() {
        let window = ReportWindow::last_days(day(2024, 3, 20), 7).unwrap();
        let previous = window.previous().unwrap();
        assert_eq!(previous.from, day(2024, 3, 7));
        assert_eq!(previous.to, day(2024, 3, 13));
        assert_eq!(previous.len_days(), window.len_days());
    }

    #[test]
    fn single_day_window() {
        let window = ReportWindow::last_days(day(2024, 3, 1), 1).unwrap();
        assert_eq!(window.from, window.to);
        assert_eq!(window.previous().unwrap().to, day(2024, 2, 29));
    }

    #[test]
    fn zero_days_is_rejected() {
        assert!(ReportWindow::last_days(day(2024, 3, 1), 0).is_err());
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert!(ReportWindow::new(day(2024, 3, 2), day(2024, 3, 1)).is_err());
    }

    #[test]
    fn wire_format() {
        let window = ReportWindow::new(day(2024, 3, 1), day(2024, 3, 9)).unwrap();
        assert_eq!(window.from_param(), "2024-03-01");
        assert_eq!(window.to_param(), "2024-03-09");
        assert_eq!(window.to_string(), "2024-03-01 .. 2024-03-09");
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert_eq!(parse_date("2024-03-20").unwrap(), day(2024, 3, 20));
        assert!(parse_date("20/03/2024").is_err());
    }
}
