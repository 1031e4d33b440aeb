//! Common types used throughout Agroport

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AgError;

/// Lifecycle state of a field operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl OperationStatus {
    pub const ALL: [OperationStatus; 4] = [
        OperationStatus::Planned,
        OperationStatus::InProgress,
        OperationStatus::Completed,
        OperationStatus::Cancelled,
    ];

    /// Value stored in the `operations.status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OperationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Inclusive calendar-date window a report is computed over.
///
/// Dates are UTC calendar dates: an operation belongs to the window when its
/// `start_time` falls in `[from 00:00 UTC, to + 1 day 00:00 UTC)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportWindow {
    pub fn day(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    pub fn month(year: i32, month: u32) -> Option<Self> {
        let from = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            from,
            to: next.pred_opt()?,
        })
    }

    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            from: NaiveDate::from_ymd_opt(year, 1, 1)?,
            to: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    /// Parse `YYYY-MM-DD`, falling back to `today` when absent
    ///
    /// Only the zero-padded form with a four-digit year is accepted.
    pub fn parse_day(raw: Option<&str>, today: NaiveDate) -> Result<Self, AgError> {
        let invalid = || AgError::invalid("Invalid date format. Use YYYY-MM-DD");
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(Self::day(today)),
            Some(s) if is_iso_date(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Self::day)
                .map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }

    /// Parse `YYYY-MM`, falling back to the month containing `today`
    pub fn parse_month(raw: Option<&str>, today: NaiveDate) -> Result<Self, AgError> {
        let invalid = || AgError::invalid("Invalid month format. Use YYYY-MM");
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::month(today.year(), today.month()).ok_or_else(invalid),
            Some(s) => {
                let (year, month) = s.split_once('-').ok_or_else(invalid)?;
                if !is_digits(year, 4) || !is_digits(month, 2) {
                    return Err(invalid());
                }
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                Self::month(year, month).ok_or_else(invalid)
            }
        }
    }

    /// Parse `YYYY`, falling back to the year containing `today`
    pub fn parse_year(raw: Option<&str>, today: NaiveDate) -> Result<Self, AgError> {
        let invalid = || AgError::invalid("Invalid year format. Use YYYY");
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::year(today.year()).ok_or_else(invalid),
            Some(s) if is_digits(s, 4) => {
                let year: i32 = s.parse().map_err(|_| invalid())?;
                Self::year(year).ok_or_else(invalid)
            }
            Some(_) => Err(invalid()),
        }
    }

    /// Half-open instant bounds `[start, end)` used by the store query
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.from.and_time(NaiveTime::MIN).and_utc();
        let end = match self.to.succ_opt() {
            Some(next) => next.and_time(NaiveTime::MIN).and_utc(),
            None => DateTime::<Utc>::MAX_UTC,
        };
        (start, end)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let date = instant.date_naive();
        date >= self.from && date <= self.to
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_iso_date(s: &str) -> bool {
    s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in OperationStatus::ALL {
            assert_eq!(status.as_str().parse::<OperationStatus>(), Ok(status));
        }
        assert!("done".parse::<OperationStatus>().is_err());
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&OperationStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!(OperationStatus::default(), OperationStatus::Planned);
    }

    #[test]
    fn test_parse_day_defaults_to_today() {
        let today = d(2024, 5, 1);
        assert_eq!(ReportWindow::parse_day(None, today).unwrap(), ReportWindow::day(today));
        assert_eq!(ReportWindow::parse_day(Some(""), today).unwrap(), ReportWindow::day(today));
        assert_eq!(
            ReportWindow::parse_day(Some("2023-12-31"), today).unwrap(),
            ReportWindow::day(d(2023, 12, 31))
        );
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        let today = d(2024, 5, 1);
        for raw in [
            "2024-13-01",
            "01/05/2024",
            "yesterday",
            "2024-02-30",
            "2024-5-1",
            "2024-05-1",
            "+2024-05-01",
            "12024-05-01",
        ] {
            let err = ReportWindow::parse_day(Some(raw), today).unwrap_err();
            assert_eq!(err.status_code(), 400, "{raw}");
        }
    }

    #[test]
    fn test_month_window() {
        let feb = ReportWindow::month(2024, 2).unwrap();
        assert_eq!(feb.from, d(2024, 2, 1));
        assert_eq!(feb.to, d(2024, 2, 29));

        let dec = ReportWindow::month(2023, 12).unwrap();
        assert_eq!(dec.to, d(2023, 12, 31));

        assert!(ReportWindow::month(2024, 13).is_none());
    }

    #[test]
    fn test_parse_month_and_year() {
        let today = d(2024, 5, 17);
        assert_eq!(
            ReportWindow::parse_month(None, today).unwrap(),
            ReportWindow::month(2024, 5).unwrap()
        );
        assert_eq!(
            ReportWindow::parse_month(Some("2023-11"), today).unwrap().to,
            d(2023, 11, 30)
        );
        assert!(ReportWindow::parse_month(Some("2023-1"), today).is_err());
        assert!(ReportWindow::parse_month(Some("2023"), today).is_err());
        assert!(ReportWindow::parse_month(Some("+202-01"), today).is_err());
        assert!(ReportWindow::parse_year(Some("+202"), today).is_err());

        let year = ReportWindow::parse_year(Some("2022"), today).unwrap();
        assert_eq!((year.from, year.to), (d(2022, 1, 1), d(2022, 12, 31)));
        assert!(ReportWindow::parse_year(Some("22"), today).is_err());
    }

    #[test]
    fn test_bounds_and_contains() {
        let window = ReportWindow::day(d(2024, 5, 1));
        let (start, end) = window.bounds();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap());

        assert!(window.contains(Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()));
    }
}
