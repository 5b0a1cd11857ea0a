//! # Date Ranges
//!
//! Presets for the analytics range selector. Every preset ends today; the
//! start depends on the option.
//!
//! | Option    | Start                         |
//! |-----------|-------------------------------|
//! | `week`    | today − 7 days                |
//! | `30days`  | today − 30 days               |
//! | `90days`  | today − 90 days               |
//! | `6months` | same day, 6 calendar months back (clamped to month end) |
//! | `year`    | 1 January of the current year |
//! | `all`     | 2000-01-01                    |

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::RevenueQuery;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateRangeOption {
    #[serde(rename = "week")]
    Week,
    #[default]
    #[serde(rename = "30days")]
    Days30,
    #[serde(rename = "90days")]
    Days90,
    #[serde(rename = "6months")]
    Months6,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl DateRangeOption {
    pub const ALL: [DateRangeOption; 6] = [
        DateRangeOption::Week,
        DateRangeOption::Days30,
        DateRangeOption::Days90,
        DateRangeOption::Months6,
        DateRangeOption::Year,
        DateRangeOption::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRangeOption::Week => "week",
            DateRangeOption::Days30 => "30days",
            DateRangeOption::Days90 => "90days",
            DateRangeOption::Months6 => "6months",
            DateRangeOption::Year => "year",
            DateRangeOption::All => "all",
        }
    }

    /// Human label for menus.
    pub fn label(&self) -> &'static str {
        match self {
            DateRangeOption::Week => "Last 7 days",
            DateRangeOption::Days30 => "Last 30 days",
            DateRangeOption::Days90 => "Last 90 days",
            DateRangeOption::Months6 => "Last 6 months",
            DateRangeOption::Year => "This year",
            DateRangeOption::All => "All time",
        }
    }

    /// Resolves the option against `today`.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        let start = match self {
            DateRangeOption::Week => today - Duration::days(7),
            DateRangeOption::Days30 => today - Duration::days(30),
            DateRangeOption::Days90 => today - Duration::days(90),
            DateRangeOption::Months6 => today
                .checked_sub_months(Months::new(6))
                .unwrap_or(today),
            DateRangeOption::Year => {
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
            }
            DateRangeOption::All => NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(today),
        };
        DateRange {
            option: *self,
            start,
            end: today,
        }
    }
}

impl FromStr for DateRangeOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateRangeOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "range".to_string(),
                allowed: DateRangeOption::ALL
                    .iter()
                    .map(|o| o.as_str().to_string())
                    .collect(),
            })
    }
}

impl fmt::Display for DateRangeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved range, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub option: DateRangeOption,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn start_date(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_date(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    /// Query for `GET /analytics/revenue-chart`.
    pub fn to_query(&self) -> RevenueQuery {
        RevenueQuery {
            start_date: self.start_date(),
            end_date: self.end_date(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_offsets() {
        let today = day(2024, 3, 15);
        assert_eq!(DateRangeOption::Week.resolve(today).start_date(), "2024-03-08");
        assert_eq!(DateRangeOption::Days30.resolve(today).start_date(), "2024-02-14");
        assert_eq!(DateRangeOption::Days90.resolve(today).start_date(), "2023-12-16");
        assert_eq!(DateRangeOption::Week.resolve(today).end_date(), "2024-03-15");
    }

    #[test]
    fn test_calendar_presets() {
        let today = day(2024, 8, 31);
        // February has no 31st: clamps to month end
        assert_eq!(DateRangeOption::Months6.resolve(today).start_date(), "2024-02-29");
        assert_eq!(DateRangeOption::Year.resolve(today).start_date(), "2024-01-01");
        assert_eq!(DateRangeOption::All.resolve(today).start_date(), "2000-01-01");
    }

    #[test]
    fn test_parse_and_query() {
        assert_eq!("6months".parse::<DateRangeOption>().unwrap(), DateRangeOption::Months6);
        assert!("fortnight".parse::<DateRangeOption>().is_err());
        assert_eq!(DateRangeOption::default(), DateRangeOption::Days30);

        let query = DateRangeOption::Year.resolve(day(2025, 6, 1)).to_query();
        assert_eq!(
            serde_json::to_value(query).unwrap(),
            serde_json::json!({ "startDate": "2025-01-01", "endDate": "2025-06-01" })
        );
    }
}
