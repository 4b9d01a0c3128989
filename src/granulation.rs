//! Predefined time buckets for [`Table::granulate()`](crate::Table::granulate)

use chrono::{Datelike, Days, NaiveDate};
use std::{fmt, str::FromStr};

/// Time resolution at which frequencies can be aggregated
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Granulation {
    /// Keep daily resolution
    #[default]
    Date,

    /// Aggregate by week, starting on Monday
    Week,

    /// Aggregate by calendar month
    Month,

    /// Aggregate by quarter
    Quarter,

    /// Aggregate by calendar year
    Year,
}
//
impl Granulation {
    /// Every predefined granulation, from finest to coarsest
    pub const ALL: [Granulation; 5] = [
        Self::Date,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::Year,
    ];

    /// Map a date to the first day of its bucket
    pub fn bucket(self, date: NaiveDate) -> NaiveDate {
        let days_back = match self {
            Self::Date => 0,
            Self::Week => date.weekday().num_days_from_monday(),
            Self::Month => date.day0(),
            // Quarters are approximated with 30-day months, so this lands a
            // day or two off the quarter start for months 2, 3, 5, 6, ...
            Self::Quarter => date.day0() + date.month0() % 3 * 30,
            Self::Year => date.ordinal0(),
        };
        date.checked_sub_days(Days::new(days_back.into()))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Bucketing function, in the form expected by `Table::granulate()`
    pub fn bucket_fn(self) -> impl Fn(NaiveDate) -> NaiveDate {
        move |date| self.bucket(date)
    }
}
//
impl fmt::Display for Granulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Date => "date",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        })
    }
}
//
impl FromStr for Granulation {
    type Err = ParseGranulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|granulation| granulation.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseGranulationError(s.into()))
    }
}

/// Unknown granulation name
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown granulation {0:?}, expected one of date, week, month, quarter or year")]
pub struct ParseGranulationError(Box<str>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::day;

    #[test]
    fn buckets_start_where_expected() {
        // 2022-08-18 is a Thursday
        let date = day("2022-08-18");
        assert_eq!(Granulation::Date.bucket(date), date);
        assert_eq!(Granulation::Week.bucket(date), day("2022-08-15"));
        assert_eq!(Granulation::Month.bucket(date), day("2022-08-01"));
        assert_eq!(Granulation::Year.bucket(date), day("2022-01-01"));
        // 17 days + 30 days back
        assert_eq!(Granulation::Quarter.bucket(date), day("2022-07-02"));
        assert_eq!(Granulation::Quarter.bucket(day("2022-10-09")), day("2022-10-01"));
    }

    #[test]
    fn names_round_trip() {
        for granulation in Granulation::ALL {
            assert_eq!(granulation.to_string().parse(), Ok(granulation));
        }
        assert!("decade".parse::<Granulation>().is_err());
    }
}
