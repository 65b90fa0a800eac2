//! Business-day calendar (Mon–Fri, no holiday list).

use chrono::{Datelike, NaiveDate, Weekday};

/// True for Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// All business days in `[start, end]`, ascending. Empty when `start > end`.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_business_day(*d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn skips_weekends() {
        // 2018-01-05 is a Friday, 2018-01-08 a Monday.
        let days = business_days(d(2018, 1, 5), d(2018, 1, 8));
        assert_eq!(days, vec![d(2018, 1, 5), d(2018, 1, 8)]);
    }

    #[test]
    fn inclusive_bounds() {
        let days = business_days(d(2018, 1, 2), d(2018, 1, 2));
        assert_eq!(days, vec![d(2018, 1, 2)]);
    }

    #[test]
    fn weekend_only_range_is_empty() {
        assert!(business_days(d(2018, 1, 6), d(2018, 1, 7)).is_empty());
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(business_days(d(2018, 2, 1), d(2018, 1, 1)).is_empty());
    }

    #[test]
    fn full_season_count() {
        // 2018-01-01 .. 2018-10-31 spans 304 calendar days, 218 of them weekdays.
        assert_eq!(business_days(d(2018, 1, 1), d(2018, 10, 31)).len(), 218);
    }
}
