use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive date range.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Serialize, Deserialize)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    pub fn start(&self) -> NaiveDate {
        self.0
    }

    pub fn end(&self) -> NaiveDate {
        self.1
    }

    /// True when `date` falls within the range, bounds included.
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.0 <= *date && *date <= self.1
    }

    /// True when the start lies after the end.
    pub fn is_empty(&self) -> bool {
        self.0 > self.1
    }

    /// Number of days covered, 0 for an empty range.
    pub fn num_days(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.1 - self.0).num_days() + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DateRange;
    use chrono::NaiveDate;

    #[test]
    fn test_date_range_num_days() {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 5).unwrap();
        assert_eq!(DateRange(start, end).num_days(), 5);
        assert_eq!(DateRange(start, start).num_days(), 1);
    }

    #[test]
    fn test_date_range_up_to_max_date() {
        let start = NaiveDate::MAX.pred_opt().unwrap();
        let range = DateRange(start, NaiveDate::MAX);
        assert_eq!(range.num_days(), 2);
        assert!(range.contains(&NaiveDate::MAX));
        assert!(!range.is_empty());
    }

    #[test]
    fn test_date_range_contains_bounds() {
        let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 3, 31).unwrap();
        let range = DateRange(start, end);
        assert!(range.contains(&start));
        assert!(range.contains(&end));
        assert!(!range.contains(&NaiveDate::from_ymd_opt(2021, 4, 1).unwrap()));
        assert!(!range.contains(&NaiveDate::from_ymd_opt(2021, 2, 28).unwrap()));
    }

    #[test]
    fn test_date_range_empty() {
        let start = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 3, 14).unwrap();
        let range = DateRange(start, end);
        assert!(range.is_empty());
        assert_eq!(range.num_days(), 0);
        assert!(!range.contains(&start));
    }
}
